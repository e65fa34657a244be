//! Built-in function implementations
//!
//! This module provides the functions available without an import, such as
//! `print`, `len`, `range` and the type constructors (`int`, `str`, `list`, ...).
//!
//! # Implementation Notes
//!
//! - Built-ins are [`Value::Builtin`] values named by a static string, so they
//!   can be stored, passed around and shadowed like any other name
//! - `print` renders its whole line first and writes it once, so the output
//!   budget never sees half a line
//! - `input()` and `open()` always fail: a run has no stdin and no filesystem
//! - `reversed`, `enumerate` and `zip` return lists rather than lazy iterators

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{repr_str, DictMap, DictRef, Number, RangeValue, Value, TYPE_NAMES};
use crate::parser::ast::{BinOp, SourceLocation};

/// Every name resolvable as a built-in
const BUILTIN_NAMES: &[&str] = &[
    "abs", "all", "any", "bool", "chr", "dict", "divmod", "enumerate", "float", "input",
    "int", "isinstance", "len", "list", "max", "min", "open", "ord", "pow", "print", "range",
    "repr", "reversed", "round", "sorted", "str", "sum", "tuple", "type", "zip",
];

/// Resolve a built-in by name
pub(crate) fn lookup(name: &str) -> Option<Value> {
    BUILTIN_NAMES
        .iter()
        .copied()
        .find(|candidate| *candidate == name)
        .map(Value::Builtin)
}

/// Remove and return a keyword argument
pub(crate) fn take_kwarg(kwargs: &mut Vec<(String, Value)>, name: &str) -> Option<Value> {
    let index = kwargs.iter().position(|(key, _)| key == name)?;
    Some(kwargs.remove(index).1)
}

/// Fail on any keyword argument the callee did not consume
pub(crate) fn reject_kwargs(
    function: &str,
    kwargs: &[(String, Value)],
    location: SourceLocation,
) -> Result<(), RuntimeError> {
    match kwargs.first() {
        Some((name, _)) => Err(RuntimeError::type_error(
            format!("'{}' is an invalid keyword argument for {}()", name, function),
            location,
        )),
        None => Ok(()),
    }
}

/// Check the positional argument count
pub(crate) fn expect_args(
    function: &str,
    args: &[Value],
    min: usize,
    max: usize,
    location: SourceLocation,
) -> Result<(), RuntimeError> {
    let given = args.len();
    if (min..=max).contains(&given) {
        return Ok(());
    }

    let message = if min == max {
        let noun = if min == 1 { "argument" } else { "arguments" };
        format!("{}() takes exactly {} {} ({} given)", function, min, noun, given)
    } else if given < min {
        let noun = if min == 1 { "argument" } else { "arguments" };
        format!("{}() expected at least {} {}, got {}", function, min, noun, given)
    } else {
        let noun = if max == 1 { "argument" } else { "arguments" };
        format!("{}() expected at most {} {}, got {}", function, max, noun, given)
    };
    Err(RuntimeError::type_error(message, location))
}

/// Round half to even at `ndigits` decimal places
fn round_float(value: f64, ndigits: i64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if ndigits >= 0 {
        let digits = ndigits.min(300) as usize;
        format!("{:.*}", digits, value).parse().unwrap_or(value)
    } else {
        let scale = 10f64.powi((-ndigits).min(308) as i32);
        (value / scale).round_ties_even() * scale
    }
}

impl Interpreter {
    pub(crate) fn call_builtin(
        &mut self,
        name: &str,
        args: Vec<Value>,
        mut kwargs: Vec<(String, Value)>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match name {
            "print" => {
                let sep = self.optional_str_kwarg(&mut kwargs, "sep", " ", location)?;
                let end = self.optional_str_kwarg(&mut kwargs, "end", "\n", location)?;
                take_kwarg(&mut kwargs, "flush");
                reject_kwargs(name, &kwargs, location)?;

                let mut line = String::new();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        line.push_str(&sep);
                    }
                    line.push_str(&self.display(arg, location)?);
                }
                line.push_str(&end);
                self.write_output(&line, location)?;
                Ok(Value::None)
            }

            "sorted" => {
                expect_args(name, &args, 1, 1, location)?;
                let key = take_kwarg(&mut kwargs, "key");
                let reverse = take_kwarg(&mut kwargs, "reverse").is_some_and(|v| v.is_truthy());
                reject_kwargs(name, &kwargs, location)?;

                let items = self.collect_iterable(&args[0], location)?;
                let sorted = self.sort_values(items, key.as_ref(), reverse, location)?;
                Ok(Value::list(sorted))
            }

            "min" | "max" => {
                let key = take_kwarg(&mut kwargs, "key");
                let default = take_kwarg(&mut kwargs, "default");
                reject_kwargs(name, &kwargs, location)?;
                expect_args(name, &args, 1, usize::MAX, location)?;

                let candidates = if args.len() == 1 {
                    self.collect_iterable(&args[0], location)?
                } else {
                    args
                };
                self.extreme(name, candidates, key.as_ref(), default, location)
            }

            "sum" => {
                let start = take_kwarg(&mut kwargs, "start");
                reject_kwargs(name, &kwargs, location)?;
                expect_args(name, &args, 1, 2, location)?;

                let mut total = args.get(1).cloned().or(start).unwrap_or(Value::Int(0));
                if matches!(total, Value::Str(_)) {
                    return Err(RuntimeError::type_error(
                        "sum() can't sum strings [use ''.join(seq) instead]",
                        location,
                    ));
                }
                for item in self.collect_iterable(&args[0], location)? {
                    total = self.binary_op(BinOp::Add, &total, &item, location)?;
                }
                Ok(total)
            }

            "enumerate" => {
                let start = take_kwarg(&mut kwargs, "start");
                reject_kwargs(name, &kwargs, location)?;
                expect_args(name, &args, 1, 2, location)?;

                let start = match args.get(1).cloned().or(start) {
                    Some(value) => self.expect_int(&value, location)?,
                    None => 0,
                };
                let items = self.collect_iterable(&args[0], location)?;
                let mut pairs = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    let index = i64::try_from(i)
                        .ok()
                        .and_then(|i| start.checked_add(i))
                        .ok_or_else(|| {
                            RuntimeError::overflow("Python int too large to convert to C ssize_t", location)
                        })?;
                    pairs.push(Value::tuple(vec![Value::Int(index), item]));
                }
                Ok(Value::list(pairs))
            }

            "round" => {
                let ndigits = take_kwarg(&mut kwargs, "ndigits");
                reject_kwargs(name, &kwargs, location)?;
                expect_args(name, &args, 1, 2, location)?;

                let ndigits = match args.get(1).cloned().or(ndigits) {
                    Some(Value::None) | None => None,
                    Some(value) => Some(self.expect_int(&value, location)?),
                };
                self.round(&args[0], ndigits, location)
            }

            "dict" => {
                expect_args(name, &args, 0, 1, location)?;
                let dict = DictRef::new(DictMap::default());
                if let Some(source) = args.first() {
                    let pairs = match source {
                        Value::Dict(other) => other.items(),
                        other => {
                            let mut pairs = Vec::new();
                            for item in self.collect_iterable(other, location)? {
                                let pair = self.collect_iterable(&item, location)?;
                                let [key, value]: [Value; 2] = pair.try_into().map_err(|_| {
                                    RuntimeError::value_error(
                                        "dictionary update sequence element has the wrong length; 2 is required",
                                        location,
                                    )
                                })?;
                                pairs.push((key, value));
                            }
                            pairs
                        }
                    };
                    for (key, value) in pairs {
                        let hashed = self.hash_key(&key, location)?;
                        dict.insert(hashed, key, value);
                    }
                }
                for (key, value) in kwargs {
                    let key = Value::str(key);
                    let hashed = self.hash_key(&key, location)?;
                    dict.insert(hashed, key, value);
                }
                Ok(Value::Dict(dict))
            }

            _ => {
                reject_kwargs(name, &kwargs, location)?;
                self.call_positional_builtin(name, &args, location)
            }
        }
    }

    /// Built-ins that take no keyword arguments
    fn call_positional_builtin(
        &mut self,
        name: &str,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match name {
            "len" => {
                expect_args(name, args, 1, 1, location)?;
                let len = match &args[0] {
                    Value::Str(s) => s.chars().count(),
                    Value::List(list) => list.len(),
                    Value::Tuple(tuple) => tuple.len(),
                    Value::Dict(dict) => dict.len(),
                    Value::Range(range) => range.len(),
                    other => {
                        return Err(RuntimeError::type_error(
                            format!("object of type '{}' has no len()", other.type_name()),
                            location,
                        ))
                    }
                };
                i64::try_from(len).map(Value::Int).map_err(|_| {
                    RuntimeError::overflow("Python int too large to convert to C ssize_t", location)
                })
            }

            "range" => {
                expect_args(name, args, 1, 3, location)?;
                let mut bounds = Vec::with_capacity(args.len());
                for arg in args.iter() {
                    bounds.push(self.expect_int(arg, location)?);
                }
                let (start, stop, step) = match bounds.as_slice() {
                    [stop] => (0, *stop, 1),
                    [start, stop] => (*start, *stop, 1),
                    [start, stop, step] => (*start, *stop, *step),
                    _ => (0, 0, 1),
                };
                if step == 0 {
                    return Err(RuntimeError::value_error(
                        "range() arg 3 must not be zero",
                        location,
                    ));
                }
                Ok(Value::Range(RangeValue { start, stop, step }))
            }

            "str" => {
                expect_args(name, args, 0, 1, location)?;
                match args.first() {
                    Some(value) => Ok(Value::str(self.display(value, location)?)),
                    None => Ok(Value::str("")),
                }
            }

            "repr" => {
                expect_args(name, args, 1, 1, location)?;
                Ok(Value::str(self.repr(&args[0], location)?))
            }

            "int" => {
                expect_args(name, args, 0, 2, location)?;
                match args {
                    [] => Ok(Value::Int(0)),
                    [value] => self.to_int(value, location),
                    [value, base] => {
                        let base = self.expect_int(base, location)?;
                        let Value::Str(text) = value else {
                            return Err(RuntimeError::type_error(
                                "int() can't convert non-string with explicit base",
                                location,
                            ));
                        };
                        self.parse_int(text, base, location)
                    }
                    _ => Ok(Value::Int(0)),
                }
            }

            "float" => {
                expect_args(name, args, 0, 1, location)?;
                match args.first() {
                    None => Ok(Value::Float(0.0)),
                    Some(value) => self.to_float(value, location),
                }
            }

            "bool" => {
                expect_args(name, args, 0, 1, location)?;
                Ok(Value::Bool(args.first().is_some_and(Value::is_truthy)))
            }

            "list" => {
                expect_args(name, args, 0, 1, location)?;
                match args.first() {
                    Some(value) => Ok(Value::list(self.collect_iterable(value, location)?)),
                    None => Ok(Value::list(Vec::new())),
                }
            }

            "tuple" => {
                expect_args(name, args, 0, 1, location)?;
                match args.first() {
                    Some(value) => Ok(Value::tuple(self.collect_iterable(value, location)?)),
                    None => Ok(Value::tuple(Vec::new())),
                }
            }

            "abs" => {
                expect_args(name, args, 1, 1, location)?;
                match args[0].as_number() {
                    Some(Number::Int(n)) => n.checked_abs().map(Value::Int).ok_or_else(|| {
                        RuntimeError::overflow("integer result is too large for this playground", location)
                    }),
                    Some(Number::Float(f)) => Ok(Value::Float(f.abs())),
                    None => Err(RuntimeError::type_error(
                        format!("bad operand type for abs(): '{}'", args[0].type_name()),
                        location,
                    )),
                }
            }

            "reversed" => {
                expect_args(name, args, 1, 1, location)?;
                if let Value::Dict(_) = &args[0] {
                    return Err(RuntimeError::type_error("'dict' object is not reversible", location));
                }
                let mut items = self.collect_iterable(&args[0], location)?;
                items.reverse();
                Ok(Value::list(items))
            }

            "zip" => {
                let mut columns = Vec::with_capacity(args.len());
                for arg in args.iter() {
                    columns.push(self.collect_iterable(arg, location)?);
                }
                let len = columns.iter().map(Vec::len).min().unwrap_or(0);
                let rows = (0..len)
                    .map(|i| Value::tuple(columns.iter().map(|col| col[i].clone()).collect()))
                    .collect();
                Ok(Value::list(rows))
            }

            "any" | "all" => {
                expect_args(name, args, 1, 1, location)?;
                let items = self.collect_iterable(&args[0], location)?;
                let result = if name == "any" {
                    items.iter().any(Value::is_truthy)
                } else {
                    items.iter().all(Value::is_truthy)
                };
                Ok(Value::Bool(result))
            }

            "type" => {
                expect_args(name, args, 1, 1, location)?;
                let type_name = args[0].type_name();
                match lookup(type_name) {
                    Some(builtin) => Ok(builtin),
                    None => Ok(Value::str(format!("<class '{}'>", type_name))),
                }
            }

            "isinstance" => {
                expect_args(name, args, 2, 2, location)?;
                let classes = match &args[1] {
                    Value::Tuple(tuple) => tuple.items().to_vec(),
                    other => vec![other.clone()],
                };
                let actual = args[0].type_name();
                let mut matched = false;
                for class in &classes {
                    match class {
                        Value::Builtin(class) if TYPE_NAMES.contains(class) => {
                            matched |= *class == actual || (*class == "int" && actual == "bool");
                        }
                        _ => {
                            return Err(RuntimeError::type_error(
                                "isinstance() arg 2 must be a type or tuple of types",
                                location,
                            ))
                        }
                    }
                }
                Ok(Value::Bool(matched))
            }

            "ord" => {
                expect_args(name, args, 1, 1, location)?;
                let Value::Str(s) = &args[0] else {
                    return Err(RuntimeError::type_error(
                        format!(
                            "ord() expected string of length 1, but {} found",
                            args[0].type_name()
                        ),
                        location,
                    ));
                };
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(Value::Int(ch as i64)),
                    _ => Err(RuntimeError::type_error(
                        format!(
                            "ord() expected a character, but string of length {} found",
                            s.chars().count()
                        ),
                        location,
                    )),
                }
            }

            "chr" => {
                expect_args(name, args, 1, 1, location)?;
                let code = self.expect_int(&args[0], location)?;
                u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .map(|ch| Value::str(ch.to_string()))
                    .ok_or_else(|| {
                        RuntimeError::value_error("chr() arg not in range(0x110000)", location)
                    })
            }

            "pow" => {
                expect_args(name, args, 2, 3, location)?;
                if let [base, exp, modulus] = args {
                    let (base, exp, modulus) = (
                        self.expect_int(base, location)?,
                        self.expect_int(exp, location)?,
                        self.expect_int(modulus, location)?,
                    );
                    return self.mod_pow(base, exp, modulus, location);
                }
                self.binary_op(BinOp::Pow, &args[0], &args[1], location)
            }

            "divmod" => {
                expect_args(name, args, 2, 2, location)?;
                let quotient = self.binary_op(BinOp::FloorDiv, &args[0], &args[1], location)?;
                let remainder = self.binary_op(BinOp::Mod, &args[0], &args[1], location)?;
                Ok(Value::tuple(vec![quotient, remainder]))
            }

            "input" => {
                expect_args(name, args, 0, 1, location)?;
                if let Some(prompt) = args.first() {
                    let prompt = self.display(prompt, location)?;
                    self.write_output(&prompt, location)?;
                }
                Err(RuntimeError::EndOfInput { location })
            }

            "open" => {
                expect_args(name, args, 1, 3, location)?;
                Err(RuntimeError::FileNotFound {
                    path: self.repr(&args[0], location)?,
                    location,
                })
            }

            _ => Err(RuntimeError::UndefinedName {
                name: name.to_string(),
                location,
            }),
        }
    }

    fn optional_str_kwarg(
        &self,
        kwargs: &mut Vec<(String, Value)>,
        name: &str,
        default: &str,
        location: SourceLocation,
    ) -> Result<String, RuntimeError> {
        match take_kwarg(kwargs, name) {
            None | Some(Value::None) => Ok(default.to_string()),
            Some(Value::Str(s)) => Ok(s.to_string()),
            Some(other) => Err(RuntimeError::type_error(
                format!("{} must be None or a string, not {}", name, other.type_name()),
                location,
            )),
        }
    }

    /// An integer argument, as Python's `__index__` would accept it
    pub(crate) fn expect_int(&self, value: &Value, location: SourceLocation) -> Result<i64, RuntimeError> {
        value.as_int().ok_or_else(|| {
            RuntimeError::type_error(
                format!(
                    "'{}' object cannot be interpreted as an integer",
                    value.type_name()
                ),
                location,
            )
        })
    }

    /// A numeric argument as `f64`
    pub(crate) fn expect_float(&self, value: &Value, location: SourceLocation) -> Result<f64, RuntimeError> {
        value.as_number().map(Number::as_f64).ok_or_else(|| {
            RuntimeError::type_error(
                format!("must be real number, not {}", value.type_name()),
                location,
            )
        })
    }

    pub(crate) fn to_int(&self, value: &Value, location: SourceLocation) -> Result<Value, RuntimeError> {
        match value {
            Value::Int(n) => Ok(Value::Int(*n)),
            Value::Bool(b) => Ok(Value::Int(*b as i64)),
            Value::Float(f) => {
                if f.is_nan() {
                    return Err(RuntimeError::value_error(
                        "cannot convert float NaN to integer",
                        location,
                    ));
                }
                if f.is_infinite() {
                    return Err(RuntimeError::overflow(
                        "cannot convert float infinity to integer",
                        location,
                    ));
                }
                let truncated = f.trunc();
                if truncated.abs() >= 9.2e18 {
                    return Err(RuntimeError::overflow(
                        "integer result is too large for this playground",
                        location,
                    ));
                }
                Ok(Value::Int(truncated as i64))
            }
            Value::Str(text) => self.parse_int(text, 10, location),
            other => Err(RuntimeError::type_error(
                format!(
                    "int() argument must be a string, a bytes-like object or a real number, not '{}'",
                    other.type_name()
                ),
                location,
            )),
        }
    }

    fn parse_int(&self, text: &str, base: i64, location: SourceLocation) -> Result<Value, RuntimeError> {
        let invalid = || {
            RuntimeError::value_error(
                format!(
                    "invalid literal for int() with base {}: {}",
                    base,
                    repr_str(text)
                ),
                location,
            )
        };

        if !(2..=36).contains(&base) {
            return Err(RuntimeError::value_error(
                "int() base must be >= 2 and <= 36, or 0",
                location,
            ));
        }

        let trimmed = text.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits = match base {
            16 => digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")).unwrap_or(digits),
            8 => digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")).unwrap_or(digits),
            2 => digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")).unwrap_or(digits),
            _ => digits,
        };

        if digits.is_empty()
            || digits.starts_with('_')
            || digits.ends_with('_')
            || digits.contains("__")
            || !digits.chars().all(|c| c == '_' || c.is_digit(base as u32))
        {
            return Err(invalid());
        }

        let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
        let magnitude = i64::from_str_radix(&cleaned, base as u32).map_err(|_| {
            RuntimeError::overflow("integer result is too large for this playground", location)
        })?;
        Ok(Value::Int(if negative { -magnitude } else { magnitude }))
    }

    fn to_float(&self, value: &Value, location: SourceLocation) -> Result<Value, RuntimeError> {
        if let Some(number) = value.as_number() {
            return Ok(Value::Float(number.as_f64()));
        }
        match value {
            Value::Str(text) => {
                let trimmed = text.trim();
                let cleaned = trimmed.replace('_', "");
                let valid_underscores = !trimmed.starts_with('_')
                    && !trimmed.ends_with('_')
                    && !trimmed.contains("__");
                match cleaned.parse::<f64>() {
                    Ok(f) if valid_underscores && !trimmed.is_empty() => Ok(Value::Float(f)),
                    _ => Err(RuntimeError::value_error(
                        format!(
                            "could not convert string to float: {}",
                            repr_str(text)
                        ),
                        location,
                    )),
                }
            }
            other => Err(RuntimeError::type_error(
                format!(
                    "float() argument must be a string or a real number, not '{}'",
                    other.type_name()
                ),
                location,
            )),
        }
    }

    fn round(&self, value: &Value, ndigits: Option<i64>, location: SourceLocation) -> Result<Value, RuntimeError> {
        match (value.as_number(), ndigits) {
            (Some(Number::Int(n)), None) => Ok(Value::Int(n)),
            (Some(Number::Int(n)), Some(digits)) if digits >= 0 => Ok(Value::Int(n)),
            (Some(Number::Int(n)), Some(digits)) => {
                let rounded = round_float(n as f64, digits);
                Ok(Value::Int(rounded as i64))
            }
            (Some(Number::Float(f)), None) => {
                if !f.is_finite() {
                    return self.to_int(&Value::Float(f), location);
                }
                self.to_int(&Value::Float(f.round_ties_even()), location)
            }
            (Some(Number::Float(f)), Some(digits)) => Ok(Value::Float(round_float(f, digits))),
            (None, _) => Err(RuntimeError::type_error(
                format!(
                    "type {} doesn't define __round__ method",
                    value.type_name()
                ),
                location,
            )),
        }
    }

    fn mod_pow(&self, base: i64, exp: i64, modulus: i64, location: SourceLocation) -> Result<Value, RuntimeError> {
        if modulus == 0 {
            return Err(RuntimeError::value_error("pow() 3rd argument cannot be 0", location));
        }
        if exp < 0 {
            return Err(RuntimeError::value_error(
                "pow() negative exponent with a modulus is not supported here",
                location,
            ));
        }
        let m = modulus as i128;
        let mut result: i128 = 1;
        let mut b = (base as i128).rem_euclid(m);
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result * b % m;
            }
            b = b * b % m;
            e >>= 1;
        }
        // Python's result takes the sign of the modulus
        let result = result.rem_euclid(m);
        let result = if m < 0 && result != 0 { result + m } else { result };
        Ok(Value::Int(result as i64))
    }

    /// Stable sort, optionally by a key function; ties keep their order even when reversed
    pub(crate) fn sort_values(
        &mut self,
        items: Vec<Value>,
        key: Option<&Value>,
        reverse: bool,
        location: SourceLocation,
    ) -> Result<Vec<Value>, RuntimeError> {
        let mut decorated = Vec::with_capacity(items.len());
        for item in items {
            let sort_key = match key {
                Some(Value::None) | None => item.clone(),
                Some(func) => self.call_value(func, vec![item.clone()], Vec::new(), location)?,
            };
            decorated.push((sort_key, item));
        }

        let sorted = self.merge_sort(decorated, reverse, location)?;
        Ok(sorted.into_iter().map(|(_, item)| item).collect())
    }

    fn merge_sort(
        &self,
        mut items: Vec<(Value, Value)>,
        reverse: bool,
        location: SourceLocation,
    ) -> Result<Vec<(Value, Value)>, RuntimeError> {
        if items.len() <= 1 {
            return Ok(items);
        }

        let right = items.split_off(items.len() / 2);
        let left = self.merge_sort(items, reverse, location)?;
        let right = self.merge_sort(right, reverse, location)?;

        let mut merged = Vec::with_capacity(left.len() + right.len());
        let mut left = left.into_iter().peekable();
        let mut right = right.into_iter().peekable();
        loop {
            let take_right = match (left.peek(), right.peek()) {
                (Some(l), Some(r)) => {
                    if reverse {
                        self.less_than(&l.0, &r.0, location)?
                    } else {
                        self.less_than(&r.0, &l.0, location)?
                    }
                }
                (Some(_), None) => false,
                (None, Some(_)) => true,
                (None, None) => break,
            };
            let next = if take_right { right.next() } else { left.next() };
            merged.extend(next);
        }
        Ok(merged)
    }

    /// `min()` / `max()`: first of the smallest or largest items
    fn extreme(
        &mut self,
        name: &str,
        candidates: Vec<Value>,
        key: Option<&Value>,
        default: Option<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let mut best: Option<(Value, Value)> = None;
        for item in candidates {
            let item_key = match key {
                Some(Value::None) | None => item.clone(),
                Some(func) => self.call_value(func, vec![item.clone()], Vec::new(), location)?,
            };
            let better = match &best {
                None => true,
                Some((best_key, _)) if name == "min" => self.less_than(&item_key, best_key, location)?,
                Some((best_key, _)) => self.less_than(best_key, &item_key, location)?,
            };
            if better {
                best = Some((item_key, item));
            }
        }

        match (best, default) {
            (Some((_, item)), _) => Ok(item),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(RuntimeError::value_error(
                format!("{}() arg is an empty sequence", name),
                location,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::executor::ExecutionLimits;
    use crate::interpreter::engine::Interpreter;
    use crate::parser::parse_program;

    fn run(source: &str) -> Result<String, String> {
        let program = parse_program(source, 100).unwrap();
        let mut interp = Interpreter::new(ExecutionLimits::default());
        match interp.run(&program) {
            Ok(()) => Ok(interp.into_output()),
            Err(err) => Err(err.raw_message()),
        }
    }

    #[test]
    fn test_print_sep_and_end() {
        assert_eq!(run("print(1, 2, 3, sep='-', end='!\\n')\n"), Ok("1-2-3!\n".into()));
        assert_eq!(run("print()\n"), Ok("\n".into()));
        assert_eq!(run("print('a', end='')\nprint('b')\n"), Ok("ab\n".into()));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(run("print(int('42') + 1, int(3.9), int('-7'))\n"), Ok("43 3 -7\n".into()));
        assert_eq!(run("print(float('2.5'), str(10) + '!')\n"), Ok("2.5 10!\n".into()));
        assert_eq!(run("print(int('ff', 16), bool(''), list('hi'))\n"), Ok("255 False ['h', 'i']\n".into()));
        assert_eq!(
            run("int('abc')\n"),
            Err("ValueError: invalid literal for int() with base 10: 'abc'".into())
        );
        assert_eq!(
            run("float('x')\n"),
            Err("ValueError: could not convert string to float: 'x'".into())
        );
    }

    #[test]
    fn test_len_and_range() {
        assert_eq!(run("print(len('héllo'), len([1, 2]), len(range(0, 10, 3)))\n"), Ok("5 2 4\n".into()));
        assert_eq!(run("print(list(range(3)))\n"), Ok("[0, 1, 2]\n".into()));
        assert_eq!(run("len(5)\n"), Err("TypeError: object of type 'int' has no len()".into()));
        assert_eq!(
            run("range(1.5)\n"),
            Err("TypeError: 'float' object cannot be interpreted as an integer".into())
        );
    }

    #[test]
    fn test_aggregates() {
        assert_eq!(run("print(sum([1, 2, 3]), min(4, 2, 8), max([3, 9, 1]))\n"), Ok("6 2 9\n".into()));
        assert_eq!(run("print(max(['aa', 'b', 'ccc'], key=len))\n"), Ok("ccc\n".into()));
        assert_eq!(run("print(any([0, '', 3]), all([]))\n"), Ok("True True\n".into()));
        assert_eq!(run("min([])\n"), Err("ValueError: min() arg is an empty sequence".into()));
    }

    #[test]
    fn test_sorted_is_stable() {
        let source = "words = ['bb', 'a', 'cc', 'd']\nprint(sorted(words, key=len))\nprint(sorted(words, key=len, reverse=True))\nprint(sorted([3, 1, 2], reverse=True))\n";
        assert_eq!(
            run(source),
            Ok("['a', 'd', 'bb', 'cc']\n['bb', 'cc', 'a', 'd']\n[3, 2, 1]\n".into())
        );
        assert_eq!(
            run("sorted([1, 'a'])\n"),
            Err("TypeError: '<' not supported between instances of 'str' and 'int'".into())
        );
    }

    #[test]
    fn test_round_uses_bankers_rounding() {
        assert_eq!(run("print(round(2.5), round(3.5), round(-0.5))\n"), Ok("2 4 0\n".into()));
        assert_eq!(run("print(round(3.14159, 2), round(1234, -2))\n"), Ok("3.14 1200\n".into()));
    }

    #[test]
    fn test_enumerate_zip_reversed() {
        assert_eq!(
            run("print(list(enumerate('ab', 1)), zip([1, 2, 3], 'xy'), reversed([1, 2]))\n"),
            Ok("[(1, 'a'), (2, 'b')] [(1, 'x'), (2, 'y')] [2, 1]\n".into())
        );
    }

    #[test]
    fn test_integer_edges_raise_overflow() {
        assert_eq!(
            run("print(enumerate(['a'], 9223372036854775807))\n"),
            Ok("[(9223372036854775807, 'a')]\n".into())
        );
        assert_eq!(
            run("enumerate(['a', 'b'], 9223372036854775807)\n"),
            Err("OverflowError: Python int too large to convert to C ssize_t".into())
        );
        assert_eq!(
            run("len(range(-9223372036854775807 - 1, 9223372036854775807))\n"),
            Err("OverflowError: Python int too large to convert to C ssize_t".into())
        );
    }

    #[test]
    fn test_type_and_isinstance() {
        assert_eq!(run("print(type(5) == int, type('a'))\n"), Ok("True <class 'str'>\n".into()));
        assert_eq!(run("print(isinstance(True, int), isinstance(2.0, (int, str)))\n"), Ok("True False\n".into()));
    }

    #[test]
    fn test_input_and_open_fail() {
        assert_eq!(run("name = input('Name? ')\n"), Err("EOFError: EOF when reading a line".into()));
        assert_eq!(
            run("open('data.txt')\n"),
            Err("FileNotFoundError: [Errno 2] No such file or directory: 'data.txt'".into())
        );
    }

    #[test]
    fn test_chr_ord_pow_divmod() {
        assert_eq!(run("print(ord('A'), chr(97), pow(2, 5), pow(3, 4, 5), divmod(17, 5))\n"), Ok("65 a 32 1 (3, 2)\n".into()));
    }
}
