//! Methods of the built-in `str`, `list` and `dict` types
//!
//! `x.name` on one of these types produces a [`Value::BoundMethod`]; calling it
//! dispatches here by receiver type and method name.

use crate::interpreter::builtins::{expect_args, reject_kwargs, take_kwarg};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{DictRef, ListRef, Value};
use crate::parser::ast::SourceLocation;

const STR_METHODS: &[&str] = &[
    "capitalize", "center", "count", "endswith", "find", "format", "index", "isalnum",
    "isalpha", "isdigit", "islower", "isspace", "isupper", "join", "ljust", "lower", "lstrip",
    "replace", "rjust", "rstrip", "split", "startswith", "strip", "swapcase", "title", "upper",
    "zfill",
];

const LIST_METHODS: &[&str] = &[
    "append", "clear", "copy", "count", "extend", "index", "insert", "pop", "remove",
    "reverse", "sort",
];

const DICT_METHODS: &[&str] = &[
    "clear", "copy", "get", "items", "keys", "pop", "setdefault", "update", "values",
];

/// Whether `value.name` is a known method
pub(crate) fn has_method(value: &Value, name: &str) -> bool {
    let table = match value {
        Value::Str(_) => STR_METHODS,
        Value::List(_) => LIST_METHODS,
        Value::Dict(_) => DICT_METHODS,
        _ => return false,
    };
    table.contains(&name)
}

/// Python's `str.title`: uppercase the first letter of every run of letters
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_cased = false;
    for ch in s.chars() {
        if previous_cased {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        previous_cased = ch.is_alphabetic();
    }
    out
}

/// Python's whitespace `split()` with an optional limit
fn split_whitespace(s: &str, maxsplit: Option<usize>) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = s.trim_start();
    while !rest.is_empty() {
        if maxsplit.is_some_and(|max| parts.len() >= max) {
            parts.push(rest.trim_end().to_string());
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                parts.push(rest[..end].to_string());
                rest = rest[end..].trim_start();
            }
            None => {
                parts.push(rest.to_string());
                break;
            }
        }
    }
    parts
}

fn char_index(s: &str, byte_index: usize) -> i64 {
    s[..byte_index].chars().count() as i64
}

impl Interpreter {
    pub(crate) fn call_method(
        &mut self,
        receiver: &Value,
        name: &str,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match receiver {
            Value::Str(s) => self.call_str_method(s, name, args, kwargs, location),
            Value::List(list) => self.call_list_method(list, name, args, kwargs, location),
            Value::Dict(dict) => {
                reject_kwargs(name, &kwargs, location)?;
                self.call_dict_method(dict, name, args, location)
            }
            other => Err(RuntimeError::attribute_error(
                format!("'{}' object has no attribute '{}'", other.type_name(), name),
                location,
            )),
        }
    }

    fn str_arg<'a>(
        &self,
        method: &str,
        value: &'a Value,
        location: SourceLocation,
    ) -> Result<&'a str, RuntimeError> {
        value.as_str().ok_or_else(|| {
            RuntimeError::type_error(
                format!(
                    "{}() argument must be str, not {}",
                    method,
                    value.type_name()
                ),
                location,
            )
        })
    }

    fn call_str_method(
        &mut self,
        s: &str,
        name: &str,
        args: Vec<Value>,
        mut kwargs: Vec<(String, Value)>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if name == "format" {
            let rendered = self.format_template(s, &args, &kwargs, location)?;
            self.check_sequence_len(rendered.len(), location)?;
            return Ok(Value::str(rendered));
        }

        let (sep, maxsplit) = if name == "split" {
            (take_kwarg(&mut kwargs, "sep"), take_kwarg(&mut kwargs, "maxsplit"))
        } else {
            (None, None)
        };
        reject_kwargs(name, &kwargs, location)?;

        match name {
            "upper" | "lower" | "title" | "capitalize" | "swapcase" => {
                expect_args(name, &args, 0, 0, location)?;
                let result = match name {
                    "upper" => s.to_uppercase(),
                    "lower" => s.to_lowercase(),
                    "title" => title_case(s),
                    "swapcase" => s
                        .chars()
                        .flat_map(|c| -> Vec<char> {
                            if c.is_uppercase() {
                                c.to_lowercase().collect()
                            } else {
                                c.to_uppercase().collect()
                            }
                        })
                        .collect(),
                    _ => {
                        let mut chars = s.chars();
                        match chars.next() {
                            Some(first) => first
                                .to_uppercase()
                                .chain(chars.as_str().to_lowercase().chars())
                                .collect(),
                            None => String::new(),
                        }
                    }
                };
                Ok(Value::str(result))
            }

            "strip" | "lstrip" | "rstrip" => {
                expect_args(name, &args, 0, 1, location)?;
                let chars: Option<Vec<char>> = match args.first() {
                    None | Some(Value::None) => None,
                    Some(value) => Some(self.str_arg(name, value, location)?.chars().collect()),
                };
                let matches = |c: char| match &chars {
                    Some(set) => set.contains(&c),
                    None => c.is_whitespace(),
                };
                let result = match name {
                    "strip" => s.trim_matches(matches),
                    "lstrip" => s.trim_start_matches(matches),
                    _ => s.trim_end_matches(matches),
                };
                Ok(Value::str(result))
            }

            "split" => {
                expect_args(name, &args, 0, 2, location)?;
                let sep = args.first().cloned().or(sep);
                let maxsplit = match args.get(1).cloned().or(maxsplit) {
                    Some(value) => self.expect_int(&value, location)?,
                    None => -1,
                };
                let limit = usize::try_from(maxsplit).ok();

                let parts: Vec<String> = match sep {
                    None | Some(Value::None) => split_whitespace(s, limit),
                    Some(value) => {
                        let sep = self.str_arg(name, &value, location)?;
                        if sep.is_empty() {
                            return Err(RuntimeError::value_error("empty separator", location));
                        }
                        match limit {
                            Some(limit) => s.splitn(limit + 1, sep).map(String::from).collect(),
                            None => s.split(sep).map(String::from).collect(),
                        }
                    }
                };
                self.check_sequence_len(parts.len(), location)?;
                Ok(Value::list(parts.into_iter().map(Value::str).collect()))
            }

            "join" => {
                expect_args(name, &args, 1, 1, location)?;
                let items = self.collect_iterable(&args[0], location)?;
                let mut pieces: Vec<&str> = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::Str(piece) => pieces.push(&**piece),
                        other => {
                            return Err(RuntimeError::type_error(
                                format!(
                                    "sequence item {}: expected str instance, {} found",
                                    i,
                                    other.type_name()
                                ),
                                location,
                            ))
                        }
                    }
                }
                let total = pieces
                    .iter()
                    .map(|piece| piece.len())
                    .sum::<usize>()
                    .saturating_add(s.len().saturating_mul(pieces.len().saturating_sub(1)));
                self.check_sequence_len(total, location)?;
                Ok(Value::str(pieces.join(s)))
            }

            "replace" => {
                expect_args(name, &args, 2, 3, location)?;
                let old = self.str_arg(name, &args[0], location)?;
                let new = self.str_arg(name, &args[1], location)?;
                let count = match args.get(2) {
                    Some(value) => self.expect_int(value, location)?,
                    None => -1,
                };
                if new.len() > old.len() {
                    let found = if old.is_empty() {
                        s.chars().count() + 1
                    } else {
                        s.matches(old).count()
                    };
                    let replacements = usize::try_from(count).map_or(found, |count| found.min(count));
                    let growth = replacements.saturating_mul(new.len() - old.len());
                    self.check_sequence_len(s.len().saturating_add(growth), location)?;
                }
                let replaced = match usize::try_from(count) {
                    Ok(count) => s.replacen(old, new, count),
                    Err(_) => s.replace(old, new),
                };
                self.check_sequence_len(replaced.len(), location)?;
                Ok(Value::str(replaced))
            }

            "startswith" | "endswith" => {
                expect_args(name, &args, 1, 1, location)?;
                let candidates = match &args[0] {
                    Value::Tuple(tuple) => tuple.items().to_vec(),
                    other => vec![other.clone()],
                };
                for candidate in &candidates {
                    let Value::Str(affix) = candidate else {
                        return Err(RuntimeError::type_error(
                            format!(
                                "{} first arg must be str or a tuple of str, not {}",
                                name,
                                candidate.type_name()
                            ),
                            location,
                        ));
                    };
                    let hit = if name == "startswith" {
                        s.starts_with(&**affix)
                    } else {
                        s.ends_with(&**affix)
                    };
                    if hit {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }

            "find" | "index" => {
                expect_args(name, &args, 1, 1, location)?;
                let needle = self.str_arg(name, &args[0], location)?;
                match s.find(needle) {
                    Some(byte_index) => Ok(Value::Int(char_index(s, byte_index))),
                    None if name == "find" => Ok(Value::Int(-1)),
                    None => Err(RuntimeError::value_error("substring not found", location)),
                }
            }

            "count" => {
                expect_args(name, &args, 1, 1, location)?;
                let needle = self.str_arg(name, &args[0], location)?;
                let count = if needle.is_empty() {
                    s.chars().count() + 1
                } else {
                    s.matches(needle).count()
                };
                Ok(Value::Int(count as i64))
            }

            "isdigit" | "isalpha" | "isalnum" | "isspace" => {
                expect_args(name, &args, 0, 0, location)?;
                let test: fn(char) -> bool = match name {
                    "isdigit" => |c: char| c.is_ascii_digit(),
                    "isalpha" => char::is_alphabetic,
                    "isalnum" => char::is_alphanumeric,
                    _ => char::is_whitespace,
                };
                Ok(Value::Bool(!s.is_empty() && s.chars().all(test)))
            }

            "isupper" | "islower" => {
                expect_args(name, &args, 0, 0, location)?;
                let has_cased = s.chars().any(|c| c.is_uppercase() || c.is_lowercase());
                let ok = if name == "isupper" {
                    !s.chars().any(char::is_lowercase)
                } else {
                    !s.chars().any(char::is_uppercase)
                };
                Ok(Value::Bool(has_cased && ok))
            }

            "center" | "ljust" | "rjust" => {
                expect_args(name, &args, 1, 2, location)?;
                let width = self.expect_int(&args[0], location)?.max(0) as usize;
                let fill = match args.get(1) {
                    Some(value) => {
                        let fill = self.str_arg(name, value, location)?;
                        let mut chars = fill.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => c,
                            _ => {
                                return Err(RuntimeError::type_error(
                                    "The fill character must be exactly one character long",
                                    location,
                                ))
                            }
                        }
                    }
                    None => ' ',
                };
                self.check_sequence_len(width, location)?;
                let len = s.chars().count();
                if width <= len {
                    return Ok(Value::str(s));
                }
                let padding = width - len;
                let (left, right) = match name {
                    "ljust" => (0, padding),
                    "rjust" => (padding, 0),
                    // odd padding goes left only when the target width is odd
                    _ => {
                        let left = padding / 2 + (padding & width & 1);
                        (left, padding - left)
                    }
                };
                let fill = fill.to_string();
                Ok(Value::str(format!("{}{}{}", fill.repeat(left), s, fill.repeat(right))))
            }

            "zfill" => {
                expect_args(name, &args, 1, 1, location)?;
                let width = self.expect_int(&args[0], location)?.max(0) as usize;
                self.check_sequence_len(width, location)?;
                let len = s.chars().count();
                if width <= len {
                    return Ok(Value::str(s));
                }
                let (sign, digits) = match s.chars().next() {
                    Some(c @ ('+' | '-')) => (c.to_string(), &s[1..]),
                    _ => (String::new(), s),
                };
                Ok(Value::str(format!("{}{}{}", sign, "0".repeat(width - len), digits)))
            }

            _ => Err(RuntimeError::attribute_error(
                format!("'str' object has no attribute '{}'", name),
                location,
            )),
        }
    }

    fn call_list_method(
        &mut self,
        list: &ListRef,
        name: &str,
        args: Vec<Value>,
        mut kwargs: Vec<(String, Value)>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if name == "sort" {
            expect_args(name, &args, 0, 0, location)?;
            let key = take_kwarg(&mut kwargs, "key");
            let reverse = take_kwarg(&mut kwargs, "reverse").is_some_and(|v| v.is_truthy());
            reject_kwargs(name, &kwargs, location)?;

            let items = std::mem::take(&mut *list.borrow_mut());
            let sorted = self.sort_values(items, key.as_ref(), reverse, location)?;
            *list.borrow_mut() = sorted;
            return Ok(Value::None);
        }
        reject_kwargs(name, &kwargs, location)?;

        match name {
            "append" => {
                expect_args(name, &args, 1, 1, location)?;
                self.check_sequence_len(list.len() + 1, location)?;
                list.borrow_mut().extend(args);
                Ok(Value::None)
            }

            "extend" => {
                expect_args(name, &args, 1, 1, location)?;
                let extra = self.collect_iterable(&args[0], location)?;
                self.check_sequence_len(list.len() + extra.len(), location)?;
                list.borrow_mut().extend(extra);
                Ok(Value::None)
            }

            "insert" => {
                expect_args(name, &args, 2, 2, location)?;
                let index = self.expect_int(&args[0], location)?;
                self.check_sequence_len(list.len() + 1, location)?;
                let len = list.len() as i64;
                let index = if index < 0 { (index + len).max(0) } else { index.min(len) };
                list.borrow_mut().insert(index as usize, args[1].clone());
                Ok(Value::None)
            }

            "pop" => {
                expect_args(name, &args, 0, 1, location)?;
                let len = list.len();
                if len == 0 {
                    return Err(RuntimeError::index_error("pop from empty list", location));
                }
                let index = match args.first() {
                    Some(value) => self.expect_int(value, location)?,
                    None => -1,
                };
                let normalized = if index < 0 { index + len as i64 } else { index };
                if !(0..len as i64).contains(&normalized) {
                    return Err(RuntimeError::index_error("pop index out of range", location));
                }
                Ok(list.borrow_mut().remove(normalized as usize))
            }

            "remove" | "index" | "count" => {
                expect_args(name, &args, 1, 1, location)?;
                let items = list.snapshot();
                let mut positions = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    if self.values_equal(item, &args[0], location)? {
                        positions.push(i);
                        if name != "count" {
                            break;
                        }
                    }
                }
                match (name, positions.first()) {
                    ("count", _) => Ok(Value::Int(positions.len() as i64)),
                    ("index", Some(&i)) => Ok(Value::Int(i as i64)),
                    ("remove", Some(&i)) => {
                        list.borrow_mut().remove(i);
                        Ok(Value::None)
                    }
                    ("index", None) => Err(RuntimeError::value_error(
                        format!("{} is not in list", self.repr(&args[0], location)?),
                        location,
                    )),
                    _ => Err(RuntimeError::value_error(
                        "list.remove(x): x not in list",
                        location,
                    )),
                }
            }

            "reverse" => {
                expect_args(name, &args, 0, 0, location)?;
                list.borrow_mut().reverse();
                Ok(Value::None)
            }

            "clear" => {
                expect_args(name, &args, 0, 0, location)?;
                let old = std::mem::take(&mut *list.borrow_mut());
                drop(old);
                Ok(Value::None)
            }

            "copy" => {
                expect_args(name, &args, 0, 0, location)?;
                Ok(Value::list(list.snapshot()))
            }

            _ => Err(RuntimeError::attribute_error(
                format!("'list' object has no attribute '{}'", name),
                location,
            )),
        }
    }

    fn call_dict_method(
        &mut self,
        dict: &DictRef,
        name: &str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match name {
            "keys" => {
                expect_args(name, &args, 0, 0, location)?;
                Ok(Value::list(dict.keys()))
            }

            "values" => {
                expect_args(name, &args, 0, 0, location)?;
                Ok(Value::list(dict.values()))
            }

            "items" => {
                expect_args(name, &args, 0, 0, location)?;
                let pairs = dict
                    .items()
                    .into_iter()
                    .map(|(key, value)| Value::tuple(vec![key, value]))
                    .collect();
                Ok(Value::list(pairs))
            }

            "get" => {
                expect_args(name, &args, 1, 2, location)?;
                let key = self.hash_key(&args[0], location)?;
                Ok(dict
                    .get(&key)
                    .unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
            }

            "pop" => {
                expect_args(name, &args, 1, 2, location)?;
                let key = self.hash_key(&args[0], location)?;
                let removed = dict.borrow_mut().shift_remove(&key);
                match (removed, args.get(1)) {
                    (Some((_, value)), _) => Ok(value),
                    (None, Some(default)) => Ok(default.clone()),
                    (None, None) => Err(RuntimeError::Key {
                        key: self.repr(&args[0], location)?,
                        location,
                    }),
                }
            }

            "setdefault" => {
                expect_args(name, &args, 1, 2, location)?;
                let key = self.hash_key(&args[0], location)?;
                if let Some(existing) = dict.get(&key) {
                    return Ok(existing);
                }
                let default = args.get(1).cloned().unwrap_or(Value::None);
                dict.insert(key, args[0].clone(), default.clone());
                Ok(default)
            }

            "update" => {
                expect_args(name, &args, 1, 1, location)?;
                let Value::Dict(other) = &args[0] else {
                    return Err(RuntimeError::type_error(
                        format!("'{}' object is not a mapping", args[0].type_name()),
                        location,
                    ));
                };
                for (key, value) in other.items() {
                    let hashed = self.hash_key(&key, location)?;
                    dict.insert(hashed, key, value);
                }
                Ok(Value::None)
            }

            "clear" => {
                expect_args(name, &args, 0, 0, location)?;
                let old = std::mem::take(&mut *dict.borrow_mut());
                drop(old);
                Ok(Value::None)
            }

            "copy" => {
                expect_args(name, &args, 0, 0, location)?;
                Ok(Value::Dict(DictRef::new(dict.borrow().clone())))
            }

            _ => Err(RuntimeError::attribute_error(
                format!("'dict' object has no attribute '{}'", name),
                location,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{split_whitespace, title_case};
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
    fn test_title_and_split_helpers() {
        assert_eq!(title_case("hello wORLD it's"), "Hello World It'S");
        assert_eq!(split_whitespace("  a  b c ", None), vec!["a", "b", "c"]);
        assert_eq!(split_whitespace("a b c", Some(1)), vec!["a", "b c"]);
    }

    #[test]
    fn test_string_methods() {
        assert_eq!(run("print('Hi'.upper(), 'Hi'.lower(), 'hello world'.title())\n"), Ok("HI hi Hello World\n".into()));
        assert_eq!(run("print('  pad  '.strip() + '|', 'xxhixx'.strip('x'))\n"), Ok("pad| hi\n".into()));
        assert_eq!(run("print('a,b,,c'.split(','), 'one two'.split())\n"), Ok("['a', 'b', '', 'c'] ['one', 'two']\n".into()));
        assert_eq!(run("print('-'.join(['a', 'b', 'c']))\n"), Ok("a-b-c\n".into()));
        assert_eq!(run("print('banana'.replace('a', 'o', 2), 'banana'.count('an'), 'héllo'.find('l'))\n"), Ok("bonona 2 2\n".into()));
        assert_eq!(run("print('{} + {} = {}'.format(1, 2, 3))\n"), Ok("1 + 2 = 3\n".into()));
        assert_eq!(run("print('42'.isdigit(), 'abc'.isalpha(), '7'.zfill(3), 'ab'.center(6, '*'))\n"), Ok("True True 007 **ab**\n".into()));
        assert_eq!(
            run("', '.join([1, 2])\n"),
            Err("TypeError: sequence item 0: expected str instance, int found".into())
        );
    }

    #[test]
    fn test_list_methods() {
        let source = "nums = [3, 1, 2]\nnums.append(5)\nnums.insert(0, 9)\nnums.sort()\nprint(nums, nums.pop(), nums.index(2))\nnums.remove(1)\nnums.reverse()\nprint(nums, nums.count(3))\n";
        assert_eq!(run(source), Ok("[1, 2, 3, 5] 9 1\n[5, 3, 2] 1\n".into()));
        assert_eq!(run("[].pop()\n"), Err("IndexError: pop from empty list".into()));
        assert_eq!(run("[1].remove(2)\n"), Err("ValueError: list.remove(x): x not in list".into()));
    }

    #[test]
    fn test_dict_methods() {
        let source = "ages = {'ann': 9, 'bo': 11}\nprint(ages.get('cy', 0), ages.get('ann'))\nages.update({'cy': 7})\nfor name, age in ages.items():\n    print(name, age)\nprint(ages.pop('bo'), list(ages.keys()), list(ages.values()))\n";
        assert_eq!(run(source), Ok("0 9\nann 9\nbo 11\ncy 7\n11 ['ann', 'cy'] [9, 7]\n".into()));
        assert_eq!(run("{}.pop('x')\n"), Err("KeyError: 'x'".into()));
    }
}
