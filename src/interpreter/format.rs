//! String formatting: format specs, `str.format` and `%` interpolation
//!
//! [`FormatSpec`] implements the format-spec mini-language used by f-string
//! fields and `str.format` (`[[fill]align][sign][#][0][width][,|_][.precision][type]`).
//! printf-style `%` formatting is translated into the same spec before rendering.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{format_float, Number, Value};
use crate::parser::ast::SourceLocation;

/// Largest float precision the renderer accepts
const MAX_FLOAT_PRECISION: usize = u16::MAX as usize;

/// A parsed format specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormatSpec {
    pub fill: char,
    pub align: Option<char>,
    pub sign: char,
    pub alternate: bool,
    pub zero: bool,
    pub width: usize,
    pub grouping: Option<char>,
    pub precision: Option<usize>,
    pub kind: Option<char>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        FormatSpec {
            fill: ' ',
            align: None,
            sign: '-',
            alternate: false,
            zero: false,
            width: 0,
            grouping: None,
            precision: None,
            kind: None,
        }
    }
}

impl FormatSpec {
    /// Parse a spec, `None` if it is malformed
    pub fn parse(spec: &str) -> Option<FormatSpec> {
        let chars: Vec<char> = spec.chars().collect();
        let mut parsed = FormatSpec::default();
        let mut i = 0;

        let is_align = |c: char| matches!(c, '<' | '>' | '^' | '=');
        if chars.len() >= 2 && is_align(chars[1]) {
            parsed.fill = chars[0];
            parsed.align = Some(chars[1]);
            i = 2;
        } else if chars.first().copied().is_some_and(is_align) {
            parsed.align = Some(chars[0]);
            i = 1;
        }

        if let Some(&(c @ ('+' | '-' | ' '))) = chars.get(i) {
            parsed.sign = c;
            i += 1;
        }
        if chars.get(i) == Some(&'#') {
            parsed.alternate = true;
            i += 1;
        }
        if chars.get(i) == Some(&'0') {
            parsed.zero = true;
            i += 1;
        }

        let start = i;
        while chars.get(i).is_some_and(char::is_ascii_digit) {
            i += 1;
        }
        if i > start {
            parsed.width = chars[start..i].iter().collect::<String>().parse().ok()?;
        }

        if let Some(&(c @ (',' | '_'))) = chars.get(i) {
            parsed.grouping = Some(c);
            i += 1;
        }

        if chars.get(i) == Some(&'.') {
            i += 1;
            let start = i;
            while chars.get(i).is_some_and(char::is_ascii_digit) {
                i += 1;
            }
            if i == start {
                return None;
            }
            parsed.precision = Some(chars[start..i].iter().collect::<String>().parse().ok()?);
        }

        if let Some(&c) = chars.get(i) {
            parsed.kind = Some(c);
            i += 1;
        }

        (i == chars.len()).then_some(parsed)
    }

    /// Pad `sign + body` out to the requested width
    fn pad(&self, sign: &str, body: &str, default_align: char) -> String {
        let (fill, align) = match (self.zero, self.align) {
            (true, None) => ('0', '='),
            (_, Some(align)) => (self.fill, align),
            (false, None) => (self.fill, default_align),
        };

        let len = sign.chars().count() + body.chars().count();
        if self.width <= len {
            return format!("{}{}", sign, body);
        }

        let padding = self.width - len;
        let fills = |n: usize| fill.to_string().repeat(n);
        match align {
            '<' => format!("{}{}{}", sign, body, fills(padding)),
            '^' => format!(
                "{}{}{}{}",
                fills(padding / 2),
                sign,
                body,
                fills(padding - padding / 2)
            ),
            '=' => format!("{}{}{}", sign, fills(padding), body),
            _ => format!("{}{}{}", fills(padding), sign, body),
        }
    }

    fn sign_for(&self, negative: bool) -> &'static str {
        match (negative, self.sign) {
            (true, _) => "-",
            (false, '+') => "+",
            (false, ' ') => " ",
            _ => "",
        }
    }
}

/// Insert `separator` every `every` digits from the right of the integer part
fn group_digits(digits: &str, separator: char, every: usize) -> String {
    let (int_part, rest) = match digits.find(|c: char| !c.is_ascii_alphanumeric()) {
        Some(pos) => digits.split_at(pos),
        None => (digits, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / every + rest.len());
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % every == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped.push_str(rest);
    grouped
}

/// `{:e}` with Python's exponent style (`1.5e+05`)
fn format_exponent(f: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, f);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let text = format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    if upper {
        text.to_uppercase()
    } else {
        text
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    match text.split_once('e') {
        Some((mantissa, exponent)) => format!("{}e{}", strip_trailing_zeros(mantissa), exponent),
        None if text.contains('.') => text.trim_end_matches('0').trim_end_matches('.').to_string(),
        None => text.to_string(),
    }
}

/// The `g` presentation type
fn format_general(f: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let precision = precision.max(1);
    let exponent = if f == 0.0 {
        0
    } else {
        let scientific = format!("{:.*e}", precision - 1, f);
        scientific
            .split_once('e')
            .and_then(|(_, e)| e.parse::<i32>().ok())
            .unwrap_or(0)
    };

    let text = if -4 <= exponent && exponent < precision as i32 {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, f)
    } else {
        format_exponent(f, precision - 1, upper)
    };

    if alternate {
        text
    } else {
        strip_trailing_zeros(&text)
    }
}

fn format_float_body(f: f64, spec: &FormatSpec) -> String {
    let upper = spec.kind.is_some_and(|k| k.is_ascii_uppercase());
    if !f.is_finite() {
        let text = if f.is_nan() { "nan" } else { "inf" };
        return if upper { text.to_uppercase() } else { text.to_string() };
    }

    let body = match (spec.kind, spec.precision) {
        (Some('f' | 'F'), precision) => format!("{:.*}", precision.unwrap_or(6), f),
        (Some('e' | 'E'), precision) => format_exponent(f, precision.unwrap_or(6), upper),
        (Some('g' | 'G'), precision) => format_general(f, precision.unwrap_or(6), spec.alternate, upper),
        (Some('%'), precision) => format!("{:.*}%", precision.unwrap_or(6), f * 100.0),
        (_, Some(precision)) => {
            let text = format_general(f, precision, spec.alternate, false);
            if text.contains('.') || text.contains('e') {
                text
            } else {
                format!("{}.0", text)
            }
        }
        (_, None) => format_float(f),
    };

    match spec.grouping {
        Some(separator) => group_digits(&body, separator, 3),
        None => body,
    }
}

fn format_int_body(n: i64, spec: &FormatSpec) -> String {
    let magnitude = n.unsigned_abs();
    let (digits, prefix, group_every) = match spec.kind {
        Some('b') => (format!("{:b}", magnitude), "0b", 4),
        Some('o') => (format!("{:o}", magnitude), "0o", 4),
        Some('x') => (format!("{:x}", magnitude), "0x", 4),
        Some('X') => (format!("{:X}", magnitude), "0X", 4),
        _ => (magnitude.to_string(), "", 3),
    };

    let digits = match spec.grouping {
        Some(separator) => group_digits(&digits, separator, group_every),
        None => digits,
    };

    if spec.alternate {
        format!("{}{}", prefix, digits)
    } else {
        digits
    }
}

impl Interpreter {
    /// `format(value, spec)`
    pub(crate) fn format_with_spec(
        &self,
        value: &Value,
        spec: &str,
        location: SourceLocation,
    ) -> Result<String, RuntimeError> {
        let parsed = FormatSpec::parse(spec)
            .ok_or_else(|| RuntimeError::value_error("Invalid format specifier", location))?;
        self.apply_spec(value, &parsed, location)
    }

    /// Refuse widths and precisions that would build an oversized string
    fn check_spec_size(&self, value: &Value, spec: &FormatSpec, location: SourceLocation) -> Result<(), RuntimeError> {
        self.check_sequence_len(spec.width, location)?;
        if let Some(precision) = spec.precision {
            self.check_sequence_len(precision, location)?;
            let is_float = matches!(value, Value::Float(_))
                || matches!(spec.kind, Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%'));
            if is_float && precision > MAX_FLOAT_PRECISION {
                return Err(RuntimeError::value_error(
                    "Too many decimal digits in format string",
                    location,
                ));
            }
        }
        Ok(())
    }

    fn apply_spec(&self, value: &Value, spec: &FormatSpec, location: SourceLocation) -> Result<String, RuntimeError> {
        self.check_spec_size(value, spec, location)?;
        let unknown = |kind: char| {
            RuntimeError::value_error(
                format!(
                    "Unknown format code '{}' for object of type '{}'",
                    kind,
                    value.type_name()
                ),
                location,
            )
        };

        match value {
            Value::Str(text) => {
                if let Some(kind) = spec.kind.filter(|k| *k != 's') {
                    return Err(unknown(kind));
                }
                if spec.sign != '-' {
                    return Err(RuntimeError::value_error(
                        "Sign not allowed in string format specifier",
                        location,
                    ));
                }
                if spec.align == Some('=') {
                    return Err(RuntimeError::value_error(
                        "'=' alignment not allowed in string format specifier",
                        location,
                    ));
                }
                let body: String = match spec.precision {
                    Some(precision) => text.chars().take(precision).collect(),
                    None => text.to_string(),
                };
                Ok(spec.pad("", &body, '<'))
            }

            Value::Int(_) | Value::Bool(_) | Value::Float(_) => {
                let number = value.as_number().unwrap_or(Number::Int(0));
                match (number, spec.kind) {
                    (Number::Int(n), None | Some('d' | 'n' | 'b' | 'o' | 'x' | 'X')) => {
                        let body = format_int_body(n, spec);
                        Ok(spec.pad(spec.sign_for(n < 0), &body, '>'))
                    }
                    (Number::Int(n), Some('c')) => {
                        let ch = u32::try_from(n).ok().and_then(char::from_u32).ok_or_else(|| {
                            RuntimeError::overflow("%c arg not in range(0x110000)", location)
                        })?;
                        Ok(spec.pad("", &ch.to_string(), '<'))
                    }
                    (number, None | Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%')) => {
                        let f = number.as_f64();
                        let body = format_float_body(f.abs(), spec);
                        Ok(spec.pad(spec.sign_for(f.is_sign_negative() && !f.is_nan()), &body, '>'))
                    }
                    (_, Some(kind)) => Err(unknown(kind)),
                }
            }

            other => Err(RuntimeError::type_error(
                format!(
                    "unsupported format string passed to {}.__format__",
                    other.type_name()
                ),
                location,
            )),
        }
    }

    /// `template.format(*args, **kwargs)`
    pub(crate) fn format_template(
        &self,
        template: &str,
        args: &[Value],
        kwargs: &[(String, Value)],
        location: SourceLocation,
    ) -> Result<String, RuntimeError> {
        let mut out = String::new();
        let mut chars = template.chars().peekable();
        let mut auto_index = 0;
        let mut manual = false;

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '}' => {
                    return Err(RuntimeError::value_error(
                        "Single '}' encountered in format string",
                        location,
                    ))
                }
                '{' => {
                    let mut field = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        field.push(c);
                    }
                    if !closed {
                        return Err(RuntimeError::value_error(
                            "expected '}' before end of string",
                            location,
                        ));
                    }

                    let (head, spec) = match field.split_once(':') {
                        Some((head, spec)) => (head, Some(spec)),
                        None => (field.as_str(), None),
                    };
                    let (name, conversion) = match head.split_once('!') {
                        Some((name, conv)) => (name, conv.chars().next()),
                        None => (head, None),
                    };

                    let value = if name.is_empty() {
                        if manual {
                            return Err(RuntimeError::value_error(
                                "cannot switch from manual field specification to automatic field numbering",
                                location,
                            ));
                        }
                        let index = auto_index;
                        auto_index += 1;
                        self.positional_field(args, index, location)?
                    } else if let Ok(index) = name.parse::<usize>() {
                        if auto_index > 0 {
                            return Err(RuntimeError::value_error(
                                "cannot switch from automatic field numbering to manual field specification",
                                location,
                            ));
                        }
                        manual = true;
                        self.positional_field(args, index, location)?
                    } else {
                        kwargs
                            .iter()
                            .find(|(key, _)| key == name)
                            .map(|(_, value)| value.clone())
                            .ok_or_else(|| RuntimeError::Key {
                                key: format!("'{}'", name),
                                location,
                            })?
                    };

                    out.push_str(&self.format_field(value, conversion, spec, location)?);
                    self.check_sequence_len(out.len(), location)?;
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }

    fn positional_field(&self, args: &[Value], index: usize, location: SourceLocation) -> Result<Value, RuntimeError> {
        args.get(index).cloned().ok_or_else(|| {
            RuntimeError::index_error(
                format!(
                    "Replacement index {} out of range for positional args tuple",
                    index
                ),
                location,
            )
        })
    }

    /// `template % args`
    pub(crate) fn percent_format(
        &self,
        template: &str,
        args: &Value,
        location: SourceLocation,
    ) -> Result<String, RuntimeError> {
        let values: Vec<Value> = match args {
            Value::Tuple(tuple) => tuple.items().to_vec(),
            other => vec![other.clone()],
        };
        let mut next_value = values.iter();

        let mut out = String::new();
        let mut chars = template.char_indices().peekable();
        while let Some((_, ch)) = chars.next() {
            if ch != '%' {
                out.push(ch);
                continue;
            }

            let mut spec = FormatSpec::default();
            while let Some(&(_, flag @ ('-' | '+' | ' ' | '0' | '#'))) = chars.peek() {
                match flag {
                    '-' => spec.align = Some('<'),
                    '0' => spec.zero = true,
                    '#' => spec.alternate = true,
                    sign => spec.sign = sign,
                }
                chars.next();
            }
            let mut width = String::new();
            while let Some(&(_, d)) = chars.peek().filter(|(_, c)| c.is_ascii_digit()) {
                width.push(d);
                chars.next();
            }
            if !width.is_empty() {
                spec.width = width
                    .parse()
                    .map_err(|_| RuntimeError::value_error("width too big", location))?;
            }
            if chars.peek().is_some_and(|(_, c)| *c == '.') {
                chars.next();
                let mut precision = String::new();
                while let Some(&(_, d)) = chars.peek().filter(|(_, c)| c.is_ascii_digit()) {
                    precision.push(d);
                    chars.next();
                }
                spec.precision = Some(match precision.as_str() {
                    "" => 0,
                    digits => digits
                        .parse()
                        .map_err(|_| RuntimeError::value_error("precision too big", location))?,
                });
            }
            if spec.align == Some('<') {
                spec.zero = false;
            }

            let Some((index, conversion)) = chars.next() else {
                return Err(RuntimeError::value_error("incomplete format", location));
            };
            if conversion == '%' {
                out.push('%');
                continue;
            }

            let value = next_value.next().ok_or_else(|| {
                RuntimeError::type_error("not enough arguments for format string", location)
            })?;

            let rendered = match conversion {
                's' | 'r' => {
                    let text = if conversion == 's' {
                        self.display(value, location)?
                    } else {
                        self.repr(value, location)?
                    };
                    spec.zero = false;
                    spec.sign = '-';
                    spec.align = spec.align.or(Some('>'));
                    self.apply_spec(&Value::str(text), &spec, location)?
                }
                'd' | 'i' | 'u' => {
                    let n = match value.as_number() {
                        Some(Number::Int(n)) => n,
                        Some(Number::Float(f)) => f.trunc() as i64,
                        None => {
                            return Err(RuntimeError::type_error(
                                format!(
                                    "%{} format: a real number is required, not {}",
                                    conversion,
                                    value.type_name()
                                ),
                                location,
                            ))
                        }
                    };
                    spec.kind = Some('d');
                    self.apply_spec(&Value::Int(n), &spec, location)?
                }
                'x' | 'X' | 'o' => {
                    let n = value.as_int().ok_or_else(|| {
                        RuntimeError::type_error(
                            format!(
                                "%{} format: an integer is required, not {}",
                                conversion,
                                value.type_name()
                            ),
                            location,
                        )
                    })?;
                    spec.kind = Some(conversion);
                    self.apply_spec(&Value::Int(n), &spec, location)?
                }
                'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
                    let f = self.expect_float(value, location)?;
                    spec.kind = Some(conversion);
                    self.apply_spec(&Value::Float(f), &spec, location)?
                }
                'c' => {
                    let text = match value {
                        Value::Str(s) if s.chars().count() == 1 => s.to_string(),
                        other => {
                            let code = self.expect_int(other, location)?;
                            u32::try_from(code)
                                .ok()
                                .and_then(char::from_u32)
                                .map(String::from)
                                .ok_or_else(|| {
                                    RuntimeError::overflow("%c arg not in range(0x110000)", location)
                                })?
                        }
                    };
                    spec.zero = false;
                    spec.sign = '-';
                    spec.align = spec.align.or(Some('>'));
                    self.apply_spec(&Value::str(text), &spec, location)?
                }
                other => {
                    return Err(RuntimeError::value_error(
                        format!(
                            "unsupported format character '{}' (0x{:x}) at index {}",
                            other, other as u32, index
                        ),
                        location,
                    ))
                }
            };
            out.push_str(&rendered);
            self.check_sequence_len(out.len(), location)?;
        }

        if next_value.next().is_some() {
            return Err(RuntimeError::type_error(
                "not all arguments converted during string formatting",
                location,
            ));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutionLimits;

    fn fmt(value: Value, spec: &str) -> String {
        let interp = Interpreter::new(ExecutionLimits::default());
        interp
            .format_with_spec(&value, spec, SourceLocation::default())
            .unwrap()
    }

    #[test]
    fn test_parse_spec() {
        let spec = FormatSpec::parse("*^+#010,.3f").unwrap();
        assert_eq!(spec.fill, '*');
        assert_eq!(spec.align, Some('^'));
        assert_eq!(spec.sign, '+');
        assert!(spec.alternate);
        assert!(spec.zero);
        assert_eq!(spec.width, 10);
        assert_eq!(spec.grouping, Some(','));
        assert_eq!(spec.precision, Some(3));
        assert_eq!(spec.kind, Some('f'));

        assert_eq!(FormatSpec::parse(".f"), None);
        assert_eq!(FormatSpec::parse("5dd"), None);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(fmt(Value::Float(3.14159), ".2f"), "3.14");
        assert_eq!(fmt(Value::Int(42), "05d"), "00042");
        assert_eq!(fmt(Value::Int(-42), "+6"), "   -42");
        assert_eq!(fmt(Value::Int(1234567), ","), "1,234,567");
        assert_eq!(fmt(Value::Float(1234.5), ",.2f"), "1,234.50");
        assert_eq!(fmt(Value::Int(255), "#x"), "0xff");
        assert_eq!(fmt(Value::Float(0.25), ".0%"), "25%");
        assert_eq!(fmt(Value::Float(12345.678), "e"), "1.234568e+04");
        assert_eq!(fmt(Value::Float(0.0001234), "g"), "0.0001234");
        assert_eq!(fmt(Value::Float(123456789.0), "g"), "1.23457e+08");
        assert_eq!(fmt(Value::Int(5), ".2f"), "5.00");
        assert_eq!(fmt(Value::Float(3.0), ".3"), "3.0");
    }

    #[test]
    fn test_strings_and_alignment() {
        assert_eq!(fmt(Value::str("hi"), "5"), "hi   ");
        assert_eq!(fmt(Value::str("hi"), ">5"), "   hi");
        assert_eq!(fmt(Value::str("hi"), "*^6"), "**hi**");
        assert_eq!(fmt(Value::str("hello"), ".3"), "hel");
    }

    #[test]
    fn test_bad_codes() {
        let interp = Interpreter::new(ExecutionLimits::default());
        let err = interp
            .format_with_spec(&Value::str("x"), "d", SourceLocation::default())
            .unwrap_err();
        assert_eq!(
            err.raw_message(),
            "ValueError: Unknown format code 'd' for object of type 'str'"
        );
    }

    #[test]
    fn test_str_format_method() {
        let interp = Interpreter::new(ExecutionLimits::default());
        let loc = SourceLocation::default();
        let args = [Value::str("Ada"), Value::Int(36)];
        let kwargs = [("unit".to_string(), Value::str("years"))];

        assert_eq!(
            interp.format_template("{} is {} {unit}", &args, &kwargs, loc).unwrap(),
            "Ada is 36 years"
        );
        assert_eq!(interp.format_template("{1}-{0}", &args, &[], loc).unwrap(), "36-Ada");
        assert_eq!(interp.format_template("{{x}} {0!r:>6}", &args, &[], loc).unwrap(), "{x}  'Ada'");
        assert_eq!(
            interp.format_template("{2}", &args, &[], loc).unwrap_err().raw_message(),
            "IndexError: Replacement index 2 out of range for positional args tuple"
        );
    }

    #[test]
    fn test_percent_format() {
        let interp = Interpreter::new(ExecutionLimits::default());
        let loc = SourceLocation::default();
        let args = Value::tuple(vec![Value::str("Bo"), Value::Int(7), Value::Float(2.5)]);

        assert_eq!(
            interp.percent_format("%s has %d cats and %.1f dogs (100%%)", &args, loc).unwrap(),
            "Bo has 7 cats and 2.5 dogs (100%)"
        );
        assert_eq!(interp.percent_format("[%5s|%-4d]", &Value::tuple(vec![Value::str("ab"), Value::Int(3)]), loc).unwrap(), "[   ab|3   ]");
        assert_eq!(
            interp.percent_format("%d %d", &Value::Int(1), loc).unwrap_err().raw_message(),
            "TypeError: not enough arguments for format string"
        );
        assert_eq!(
            interp.percent_format("%d", &args, loc).unwrap_err().raw_message(),
            "TypeError: %d format: a real number is required, not str"
        );
    }

    #[test]
    fn test_oversized_width_and_precision_are_refused() {
        let interp = Interpreter::new(ExecutionLimits::default().with_max_sequence_len(1000));
        let here = SourceLocation::default();

        let err = interp
            .format_with_spec(&Value::Int(1), "5000d", here)
            .unwrap_err();
        assert_eq!(err.exception_name(), "MemoryError");

        let err = interp
            .format_with_spec(&Value::Float(1.0), ".5000f", here)
            .unwrap_err();
        assert_eq!(err.exception_name(), "MemoryError");

        let err = interp
            .percent_format("%99999999999999d", &Value::Int(1), here)
            .unwrap_err();
        assert_eq!(err.exception_name(), "MemoryError");

        let err = interp
            .percent_format("%999999999999999999999999d", &Value::Int(1), here)
            .unwrap_err();
        assert_eq!(err.raw_message(), "ValueError: width too big");

        let padded = interp.format_with_spec(&Value::Int(7), "1000d", here).unwrap();
        assert_eq!(padded.len(), 1000);
    }

    #[test]
    fn test_float_precision_beyond_renderer_is_a_value_error() {
        let interp = Interpreter::new(ExecutionLimits::default());
        let err = interp
            .format_with_spec(&Value::Float(1.0), ".70000f", SourceLocation::default())
            .unwrap_err();
        assert_eq!(
            err.raw_message(),
            "ValueError: Too many decimal digits in format string"
        );
    }
}
