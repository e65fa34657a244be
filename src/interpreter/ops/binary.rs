use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{Number, Value};
use crate::parser::ast::{BinOp, SourceLocation};

const INT_TOO_LARGE: &str = "integer result is too large for this playground";

impl Interpreter {
    /// Evaluate `left <op> right`
    pub(crate) fn binary_op(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
            return match (a, b) {
                (Number::Int(a), Number::Int(b)) => self.int_op(op, a, b, location),
                (a, b) => self.float_op(op, a.as_f64(), b.as_f64(), location),
            };
        }

        match (op, left, right) {
            (BinOp::Add, Value::Str(a), Value::Str(b)) => {
                self.check_sequence_len(a.len() + b.len(), location)?;
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Value::str(joined))
            }
            (BinOp::Add, Value::List(a), Value::List(b)) => {
                let mut items = a.snapshot();
                items.extend(b.snapshot());
                self.check_sequence_len(items.len(), location)?;
                Ok(Value::list(items))
            }
            (BinOp::Add, Value::Tuple(a), Value::Tuple(b)) => {
                let mut items = a.items().to_vec();
                items.extend_from_slice(b.items());
                self.check_sequence_len(items.len(), location)?;
                Ok(Value::tuple(items))
            }
            (BinOp::Add, Value::Str(_) | Value::List(_) | Value::Tuple(_), other) => {
                Err(RuntimeError::type_error(
                    format!(
                        "can only concatenate {} (not \"{}\") to {}",
                        left.type_name(),
                        other.type_name(),
                        left.type_name()
                    ),
                    location,
                ))
            }

            (BinOp::Mul, seq @ (Value::Str(_) | Value::List(_) | Value::Tuple(_)), count)
            | (BinOp::Mul, count, seq @ (Value::Str(_) | Value::List(_) | Value::Tuple(_))) => {
                match count {
                    Value::Int(_) | Value::Bool(_) => {
                        let n = count.as_int().unwrap_or(0).max(0) as usize;
                        self.repeat(seq, n, location)
                    }
                    other => Err(RuntimeError::type_error(
                        format!(
                            "can't multiply sequence by non-int of type '{}'",
                            other.type_name()
                        ),
                        location,
                    )),
                }
            }

            (BinOp::Mod, Value::Str(template), args) => {
                let rendered = self.percent_format(template, args, location)?;
                Ok(Value::str(rendered))
            }

            _ => Err(RuntimeError::type_error(
                format!(
                    "unsupported operand type(s) for {}: '{}' and '{}'",
                    op.symbol(),
                    left.type_name(),
                    right.type_name()
                ),
                location,
            )),
        }
    }

    fn int_op(&self, op: BinOp, a: i64, b: i64, location: SourceLocation) -> Result<Value, RuntimeError> {
        let overflow = || RuntimeError::overflow(INT_TOO_LARGE, location);

        let result = match op {
            BinOp::Add => a.checked_add(b).ok_or_else(overflow)?,
            BinOp::Sub => a.checked_sub(b).ok_or_else(overflow)?,
            BinOp::Mul => a.checked_mul(b).ok_or_else(overflow)?,
            BinOp::Div => {
                if b == 0 {
                    return Err(RuntimeError::zero_division("division by zero", location));
                }
                return Ok(Value::Float(a as f64 / b as f64));
            }
            BinOp::FloorDiv => {
                if b == 0 {
                    return Err(RuntimeError::zero_division(
                        "integer division or modulo by zero",
                        location,
                    ));
                }
                let q = a.checked_div(b).ok_or_else(overflow)?;
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    q - 1
                } else {
                    q
                }
            }
            BinOp::Mod => {
                if b == 0 {
                    return Err(RuntimeError::zero_division(
                        "integer division or modulo by zero",
                        location,
                    ));
                }
                let r = a.checked_rem(b).unwrap_or(0);
                if r != 0 && ((r < 0) != (b < 0)) {
                    r + b
                } else {
                    r
                }
            }
            BinOp::Pow => {
                if b < 0 {
                    return self.float_op(op, a as f64, b as f64, location);
                }
                match (a, u32::try_from(b)) {
                    (_, Ok(exp)) => a.checked_pow(exp).ok_or_else(overflow)?,
                    (0 | 1, Err(_)) => a,
                    (-1, Err(_)) if b % 2 == 0 => 1,
                    (-1, Err(_)) => -1,
                    (_, Err(_)) => return Err(overflow()),
                }
            }
        };

        Ok(Value::Int(result))
    }

    fn float_op(&self, op: BinOp, a: f64, b: f64, location: SourceLocation) -> Result<Value, RuntimeError> {
        let result = match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => {
                if b == 0.0 {
                    return Err(RuntimeError::zero_division("float division by zero", location));
                }
                a / b
            }
            BinOp::FloorDiv => {
                if b == 0.0 {
                    return Err(RuntimeError::zero_division(
                        "float floor division by zero",
                        location,
                    ));
                }
                (a / b).floor()
            }
            BinOp::Mod => {
                if b == 0.0 {
                    return Err(RuntimeError::zero_division("float modulo", location));
                }
                let r = a % b;
                if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                    r + b
                } else {
                    r
                }
            }
            BinOp::Pow => {
                if a == 0.0 && b < 0.0 {
                    return Err(RuntimeError::zero_division(
                        "0.0 cannot be raised to a negative power",
                        location,
                    ));
                }
                if a < 0.0 && b.fract() != 0.0 {
                    return Err(RuntimeError::value_error(
                        "negative number cannot be raised to a fractional power",
                        location,
                    ));
                }
                let result = a.powf(b);
                if result.is_infinite() && a.is_finite() && b.is_finite() {
                    return Err(RuntimeError::overflow(
                        "(34, 'Numerical result out of range')",
                        location,
                    ));
                }
                result
            }
        };

        Ok(Value::Float(result))
    }

    /// `seq * n`
    fn repeat(&self, seq: &Value, n: usize, location: SourceLocation) -> Result<Value, RuntimeError> {
        match seq {
            Value::Str(s) => {
                self.check_sequence_len(s.len().saturating_mul(n), location)?;
                Ok(Value::str(s.repeat(n)))
            }
            Value::List(list) => {
                let items = list.snapshot();
                self.check_sequence_len(items.len().saturating_mul(n), location)?;
                self.charge(items.len() * n, location)?;
                Ok(Value::list(repeat_items(&items, n)))
            }
            Value::Tuple(tuple) => {
                self.check_sequence_len(tuple.len().saturating_mul(n), location)?;
                self.charge(tuple.len() * n, location)?;
                Ok(Value::tuple(repeat_items(tuple.items(), n)))
            }
            _ => Ok(seq.clone()),
        }
    }
}

fn repeat_items(items: &[Value], n: usize) -> Vec<Value> {
    if items.is_empty() {
        return Vec::new();
    }
    let mut repeated = Vec::with_capacity(items.len() * n);
    for _ in 0..n {
        repeated.extend_from_slice(items);
    }
    repeated
}

#[cfg(test)]
mod tests {
    use crate::executor::ExecutionLimits;
    use crate::interpreter::engine::Interpreter;
    use crate::memory::value::Value;
    use crate::parser::ast::{BinOp, SourceLocation};

    fn eval(op: BinOp, a: Value, b: Value) -> Result<String, String> {
        let interp = Interpreter::new(ExecutionLimits::default());
        interp
            .binary_op(op, &a, &b, SourceLocation::default())
            .map(|v| v.to_repr().unwrap())
            .map_err(|e| e.raw_message())
    }

    #[test]
    fn test_division_always_gives_float() {
        assert_eq!(eval(BinOp::Div, Value::Int(7), Value::Int(2)), Ok("3.5".into()));
        assert_eq!(eval(BinOp::Div, Value::Int(4), Value::Int(2)), Ok("2.0".into()));
    }

    #[test]
    fn test_floor_division_and_modulo_follow_divisor_sign() {
        assert_eq!(eval(BinOp::FloorDiv, Value::Int(-7), Value::Int(2)), Ok("-4".into()));
        assert_eq!(eval(BinOp::Mod, Value::Int(-7), Value::Int(2)), Ok("1".into()));
        assert_eq!(eval(BinOp::Mod, Value::Int(7), Value::Int(-2)), Ok("-1".into()));
        assert_eq!(eval(BinOp::Mod, Value::Float(5.5), Value::Int(2)), Ok("1.5".into()));
    }

    #[test]
    fn test_zero_division_messages() {
        assert_eq!(
            eval(BinOp::Div, Value::Int(10), Value::Int(0)),
            Err("ZeroDivisionError: division by zero".into())
        );
        assert_eq!(
            eval(BinOp::FloorDiv, Value::Int(10), Value::Int(0)),
            Err("ZeroDivisionError: integer division or modulo by zero".into())
        );
        assert_eq!(
            eval(BinOp::Div, Value::Float(1.0), Value::Int(0)),
            Err("ZeroDivisionError: float division by zero".into())
        );
    }

    #[test]
    fn test_power() {
        assert_eq!(eval(BinOp::Pow, Value::Int(2), Value::Int(10)), Ok("1024".into()));
        assert_eq!(eval(BinOp::Pow, Value::Int(2), Value::Int(-1)), Ok("0.5".into()));
        assert!(eval(BinOp::Pow, Value::Int(10), Value::Int(100))
            .unwrap_err()
            .starts_with("OverflowError"));
    }

    #[test]
    fn test_pow_with_huge_exponent_on_unit_bases() {
        let huge = Value::Int(10_000_000_000);
        assert_eq!(eval(BinOp::Pow, Value::Int(1), huge.clone()), Ok("1".into()));
        assert_eq!(eval(BinOp::Pow, Value::Int(0), huge.clone()), Ok("0".into()));
        assert_eq!(eval(BinOp::Pow, Value::Int(-1), huge.clone()), Ok("1".into()));
        assert_eq!(eval(BinOp::Pow, Value::Int(-1), Value::Int(10_000_000_001)), Ok("-1".into()));
        assert!(eval(BinOp::Pow, Value::Int(2), huge)
            .unwrap_err()
            .starts_with("OverflowError"));
    }

    #[test]
    fn test_list_and_tuple_repetition() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(eval(BinOp::Mul, list, Value::Int(2)), Ok("[1, 2, 1, 2]".into()));
        let tuple = Value::tuple(vec![Value::Int(7)]);
        assert_eq!(eval(BinOp::Mul, tuple, Value::Int(3)), Ok("(7, 7, 7)".into()));
    }

    #[test]
    fn test_sequence_operators() {
        assert_eq!(eval(BinOp::Mul, Value::str("ab"), Value::Int(3)), Ok("'ababab'".into()));
        assert_eq!(eval(BinOp::Mul, Value::Int(2), Value::list(vec![Value::Int(0)])), Ok("[0, 0]".into()));
        assert_eq!(eval(BinOp::Mul, Value::str("ab"), Value::Int(-1)), Ok("''".into()));
        assert_eq!(
            eval(BinOp::Add, Value::str("age: "), Value::Int(10)),
            Err("TypeError: can only concatenate str (not \"int\") to str".into())
        );
        assert_eq!(
            eval(BinOp::Sub, Value::str("a"), Value::Int(1)),
            Err("TypeError: unsupported operand type(s) for -: 'str' and 'int'".into())
        );
    }

    #[test]
    fn test_bool_counts_as_int() {
        assert_eq!(eval(BinOp::Add, Value::Bool(true), Value::Bool(true)), Ok("2".into()));
    }
}
