//! Comparison and membership operators
//!
//! Ordering follows Python: numbers compare by value across int/float/bool,
//! strings compare lexicographically by code point, and lists/tuples compare
//! element by element. Mixing unrelated types in an ordering is a `TypeError`.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{Number, Value, MAX_REPR_DEPTH};
use crate::parser::ast::{CmpOp, SourceLocation};
use std::cmp::Ordering;

fn apply_ordering(op: CmpOp, ordering: Option<Ordering>) -> bool {
    // `None` is an unordered float comparison (NaN): everything but != is false
    let Some(ordering) = ordering else {
        return op == CmpOp::Ne;
    };
    match op {
        CmpOp::Lt => ordering == Ordering::Less,
        CmpOp::Le => ordering != Ordering::Greater,
        CmpOp::Gt => ordering == Ordering::Greater,
        CmpOp::Ge => ordering != Ordering::Less,
        CmpOp::Eq => ordering == Ordering::Equal,
        CmpOp::Ne => ordering != Ordering::Equal,
        CmpOp::In | CmpOp::NotIn | CmpOp::Is | CmpOp::IsNot => false,
    }
}

impl Interpreter {
    /// Evaluate a single `left <op> right` comparison
    pub(crate) fn compare_op(
        &self,
        op: CmpOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        match op {
            CmpOp::Eq => self.values_equal(left, right, location),
            CmpOp::Ne => Ok(!self.values_equal(left, right, location)?),
            CmpOp::Is => Ok(left.is_same(right)),
            CmpOp::IsNot => Ok(!left.is_same(right)),
            CmpOp::In => self.contains(right, left, location),
            CmpOp::NotIn => Ok(!self.contains(right, left, location)?),
            CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge => {
                self.order_values(op, left, right, 0, location)
            }
        }
    }

    pub(crate) fn values_equal(
        &self,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        left.py_eq(right).map_err(|_| self.too_deep(location))
    }

    /// Total order used by `sorted`, `min` and `max`
    pub(crate) fn less_than(
        &self,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        self.order_values(CmpOp::Lt, left, right, 0, location)
    }

    fn order_values(
        &self,
        op: CmpOp,
        left: &Value,
        right: &Value,
        depth: usize,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        if depth > MAX_REPR_DEPTH {
            return Err(self.too_deep(location));
        }

        if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
            let ordering = match (a, b) {
                (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
                (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
            };
            return Ok(apply_ordering(op, ordering));
        }

        match (left, right) {
            (Value::Str(a), Value::Str(b)) => Ok(apply_ordering(op, Some(a.cmp(b)))),
            (Value::List(a), Value::List(b)) => {
                let (xs, ys) = (a.snapshot(), b.snapshot());
                self.order_sequences(op, &xs, &ys, depth, location)
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                self.order_sequences(op, a.items(), b.items(), depth, location)
            }
            _ => Err(RuntimeError::type_error(
                format!(
                    "'{}' not supported between instances of '{}' and '{}'",
                    op.symbol(),
                    left.type_name(),
                    right.type_name()
                ),
                location,
            )),
        }
    }

    fn order_sequences(
        &self,
        op: CmpOp,
        xs: &[Value],
        ys: &[Value],
        depth: usize,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        for (x, y) in xs.iter().zip(ys) {
            if !self.values_equal(x, y, location)? {
                return self.order_values(op, x, y, depth + 1, location);
            }
        }
        Ok(apply_ordering(op, Some(xs.len().cmp(&ys.len()))))
    }

    /// `item in container`
    pub(crate) fn contains(
        &self,
        container: &Value,
        item: &Value,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        match container {
            Value::Str(haystack) => match item {
                Value::Str(needle) => Ok(haystack.contains(&**needle)),
                other => Err(RuntimeError::type_error(
                    format!(
                        "'in <string>' requires string as left operand, not {}",
                        other.type_name()
                    ),
                    location,
                )),
            },
            Value::List(list) => {
                let candidates = list.snapshot();
                self.charge(candidates.len(), location)?;
                for candidate in candidates {
                    if self.values_equal(&candidate, item, location)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Value::Tuple(tuple) => {
                self.charge(tuple.len(), location)?;
                for candidate in tuple.items() {
                    if self.values_equal(candidate, item, location)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Value::Dict(dict) => {
                let key = self.hash_key(item, location)?;
                Ok(dict.borrow().contains_key(&key))
            }
            Value::Range(range) => Ok(match item.as_number() {
                Some(Number::Int(n)) => range.contains(n),
                Some(Number::Float(f)) if f.fract() == 0.0 => range.contains(f as i64),
                _ => false,
            }),
            other => Err(RuntimeError::type_error(
                format!("argument of type '{}' is not iterable", other.type_name()),
                location,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::executor::ExecutionLimits;
    use crate::interpreter::engine::Interpreter;
    use crate::memory::value::Value;
    use crate::parser::ast::{CmpOp, SourceLocation};

    fn compare(op: CmpOp, a: Value, b: Value) -> Result<bool, String> {
        let interp = Interpreter::new(ExecutionLimits::default());
        interp
            .compare_op(op, &a, &b, SourceLocation::default())
            .map_err(|e| e.raw_message())
    }

    #[test]
    fn test_mixed_numeric_ordering() {
        assert_eq!(compare(CmpOp::Lt, Value::Int(1), Value::Float(1.5)), Ok(true));
        assert_eq!(compare(CmpOp::Ge, Value::Bool(true), Value::Int(1)), Ok(true));
        assert_eq!(compare(CmpOp::Lt, Value::Float(f64::NAN), Value::Int(1)), Ok(false));
    }

    #[test]
    fn test_sequence_ordering() {
        let a = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::list(vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(compare(CmpOp::Lt, a.clone(), b), Ok(true));

        let shorter = Value::list(vec![Value::Int(1)]);
        assert_eq!(compare(CmpOp::Gt, a, shorter), Ok(true));
        assert_eq!(compare(CmpOp::Lt, Value::str("apple"), Value::str("banana")), Ok(true));
    }

    #[test]
    fn test_unorderable_types() {
        assert_eq!(
            compare(CmpOp::Lt, Value::Int(1), Value::str("2")),
            Err("TypeError: '<' not supported between instances of 'int' and 'str'".into())
        );
    }

    #[test]
    fn test_membership() {
        let list = Value::list(vec![Value::Int(1), Value::str("two")]);
        assert_eq!(compare(CmpOp::In, Value::str("two"), list.clone()), Ok(true));
        assert_eq!(compare(CmpOp::NotIn, Value::Float(1.0), list), Ok(false));
        assert_eq!(compare(CmpOp::In, Value::str("ell"), Value::str("hello")), Ok(true));
        assert_eq!(
            compare(CmpOp::In, Value::Int(1), Value::str("123")),
            Err("TypeError: 'in <string>' requires string as left operand, not int".into())
        );
    }
}
