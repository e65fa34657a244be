use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{Number, Value};
use crate::parser::ast::{SourceLocation, UnOp};

impl Interpreter {
    pub(crate) fn unary_op(
        &self,
        op: UnOp,
        operand: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if op == UnOp::Not {
            return Ok(Value::Bool(!operand.is_truthy()));
        }

        let number = operand.as_number().ok_or_else(|| {
            let symbol = if op == UnOp::Neg { "-" } else { "+" };
            RuntimeError::type_error(
                format!(
                    "bad operand type for unary {}: '{}'",
                    symbol,
                    operand.type_name()
                ),
                location,
            )
        })?;

        match (op, number) {
            (UnOp::Neg, Number::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::overflow("integer result is too large for this playground", location)),
            (UnOp::Neg, Number::Float(f)) => Ok(Value::Float(-f)),
            (_, Number::Int(n)) => Ok(Value::Int(n)),
            (_, Number::Float(f)) => Ok(Value::Float(f)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::executor::ExecutionLimits;
    use crate::interpreter::engine::Interpreter;
    use crate::memory::value::Value;
    use crate::parser::ast::{SourceLocation, UnOp};

    #[test]
    fn test_unary_operators() {
        let interp = Interpreter::new(ExecutionLimits::default());
        let loc = SourceLocation::default();

        assert_eq!(interp.unary_op(UnOp::Neg, &Value::Int(5), loc).unwrap().to_repr().unwrap(), "-5");
        assert_eq!(interp.unary_op(UnOp::Plus, &Value::Bool(true), loc).unwrap().to_repr().unwrap(), "1");
        assert_eq!(interp.unary_op(UnOp::Not, &Value::str(""), loc).unwrap().to_repr().unwrap(), "True");

        let err = interp.unary_op(UnOp::Neg, &Value::str("a"), loc).unwrap_err();
        assert_eq!(err.raw_message(), "TypeError: bad operand type for unary -: 'str'");
    }
}
