//! Name resolution and assignment targets
//!
//! - Loading names (locals, globals, then built-ins)
//! - Binding `x = ...`, `x[i] = ...` and unpacking `a, b = ...`
//! - `del` of names and subscripts

use crate::interpreter::builtins;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::memory::Lookup;
use crate::parser::ast::*;

impl Interpreter {
    /// Resolve a name in the current scope, falling back to built-ins
    pub(crate) fn load_name(&self, name: &str, location: SourceLocation) -> Result<Value, RuntimeError> {
        match self.stack.lookup(name) {
            Lookup::Found(value) => Ok(value),
            Lookup::Unbound => Err(RuntimeError::UnboundLocal {
                name: name.to_string(),
                location,
            }),
            Lookup::Missing => builtins::lookup(name).ok_or_else(|| RuntimeError::UndefinedName {
                name: name.to_string(),
                location,
            }),
        }
    }

    /// Assign a value to a target (name, subscript or unpacking pattern)
    pub(crate) fn assign_target(&mut self, target: &Target, value: Value) -> Result<(), RuntimeError> {
        match target {
            Target::Name(name, _) => {
                self.stack.store(name, value);
                Ok(())
            }

            Target::Subscript {
                object,
                index,
                location,
            } => {
                let container = self.evaluate(object)?;
                let key = self.eval_subscript(index)?;
                self.set_subscript(&container, key, value, *location)
            }

            Target::Tuple(targets, location) => {
                let items = match &value {
                    Value::List(_) | Value::Tuple(_) | Value::Str(_) | Value::Dict(_) | Value::Range(_) => {
                        self.collect_iterable(&value, *location)?
                    }
                    other => {
                        return Err(RuntimeError::type_error(
                            format!("cannot unpack non-iterable {} object", other.type_name()),
                            *location,
                        ))
                    }
                };

                if items.len() < targets.len() {
                    return Err(RuntimeError::value_error(
                        format!(
                            "not enough values to unpack (expected {}, got {})",
                            targets.len(),
                            items.len()
                        ),
                        *location,
                    ));
                }
                if items.len() > targets.len() {
                    return Err(RuntimeError::value_error(
                        format!("too many values to unpack (expected {})", targets.len()),
                        *location,
                    ));
                }

                for (target, item) in targets.iter().zip(items) {
                    self.assign_target(target, item)?;
                }
                Ok(())
            }
        }
    }

    pub(crate) fn delete_target(&mut self, target: &Target) -> Result<(), RuntimeError> {
        match target {
            Target::Name(name, location) => {
                if self.stack.remove(name).is_none() {
                    return Err(RuntimeError::UndefinedName {
                        name: name.clone(),
                        location: *location,
                    });
                }
                Ok(())
            }
            Target::Subscript {
                object,
                index,
                location,
            } => {
                let container = self.evaluate(object)?;
                let key = self.eval_subscript(index)?;
                self.delete_subscript(&container, &key, *location)
            }
            Target::Tuple(targets, _) => {
                for target in targets {
                    self.delete_target(target)?;
                }
                Ok(())
            }
        }
    }
}
