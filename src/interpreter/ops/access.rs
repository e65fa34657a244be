//! Subscript access: indexing, slicing, item assignment and deletion
//!
//! Index normalisation follows Python: negative indices count from the end,
//! out-of-range indices raise `IndexError`, and slice bounds are clamped.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{Expr, SourceLocation};

/// An evaluated subscript: `x[i]` or `x[lower:upper:step]`
pub(crate) enum SubscriptKey {
    Index(Value),
    Slice {
        lower: Option<i64>,
        upper: Option<i64>,
        step: Option<i64>,
    },
}

/// Positions selected by a slice over a sequence of length `len`
pub(crate) fn slice_indices(len: usize, lower: Option<i64>, upper: Option<i64>, step: i64) -> Vec<usize> {
    let len = len as i64;
    let adjust = |bound: i64, lo: i64, hi: i64| {
        let bound = if bound < 0 { bound + len } else { bound };
        bound.clamp(lo, hi)
    };

    let mut indices = Vec::new();
    if step > 0 {
        let start = lower.map_or(0, |b| adjust(b, 0, len));
        let stop = upper.map_or(len, |b| adjust(b, 0, len));
        let mut i = start;
        while i < stop {
            indices.push(i as usize);
            i += step;
        }
    } else {
        let start = lower.map_or(len - 1, |b| adjust(b, -1, len - 1));
        let stop = upper.map_or(-1, |b| adjust(b, -1, len - 1));
        let mut i = start;
        while i > stop {
            indices.push(i as usize);
            i += step;
        }
    }
    indices
}

/// Normalise a possibly negative index, `None` when out of range
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let index = if index < 0 { index + len } else { index };
    (0..len).contains(&index).then_some(index as usize)
}

impl Interpreter {
    pub(crate) fn eval_subscript(&mut self, index: &Expr) -> Result<SubscriptKey, RuntimeError> {
        let Expr::Slice {
            lower,
            upper,
            step,
            location,
        } = index
        else {
            return Ok(SubscriptKey::Index(self.evaluate(index)?));
        };

        let mut bounds = [None, None, None];
        for (slot, expr) in bounds.iter_mut().zip([lower, upper, step]) {
            let Some(expr) = expr else { continue };
            *slot = match self.evaluate(expr)? {
                Value::None => None,
                value => Some(value.as_int().ok_or_else(|| {
                    RuntimeError::type_error(
                        "slice indices must be integers or None or have an __index__ method",
                        *location,
                    )
                })?),
            };
        }

        if bounds[2] == Some(0) {
            return Err(RuntimeError::value_error("slice step cannot be zero", *location));
        }

        Ok(SubscriptKey::Slice {
            lower: bounds[0],
            upper: bounds[1],
            step: bounds[2],
        })
    }

    pub(crate) fn get_subscript(
        &self,
        container: &Value,
        key: &SubscriptKey,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match key {
            SubscriptKey::Index(index) => self.get_item(container, index, location),
            SubscriptKey::Slice { lower, upper, step } => {
                let step = step.unwrap_or(1);
                match container {
                    Value::List(list) => {
                        let items = list.borrow();
                        let picked = slice_indices(items.len(), *lower, *upper, step)
                            .into_iter()
                            .map(|i| items[i].clone())
                            .collect();
                        Ok(Value::list(picked))
                    }
                    Value::Tuple(tuple) => {
                        let items = tuple.items();
                        let picked = slice_indices(items.len(), *lower, *upper, step)
                            .into_iter()
                            .map(|i| items[i].clone())
                            .collect();
                        Ok(Value::tuple(picked))
                    }
                    Value::Str(s) => {
                        let chars: Vec<char> = s.chars().collect();
                        let picked: String = slice_indices(chars.len(), *lower, *upper, step)
                            .into_iter()
                            .map(|i| chars[i])
                            .collect();
                        Ok(Value::str(picked))
                    }
                    Value::Range(range) => {
                        let picked = slice_indices(range.len(), *lower, *upper, step)
                            .into_iter()
                            .map(|i| Value::Int(range.get(i)))
                            .collect();
                        Ok(Value::list(picked))
                    }
                    other => Err(self.not_subscriptable(other, location)),
                }
            }
        }
    }

    /// `container[key]` for a plain (non-slice) key
    pub(crate) fn get_item(
        &self,
        container: &Value,
        key: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match container {
            Value::List(list) => {
                let index = self.sequence_index(container, key, location)?;
                let len = list.len();
                normalize_index(index, len)
                    .and_then(|i| list.get(i))
                    .ok_or_else(|| RuntimeError::index_error("list index out of range", location))
            }
            Value::Tuple(tuple) => {
                let index = self.sequence_index(container, key, location)?;
                normalize_index(index, tuple.len())
                    .map(|i| tuple.items()[i].clone())
                    .ok_or_else(|| RuntimeError::index_error("tuple index out of range", location))
            }
            Value::Str(s) => {
                let index = self.sequence_index(container, key, location)?;
                let len = s.chars().count();
                normalize_index(index, len)
                    .and_then(|i| s.chars().nth(i))
                    .map(|ch| Value::str(ch.to_string()))
                    .ok_or_else(|| RuntimeError::index_error("string index out of range", location))
            }
            Value::Range(range) => {
                let index = self.sequence_index(container, key, location)?;
                normalize_index(index, range.len())
                    .map(|i| Value::Int(range.get(i)))
                    .ok_or_else(|| {
                        RuntimeError::index_error("range object index out of range", location)
                    })
            }
            Value::Dict(dict) => {
                let hashed = self.hash_key(key, location)?;
                match dict.get(&hashed) {
                    Some(value) => Ok(value),
                    None => Err(RuntimeError::Key {
                        key: self.repr(key, location)?,
                        location,
                    }),
                }
            }
            other => Err(self.not_subscriptable(other, location)),
        }
    }

    pub(crate) fn set_subscript(
        &mut self,
        container: &Value,
        key: SubscriptKey,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match (container, key) {
            (Value::List(list), SubscriptKey::Index(index)) => {
                let index = self.sequence_index(container, &index, location)?;
                let len = list.len();
                let i = normalize_index(index, len).ok_or_else(|| {
                    RuntimeError::index_error("list assignment index out of range", location)
                })?;
                list.borrow_mut()[i] = value;
                Ok(())
            }
            (Value::List(list), SubscriptKey::Slice { lower, upper, step }) => {
                let replacement = self.collect_iterable(&value, location)?;
                let len = list.len();
                match step {
                    None | Some(1) => {
                        let indices = slice_indices(len, lower, upper, 1);
                        let start = match indices.first() {
                            Some(&first) => first,
                            None => lower
                                .map_or(0, |b| if b < 0 { b + len as i64 } else { b })
                                .clamp(0, len as i64) as usize,
                        };
                        let end = start + indices.len();
                        self.check_sequence_len(len - indices.len() + replacement.len(), location)?;
                        list.borrow_mut().splice(start..end, replacement);
                    }
                    Some(step) => {
                        let indices = slice_indices(len, lower, upper, step);
                        if indices.len() != replacement.len() {
                            return Err(RuntimeError::value_error(
                                format!(
                                    "attempt to assign sequence of size {} to extended slice of size {}",
                                    replacement.len(),
                                    indices.len()
                                ),
                                location,
                            ));
                        }
                        let mut items = list.borrow_mut();
                        for (i, item) in indices.into_iter().zip(replacement) {
                            items[i] = item;
                        }
                    }
                }
                Ok(())
            }
            (Value::Dict(dict), SubscriptKey::Index(key)) => {
                let hashed = self.hash_key(&key, location)?;
                dict.insert(hashed, key, value);
                Ok(())
            }
            (other, _) => Err(RuntimeError::type_error(
                format!("'{}' object does not support item assignment", other.type_name()),
                location,
            )),
        }
    }

    pub(crate) fn delete_subscript(
        &mut self,
        container: &Value,
        key: &SubscriptKey,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match (container, key) {
            (Value::List(list), SubscriptKey::Index(index)) => {
                let index = self.sequence_index(container, index, location)?;
                let i = normalize_index(index, list.len()).ok_or_else(|| {
                    RuntimeError::index_error("list assignment index out of range", location)
                })?;
                list.borrow_mut().remove(i);
                Ok(())
            }
            (Value::List(list), SubscriptKey::Slice { lower, upper, step }) => {
                let mut indices = slice_indices(list.len(), *lower, *upper, step.unwrap_or(1));
                indices.sort_unstable();
                let mut items = list.borrow_mut();
                for i in indices.into_iter().rev() {
                    items.remove(i);
                }
                Ok(())
            }
            (Value::Dict(dict), SubscriptKey::Index(key)) => {
                let hashed = self.hash_key(key, location)?;
                let removed = dict.borrow_mut().shift_remove(&hashed);
                match removed {
                    Some(_) => Ok(()),
                    None => Err(RuntimeError::Key {
                        key: self.repr(key, location)?,
                        location,
                    }),
                }
            }
            (other, _) => Err(RuntimeError::type_error(
                format!("'{}' object doesn't support item deletion", other.type_name()),
                location,
            )),
        }
    }

    /// Integer index for a sequence, or Python's TypeError
    fn sequence_index(
        &self,
        container: &Value,
        key: &Value,
        location: SourceLocation,
    ) -> Result<i64, RuntimeError> {
        key.as_int().ok_or_else(|| {
            let kind = match container {
                Value::Tuple(_) => "tuple",
                Value::Str(_) => "string",
                Value::Range(_) => "range",
                _ => "list",
            };
            RuntimeError::type_error(
                format!(
                    "{} indices must be integers or slices, not {}",
                    kind,
                    key.type_name()
                ),
                location,
            )
        })
    }

    fn not_subscriptable(&self, value: &Value, location: SourceLocation) -> RuntimeError {
        RuntimeError::type_error(
            format!("'{}' object is not subscriptable", value.type_name()),
            location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::slice_indices;

    #[test]
    fn test_slice_indices_forward() {
        assert_eq!(slice_indices(5, None, None, 1), vec![0, 1, 2, 3, 4]);
        assert_eq!(slice_indices(5, Some(1), Some(3), 1), vec![1, 2]);
        assert_eq!(slice_indices(5, Some(-2), None, 1), vec![3, 4]);
        assert_eq!(slice_indices(5, Some(10), None, 1), Vec::<usize>::new());
        assert_eq!(slice_indices(6, None, None, 2), vec![0, 2, 4]);
    }

    #[test]
    fn test_slice_indices_backward() {
        assert_eq!(slice_indices(6, None, None, -1), vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(slice_indices(6, Some(4), Some(1), -2), vec![4, 2]);
        assert_eq!(slice_indices(0, None, None, -1), Vec::<usize>::new());
    }
}
