//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime values
//! in the teaching-Python interpreter.
//!
//! # Value Types
//!
//! - Scalars: [`Value::None`], [`Value::Bool`], [`Value::Int`] (64-bit), [`Value::Float`]
//! - [`Value::Str`]: immutable shared string
//! - Containers: [`Value::List`], [`Value::Tuple`], [`Value::Dict`] (insertion ordered)
//! - [`Value::Range`]: lazy `range(start, stop, step)`
//! - Callables: [`Value::Function`], [`Value::Builtin`], [`Value::BoundMethod`]
//! - [`Value::Module`]: an imported built-in module (`math`, `random`)
//!
//! # Sharing and Drop
//!
//! Lists and dicts are reference types (`Rc<RefCell<..>>`), so aliasing behaves as in
//! Python. Container handles release their contents iteratively, which keeps dropping
//! a million-level nested list from overflowing the stack.

use crate::parser::ast::FunctionDef;
use indexmap::IndexMap;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{self, Write as _};
use std::rc::Rc;

/// Deepest container nesting that repr/equality will walk
pub const MAX_REPR_DEPTH: usize = 1000;

/// Built-ins that are also types: `type(3)` is `int`
pub const TYPE_NAMES: &[&str] = &["bool", "dict", "float", "int", "list", "range", "str", "tuple"];

/// Runtime values in the interpreter
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(ListRef),
    Tuple(TupleRef),
    Dict(DictRef),
    Range(RangeValue),
    Function(Rc<Function>),
    Builtin(&'static str),
    BoundMethod {
        receiver: Box<Value>,
        name: Rc<str>,
    },
    Module(&'static str),
}

/// A user-defined function with its evaluated default values
#[derive(Debug)]
pub struct Function {
    pub def: Rc<FunctionDef>,
    pub defaults: Vec<Option<Value>>,
}

/// Lazy integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeValue {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeValue {
    pub fn len(&self) -> usize {
        let (lo, hi, step) = if self.step > 0 {
            (self.start as i128, self.stop as i128, self.step as i128)
        } else {
            (self.stop as i128, self.start as i128, -(self.step as i128))
        };
        if hi <= lo {
            0
        } else {
            ((hi - lo + step - 1) / step) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` (already normalised to `0..len`)
    pub fn get(&self, index: usize) -> i64 {
        self.start + self.step * index as i64
    }

    pub fn contains(&self, n: i64) -> bool {
        let offset = n as i128 - self.start as i128;
        let in_bounds = if self.step > 0 {
            n >= self.start && n < self.stop
        } else {
            n <= self.start && n > self.stop
        };
        in_bounds && offset % self.step as i128 == 0
    }
}

/// Hashable projection of a value, used as a dict key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    None,
    /// ints, bools and integral floats share one key space (`1 == 1.0 == True`)
    Int(i64),
    Float(u64),
    Str(Rc<str>),
    Tuple(Vec<Key>),
}

/// Error raised when repr/equality walks past [`MAX_REPR_DEPTH`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthExceeded;

// ===== Container handles =====

/// Shared, mutable list
#[derive(Clone, Default)]
pub struct ListRef(Rc<RefCell<Vec<Value>>>);

// Lists can contain themselves; Debug stays shallow
impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(items) => write!(f, "ListRef(len={})", items.len()),
            Err(_) => write!(f, "ListRef(<borrowed>)"),
        }
    }
}

impl ListRef {
    pub fn new(items: Vec<Value>) -> Self {
        ListRef(Rc::new(RefCell::new(items)))
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Vec<Value>> {
        self.0.borrow_mut()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &ListRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    fn take_if_unique(&mut self) -> Option<Vec<Value>> {
        Rc::get_mut(&mut self.0).map(|cell| std::mem::take(cell.get_mut()))
    }
}

impl Drop for ListRef {
    fn drop(&mut self) {
        if let Some(items) = self.take_if_unique() {
            drain_nested(items);
        }
    }
}

/// Immutable shared tuple
#[derive(Debug, Clone, Default)]
pub struct TupleRef(Rc<Vec<Value>>);

impl TupleRef {
    pub fn new(items: Vec<Value>) -> Self {
        TupleRef(Rc::new(items))
    }

    pub fn items(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    fn take_if_unique(&mut self) -> Option<Vec<Value>> {
        Rc::get_mut(&mut self.0).map(std::mem::take)
    }
}

impl Drop for TupleRef {
    fn drop(&mut self) {
        if let Some(items) = self.take_if_unique() {
            drain_nested(items);
        }
    }
}

/// Dict storage: hashed key → (original key value, value)
pub type DictMap = IndexMap<Key, (Value, Value)>;

/// Shared, mutable, insertion-ordered dict
#[derive(Clone, Default)]
pub struct DictRef(Rc<RefCell<DictMap>>);

impl fmt::Debug for DictRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(map) => write!(f, "DictRef(len={})", map.len()),
            Err(_) => write!(f, "DictRef(<borrowed>)"),
        }
    }
}

impl DictRef {
    pub fn new(map: DictMap) -> Self {
        DictRef(Rc::new(RefCell::new(map)))
    }

    pub fn borrow(&self) -> Ref<'_, DictMap> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, DictMap> {
        self.0.borrow_mut()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Key) -> Option<Value> {
        self.0.borrow().get(key).map(|(_, v)| v.clone())
    }

    /// Insert, keeping the original key object when the key already exists
    pub fn insert(&self, key: Key, key_value: Value, value: Value) {
        let mut map = self.0.borrow_mut();
        match map.get_mut(&key) {
            Some(slot) => slot.1 = value,
            None => {
                map.insert(key, (key_value, value));
            }
        }
    }

    pub fn keys(&self) -> Vec<Value> {
        self.0.borrow().values().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.borrow().values().map(|(_, v)| v.clone()).collect()
    }

    pub fn items(&self) -> Vec<(Value, Value)> {
        self.0.borrow().values().cloned().collect()
    }

    pub fn ptr_eq(&self, other: &DictRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    fn take_if_unique(&mut self) -> Option<DictMap> {
        Rc::get_mut(&mut self.0).map(|cell| std::mem::take(cell.get_mut()))
    }
}

impl Drop for DictRef {
    fn drop(&mut self) {
        if let Some(map) = self.take_if_unique() {
            drain_nested(map.into_values().flat_map(|(k, v)| [k, v]).collect());
        }
    }
}

/// Release nested containers with an explicit work stack instead of recursion
fn drain_nested(items: Vec<Value>) {
    let mut pending = items;
    while let Some(value) = pending.pop() {
        match value {
            Value::List(mut list) => {
                if let Some(inner) = list.take_if_unique() {
                    pending.extend(inner);
                }
            }
            Value::Tuple(mut tuple) => {
                if let Some(inner) = tuple.take_if_unique() {
                    pending.extend(inner);
                }
            }
            Value::Dict(mut dict) => {
                if let Some(inner) = dict.take_if_unique() {
                    pending.extend(inner.into_values().flat_map(|(k, v)| [k, v]));
                }
            }
            Value::BoundMethod { receiver, .. } => pending.push(*receiver),
            _ => {}
        }
    }
}

// ===== Value behaviour =====

impl Value {
    pub fn str(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(ListRef::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(TupleRef::new(items))
    }

    /// Python's `type(x).__name__`
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Range(_) => "range",
            Value::Function(_) => "function",
            Value::Builtin(name) if TYPE_NAMES.contains(name) => "type",
            Value::Builtin(_) | Value::BoundMethod { .. } => "builtin_function_or_method",
            Value::Module(_) => "module",
        }
    }

    /// Python truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Tuple(t) => !t.is_empty(),
            Value::Dict(d) => !d.is_empty(),
            Value::Range(r) => !r.is_empty(),
            Value::Function(_)
            | Value::Builtin(_)
            | Value::BoundMethod { .. }
            | Value::Module(_) => true,
        }
    }

    /// Numeric view for arithmetic (`bool` counts as int)
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Bool(b) => Some(Number::Int(*b as i64)),
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// Integer view (`bool` counts as int)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(*b as i64),
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Hashable key for dict storage and membership, `None` if unhashable
    pub fn to_key(&self) -> Option<Key> {
        match self {
            Value::None => Some(Key::None),
            Value::Bool(b) => Some(Key::Int(*b as i64)),
            Value::Int(n) => Some(Key::Int(*n)),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 9.2e18 {
                    Some(Key::Int(*f as i64))
                } else {
                    Some(Key::Float(f.to_bits()))
                }
            }
            Value::Str(s) => Some(Key::Str(s.clone())),
            Value::Tuple(t) => t
                .items()
                .iter()
                .map(Value::to_key)
                .collect::<Option<Vec<_>>>()
                .map(Key::Tuple),
            _ => None,
        }
    }

    /// Python's `str(x)`
    pub fn to_display(&self) -> Result<String, DepthExceeded> {
        match self {
            Value::Str(s) => Ok(s.to_string()),
            other => other.to_repr(),
        }
    }

    /// Python's `repr(x)`
    pub fn to_repr(&self) -> Result<String, DepthExceeded> {
        let mut out = String::new();
        let mut active = Vec::new();
        write_repr(self, &mut out, &mut active)?;
        Ok(out)
    }

    /// Python's `==`
    pub fn py_eq(&self, other: &Value) -> Result<bool, DepthExceeded> {
        values_equal(self, other, 0)
    }

    /// Python's `is`: identity for reference types, equality for immutable scalars
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b) || a == b,
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Dict(a), Value::Dict(b)) => a.ptr_eq(b),
            (Value::Tuple(a), Value::Tuple(b)) => a.addr() == b.addr(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Module(a), Value::Module(b)) => a == b,
            _ => false,
        }
    }
}

/// Numeric operand after bool → int promotion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

fn values_equal(a: &Value, b: &Value, depth: usize) -> Result<bool, DepthExceeded> {
    if depth > MAX_REPR_DEPTH {
        return Err(DepthExceeded);
    }

    match (a, b) {
        (Value::None, Value::None) => Ok(true),
        (Value::Str(x), Value::Str(y)) => Ok(x == y),
        (Value::List(x), Value::List(y)) => {
            if x.ptr_eq(y) {
                return Ok(true);
            }
            let (xs, ys) = (x.snapshot(), y.snapshot());
            sequences_equal(&xs, &ys, depth)
        }
        (Value::Tuple(x), Value::Tuple(y)) => sequences_equal(x.items(), y.items(), depth),
        (Value::Dict(x), Value::Dict(y)) => {
            if x.ptr_eq(y) {
                return Ok(true);
            }
            let (xs, ys) = (x.items(), y.items());
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (key, value) in &xs {
                let Some(other) = key.to_key().and_then(|k| y.get(&k)) else {
                    return Ok(false);
                };
                if !values_equal(value, &other, depth + 1)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Range(x), Value::Range(y)) => {
            let (lx, ly) = (x.len(), y.len());
            Ok(lx == ly && (lx == 0 || (x.start == y.start && (lx == 1 || x.step == y.step))))
        }
        _ => match (a.as_number(), b.as_number()) {
            (Some(Number::Int(x)), Some(Number::Int(y))) => Ok(x == y),
            (Some(x), Some(y)) => Ok(x.as_f64() == y.as_f64()),
            _ => Ok(a.is_same(b)),
        },
    }
}

fn sequences_equal(xs: &[Value], ys: &[Value], depth: usize) -> Result<bool, DepthExceeded> {
    if xs.len() != ys.len() {
        return Ok(false);
    }
    for (x, y) in xs.iter().zip(ys) {
        if x.is_same(y) {
            continue;
        }
        if !values_equal(x, y, depth + 1)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Write the repr of `value`; `active` holds the containers currently being printed
fn write_repr(value: &Value, out: &mut String, active: &mut Vec<usize>) -> Result<(), DepthExceeded> {
    if active.len() > MAX_REPR_DEPTH {
        return Err(DepthExceeded);
    }

    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Str(s) => out.push_str(&repr_str(s)),
        Value::List(list) => {
            let addr = list.addr();
            if active.contains(&addr) {
                out.push_str("[...]");
                return Ok(());
            }
            active.push(addr);
            out.push('[');
            let items = list.snapshot();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(item, out, active)?;
            }
            out.push(']');
            active.pop();
        }
        Value::Tuple(tuple) => {
            active.push(tuple.addr());
            out.push('(');
            for (i, item) in tuple.items().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(item, out, active)?;
            }
            if tuple.len() == 1 {
                out.push(',');
            }
            out.push(')');
            active.pop();
        }
        Value::Dict(dict) => {
            let addr = dict.addr();
            if active.contains(&addr) {
                out.push_str("{...}");
                return Ok(());
            }
            active.push(addr);
            out.push('{');
            for (i, (key, item)) in dict.items().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(key, out, active)?;
                out.push_str(": ");
                write_repr(item, out, active)?;
            }
            out.push('}');
            active.pop();
        }
        Value::Range(r) => {
            if r.step == 1 {
                let _ = write!(out, "range({}, {})", r.start, r.stop);
            } else {
                let _ = write!(out, "range({}, {}, {})", r.start, r.stop, r.step);
            }
        }
        Value::Function(func) => {
            let _ = write!(out, "<function {}>", func.def.name);
        }
        Value::Builtin(name) if TYPE_NAMES.contains(name) => {
            let _ = write!(out, "<class '{}'>", name);
        }
        Value::Builtin(name) => {
            let short = name.rsplit('.').next().unwrap_or(name);
            let _ = write!(out, "<built-in function {}>", short);
        }
        Value::BoundMethod { receiver, name } => {
            let _ = write!(
                out,
                "<built-in method {} of {} object>",
                name,
                receiver.type_name()
            );
        }
        Value::Module(name) => {
            let _ = write!(out, "<module '{}' (built-in)>", name);
        }
    }

    Ok(())
}

/// Format a float the way Python's `repr` does
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // `{:e}` gives the shortest round-trip digits, e.g. "1.5e-5"
    let sci = format!("{:e}", f);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = format!("{}", f);
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// Quote a string the way Python's `repr` does
pub fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_repr() {
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(10.0), "10.0");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn test_string_repr_quotes() {
        assert_eq!(repr_str("hi"), "'hi'");
        assert_eq!(repr_str("it's"), "\"it's\"");
        assert_eq!(repr_str("a\nb"), "'a\\nb'");
    }

    #[test]
    fn test_container_repr() {
        let list = Value::list(vec![Value::Int(1), Value::str("two"), Value::Float(3.0)]);
        assert_eq!(list.to_repr().unwrap(), "[1, 'two', 3.0]");

        let single = Value::tuple(vec![Value::Int(1)]);
        assert_eq!(single.to_repr().unwrap(), "(1,)");

        let mut map = DictMap::default();
        map.insert(Key::Str("a".into()), (Value::str("a"), Value::Bool(true)));
        assert_eq!(Value::Dict(DictRef::new(map)).to_repr().unwrap(), "{'a': True}");
    }

    #[test]
    fn test_self_referencing_list_repr() {
        let list = ListRef::new(vec![Value::Int(1)]);
        list.borrow_mut().push(Value::List(list.clone()));

        assert_eq!(Value::List(list.clone()).to_repr().unwrap(), "[1, [...]]");
        list.borrow_mut().clear();
    }

    #[test]
    fn test_deeply_nested_drop_does_not_overflow() {
        let mut value = Value::list(Vec::new());
        for _ in 0..200_000 {
            value = Value::list(vec![value]);
        }
        drop(value);

        let mut tuple = Value::tuple(Vec::new());
        for _ in 0..200_000 {
            tuple = Value::tuple(vec![tuple]);
        }
        drop(tuple);
    }

    #[test]
    fn test_deep_repr_reports_depth() {
        let mut value = Value::list(Vec::new());
        for _ in 0..(MAX_REPR_DEPTH + 10) {
            value = Value::list(vec![value]);
        }

        assert_eq!(value.to_repr(), Err(DepthExceeded));
    }

    #[test]
    fn test_numeric_equality_and_keys() {
        assert!(Value::Int(1).py_eq(&Value::Float(1.0)).unwrap());
        assert!(Value::Bool(true).py_eq(&Value::Int(1)).unwrap());
        assert!(!Value::Int(1).py_eq(&Value::str("1")).unwrap());
        assert_eq!(Value::Float(2.0).to_key(), Value::Int(2).to_key());
        assert_eq!(Value::list(Vec::new()).to_key(), None);
    }

    #[test]
    fn test_range_len_and_contains() {
        let r = RangeValue {
            start: 0,
            stop: 10,
            step: 3,
        };
        assert_eq!(r.len(), 4);
        assert!(r.contains(9));
        assert!(!r.contains(10));

        let back = RangeValue {
            start: 5,
            stop: 0,
            step: -1,
        };
        assert_eq!(back.len(), 5);
        assert_eq!(back.get(4), 1);
    }
}
