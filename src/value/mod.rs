//! A dynamically typed element model.
//!
//! Lists are shared and mutable, so cloning a [`Value`] aliases its lists.
//! Use [`DeepClone`] for an independent copy. A list may contain itself.
//! Deep copies, equality and printing all follow such cycles without
//! recursing forever, but a cyclic list is never freed.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::{
    error::{Error, Result},
    source::Pull,
    DeepClone, IntoSeq, Seq,
};

mod integer;
mod sexpr;

pub use integer::Integer;

type ListRef = Rc<RefCell<Vec<Value>>>;
type ListPtr = *const RefCell<Vec<Value>>;

#[derive(Clone)]
enum ValueInner {
    Nil,
    Bool(bool),
    Integer(Integer),
    Float(f64),
    String(Rc<str>),
    List(ListRef),
}

#[derive(Clone)]
pub struct Value(ValueInner);

impl Value {
    pub fn nil() -> Self {
        Value(ValueInner::Nil)
    }

    pub fn new_bool(b: bool) -> Self {
        Value(ValueInner::Bool(b))
    }

    pub fn new_integer(i: Integer) -> Self {
        Value(ValueInner::Integer(i))
    }

    pub fn new_float(f: f64) -> Self {
        Value(ValueInner::Float(f))
    }

    pub fn new_string(s: impl Into<Rc<str>>) -> Self {
        Value(ValueInner::String(s.into()))
    }

    pub fn new_list(items: impl IntoIterator<Item = Value>) -> Self {
        let items = items.into_iter().collect();
        Value(ValueInner::List(Rc::new(RefCell::new(items))))
    }

    pub fn type_name(&self) -> &'static str {
        match &self.0 {
            ValueInner::Nil => "nil",
            ValueInner::Bool(_) => "bool",
            ValueInner::Integer(_) => "integer",
            ValueInner::Float(_) => "float",
            ValueInner::String(_) => "string",
            ValueInner::List(_) => "list",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.0, ValueInner::Nil)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match &self.0 {
            ValueInner::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("bool")),
        }
    }

    pub fn as_int(&self) -> Result<&Integer> {
        match &self.0 {
            ValueInner::Integer(i) => Ok(i),
            _ => Err(self.mismatch("integer")),
        }
    }

    pub fn as_compact_integer(&self) -> Result<i64> {
        self.as_int()?
            .to_compact_integer()
            .ok_or_else(|| Error::new_type_mismatch("compact integer", "big integer"))
    }

    pub fn as_float(&self) -> Result<f64> {
        match &self.0 {
            ValueInner::Float(f) => Ok(*f),
            _ => Err(self.mismatch("float")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.0 {
            ValueInner::String(s) => Ok(s),
            _ => Err(self.mismatch("string")),
        }
    }

    /// Returns a snapshot of the list's current items.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        Ok(self.as_list()?.borrow().clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.as_list()?.borrow().len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn get(&self, index: usize) -> Result<Option<Value>> {
        Ok(self.as_list()?.borrow().get(index).cloned())
    }

    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        let mut items = self.as_list()?.borrow_mut();
        let len = items.len();
        let slot = items.get_mut(index).ok_or_else(|| {
            Error::new_invalid_argument("index", format!("{index} out of range for length {len}"))
        })?;
        *slot = value;
        Ok(())
    }

    pub fn push(&self, value: Value) -> Result<()> {
        self.as_list()?.borrow_mut().push(value);
        Ok(())
    }

    /// True if both values are the same list or string object. Scalars have
    /// no identity and compare by value.
    pub fn ref_eq(&self, other: &Value) -> bool {
        match (&self.0, &other.0) {
            (ValueInner::List(l1), ValueInner::List(l2)) => Rc::ptr_eq(l1, l2),
            (ValueInner::String(s1), ValueInner::String(s2)) => Rc::ptr_eq(s1, s2),
            (ValueInner::List(_), _) | (ValueInner::String(_), _) => false,
            _ => self == other,
        }
    }

    fn as_list(&self) -> Result<&ListRef> {
        match &self.0 {
            ValueInner::List(items) => Ok(items),
            _ => Err(self.mismatch("list")),
        }
    }

    /// Deep copy that maps every list already copied to its copy, so shared
    /// and cyclic structure is preserved.
    fn deep_clone_with(&self, copies: &mut HashMap<ListPtr, Value>) -> Value {
        let ValueInner::List(items) = &self.0 else {
            return self.clone();
        };
        if let Some(copy) = copies.get(&Rc::as_ptr(items)) {
            return copy.clone();
        }
        let target: ListRef = Rc::new(RefCell::new(Vec::new()));
        let copy = Value(ValueInner::List(target.clone()));
        copies.insert(Rc::as_ptr(items), copy.clone());
        let copied: Vec<Value> = items
            .borrow()
            .iter()
            .map(|item| item.deep_clone_with(copies))
            .collect();
        *target.borrow_mut() = copied;
        copy
    }

    /// Structural equality. A pair of lists already being compared further up
    /// is assumed equal.
    fn eq_with(&self, other: &Value, comparing: &mut Vec<(ListPtr, ListPtr)>) -> bool {
        match (&self.0, &other.0) {
            (ValueInner::Nil, ValueInner::Nil) => true,
            (ValueInner::Bool(b1), ValueInner::Bool(b2)) => b1 == b2,
            (ValueInner::Integer(i1), ValueInner::Integer(i2)) => i1 == i2,
            (ValueInner::Float(f1), ValueInner::Float(f2)) => f1 == f2,
            (ValueInner::String(s1), ValueInner::String(s2)) => s1 == s2,
            (ValueInner::List(l1), ValueInner::List(l2)) => {
                let pair = (Rc::as_ptr(l1), Rc::as_ptr(l2));
                if comparing.contains(&pair) {
                    return true;
                }
                let (items1, items2) = (l1.borrow(), l2.borrow());
                if items1.len() != items2.len() {
                    return false;
                }
                comparing.push(pair);
                let equal = items1
                    .iter()
                    .zip(items2.iter())
                    .all(|(a, b)| a.eq_with(b, comparing));
                comparing.pop();
                equal
            }
            _ => false,
        }
    }

    /// Prints `...` in place of a list that is already being printed.
    fn write_with(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<ListPtr>) -> fmt::Result {
        match &self.0 {
            ValueInner::Nil => write!(f, "#nil"),
            ValueInner::Bool(true) => write!(f, "#t"),
            ValueInner::Bool(false) => write!(f, "#f"),
            ValueInner::Integer(i) => write!(f, "{i}"),
            ValueInner::Float(x) => write!(f, "{x:?}"),
            ValueInner::String(s) => write!(f, "{:?}", &**s),
            ValueInner::List(items) => {
                let ptr = Rc::as_ptr(items);
                if open.contains(&ptr) {
                    return write!(f, "...");
                }
                open.push(ptr);
                write!(f, "(")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    item.write_with(f, open)?;
                }
                open.pop();
                write!(f, ")")
            }
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::new_type_mismatch(expected, self.type_name())
    }

    /// Runs `f` against the numeric reading of this value, if it has one.
    fn with_number<N>(&self, f: impl FnOnce(&dyn ToPrimitive) -> Option<N>) -> Option<N> {
        match &self.0 {
            ValueInner::Bool(b) => f(&i64::from(*b)),
            ValueInner::Integer(i) => f(i),
            ValueInner::Float(x) => f(x),
            ValueInner::String(s) => parse_number(s)?.with_number(f),
            ValueInner::Nil | ValueInner::List(_) => None,
        }
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        Some(Value::from(i))
    } else if let Ok(i) = text.parse::<BigInt>() {
        Some(Value::new_integer(Integer::from(i)))
    } else {
        text.parse::<f64>().ok().map(Value::from)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::nil()
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::new_integer(Integer::from(i))
    }
}

impl From<Integer> for Value {
    fn from(i: Integer) -> Self {
        Value::new_integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::new_float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::new_bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new_string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new_string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value(ValueInner::List(Rc::new(RefCell::new(items))))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::new_list(iter)
    }
}

impl DeepClone for Value {
    fn deep_clone(&self) -> Self {
        self.deep_clone_with(&mut HashMap::new())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, &mut Vec::new())
    }
}

impl ToPrimitive for Value {
    fn to_i64(&self) -> Option<i64> {
        self.with_number(|n| n.to_i64())
    }

    fn to_u64(&self) -> Option<u64> {
        self.with_number(|n| n.to_u64())
    }

    fn to_i128(&self) -> Option<i128> {
        self.with_number(|n| n.to_i128())
    }

    fn to_u128(&self) -> Option<u128> {
        self.with_number(|n| n.to_u128())
    }

    fn to_f64(&self) -> Option<f64> {
        self.with_number(|n| n.to_f64())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_with(f, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({self})")
    }
}

/// Walks a list by index, so items pushed during iteration are seen.
struct ListSource {
    items: ListRef,
    index: usize,
}

impl Pull<Value> for ListSource {
    fn pull(&mut self) -> Result<Option<Value>> {
        let item = self.items.borrow().get(self.index).cloned();
        if item.is_some() {
            self.index += 1;
        }
        Ok(item)
    }
}

/// Yields each character of a string as a one-character string.
struct CharSource {
    text: Rc<str>,
    offset: usize,
}

impl Pull<Value> for CharSource {
    fn pull(&mut self) -> Result<Option<Value>> {
        let Some(c) = self.text[self.offset..].chars().next() else {
            return Ok(None);
        };
        self.offset += c.len_utf8();
        Ok(Some(Value::new_string(c.to_string())))
    }
}

impl<'a> IntoSeq<'a> for Value {
    type Item = Value;

    fn into_seq(self) -> Result<Seq<'a, Value>> {
        match self.0 {
            ValueInner::List(items) => Ok(Seq::new(ListSource { items, index: 0 })),
            ValueInner::String(text) => Ok(Seq::new(CharSource { text, offset: 0 })),
            _ => Err(Error::new_not_iterable(self.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_aliases_lists() -> anyhow::Result<()> {
        let list = Value::new_list([Value::from(1)]);
        let alias = list.clone();
        alias.push(Value::from(2))?;
        assert_eq!(list.len()?, 2);
        assert!(list.ref_eq(&alias));
        Ok(())
    }

    #[test]
    fn test_deep_clone_is_independent() -> anyhow::Result<()> {
        let inner = Value::new_list([Value::from(1)]);
        let outer = Value::new_list([inner.clone()]);
        let copy = outer.deep_clone();
        inner.push(Value::from(2))?;
        assert_eq!(copy, Value::parse("((1))")?);
        assert_ne!(copy, outer);
        Ok(())
    }

    #[test]
    fn test_set_and_get() -> anyhow::Result<()> {
        let list = Value::new_list([Value::from(1), Value::from(2)]);
        list.set(1, Value::from("x"))?;
        assert_eq!(list.get(1)?, Some(Value::from("x")));
        assert_eq!(list.get(2)?, None);
        assert!(matches!(
            list.set(5, Value::nil()),
            Err(Error::InvalidArgument { name: "index", .. })
        ));
        Ok(())
    }

    #[test]
    fn test_accessors_report_type_mismatch() {
        let value = Value::from(1.5);
        assert!(matches!(
            value.as_bool(),
            Err(Error::TypeMismatch {
                expected: "bool",
                found: "float"
            })
        ));
        assert!(matches!(
            value.push(Value::nil()),
            Err(Error::TypeMismatch {
                expected: "list",
                ..
            })
        ));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::from(true).to_i64(), Some(1));
        assert_eq!(Value::from(" 42 ").to_i64(), Some(42));
        assert_eq!(Value::from("2.5").to_f64(), Some(2.5));
        assert_eq!(Value::from("abc").to_f64(), None);
        assert_eq!(Value::nil().to_f64(), None);
        assert_eq!(Value::new_list([]).to_i64(), None);
    }

    #[test]
    fn test_list_iteration_is_live() -> anyhow::Result<()> {
        let list = Value::new_list([Value::from(1)]);
        let mut seq = list.clone().into_seq()?;
        assert_eq!(seq.next()?, Some(Value::from(1)));
        list.push(Value::from(2))?;
        assert_eq!(seq.next()?, Some(Value::from(2)));
        assert_eq!(seq.next()?, None);
        Ok(())
    }

    #[test]
    fn test_string_iterates_characters() -> anyhow::Result<()> {
        let chars = Value::from("hé").into_seq()?.collect::<Vec<_>>()?;
        assert_eq!(chars, vec![Value::from("h"), Value::from("é")]);
        Ok(())
    }

    #[test]
    fn test_scalars_are_not_iterable() {
        assert!(matches!(
            Value::from(3).into_seq(),
            Err(Error::NotIterable { type_name }) if type_name == "integer"
        ));
    }

    fn self_containing_list() -> anyhow::Result<Value> {
        let list = Value::new_list([Value::from(1)]);
        list.push(list.clone())?;
        Ok(list)
    }

    #[test]
    fn test_deep_clone_keeps_cycles() -> anyhow::Result<()> {
        let list = self_containing_list()?;
        let copy = list.deep_clone();
        assert!(!copy.ref_eq(&list));
        let nested = copy.get(1)?;
        assert!(nested.is_some_and(|nested| nested.ref_eq(&copy)));
        copy.push(Value::nil())?;
        assert_eq!(list.len()?, 2);
        Ok(())
    }

    #[test]
    fn test_cyclic_equality() -> anyhow::Result<()> {
        let first = self_containing_list()?;
        let second = self_containing_list()?;
        assert_eq!(first, second);
        second.push(Value::nil())?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn test_cyclic_display() -> anyhow::Result<()> {
        let list = self_containing_list()?;
        assert_eq!(list.to_string(), "(1 ...)");
        assert_eq!(format!("{list:?}"), "Value((1 ...))");
        Ok(())
    }

    #[test]
    fn test_cyclic_list_in_sequences() -> anyhow::Result<()> {
        let list = self_containing_list()?;
        let mut cycled = Seq::from_iterable([list.clone()]).cycle()?;
        let passes = cycled.take(2)?.collect::<Vec<_>>()?;
        assert!(passes[0].ref_eq(&list));
        assert!(!passes[1].ref_eq(&list));
        assert_eq!(passes[1], list);

        let mut items = Seq::from_iterable([Value::from(1), Value::from(2)]);
        let joined = items.intersperse(list.clone())?.collect::<Vec<_>>()?;
        assert_eq!(joined[1], list);
        assert!(Seq::from_iterable([list.clone()]).eq([list.deep_clone()])?);
        Ok(())
    }

    #[test]
    fn test_display() -> anyhow::Result<()> {
        let value = Value::parse(r#"(1 2.5 "a" #t ())"#)?;
        assert_eq!(value.to_string(), r#"(1 2.5 "a" #t ())"#);
        Ok(())
    }
}
