// Lineage Values - Dynamic Value Representation
//
// The values that flow through constructors and live in instance fields.
// Scalars compare structurally; tables, functions, and objects compare by
// identity.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use smallvec::{smallvec, SmallVec};

use crate::conditions::ObjectError;
use crate::object::Object;

/// Multiple return values. Constructors return one or two, so the inline
/// capacity is two.
pub type Values = SmallVec<[Value; 2]>;

/// A single return value.
pub fn one(value: Value) -> Values {
    smallvec![value]
}

/// A two-value return (fields table plus parent instance, typically).
pub fn pair(first: Value, second: Value) -> Values {
    smallvec![first, second]
}

/// A dynamic value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Table(Table),
    Function(NativeFn),
    Object(Object),
}

impl Value {
    /// The value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Table(_) => "table",
            Value::Function(_) => "function",
            Value::Object(Object::Class(_)) => "class",
            Value::Object(Object::Instance(_)) => "instance",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a.same(b),
            (Value::Function(a), Value::Function(b)) => a.same(b),
            (Value::Object(a), Value::Object(b)) => a.same(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Table(t) => write!(f, "{:?}", t),
            Value::Function(nf) => write!(f, "{:?}", nf),
            Value::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl From<NativeFn> for Value {
    fn from(nf: NativeFn) -> Self {
        Value::Function(nf)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

/// A shared record of named fields. Cloning a `Table` clones the handle, not
/// the record; the constructor's returned table and the instance built from
/// it are the same record.
#[derive(Clone, Default)]
pub struct Table {
    slots: Rc<RefCell<HashMap<String, Value>>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field. Absent keys read as `None`, never as `Nil`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.slots.borrow().get(key).cloned()
    }

    /// Set a field. Inserting `Nil` removes the key: a field holding nil and
    /// an absent field are indistinguishable.
    pub fn insert(&self, key: &str, value: Value) {
        if value.is_nil() {
            self.slots.borrow_mut().remove(key);
        } else {
            self.slots.borrow_mut().insert(key.to_string(), value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.slots.borrow().keys().cloned().collect()
    }

    /// Identity: two handles to the same record.
    pub fn same(&self, other: &Table) -> bool {
        Rc::ptr_eq(&self.slots, &other.slots)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<table len={}>", self.len())
    }
}

impl FromIterator<(String, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let table = Table::new();
        for (key, value) in iter {
            table.insert(&key, value);
        }
        table
    }
}

/// A callable value. Methods receive their receiver as the first argument
/// explicitly; there is no hidden self.
#[derive(Clone)]
pub struct NativeFn(Rc<dyn Fn(&[Value]) -> Result<Values, ObjectError>>);

impl NativeFn {
    pub fn new(f: impl Fn(&[Value]) -> Result<Values, ObjectError> + 'static) -> Self {
        NativeFn(Rc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Result<Values, ObjectError> {
        (self.0)(args)
    }

    /// Identity: two handles to the same function.
    pub fn same(&self, other: &NativeFn) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<function>")
    }
}
