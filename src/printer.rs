// Lineage Printer - Text Conversion and Concatenation
//
// The host's generic convert-to-text behavior routes through here: `Display`
// on objects and values dispatches the per-class operators, with the
// universal defaults as the floor.

use std::fmt;

use crate::object::Object;
use crate::value::Value;

/// The universal text-conversion default.
pub fn default_stringify(obj: &Object) -> String {
    format!("[object {}]", obj.type_tag())
}

/// Convert an object to text.
///
/// Instances dispatch through their owning class's merged operator table;
/// the merge terminates at the root, so the universal default is what an
/// untouched hierarchy produces. Class values always use the default - the
/// operator table a class carries describes its instances, not itself.
pub fn stringify(obj: &Object) -> String {
    match obj {
        Object::Instance(instance) => match &instance.class().operators().stringify {
            Some(f) => f(obj),
            None => default_stringify(obj),
        },
        Object::Class(_) => default_stringify(obj),
    }
}

/// Join a text prefix with an object.
///
/// Dispatches the merged `concatenate` operator; the root default joins the
/// prefix with the object's converted text, so a `stringify` override shows
/// through even when `concatenate` was never overridden.
pub fn concatenate(prefix: &str, obj: &Object) -> String {
    match obj {
        Object::Instance(instance) => match &instance.class().operators().concatenate {
            Some(f) => f(prefix, obj),
            None => format!("{}{}", prefix, stringify(obj)),
        },
        Object::Class(_) => format!("{}{}", prefix, stringify(obj)),
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => {
                if x.is_nan() {
                    f.write_str("NaN")
                } else if x.is_infinite() {
                    f.write_str(if x.is_sign_positive() { "+Inf" } else { "-Inf" })
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::String(s) => f.write_str(s),
            Value::Table(_) => f.write_str("#<table>"),
            Value::Function(_) => f.write_str("#<function>"),
            Value::Object(obj) => f.write_str(&stringify(obj)),
        }
    }
}
