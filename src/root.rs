// Lineage Root - The Root Class
//
// The single ancestor of every class. It terminates all ancestry chains,
// carries the globally inherited members as callable values, and holds the
// universal operator defaults that the merge delivers to every descendant.

use std::collections::HashMap;
use std::rc::Rc;

use smallvec::smallvec;

use crate::class::{install_operator_members, Class, OperatorTable};
use crate::conditions::ObjectError;
use crate::object::Object;
use crate::printer;
use crate::value::{NativeFn, Value};

/// The root's type tag.
pub const ROOT_TAG: &str = "Object";

impl Class {
    /// Bootstrap a root class. Everything else derives from it via `extend`;
    /// chains are acyclic by construction because extension can only
    /// reference a class that already exists.
    ///
    /// Roots are per model, not per process. Two roots produce disjoint
    /// hierarchies (though tag comparison does not care).
    pub fn root() -> Class {
        let defaults = OperatorTable {
            stringify: Some(Rc::new(|obj: &Object| printer::default_stringify(obj))),
            concatenate: Some(Rc::new(|prefix: &str, obj: &Object| {
                // Defined in terms of text conversion: an override of
                // stringify shows through joins even when concatenate
                // itself was never overridden.
                format!("{}{}", prefix, printer::stringify(obj))
            })),
        };

        let mut members = HashMap::new();
        members.insert("type".to_string(), Value::Function(member_type()));
        members.insert("isClass".to_string(), Value::Function(member_is_class()));
        members.insert(
            "isInstance".to_string(),
            Value::Function(member_is_instance()),
        );
        members.insert(
            "instanceOf".to_string(),
            Value::Function(member_instance_of()),
        );
        members.insert("Extend".to_string(), Value::Function(member_extend()));
        install_operator_members(&mut members, &defaults);

        Class::with_parts(ROOT_TAG.to_string(), None, defaults, members)
    }
}

fn receiver(args: &[Value]) -> Option<&Object> {
    args.first().and_then(Value::as_object)
}

/// `type()` - the receiver's type tag. A missing or non-object receiver
/// answers nil; the taxonomy has no variant for a malformed reflective call.
fn member_type() -> NativeFn {
    NativeFn::new(|args| {
        Ok(match receiver(args) {
            Some(obj) => smallvec![Value::String(obj.type_tag().to_string())],
            None => smallvec![Value::Nil],
        })
    })
}

/// `isClass()` - whether the receiver is a class.
fn member_is_class() -> NativeFn {
    NativeFn::new(|args| {
        let answer = receiver(args).map(Object::is_class).unwrap_or(false);
        Ok(smallvec![Value::Bool(answer)])
    })
}

/// `isInstance()` - whether the receiver is an instance.
fn member_is_instance() -> NativeFn {
    NativeFn::new(|args| {
        let answer = receiver(args).map(Object::is_instance).unwrap_or(false);
        Ok(smallvec![Value::Bool(answer)])
    })
}

/// `instanceOf(target)` - ancestry test by tag value.
fn member_instance_of() -> NativeFn {
    NativeFn::new(|args| {
        let answer = match (receiver(args), args.get(1).and_then(Value::as_object)) {
            (Some(obj), Some(target)) => obj.instance_of(target),
            _ => false,
        };
        Ok(smallvec![Value::Bool(answer)])
    })
}

/// `Extend(name, operatorOverrides?)` - build a subclass of the receiver.
/// Anything other than a class receiver, a string name, and an optional
/// table of function-valued overrides is an invalid extension call.
fn member_extend() -> NativeFn {
    NativeFn::new(|args| {
        let target = match args.first() {
            Some(Value::Object(obj)) => obj.clone(),
            other => {
                return Err(ObjectError::InvalidExtendTarget {
                    target: other.map(Value::kind).unwrap_or("nothing").to_string(),
                });
            }
        };
        let name = match args.get(1) {
            Some(Value::String(name)) => name.clone(),
            other => {
                return Err(ObjectError::InvalidExtendTarget {
                    target: format!(
                        "`{}` with a {} name",
                        target.type_tag(),
                        other.map(Value::kind).unwrap_or("missing")
                    ),
                });
            }
        };
        let overrides = match args.get(2) {
            None | Some(Value::Nil) => OperatorTable::default(),
            Some(Value::Table(table)) => overrides_from_table(table),
            Some(other) => {
                return Err(ObjectError::InvalidExtendTarget {
                    target: format!("`{}` with {} overrides", target.type_tag(), other.kind()),
                });
            }
        };

        let class = target.extend(&name, overrides)?;
        Ok(smallvec![Value::Object(Object::Class(class))])
    })
}

/// Read `stringify` / `concatenate` overrides out of a dynamic table.
/// Non-function entries are treated as unset. A dynamic override that fails
/// falls back to the universal default: operators are total by contract.
fn overrides_from_table(table: &crate::value::Table) -> OperatorTable {
    let mut overrides = OperatorTable::default();

    if let Some(Value::Function(f)) = table.get("stringify") {
        overrides.stringify = Some(Rc::new(move |obj: &Object| {
            match f.call(&[Value::Object(obj.clone())]) {
                Ok(values) => match values.first() {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => printer::default_stringify(obj),
                },
                Err(_) => printer::default_stringify(obj),
            }
        }));
    }

    if let Some(Value::Function(f)) = table.get("concatenate") {
        overrides.concatenate = Some(Rc::new(move |prefix: &str, obj: &Object| {
            let args = [Value::String(prefix.to_string()), Value::Object(obj.clone())];
            match f.call(&args) {
                Ok(values) => match values.first() {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => format!("{}{}", prefix, printer::stringify(obj)),
                },
                Err(_) => format!("{}{}", prefix, printer::stringify(obj)),
            }
        }));
    }

    overrides
}
