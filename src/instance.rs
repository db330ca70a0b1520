// Lineage Instances - The Instance Factory and Attribute Resolution
//
// An instance is a shared handle to its metadata: a reference to the class
// that produced it (the class outlives all its instances), an owned ancestry
// link to a parent instance, and the fields record its constructor returned.
// Attribute resolution is an explicit loop over this graph, one canonical
// order, no delegation magic.

use std::fmt;
use std::rc::Rc;

use crate::class::Class;
use crate::value::{Table, Value};

struct InstanceData {
    class: Class,
    parent: Option<Instance>,
    fields: Table,
}

/// A shared handle to one instance. Cloning the handle does not copy the
/// instance.
#[derive(Clone)]
pub struct Instance(Rc<InstanceData>);

/// The Instance Factory: bind a fields record, its owning class, and an
/// optional ancestry link into a finished instance.
pub fn create_instance(class: Class, parent: Option<Instance>, fields: Table) -> Instance {
    Instance(Rc::new(InstanceData {
        class,
        parent,
        fields,
    }))
}

impl Instance {
    /// The owning class.
    pub fn class(&self) -> &Class {
        &self.0.class
    }

    /// The ancestry link. May be shorter-lived than the class chain: a
    /// constructor is free not to delegate.
    pub fn parent(&self) -> Option<&Instance> {
        self.0.parent.as_ref()
    }

    /// The fields record. Shared with whoever built it.
    pub fn fields(&self) -> &Table {
        &self.0.fields
    }

    /// A field set directly on this instance, ignoring the resolution chain.
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0.fields.get(name)
    }

    /// Full attribute resolution for a key absent from the instance's own
    /// fields:
    ///
    /// 1. the owning class's own members (slots defined directly on it);
    /// 2. the parent-instance chain - each ancestor's own fields, then that
    ///    ancestor's class members, the latter only when function-valued, so
    ///    data fields stay private to the instance that set them while
    ///    methods remain reachable through the class chain;
    /// 3. the root class's globally inherited members.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.get_own(name) {
            return Some(value);
        }

        if let Some(value) = self.0.class.own_member(name) {
            return Some(value);
        }

        let mut ancestor = self.parent();
        while let Some(instance) = ancestor {
            if let Some(value) = instance.get_own(name) {
                return Some(value);
            }
            if let Some(value) = instance.class().own_member(name) {
                if matches!(value, Value::Function(_)) {
                    return Some(value);
                }
            }
            ancestor = instance.parent();
        }

        let mut class = self.class();
        while let Some(parent) = class.parent() {
            class = parent;
        }
        class.own_member(name)
    }

    /// Mutate a field. Setting `Nil` removes it.
    pub fn set(&self, name: &str, value: Value) {
        self.0.fields.insert(name, value);
    }

    /// Identity: the same instance.
    pub fn same(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<instance:{}>", self.0.class.tag())
    }
}
