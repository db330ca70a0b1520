// Lineage Classes - Descriptors and the Class Factory
//
// A class descriptor is immutable after creation except for its constructor
// slot. Operator inheritance is computed once, at creation time: the merged
// table is stored on the descriptor, so dispatch never walks the chain.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use smallvec::smallvec;

use crate::conditions::ObjectError;
use crate::object::Object;
use crate::value::{NativeFn, Value, Values};

/// A constructor function. Returns a fields table, optionally followed by a
/// parent instance to splice in as the ancestry link. Fallible so that
/// explicit delegation (`parent.construct(args)?` inside the closure) can
/// propagate structural errors.
pub type Constructor = Rc<dyn Fn(&[Value]) -> Result<Values, ObjectError>>;

/// A text-conversion operator.
pub type StringifyFn = Rc<dyn Fn(&Object) -> String>;

/// A text-concatenation operator. Receives the already-converted prefix and
/// the object being joined.
pub type ConcatFn = Rc<dyn Fn(&str, &Object) -> String>;

/// The per-class operator capability set. An unset operator falls through to
/// the nearest ancestor's definition; the root holds the universal defaults,
/// so a merged table is never empty.
#[derive(Clone, Default)]
pub struct OperatorTable {
    pub stringify: Option<StringifyFn>,
    pub concatenate: Option<ConcatFn>,
}

impl OperatorTable {
    pub fn with_stringify(f: impl Fn(&Object) -> String + 'static) -> Self {
        OperatorTable {
            stringify: Some(Rc::new(f)),
            ..OperatorTable::default()
        }
    }

    pub fn with_concatenate(f: impl Fn(&str, &Object) -> String + 'static) -> Self {
        OperatorTable {
            concatenate: Some(Rc::new(f)),
            ..OperatorTable::default()
        }
    }

    /// Merge: this table's operators win; unset ones inherit from `parent`.
    fn merged_over(&self, parent: &OperatorTable) -> OperatorTable {
        OperatorTable {
            stringify: self.stringify.clone().or_else(|| parent.stringify.clone()),
            concatenate: self
                .concatenate
                .clone()
                .or_else(|| parent.concatenate.clone()),
        }
    }

    fn is_empty(&self) -> bool {
        self.stringify.is_none() && self.concatenate.is_none()
    }
}

struct ClassDef {
    tag: String,
    parent: Option<Class>,
    operators: OperatorTable,
    members: HashMap<String, Value>,
    constructor: RefCell<Option<Constructor>>,
}

/// A shared handle to a class descriptor: type tag, optional parent (absent
/// only on the root), merged operator table, own-member table, and the
/// late-bound constructor slot. Cloning the handle does not copy the class.
#[derive(Clone)]
pub struct Class(Rc<ClassDef>);

impl Class {
    pub(crate) fn with_parts(
        tag: String,
        parent: Option<Class>,
        operators: OperatorTable,
        members: HashMap<String, Value>,
    ) -> Class {
        Class(Rc::new(ClassDef {
            tag,
            parent,
            operators,
            members,
            constructor: RefCell::new(None),
        }))
    }

    /// The type tag. Not guaranteed globally unique.
    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// Only the root has no parent.
    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// The merged operator table: overrides win per-operator, unset
    /// operators fall through to the nearest ancestor, terminating at the
    /// root defaults.
    pub fn operators(&self) -> &OperatorTable {
        &self.0.operators
    }

    /// A member defined directly on this class (not inherited): the
    /// conventional `super` field, this class's own operator overrides, and
    /// on the root the globally inherited members.
    pub fn own_member(&self, name: &str) -> Option<Value> {
        self.0.members.get(name).cloned()
    }

    /// Member lookup: own members first, then the parent chain, terminating
    /// at the root.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.own_member(name) {
            return Some(value);
        }
        let mut cursor = self.parent();
        while let Some(class) = cursor {
            if let Some(value) = class.own_member(name) {
                return Some(value);
            }
            cursor = class.parent();
        }
        None
    }

    /// Assign the constructor. The sole mutable slot of a class; application
    /// code may assign it any time after creation.
    pub fn set_constructor(
        &self,
        ctor: impl Fn(&[Value]) -> Result<Values, ObjectError> + 'static,
    ) {
        *self.0.constructor.borrow_mut() = Some(Rc::new(ctor));
    }

    /// This class's own constructor, if assigned.
    pub fn own_constructor(&self) -> Option<Constructor> {
        self.0.constructor.borrow().clone()
    }

    /// The nearest constructor along the ancestry chain: this class's own,
    /// else the closest ancestor's. The root defines none and terminates the
    /// search.
    pub fn resolve_constructor(&self) -> Option<Constructor> {
        if let Some(ctor) = self.own_constructor() {
            return Some(ctor);
        }
        let mut cursor = self.parent();
        while let Some(class) = cursor {
            if let Some(ctor) = class.own_constructor() {
                return Some(ctor);
            }
            cursor = class.parent();
        }
        None
    }

    /// Build a subclass with no operator overrides.
    pub fn extend(&self, name: &str) -> Class {
        create_class(self, name, OperatorTable::default())
    }

    /// Build a subclass with per-class operator overrides.
    pub fn extend_with(&self, name: &str, overrides: OperatorTable) -> Class {
        create_class(self, name, overrides)
    }

    /// The type tags along the ancestry chain, self first, root last.
    pub fn ancestry(&self) -> Vec<String> {
        let mut tags = vec![self.0.tag.clone()];
        let mut cursor = self.parent();
        while let Some(class) = cursor {
            tags.push(class.tag().to_string());
            cursor = class.parent();
        }
        tags
    }

    /// Identity: the same class descriptor.
    pub fn same(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<class:{}>", self.0.tag)
    }
}

/// The Class Factory: derive a new class from `parent`.
///
/// The operator table is merged here, once; the parent lands in the member
/// table under the conventional `super` name so constructors can delegate
/// explicitly. The new class's invocation behavior is the construction
/// protocol (`Class::construct`).
pub fn create_class(parent: &Class, name: &str, overrides: OperatorTable) -> Class {
    let merged = overrides.merged_over(parent.operators());

    let mut members = HashMap::new();
    members.insert(
        "super".to_string(),
        Value::Object(Object::Class(parent.clone())),
    );
    if !overrides.is_empty() {
        install_operator_members(&mut members, &overrides);
    }

    Class::with_parts(name.to_string(), Some(parent.clone()), merged, members)
}

/// Expose a class's own operator overrides as callable members, so they are
/// reachable through attribute resolution like any other function-valued
/// slot.
pub(crate) fn install_operator_members(
    members: &mut HashMap<String, Value>,
    operators: &OperatorTable,
) {
    if let Some(stringify) = operators.stringify.clone() {
        members.insert(
            "stringify".to_string(),
            Value::Function(NativeFn::new(move |args| {
                Ok(match args.first() {
                    Some(Value::Object(obj)) => smallvec![Value::String(stringify(obj))],
                    _ => smallvec![Value::Nil],
                })
            })),
        );
    }
    if let Some(concatenate) = operators.concatenate.clone() {
        members.insert(
            "concatenate".to_string(),
            Value::Function(NativeFn::new(move |args| {
                let prefix = args.first().map(|v| v.to_string()).unwrap_or_default();
                Ok(match args.get(1) {
                    Some(Value::Object(obj)) => {
                        smallvec![Value::String(concatenate(&prefix, obj))]
                    }
                    _ => smallvec![Value::Nil],
                })
            })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer;

    #[test]
    fn test_extend_sets_tag_and_parent() {
        let root = Class::root();
        let shape = root.extend("Shape");
        assert_eq!(shape.tag(), "Shape");
        assert!(!shape.is_root());
        assert!(shape.parent().unwrap().same(&root));
        assert_eq!(shape.ancestry(), vec!["Shape", "Object"]);
    }

    #[test]
    fn test_super_member() {
        let root = Class::root();
        let shape = root.extend("Shape");
        let circle = shape.extend("Circle");

        let sup = circle.own_member("super").unwrap();
        match sup {
            Value::Object(Object::Class(class)) => assert!(class.same(&shape)),
            other => panic!("super resolved to {:?}", other),
        }
        // The root exposes no super; it terminates every chain.
        assert!(root.own_member("super").is_none());
    }

    #[test]
    fn test_operator_merge_override_wins() {
        let root = Class::root();
        let loud = root.extend_with(
            "Loud",
            OperatorTable::with_stringify(|obj| format!("LOUD {}", obj.type_tag())),
        );
        let quiet = loud.extend("Quiet");

        // Quiet sets nothing of its own, so it inherits Loud's stringify and
        // the root's concatenate.
        let quiet_obj = Object::Class(quiet.clone());
        let s = (quiet.operators().stringify.as_ref().unwrap())(&quiet_obj);
        assert_eq!(s, "LOUD Quiet");
        assert!(quiet.operators().concatenate.is_some());

        let softer = quiet.extend_with(
            "Softer",
            OperatorTable::with_stringify(|obj| format!("soft {}", obj.type_tag())),
        );
        let softer_obj = Object::Class(softer.clone());
        let s = (softer.operators().stringify.as_ref().unwrap())(&softer_obj);
        assert_eq!(s, "soft Softer");
    }

    #[test]
    fn test_member_lookup_walks_chain() {
        let root = Class::root();
        let a = root.extend("A");
        let b = a.extend("B");

        // B's own super is A; lookup finds the nearest definition.
        match b.lookup("super") {
            Some(Value::Object(Object::Class(class))) => assert!(class.same(&a)),
            other => panic!("super resolved to {:?}", other),
        }
        // Globally inherited members resolve through the chain to the root.
        assert!(matches!(b.lookup("type"), Some(Value::Function(_))));
        assert!(b.lookup("no-such-member").is_none());
    }

    #[test]
    fn test_own_operator_overrides_are_callable_members() {
        let root = Class::root();
        let tagged = root.extend_with(
            "Tagged",
            OperatorTable::with_stringify(|obj| format!("<{}>", obj.type_tag())),
        );
        let plain = tagged.extend("Plain");

        // The override is an own member of the class that declared it only.
        let member = tagged.own_member("stringify").unwrap();
        let f = match member {
            Value::Function(f) => f,
            other => panic!("stringify member is {:?}", other),
        };
        let out = f
            .call(&[Value::Object(Object::Class(tagged.clone()))])
            .unwrap();
        assert_eq!(out.as_slice(), &[Value::String("<Tagged>".to_string())]);
        assert!(plain.own_member("stringify").is_none());
    }

    #[test]
    fn test_constructor_slot_is_late_bound() {
        let root = Class::root();
        let a = root.extend("A");
        let b = a.extend("B");
        assert!(b.resolve_constructor().is_none());

        a.set_constructor(|_args| Ok(crate::value::one(Value::Table(crate::value::Table::new()))));
        // B now resolves A's constructor as the nearest definition.
        assert!(b.own_constructor().is_none());
        assert!(b.resolve_constructor().is_some());
    }

    #[test]
    fn test_class_values_print_with_the_default() {
        let root = Class::root();
        let shape = root.extend("Shape");
        assert_eq!(printer::stringify(&Object::Class(shape)), "[object Shape]");
    }
}
