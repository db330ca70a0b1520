// Lineage Objects - Tagged Object Record
//
// Every object carries an explicit discriminant: it is a class or an
// instance, never an anonymous record probed for telltale fields. All
// dispatch in the model is pattern matching on this enum.

use std::fmt;

use crate::class::{create_class, Class, OperatorTable};
use crate::conditions::ObjectError;
use crate::instance::Instance;

/// A class or an instance. The two discriminants are mutually exclusive and
/// exhaustive; `is_class` and `is_instance` are derived from nothing else.
#[derive(Clone)]
pub enum Object {
    Class(Class),
    Instance(Instance),
}

impl Object {
    /// The type tag: a class reports its own tag, an instance reports its
    /// class's tag. Tags are not guaranteed globally unique.
    pub fn type_tag(&self) -> &str {
        match self {
            Object::Class(class) => class.tag(),
            Object::Instance(instance) => instance.class().tag(),
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Object::Class(_))
    }

    pub fn is_instance(&self) -> bool {
        matches!(self, Object::Instance(_))
    }

    /// Walk this object's own ancestry chain - self, then successive parents
    /// (parent classes for a class, parent instances for an instance) -
    /// comparing each link's type tag against the target's tag.
    ///
    /// Comparison is by tag value, not identity: two unrelated classes that
    /// share a tag are indistinguishable here. That is a documented quirk of
    /// the model, not something this walk special-cases.
    pub fn instance_of(&self, target: &Object) -> bool {
        let want = target.type_tag();
        match self {
            Object::Class(class) => {
                let mut cursor = Some(class);
                while let Some(class) = cursor {
                    if class.tag() == want {
                        return true;
                    }
                    cursor = class.parent();
                }
                false
            }
            Object::Instance(instance) => {
                let mut cursor = Some(instance);
                while let Some(instance) = cursor {
                    if instance.class().tag() == want {
                        return true;
                    }
                    cursor = instance.parent();
                }
                false
            }
        }
    }

    /// Build a subclass. Fails with `InvalidExtendTarget` on an instance:
    /// extension is a class-level operation.
    pub fn extend(&self, name: &str, overrides: OperatorTable) -> Result<Class, ObjectError> {
        match self {
            Object::Class(class) => Ok(create_class(class, name, overrides)),
            Object::Instance(instance) => Err(ObjectError::InvalidExtendTarget {
                target: format!("an instance of `{}`", instance.class().tag()),
            }),
        }
    }

    /// The type tags along this object's own ancestry chain, self first.
    pub fn ancestry_tags(&self) -> Vec<String> {
        let mut tags = Vec::new();
        match self {
            Object::Class(class) => {
                let mut cursor = Some(class);
                while let Some(class) = cursor {
                    tags.push(class.tag().to_string());
                    cursor = class.parent();
                }
            }
            Object::Instance(instance) => {
                let mut cursor = Some(instance);
                while let Some(instance) = cursor {
                    tags.push(instance.class().tag().to_string());
                    cursor = instance.parent();
                }
            }
        }
        tags
    }

    /// Identity: the same class descriptor or the same instance.
    pub fn same(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Class(a), Object::Class(b)) => a.same(b),
            (Object::Instance(a), Object::Instance(b)) => a.same(b),
            _ => false,
        }
    }
}

impl From<Class> for Object {
    fn from(class: Class) -> Self {
        Object::Class(class)
    }
}

impl From<Instance> for Object {
    fn from(instance: Instance) -> Self {
        Object::Instance(instance)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Class(class) => write!(f, "#<class:{}>", class.tag()),
            Object::Instance(instance) => write!(f, "#<instance:{}>", instance.class().tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{one, Table, Value};

    #[test]
    fn test_discriminants_are_exclusive() {
        let root = Class::root();
        let class = root.extend("Thing");
        class.set_constructor(|_args| Ok(one(Value::Table(Table::new()))));
        let instance = class.construct(&[]).unwrap();

        let as_class = Object::Class(class);
        let as_instance = Object::Instance(instance);
        assert!(as_class.is_class() && !as_class.is_instance());
        assert!(as_instance.is_instance() && !as_instance.is_class());
    }

    #[test]
    fn test_class_ancestry_walk() {
        let root = Class::root();
        let animal = root.extend("Animal");
        let dog = animal.extend("Dog");

        let dog_obj = Object::Class(dog);
        assert!(dog_obj.instance_of(&Object::Class(animal.clone())));
        assert!(dog_obj.instance_of(&Object::Class(root.clone())));
        assert!(!Object::Class(animal).instance_of(&dog_obj));
        assert_eq!(dog_obj.ancestry_tags(), vec!["Dog", "Animal", "Object"]);
    }

    #[test]
    fn test_shared_tags_are_indistinguishable() {
        // Two unrelated classes with the same tag: the tag-value comparison
        // cannot tell them apart.
        let root = Class::root();
        let a = root.extend("Twin");
        let b = root.extend("Twin");
        assert!(Object::Class(a).instance_of(&Object::Class(b)));
    }

    #[test]
    fn test_extend_rejects_instances() {
        let root = Class::root();
        let class = root.extend("Point");
        class.set_constructor(|_args| Ok(one(Value::Table(Table::new()))));
        let instance = class.construct(&[]).unwrap();

        let err = Object::Instance(instance)
            .extend("Sub", OperatorTable::default())
            .unwrap_err();
        assert_eq!(
            err,
            ObjectError::InvalidExtendTarget {
                target: "an instance of `Point`".to_string()
            }
        );

        assert!(Object::Class(class).extend("Sub", OperatorTable::default()).is_ok());
    }

    #[test]
    fn test_identity() {
        let root = Class::root();
        let a = root.extend("A");
        assert!(Object::Class(a.clone()).same(&Object::Class(a.clone())));
        assert!(!Object::Class(a).same(&Object::Class(root)));
    }
}
