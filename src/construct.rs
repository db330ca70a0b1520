// Lineage Construction - The Constructor-Chaining Protocol
//
// What happens when a class is invoked. Constructor resolution walks the
// ancestry chain; the return shape is validated; a missing ancestry link is
// synthesized by invoking the parent class with the same arguments.

use crate::class::Class;
use crate::conditions::ObjectError;
use crate::instance::{create_instance, Instance};
use crate::object::Object;
use crate::value::Value;

impl Class {
    /// Invoke this class as a constructor.
    ///
    /// The nearest constructor along the ancestry chain is called with
    /// `args`. It must return a fields table and may return a parent
    /// instance as a second value. When it does not, and the immediate
    /// parent class is not the root, the parent class is invoked with the
    /// same arguments to synthesize the ancestry link; the root takes no
    /// construction arguments and holds no state, so chains ending directly
    /// under it get no link. Errors raised while synthesizing the parent
    /// propagate unchanged.
    pub fn construct(&self, args: &[Value]) -> Result<Instance, ObjectError> {
        let ctor = self
            .resolve_constructor()
            .ok_or_else(|| ObjectError::MissingConstructor {
                class: self.tag().to_string(),
            })?;

        let returned = ctor(args)?;

        let fields = match returned.first() {
            Some(Value::Table(table)) => table.clone(),
            other => {
                return Err(ObjectError::InvalidConstructorReturn {
                    class: self.tag().to_string(),
                    expected: "a fields table",
                    found: other.map(Value::kind).unwrap_or("nothing"),
                });
            }
        };

        let explicit_parent = match returned.get(1) {
            None | Some(Value::Nil) => None,
            Some(Value::Object(Object::Instance(instance))) => Some(instance.clone()),
            Some(other) => {
                return Err(ObjectError::InvalidConstructorReturn {
                    class: self.tag().to_string(),
                    expected: "a parent instance",
                    found: other.kind(),
                });
            }
        };

        let parent = match explicit_parent {
            Some(instance) => Some(instance),
            None => match self.parent() {
                Some(parent_class) if !parent_class.is_root() => {
                    Some(parent_class.construct(args)?)
                }
                _ => None,
            },
        };

        Ok(create_instance(self.clone(), parent, fields))
    }
}
