// Lineage: an embedded dynamic object model.
//
// Classes are first-class values: extend them into subclasses, invoke them
// as constructors to produce instances, and override the per-class text
// operators with inheritance fallback. Single-threaded by construction
// (Rc-based); callers wanting concurrent class creation serialize outside.

pub mod class;
pub mod conditions;
pub mod construct;
pub mod instance;
pub mod object;
pub mod printer;
pub mod root;
pub mod value;
