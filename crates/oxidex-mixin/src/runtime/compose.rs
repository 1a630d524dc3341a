//! Type composition.
//!
//! [`compose_type`] turns a [`TypeDefinition`] into a [`Class`]:
//!
//! 1. The initializer is the definition's constructor, or a default that
//!    delegates to the parent's initializer (and does nothing without one)
//! 2. With `inherit`, the class keeps a link to its parent and starts from a
//!    copy of the parent's instance members
//! 3. The definition itself is applied as the root declarative mixin
//! 4. A static factory named [`FACTORY`] is attached unless the definition
//!    already installed a static of that name
//!
//! The factory forwards every argument it receives to
//! [`Class::instantiate`]; there is no arity limit.

use crate::error::Result;
use crate::runtime::{Class, Function, Mixin, TypeDefinition, Value};
use oxidex_log::debug;
use std::sync::Arc;

/// Name of the static factory attached to every composed class.
pub const FACTORY: &str = "new";

/// Name given to classes composed without one.
pub const ANONYMOUS: &str = "Anonymous";

/// Composes a definition into a new class.
///
/// # Example
///
/// ```rust
/// use oxidex_mixin::{TypeDefinition, Value, compose_type};
///
/// let why = compose_type(
///     TypeDefinition::new()
///         .named("Why")
///         .constructor(|this, args| {
///             this.set("blah", args.first().cloned().unwrap_or_default())
///         })
///         .static_method("doThis", |class, args| {
///             Ok(Value::from(class.instantiate(args)?))
///         }),
/// )
/// .unwrap();
///
/// let w = why.call_static("doThis", &["I don't know".into()]).unwrap();
/// let w = w.as_object().unwrap();
/// assert_eq!(w.get("blah").unwrap(), Value::from("I don't know"));
///
/// let empty = why.call_static("new", &[]).unwrap();
/// assert!(empty.as_object().unwrap().get("blah").unwrap().is_undefined());
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidMixinKind`](crate::Error::InvalidMixinKind) if
/// any entry of the include tree is neither a function nor a specification;
/// no class is produced in that case. Propagates failures from imperative
/// mixins and from installing members.
pub fn compose_type(definition: TypeDefinition) -> Result<Class> {
    let definition = Arc::new(definition);
    let root = Mixin::declarative(Arc::clone(&definition))?;

    let name = definition
        .name
        .clone()
        .unwrap_or_else(|| Arc::from(ANONYMOUS));
    let class = Class::create(
        name,
        definition.inherit.clone(),
        definition.constructor.clone(),
    );

    root.apply(&class)?;

    if !class.has_static(FACTORY) {
        class.define_static(FACTORY, factory())?;
    }

    debug!(
        "composed {} (parent: {}, includes: {}, members: {})",
        class.name(),
        class.super_class().map_or("none", Class::name),
        definition.include.len(),
        class.prototype().len()
    );

    Ok(class)
}

/// The default static factory: instantiates its receiver with all arguments.
fn factory() -> Function {
    Function::class_method(FACTORY, |class, args| {
        Ok(Value::Object(class.instantiate(args)?))
    })
}
