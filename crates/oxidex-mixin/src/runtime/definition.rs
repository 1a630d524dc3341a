//! Type definitions and declarative mixin specifications.
//!
//! A [`TypeDefinition`] describes a class to compose: a name, an
//! initializer, a parent, included mixins, static members and instance
//! members. The same shape doubles as a declarative mixin ([`MixinSpec`]);
//! when applied as a mixin the name, initializer and parent are ignored.
//!
//! Definitions are built by value. Once wrapped in a [`Value`] (for example
//! by passing one to [`TypeDefinition::include`]) a specification is shared
//! and immutable, so applying it to any number of classes never changes it.

use crate::error::Result;
use crate::runtime::class::Initializer;
use crate::runtime::compose::compose_type;
use crate::runtime::{Class, Descriptor, Function, Member, Object, Value};
use std::fmt;
use std::sync::Arc;

/// A declarative mixin: a [`TypeDefinition`] used as data.
pub type MixinSpec = TypeDefinition;

/// Description of a class to compose.
///
/// # Example
///
/// ```rust
/// use oxidex_mixin::{MixinSpec, TypeDefinition, Value};
///
/// let fooable = MixinSpec::new()
///     .member("foo", "foo")
///     .method("getFoo", |this, _| this.get("foo"));
///
/// let thing = TypeDefinition::new()
///     .named("FooableThing")
///     .include(fooable)
///     .compose()
///     .unwrap();
///
/// let f = thing.instantiate(&[]).unwrap();
/// assert_eq!(f.call("getFoo", &[]).unwrap(), Value::from("foo"));
/// ```
#[derive(Clone, Default)]
pub struct TypeDefinition {
    pub(crate) name: Option<Arc<str>>,
    pub(crate) constructor: Option<Initializer>,
    pub(crate) inherit: Option<Class>,
    pub(crate) include: Vec<Value>,
    pub(crate) statics: Vec<(Arc<str>, Member)>,
    pub(crate) members: Vec<(Arc<str>, Member)>,
}

/// Replaces the entry named `name` in place, or appends it.
fn upsert(entries: &mut Vec<(Arc<str>, Member)>, name: &str, member: Member) {
    match entries.iter_mut().find(|(existing, _)| &**existing == name) {
        Some((_, slot)) => *slot = member,
        None => entries.push((Arc::from(name), member)),
    }
}

impl TypeDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the class name.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    /// Sets the initializer run on every new instance.
    #[must_use]
    pub fn constructor<F>(mut self, initializer: F) -> Self
    where
        F: Fn(&Object, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(initializer));
        self
    }

    /// Sets the parent class.
    #[must_use]
    pub fn inherit(mut self, parent: &Class) -> Self {
        self.inherit = Some(parent.clone());
        self
    }

    /// Appends a mixin to the include list.
    ///
    /// Anything convertible to a [`Value`] is accepted here; the mixin kind
    /// is checked when the definition is composed or applied.
    #[must_use]
    pub fn include(mut self, mixin: impl Into<Value>) -> Self {
        self.include.push(mixin.into());
        self
    }

    /// Adds a plain instance member.
    #[must_use]
    pub fn member(mut self, name: &str, value: impl Into<Value>) -> Self {
        upsert(&mut self.members, name, Member::Value(value.into()));
        self
    }

    /// Adds an instance method.
    #[must_use]
    pub fn method<F>(self, name: &str, imp: F) -> Self
    where
        F: Fn(&Object, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let function = Function::method(name, imp);
        self.member(name, function)
    }

    /// Adds an instance member installed as a descriptor.
    #[must_use]
    pub fn descriptor(mut self, name: &str, descriptor: Descriptor) -> Self {
        upsert(&mut self.members, name, Member::Descriptor(descriptor));
        self
    }

    /// Adds a plain static member.
    #[must_use]
    pub fn static_member(mut self, name: &str, value: impl Into<Value>) -> Self {
        upsert(&mut self.statics, name, Member::Value(value.into()));
        self
    }

    /// Adds a static method; its receiver is the class.
    #[must_use]
    pub fn static_method<F>(self, name: &str, imp: F) -> Self
    where
        F: Fn(&Class, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let function = Function::class_method(name, imp);
        self.static_member(name, function)
    }

    /// Adds a static member installed as a descriptor.
    #[must_use]
    pub fn static_descriptor(mut self, name: &str, descriptor: Descriptor) -> Self {
        upsert(&mut self.statics, name, Member::Descriptor(descriptor));
        self
    }

    /// Composes this definition into a class. See [`compose_type`].
    ///
    /// # Errors
    ///
    /// See [`compose_type`].
    pub fn compose(self) -> Result<Class> {
        compose_type(self)
    }

    /// Returns the class name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the parent class, if set.
    #[must_use]
    pub fn parent(&self) -> Option<&Class> {
        self.inherit.as_ref()
    }

    /// Returns `true` if an initializer was supplied.
    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Returns the include list.
    #[must_use]
    pub fn includes(&self) -> &[Value] {
        &self.include
    }

    /// Returns the instance members in definition order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(name, member)| (&**name, member))
    }

    /// Returns the static members in definition order.
    pub fn statics(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.statics.iter().map(|(name, member)| (&**name, member))
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("constructor", &self.constructor.is_some())
            .field("inherit", &self.inherit.as_ref().map(Class::name))
            .field("include", &self.include)
            .field("statics", &self.statics)
            .field("members", &self.members)
            .finish()
    }
}
