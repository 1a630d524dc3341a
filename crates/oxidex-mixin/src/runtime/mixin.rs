//! Mixin application.
//!
//! A mixin is either **imperative** (a [`Function`] that receives the target
//! class and mutates it however it likes) or **declarative** (a
//! [`MixinSpec`] whose members are copied onto the target).
//!
//! Classes and instances are accepted too:
//! - a [`Class`] is imperative: its initializer runs on a fresh instance
//!   with the target class as the only argument, and the instance is
//!   dropped
//! - an [`Object`] is declarative: its enumerable members (own fields
//!   first, then its class's), read through getters at resolution time,
//!   form the specification
//!
//! # Application Order
//!
//! For a declarative mixin, against a single target:
//! 1. Static members are installed on the class itself
//! 2. Included mixins are applied, in list order, depth-first
//! 3. Instance members are installed, skipping the reserved names
//!    [`RESERVED_KEYS`]
//!
//! Later installs overwrite earlier ones, so later includes win over earlier
//! includes and a specification's own members win over everything it
//! includes.
//!
//! An imperative mixin is only called; none of the steps above run for it.
//!
//! # Kind Resolution
//!
//! The kind of every mixin in an include tree is resolved up front, before
//! the target is touched. A malformed mixin anywhere in the tree fails the
//! whole application with [`Error::InvalidMixinKind`] and leaves the target
//! unchanged.

use crate::error::{Error, Result};
use crate::runtime::{Class, Function, MixinSpec, Object, Value};
use oxidex_log::trace;
use std::sync::Arc;

/// Member names that configure a definition instead of naming a member.
pub const RESERVED_KEYS: [&str; 4] = ["constructor", "static", "include", "inherit"];

/// Returns `true` if `name` is one of [`RESERVED_KEYS`].
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// A mixin whose kind has been resolved.
#[derive(Clone, Debug)]
pub enum Mixin {
    /// Function called with the target class.
    Imperative(Function),
    /// Specification copied onto the target.
    Declarative(DeclarativeMixin),
}

/// A declarative specification together with its resolved includes.
#[derive(Clone, Debug)]
pub struct DeclarativeMixin {
    spec: Arc<MixinSpec>,
    include: Vec<Mixin>,
}

impl DeclarativeMixin {
    /// Returns the underlying specification.
    #[must_use]
    pub fn spec(&self) -> &MixinSpec {
        &self.spec
    }

    /// Returns the resolved include list.
    #[must_use]
    pub fn includes(&self) -> &[Mixin] {
        &self.include
    }
}

impl Mixin {
    /// Resolves a specification and, recursively, everything it includes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMixinKind`] for the first include (depth-first)
    /// that is not a function, class, object or specification. Propagates
    /// getter failures while snapshotting object includes.
    pub fn declarative(spec: Arc<MixinSpec>) -> Result<Self> {
        let include = spec
            .include
            .iter()
            .cloned()
            .map(Mixin::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Mixin::Declarative(DeclarativeMixin { spec, include }))
    }

    /// Applies this mixin to `target`.
    ///
    /// # Errors
    ///
    /// Propagates failures from imperative mixins and from installing
    /// members (see [`Class::define_member`]).
    pub fn apply(&self, target: &Class) -> Result<()> {
        match self {
            Mixin::Imperative(function) => {
                trace!("{}: calling mixin {}", target.name(), function.name());
                function.call(&Value::Undefined, &[Value::Class(target.clone())])?;
            }
            Mixin::Declarative(declarative) => declarative.apply(target)?,
        }
        Ok(())
    }
}

impl DeclarativeMixin {
    fn apply(&self, target: &Class) -> Result<()> {
        for (name, member) in self.spec.statics() {
            target.define_static(name, member.clone())?;
        }

        for mixin in &self.include {
            mixin.apply(target)?;
        }

        for (name, member) in self.spec.members() {
            if is_reserved(name) {
                trace!("{}: skipping reserved key '{name}'", target.name());
                continue;
            }
            target.define_member(name, member.clone())?;
        }

        Ok(())
    }
}

impl TryFrom<Value> for Mixin {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Function(function) => Ok(Mixin::Imperative(function)),
            Value::Class(class) => {
                Ok(Mixin::Imperative(initializer_mixin(class)))
            }
            Value::Object(object) => {
                Mixin::declarative(Arc::new(object_spec(&object)?))
            }
            Value::Mixin(spec) => Mixin::declarative(spec),
            other => Err(Error::InvalidMixinKind { kind: other.kind() }),
        }
    }
}

/// Wraps `class` so that applying it instantiates it with the target.
fn initializer_mixin(class: Class) -> Function {
    let name = class.name().to_owned();
    Function::new(&name, move |_, args| {
        class.instantiate(args).map(Value::Object)
    })
}

fn object_spec(object: &Object) -> Result<MixinSpec> {
    object
        .keys()
        .iter()
        .try_fold(MixinSpec::new(), |spec, name| {
            Ok(spec.member(name, object.get(name)?))
        })
}

/// Applies a mixin to an existing class.
///
/// # Example
///
/// ```rust
/// use oxidex_mixin::{Class, MixinSpec, Value, apply_mixin};
///
/// let class = Class::new_root("Cat");
/// apply_mixin(&class, MixinSpec::new().member("legs", 4)).unwrap();
///
/// let cat = class.instantiate(&[]).unwrap();
/// assert_eq!(cat.get("legs").unwrap(), Value::from(4));
///
/// assert!(apply_mixin(&class, 5).is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidMixinKind`] if `mixin` or anything it includes is
/// a primitive (undefined, null, boolean, number or string); the class is
/// left unchanged in that case. Propagates failures from imperative mixins and from
/// installing members.
pub fn apply_mixin(target: &Class, mixin: impl Into<Value>) -> Result<()> {
    Mixin::try_from(mixin.into())?.apply(target)
}
