//! `oxidex-mixin` runtime module.
//!
//! # Architecture
//!
//! The runtime is organized into several modules:
//!
//! - [`value`]: dynamic values and callable functions
//! - [`member`]: member slots, descriptors and member tables
//! - [`class`]: composed classes (instance and static members, parent link)
//! - [`object`]: class instances
//! - [`definition`]: type definitions, which double as declarative mixins
//! - [`mixin`]: the mixin applicator
//! - [`compose`]: the type composer
//!
//! # Ownership
//!
//! Composition moves through three tiers:
//!
//! - **Specifications** ([`TypeDefinition`] / [`MixinSpec`]) are immutable
//!   once shared and are only ever read
//! - **Classes** own their member tables; composition and [`apply_mixin`]
//!   copy members into them
//! - **Snapshots** ([`Prototype`]) are detached, read-only views of a
//!   class's instance members

pub mod class;
pub mod compose;
pub mod definition;
pub mod member;
pub mod mixin;
pub mod object;
pub mod value;

pub use class::{Class, Initializer, Prototype};
pub use compose::{ANONYMOUS, FACTORY, compose_type};
pub use definition::{MixinSpec, TypeDefinition};
pub use member::{Descriptor, DescriptorKind, Member};
pub use mixin::{DeclarativeMixin, Mixin, RESERVED_KEYS, apply_mixin, is_reserved};
pub use object::Object;
pub use value::{Function, NativeFn, Value};
