//! `oxidex-mixin`: class composition for the `OxideX` runtime
//!
//! Builds concrete classes out of declarative descriptions:
//!
//! - **Inheritance** from a single parent class
//! - **Mixins**, either declarative specifications copied onto the class or
//!   imperative functions that mutate it directly, nested to any depth
//! - **Static members** attached to the class itself
//! - **Accessor members** (getters/setters) next to plain values
//!
//! # Example
//!
//! ```rust
//! use oxidex_mixin::{MixinSpec, TypeDefinition, Value};
//!
//! let fooable = MixinSpec::new()
//!     .member("foo", "foo")
//!     .method("getFoo", |this, _| this.get("foo"));
//!
//! let base = TypeDefinition::new().include(fooable).compose().unwrap();
//!
//! let baz_foo = TypeDefinition::new()
//!     .inherit(&base)
//!     .constructor(|this, args| {
//!         this.set("baz", args.first().cloned().unwrap_or_default())?;
//!         match args.get(1) {
//!             Some(foo) if foo.is_truthy() => this.set("foo", foo.clone()),
//!             _ => Ok(()),
//!         }
//!     })
//!     .method("foobaz", |this, _| {
//!         Ok(Value::from(format!("{}{}", this.get("foo")?, this.get("baz")?)))
//!     })
//!     .compose()
//!     .unwrap();
//!
//! let bf = baz_foo.instantiate(&["lol".into()]).unwrap();
//! assert!(bf.is_instance_of(&base));
//! assert_eq!(bf.call("foobaz", &[]).unwrap(), Value::from("foolol"));
//! ```

pub mod error;
pub mod runtime;

// Re-export commonly used types
pub use error::{Error, Result};
pub use runtime::{
    Class, Descriptor, Function, Member, Mixin, MixinSpec, Object, Prototype,
    TypeDefinition, Value,
    apply_mixin, compose_type,
};
