// Common test fixtures for integration tests
//
// Mirrors the classic composition scenarios: a `Fooable` mixin, a class
// that includes it, a subclass with its own constructor, and a `Person`
// with a computed `fullName`.

#![allow(dead_code)]

use oxidex_mixin::{
    Class, Descriptor, Function, MixinSpec, TypeDefinition, Value,
};

/// Declarative mixin with a plain `foo` member and a `getFoo` method.
pub fn fooable_mixin() -> MixinSpec {
    MixinSpec::new()
        .member("foo", "foo")
        .method("getFoo", |this, _| this.get("foo"))
}

/// Class composed from [`fooable_mixin`] alone.
pub fn fooable_thing() -> Class {
    TypeDefinition::new()
        .named("FooableThing")
        .include(fooable_mixin())
        .compose()
        .expect("Failed to compose FooableThing")
}

/// Subclass of `parent` taking `(baz, foo?)`; `foo` overrides the inherited
/// default only when truthy.
pub fn baz_foo(parent: &Class) -> Class {
    TypeDefinition::new()
        .named("BazFoo")
        .inherit(parent)
        .constructor(|this, args| {
            this.set("baz", arg(args, 0))?;
            let foo = arg(args, 1);
            if foo.is_truthy() {
                this.set("foo", foo)?;
            }
            Ok(())
        })
        .method("foobaz", |this, _| {
            Ok(Value::from(format!(
                "{}{}",
                this.get("foo")?,
                this.get("baz")?
            )))
        })
        .compose()
        .expect("Failed to compose BazFoo")
}

/// Class taking `(first, last)` with a getter-only `fullName`.
pub fn person() -> Class {
    TypeDefinition::new()
        .named("Person")
        .constructor(|this, args| {
            this.set("firstName", arg(args, 0))?;
            this.set("lastName", arg(args, 1))
        })
        .descriptor(
            "fullName",
            Descriptor::getter(Function::method("fullName", |this, _| {
                Ok(Value::from(format!(
                    "{} {}",
                    this.get("firstName")?,
                    this.get("lastName")?
                )))
            })),
        )
        .compose()
        .expect("Failed to compose Person")
}

/// Imperative mixin installing `canDance` and `dance`.
pub fn can_dance() -> Function {
    Function::mixin("CanDance", |class| {
        class.define_member("canDance", Value::from(true))?;
        class.define_member(
            "dance",
            Function::method("dance", |this, _| {
                Ok(Value::from(format!(
                    "This {} can dance",
                    this.class().name()
                )))
            }),
        )
    })
}

/// Returns argument `index`, or `undefined` when absent.
pub fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Builds a string argument list.
pub fn strs(values: &[&str]) -> Vec<Value> {
    values.iter().map(|&s| Value::from(s)).collect()
}
