//! Integration tests for type composition.
//!
//! Covers the end-to-end behavior of `compose_type`: instantiation,
//! mixed-in members, inheritance, statics, descriptors, imperative mixins
//! and invalid mixin kinds.

mod common;

use oxidex_mixin::{
    Error, Function, MixinSpec, TypeDefinition, Value, compose_type,
};

// ============================================================================
// Basic Composition
// ============================================================================

#[test]
fn test_simplest_possible_class() {
    let base = compose_type(TypeDefinition::new()).unwrap();
    let b = base.instantiate(&[]).unwrap();

    assert!(b.is_instance_of(&base));
    assert!(b.class().ptr_eq(&base));
}

#[test]
fn test_factory_matches_instantiate() {
    let base = compose_type(TypeDefinition::new().named("Base")).unwrap();
    let made = base.call_static("new", &[]).unwrap();

    let made = made.as_object().unwrap();
    assert!(made.is_instance_of(&base));
    assert_eq!(made.class().name(), "Base");
}

// ============================================================================
// Mixins & Inheritance
// ============================================================================

#[test]
fn test_mixed_in_properties() {
    let thing = common::fooable_thing();
    let f = thing.instantiate(&[]).unwrap();

    assert_eq!(f.get("foo").unwrap(), Value::from("foo"));
    f.set("foo", "bar").unwrap();
    assert_eq!(f.call("getFoo", &[]).unwrap(), Value::from("bar"));

    // The shared default is untouched by the per-instance override
    assert_eq!(thing.prototype().value("foo"), Some(Value::from("foo")));
    let other = thing.instantiate(&[]).unwrap();
    assert_eq!(other.get("foo").unwrap(), Value::from("foo"));
}

#[test]
fn test_inheritance() {
    let thing = common::fooable_thing();
    let baz_foo = common::baz_foo(&thing);

    let bf = baz_foo.instantiate(&common::strs(&["lol"])).unwrap();
    assert!(bf.is_instance_of(&thing));
    assert!(bf.is_instance_of(&baz_foo));
    assert_eq!(bf.call("foobaz", &[]).unwrap(), Value::from("foolol"));

    // Alternate constructor
    let bf = baz_foo.instantiate(&common::strs(&["toast", "cheese"])).unwrap();
    assert_eq!(bf.call("foobaz", &[]).unwrap(), Value::from("cheesetoast"));
    assert_eq!(bf.call("getFoo", &[]).unwrap(), Value::from("cheese"));
}

#[test]
fn test_parent_is_not_instance_of_child() {
    let thing = common::fooable_thing();
    let baz_foo = common::baz_foo(&thing);
    let f = thing.instantiate(&[]).unwrap();

    assert!(!f.is_instance_of(&baz_foo));
    assert!(baz_foo.super_class().unwrap().ptr_eq(&thing));
}

#[test]
fn test_child_override_does_not_leak_to_parent() {
    let parent = TypeDefinition::new()
        .member("greeting", "hello")
        .compose()
        .unwrap();
    let child = TypeDefinition::new()
        .inherit(&parent)
        .member("greeting", "howdy")
        .compose()
        .unwrap();

    let p = parent.instantiate(&[]).unwrap();
    let c = child.instantiate(&[]).unwrap();
    assert_eq!(p.get("greeting").unwrap(), Value::from("hello"));
    assert_eq!(c.get("greeting").unwrap(), Value::from("howdy"));
}

#[test]
fn test_default_constructor_chains_through_ancestors() {
    let root = TypeDefinition::new()
        .named("Root")
        .constructor(|this, args| this.set("seen", common::arg(args, 0)))
        .compose()
        .unwrap();
    let middle = TypeDefinition::new().inherit(&root).compose().unwrap();
    let leaf = TypeDefinition::new().inherit(&middle).compose().unwrap();

    let obj = leaf.call_static("new", &[Value::from(7)]).unwrap();
    let obj = obj.as_object().unwrap();
    assert_eq!(obj.get("seen").unwrap(), Value::from(7));
    assert!(obj.is_instance_of(&root));
}

#[test]
fn test_constructor_can_call_parent_initializer() {
    let base = TypeDefinition::new()
        .constructor(|this, args| this.set("a", common::arg(args, 0)))
        .compose()
        .unwrap();
    let parent = base.clone();
    let derived = TypeDefinition::new()
        .inherit(&base)
        .constructor(move |this, args| {
            parent.initialize(this, args)?;
            this.set("b", common::arg(args, 1))
        })
        .compose()
        .unwrap();

    let d = derived.instantiate(&[Value::from(1), Value::from(2)]).unwrap();
    assert_eq!(d.get("a").unwrap(), Value::from(1));
    assert_eq!(d.get("b").unwrap(), Value::from(2));
}

// ============================================================================
// Static Members
// ============================================================================

#[test]
fn test_static_properties() {
    let why = TypeDefinition::new()
        .named("Why")
        .static_method("doThis", |class, args| {
            Ok(Value::from(class.instantiate(args)?))
        })
        .constructor(|this, args| this.set("blah", common::arg(args, 0)))
        .compose()
        .unwrap();

    let w = why.call_static("doThis", &common::strs(&["I don't know"])).unwrap();
    let w = w.as_object().unwrap();
    assert_eq!(w.get("blah").unwrap(), Value::from("I don't know"));
    assert!(w.is_instance_of(&why));
}

#[test]
fn test_statics_are_not_inherited() {
    let parent = TypeDefinition::new()
        .static_member("version", 1)
        .compose()
        .unwrap();
    let child = TypeDefinition::new().inherit(&parent).compose().unwrap();

    assert_eq!(parent.get_static("version").unwrap(), Value::from(1));
    assert_eq!(child.get_static("version").unwrap(), Value::Undefined);
}

#[test]
fn test_user_static_new_overrides_factory() {
    let class = TypeDefinition::new()
        .static_method("new", |_, _| Ok(Value::from("intercepted")))
        .compose()
        .unwrap();

    assert_eq!(
        class.call_static("new", &[]).unwrap(),
        Value::from("intercepted")
    );
    // Direct instantiation still works
    assert!(class.instantiate(&[]).is_ok());
}

#[test]
fn test_factory_has_no_arity_limit() {
    let class = TypeDefinition::new()
        .constructor(|this, args| {
            let sum: f64 = args
                .iter()
                .map(Value::as_number)
                .sum::<oxidex_mixin::Result<f64>>()?;
            this.set("sum", sum)
        })
        .compose()
        .unwrap();

    let args: Vec<Value> = (1..=10).map(Value::from).collect();
    let obj = class.call_static("new", &args).unwrap();
    assert_eq!(obj.as_object().unwrap().get("sum").unwrap(), Value::from(55));
}

// ============================================================================
// Descriptors
// ============================================================================

#[test]
fn test_descriptors() {
    let person = common::person();
    let p = person.instantiate(&common::strs(&["Stephen", "Sugden"])).unwrap();

    assert_eq!(p.get("fullName").unwrap(), Value::from("Stephen Sugden"));
}

#[test]
fn test_getter_is_live() {
    let person = common::person();
    let p = person.instantiate(&common::strs(&["Ada", "Byron"])).unwrap();

    p.set("lastName", "Lovelace").unwrap();
    assert_eq!(p.get("fullName").unwrap(), Value::from("Ada Lovelace"));
    assert!(!p.has_own("fullName"));
    assert!(person.member("fullName").unwrap().is_accessor());
}

#[test]
fn test_getter_only_rejects_assignment() {
    let person = common::person();
    let p = person.instantiate(&common::strs(&["A", "B"])).unwrap();

    assert_eq!(
        p.set("fullName", "C D").unwrap_err(),
        Error::ReadOnlyMember {
            name: "fullName".into()
        }
    );
}

// ============================================================================
// Function Mixins
// ============================================================================

#[test]
fn test_function_mixins() {
    let cat = TypeDefinition::new()
        .named("Cat")
        .include(common::can_dance())
        .constructor(|_, _| Ok(()))
        .compose()
        .unwrap();

    let c = cat.instantiate(&[]).unwrap();
    assert!(c.get("canDance").unwrap().is_truthy());
    assert_eq!(c.call("dance", &[]).unwrap(), Value::from("This Cat can dance"));
}

#[test]
fn test_function_mixin_installs_exactly_its_members() {
    let cat = TypeDefinition::new()
        .include(common::can_dance())
        .compose()
        .unwrap();

    assert_eq!(cat.member_names(), ["canDance", "dance"]);
}

#[test]
fn test_function_mixin_errors_abort_composition() {
    let failing = Function::mixin("Failing", |_| {
        Err(Error::NotCallable {
            name: "boom".into(),
        })
    });

    let result = TypeDefinition::new().include(failing).compose();
    assert_eq!(
        result.unwrap_err(),
        Error::NotCallable {
            name: "boom".into()
        }
    );
}

// ============================================================================
// Invalid Mixin Kinds
// ============================================================================

#[test]
fn test_number_mixin_is_rejected() {
    let err = TypeDefinition::new().include(3).compose().unwrap_err();
    assert_eq!(err, Error::InvalidMixinKind { kind: "number" });
    assert_eq!(err.to_string(), "numbers are not mixins");
}

#[test]
fn test_string_mixin_is_rejected() {
    let err = TypeDefinition::new()
        .include("mixin")
        .compose()
        .unwrap_err();
    assert_eq!(err, Error::InvalidMixinKind { kind: "string" });
}

#[test]
fn test_deeply_nested_invalid_mixin_is_rejected() {
    let leaf = MixinSpec::new().include(Value::Null);
    let middle = MixinSpec::new().include(common::fooable_mixin()).include(leaf);

    let err = TypeDefinition::new().include(middle).compose().unwrap_err();
    assert_eq!(err, Error::InvalidMixinKind { kind: "null" });
}
