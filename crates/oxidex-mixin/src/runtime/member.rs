//! Member slots and descriptors.
//!
//! Every member installed on a class (instance or static) is a [`Member`]:
//! either a plain value, installed by simple assignment, or a [`Descriptor`],
//! installed with explicit accessor/data semantics and flags.
//!
//! # Descriptor defaults
//!
//! Descriptors start out non-enumerable and non-writable, as property
//! descriptors usually do, but configurable, which departs from the usual
//! host default on purpose: members are redefined freely during composition
//! and locking one is an explicit opt-in with
//! [`Descriptor::configurable`]. A non-configurable descriptor can never be
//! replaced on the class that owns it; later installs under that name fail
//! with [`Error::NonConfigurableMember`]. A subclass may still override it.

use crate::error::{Error, Result};
use crate::runtime::{Function, Value};
use fxhash::FxHashMap;
use std::sync::Arc;

/// What a descriptor describes.
#[derive(Clone, Debug)]
pub enum DescriptorKind {
    /// Stored value.
    Data {
        /// The stored value.
        value: Value,
        /// Whether assignment may replace it.
        writable: bool,
    },
    /// Computed member backed by functions.
    Accessor {
        /// Called with the receiver on every read.
        get: Option<Function>,
        /// Called with the receiver and the assigned value on every write.
        set: Option<Function>,
    },
}

/// A member installed through the descriptor path rather than assignment.
///
/// # Example
///
/// ```rust
/// use oxidex_mixin::{Descriptor, Function, TypeDefinition, Value};
///
/// let person = TypeDefinition::new()
///     .constructor(|this, args| {
///         this.set("first", args.first().cloned().unwrap_or_default())?;
///         this.set("last", args.get(1).cloned().unwrap_or_default())
///     })
///     .descriptor(
///         "fullName",
///         Descriptor::getter(Function::method("fullName", |this, _| {
///             Ok(Value::from(format!("{} {}", this.get("first")?, this.get("last")?)))
///         })),
///     )
///     .compose()
///     .unwrap();
///
/// let p = person.instantiate(&["Ada".into(), "Lovelace".into()]).unwrap();
/// assert_eq!(p.get("fullName").unwrap(), Value::from("Ada Lovelace"));
/// ```
#[derive(Clone, Debug)]
pub struct Descriptor {
    kind: DescriptorKind,
    enumerable: bool,
    configurable: bool,
}

impl Descriptor {
    fn with_kind(kind: DescriptorKind) -> Self {
        Descriptor {
            kind,
            enumerable: false,
            configurable: true,
        }
    }

    /// Read-only data member.
    pub fn data(value: impl Into<Value>) -> Self {
        Self::with_kind(DescriptorKind::Data {
            value: value.into(),
            writable: false,
        })
    }

    /// Accessor with only a getter; assignment fails.
    #[must_use]
    pub fn getter(get: Function) -> Self {
        Self::with_kind(DescriptorKind::Accessor {
            get: Some(get),
            set: None,
        })
    }

    /// Accessor with both a getter and a setter.
    #[must_use]
    pub fn accessor(get: Function, set: Function) -> Self {
        Self::with_kind(DescriptorKind::Accessor {
            get: Some(get),
            set: Some(set),
        })
    }

    /// Accessor with only a setter; reads yield `undefined`.
    #[must_use]
    pub fn setter(set: Function) -> Self {
        Self::with_kind(DescriptorKind::Accessor {
            get: None,
            set: Some(set),
        })
    }

    /// Sets writability. No effect on accessors.
    #[must_use]
    pub fn writable(mut self, writable: bool) -> Self {
        if let DescriptorKind::Data { writable: w, .. } = &mut self.kind {
            *w = writable;
        }
        self
    }

    /// Sets enumerability.
    #[must_use]
    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// Sets configurability.
    #[must_use]
    pub fn configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }

    /// Returns what this descriptor describes.
    #[must_use]
    pub fn kind(&self) -> &DescriptorKind {
        &self.kind
    }

    /// Returns `true` if the member shows up in enumeration.
    #[must_use]
    pub fn is_enumerable(&self) -> bool {
        self.enumerable
    }

    /// Returns `true` if the member may be replaced.
    #[must_use]
    pub fn is_configurable(&self) -> bool {
        self.configurable
    }
}

/// A member slot: plain value or descriptor.
#[derive(Clone, Debug)]
pub enum Member {
    /// Plain, enumerable, writable, configurable value.
    Value(Value),
    /// Descriptor-installed member.
    Descriptor(Descriptor),
}

/// How an assignment to an existing member proceeds.
pub(crate) enum Assign {
    /// Store the value (own slot or in place).
    Store,
    /// Hand the value to this setter.
    Setter(Function),
}

impl Member {
    /// Returns `true` if the member shows up in enumeration.
    #[must_use]
    pub fn is_enumerable(&self) -> bool {
        match self {
            Member::Value(_) => true,
            Member::Descriptor(d) => d.enumerable,
        }
    }

    /// Returns `true` if the member may be replaced.
    #[must_use]
    pub fn is_configurable(&self) -> bool {
        match self {
            Member::Value(_) => true,
            Member::Descriptor(d) => d.configurable,
        }
    }

    /// Returns `true` for accessor descriptors.
    #[must_use]
    pub fn is_accessor(&self) -> bool {
        matches!(
            self,
            Member::Descriptor(Descriptor {
                kind: DescriptorKind::Accessor { .. },
                ..
            })
        )
    }

    /// Resolves the member's current value for `this`.
    pub(crate) fn read(&self, this: &Value) -> Result<Value> {
        match self {
            Member::Value(value) => Ok(value.clone()),
            Member::Descriptor(d) => match &d.kind {
                DescriptorKind::Data { value, .. } => Ok(value.clone()),
                DescriptorKind::Accessor { get: Some(get), .. } => {
                    get.call(this, &[])
                }
                DescriptorKind::Accessor { get: None, .. } => {
                    Ok(Value::Undefined)
                }
            },
        }
    }

    /// Decides how assigning `name` proceeds when this member is in the way.
    pub(crate) fn assignment(&self, name: &str) -> Result<Assign> {
        let read_only = || Error::ReadOnlyMember {
            name: name.to_owned(),
        };

        match self {
            Member::Value(_) => Ok(Assign::Store),
            Member::Descriptor(d) => match &d.kind {
                DescriptorKind::Data { writable: true, .. } => Ok(Assign::Store),
                DescriptorKind::Data { writable: false, .. } => Err(read_only()),
                DescriptorKind::Accessor { set: Some(set), .. } => {
                    Ok(Assign::Setter(set.clone()))
                }
                DescriptorKind::Accessor { set: None, .. } => Err(read_only()),
            },
        }
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Member::Value(value)
    }
}

impl From<Descriptor> for Member {
    fn from(descriptor: Descriptor) -> Self {
        Member::Descriptor(descriptor)
    }
}

impl From<Function> for Member {
    fn from(function: Function) -> Self {
        Member::Value(Value::Function(function))
    }
}

/// Insertion-ordered member table.
///
/// Replacing a member keeps its original position, so enumeration follows
/// the order in which names were first defined. Entries copied from a parent
/// class are inherited: the first install under such a name overrides it
/// regardless of its flags, and from then on the entry is owned.
#[derive(Clone, Debug, Default)]
pub(crate) struct MemberTable {
    index: FxHashMap<Arc<str>, usize>,
    entries: Vec<Entry>,
}

#[derive(Clone, Debug)]
struct Entry {
    name: Arc<str>,
    member: Member,
    own: bool,
}

impl MemberTable {
    pub(crate) fn get(&self, name: &str) -> Option<&Member> {
        self.index.get(name).map(|&slot| &self.entries[slot].member)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.entries
            .iter()
            .map(|entry| (&*entry.name, &entry.member))
    }

    /// Returns a copy for a subclass, with every entry marked inherited.
    pub(crate) fn inherited(&self) -> MemberTable {
        let mut table = self.clone();
        for entry in &mut table.entries {
            entry.own = false;
        }
        table
    }

    /// Installs `member`, replacing any inherited member or configurable
    /// own member of that name.
    pub(crate) fn install(&mut self, name: &str, member: Member) -> Result<()> {
        match self.index.get(name) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                if entry.own && !entry.member.is_configurable() {
                    return Err(Error::NonConfigurableMember {
                        name: name.to_owned(),
                    });
                }
                entry.member = member;
                entry.own = true;
            }
            None => self.push(name, member),
        }
        Ok(())
    }

    /// Stores a value by assignment: writable data descriptors keep their
    /// flags, anything else becomes a plain value.
    pub(crate) fn store(&mut self, name: &str, value: Value) {
        match self.index.get(name) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                match &mut entry.member {
                    Member::Descriptor(Descriptor {
                        kind: DescriptorKind::Data { value: stored, .. },
                        ..
                    }) => *stored = value,
                    other => *other = Member::Value(value),
                }
                entry.own = true;
            }
            None => self.push(name, Member::Value(value)),
        }
    }

    fn push(&mut self, name: &str, member: Member) {
        let name: Arc<str> = Arc::from(name);
        self.index.insert(Arc::clone(&name), self.entries.len());
        self.entries.push(Entry {
            name,
            member,
            own: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(name: &str, v: i32) -> Function {
        Function::new(name, move |_, _| Ok(Value::from(v)))
    }

    #[test]
    fn test_install_preserves_order() {
        let mut table = MemberTable::default();
        table.install("b", Value::from(1).into()).unwrap();
        table.install("a", Value::from(2).into()).unwrap();
        table.install("b", Value::from(3).into()).unwrap();

        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("b").unwrap().read(&Value::Undefined).unwrap(),
            Value::from(3)
        );
    }

    #[test]
    fn test_non_configurable_rejects_replacement() {
        let mut table = MemberTable::default();
        let locked = Descriptor::getter(constant("g", 1)).configurable(false);
        table.install("x", locked.into()).unwrap();

        let err = table.install("x", Value::from(2).into()).unwrap_err();
        assert_eq!(err, Error::NonConfigurableMember { name: "x".into() });
    }

    #[test]
    fn test_inherited_entries_can_be_overridden_once() {
        let mut parent = MemberTable::default();
        let locked = Descriptor::data(1).configurable(false);
        parent.install("x", locked.clone().into()).unwrap();

        let mut child = parent.inherited();
        child.install("x", locked.into()).unwrap();
        assert!(child.install("x", Value::from(3).into()).is_err());
        assert!(parent.install("x", Value::from(3).into()).is_err());
        assert_eq!(child.len(), 1);
    }

    #[test]
    fn test_store_keeps_data_descriptor_flags() {
        let mut table = MemberTable::default();
        table
            .install("x", Descriptor::data(1).writable(true).into())
            .unwrap();
        table.store("x", Value::from(5));

        let member = table.get("x").unwrap();
        assert!(!member.is_enumerable());
        assert_eq!(member.read(&Value::Undefined).unwrap(), Value::from(5));
    }

    #[test]
    fn test_accessor_read_calls_getter() {
        let member = Member::from(Descriptor::getter(constant("g", 7)));
        assert!(member.is_accessor());
        assert_eq!(member.read(&Value::Null).unwrap(), Value::from(7));
    }

    #[test]
    fn test_assignment_rules() {
        let getter_only = Member::from(Descriptor::getter(constant("g", 1)));
        assert!(matches!(
            getter_only.assignment("g"),
            Err(Error::ReadOnlyMember { .. })
        ));

        let read_only = Member::from(Descriptor::data(1));
        assert!(read_only.assignment("d").is_err());

        let with_setter = Member::from(Descriptor::setter(constant("s", 0)));
        assert!(matches!(with_setter.assignment("s"), Ok(Assign::Setter(_))));
        assert_eq!(
            with_setter.read(&Value::Undefined).unwrap(),
            Value::Undefined
        );

        assert!(matches!(
            Member::from(Value::from(1)).assignment("v"),
            Ok(Assign::Store)
        ));
    }
}
