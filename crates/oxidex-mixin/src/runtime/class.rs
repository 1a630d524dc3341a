//! Composed classes.
//!
//! A [`Class`] is the output of composition: a name, an optional parent, an
//! initializer, an instance-member table (what every instance reads through
//! to) and a static-member table (members of the class itself).
//!
//! # Inheritance
//!
//! A subclass starts with a copy of its parent's instance-member table and
//! layers its own members on top, so lookups never walk the parent chain.
//! Copied members count as inherited: the subclass may override any of them,
//! including non-configurable ones.
//! The parent link is kept for subclass checks and for the default
//! initializer, which delegates to the parent's.
//!
//! # Thread Safety
//!
//! `Class` is a cheap, `Send + Sync` handle. Both member tables sit behind
//! `RwLock`s. Locks are released before any user function (getter, setter,
//! method, initializer) runs, so user code can freely call back into the
//! class.

use crate::error::{Error, Result};
use crate::runtime::member::{Assign, MemberTable};
use crate::runtime::{Member, Object, Value};
use oxidex_log::trace;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Instance initializer: receives the fresh instance and constructor
/// arguments.
pub type Initializer = Arc<dyn Fn(&Object, &[Value]) -> Result<()> + Send + Sync>;

pub(crate) struct ClassInner {
    name: Arc<str>,
    super_class: Option<Class>,
    /// `None` means the default initializer.
    initializer: Option<Initializer>,
    members: RwLock<MemberTable>,
    statics: RwLock<MemberTable>,
}

/// A composed class.
///
/// # Example
///
/// ```rust
/// use oxidex_mixin::{Class, Value};
///
/// let root = Class::new_root("Root");
/// let child = Class::new("Child", &root);
///
/// root.define_member("greeting", Value::from("hi")).unwrap();
///
/// assert!(child.is_subclass_of(&root));
/// assert!(!root.is_subclass_of(&child));
/// ```
#[derive(Clone)]
pub struct Class {
    inner: Arc<ClassInner>,
}

impl Class {
    pub(crate) fn create(
        name: Arc<str>,
        super_class: Option<Class>,
        initializer: Option<Initializer>,
    ) -> Self {
        let members = super_class
            .as_ref()
            .map(|parent| parent.members().inherited())
            .unwrap_or_default();

        Class {
            inner: Arc::new(ClassInner {
                name,
                super_class,
                initializer,
                members: RwLock::new(members),
                statics: RwLock::new(MemberTable::default()),
            }),
        }
    }

    /// Creates an empty class with no parent and the default initializer.
    #[must_use]
    pub fn new_root(name: &str) -> Self {
        Self::create(Arc::from(name), None, None)
    }

    /// Creates an empty subclass of `super_class`.
    ///
    /// The subclass starts with a copy of the parent's instance members
    /// and delegates construction to the parent.
    #[must_use]
    pub fn new(name: &str, super_class: &Class) -> Self {
        Self::create(Arc::from(name), Some(super_class.clone()), None)
    }

    fn members(&self) -> RwLockReadGuard<'_, MemberTable> {
        self.inner
            .members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn members_mut(&self) -> RwLockWriteGuard<'_, MemberTable> {
        self.inner
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn statics(&self) -> RwLockReadGuard<'_, MemberTable> {
        self.inner
            .statics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn statics_mut(&self) -> RwLockWriteGuard<'_, MemberTable> {
        self.inner
            .statics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the parent class, if any.
    #[must_use]
    pub fn super_class(&self) -> Option<&Class> {
        self.inner.super_class.as_ref()
    }

    /// Returns `true` if both handles refer to the same class.
    #[must_use]
    pub fn ptr_eq(&self, other: &Class) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Checks if this class is `class` or inherits from it.
    #[must_use]
    pub fn is_subclass_of(&self, class: &Class) -> bool {
        let mut current = Some(self);

        while let Some(candidate) = current {
            if candidate.ptr_eq(class) {
                return true;
            }
            current = candidate.super_class();
        }

        false
    }

    /// Installs an instance member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonConfigurableMember`] if a non-configurable
    /// descriptor already occupies `name`.
    pub fn define_member(&self, name: &str, member: impl Into<Member>) -> Result<()> {
        trace!("{}: defining member '{name}'", self.name());
        self.members_mut().install(name, member.into())
    }

    /// Installs a static member on the class itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonConfigurableMember`] if a non-configurable
    /// descriptor already occupies `name`.
    pub fn define_static(&self, name: &str, member: impl Into<Member>) -> Result<()> {
        trace!("{}: defining static '{name}'", self.name());
        self.statics_mut().install(name, member.into())
    }

    /// Returns a copy of the instance member slot for `name`.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<Member> {
        self.members().get(name).cloned()
    }

    /// Returns `true` if an instance member named `name` exists.
    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.members().contains(name)
    }

    /// Returns the names of enumerable instance members in definition order.
    #[must_use]
    pub fn member_names(&self) -> Vec<String> {
        self.members()
            .iter()
            .filter(|(_, member)| member.is_enumerable())
            .map(|(name, _)| name.to_owned())
            .collect()
    }

    /// Returns a read-only snapshot of the instance members.
    ///
    /// The snapshot is detached: members defined later do not show up in it.
    #[must_use]
    pub fn prototype(&self) -> Prototype {
        Prototype {
            members: self.members().clone(),
        }
    }

    /// Returns a copy of the static member slot for `name`.
    #[must_use]
    pub fn static_member(&self, name: &str) -> Option<Member> {
        self.statics().get(name).cloned()
    }

    /// Returns `true` if a static member named `name` exists.
    #[must_use]
    pub fn has_static(&self, name: &str) -> bool {
        self.statics().contains(name)
    }

    /// Reads a static member, running its getter with the class as receiver.
    ///
    /// Missing members read as `undefined`.
    ///
    /// # Errors
    ///
    /// Propagates getter failures.
    pub fn get_static(&self, name: &str) -> Result<Value> {
        match self.static_member(name) {
            Some(member) => member.read(&Value::Class(self.clone())),
            None => Ok(Value::Undefined),
        }
    }

    /// Assigns a static member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnlyMember`] for getter-only or non-writable
    /// members, and propagates setter failures.
    pub fn set_static(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let assign = self
            .static_member(name)
            .map(|member| member.assignment(name))
            .transpose()?;

        match assign {
            Some(Assign::Setter(setter)) => {
                setter.call(&Value::Class(self.clone()), &[value])?;
            }
            Some(Assign::Store) | None => self.statics_mut().store(name, value),
        }

        Ok(())
    }

    /// Calls a static function member with the class as receiver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotCallable`] if the member does not hold a function,
    /// and propagates the function's own errors.
    pub fn call_static(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.get_static(name)? {
            Value::Function(function) => {
                function.call(&Value::Class(self.clone()), args)
            }
            _ => Err(Error::NotCallable {
                name: name.to_owned(),
            }),
        }
    }

    /// Creates an instance and runs the initializer with `args`.
    ///
    /// # Errors
    ///
    /// Propagates initializer failures.
    pub fn instantiate(&self, args: &[Value]) -> Result<Object> {
        let object = Object::alloc(self);
        self.initialize(&object, args)?;
        Ok(object)
    }

    /// Runs this class's initializer on an existing instance.
    ///
    /// A class without an explicit initializer delegates to its parent with
    /// the same arguments and does nothing when it has no parent. Custom
    /// initializers call this on their parent to chain construction.
    ///
    /// # Errors
    ///
    /// Propagates initializer failures.
    pub fn initialize(&self, object: &Object, args: &[Value]) -> Result<()> {
        match (&self.inner.initializer, &self.inner.super_class) {
            (Some(initializer), _) => initializer(object, args),
            (None, Some(parent)) => parent.initialize(object, args),
            (None, None) => Ok(()),
        }
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name())
            .field("super_class", &self.super_class().map(Class::name))
            .field("members", &self.members().len())
            .field("statics", &self.statics().len())
            .finish()
    }
}

/// Read-only snapshot of a class's instance members.
#[derive(Clone, Debug)]
pub struct Prototype {
    members: MemberTable,
}

impl Prototype {
    /// Returns the member slot for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Reads a plain or data member without a receiver.
    ///
    /// Accessors are not evaluated and read as `None`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<Value> {
        match self.members.get(name)? {
            member if member.is_accessor() => None,
            member => member.read(&Value::Undefined).ok(),
        }
    }

    /// Returns all member names, enumerable or not, in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name)
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.len() == 0
    }
}
