//! Compile-time classification of the special operations of alternatives.
//!
//! Every alternative stored in a tagged union has five special operations:
//! copy construction, move construction, copy assignment, move assignment and
//! destruction. For each of them a type is either unable to perform it
//! ([`Policy::Deleted`]), able to perform it as a plain bitwise copy or no-op
//! ([`Policy::Trivial`]), or able to perform it by running code
//! ([`Policy::NonTrivial`]).
//!
//! The union itself derives its own policies from those of its alternatives:
//! an operation is deleted if any alternative deletes it, trivial only if all
//! alternatives make it trivial, and non-trivial otherwise. This reduction is
//! [`Capabilities::meet`], evaluated at compile time over the whole
//! alternative list.
//!
//! # Declaring capabilities
//!
//! Types opt in by implementing [`Alternative`]. The built-in scalars,
//! `String`, `Vec<T>`, `Option<T>` and `Box<T>` are already classified; the
//! [`trivial_alternative!`] and [`clone_alternative!`] macros cover the common
//! cases for user types:
//!
//! ```
//! use oneof_internals::{capabilities::Policy, clone_alternative, trivial_alternative};
//!
//! #[derive(Clone, Copy)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//! trivial_alternative!(Point);
//!
//! #[derive(Clone)]
//! struct Name(String);
//! clone_alternative!(Name);
//!
//! use oneof_internals::capabilities::Alternative;
//! assert_eq!(<Point as Alternative>::COPY_CONSTRUCT, Policy::Trivial);
//! assert_eq!(<Name as Alternative>::COPY_CONSTRUCT, Policy::NonTrivial);
//! assert_eq!(<Name as Alternative>::MOVE_CONSTRUCT, Policy::Deleted);
//! ```
//!
//! [`trivial_alternative!`]: crate::trivial_alternative
//! [`clone_alternative!`]: crate::clone_alternative

/// How a type performs one special operation.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Policy {
    /// The operation is unavailable. Using it is rejected at compile time.
    Deleted,
    /// The operation is a bitwise copy (or a no-op for destruction).
    Trivial,
    /// The operation runs code and may fail unless declared otherwise.
    NonTrivial,
}

impl Policy {
    /// Returns the most restrictive of the two policies.
    ///
    /// `Deleted` wins over everything, and the result is `Trivial` only if
    /// both inputs are.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof_internals::capabilities::Policy;
    ///
    /// assert_eq!(Policy::Trivial.meet(Policy::NonTrivial), Policy::NonTrivial);
    /// assert_eq!(Policy::NonTrivial.meet(Policy::Deleted), Policy::Deleted);
    /// assert_eq!(Policy::Trivial.meet(Policy::Trivial), Policy::Trivial);
    /// ```
    #[must_use]
    pub const fn meet(self, other: Self) -> Self {
        match (self, other) {
            (Self::Deleted, _) | (_, Self::Deleted) => Self::Deleted,
            (Self::Trivial, Self::Trivial) => Self::Trivial,
            _ => Self::NonTrivial,
        }
    }

    /// Returns `true` unless the operation is deleted.
    #[inline]
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::Deleted)
    }

    /// Returns `true` if the operation is a bitwise copy or a no-op.
    #[inline]
    pub const fn is_trivial(self) -> bool {
        matches!(self, Self::Trivial)
    }

    /// Returns `self` if available, and `fallback` otherwise.
    const fn or_fallback(self, fallback: Self) -> Self {
        if self.is_available() { self } else { fallback }
    }
}

/// The policies of the five special operations of a type or of a whole
/// alternative list.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Capabilities {
    /// Producing a new value from a shared reference to an existing one.
    pub copy_construct: Policy,
    /// Producing a new value by moving out of an existing one, leaving the
    /// source in a moved-from state.
    pub move_construct: Policy,
    /// Overwriting a live value with a copy of another.
    pub copy_assign: Policy,
    /// Overwriting a live value by moving out of another.
    pub move_assign: Policy,
    /// Destroying a live value.
    pub destroy: Policy,
}

impl Capabilities {
    /// Every operation trivial. This is the identity element of
    /// [`meet`](Self::meet).
    pub const TRIVIAL: Self = Self {
        copy_construct: Policy::Trivial,
        move_construct: Policy::Trivial,
        copy_assign: Policy::Trivial,
        move_assign: Policy::Trivial,
        destroy: Policy::Trivial,
    };

    /// The effective capabilities of the alternative `T`.
    ///
    /// The policies declared by `T` are [normalized](Self::normalized), and
    /// the destroy policy is derived from [`core::mem::needs_drop`].
    pub const fn of<T: Alternative>() -> Self {
        Self {
            copy_construct: T::COPY_CONSTRUCT,
            move_construct: T::MOVE_CONSTRUCT,
            copy_assign: T::COPY_ASSIGN,
            move_assign: T::MOVE_ASSIGN,
            destroy: if core::mem::needs_drop::<T>() {
                Policy::NonTrivial
            } else {
                Policy::Trivial
            },
        }
        .normalized()
    }

    /// Combines two capability records, operation by operation, keeping the
    /// most restrictive policy.
    #[must_use]
    pub const fn meet(self, other: Self) -> Self {
        Self {
            copy_construct: self.copy_construct.meet(other.copy_construct),
            move_construct: self.move_construct.meet(other.move_construct),
            copy_assign: self.copy_assign.meet(other.copy_assign),
            move_assign: self.move_assign.meet(other.move_assign),
            destroy: self.destroy.meet(other.destroy),
        }
    }

    /// Applies the dependencies between operations.
    ///
    /// - A deleted move operation falls back to the corresponding copy
    ///   operation.
    /// - An assignment is only as permissive as the matching construction and
    ///   destruction: assigning a different alternative means destroying the
    ///   old value and constructing the new one.
    #[must_use]
    pub const fn normalized(self) -> Self {
        let move_construct = self.move_construct.or_fallback(self.copy_construct);
        let move_assign = self.move_assign.or_fallback(self.copy_assign);
        Self {
            copy_construct: self.copy_construct,
            move_construct,
            copy_assign: self
                .copy_assign
                .meet(self.copy_construct)
                .meet(self.destroy),
            move_assign: move_assign.meet(move_construct).meet(self.destroy),
            destroy: self.destroy,
        }
    }
}

/// The special operation that was being performed when a
/// [`ConstructionError`] occurred or a container became valueless.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Operation {
    /// Copy construction of an alternative.
    CopyConstruct,
    /// Move construction of an alternative.
    MoveConstruct,
    /// Copy assignment of an alternative.
    CopyAssign,
    /// Move assignment of an alternative.
    MoveAssign,
    /// In-place construction of a new alternative from user-supplied code.
    Emplace,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::CopyConstruct => "copy construction",
            Self::MoveConstruct => "move construction",
            Self::CopyAssign => "copy assignment",
            Self::MoveAssign => "move assignment",
            Self::Emplace => "in-place construction",
        })
    }
}

/// Error returned when an alternative fails to construct or assign itself.
///
/// This is the Rust counterpart of a constructor throwing: the failing
/// operation returns it, and the container propagates it to the caller after
/// settling into a documented state (unchanged, or valueless).
///
/// # Examples
///
/// ```
/// use oneof_internals::capabilities::{ConstructionError, Operation};
///
/// let error = ConstructionError::new::<Vec<u8>>(Operation::CopyConstruct)
///     .with_reason("buffer pool exhausted");
/// assert_eq!(error.operation(), Operation::CopyConstruct);
/// assert_eq!(error.reason(), Some("buffer pool exhausted"));
/// assert_eq!(
///     error.to_string(),
///     "copy construction of `alloc::vec::Vec<u8>` failed: buffer pool exhausted"
/// );
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ConstructionError {
    /// The operation that failed.
    operation: Operation,
    /// [`core::any::type_name`] of the alternative that failed.
    type_name: &'static str,
    /// Optional human-readable reason.
    reason: Option<&'static str>,
}

impl ConstructionError {
    /// Creates an error for `operation` failing on a value of type `T`.
    pub fn new<T: ?Sized>(operation: Operation) -> Self {
        Self {
            operation,
            type_name: core::any::type_name::<T>(),
            reason: None,
        }
    }

    /// Creates an error for an operation that `T` declares as deleted.
    ///
    /// Containers reject deleted operations at compile time, so this is only
    /// returned when an [`Alternative`] method is called directly.
    pub fn deleted<T: ?Sized>(operation: Operation) -> Self {
        Self::new::<T>(operation).with_reason("operation is deleted")
    }

    /// Attaches a human-readable reason to the error.
    #[must_use]
    pub const fn with_reason(mut self, reason: &'static str) -> Self {
        self.reason = Some(reason);
        self
    }

    /// The operation that failed.
    #[inline]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// The [`core::any::type_name`] of the alternative that failed.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The reason attached with [`with_reason`](Self::with_reason), if any.
    #[inline]
    pub const fn reason(&self) -> Option<&'static str> {
        self.reason
    }
}

impl core::fmt::Debug for ConstructionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConstructionError")
            .field("operation", &self.operation)
            .field("type_name", &self.type_name)
            .field("reason", &self.reason)
            .finish()
    }
}

impl core::fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} of `{}` failed", self.operation, self.type_name)?;
        if let Some(reason) = self.reason {
            write!(f, ": {reason}")?;
        }
        Ok(())
    }
}

impl core::error::Error for ConstructionError {}

/// Declares how a type performs its special operations when stored as an
/// alternative of a tagged union.
///
/// The associated constants classify each operation; the methods implement
/// the non-trivial ones. Every operation defaults to [`Policy::Deleted`] with
/// a method that reports [`ConstructionError::deleted`], so an
/// implementation only spells out what the type supports.
///
/// Destruction is not declared here: it is always available, and trivial
/// exactly when [`core::mem::needs_drop`] returns `false`.
///
/// # Fallbacks
///
/// A type whose move construction (or move assignment) is deleted is moved by
/// copying instead, mirroring how a missing move constructor falls back to
/// the copy constructor.
///
/// # Safety
///
/// For every operation declared [`Policy::Trivial`], a bitwise copy of a
/// value must be a valid result of that operation, and must leave the source
/// valid and independently droppable. Containers rely on this to replace the
/// methods with `memcpy`. In practice, only `Copy` types may declare trivial
/// operations.
///
/// # Examples
///
/// A type whose copy construction may fail:
///
/// ```
/// use oneof_internals::capabilities::{Alternative, ConstructionError, Operation, Policy};
///
/// struct Connection {
///     id: u32,
/// }
///
/// // SAFETY: No operation is declared trivial.
/// unsafe impl Alternative for Connection {
///     const COPY_CONSTRUCT: Policy = Policy::NonTrivial;
///     const COPY_ASSIGN: Policy = Policy::NonTrivial;
///
///     fn copy_construct(&self) -> Result<Self, ConstructionError> {
///         if self.id == 0 {
///             return Err(ConstructionError::new::<Self>(Operation::CopyConstruct)
///                 .with_reason("connection 0 cannot be duplicated"));
///         }
///         Ok(Connection { id: self.id })
///     }
///
///     fn copy_assign(&mut self, source: &Self) -> Result<(), ConstructionError> {
///         self.id = source.id;
///         Ok(())
///     }
/// }
///
/// assert!(Connection { id: 0 }.copy_construct().is_err());
/// assert_eq!(Connection { id: 7 }.copy_construct().unwrap().id, 7);
/// ```
pub unsafe trait Alternative: Sized {
    /// Policy of [`copy_construct`](Self::copy_construct).
    const COPY_CONSTRUCT: Policy = Policy::Deleted;
    /// Policy of [`move_construct`](Self::move_construct).
    const MOVE_CONSTRUCT: Policy = Policy::Deleted;
    /// Policy of [`copy_assign`](Self::copy_assign).
    const COPY_ASSIGN: Policy = Policy::Deleted;
    /// Policy of [`move_assign`](Self::move_assign).
    const MOVE_ASSIGN: Policy = Policy::Deleted;
    /// Whether [`copy_construct`](Self::copy_construct) is declared never to
    /// fail. Trivial copies never fail regardless of this flag.
    const COPY_CONSTRUCT_NOFAIL: bool = false;
    /// Whether [`move_construct`](Self::move_construct) is declared never to
    /// fail. Trivial moves never fail regardless of this flag.
    const MOVE_CONSTRUCT_NOFAIL: bool = false;

    /// Creates a copy of `self`.
    fn copy_construct(&self) -> Result<Self, ConstructionError> {
        Err(ConstructionError::deleted::<Self>(Operation::CopyConstruct))
    }

    /// Moves the contents of `self` into a new value, leaving `self` in a
    /// valid moved-from state.
    fn move_construct(&mut self) -> Result<Self, ConstructionError> {
        Err(ConstructionError::deleted::<Self>(Operation::MoveConstruct))
    }

    /// Overwrites `self` with a copy of `source`.
    ///
    /// On failure `self` must still be a valid value; which value is up to
    /// the implementation.
    fn copy_assign(&mut self, source: &Self) -> Result<(), ConstructionError> {
        let _ = source;
        Err(ConstructionError::deleted::<Self>(Operation::CopyAssign))
    }

    /// Overwrites `self` by moving out of `source`, leaving `source` in a
    /// valid moved-from state.
    fn move_assign(&mut self, source: &mut Self) -> Result<(), ConstructionError> {
        let _ = source;
        Err(ConstructionError::deleted::<Self>(Operation::MoveAssign))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::*;

    const ALL: [Policy; 3] = [Policy::Deleted, Policy::Trivial, Policy::NonTrivial];

    #[test]
    fn test_policy_meet_is_most_restrictive() {
        for a in ALL {
            for b in ALL {
                let expected = if a == Policy::Deleted || b == Policy::Deleted {
                    Policy::Deleted
                } else if a == Policy::Trivial && b == Policy::Trivial {
                    Policy::Trivial
                } else {
                    Policy::NonTrivial
                };
                assert_eq!(a.meet(b), expected, "{a:?} meet {b:?}");
                assert_eq!(a.meet(b), b.meet(a));
            }
            assert_eq!(a.meet(Policy::Trivial), a);
            assert_eq!(a.meet(Policy::Deleted), Policy::Deleted);
        }
    }

    #[test]
    fn test_normalized_move_falls_back_to_copy() {
        let capabilities = Capabilities {
            copy_construct: Policy::NonTrivial,
            move_construct: Policy::Deleted,
            copy_assign: Policy::NonTrivial,
            move_assign: Policy::Deleted,
            destroy: Policy::Trivial,
        }
        .normalized();
        assert_eq!(capabilities.move_construct, Policy::NonTrivial);
        assert_eq!(capabilities.move_assign, Policy::NonTrivial);
    }

    #[test]
    fn test_normalized_assignment_requires_construction() {
        let capabilities = Capabilities {
            copy_construct: Policy::Deleted,
            move_construct: Policy::Trivial,
            copy_assign: Policy::Trivial,
            move_assign: Policy::Trivial,
            destroy: Policy::NonTrivial,
        }
        .normalized();
        assert_eq!(capabilities.copy_assign, Policy::Deleted);
        // Trivial move assignment stops being trivial once destruction is not.
        assert_eq!(capabilities.move_assign, Policy::NonTrivial);
    }

    #[test]
    fn test_capabilities_of_builtin_types() {
        assert_eq!(Capabilities::of::<u32>(), Capabilities::TRIVIAL);

        let string = Capabilities::of::<String>();
        assert_eq!(string.copy_construct, Policy::NonTrivial);
        assert_eq!(string.move_construct, Policy::NonTrivial);
        assert_eq!(string.destroy, Policy::NonTrivial);
    }

    #[test]
    fn test_meet_with_trivial_is_identity() {
        let string = Capabilities::of::<String>();
        assert_eq!(Capabilities::TRIVIAL.meet(string), string);
    }

    #[test]
    fn test_construction_error_display() {
        let error = ConstructionError::new::<u8>(Operation::MoveAssign);
        assert_eq!(error.to_string(), "move assignment of `u8` failed");
        assert_eq!(error.reason(), None);

        let error = ConstructionError::deleted::<u8>(Operation::CopyConstruct);
        assert_eq!(
            error.to_string(),
            "copy construction of `u8` failed: operation is deleted"
        );
    }

    #[test]
    fn test_default_methods_report_deleted() {
        struct Inert;
        // SAFETY: No operation is declared trivial.
        unsafe impl Alternative for Inert {}

        let mut value = Inert;
        let error = match value.copy_construct() {
            Ok(_) => panic!("copy of an inert value succeeded"),
            Err(error) => error,
        };
        assert_eq!(error.operation(), Operation::CopyConstruct);
        assert_eq!(error.reason(), Some("operation is deleted"));
        assert!(value.move_construct().is_err());
        let mut other = Inert;
        assert!(value.copy_assign(&other).is_err());
        assert!(value.move_assign(&mut other).is_err());
    }
}
