//! Copying and moving whole containers.
//!
//! The entry points in this module are only available for lists whose
//! alternatives all implement [`Alternative`](crate::Alternative). Each one
//! is rejected at compile time when the list deletes the operation it needs.
//!
//! | Operation         | Fallible entry point                   | Infallible form          |
//! |-------------------|----------------------------------------|--------------------------|
//! | copy construction | [`try_clone`](Variant::try_clone)      | [`Clone::clone`]         |
//! | move construction | [`try_take`](Variant::try_take)        |                          |
//! | copy assignment   | [`try_clone_from`](Variant::try_clone_from) | [`Clone::clone_from`] |
//! | move assignment   | [`try_take_from`](Variant::try_take_from) |                       |
//!
//! The infallible forms cannot report an error, so they leave the container
//! valueless on failure and notify the installed
//! [`ValuelessHook`](crate::hooks::ValuelessHook).

use oneof_internals::{
    capabilities::{Capabilities, ConstructionError},
    list::Classified,
};

use super::Variant;
use crate::hooks::{self, ValuelessEvent};

impl<L: Classified> Variant<L> {
    /// The capabilities of this container, folded over every alternative.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::{Policy, Variant};
    ///
    /// assert_eq!(Variant::<(u8, u64)>::CAPABILITIES.copy_construct, Policy::Trivial);
    /// assert_eq!(Variant::<(u8, String)>::CAPABILITIES.copy_construct, Policy::NonTrivial);
    /// ```
    pub const CAPABILITIES: Capabilities = L::CAPABILITIES;

    /// Notifies the installed hook if a failed lifecycle operation left the
    /// container valueless.
    fn notify_if_valueless(&self, error: &ConstructionError, index: usize) {
        if self.valueless_by_exception() {
            hooks::notify_valueless(&ValuelessEvent::new(
                error.operation(),
                error.type_name(),
                index,
                error,
            ));
        }
    }

    /// Creates a copy of the container.
    ///
    /// A valueless container copies to a valueless container.
    ///
    /// # Errors
    ///
    /// Returns the error of the live alternative's copy construction.
    pub fn try_clone(&self) -> Result<Self, ConstructionError> {
        const {
            assert!(
                L::CAPABILITIES.copy_construct.is_available(),
                "an alternative of this variant cannot be copy-constructed"
            )
        };
        Ok(Self {
            arena: self.arena.try_clone()?,
        })
    }

    /// Moves the live alternative into a new container.
    ///
    /// `self` keeps its discriminant and holds the moved-from alternative, for
    /// example an empty `String`. Alternatives that delete move construction
    /// are copied instead.
    ///
    /// # Errors
    ///
    /// Returns the error of the live alternative's move construction.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let mut source: Variant<(u8, String)> = Variant::new(String::from("moved"));
    /// let target = source.try_take().unwrap();
    /// assert_eq!(target.get::<String, _>().map(String::as_str), Ok("moved"));
    /// assert_eq!(source.get::<String, _>().map(String::as_str), Ok(""));
    /// ```
    pub fn try_take(&mut self) -> Result<Self, ConstructionError> {
        const {
            assert!(
                L::CAPABILITIES.move_construct.is_available(),
                "an alternative of this variant cannot be move-constructed"
            )
        };
        let mut target = Self::valueless();
        target.arena.move_construct_from(&mut self.arena)?;
        Ok(target)
    }

    /// Replaces the contents of `self` with a copy of the contents of
    /// `source`.
    ///
    /// - If `source` is valueless, `self` becomes valueless.
    /// - If both hold the same alternative, it is copy-assigned in place.
    /// - Otherwise, when the new alternative's copy cannot fail (or its move
    ///   could fail too), the old value is dropped and the copy constructed in
    ///   place; a failure leaves `self` valueless.
    /// - Otherwise the copy is made into a temporary first: if it fails,
    ///   `self` is left untouched; if it succeeds, it is moved into `self`,
    ///   which cannot fail.
    ///
    /// # Errors
    ///
    /// Returns the error of the failed copy or assignment. Check
    /// [`valueless_by_exception`](Self::valueless_by_exception) to tell
    /// whether `self` kept a value.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), ConstructionError> {
        const {
            assert!(
                L::CAPABILITIES.copy_assign.is_available(),
                "an alternative of this variant cannot be copy-assigned"
            )
        };
        let result = self.arena.copy_assign_from(&source.arena);
        if let Err(error) = &result {
            self.notify_if_valueless(error, source.index());
        }
        result
    }

    /// Replaces the contents of `self` by moving out of `source`.
    ///
    /// - If `source` is valueless, `self` becomes valueless.
    /// - If both hold the same alternative, it is move-assigned in place.
    /// - Otherwise the old value is dropped and the new one move-constructed
    ///   in place; a failure leaves `self` valueless.
    ///
    /// `source` keeps its discriminant and holds the moved-from alternative.
    ///
    /// # Errors
    ///
    /// Returns the error of the failed move or assignment.
    pub fn try_take_from(&mut self, source: &mut Self) -> Result<(), ConstructionError> {
        const {
            assert!(
                L::CAPABILITIES.move_assign.is_available(),
                "an alternative of this variant cannot be move-assigned"
            )
        };
        let result = self.arena.move_assign_from(&mut source.arena);
        if let Err(error) = &result {
            self.notify_if_valueless(error, source.index());
        }
        result
    }
}

impl<L: Classified> Clone for Variant<L> {
    /// Copies the container.
    ///
    /// If the live alternative fails to copy, the copy is valueless and the
    /// installed [`ValuelessHook`](crate::hooks::ValuelessHook) is notified.
    /// Use [`try_clone`](Variant::try_clone) to handle the error instead.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(error) => {
                let copy = Self::valueless();
                copy.notify_if_valueless(&error, self.index());
                copy
            }
        }
    }

    /// Runs the same protocol as [`try_clone_from`](Variant::try_clone_from),
    /// discarding the error.
    fn clone_from(&mut self, source: &Self) {
        // Failures that leave `self` valueless have been reported to the hook.
        let _ = self.try_clone_from(source);
    }
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, string::String};

    use crate::{Policy, Variant};

    #[test]
    fn test_capabilities_fold() {
        let capabilities = Variant::<(u8, Box<u8>)>::CAPABILITIES;
        assert_eq!(capabilities.copy_construct, Policy::NonTrivial);
        // `Box` deletes its move, which falls back to the copy.
        assert_eq!(capabilities.move_construct, Policy::NonTrivial);
    }

    #[test]
    fn test_clone_and_clone_from() {
        let source: Variant<(u8, String)> = Variant::new(String::from("copy"));
        let copy = source.clone();
        assert_eq!(copy.get::<String, _>().map(String::as_str), Ok("copy"));

        let mut target: Variant<(u8, String)> = Variant::new(3_u8);
        target.clone_from(&source);
        assert_eq!(target.index(), 1);
        assert_eq!(source.index(), 1);
    }

    #[test]
    fn test_try_take_from_same_alternative() {
        let mut source: Variant<(u8, String)> = Variant::new(String::from("new"));
        let mut target: Variant<(u8, String)> = Variant::new(String::from("old"));
        assert!(target.try_take_from(&mut source).is_ok());
        assert_eq!(target.get::<String, _>().map(String::as_str), Ok("new"));
        assert_eq!(source.get::<String, _>().map(String::as_str), Ok(""));
    }

    #[test]
    fn test_clone_of_valueless_is_valueless() {
        let mut source: Variant<(u8, String)> = Variant::new(1_u8);
        let _ = source.try_emplace_with::<String, _, _, _>(|| Err("fail"));
        assert!(source.clone().valueless_by_exception());
    }
}
