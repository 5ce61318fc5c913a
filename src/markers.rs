//! Marker types used as alternatives or as type-level indices.
//!
//! - [`Monostate`]: A unit alternative, typically placed first in a list to
//!   make the container default-constructible when no other alternative is
//! - [`Idx`]: The inferred marker of the type-based APIs. A type `T` resolves
//!   to index `I` of a list `L` through `L: Member<T, Idx<I>>`, which is why
//!   methods such as [`Variant::get`](crate::Variant::get) take a trailing `_`
//!   parameter.

pub use oneof_internals::list::Idx;

/// A unit alternative with exactly one value.
///
/// All `Monostate` values are equal, so two containers that both hold a
/// `Monostate` compare equal.
///
/// # Examples
///
/// ```
/// use oneof::{Variant, markers::Monostate};
///
/// let mut slot: Variant<(Monostate, u16)> = Variant::default();
/// assert!(slot.holds_alternative::<Monostate, _>());
///
/// slot.emplace(8080_u16);
/// slot.reset();
/// assert_eq!(slot.get::<Monostate, _>(), Ok(&Monostate));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monostate;

oneof_internals::trivial_alternative!(Monostate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Policy, Variant};

    #[test]
    fn test_monostate_is_trivial_and_equal() {
        assert_eq!(Variant::<(Monostate, u8)>::CAPABILITIES.copy_construct, Policy::Trivial);
        let a: Variant<(Monostate, u8)> = Variant::default();
        let b: Variant<(Monostate, u8)> = Variant::new(Monostate);
        assert_eq!(a, b);
        assert!(a < Variant::new(0_u8));
    }
}
