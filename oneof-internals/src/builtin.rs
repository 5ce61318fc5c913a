//! [`Alternative`] implementations for common types, and the macros that
//! classify user types.

use alloc::{boxed::Box, string::String, vec::Vec};

use crate::capabilities::{Alternative, ConstructionError, Policy};

/// Classifies `Copy` types as alternatives whose every operation is trivial.
///
/// Each operation is a bitwise copy and never fails. The macro accepts any
/// number of types.
///
/// # Examples
///
/// ```
/// use oneof_internals::{
///     capabilities::{Capabilities, Policy},
///     trivial_alternative,
/// };
///
/// #[derive(Clone, Copy)]
/// struct Millis(u64);
///
/// #[derive(Clone, Copy)]
/// enum Unit {
///     Seconds,
///     Minutes,
/// }
///
/// trivial_alternative!(Millis, Unit);
///
/// assert_eq!(Capabilities::of::<Millis>(), Capabilities::TRIVIAL);
/// ```
#[macro_export]
macro_rules! trivial_alternative {
    ($($ty:ty),+ $(,)?) => {
        $(
            // SAFETY: The operations below dereference `Copy` values, which
            // is exactly a bitwise copy.
            unsafe impl $crate::capabilities::Alternative for $ty {
                const COPY_CONSTRUCT: $crate::capabilities::Policy =
                    $crate::capabilities::Policy::Trivial;
                const MOVE_CONSTRUCT: $crate::capabilities::Policy =
                    $crate::capabilities::Policy::Trivial;
                const COPY_ASSIGN: $crate::capabilities::Policy =
                    $crate::capabilities::Policy::Trivial;
                const MOVE_ASSIGN: $crate::capabilities::Policy =
                    $crate::capabilities::Policy::Trivial;
                const COPY_CONSTRUCT_NOFAIL: bool = true;
                const MOVE_CONSTRUCT_NOFAIL: bool = true;

                #[inline]
                fn copy_construct(
                    &self,
                ) -> ::core::result::Result<Self, $crate::capabilities::ConstructionError> {
                    ::core::result::Result::Ok(*self)
                }

                #[inline]
                fn move_construct(
                    &mut self,
                ) -> ::core::result::Result<Self, $crate::capabilities::ConstructionError> {
                    ::core::result::Result::Ok(*self)
                }

                #[inline]
                fn copy_assign(
                    &mut self,
                    source: &Self,
                ) -> ::core::result::Result<(), $crate::capabilities::ConstructionError> {
                    *self = *source;
                    ::core::result::Result::Ok(())
                }

                #[inline]
                fn move_assign(
                    &mut self,
                    source: &mut Self,
                ) -> ::core::result::Result<(), $crate::capabilities::ConstructionError> {
                    *self = *source;
                    ::core::result::Result::Ok(())
                }
            }
        )+
    };
}

/// Classifies `Clone` types as alternatives that copy by cloning.
///
/// Copy construction and copy assignment are non-trivial and never fail
/// (a panicking `clone` unwinds instead). Move operations are deleted, so the
/// container moves these alternatives by cloning them as well.
///
/// Types with a cheap moved-from state, such as `String`, are better served
/// by a manual [`Alternative`](crate::capabilities::Alternative)
/// implementation with a non-trivial move.
///
/// # Examples
///
/// ```
/// use oneof_internals::{
///     capabilities::{Alternative, Policy},
///     clone_alternative,
/// };
///
/// #[derive(Clone)]
/// struct Tags(Vec<String>);
/// clone_alternative!(Tags);
///
/// assert_eq!(<Tags as Alternative>::COPY_CONSTRUCT, Policy::NonTrivial);
/// assert!(<Tags as Alternative>::COPY_CONSTRUCT_NOFAIL);
/// ```
#[macro_export]
macro_rules! clone_alternative {
    ($($ty:ty),+ $(,)?) => {
        $(
            // SAFETY: No operation is declared trivial.
            unsafe impl $crate::capabilities::Alternative for $ty {
                const COPY_CONSTRUCT: $crate::capabilities::Policy =
                    $crate::capabilities::Policy::NonTrivial;
                const COPY_ASSIGN: $crate::capabilities::Policy =
                    $crate::capabilities::Policy::NonTrivial;
                const COPY_CONSTRUCT_NOFAIL: bool = true;

                #[inline]
                fn copy_construct(
                    &self,
                ) -> ::core::result::Result<Self, $crate::capabilities::ConstructionError> {
                    ::core::result::Result::Ok(::core::clone::Clone::clone(self))
                }

                #[inline]
                fn copy_assign(
                    &mut self,
                    source: &Self,
                ) -> ::core::result::Result<(), $crate::capabilities::ConstructionError> {
                    ::core::clone::Clone::clone_from(self, source);
                    ::core::result::Result::Ok(())
                }
            }
        )+
    };
}

trivial_alternative!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    &'static str,
);

/// Implements [`Alternative`] for owning types with a cheap `Default`
/// moved-from state: copies clone, moves take.
macro_rules! take_alternative {
    ($(impl$([$($generics:tt)*])? for $ty:ty;)+) => {
        $(
            // SAFETY: No operation is declared trivial.
            unsafe impl$(<$($generics)*>)? Alternative for $ty {
                const COPY_CONSTRUCT: Policy = Policy::NonTrivial;
                const MOVE_CONSTRUCT: Policy = Policy::NonTrivial;
                const COPY_ASSIGN: Policy = Policy::NonTrivial;
                const MOVE_ASSIGN: Policy = Policy::NonTrivial;
                const COPY_CONSTRUCT_NOFAIL: bool = true;
                const MOVE_CONSTRUCT_NOFAIL: bool = true;

                #[inline]
                fn copy_construct(&self) -> Result<Self, ConstructionError> {
                    Ok(self.clone())
                }

                #[inline]
                fn move_construct(&mut self) -> Result<Self, ConstructionError> {
                    Ok(core::mem::take(self))
                }

                #[inline]
                fn copy_assign(&mut self, source: &Self) -> Result<(), ConstructionError> {
                    self.clone_from(source);
                    Ok(())
                }

                #[inline]
                fn move_assign(&mut self, source: &mut Self) -> Result<(), ConstructionError> {
                    *self = core::mem::take(source);
                    Ok(())
                }
            }
        )+
    };
}

take_alternative! {
    impl for String;
    impl[T: Clone] for Vec<T>;
    impl[T: Clone] for Option<T>;
}

// SAFETY: No operation is declared trivial.
unsafe impl<T: Clone> Alternative for Box<T> {
    const COPY_CONSTRUCT: Policy = Policy::NonTrivial;
    const COPY_ASSIGN: Policy = Policy::NonTrivial;
    const COPY_CONSTRUCT_NOFAIL: bool = true;

    #[inline]
    fn copy_construct(&self) -> Result<Self, ConstructionError> {
        Ok(self.clone())
    }

    #[inline]
    fn copy_assign(&mut self, source: &Self) -> Result<(), ConstructionError> {
        self.clone_from(source);
        Ok(())
    }
}
