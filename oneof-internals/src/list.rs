//! Alternative lists: the type-level description of what a tagged union can
//! hold.
//!
//! An alternative list is a tuple `(A0, A1, ..., An-1)` with between one and
//! eight elements. The traits in this module are implemented for all such
//! tuples by the `alternative_list!` macro below, and provide:
//!
//! - the storage union and the per-alternative drop vtables
//!   ([`AlternativeList`]),
//! - the aggregated capabilities and lifecycle vtables when every alternative
//!   is classified ([`Classified`]),
//! - index and type resolution ([`At`], [`Member`], [`Convertible`]),
//! - discriminant-driven dispatch into generic code ([`Dispatch`],
//!   [`DispatchMut`], [`ForEach`], [`ForEachPair`]).
//!
//! # Dispatch
//!
//! Every dispatch trait compiles to a single `match` on the discriminant,
//! with one arm per alternative. Each arm casts the erased storage pointer to
//! the concrete alternative type and hands it to a continuation. Because the
//! continuation is generic, every arm is monomorphized separately, so the
//! `match` is the jump table from discriminant to concrete code.

use core::{mem::ManuallyDrop, ptr::NonNull};

use crate::{
    arena::{AlternativeVtable, LifecycleVtable},
    capabilities::{Alternative, Capabilities},
    util::Erased,
};

/// Marker selecting the alternative at index `I`.
///
/// Type-based APIs such as [`Member`] and [`Convertible`] take an extra
/// marker parameter so that one impl per index can exist without
/// overlapping. The marker is always inferred: `variant.get::<u32, _>()`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Idx<const I: usize>;

/// A list of alternative types, implemented for tuples of one to eight
/// types.
///
/// # Safety
///
/// Implementors must guarantee that:
///
/// 1. [`Storage`](Self::Storage) has a size and alignment that can hold every
///    alternative, and every alternative can be stored at offset zero.
/// 2. `VTABLES[i]` was created for the `i`-th alternative, and
///    `VTABLES.len() == LEN`.
/// 3. [`NEEDS_DROP`](Self::NEEDS_DROP) is `true` if any alternative needs to
///    be dropped.
pub unsafe trait AlternativeList: Sized {
    /// Number of alternatives.
    const LEN: usize;
    /// Whether any alternative has drop glue.
    const NEEDS_DROP: bool;
    /// Untagged storage large enough for every alternative.
    type Storage;
    /// Drop vtables, indexed by discriminant.
    const VTABLES: &'static [AlternativeVtable];
}

/// An alternative list whose elements all implement [`Alternative`].
///
/// # Safety
///
/// Implementors must guarantee that:
///
/// 1. `LIFECYCLE[i]` was created for the `i`-th alternative, and
///    `LIFECYCLE.len() == LEN`.
/// 2. [`CAPABILITIES`](Self::CAPABILITIES) is the [meet] of the capabilities
///    of every alternative.
///
/// [meet]: Capabilities::meet
pub unsafe trait Classified: AlternativeList {
    /// The capabilities of the list as a whole: an operation is trivial only
    /// if it is trivial for every alternative, and deleted if any alternative
    /// deletes it.
    const CAPABILITIES: Capabilities;
    /// Lifecycle vtables, indexed by discriminant.
    const LIFECYCLE: &'static [LifecycleVtable];
}

/// Resolves the alternative at index `I`.
///
/// # Safety
///
/// `Output` must be the `I`-th element of the list, and `I < LEN`.
pub unsafe trait At<const I: usize>: AlternativeList {
    /// The alternative type at index `I`.
    type Output;
}

/// The alternative type at index `I` of the list `L`.
pub type Alt<L, const I: usize> = <L as At<I>>::Output;

/// Resolves the index of the alternative type `T`.
///
/// The marker `M` is `Idx<INDEX>` and is always inferred. When `T` occurs
/// more than once in the list, inference fails and the type-based API is
/// rejected at compile time; the index-based APIs remain available.
///
/// # Safety
///
/// The alternative at index [`INDEX`](Self::INDEX) must be `T`, and
/// `INDEX < LEN`.
pub unsafe trait Member<T, M>: AlternativeList {
    /// The index of `T`.
    const INDEX: usize;
}

/// Selects the alternative that a value of type `T` converts into.
///
/// Implemented once per alternative `Ai` with `Ai: From<T>`. Only lossless
/// conversions have `From` impls among the numeric types, so narrowing
/// candidates never participate. When more than one alternative accepts `T`
/// (including the alternative `T` itself), the marker `M` cannot be inferred
/// and the conversion is rejected at compile time.
///
/// # Safety
///
/// [`Target`](Self::Target) must be the alternative at index
/// [`INDEX`](Self::INDEX), and `INDEX < LEN`.
pub unsafe trait Convertible<T, M>: AlternativeList {
    /// The selected alternative.
    type Target: From<T>;
    /// The index of the selected alternative.
    const INDEX: usize;
}

/// A continuation that receives the live alternative of a container.
pub trait Resume<T> {
    /// Result of the continuation.
    type Output;

    /// Continues with `value`.
    fn resume(self, value: T) -> Self::Output;
}

/// Dispatches a shared reference to the live alternative into a
/// continuation `K`.
///
/// Implemented when `K` accepts a shared reference to every alternative with
/// the same output type.
pub trait Dispatch<'a, K>: AlternativeList {
    /// The common output of the continuation.
    type Output;

    /// Calls `continuation` with a reference to the alternative at `index`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `index < LEN`
    /// 2. `storage` points to a live alternative of type `Alt<Self, index>`
    ///    that stays valid and unaliased by mutable references for `'a`
    unsafe fn dispatch(index: usize, storage: NonNull<Erased>, continuation: K) -> Self::Output;
}

/// Dispatches a mutable reference to the live alternative into a
/// continuation `K`.
///
/// Implemented when `K` accepts a mutable reference to every alternative with
/// the same output type.
pub trait DispatchMut<'a, K>: AlternativeList {
    /// The common output of the continuation.
    type Output;

    /// Calls `continuation` with a mutable reference to the alternative at
    /// `index`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `index < LEN`
    /// 2. `storage` points to a live alternative of type `Alt<Self, index>`,
    ///    obtained from a mutable borrow that is exclusive for `'a`
    unsafe fn dispatch_mut(
        index: usize,
        storage: NonNull<Erased>,
        continuation: K,
    ) -> Self::Output;
}

/// An operation applicable to a single alternative of type `T`.
pub trait UnaryOp<T> {
    /// Result of the operation.
    type Output;

    /// Applies the operation to `value`.
    fn apply(&mut self, value: &T) -> Self::Output;
}

/// An operation applicable to two alternatives of the same type `T`.
pub trait BinaryOp<T> {
    /// Result of the operation.
    type Output;

    /// Applies the operation to `lhs` and `rhs`.
    fn apply(&mut self, lhs: &T, rhs: &T) -> Self::Output;
}

/// Applies a [`UnaryOp`] to the live alternative.
pub trait ForEach<Op>: AlternativeList {
    /// The common output of the operation.
    type Output;

    /// Applies `op` to the alternative at `index`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `index < LEN`
    /// 2. `storage` points to a live alternative of type `Alt<Self, index>`
    unsafe fn apply_at(index: usize, storage: NonNull<Erased>, op: &mut Op) -> Self::Output;
}

/// Applies a [`BinaryOp`] to the live alternatives of two containers holding
/// the same alternative.
pub trait ForEachPair<Op>: AlternativeList {
    /// The common output of the operation.
    type Output;

    /// Applies `op` to the alternatives at `index` of both storages.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `index < LEN`
    /// 2. Both `lhs` and `rhs` point to live alternatives of type
    ///    `Alt<Self, index>`
    unsafe fn apply_pair_at(
        index: usize,
        lhs: NonNull<Erased>,
        rhs: NonNull<Erased>,
        op: &mut Op,
    ) -> Self::Output;
}

macro_rules! alternative_list {
    ($storage:ident; $len:literal; $($i:tt : $T:ident . $field:ident),+) => {
        /// Untagged storage for an alternative list of this arity.
        ///
        /// Every field lives at offset zero, so the union is as large as the
        /// largest alternative and as aligned as the most aligned one.
        #[repr(C)]
        #[allow(dead_code)]
        pub union $storage<$($T),+> {
            $(
                /// Storage slot of one alternative.
                $field: ManuallyDrop<$T>,
            )+
        }

        // SAFETY:
        // 1. `$storage` is a `#[repr(C)]` union with one field per alternative,
        //    all at offset zero.
        // 2. The vtables are listed in alternative order, one per alternative.
        // 3. `NEEDS_DROP` is the disjunction over every alternative.
        unsafe impl<$($T),+> AlternativeList for ($($T,)+) {
            const LEN: usize = $len;
            const NEEDS_DROP: bool = false $(|| core::mem::needs_drop::<$T>())+;
            type Storage = $storage<$($T),+>;
            const VTABLES: &'static [AlternativeVtable] = &[$(AlternativeVtable::new::<$T>()),+];
        }

        // SAFETY:
        // 1. The vtables are listed in alternative order, one per alternative.
        // 2. `CAPABILITIES` folds `meet` over every alternative, starting from
        //    its identity element.
        unsafe impl<$($T: Alternative),+> Classified for ($($T,)+) {
            const CAPABILITIES: Capabilities =
                Capabilities::TRIVIAL $(.meet(Capabilities::of::<$T>()))+;
            const LIFECYCLE: &'static [LifecycleVtable] = &[$(LifecycleVtable::new::<$T>()),+];
        }

        impl<'a, K, O, $($T: 'a),+> Dispatch<'a, K> for ($($T,)+)
        where
            $(K: Resume<&'a $T, Output = O>,)+
        {
            type Output = O;

            #[inline]
            unsafe fn dispatch(index: usize, storage: NonNull<Erased>, continuation: K) -> O {
                match index {
                    $(
                        $i => {
                            // SAFETY: The caller guarantees that `storage` holds a
                            // live `$T` that stays shared for `'a`.
                            let value: &'a $T = unsafe { storage.cast::<$T>().as_ref() };
                            <K as Resume<&'a $T>>::resume(continuation, value)
                        }
                    )+
                    // SAFETY: The caller guarantees that `index < LEN`.
                    _ => unsafe { core::hint::unreachable_unchecked() },
                }
            }
        }

        impl<'a, K, O, $($T: 'a),+> DispatchMut<'a, K> for ($($T,)+)
        where
            $(K: Resume<&'a mut $T, Output = O>,)+
        {
            type Output = O;

            #[inline]
            unsafe fn dispatch_mut(
                index: usize,
                storage: NonNull<Erased>,
                continuation: K,
            ) -> O {
                match index {
                    $(
                        $i => {
                            // SAFETY: The caller guarantees that `storage` holds a
                            // live `$T` that is exclusively borrowed for `'a`.
                            let value: &'a mut $T = unsafe { storage.cast::<$T>().as_mut() };
                            <K as Resume<&'a mut $T>>::resume(continuation, value)
                        }
                    )+
                    // SAFETY: The caller guarantees that `index < LEN`.
                    _ => unsafe { core::hint::unreachable_unchecked() },
                }
            }
        }

        impl<Op, O, $($T),+> ForEach<Op> for ($($T,)+)
        where
            $(Op: UnaryOp<$T, Output = O>,)+
        {
            type Output = O;

            #[inline]
            unsafe fn apply_at(index: usize, storage: NonNull<Erased>, op: &mut Op) -> O {
                match index {
                    $(
                        $i => {
                            // SAFETY: The caller guarantees that `storage` holds a
                            // live `$T`.
                            let value: &$T = unsafe { storage.cast::<$T>().as_ref() };
                            <Op as UnaryOp<$T>>::apply(op, value)
                        }
                    )+
                    // SAFETY: The caller guarantees that `index < LEN`.
                    _ => unsafe { core::hint::unreachable_unchecked() },
                }
            }
        }

        impl<Op, O, $($T),+> ForEachPair<Op> for ($($T,)+)
        where
            $(Op: BinaryOp<$T, Output = O>,)+
        {
            type Output = O;

            #[inline]
            unsafe fn apply_pair_at(
                index: usize,
                lhs: NonNull<Erased>,
                rhs: NonNull<Erased>,
                op: &mut Op,
            ) -> O {
                match index {
                    $(
                        $i => {
                            // SAFETY: The caller guarantees that `lhs` holds a live
                            // `$T`.
                            let lhs: &$T = unsafe { lhs.cast::<$T>().as_ref() };
                            // SAFETY: The caller guarantees that `rhs` holds a live
                            // `$T`.
                            let rhs: &$T = unsafe { rhs.cast::<$T>().as_ref() };
                            <Op as BinaryOp<$T>>::apply(op, lhs, rhs)
                        }
                    )+
                    // SAFETY: The caller guarantees that `index < LEN`.
                    _ => unsafe { core::hint::unreachable_unchecked() },
                }
            }
        }

        alternative_list!(@indices [$($T),+] $($i : $T),+);
    };

    (@indices $all:tt $i:tt : $T:ident $(, $rest_i:tt : $rest_T:ident)*) => {
        alternative_list!(@index $all $i : $T);
        alternative_list!(@indices $all $($rest_i : $rest_T),*);
    };
    (@indices $all:tt) => {};

    (@index [$($All:ident),+] $i:tt : $T:ident) => {
        // SAFETY: `$T` is the alternative at index `$i`.
        unsafe impl<$($All),+> At<$i> for ($($All,)+) {
            type Output = $T;
        }

        // SAFETY: `$T` is the alternative at index `$i`.
        unsafe impl<$($All),+> Member<$T, Idx<$i>> for ($($All,)+) {
            const INDEX: usize = $i;
        }

        // SAFETY: `$T` is the alternative at index `$i`.
        unsafe impl<Source, $($All),+> Convertible<Source, Idx<$i>> for ($($All,)+)
        where
            $T: From<Source>,
        {
            type Target = $T;
            const INDEX: usize = $i;
        }
    };
}

alternative_list!(Storage1; 1; 0: A0 . a0);
alternative_list!(Storage2; 2; 0: A0 . a0, 1: A1 . a1);
alternative_list!(Storage3; 3; 0: A0 . a0, 1: A1 . a1, 2: A2 . a2);
alternative_list!(Storage4; 4; 0: A0 . a0, 1: A1 . a1, 2: A2 . a2, 3: A3 . a3);
alternative_list!(
    Storage5; 5;
    0: A0 . a0, 1: A1 . a1, 2: A2 . a2, 3: A3 . a3, 4: A4 . a4
);
alternative_list!(
    Storage6; 6;
    0: A0 . a0, 1: A1 . a1, 2: A2 . a2, 3: A3 . a3, 4: A4 . a4, 5: A5 . a5
);
alternative_list!(
    Storage7; 7;
    0: A0 . a0, 1: A1 . a1, 2: A2 . a2, 3: A3 . a3, 4: A4 . a4, 5: A5 . a5,
    6: A6 . a6
);
alternative_list!(
    Storage8; 8;
    0: A0 . a0, 1: A1 . a1, 2: A2 . a2, 3: A3 . a3, 4: A4 . a4, 5: A5 . a5,
    6: A6 . a6, 7: A7 . a7
);

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};
    use core::mem::{align_of, size_of};

    use super::*;
    use crate::capabilities::Policy;

    type Mixed = (u8, String, u64);

    #[test]
    fn test_lengths() {
        assert_eq!(<(u8,) as AlternativeList>::LEN, 1);
        assert_eq!(<Mixed as AlternativeList>::LEN, 3);
        assert_eq!(
            <(u8, u8, u8, u8, u8, u8, u8, u8) as AlternativeList>::LEN,
            8
        );
        assert_eq!(<Mixed as AlternativeList>::VTABLES.len(), 3);
        assert_eq!(<Mixed as Classified>::LIFECYCLE.len(), 3);
    }

    #[test]
    fn test_storage_layout() {
        type Storage = <(u8, u64, [u8; 12]) as AlternativeList>::Storage;
        assert_eq!(size_of::<Storage>(), 16);
        assert_eq!(align_of::<Storage>(), align_of::<u64>());
    }

    #[test]
    fn test_needs_drop() {
        assert!(!<(u8, u64) as AlternativeList>::NEEDS_DROP);
        assert!(<Mixed as AlternativeList>::NEEDS_DROP);
    }

    #[test]
    fn test_vtable_type_names() {
        let names: Vec<&str> = <Mixed as AlternativeList>::VTABLES
            .iter()
            .map(AlternativeVtable::type_name)
            .collect();
        assert_eq!(names, ["u8", "alloc::string::String", "u64"]);
    }

    #[test]
    fn test_member_and_at() {
        assert_eq!(<Mixed as Member<String, _>>::INDEX, 1);
        assert_eq!(<Mixed as Member<u64, _>>::INDEX, 2);
        let value: Alt<Mixed, 1> = String::from("at");
        assert_eq!(value, "at");
    }

    #[test]
    fn test_convertible_selects_lossless_target() {
        // `u16` only widens into `u64`; `u8` has no `From<u16>`.
        assert_eq!(<Mixed as Convertible<u16, _>>::INDEX, 2);
        assert_eq!(<Mixed as Convertible<&str, _>>::INDEX, 1);
    }

    #[test]
    fn test_aggregate_capabilities() {
        assert_eq!(
            <(u8, u64) as Classified>::CAPABILITIES,
            Capabilities::TRIVIAL
        );

        let mixed = <Mixed as Classified>::CAPABILITIES;
        assert_eq!(mixed.copy_construct, Policy::NonTrivial);
        assert_eq!(mixed.destroy, Policy::NonTrivial);
    }

    struct Describe;

    impl UnaryOp<u8> for Describe {
        type Output = &'static str;
        fn apply(&mut self, _value: &u8) -> &'static str {
            "byte"
        }
    }

    impl UnaryOp<String> for Describe {
        type Output = &'static str;
        fn apply(&mut self, _value: &String) -> &'static str {
            "string"
        }
    }

    impl UnaryOp<u64> for Describe {
        type Output = &'static str;
        fn apply(&mut self, _value: &u64) -> &'static str {
            "word"
        }
    }

    #[test]
    fn test_for_each_dispatches_on_index() {
        let mut value = String::from("dispatch");
        let storage = NonNull::from(&mut value).cast::<Erased>();
        // SAFETY: `storage` points to a live `String`, the alternative at index 1.
        let described = unsafe { <Mixed as ForEach<Describe>>::apply_at(1, storage, &mut Describe) };
        assert_eq!(described, "string");
    }
}
