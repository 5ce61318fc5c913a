//! Raw storage for one alternative of a list plus its discriminant.
//!
//! This module encapsulates the `storage` and `index` fields of
//! [`RawArena`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **when `index` is
//! not [`VARIANT_NPOS`], `storage` holds a live value of the alternative at
//! `index`**.
//!
//! # Safety Invariant
//!
//! Every method that replaces the live alternative first sets `index` to
//! [`VARIANT_NPOS`] and drops the old value, then runs the construction, and
//! only stores the new discriminant once the new value is fully written. A
//! construction that fails or panics therefore leaves the arena valueless,
//! never holding a discriminant that does not match its storage.
//!
//! # Lifecycle protocol
//!
//! For [classified](Classified) lists the arena also implements the copy and
//! move protocol used by the public container:
//!
//! - [`copy_construct_from`](RawArena::copy_construct_from) and
//!   [`move_construct_from`](RawArena::move_construct_from) destroy the
//!   current value, then construct the source's alternative.
//! - [`copy_assign_from`](RawArena::copy_assign_from) and
//!   [`move_assign_from`](RawArena::move_assign_from) assign in place when
//!   both arenas hold the same alternative, and otherwise switch alternative
//!   with the strongest guarantee the alternatives' declared policies allow.

use core::{mem::MaybeUninit, ptr::NonNull};

use crate::{
    arena::vtable::LifecycleVtable,
    capabilities::ConstructionError,
    list::{Alt, AlternativeList, At, Classified},
    util::Erased,
};

/// The discriminant reported by a valueless arena.
pub const VARIANT_NPOS: usize = usize::MAX;

/// Storage for exactly one alternative of the list `L`, or for nothing.
///
/// The arena tracks which alternative is live through its discriminant. A
/// discriminant of [`VARIANT_NPOS`] means the arena is valueless: it holds no
/// value, which happens after a construction failed, or transiently while a
/// new value is being constructed.
///
/// Dropping the arena drops the live alternative, if any.
pub struct RawArena<L: AlternativeList> {
    /// Untagged storage for the live alternative.
    ///
    /// # Safety
    ///
    /// The following safety invariant is guaranteed to be upheld as long as
    /// this struct exists, except while a method of this module runs:
    ///
    /// 1. If `index != VARIANT_NPOS`, the storage holds a live value of the
    ///    alternative at `index`.
    storage: MaybeUninit<L::Storage>,
    /// The discriminant of the live alternative.
    ///
    /// # Safety
    ///
    /// The following safety invariant is guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. `index < L::LEN` or `index == VARIANT_NPOS`.
    index: usize,
}

impl<L: AlternativeList> RawArena<L> {
    /// Creates an arena that holds no value.
    #[inline]
    pub const fn valueless() -> Self {
        Self {
            storage: MaybeUninit::uninit(),
            index: VARIANT_NPOS,
        }
    }

    /// The discriminant of the live alternative, or [`VARIANT_NPOS`].
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` if the arena holds no value.
    #[inline]
    pub const fn is_valueless(&self) -> bool {
        self.index == VARIANT_NPOS
    }

    /// The discriminant of the live alternative, or `None` when valueless.
    #[inline]
    pub const fn live_index(&self) -> Option<usize> {
        if self.is_valueless() { None } else { Some(self.index) }
    }

    /// A pointer to the storage, valid for reads for as long as `self` is
    /// borrowed.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<Erased> {
        NonNull::from(&self.storage).cast()
    }

    /// A pointer to the storage, valid for reads and writes for as long as
    /// `self` is mutably borrowed.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> NonNull<Erased> {
        NonNull::from(&mut self.storage).cast()
    }

    /// Drops the live alternative, if any, leaving the arena valueless.
    ///
    /// The arena is marked valueless before the value is dropped, so a
    /// panicking destructor cannot cause a double drop.
    pub fn destroy(&mut self) {
        let index = core::mem::replace(&mut self.index, VARIANT_NPOS);
        if !L::NEEDS_DROP || index == VARIANT_NPOS {
            return;
        }
        let vtable = &L::VTABLES[index];
        // SAFETY:
        // 1. `index` was the discriminant of the live value, so the storage holds
        //    a live value of the type `vtable` was created for
        // 2. The arena is already valueless, so the value is not used or dropped
        //    again
        unsafe {
            vtable.drop(self.as_mut_ptr());
        }
    }

    /// Replaces the live alternative with the value returned by `f`.
    ///
    /// The old value is dropped before `f` runs. If `f` panics, the arena is
    /// left valueless.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `index < L::LEN`, and the alternative at `index` is `T`
    pub unsafe fn emplace_unchecked<T, F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.destroy();
        let value = f();
        let mut ptr = self.as_mut_ptr().cast::<T>();
        // SAFETY: The storage has room for every alternative at offset zero and
        // holds no live value after `destroy`.
        unsafe {
            ptr.write(value);
        }
        self.index = index;
        // SAFETY: `ptr` now points to the live `T` written above, borrowed
        // through `self`.
        unsafe { ptr.as_mut() }
    }

    /// Replaces the live alternative with the value returned by `f`, or
    /// leaves the arena valueless if `f` fails.
    ///
    /// The old value is dropped before `f` runs. If `f` returns an error or
    /// panics, the arena is left valueless.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `index < L::LEN`, and the alternative at `index` is `T`
    pub unsafe fn try_emplace_unchecked<T, E, F>(&mut self, index: usize, f: F) -> Result<&mut T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.destroy();
        let value = f()?;
        // SAFETY:
        // 1. Guaranteed by the caller
        Ok(unsafe { self.emplace_unchecked(index, || value) })
    }

    /// Replaces the live alternative with the alternative at index `I`.
    #[inline]
    pub fn emplace_with<const I: usize, F>(&mut self, f: F) -> &mut Alt<L, I>
    where
        L: At<I>,
        F: FnOnce() -> Alt<L, I>,
    {
        // SAFETY:
        // 1. `At<I>` guarantees that `I < L::LEN` and that the alternative at `I`
        //    is `Alt<L, I>`
        unsafe { self.emplace_unchecked(I, f) }
    }

    /// Replaces the live alternative with the alternative at index `I`, or
    /// leaves the arena valueless if `f` fails.
    #[inline]
    pub fn try_emplace_with<const I: usize, E, F>(&mut self, f: F) -> Result<&mut Alt<L, I>, E>
    where
        L: At<I>,
        F: FnOnce() -> Result<Alt<L, I>, E>,
    {
        // SAFETY:
        // 1. `At<I>` guarantees that `I < L::LEN` and that the alternative at `I`
        //    is `Alt<L, I>`
        unsafe { self.try_emplace_unchecked(I, f) }
    }

    /// Returns a reference to the live alternative as a `T`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The arena is not valueless, and the alternative at
    ///    [`index`](Self::index) is `T`
    #[inline]
    pub unsafe fn get_unchecked<T>(&self) -> &T {
        // SAFETY:
        // 1. Guaranteed by the caller, together with the invariant of `storage`
        unsafe { self.as_ptr().cast::<T>().as_ref() }
    }

    /// Returns a mutable reference to the live alternative as a `T`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The arena is not valueless, and the alternative at
    ///    [`index`](Self::index) is `T`
    #[inline]
    pub unsafe fn get_unchecked_mut<T>(&mut self) -> &mut T {
        // SAFETY:
        // 1. Guaranteed by the caller, together with the invariant of `storage`
        unsafe { self.as_mut_ptr().cast::<T>().as_mut() }
    }

    /// Moves the live alternative out as a `T`, leaving the arena valueless.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The arena is not valueless, and the alternative at
    ///    [`index`](Self::index) is `T`
    #[inline]
    pub unsafe fn take_unchecked<T>(&mut self) -> T {
        self.index = VARIANT_NPOS;
        // SAFETY:
        // 1. Guaranteed by the caller; the arena is marked valueless above, so the
        //    value is owned by the caller from here on
        unsafe { self.as_mut_ptr().cast::<T>().read() }
    }

    /// Returns a reference to the alternative at index `I`, if it is live.
    #[inline]
    pub fn get<const I: usize>(&self) -> Option<&Alt<L, I>>
    where
        L: At<I>,
    {
        if self.index != I {
            return None;
        }
        // SAFETY:
        // 1. The discriminant is `I` and `At<I>` guarantees the alternative at
        //    `I` is `Alt<L, I>`
        Some(unsafe { self.get_unchecked() })
    }

    /// Returns a mutable reference to the alternative at index `I`, if it is
    /// live.
    #[inline]
    pub fn get_mut<const I: usize>(&mut self) -> Option<&mut Alt<L, I>>
    where
        L: At<I>,
    {
        if self.index != I {
            return None;
        }
        // SAFETY:
        // 1. The discriminant is `I` and `At<I>` guarantees the alternative at
        //    `I` is `Alt<L, I>`
        Some(unsafe { self.get_unchecked_mut() })
    }

    /// Moves the alternative at index `I` out, if it is live, leaving the
    /// arena valueless.
    #[inline]
    pub fn take<const I: usize>(&mut self) -> Option<Alt<L, I>>
    where
        L: At<I>,
    {
        if self.index != I {
            return None;
        }
        // SAFETY:
        // 1. The discriminant is `I` and `At<I>` guarantees the alternative at
        //    `I` is `Alt<L, I>`
        Some(unsafe { self.take_unchecked() })
    }

    /// Copies the whole storage and discriminant of `source`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `self` is valueless
    /// 2. The copy policy of the live alternative of `source` is trivial
    #[inline]
    unsafe fn copy_bits_from(&mut self, source: &Self) {
        // SAFETY: Both storages are valid, aligned and distinct; copying
        // uninitialized bytes through `MaybeUninit` is allowed.
        unsafe {
            core::ptr::copy_nonoverlapping(&source.storage, &mut self.storage, 1);
        }
        self.index = source.index;
    }
}

impl<L: Classified> RawArena<L> {
    /// The lifecycle vtable of the live alternative, or `None` when valueless.
    #[inline]
    pub fn lifecycle(&self) -> Option<&'static LifecycleVtable> {
        L::LIFECYCLE.get(self.index)
    }

    /// Replaces the contents of `self` with a copy of the alternative held by
    /// `source`.
    ///
    /// The current value is dropped first. On failure, `self` is valueless.
    /// If `source` is valueless, so is `self` afterwards.
    pub fn copy_construct_from(&mut self, source: &Self) -> Result<(), ConstructionError> {
        self.destroy();
        let Some(vtable) = source.lifecycle() else {
            return Ok(());
        };
        if L::CAPABILITIES.copy_construct.is_trivial() {
            // SAFETY:
            // 1. `self` was destroyed above
            // 2. Every alternative of `L` copies trivially
            unsafe { self.copy_bits_from(source) };
            return Ok(());
        }
        let source_ptr = source.as_ptr();
        let target_ptr = self.as_mut_ptr();
        // SAFETY:
        // 1. `source` holds a live value of the alternative `vtable` belongs to
        // 2. `self` holds no live value and its storage fits every alternative
        unsafe {
            vtable.copy_construct(source_ptr, target_ptr)?;
        }
        self.index = source.index;
        Ok(())
    }

    /// Replaces the contents of `self` by moving the alternative out of
    /// `source`.
    ///
    /// The current value is dropped first. `source` keeps its discriminant
    /// and holds the moved-from alternative. On failure, `self` is valueless.
    /// If `source` is valueless, so is `self` afterwards.
    pub fn move_construct_from(&mut self, source: &mut Self) -> Result<(), ConstructionError> {
        self.destroy();
        let Some(vtable) = source.lifecycle() else {
            return Ok(());
        };
        if L::CAPABILITIES.move_construct.is_trivial() {
            // SAFETY:
            // 1. `self` was destroyed above
            // 2. Every alternative of `L` moves trivially, which leaves the source
            //    intact
            unsafe { self.copy_bits_from(source) };
            return Ok(());
        }
        let source_ptr = source.as_mut_ptr();
        let target_ptr = self.as_mut_ptr();
        // SAFETY:
        // 1. `source` holds a live, exclusively borrowed value of the alternative
        //    `vtable` belongs to
        // 2. `self` holds no live value and its storage fits every alternative
        unsafe {
            vtable.move_construct(source_ptr, target_ptr)?;
        }
        self.index = source.index;
        Ok(())
    }

    /// Creates a new arena holding a copy of the alternative of `self`.
    pub fn try_clone(&self) -> Result<Self, ConstructionError> {
        let mut arena = Self::valueless();
        arena.copy_construct_from(self)?;
        Ok(arena)
    }

    /// Copy-assigns the contents of `source` to `self`.
    ///
    /// - If `source` is valueless, `self` becomes valueless.
    /// - If both hold the same alternative, it is copy-assigned in place. On
    ///   failure `self` keeps that alternative, in whatever state the
    ///   alternative's assignment left it.
    /// - Otherwise, if the new alternative's copy cannot fail, or its move
    ///   could fail as well, the old value is destroyed and the new one
    ///   copy-constructed in place. On failure `self` is valueless.
    /// - Otherwise the new alternative is first copied into a temporary. If
    ///   that fails, `self` is left untouched; the copy is then moved into
    ///   `self`, and only a failure of that move leaves `self` valueless.
    pub fn copy_assign_from(&mut self, source: &Self) -> Result<(), ConstructionError> {
        let Some(vtable) = source.lifecycle() else {
            self.destroy();
            return Ok(());
        };
        if L::CAPABILITIES.copy_assign.is_trivial() {
            self.destroy();
            // SAFETY:
            // 1. `self` was destroyed above
            // 2. Every alternative of `L` copies trivially
            unsafe { self.copy_bits_from(source) };
            return Ok(());
        }
        if self.index == source.index {
            let target_ptr = self.as_mut_ptr();
            // SAFETY:
            // 1. Both arenas hold live values of the alternative `vtable` belongs
            //    to, in distinct storages
            // 2. `self` is exclusively borrowed
            return unsafe { vtable.copy_assign(target_ptr, source.as_ptr()) };
        }
        if vtable.copy_construct_nofail() || !vtable.move_construct_nofail() {
            return self.copy_construct_from(source);
        }
        let mut side = Self::valueless();
        side.copy_construct_from(source)?;
        self.move_construct_from(&mut side)
    }

    /// Move-assigns the contents of `source` to `self`.
    ///
    /// - If `source` is valueless, `self` becomes valueless.
    /// - If both hold the same alternative, it is move-assigned in place.
    /// - Otherwise the old value is destroyed and the new one
    ///   move-constructed in place. On failure `self` is valueless.
    ///
    /// In every case `source` keeps its discriminant.
    pub fn move_assign_from(&mut self, source: &mut Self) -> Result<(), ConstructionError> {
        let Some(vtable) = source.lifecycle() else {
            self.destroy();
            return Ok(());
        };
        if L::CAPABILITIES.move_assign.is_trivial() {
            self.destroy();
            // SAFETY:
            // 1. `self` was destroyed above
            // 2. Every alternative of `L` moves trivially, which leaves the source
            //    intact
            unsafe { self.copy_bits_from(source) };
            return Ok(());
        }
        if self.index == source.index {
            let target_ptr = self.as_mut_ptr();
            let source_ptr = source.as_mut_ptr();
            // SAFETY:
            // 1. Both arenas hold live values of the alternative `vtable` belongs
            //    to, in distinct storages
            // 2. Both arenas are exclusively borrowed
            return unsafe { vtable.move_assign(target_ptr, source_ptr) };
        }
        self.move_construct_from(source)
    }
}

impl<L: AlternativeList> core::ops::Drop for RawArena<L> {
    #[inline]
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<L: AlternativeList> core::fmt::Debug for RawArena<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut debug = f.debug_struct("RawArena");
        debug.field("index", &self.live_index());
        if let Some(vtable) = L::VTABLES.get(self.index) {
            debug.field("alternative", &vtable.type_name());
        }
        debug.finish_non_exhaustive()
    }
}
