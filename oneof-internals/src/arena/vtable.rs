//! Vtables for type-erased operations on the live alternative.
//!
//! The storage arena only knows the live alternative through its
//! discriminant. The vtables in this module map a discriminant back to code
//! that was monomorphized for the concrete alternative type:
//!
//! - [`AlternativeVtable`] is available for every alternative list and holds
//!   the operations every alternative supports: naming and dropping.
//! - [`LifecycleVtable`] is available for [classified] lists and holds the
//!   copy and move operations, already resolved to their effective
//!   implementation (bitwise copy, user code, or the copy fallback of a
//!   deleted move).
//!
//! Both vtables encapsulate their fields so that they can only be created by
//! [`AlternativeVtable::new`] and [`LifecycleVtable::new`].
//!
//! # Safety Invariant
//!
//! Every function pointer stored in a vtable was instantiated with the type
//! `T` that was used to create that vtable. The list macros place the vtable
//! for the `i`-th alternative at index `i`.
//!
//! [classified]: crate::list::Classified

use core::ptr::NonNull;

use crate::{
    capabilities::{Alternative, Capabilities, ConstructionError, Operation, Policy},
    util::Erased,
};

/// Signature of a construction function: reads the source, writes a new
/// value to the (uninitialized) destination.
type ConstructFn = unsafe fn(NonNull<Erased>, NonNull<Erased>) -> Result<(), ConstructionError>;

/// Signature of an assignment function: overwrites the (live) destination
/// from the source.
type AssignFn = unsafe fn(NonNull<Erased>, NonNull<Erased>) -> Result<(), ConstructionError>;

/// Vtable for naming and dropping a type-erased alternative.
///
/// # Safety Invariant
///
/// The field `drop` is guaranteed to point to the function [`drop`]
/// instantiated with the alternative type `T` that was used to create this
/// [`AlternativeVtable`].
#[derive(Clone, Copy)]
pub struct AlternativeVtable {
    /// Gets the [`core::any::type_name`] of the alternative.
    type_name: fn() -> &'static str,
    /// Drops the alternative pointed to by this pointer in place.
    drop: unsafe fn(NonNull<Erased>),
}

impl AlternativeVtable {
    /// Creates a new [`AlternativeVtable`] for the alternative type `T`.
    pub(crate) const fn new<T>() -> Self {
        Self {
            type_name: core::any::type_name::<T>,
            drop: drop::<T>,
        }
    }

    /// Gets the [`core::any::type_name`] of the alternative type that was
    /// used to create this [`AlternativeVtable`].
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Drops the alternative pointed to by `ptr` in place.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to a live, properly aligned value of the alternative
    ///    type that was used to create this [`AlternativeVtable`]
    /// 2. The value is not used again after this call, and is not dropped
    ///    again
    #[inline]
    pub(crate) unsafe fn drop(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<T>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: drop
            (self.drop)(ptr);
        }
    }
}

impl core::fmt::Debug for AlternativeVtable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AlternativeVtable")
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}

/// Vtable for copying and moving a type-erased alternative.
///
/// # Safety Invariant
///
/// The function pointers are guaranteed to be instantiated with the
/// alternative type `T` that was used to create this [`LifecycleVtable`].
/// A function pointer for an operation whose effective policy is
/// [`Policy::Trivial`] performs a bitwise copy, which the safety contract of
/// [`Alternative`] allows.
#[derive(Clone, Copy)]
pub struct LifecycleVtable {
    /// The normalized capabilities of the alternative.
    capabilities: Capabilities,
    /// Whether copy construction is trivial or declared never to fail.
    copy_construct_nofail: bool,
    /// Whether the effective move construction (after falling back to copy
    /// construction) is trivial or declared never to fail.
    move_construct_nofail: bool,
    /// Copy-constructs from the source into uninitialized destination.
    copy_construct: ConstructFn,
    /// Move-constructs from the source into uninitialized destination.
    move_construct: ConstructFn,
    /// Copy-assigns the source into the live destination.
    copy_assign: AssignFn,
    /// Move-assigns the source into the live destination.
    move_assign: AssignFn,
}

impl LifecycleVtable {
    /// Creates a new [`LifecycleVtable`] for the alternative type `T`.
    pub(crate) const fn new<T: Alternative>() -> Self {
        let copy_construct_nofail = match T::COPY_CONSTRUCT {
            Policy::Deleted => false,
            Policy::Trivial => true,
            Policy::NonTrivial => T::COPY_CONSTRUCT_NOFAIL,
        };
        let (move_construct, move_construct_nofail): (ConstructFn, bool) = match T::MOVE_CONSTRUCT {
            Policy::Trivial => (bitwise_construct::<T>, true),
            Policy::NonTrivial => (move_construct::<T>, T::MOVE_CONSTRUCT_NOFAIL),
            Policy::Deleted => (copy_construct_fn::<T>(), copy_construct_nofail),
        };
        let move_assign: AssignFn = match T::MOVE_ASSIGN {
            Policy::Trivial => bitwise_assign::<T>,
            Policy::NonTrivial => move_assign::<T>,
            Policy::Deleted => copy_assign_fn::<T>(),
        };
        Self {
            capabilities: Capabilities::of::<T>(),
            copy_construct_nofail,
            move_construct_nofail,
            copy_construct: copy_construct_fn::<T>(),
            move_construct,
            copy_assign: copy_assign_fn::<T>(),
            move_assign,
        }
    }

    /// The normalized capabilities of the alternative.
    #[inline]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether copy construction of the alternative cannot fail.
    #[inline]
    pub const fn copy_construct_nofail(&self) -> bool {
        self.copy_construct_nofail
    }

    /// Whether the effective move construction of the alternative cannot
    /// fail. For alternatives that delete move construction, this is the
    /// same as [`copy_construct_nofail`](Self::copy_construct_nofail).
    #[inline]
    pub const fn move_construct_nofail(&self) -> bool {
        self.move_construct_nofail
    }

    /// Copy-constructs the alternative at `src` into `dst`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to a live value of the alternative type that was used
    ///    to create this [`LifecycleVtable`]
    /// 2. `dst` is valid for writes and properly aligned for that type, and
    ///    holds no live value
    #[inline]
    pub(crate) unsafe fn copy_construct(
        &self,
        src: NonNull<Erased>,
        dst: NonNull<Erased>,
    ) -> Result<(), ConstructionError> {
        // SAFETY: We know that `self.copy_construct` was instantiated with the
        // type of this vtable. Its safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: copy_construct
            (self.copy_construct)(src, dst)
        }
    }

    /// Move-constructs the alternative at `src` into `dst`, leaving `src` in
    /// a moved-from state that is still live.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to a live value of the alternative type that was used
    ///    to create this [`LifecycleVtable`], and is not aliased
    /// 2. `dst` is valid for writes and properly aligned for that type, and
    ///    holds no live value
    #[inline]
    pub(crate) unsafe fn move_construct(
        &self,
        src: NonNull<Erased>,
        dst: NonNull<Erased>,
    ) -> Result<(), ConstructionError> {
        // SAFETY: We know that `self.move_construct` was instantiated with the
        // type of this vtable. Its safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: move_construct
            (self.move_construct)(src, dst)
        }
    }

    /// Copy-assigns the alternative at `src` to the alternative at `dst`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `dst` and `src` point to distinct live values of the alternative
    ///    type that was used to create this [`LifecycleVtable`]
    /// 2. `dst` is not aliased
    #[inline]
    pub(crate) unsafe fn copy_assign(
        &self,
        dst: NonNull<Erased>,
        src: NonNull<Erased>,
    ) -> Result<(), ConstructionError> {
        // SAFETY: We know that `self.copy_assign` was instantiated with the
        // type of this vtable. Its safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: copy_assign
            (self.copy_assign)(dst, src)
        }
    }

    /// Move-assigns the alternative at `src` to the alternative at `dst`,
    /// leaving `src` in a moved-from state that is still live.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `dst` and `src` point to distinct live values of the alternative
    ///    type that was used to create this [`LifecycleVtable`]
    /// 2. Neither `dst` nor `src` is aliased
    #[inline]
    pub(crate) unsafe fn move_assign(
        &self,
        dst: NonNull<Erased>,
        src: NonNull<Erased>,
    ) -> Result<(), ConstructionError> {
        // SAFETY: We know that `self.move_assign` was instantiated with the
        // type of this vtable. Its safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: move_assign
            (self.move_assign)(dst, src)
        }
    }
}

impl core::fmt::Debug for LifecycleVtable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LifecycleVtable")
            .field("capabilities", &self.capabilities)
            .field("copy_construct_nofail", &self.copy_construct_nofail)
            .field("move_construct_nofail", &self.move_construct_nofail)
            .finish_non_exhaustive()
    }
}

/// Selects the copy construction function of `T`.
const fn copy_construct_fn<T: Alternative>() -> ConstructFn {
    if T::COPY_CONSTRUCT.is_trivial() {
        bitwise_construct::<T>
    } else {
        copy_construct::<T>
    }
}

/// Selects the copy assignment function of `T`.
const fn copy_assign_fn<T: Alternative>() -> AssignFn {
    if T::COPY_ASSIGN.is_trivial() {
        bitwise_assign::<T>
    } else {
        copy_assign::<T>
    }
}

/// Drops the value of type `T` pointed to by `ptr` in place.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to a live, properly aligned value of type `T`
/// 2. The value is not used again after this call, and is not dropped again
unsafe fn drop<T>(ptr: NonNull<Erased>) {
    let ptr: NonNull<T> = ptr.cast();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe {
        // @add-unsafe-context: drop_in_place
        ptr.drop_in_place();
    }
}

/// Copies the bits of the `T` at `src` into `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to a live value of type `T` whose copy policy is trivial
/// 2. `dst` is valid for writes, properly aligned, and does not overlap `src`
unsafe fn bitwise_construct<T>(src: NonNull<Erased>, dst: NonNull<Erased>) -> Result<(), ConstructionError> {
    // SAFETY:
    // 1. Guaranteed by the caller; a trivial policy makes the copy a valid value
    // 2. Guaranteed by the caller
    unsafe {
        core::ptr::copy_nonoverlapping(src.cast::<T>().as_ptr(), dst.cast::<T>().as_ptr(), 1);
    }
    Ok(())
}

/// Replaces the `T` at `dst` with the bits of the `T` at `src`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `dst` and `src` point to distinct live values of type `T` whose
///    assignment policy is trivial
/// 2. `dst` is not aliased
unsafe fn bitwise_assign<T>(dst: NonNull<Erased>, src: NonNull<Erased>) -> Result<(), ConstructionError> {
    let dst: NonNull<T> = dst.cast();
    // SAFETY:
    // 1. `dst` points to a live `T`, guaranteed by the caller
    // 2. The value is overwritten below and never used again
    unsafe {
        dst.drop_in_place();
    }
    // SAFETY:
    // 1. `src` points to a live `T` and does not overlap `dst`, guaranteed by
    //    the caller
    // 2. A trivial policy makes the copy a valid value
    unsafe {
        core::ptr::copy_nonoverlapping(src.cast::<T>().as_ptr(), dst.as_ptr(), 1);
    }
    Ok(())
}

/// Writes the result of [`Alternative::copy_construct`] to `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to a live value of type `T`
/// 2. `dst` is valid for writes, properly aligned, and holds no live value
unsafe fn copy_construct<T: Alternative>(
    src: NonNull<Erased>,
    dst: NonNull<Erased>,
) -> Result<(), ConstructionError> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let source: &T = unsafe { src.cast::<T>().as_ref() };
    let value = source.copy_construct()?;
    // SAFETY:
    // 2. Guaranteed by the caller
    unsafe {
        dst.cast::<T>().write(value);
    }
    Ok(())
}

/// Writes the result of [`Alternative::move_construct`] to `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to a live, unaliased value of type `T`
/// 2. `dst` is valid for writes, properly aligned, and holds no live value
unsafe fn move_construct<T: Alternative>(
    src: NonNull<Erased>,
    dst: NonNull<Erased>,
) -> Result<(), ConstructionError> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let source: &mut T = unsafe { src.cast::<T>().as_mut() };
    let value = source.move_construct()?;
    // SAFETY:
    // 2. Guaranteed by the caller
    unsafe {
        dst.cast::<T>().write(value);
    }
    Ok(())
}

/// Calls [`Alternative::copy_assign`] on the values at `dst` and `src`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `dst` and `src` point to distinct live values of type `T`
/// 2. `dst` is not aliased
unsafe fn copy_assign<T: Alternative>(
    dst: NonNull<Erased>,
    src: NonNull<Erased>,
) -> Result<(), ConstructionError> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let source: &T = unsafe { src.cast::<T>().as_ref() };
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    let target: &mut T = unsafe { dst.cast::<T>().as_mut() };
    target.copy_assign(source)
}

/// Calls [`Alternative::move_assign`] on the values at `dst` and `src`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `dst` and `src` point to distinct live values of type `T`
/// 2. Neither `dst` nor `src` is aliased
unsafe fn move_assign<T: Alternative>(
    dst: NonNull<Erased>,
    src: NonNull<Erased>,
) -> Result<(), ConstructionError> {
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    let source: &mut T = unsafe { src.cast::<T>().as_mut() };
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    let target: &mut T = unsafe { dst.cast::<T>().as_mut() };
    target.move_assign(source)
}
