//! Integration tests for the oneof-internals crate.
//!
//! This suite exercises the storage arena through its public API only:
//!
//! ## Arena Tests
//! - `test_arena_replaces_alternatives`: emplacing over every index of a list
//! - `test_arena_drop_accounting`: live instance counts across replacements
//! - `test_arena_panicking_construction`: a panic during construction leaves
//!   the arena valueless
//!
//! ## Lifecycle Tests
//! - `test_copy_assign_protocol_paths`: direct and side-copy paths of copy
//!   assignment
//! - `test_move_assign_same_alternative`: in-place move assignment
//! - `test_trivial_fast_path_copies_every_byte`: whole-storage copy of
//!   trivial lists
//!
//! ## Dispatch Tests
//! - `test_dispatch_into_continuation`: shared and mutable dispatch
//! - `test_for_each_pair`: pairwise dispatch on equal indices
//!
//! ## Classification Tests
//! - `test_classified_capabilities`: aggregate policies of mixed lists

use std::{
    cell::Cell,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

use oneof_internals::{
    RawArena, VARIANT_NPOS,
    capabilities::{Alternative, Capabilities, ConstructionError, Operation, Policy},
    list::{AlternativeList, BinaryOp, Classified, DispatchMut, ForEachPair, Resume},
    trivial_alternative,
};
use static_assertions::{assert_impl_all, assert_not_impl_any, const_assert, const_assert_eq};

assert_impl_all!(RawArena<(u8, String)>: Send, Sync);
assert_not_impl_any!(RawArena<(u8, Rc<u8>)>: Send, Sync);
assert_impl_all!((u8, String, Vec<u8>): Classified);

const_assert_eq!(<(u8, u16, u32) as AlternativeList>::LEN, 3);
const_assert!(!<(u8, u16) as AlternativeList>::NEEDS_DROP);
const_assert!(<(u8, u16) as Classified>::CAPABILITIES.copy_construct.is_trivial());
const_assert!(!<(u8, Box<u8>) as Classified>::CAPABILITIES.move_construct.is_trivial());

/// An alternative that counts its live instances and can be told to fail.
struct Tracked {
    live: Rc<Cell<isize>>,
    fail_copy: bool,
    value: u32,
}

impl Tracked {
    fn new(live: &Rc<Cell<isize>>, value: u32) -> Self {
        live.set(live.get() + 1);
        Self {
            live: live.clone(),
            fail_copy: false,
            value,
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

// SAFETY: No operation is declared trivial.
unsafe impl Alternative for Tracked {
    const COPY_CONSTRUCT: Policy = Policy::NonTrivial;
    const MOVE_CONSTRUCT: Policy = Policy::NonTrivial;
    const COPY_ASSIGN: Policy = Policy::NonTrivial;
    const MOVE_ASSIGN: Policy = Policy::NonTrivial;
    const MOVE_CONSTRUCT_NOFAIL: bool = true;

    fn copy_construct(&self) -> Result<Self, ConstructionError> {
        if self.fail_copy {
            return Err(ConstructionError::new::<Self>(Operation::CopyConstruct).with_reason("told to fail"));
        }
        Ok(Tracked::new(&self.live, self.value))
    }

    fn move_construct(&mut self) -> Result<Self, ConstructionError> {
        let value = std::mem::take(&mut self.value);
        Ok(Tracked::new(&self.live, value))
    }

    fn copy_assign(&mut self, source: &Self) -> Result<(), ConstructionError> {
        if source.fail_copy {
            return Err(ConstructionError::new::<Self>(Operation::CopyAssign));
        }
        self.value = source.value;
        Ok(())
    }

    fn move_assign(&mut self, source: &mut Self) -> Result<(), ConstructionError> {
        self.value = std::mem::take(&mut source.value);
        Ok(())
    }
}

#[test]
fn test_arena_replaces_alternatives() {
    let mut arena = RawArena::<(u8, String, Vec<u16>)>::valueless();
    assert_eq!(arena.index(), VARIANT_NPOS);

    arena.emplace_with::<0, _>(|| 1);
    assert_eq!(arena.index(), 0);
    arena.emplace_with::<1, _>(|| "two".to_owned());
    assert_eq!(arena.index(), 1);
    arena.emplace_with::<2, _>(|| vec![3]).push(4);
    assert_eq!(arena.get::<2>(), Some(&vec![3, 4]));
    assert_eq!(arena.get::<1>(), None);
}

#[test]
fn test_arena_drop_accounting() {
    let live = Rc::new(Cell::new(0));
    {
        let mut arena = RawArena::<(Tracked, u8)>::valueless();
        arena.emplace_with::<0, _>(|| Tracked::new(&live, 1));
        assert_eq!(live.get(), 1);

        let copy = arena.try_clone().unwrap();
        assert_eq!(live.get(), 2);
        drop(copy);
        assert_eq!(live.get(), 1);

        arena.emplace_with::<1, _>(|| 0);
        assert_eq!(live.get(), 0);

        arena.emplace_with::<0, _>(|| Tracked::new(&live, 2));
        assert_eq!(live.get(), 1);
    }
    assert_eq!(live.get(), 0);
}

#[test]
fn test_arena_panicking_construction() {
    let live = Rc::new(Cell::new(0));
    let mut arena = RawArena::<(Tracked, String)>::valueless();
    arena.emplace_with::<0, _>(|| Tracked::new(&live, 1));

    let result = catch_unwind(AssertUnwindSafe(|| {
        arena.emplace_with::<1, _>(|| panic!("construction panicked"));
    }));
    assert!(result.is_err());
    assert!(arena.is_valueless());
    assert_eq!(live.get(), 0);
}

#[test]
fn test_copy_assign_protocol_paths() {
    let live = Rc::new(Cell::new(0));

    // `Tracked` copies may fail while its moves cannot: switching to it goes
    // through a side copy, so a failed copy leaves the target untouched.
    let mut target = RawArena::<(String, Tracked)>::valueless();
    target.emplace_with::<0, _>(|| "unchanged".to_owned());
    let mut source = RawArena::<(String, Tracked)>::valueless();
    source.emplace_with::<1, _>(|| Tracked::new(&live, 5)).fail_copy = true;

    let error = target.copy_assign_from(&source).unwrap_err();
    assert_eq!(error.operation(), Operation::CopyConstruct);
    assert_eq!(error.reason(), Some("told to fail"));
    assert_eq!(target.get::<0>().map(String::as_str), Some("unchanged"));
    assert_eq!(live.get(), 1);

    // Once the copy succeeds the target switches alternative, and the side
    // copy is released.
    source.get_mut::<1>().unwrap().fail_copy = false;
    target.copy_assign_from(&source).unwrap();
    assert_eq!(target.get::<1>().map(|t| t.value), Some(5));
    assert_eq!(live.get(), 2);

    // `String` copies never fail: switching back is direct.
    let mut strings = RawArena::<(String, Tracked)>::valueless();
    strings.emplace_with::<0, _>(|| "back".to_owned());
    target.copy_assign_from(&strings).unwrap();
    assert_eq!(target.get::<0>().map(String::as_str), Some("back"));
    assert_eq!(live.get(), 1);
}

#[test]
fn test_move_assign_same_alternative() {
    let live = Rc::new(Cell::new(0));
    let mut target = RawArena::<(u8, Tracked)>::valueless();
    target.emplace_with::<1, _>(|| Tracked::new(&live, 1));
    let mut source = RawArena::<(u8, Tracked)>::valueless();
    source.emplace_with::<1, _>(|| Tracked::new(&live, 2));

    target.move_assign_from(&mut source).unwrap();
    assert_eq!(target.get::<1>().map(|t| t.value), Some(2));
    assert_eq!(source.get::<1>().map(|t| t.value), Some(0));
    assert_eq!(live.get(), 2);
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Quad([u64; 4]);
trivial_alternative!(Quad);

#[test]
fn test_trivial_fast_path_copies_every_byte() {
    let mut source = RawArena::<(u8, Quad)>::valueless();
    source.emplace_with::<1, _>(|| Quad([1, 2, 3, u64::MAX]));
    let mut target = RawArena::<(u8, Quad)>::valueless();
    target.emplace_with::<0, _>(|| 0);

    target.copy_assign_from(&source).unwrap();
    assert_eq!(target.get::<1>(), Some(&Quad([1, 2, 3, u64::MAX])));
}

struct Describe;

impl Resume<&mut u8> for Describe {
    type Output = String;

    fn resume(self, value: &mut u8) -> String {
        *value += 1;
        format!("u8 {value}")
    }
}

impl Resume<&mut String> for Describe {
    type Output = String;

    fn resume(self, value: &mut String) -> String {
        value.push('!');
        format!("string {value}")
    }
}

#[test]
fn test_dispatch_into_continuation() {
    let mut arena = RawArena::<(u8, String)>::valueless();
    arena.emplace_with::<1, _>(|| "hi".to_owned());
    let index = arena.index();
    let storage = arena.as_mut_ptr();
    // SAFETY: The arena holds a live alternative at `index` and is exclusively
    // borrowed for the duration of the call.
    let described = unsafe { <(u8, String) as DispatchMut<'_, Describe>>::dispatch_mut(index, storage, Describe) };
    assert_eq!(described, "string hi!");
    assert_eq!(arena.get::<1>().map(String::as_str), Some("hi!"));
}

struct Same;

impl<T: PartialEq> BinaryOp<T> for Same {
    type Output = bool;

    fn apply(&mut self, lhs: &T, rhs: &T) -> bool {
        lhs == rhs
    }
}

#[test]
fn test_for_each_pair() {
    let mut lhs = RawArena::<(u8, String)>::valueless();
    lhs.emplace_with::<1, _>(|| "same".to_owned());
    let rhs = lhs.try_clone().unwrap();
    // SAFETY: Both arenas hold a live `String` at index 1.
    let same = unsafe { <(u8, String) as ForEachPair<Same>>::apply_pair_at(1, lhs.as_ptr(), rhs.as_ptr(), &mut Same) };
    assert!(same);
}

#[test]
fn test_classified_capabilities() {
    let capabilities = <(u8, String, Box<u32>) as Classified>::CAPABILITIES;
    assert_eq!(capabilities.copy_construct, Policy::NonTrivial);
    assert_eq!(capabilities.move_construct, Policy::NonTrivial);
    assert_eq!(capabilities.destroy, Policy::NonTrivial);
    assert_eq!(
        <(u8, char, ()) as Classified>::CAPABILITIES,
        Capabilities::TRIVIAL
    );

    let lifecycle = <(u8, String, Box<u32>) as Classified>::LIFECYCLE;
    assert!(lifecycle.iter().all(|vtable| vtable.copy_construct_nofail()));
}
