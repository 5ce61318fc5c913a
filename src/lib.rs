#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A tagged union over a fixed list of types, with compile-time lifecycle
//! policies, exception-safe assignment and multi-variant visitation.
//!
//! ## Overview
//!
//! A [`Variant<L>`] holds exactly one value whose type is one of the
//! alternatives of the list `L`, written as a tuple:
//!
//! ```
//! use oneof::prelude::*;
//!
//! let mut value: Variant<(i32, String)> = Variant::new(7_i32);
//! assert_eq!(value.index(), 0);
//! assert_eq!(value.get::<i32, _>(), Ok(&7));
//!
//! value.emplace(String::from("seven"));
//! assert!(value.holds_alternative::<String, _>());
//! assert!(value.get::<i32, _>().is_err());
//! ```
//!
//! The trailing `_` in the type-based APIs is a marker that the compiler
//! infers; it is what makes a type name resolve to the index of the
//! alternative. Lists that repeat a type can only be accessed by index:
//!
//! ```
//! use oneof::prelude::*;
//!
//! let pair: Variant<(u8, u8)> = Variant::from_index::<1>(3);
//! assert_eq!(pair.index(), 1);
//! assert_eq!(pair.get_at::<1>(), Ok(&3));
//! ```
//!
//! ## Lifecycle policies
//!
//! Every alternative declares, through the [`Alternative`] trait, whether
//! each of its special operations (copy and move construction, copy and move
//! assignment) is deleted, trivial, or non-trivial, and whether its copy and
//! move constructions can fail. The container folds these declarations into
//! its own [`CAPABILITIES`](Variant::CAPABILITIES) at compile time:
//!
//! - an operation is **deleted** if any alternative deletes it, and using it
//!   is a compile-time error;
//! - it is **trivial** if every alternative makes it trivial, in which case
//!   the container copies its storage bitwise;
//! - it is **non-trivial** otherwise, and dispatches to the alternative's own
//!   implementation.
//!
//! Built-in scalars, `String`, `Vec<T>`, `Option<T>` and `Box<T>` are already
//! classified. The [`trivial_alternative!`] and [`clone_alternative!`] macros
//! classify user types that are `Copy` or `Clone`.
//!
//! ## Failures and the valueless state
//!
//! Fallible operations return a [`ConstructionError`]. A container whose
//! alternative is replaced by a construction that fails (or panics) ends up
//! *valueless*: it holds nothing, reports [`VARIANT_NPOS`] as its index, and
//! refuses to be visited until a new value is emplaced. Copy assignment uses
//! a temporary copy when that lets it keep the old value on failure; see
//! [`Variant::try_clone_from`].
//!
//! Valueless transitions can be observed process-wide by installing a
//! [`ValuelessHook`](hooks::ValuelessHook) through the [`hooks`] module. The
//! `oneof-tracing` crate provides a hook that forwards them to `tracing`.
//!
//! ## Visitation
//!
//! [`visit`] dispatches a [`Visitor`] on the live alternatives of up to four
//! containers at once, with one jump per container:
//!
//! ```
//! use oneof::prelude::*;
//!
//! struct Sum;
//!
//! impl<A: Copy + Into<f64>, B: Copy + Into<f64>> Visitor<(&A, &B)> for Sum {
//!     type Output = f64;
//!
//!     fn visit(self, (a, b): (&A, &B)) -> f64 {
//!         (*a).into() + (*b).into()
//!     }
//! }
//!
//! let a: Variant<(u8, f32)> = Variant::new(2_u8);
//! let b: Variant<(u8, f32)> = Variant::new(0.5_f32);
//! assert_eq!(visit(Sum, (&a, &b)), Ok(2.5));
//! ```
//!
//! For implementation details, see the [`oneof-internals`] crate.
//!
//! [`oneof-internals`]: oneof_internals
//!
//! ## Features
//!
//! - `std`: Use the standard library's `RwLock` for the hook registry. Without
//!   it, the crate is `no_std` (it requires `alloc`) and uses a spin lock.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod hooks;
pub mod markers;
pub mod prelude;
mod variant;
pub mod visit;

mod compare;

pub use oneof_internals::{
    VARIANT_NPOS,
    capabilities::{Alternative, Capabilities, ConstructionError, Operation, Policy},
    clone_alternative,
    list::{Alt, AlternativeList, Classified},
    trivial_alternative,
};

pub use self::{
    compare::{CmpOp, DebugOp, EqOp, EqWitness, HashOp, PartialCmpOp},
    variant::Variant,
    visit::{Visitor, visit},
};
