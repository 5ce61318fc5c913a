#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`oneof`].
//!
//! # Overview
//!
//! This crate contains the low-level storage and the unsafe operations that
//! power the [`oneof`] tagged union. It provides raw, alignment-correct
//! storage for one of a fixed list of alternatives, the per-alternative
//! vtables that act as jump tables for destruction, copying and moving, and
//! the compile-time capability classifier.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`oneof`] crate, not
//! this one.
//!
//! # Architecture
//!
//! - **[`capabilities`]**: The capability classifier
//!   - [`Policy`]: Deleted / trivial / non-trivial state of one operation
//!   - [`Capabilities`]: The five special-operation policies of a type
//!   - [`Alternative`]: Declares the policies and fallible operations of a type
//!   - [`ConstructionError`]: Failure of a construction or assignment
//!
//! - **[`list`]**: Alternative lists, implemented for tuples of up to eight
//!   types
//!   - [`AlternativeList`]: Storage union and drop vtables
//!   - [`Classified`]: Aggregated capabilities and lifecycle vtables
//!   - [`At`], [`Member`], [`Convertible`]: Index and type resolution
//!   - [`Dispatch`], [`DispatchMut`], [`ForEach`], [`ForEachPair`]:
//!     Discriminant-driven dispatch into generic continuations
//!
//! - **[`arena`]**: The storage arena
//!   - [`RawArena`]: Storage plus discriminant, with the invariant that the
//!     discriminant names a live alternative or is [`VARIANT_NPOS`]
//!   - [`AlternativeVtable`] / [`LifecycleVtable`]: Function pointers for
//!     type-erased dispatch on the live alternative
//!
//! # Safety Strategy
//!
//! The arena stores alternatives in a `#[repr(C)]` union behind a plain
//! `usize` discriminant. Every unsafe access depends on the discriminant
//! naming the type that actually lives in the storage. This crate maintains
//! that through:
//!
//! - **Module-based encapsulation**: [`RawArena`] keeps its fields private,
//!   so the discriminant can only change together with the storage
//! - **Valueless-first mutation**: every operation that replaces the live
//!   alternative marks the arena valueless before running user code, so a
//!   failure or a panic never leaves a stale discriminant behind
//! - **Documented vtable contracts**: Each vtable method specifies exactly
//!   when it can be safely called
//!
//! [`oneof`]: https://docs.rs/oneof/latest/oneof/
//! [`Policy`]: capabilities::Policy
//! [`Capabilities`]: capabilities::Capabilities
//! [`Alternative`]: capabilities::Alternative
//! [`ConstructionError`]: capabilities::ConstructionError
//! [`AlternativeList`]: list::AlternativeList
//! [`Classified`]: list::Classified
//! [`At`]: list::At
//! [`Member`]: list::Member
//! [`Convertible`]: list::Convertible
//! [`Dispatch`]: list::Dispatch
//! [`DispatchMut`]: list::DispatchMut
//! [`ForEach`]: list::ForEach
//! [`ForEachPair`]: list::ForEachPair

extern crate alloc;

pub mod arena;
mod builtin;
pub mod capabilities;
pub mod list;
mod util;

pub use arena::{AlternativeVtable, LifecycleVtable, RawArena, VARIANT_NPOS};
pub use util::Erased;
