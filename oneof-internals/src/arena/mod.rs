//! Module containing the storage arena of a tagged union.

mod raw;
mod vtable;

pub use self::{
    raw::{RawArena, VARIANT_NPOS},
    vtable::{AlternativeVtable, LifecycleVtable},
};
