//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use oneof::prelude::*;
//!
//! let value: Variant<(Monostate, String)> = Variant::new(String::from("ready"));
//! assert!(value.holds_alternative::<String, _>());
//! ```
//!
//! # What's Included
//!
//! - **[`Variant`]**: The container itself
//! - **[`visit()`]** and **[`Visitor`]**: Multi-container visitation
//! - **[`Alternative`]**, **[`Policy`]** and **[`Capabilities`]**: Lifecycle
//!   classification, with the [`trivial_alternative!`] and
//!   [`clone_alternative!`] macros for user types
//! - **[`ConstructionError`]**, **[`BadVariantAccess`]** and
//!   **[`ValuelessVisit`]**: The errors returned by fallible operations
//! - **[`Monostate`]** and **[`Alt`]**: Unit alternative and alternative lookup
//!   by index
//! - **[`VARIANT_NPOS`]**: The index reported by valueless containers

pub use crate::{
    Alt, Alternative, Capabilities, ConstructionError, Policy, VARIANT_NPOS, Variant,
    clone_alternative,
    error::{BadVariantAccess, ValuelessVisit},
    markers::Monostate,
    trivial_alternative,
    visit::{Visitor, visit},
};
