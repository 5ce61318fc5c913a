#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
//! Tracing integration for the valueless transitions of [`oneof`] containers.
//!
//! A container becomes valueless when the construction of a new alternative
//! fails. [`TracingHook`] turns each such transition into a `tracing` event on
//! the `oneof` target, so that they show up next to the rest of your
//! application's logs.
//!
//! # Quick Start
//!
//! ```
//! use oneof::Variant;
//!
//! // Route valueless transitions into tracing.
//! oneof_tracing::install().expect("failed to install hooks");
//!
//! let mut value: Variant<(u8, String)> = Variant::new(1_u8);
//! let _ = value.try_emplace_with::<String, _, _, _>(|| Err("allocation refused"));
//! // emits: WARN oneof: variant became valueless operation=in-place construction ...
//! ```
//!
//! The emitted event has these fields:
//!
//! - `operation`: the failed operation, such as `copy construction`
//! - `alternative`: the type name of the alternative being constructed
//! - `index`: the index of that alternative
//! - `error`: the error that caused the failure

use oneof::hooks::{Hooks, HooksAlreadyInstalledError, ValuelessEvent, ValuelessHook};
use tracing::Level;

/// A [`ValuelessHook`] that emits a `tracing` event for every valueless
/// transition.
///
/// Events are emitted at [`Level::WARN`] by default.
///
/// # Examples
///
/// ```
/// use oneof::hooks::Hooks;
/// use oneof_tracing::TracingHook;
/// use tracing::Level;
///
/// Hooks::new()
///     .valueless_hook(TracingHook::new().with_level(Level::ERROR))
///     .install()
///     .expect("failed to install hooks");
/// ```
#[derive(Copy, Clone, Debug)]
pub struct TracingHook {
    level: Level,
}

impl TracingHook {
    /// Creates a hook that emits events at [`Level::WARN`].
    pub const fn new() -> Self {
        Self { level: Level::WARN }
    }

    /// Sets the level of the emitted events.
    pub const fn with_level(self, level: Level) -> Self {
        Self { level }
    }

    /// The level of the emitted events.
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingHook {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! emit {
    ($level:expr, $event:expr) => {
        tracing::event!(
            target: "oneof",
            $level,
            operation = %$event.operation(),
            alternative = $event.alternative(),
            index = $event.index(),
            error = %$event.error(),
            "variant became valueless"
        )
    };
}

impl ValuelessHook for TracingHook {
    fn on_valueless(&self, event: &ValuelessEvent<'_>) {
        // `event!` needs a constant level.
        if self.level == Level::TRACE {
            emit!(Level::TRACE, event);
        } else if self.level == Level::DEBUG {
            emit!(Level::DEBUG, event);
        } else if self.level == Level::INFO {
            emit!(Level::INFO, event);
        } else if self.level == Level::WARN {
            emit!(Level::WARN, event);
        } else {
            emit!(Level::ERROR, event);
        }
    }
}

/// Installs a [`TracingHook`] with the default level as the only hook.
///
/// # Errors
///
/// Returns [`HooksAlreadyInstalledError`] if hooks are already installed.
pub fn install() -> Result<(), HooksAlreadyInstalledError> {
    Hooks::new().valueless_hook(TracingHook::new()).install()
}
