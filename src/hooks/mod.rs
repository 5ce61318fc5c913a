//! Process-wide hooks for observing containers that become valueless.
//!
//! # Quick Start
//!
//! ```rust
//! use oneof::hooks::{Hooks, ValuelessEvent};
//!
//! Hooks::new()
//!     .valueless_hook(|event: &ValuelessEvent<'_>| {
//!         eprintln!("variant lost its value: {event}");
//!     })
//!     .install()
//!     .expect("failed to install hooks");
//! ```
//!
//! # When to Use Hooks
//!
//! A container only becomes valueless when constructing a new alternative
//! fails. The fallible methods report that failure to the caller, but the
//! infallible ones ([`Clone::clone`], [`Clone::clone_from`]) have no way to do
//! so. Hooks see every such transition, whichever method caused it, which
//! makes them the place to log or count them.
//!
//! The `oneof-tracing` crate provides a ready-made hook that emits `tracing`
//! events.
//!
//! # Concurrency
//!
//! Hooks are stored behind a read-write lock: the standard library's with the
//! `std` feature, a spin lock without it. Hooks run while the read lock is
//! held, so a hook must not install or replace hooks itself.

mod hook_lock;

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use oneof_internals::capabilities::Operation;

use self::hook_lock::HookLock;

/// A hook that is called every time a container becomes valueless.
///
/// Implemented for every `Fn(&ValuelessEvent<'_>) + Send + Sync + 'static`.
///
/// # Examples
///
/// ```rust
/// use core::sync::atomic::{AtomicUsize, Ordering};
///
/// use oneof::hooks::{ValuelessEvent, ValuelessHook};
///
/// struct CountingHook(AtomicUsize);
///
/// impl ValuelessHook for CountingHook {
///     fn on_valueless(&self, _event: &ValuelessEvent<'_>) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait ValuelessHook: Send + Sync + 'static {
    /// Called after a container became valueless.
    fn on_valueless(&self, event: &ValuelessEvent<'_>);
}

impl<F> ValuelessHook for F
where
    F: Fn(&ValuelessEvent<'_>) + Send + Sync + 'static,
{
    fn on_valueless(&self, event: &ValuelessEvent<'_>) {
        self(event)
    }
}

/// Describes the failure that left a container valueless.
#[derive(Clone, Copy)]
pub struct ValuelessEvent<'a> {
    operation: Operation,
    alternative: &'static str,
    index: usize,
    error: &'a (dyn fmt::Display + 'a),
}

impl<'a> ValuelessEvent<'a> {
    pub(crate) fn new(
        operation: Operation,
        alternative: &'static str,
        index: usize,
        error: &'a (dyn fmt::Display + 'a),
    ) -> Self {
        Self {
            operation,
            alternative,
            index,
            error,
        }
    }

    /// The operation that failed.
    #[inline]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The type name of the alternative that failed to be constructed.
    #[inline]
    pub fn alternative(&self) -> &'static str {
        self.alternative
    }

    /// The index of the alternative that failed to be constructed.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The error that caused the failure.
    #[inline]
    pub fn error(&self) -> &'a (dyn fmt::Display + 'a) {
        self.error
    }
}

impl fmt::Debug for ValuelessEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuelessEvent")
            .field("operation", &self.operation)
            .field("alternative", &self.alternative)
            .field("index", &self.index)
            .field("error", &format_args!("{}", self.error))
            .finish()
    }
}

impl fmt::Display for ValuelessEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of alternative {} (`{}`) failed: {}",
            self.operation, self.index, self.alternative, self.error
        )
    }
}

/// Builder for configuring and installing hooks globally.
///
/// # Examples
///
/// ```rust
/// use oneof::hooks::{Hooks, ValuelessEvent};
///
/// let previous = Hooks::new()
///     .valueless_hook(|event: &ValuelessEvent<'_>| eprintln!("{event}"))
///     .replace();
/// assert!(previous.is_none());
///
/// let installed = Hooks::uninstall();
/// assert_eq!(installed.map(|hooks| hooks.len()), Some(1));
/// ```
pub struct Hooks(Box<HookData>);

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("valueless", &self.0.valueless.len())
            .finish()
    }
}

pub(crate) struct HookData {
    valueless: Vec<Box<dyn ValuelessHook>>,
}

/// Error returned when attempting to install hooks when they're already
/// installed.
///
/// Contains the hooks that were attempted to be installed, allowing you to
/// recover them if needed.
pub struct HooksAlreadyInstalledError(pub Hooks);

impl fmt::Debug for HooksAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HooksAlreadyInstalledError").finish()
    }
}

impl fmt::Display for HooksAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hooks are already installed globally")
    }
}

impl core::error::Error for HooksAlreadyInstalledError {}

static HOOKS: HookLock<Box<HookData>> = HookLock::new();

impl Hooks {
    /// Creates an empty `Hooks` builder.
    pub fn new() -> Self {
        Self(Box::new(HookData {
            valueless: Vec::new(),
        }))
    }

    /// Registers a hook that is called every time a container becomes
    /// valueless. Hooks are called in registration order.
    pub fn valueless_hook<H>(mut self, hook: H) -> Self
    where
        H: ValuelessHook,
    {
        self.0.valueless.push(Box::new(hook));
        self
    }

    /// The number of registered hooks.
    pub fn len(&self) -> usize {
        self.0.valueless.len()
    }

    /// Returns `true` if no hook is registered.
    pub fn is_empty(&self) -> bool {
        self.0.valueless.is_empty()
    }

    /// Installs the hooks globally.
    ///
    /// If hooks are already installed, returns an error
    /// [`HooksAlreadyInstalledError`], containing the hooks that were attempted
    /// to be installed.
    ///
    /// See also [`replace`](Self::replace) which will replace any existing
    /// hooks without erroring.
    pub fn install(self) -> Result<(), HooksAlreadyInstalledError> {
        let mut guard = HOOKS.write();
        let slot = guard.get();
        if slot.is_some() {
            return Err(HooksAlreadyInstalledError(self));
        }
        *slot = Some(self.0);
        Ok(())
    }

    /// Replaces the currently installed hooks with `self`.
    ///
    /// Returns the previously installed hooks, if any.
    pub fn replace(self) -> Option<Hooks> {
        HOOKS.write().get().replace(self.0).map(Hooks)
    }

    /// Removes the currently installed hooks and returns them, if any.
    pub fn uninstall() -> Option<Hooks> {
        HOOKS.write().get().take().map(Hooks)
    }
}

/// Calls every installed [`ValuelessHook`] with `event`.
pub(crate) fn notify_valueless(event: &ValuelessEvent<'_>) {
    let guard = HOOKS.read();
    if let Some(hooks) = guard.get() {
        for hook in &hooks.valueless {
            hook.on_valueless(event);
        }
    }
}
