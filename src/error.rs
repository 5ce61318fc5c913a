//! Error types returned by [`Variant`](crate::Variant) operations.
//!
//! - [`ConstructionError`]: an alternative failed to copy, move or assign
//!   itself
//! - [`BadVariantAccess`]: a getter asked for an alternative that is not live
//! - [`ValuelessVisit`]: [`visit`](crate::visit()) was given a valueless
//!   container
//!
//! [`HooksAlreadyInstalledError`](crate::hooks::HooksAlreadyInstalledError)
//! lives next to the hooks it concerns.

pub use oneof_internals::capabilities::ConstructionError;

/// Error returned when accessing an alternative that the container does not
/// hold.
///
/// # Examples
///
/// ```
/// use oneof::Variant;
///
/// let value: Variant<(u8, String)> = Variant::new(1_u8);
/// let error = value.get::<String, _>().unwrap_err();
/// assert_eq!(error.requested(), 1);
/// assert_eq!(error.held(), Some(0));
/// assert_eq!(
///     error.to_string(),
///     "bad variant access: requested alternative 1, but alternative 0 is held"
/// );
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct BadVariantAccess {
    /// The index that was requested.
    requested: usize,
    /// The index that was live, if any.
    held: Option<usize>,
}

impl BadVariantAccess {
    /// Creates the error for a request of alternative `requested` when `held`
    /// is live.
    pub(crate) const fn new(requested: usize, held: Option<usize>) -> Self {
        Self { requested, held }
    }

    /// The index of the alternative that was requested.
    #[inline]
    pub const fn requested(&self) -> usize {
        self.requested
    }

    /// The index of the live alternative, or `None` if the container was
    /// valueless.
    #[inline]
    pub const fn held(&self) -> Option<usize> {
        self.held
    }
}

impl core::fmt::Debug for BadVariantAccess {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BadVariantAccess")
            .field("requested", &self.requested)
            .field("held", &self.held)
            .finish()
    }
}

impl core::fmt::Display for BadVariantAccess {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.held {
            Some(held) => write!(
                f,
                "bad variant access: requested alternative {}, but alternative {held} is held",
                self.requested
            ),
            None => write!(
                f,
                "bad variant access: requested alternative {}, but the variant is valueless",
                self.requested
            ),
        }
    }
}

impl core::error::Error for BadVariantAccess {}

/// Error returned by [`visit`](crate::visit()) when one of the containers is
/// valueless.
///
/// The visitor is not called in that case.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ValuelessVisit {
    /// Position of the first valueless container in the visited tuple.
    position: usize,
}

impl ValuelessVisit {
    /// Creates the error for a valueless container at `position`.
    pub(crate) const fn new(position: usize) -> Self {
        Self { position }
    }

    /// The position of the first valueless container among the visited
    /// containers, starting at zero.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl core::fmt::Debug for ValuelessVisit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ValuelessVisit")
            .field("position", &self.position)
            .finish()
    }
}

impl core::fmt::Display for ValuelessVisit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "cannot visit: the variant at position {} is valueless",
            self.position
        )
    }
}

impl core::error::Error for ValuelessVisit {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_bad_variant_access_display() {
        let error = BadVariantAccess::new(2, None);
        assert_eq!(
            error.to_string(),
            "bad variant access: requested alternative 2, but the variant is valueless"
        );
    }

    #[test]
    fn test_valueless_visit_display() {
        let error = ValuelessVisit::new(1);
        assert_eq!(error.position(), 1);
        assert_eq!(
            error.to_string(),
            "cannot visit: the variant at position 1 is valueless"
        );
    }
}
