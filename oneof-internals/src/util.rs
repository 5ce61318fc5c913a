//! Internal utility types.

/// Marker type used when the type of the live alternative has been erased.
///
/// This zero-sized type serves as the pointee of storage pointers such as
/// `NonNull<Erased>` when the concrete alternative is only known through the
/// discriminant. Such pointers are always cast back to the concrete type
/// before they are dereferenced.
///
/// Using a distinct marker type (rather than `u8` or `()`) makes the intent
/// clearer in signatures and error messages.
#[derive(Clone, Copy, Debug)]
pub struct Erased {
    /// Prevents construction outside of this crate.
    _private: (),
}
