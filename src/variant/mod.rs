//! The [`Variant`] container: construction, inspection and replacement of
//! the live alternative.

mod access;
mod lifecycle;

use core::fmt;

use oneof_internals::{
    RawArena,
    capabilities::Operation,
    list::{Alt, AlternativeList, At, Convertible, Member},
};

use crate::hooks::{self, ValuelessEvent};

/// A tagged union holding exactly one value of one of the alternatives of the
/// list `L`.
///
/// `L` is a tuple of one to eight types, such as `(i32, String)`. The index
/// of the live alternative is returned by [`index`](Self::index). A container
/// whose construction of a new alternative failed is *valueless*: it holds no
/// value and [`index`](Self::index) returns [`VARIANT_NPOS`].
///
/// # Type-based and index-based access
///
/// Methods such as [`new`](Self::new), [`get`](Self::get) and
/// [`emplace`](Self::emplace) select the alternative by type. They take a
/// second, inferred marker parameter (`variant.get::<String, _>()`), and are
/// only available when the type occurs exactly once in the list. The `_at`
/// methods select by index and are always available.
///
/// # Examples
///
/// ```
/// use oneof::Variant;
///
/// let mut value: Variant<(u32, String)> = Variant::default();
/// assert_eq!(value.get::<u32, _>(), Ok(&0));
///
/// *value.emplace(String::new()) += "text";
/// assert_eq!(value.index(), 1);
/// assert_eq!(value.get_at::<1>().map(String::as_str), Ok("text"));
/// ```
///
/// [`VARIANT_NPOS`]: crate::VARIANT_NPOS
pub struct Variant<L: AlternativeList> {
    /// Storage and discriminant of the live alternative.
    pub(crate) arena: RawArena<L>,
}

impl<L: AlternativeList> Variant<L> {
    /// The number of alternatives.
    pub const LEN: usize = L::LEN;

    /// Creates a valueless container.
    const fn valueless() -> Self {
        Self {
            arena: RawArena::valueless(),
        }
    }

    /// Creates a container holding `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(bool, char)> = Variant::new('x');
    /// assert_eq!(value.index(), 1);
    /// ```
    pub fn new<T, M>(value: T) -> Self
    where
        L: Member<T, M>,
    {
        let mut this = Self::valueless();
        this.emplace::<T, M>(value);
        this
    }

    /// Creates a container holding `value` as the alternative at index `I`.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(String, String)> = Variant::from_index::<1>("second".into());
    /// assert_eq!(value.index(), 1);
    /// ```
    pub fn from_index<const I: usize>(value: Alt<L, I>) -> Self
    where
        L: At<I>,
    {
        let mut this = Self::valueless();
        this.emplace_at::<I>(value);
        this
    }

    /// Creates a container by converting `value` into the unique alternative
    /// that has a lossless `From` conversion from `T`.
    ///
    /// The conversion is resolved at compile time. It is rejected if no
    /// alternative, or more than one, can be converted from `T`. Narrowing
    /// numeric conversions do not have `From` impls and therefore never
    /// participate.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// // `&str` converts into `String`, but not into `u64` or `bool`.
    /// let text: Variant<(u64, String, bool)> = Variant::convert("text");
    /// assert_eq!(text.index(), 1);
    ///
    /// // `u16` widens into `u64`.
    /// let number: Variant<(u64, String, bool)> = Variant::convert(7_u16);
    /// assert_eq!(number.index(), 0);
    /// ```
    pub fn convert<T, M>(value: T) -> Self
    where
        L: Convertible<T, M>,
    {
        let mut this = Self::valueless();
        this.set_converted::<T, M>(value);
        this
    }

    /// Creates a container holding the value returned by `f`, or returns the
    /// error of `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let parsed: Result<Variant<(u8, String)>, _> = Variant::try_new_with(|| "300".parse::<u8>());
    /// assert!(parsed.is_err());
    /// ```
    pub fn try_new_with<T, M, E, F>(f: F) -> Result<Self, E>
    where
        L: Member<T, M>,
        F: FnOnce() -> Result<T, E>,
    {
        let mut this = Self::valueless();
        // SAFETY:
        // 1. `Member<T, M>` guarantees that the alternative at `INDEX` is `T`
        unsafe { this.arena.try_emplace_unchecked(<L as Member<T, M>>::INDEX, f)? };
        Ok(this)
    }

    /// The index of the live alternative, or [`VARIANT_NPOS`] if the
    /// container is valueless.
    ///
    /// [`VARIANT_NPOS`]: crate::VARIANT_NPOS
    #[inline]
    pub const fn index(&self) -> usize {
        self.arena.index()
    }

    /// Returns `true` if a failed construction left the container without a
    /// value.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let mut value: Variant<(u8, String)> = Variant::new(1_u8);
    /// let failed = value.try_emplace_with(|| Err::<String, _>("unavailable"));
    /// assert_eq!(failed, Err("unavailable"));
    /// assert!(value.valueless_by_exception());
    /// ```
    #[inline]
    pub const fn valueless_by_exception(&self) -> bool {
        self.arena.is_valueless()
    }

    /// Replaces the contents with `value`, returning a reference to it.
    ///
    /// The old value is dropped first.
    pub fn emplace<T, M>(&mut self, value: T) -> &mut T
    where
        L: Member<T, M>,
    {
        self.emplace_with::<T, M, _>(|| value)
    }

    /// Replaces the contents with `value` as the alternative at index `I`,
    /// returning a reference to it.
    pub fn emplace_at<const I: usize>(&mut self, value: Alt<L, I>) -> &mut Alt<L, I>
    where
        L: At<I>,
    {
        self.arena.emplace_with::<I, _>(|| value)
    }

    /// Replaces the contents with the value returned by `f`, returning a
    /// reference to it.
    ///
    /// The old value is dropped before `f` runs. If `f` panics, the container
    /// is left valueless.
    pub fn emplace_with<T, M, F>(&mut self, f: F) -> &mut T
    where
        L: Member<T, M>,
        F: FnOnce() -> T,
    {
        // SAFETY:
        // 1. `Member<T, M>` guarantees that the alternative at `INDEX` is `T`
        unsafe { self.arena.emplace_unchecked(<L as Member<T, M>>::INDEX, f) }
    }

    /// Replaces the contents with the value returned by `f`, returning a
    /// reference to it, or returns the error of `f`.
    ///
    /// The old value is dropped before `f` runs, so a failure leaves the
    /// container valueless. The installed
    /// [`ValuelessHook`](crate::hooks::ValuelessHook) is notified of the
    /// failure.
    pub fn try_emplace_with<T, M, E, F>(&mut self, f: F) -> Result<&mut T, E>
    where
        L: Member<T, M>,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        let index = <L as Member<T, M>>::INDEX;
        // SAFETY:
        // 1. `Member<T, M>` guarantees that the alternative at `INDEX` is `T`
        let result = unsafe { self.arena.try_emplace_unchecked(index, f) };
        if let Err(error) = &result {
            hooks::notify_valueless(&ValuelessEvent::new(
                Operation::Emplace,
                core::any::type_name::<T>(),
                index,
                error,
            ));
        }
        result
    }

    /// Replaces the contents with `value`.
    ///
    /// If the container already holds a `T`, the value is assigned in place;
    /// otherwise the old alternative is dropped and `value` emplaced.
    pub fn set<T, M>(&mut self, value: T)
    where
        L: Member<T, M>,
    {
        match self.get_if_mut::<T, M>() {
            Some(slot) => *slot = value,
            None => {
                self.emplace::<T, M>(value);
            }
        }
    }

    /// Replaces the contents by converting `value` into the unique
    /// alternative that has a lossless `From` conversion from `T`.
    ///
    /// If the container already holds that alternative, the converted value
    /// is assigned in place; otherwise the old alternative is dropped and the
    /// converted value emplaced. The conversion runs before the old value is
    /// touched.
    pub fn set_converted<T, M>(&mut self, value: T)
    where
        L: Convertible<T, M>,
    {
        let index = <L as Convertible<T, M>>::INDEX;
        let converted = <L as Convertible<T, M>>::Target::from(value);
        if self.arena.index() == index {
            // SAFETY:
            // 1. The live alternative is at `INDEX`, which `Convertible<T, M>`
            //    guarantees to be `Target`
            let slot = unsafe { self.arena.get_unchecked_mut::<<L as Convertible<T, M>>::Target>() };
            *slot = converted;
        } else {
            // SAFETY:
            // 1. `Convertible<T, M>` guarantees that the alternative at `INDEX` is
            //    `Target`
            unsafe { self.arena.emplace_unchecked(index, || converted) };
        }
    }

    /// Exchanges the contents of two containers, including their
    /// discriminants. Never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let mut a: Variant<(u8, String)> = Variant::new(1_u8);
    /// let mut b: Variant<(u8, String)> = Variant::new(String::from("b"));
    /// a.swap(&mut b);
    /// assert_eq!(a.index(), 1);
    /// assert_eq!(b.get::<u8, _>(), Ok(&1));
    /// ```
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.arena, &mut other.arena);
    }

    /// Replaces the contents with the default value of the first alternative.
    ///
    /// This is the way back from the valueless state when no other value is
    /// at hand.
    pub fn reset(&mut self)
    where
        L: At<0>,
        Alt<L, 0>: Default,
    {
        self.arena.emplace_with::<0, _>(Default::default);
    }
}

impl<L> Default for Variant<L>
where
    L: At<0>,
    Alt<L, 0>: Default,
{
    /// Creates a container holding the default value of the first
    /// alternative.
    fn default() -> Self {
        Self::from_index::<0>(Default::default())
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use super::*;
    use crate::VARIANT_NPOS;

    type Value = Variant<(i32, String, Vec<u8>)>;

    #[test]
    fn test_default_holds_first_alternative() {
        let value = Value::default();
        assert_eq!(value.index(), 0);
        assert_eq!(value.get::<i32, _>(), Ok(&0));
        assert_eq!(Value::LEN, 3);
    }

    #[test]
    fn test_emplace_switches_alternative() {
        let mut value = Value::new(1_i32);
        value.emplace(vec![1, 2]).push(3);
        assert_eq!(value.index(), 2);
        assert_eq!(value.get::<Vec<u8>, _>().map(Vec::len), Ok(3));
    }

    #[test]
    fn test_failed_emplace_is_valueless() {
        let mut value = Value::new(String::from("before"));
        let result = value.try_emplace_with::<Vec<u8>, _, _, _>(|| Err("no memory"));
        assert_eq!(result, Err("no memory"));
        assert!(value.valueless_by_exception());
        assert_eq!(value.index(), VARIANT_NPOS);

        value.reset();
        assert_eq!(value.get::<i32, _>(), Ok(&0));
    }

    #[test]
    fn test_set_assigns_in_place() {
        let mut value = Value::new(String::from("a"));
        value.set(String::from("b"));
        assert_eq!(value.get::<String, _>().map(String::as_str), Ok("b"));
        value.set(5_i32);
        assert_eq!(value.get::<i32, _>(), Ok(&5));
    }

    #[test]
    fn test_set_converted_widens() {
        let mut value: Variant<(i64, String)> = Variant::convert(1_i32);
        assert_eq!(value.get::<i64, _>(), Ok(&1));
        value.set_converted('x');
        assert_eq!(value.get::<String, _>().map(String::as_str), Ok("x"));
        value.set_converted(2_u8);
        assert_eq!(value.get::<i64, _>(), Ok(&2));
    }

    #[test]
    fn test_try_new_with() {
        let ok: Result<Value, &str> = Variant::try_new_with(|| Ok(String::from("built")));
        assert_eq!(ok.map(|value| value.index()), Ok(1));
    }
}
