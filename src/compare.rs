//! Comparison, hashing and formatting of containers.
//!
//! Each trait is implemented for [`Variant<L>`] when every alternative of `L`
//! implements it. The operations are dispatched on the live alternative with
//! the [`UnaryOp`] / [`BinaryOp`] types defined here, which appear in the
//! bounds of the impls but are not meant to be used directly.
//!
//! Containers holding different alternatives compare by index, and a
//! valueless container compares less than any container holding a value.

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use oneof_internals::list::{AlternativeList, BinaryOp, ForEach, ForEachPair, UnaryOp};

use crate::Variant;

/// Equality of two alternatives of the same type.
#[derive(Clone, Copy, Debug)]
pub struct EqOp;

impl<T: PartialEq> BinaryOp<T> for EqOp {
    type Output = bool;

    #[inline]
    fn apply(&mut self, lhs: &T, rhs: &T) -> bool {
        lhs == rhs
    }
}

/// Witnesses that every alternative implements [`Eq`].
#[derive(Clone, Copy, Debug)]
pub struct EqWitness;

impl<T: Eq> BinaryOp<T> for EqWitness {
    type Output = bool;

    #[inline]
    fn apply(&mut self, lhs: &T, rhs: &T) -> bool {
        lhs == rhs
    }
}

/// Partial ordering of two alternatives of the same type.
#[derive(Clone, Copy, Debug)]
pub struct PartialCmpOp;

impl<T: PartialOrd> BinaryOp<T> for PartialCmpOp {
    type Output = Option<Ordering>;

    #[inline]
    fn apply(&mut self, lhs: &T, rhs: &T) -> Option<Ordering> {
        lhs.partial_cmp(rhs)
    }
}

/// Total ordering of two alternatives of the same type.
#[derive(Clone, Copy, Debug)]
pub struct CmpOp;

impl<T: Ord> BinaryOp<T> for CmpOp {
    type Output = Ordering;

    #[inline]
    fn apply(&mut self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Feeds an alternative into a hasher.
pub struct HashOp<'h> {
    state: &'h mut dyn Hasher,
}

impl fmt::Debug for HashOp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashOp").finish_non_exhaustive()
    }
}

impl<T: Hash> UnaryOp<T> for HashOp<'_> {
    type Output = ();

    #[inline]
    fn apply(&mut self, value: &T) {
        value.hash(&mut self.state);
    }
}

/// Formats an alternative with its [`Debug`](fmt::Debug) impl.
pub struct DebugOp<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl fmt::Debug for DebugOp<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugOp").finish_non_exhaustive()
    }
}

impl<T: fmt::Debug> UnaryOp<T> for DebugOp<'_, '_> {
    type Output = fmt::Result;

    #[inline]
    fn apply(&mut self, value: &T) -> fmt::Result {
        fmt::Debug::fmt(value, self.f)
    }
}

impl<L: AlternativeList> Variant<L> {
    /// Applies `op` to the live alternatives of `self` and `other`, which must
    /// hold the same one.
    fn apply_pair<Op>(&self, other: &Self, mut op: Op) -> <L as ForEachPair<Op>>::Output
    where
        L: ForEachPair<Op>,
    {
        debug_assert!(!self.valueless_by_exception());
        debug_assert_eq!(self.index(), other.index());
        // SAFETY:
        // 1. The caller checked that `self` is not valueless, so its index is
        //    below `LEN`
        // 2. Both containers hold the alternative at that index
        unsafe {
            L::apply_pair_at(
                self.arena.index(),
                self.arena.as_ptr(),
                other.arena.as_ptr(),
                &mut op,
            )
        }
    }

    /// Orders two containers that do not hold the same alternative, or
    /// returns `None` if they do.
    fn cmp_discriminants(&self, other: &Self) -> Option<Ordering> {
        match (self.arena.live_index(), other.arena.live_index()) {
            (None, None) => Some(Ordering::Equal),
            (None, Some(_)) => Some(Ordering::Less),
            (Some(_), None) => Some(Ordering::Greater),
            (Some(lhs), Some(rhs)) if lhs != rhs => Some(lhs.cmp(&rhs)),
            (Some(_), Some(_)) => None,
        }
    }
}

impl<L> PartialEq for Variant<L>
where
    L: AlternativeList + ForEachPair<EqOp, Output = bool>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.index() != other.index() {
            return false;
        }
        if self.valueless_by_exception() {
            return true;
        }
        self.apply_pair(other, EqOp)
    }
}

impl<L> Eq for Variant<L> where
    L: AlternativeList + ForEachPair<EqOp, Output = bool> + ForEachPair<EqWitness, Output = bool>
{
}

impl<L> PartialOrd for Variant<L>
where
    L: AlternativeList
        + ForEachPair<EqOp, Output = bool>
        + ForEachPair<PartialCmpOp, Output = Option<Ordering>>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.cmp_discriminants(other) {
            Some(ordering) => Some(ordering),
            None => self.apply_pair(other, PartialCmpOp),
        }
    }
}

impl<L> Ord for Variant<L>
where
    L: AlternativeList
        + ForEachPair<EqOp, Output = bool>
        + ForEachPair<EqWitness, Output = bool>
        + ForEachPair<PartialCmpOp, Output = Option<Ordering>>
        + ForEachPair<CmpOp, Output = Ordering>,
{
    fn cmp(&self, other: &Self) -> Ordering {
        match self.cmp_discriminants(other) {
            Some(ordering) => ordering,
            None => self.apply_pair(other, CmpOp),
        }
    }
}

impl<L> Hash for Variant<L>
where
    L: AlternativeList + for<'h> ForEach<HashOp<'h>, Output = ()>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index().hash(state);
        if self.valueless_by_exception() {
            return;
        }
        let mut op = HashOp { state };
        // SAFETY:
        // 1. `self` is not valueless, so its index is below `LEN`
        // 2. The storage holds the alternative at that index
        unsafe { L::apply_at(self.arena.index(), self.arena.as_ptr(), &mut op) }
    }
}

impl<L> fmt::Debug for Variant<L>
where
    L: AlternativeList + for<'a, 'b> ForEach<DebugOp<'a, 'b>, Output = fmt::Result>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valueless_by_exception() {
            return f.write_str("Variant(<valueless>)");
        }
        write!(f, "Variant({}: ", self.index())?;
        let mut op = DebugOp { f: &mut *f };
        // SAFETY:
        // 1. `self` is not valueless, so its index is below `LEN`
        // 2. The storage holds the alternative at that index
        unsafe { L::apply_at(self.arena.index(), self.arena.as_ptr(), &mut op) }?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec::Vec};

    use super::*;

    /// Records every byte written to it.
    #[derive(Default)]
    struct Recorder(Vec<u8>);

    impl Hasher for Recorder {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, bytes: &[u8]) {
            self.0.extend_from_slice(bytes);
        }
    }

    fn record<T: Hash>(value: &T) -> Vec<u8> {
        let mut recorder = Recorder::default();
        value.hash(&mut recorder);
        recorder.0
    }

    type Value = Variant<(i32, String)>;

    fn valueless() -> Value {
        let mut value = Value::new(0_i32);
        let _ = value.try_emplace_with::<String, _, _, _>(|| Err("fail"));
        value
    }

    #[test]
    fn test_eq() {
        assert_eq!(Value::new(1_i32), Value::new(1_i32));
        assert_ne!(Value::new(1_i32), Value::new(2_i32));
        assert_ne!(Value::new(1_i32), Value::new(String::from("1")));
        assert_eq!(valueless(), valueless());
        assert_ne!(valueless(), Value::new(0_i32));
    }

    #[test]
    fn test_ordering() {
        assert!(Value::new(5_i32) < Value::new(String::new()));
        assert!(Value::new(1_i32) < Value::new(2_i32));
        assert!(valueless() < Value::new(i32::MIN));
        assert_eq!(
            Value::new(String::from("b")).cmp(&Value::new(String::from("a"))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_partial_ordering_of_nan() {
        let nan: Variant<(f64, u8)> = Variant::new(f64::NAN);
        assert_eq!(nan.partial_cmp(&nan), None);
        assert_ne!(nan, nan);
    }

    #[test]
    fn test_hash_includes_index() {
        let left: Variant<(u8, u8)> = Variant::from_index::<0>(1);
        let right: Variant<(u8, u8)> = Variant::from_index::<1>(1);
        assert_ne!(record(&left), record(&right));
        assert_eq!(record(&left), record(&left.clone()));
        assert_eq!(record(&valueless()), record(&usize::MAX));
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Value::new(String::from("x"))), "Variant(1: \"x\")");
        assert_eq!(format!("{:?}", valueless()), "Variant(<valueless>)");
    }
}
