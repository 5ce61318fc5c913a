//! Visitation of the live alternatives of several containers at once.
//!
//! A [`Visitor`] receives a tuple with one reference per visited container,
//! in the order the containers were given. [`visit`] resolves the live
//! alternative of each container with one `match` on its discriminant, so the
//! cost grows with the number of containers, not with the number of
//! alternative combinations.
//!
//! Every combination of alternatives must be accepted by the visitor and
//! produce the same [`Visitor::Output`]; the trait solver rejects the call
//! otherwise.
//!
//! # Examples
//!
//! ```
//! use oneof::prelude::*;
//!
//! struct Grow;
//!
//! impl Visitor<(&mut u32,)> for Grow {
//!     type Output = ();
//!
//!     fn visit(self, (value,): (&mut u32,)) {
//!         *value += 1;
//!     }
//! }
//!
//! impl Visitor<(&mut String,)> for Grow {
//!     type Output = ();
//!
//!     fn visit(self, (value,): (&mut String,)) {
//!         value.push('!');
//!     }
//! }
//!
//! let mut value: Variant<(u32, String)> = Variant::new(String::from("hi"));
//! value.visit_mut(Grow).unwrap();
//! assert_eq!(value.get::<String, _>().map(String::as_str), Ok("hi!"));
//! ```

use oneof_internals::list::{AlternativeList, Dispatch, DispatchMut, Resume};

use crate::{Variant, error::ValuelessVisit};

/// An operation on the live alternatives of visited containers.
///
/// `Args` is a tuple of references to the live alternatives, such as
/// `(&A,)`, `(&A, &mut B)` or `()` when no container is visited.
pub trait Visitor<Args> {
    /// Result of the visit.
    type Output;

    /// Visits the live alternatives.
    fn visit(self, args: Args) -> Self::Output;
}

/// Appends an element to a tuple of up to three elements.
pub trait Append<X> {
    /// The tuple with `X` appended.
    type Output;

    /// Appends `value`.
    fn append(self, value: X) -> Self::Output;
}

impl<X> Append<X> for () {
    type Output = (X,);

    #[inline]
    fn append(self, value: X) -> (X,) {
        (value,)
    }
}

impl<A, X> Append<X> for (A,) {
    type Output = (A, X);

    #[inline]
    fn append(self, value: X) -> (A, X) {
        (self.0, value)
    }
}

impl<A, B, X> Append<X> for (A, B) {
    type Output = (A, B, X);

    #[inline]
    fn append(self, value: X) -> (A, B, X) {
        (self.0, self.1, value)
    }
}

impl<A, B, C, X> Append<X> for (A, B, C) {
    type Output = (A, B, C, X);

    #[inline]
    fn append(self, value: X) -> (A, B, C, X) {
        (self.0, self.1, self.2, value)
    }
}

/// A cons list of container references, `(C0, (C1, ()))`.
pub trait Containers {
    /// Returns the position of the first valueless container, counting from
    /// `position`.
    fn valueless_position(&self, position: usize) -> Option<usize>;
}

impl Containers for () {
    #[inline]
    fn valueless_position(&self, _position: usize) -> Option<usize> {
        None
    }
}

impl<L: AlternativeList, Tail: Containers> Containers for (&Variant<L>, Tail) {
    #[inline]
    fn valueless_position(&self, position: usize) -> Option<usize> {
        if self.0.valueless_by_exception() {
            Some(position)
        } else {
            self.1.valueless_position(position + 1)
        }
    }
}

impl<L: AlternativeList, Tail: Containers> Containers for (&mut Variant<L>, Tail) {
    #[inline]
    fn valueless_position(&self, position: usize) -> Option<usize> {
        if self.0.valueless_by_exception() {
            Some(position)
        } else {
            self.1.valueless_position(position + 1)
        }
    }
}

/// Containers that remain to be dispatched.
///
/// `Prefix` is the tuple of alternatives resolved so far.
pub trait Remaining<V, Prefix>: Containers {
    /// Result of the visit.
    type Output;

    /// Resolves the live alternative of every remaining container and calls
    /// `visitor` with `prefix` followed by those alternatives.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. No remaining container is valueless, that is
    ///    [`valueless_position`](Containers::valueless_position) returned
    ///    `None`
    unsafe fn peel(self, visitor: V, prefix: Prefix) -> Self::Output;
}

/// The continuation handed to the dispatch of one container: it appends the
/// resolved alternative to the prefix and moves on to the next container.
pub struct Peel<V, Prefix, Rest> {
    visitor: V,
    prefix: Prefix,
    /// # Safety
    ///
    /// 1. No container in `rest` is valueless
    rest: Rest,
}

impl<X, V, Prefix, Rest> Resume<X> for Peel<V, Prefix, Rest>
where
    Prefix: Append<X>,
    Rest: Remaining<V, <Prefix as Append<X>>::Output>,
{
    type Output = <Rest as Remaining<V, <Prefix as Append<X>>::Output>>::Output;

    #[inline]
    fn resume(self, value: X) -> Self::Output {
        let prefix = self.prefix.append(value);
        // SAFETY:
        // 1. Guaranteed by the invariant on `rest`
        unsafe { self.rest.peel(self.visitor, prefix) }
    }
}

impl<V, Prefix> Remaining<V, Prefix> for ()
where
    V: Visitor<Prefix>,
{
    type Output = V::Output;

    #[inline]
    unsafe fn peel(self, visitor: V, prefix: Prefix) -> V::Output {
        visitor.visit(prefix)
    }
}

impl<'a, V, Prefix, L, Tail> Remaining<V, Prefix> for (&'a Variant<L>, Tail)
where
    L: AlternativeList + Dispatch<'a, Peel<V, Prefix, Tail>>,
    Tail: Containers,
{
    type Output = <L as Dispatch<'a, Peel<V, Prefix, Tail>>>::Output;

    #[inline]
    unsafe fn peel(self, visitor: V, prefix: Prefix) -> Self::Output {
        let (head, rest) = self;
        let continuation = Peel {
            visitor,
            prefix,
            rest,
        };
        // SAFETY:
        // 1. `head` is not valueless (guaranteed by the caller), so its
        //    discriminant is below `LEN`
        // 2. The storage holds the alternative named by the discriminant and is
        //    borrowed immutably for `'a`
        unsafe { L::dispatch(head.arena.index(), head.arena.as_ptr(), continuation) }
    }
}

impl<'a, V, Prefix, L, Tail> Remaining<V, Prefix> for (&'a mut Variant<L>, Tail)
where
    L: AlternativeList + DispatchMut<'a, Peel<V, Prefix, Tail>>,
    Tail: Containers,
{
    type Output = <L as DispatchMut<'a, Peel<V, Prefix, Tail>>>::Output;

    #[inline]
    unsafe fn peel(self, visitor: V, prefix: Prefix) -> Self::Output {
        let (head, rest) = self;
        let index = head.arena.index();
        let storage = head.arena.as_mut_ptr();
        let continuation = Peel {
            visitor,
            prefix,
            rest,
        };
        // SAFETY:
        // 1. `head` is not valueless (guaranteed by the caller), so its
        //    discriminant is below `LEN`
        // 2. The storage holds the alternative named by the discriminant and is
        //    borrowed mutably for `'a`
        unsafe { L::dispatch_mut(index, storage, continuation) }
    }
}

/// A tuple of up to four container references that can be visited.
///
/// Implemented for `()` and for tuples mixing `&Variant<_>` and
/// `&mut Variant<_>`.
pub trait Visitable<V> {
    /// Result of the visit.
    type Output;

    /// Checks that no container is valueless, then dispatches `visitor` on the
    /// live alternatives.
    ///
    /// # Errors
    ///
    /// Returns [`ValuelessVisit`] with the position of the first valueless
    /// container. The visitor is not called in that case.
    fn visit_all(self, visitor: V) -> Result<Self::Output, ValuelessVisit>;
}

impl<V> Visitable<V> for ()
where
    V: Visitor<()>,
{
    type Output = V::Output;

    #[inline]
    fn visit_all(self, visitor: V) -> Result<V::Output, ValuelessVisit> {
        Ok(visitor.visit(()))
    }
}

macro_rules! visitable {
    ($($c:ident : $C:ident),+ ; $cons:ty ; $list:expr) => {
        impl<V, $($C),+> Visitable<V> for ($($C,)+)
        where
            $cons: Remaining<V, ()>,
        {
            type Output = <$cons as Remaining<V, ()>>::Output;

            #[inline]
            fn visit_all(self, visitor: V) -> Result<Self::Output, ValuelessVisit> {
                let ($($c,)+) = self;
                let list: $cons = $list;
                if let Some(position) = list.valueless_position(0) {
                    return Err(ValuelessVisit::new(position));
                }
                // SAFETY:
                // 1. No container in `list` is valueless
                Ok(unsafe { list.peel(visitor, ()) })
            }
        }
    };
}

visitable!(c0: C0; (C0, ()); (c0, ()));
visitable!(c0: C0, c1: C1; (C0, (C1, ())); (c0, (c1, ())));
visitable!(c0: C0, c1: C1, c2: C2; (C0, (C1, (C2, ()))); (c0, (c1, (c2, ()))));
visitable!(
    c0: C0, c1: C1, c2: C2, c3: C3;
    (C0, (C1, (C2, (C3, ()))));
    (c0, (c1, (c2, (c3, ()))))
);

/// Calls `visitor` with the live alternatives of `containers`.
///
/// `containers` is a tuple of zero to four references to containers, each
/// either shared or mutable. The visitor receives a tuple with a reference to
/// each live alternative, in the same order.
///
/// # Errors
///
/// Returns [`ValuelessVisit`] if one of the containers is valueless, before
/// the visitor runs.
///
/// # Examples
///
/// ```
/// use oneof::prelude::*;
///
/// struct Same;
///
/// impl<A: 'static, B: 'static> Visitor<(&A, &B)> for Same {
///     type Output = bool;
///
///     fn visit(self, _: (&A, &B)) -> bool {
///         core::any::TypeId::of::<A>() == core::any::TypeId::of::<B>()
///     }
/// }
///
/// let a: Variant<(u8, char)> = Variant::new('a');
/// let b: Variant<(char, bool)> = Variant::new('b');
/// assert_eq!(visit(Same, (&a, &b)), Ok(true));
/// ```
#[inline]
pub fn visit<V, C>(visitor: V, containers: C) -> Result<C::Output, ValuelessVisit>
where
    C: Visitable<V>,
{
    containers.visit_all(visitor)
}

impl<L: AlternativeList> Variant<L> {
    /// Calls `visitor` with a shared reference to the live alternative.
    ///
    /// Shorthand for [`visit(visitor, (self,))`](visit()).
    ///
    /// # Errors
    ///
    /// Returns [`ValuelessVisit`] if the container is valueless.
    #[inline]
    pub fn visit<'a, V>(
        &'a self,
        visitor: V,
    ) -> Result<<(&'a Self,) as Visitable<V>>::Output, ValuelessVisit>
    where
        (&'a Self,): Visitable<V>,
    {
        (self,).visit_all(visitor)
    }

    /// Calls `visitor` with a mutable reference to the live alternative.
    ///
    /// Shorthand for [`visit(visitor, (self,))`](visit()).
    ///
    /// # Errors
    ///
    /// Returns [`ValuelessVisit`] if the container is valueless.
    #[inline]
    pub fn visit_mut<'a, V>(
        &'a mut self,
        visitor: V,
    ) -> Result<<(&'a mut Self,) as Visitable<V>>::Output, ValuelessVisit>
    where
        (&'a mut Self,): Visitable<V>,
    {
        (self,).visit_all(visitor)
    }
}
