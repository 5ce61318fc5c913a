//! Checked access to the live alternative, by type or by index.

use oneof_internals::list::{Alt, AlternativeList, At, Member};

use super::Variant;
use crate::error::BadVariantAccess;

impl<L: AlternativeList> Variant<L> {
    /// Returns `true` if the live alternative is `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(u8, String)> = Variant::new(String::new());
    /// assert!(value.holds_alternative::<String, _>());
    /// assert!(!value.holds_alternative::<u8, _>());
    /// ```
    #[inline]
    pub fn holds_alternative<T, M>(&self) -> bool
    where
        L: Member<T, M>,
    {
        self.arena.index() == <L as Member<T, M>>::INDEX
    }

    /// The error for a request of the alternative at `requested`.
    fn bad_access(&self, requested: usize) -> BadVariantAccess {
        BadVariantAccess::new(requested, self.arena.live_index())
    }

    /// Returns a reference to the live alternative if it is `T`.
    #[inline]
    pub fn get_if<T, M>(&self) -> Option<&T>
    where
        L: Member<T, M>,
    {
        if !self.holds_alternative::<T, M>() {
            return None;
        }
        // SAFETY:
        // 1. The live alternative is at `INDEX`, which `Member<T, M>` guarantees
        //    to be `T`
        Some(unsafe { self.arena.get_unchecked::<T>() })
    }

    /// Returns a mutable reference to the live alternative if it is `T`.
    #[inline]
    pub fn get_if_mut<T, M>(&mut self) -> Option<&mut T>
    where
        L: Member<T, M>,
    {
        if !self.holds_alternative::<T, M>() {
            return None;
        }
        // SAFETY:
        // 1. The live alternative is at `INDEX`, which `Member<T, M>` guarantees
        //    to be `T`
        Some(unsafe { self.arena.get_unchecked_mut::<T>() })
    }

    /// Returns a reference to the alternative at index `I`, if it is live.
    #[inline]
    pub fn get_if_at<const I: usize>(&self) -> Option<&Alt<L, I>>
    where
        L: At<I>,
    {
        self.arena.get::<I>()
    }

    /// Returns a mutable reference to the alternative at index `I`, if it is
    /// live.
    #[inline]
    pub fn get_if_at_mut<const I: usize>(&mut self) -> Option<&mut Alt<L, I>>
    where
        L: At<I>,
    {
        self.arena.get_mut::<I>()
    }

    /// Returns a reference to the live alternative, or [`BadVariantAccess`]
    /// if it is not `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(u8, String)> = Variant::new(4_u8);
    /// assert_eq!(value.get::<u8, _>(), Ok(&4));
    /// assert!(value.get::<String, _>().is_err());
    /// ```
    pub fn get<T, M>(&self) -> Result<&T, BadVariantAccess>
    where
        L: Member<T, M>,
    {
        self.get_if::<T, M>()
            .ok_or_else(|| self.bad_access(<L as Member<T, M>>::INDEX))
    }

    /// Returns a mutable reference to the live alternative, or
    /// [`BadVariantAccess`] if it is not `T`.
    pub fn get_mut<T, M>(&mut self) -> Result<&mut T, BadVariantAccess>
    where
        L: Member<T, M>,
    {
        let error = self.bad_access(<L as Member<T, M>>::INDEX);
        self.get_if_mut::<T, M>().ok_or(error)
    }

    /// Returns a reference to the alternative at index `I`, or
    /// [`BadVariantAccess`] if another alternative is live.
    pub fn get_at<const I: usize>(&self) -> Result<&Alt<L, I>, BadVariantAccess>
    where
        L: At<I>,
    {
        self.arena.get::<I>().ok_or_else(|| self.bad_access(I))
    }

    /// Returns a mutable reference to the alternative at index `I`, or
    /// [`BadVariantAccess`] if another alternative is live.
    pub fn get_at_mut<const I: usize>(&mut self) -> Result<&mut Alt<L, I>, BadVariantAccess>
    where
        L: At<I>,
    {
        let error = self.bad_access(I);
        self.arena.get_mut::<I>().ok_or(error)
    }

    /// Moves the live alternative out if it is `T`, and otherwise gives the
    /// container back.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(u8, String)> = Variant::new(String::from("owned"));
    /// let value = value.into_inner::<u8, _>().unwrap_err();
    /// assert_eq!(value.into_inner::<String, _>().ok().as_deref(), Some("owned"));
    /// ```
    pub fn into_inner<T, M>(mut self) -> Result<T, Self>
    where
        L: Member<T, M>,
    {
        if !self.holds_alternative::<T, M>() {
            return Err(self);
        }
        // SAFETY:
        // 1. The live alternative is at `INDEX`, which `Member<T, M>` guarantees
        //    to be `T`
        Ok(unsafe { self.arena.take_unchecked::<T>() })
    }

    /// Moves the alternative at index `I` out if it is live, and otherwise
    /// gives the container back.
    pub fn into_inner_at<const I: usize>(mut self) -> Result<Alt<L, I>, Self>
    where
        L: At<I>,
    {
        match self.arena.take::<I>() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }
}
