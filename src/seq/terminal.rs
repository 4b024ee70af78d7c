//! Operations that drain a sequence into a concrete result.
//!
//! Every operation here hands the sequence off before pulling anything, so
//! the receiver is consumed even if draining stops early or fails.

use std::cmp::Ordering;

use num_traits::{One, ToPrimitive, Zero};

use crate::error::{Error, Result};

use super::Seq;

fn coerce<T, N>(item: T) -> Result<N>
where
    T: ToPrimitive,
    N: num_traits::NumCast,
{
    <N as num_traits::NumCast>::from(item)
        .ok_or_else(|| Error::new_not_numeric(std::any::type_name::<T>()))
}

impl<'a, T> Seq<'a, T>
where
    T: 'a,
{
    pub fn fold<B, F>(&mut self, init: B, mut f: F) -> Result<B>
    where
        F: FnMut(B, T) -> B,
    {
        let mut inner = self.detach()?;
        let mut acc = init;
        while let Some(item) = inner.next()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    /// Folds with a fallible step, stopping at the first error.
    pub fn try_fold<B, E, F>(&mut self, init: B, mut f: F) -> std::result::Result<B, E>
    where
        E: From<Error>,
        F: FnMut(B, T) -> std::result::Result<B, E>,
    {
        let mut inner = self.detach()?;
        let mut acc = init;
        while let Some(item) = inner.next()? {
            acc = f(acc, item)?;
        }
        Ok(acc)
    }

    /// Folds using the first value as the initial accumulator. Returns `None`
    /// for an empty sequence.
    pub fn reduce<F>(&mut self, mut f: F) -> Result<Option<T>>
    where
        F: FnMut(T, T) -> T,
    {
        let mut inner = self.detach()?;
        let Some(mut acc) = inner.next()? else {
            return Ok(None);
        };
        while let Some(item) = inner.next()? {
            acc = f(acc, item);
        }
        Ok(Some(acc))
    }

    pub fn for_each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        self.fold((), |(), item| f(item))
    }

    pub fn try_for_each<E, F>(&mut self, mut f: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnMut(T) -> std::result::Result<(), E>,
    {
        self.try_fold((), |(), item| f(item))
    }

    pub fn collect<C>(&mut self) -> Result<C>
    where
        C: FromIterator<T>,
    {
        let mut inner = self.detach()?;
        inner.iter().collect()
    }

    /// Appends the remaining values to `target`.
    pub fn collect_into<E>(&mut self, target: &mut E) -> Result<()>
    where
        E: Extend<T>,
    {
        self.for_each(|item| target.extend(Some(item)))
    }

    pub fn count(&mut self) -> Result<usize> {
        self.fold(0, |count, _| count + 1)
    }

    pub fn last(&mut self) -> Result<Option<T>> {
        self.fold(None, |_, item| Some(item))
    }

    /// Splits values into those `predicate` accepts and those it rejects,
    /// keeping their relative order.
    pub fn partition<B, F>(&mut self, mut predicate: F) -> Result<(B, B)>
    where
        B: Default + Extend<T>,
        F: FnMut(&T) -> bool,
    {
        let mut accepted = B::default();
        let mut rejected = B::default();
        self.for_each(|item| {
            if predicate(&item) {
                accepted.extend(Some(item));
            } else {
                rejected.extend(Some(item));
            }
        })?;
        Ok((accepted, rejected))
    }

    /// True if `predicate` accepts every value. Stops at the first rejection.
    pub fn all<F>(&mut self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(T) -> bool,
    {
        let mut inner = self.detach()?;
        while let Some(item) = inner.next()? {
            if !predicate(item) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True if `predicate` accepts some value. Stops at the first acceptance.
    pub fn any<F>(&mut self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(T) -> bool,
    {
        let mut inner = self.detach()?;
        while let Some(item) = inner.next()? {
            if predicate(item) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn find<F>(&mut self, mut predicate: F) -> Result<Option<T>>
    where
        F: FnMut(&T) -> bool,
    {
        let mut inner = self.detach()?;
        while let Some(item) = inner.next()? {
            if predicate(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    pub fn find_map<U, F>(&mut self, mut f: F) -> Result<Option<U>>
    where
        F: FnMut(T) -> Option<U>,
    {
        let mut inner = self.detach()?;
        while let Some(item) = inner.next()? {
            if let Some(found) = f(item) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Index of the first value `predicate` accepts.
    pub fn position<F>(&mut self, mut predicate: F) -> Result<Option<usize>>
    where
        F: FnMut(T) -> bool,
    {
        let mut inner = self.detach()?;
        let mut index = 0;
        while let Some(item) = inner.next()? {
            if predicate(item) {
                return Ok(Some(index));
            }
            index += 1;
        }
        Ok(None)
    }

    /// Index of the last value `predicate` accepts. Always drains the whole
    /// sequence.
    pub fn rposition<F>(&mut self, mut predicate: F) -> Result<Option<usize>>
    where
        F: FnMut(T) -> bool,
    {
        let mut index = 0;
        self.fold(None, |found, item| {
            let found = if predicate(item) { Some(index) } else { found };
            index += 1;
            found
        })
    }

    /// The last of the greatest values according to `compare`.
    pub fn max_by<F>(&mut self, mut compare: F) -> Result<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.reduce(|best, item| match compare(&best, &item) {
            Ordering::Greater => best,
            Ordering::Less | Ordering::Equal => item,
        })
    }

    /// The first of the least values according to `compare`.
    pub fn min_by<F>(&mut self, mut compare: F) -> Result<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.reduce(|best, item| match compare(&best, &item) {
            Ordering::Greater => item,
            Ordering::Less | Ordering::Equal => best,
        })
    }

    pub fn max(&mut self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.max_by(Ord::cmp)
    }

    pub fn min(&mut self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.min_by(Ord::cmp)
    }

    pub fn max_by_key<K, F>(&mut self, mut key: F) -> Result<Option<T>>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let best = self.fold(None, |best: Option<(K, T)>, item| {
            let item_key = key(&item);
            match best {
                Some((best_key, best)) if best_key > item_key => Some((best_key, best)),
                _ => Some((item_key, item)),
            }
        })?;
        Ok(best.map(|(_, item)| item))
    }

    pub fn min_by_key<K, F>(&mut self, mut key: F) -> Result<Option<T>>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let best = self.fold(None, |best: Option<(K, T)>, item| {
            let item_key = key(&item);
            match best {
                Some((best_key, best)) if best_key <= item_key => Some((best_key, best)),
                _ => Some((item_key, item)),
            }
        })?;
        Ok(best.map(|(_, item)| item))
    }

    /// Adds up the values, coercing each to `N`. Fails on the first value that
    /// has no numeric representation in `N`.
    ///
    /// A primitive `N` overflows the way `+` on `N` does, which panics in
    /// debug builds. Sum into [`Integer`](crate::Integer) for a total that
    /// promotes to a big integer instead.
    pub fn sum<N>(&mut self) -> Result<N>
    where
        T: ToPrimitive,
        N: num_traits::NumCast + Zero,
    {
        self.try_fold(N::zero(), |total, item| Ok(total + coerce::<T, N>(item)?))
    }

    /// Multiplies the values, coercing each to `N`. Overflow behaves as in
    /// [`Seq::sum`].
    pub fn product<N>(&mut self) -> Result<N>
    where
        T: ToPrimitive,
        N: num_traits::NumCast + One,
    {
        self.try_fold(N::one(), |total, item| Ok(total * coerce::<T, N>(item)?))
    }
}

impl<'a, A, B> Seq<'a, (A, B)>
where
    A: 'a,
    B: 'a,
{
    /// Splits a sequence of pairs into two collections, in order.
    pub fn unzip<FromA, FromB>(&mut self) -> Result<(FromA, FromB)>
    where
        FromA: Default + Extend<A>,
        FromB: Default + Extend<B>,
    {
        let mut lefts = FromA::default();
        let mut rights = FromB::default();
        self.for_each(|(a, b)| {
            lefts.extend(Some(a));
            rights.extend(Some(b));
        })?;
        Ok((lefts, rights))
    }
}
