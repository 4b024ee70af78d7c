//! Lexicographic comparison of two sequences pulled in lock-step.

use std::cmp::Ordering;

use crate::{error::Result, IntoSeq};

use super::Seq;

impl<'a, T> Seq<'a, T>
where
    T: 'a,
{
    /// Compares pairwise with `cmp`, stopping at the first unequal pair.
    ///
    /// If one side ends first, the longer sequence compares greater.
    pub fn cmp_by<O, F>(&mut self, other: O, mut cmp: F) -> Result<Ordering>
    where
        O: IntoSeq<'a>,
        F: FnMut(&T, &O::Item) -> Ordering,
    {
        let (mut left, mut right) = self.detach_pair(other)?;
        loop {
            let Some(a) = left.next()? else {
                return Ok(match right.next()? {
                    Some(_) => Ordering::Less,
                    None => Ordering::Equal,
                });
            };
            let Some(b) = right.next()? else {
                return Ok(Ordering::Greater);
            };
            match cmp(&a, &b) {
                Ordering::Equal => {}
                unequal => return Ok(unequal),
            }
        }
    }

    /// Like [`Seq::cmp_by`], for comparators that may find a pair
    /// incomparable. Incomparable pairs count as equal and comparison moves on
    /// to the next pair.
    pub fn partial_cmp_by<O, F>(&mut self, other: O, mut partial_cmp: F) -> Result<Ordering>
    where
        O: IntoSeq<'a>,
        F: FnMut(&T, &O::Item) -> Option<Ordering>,
    {
        self.cmp_by(other, |a, b| {
            partial_cmp(a, b).unwrap_or(Ordering::Equal)
        })
    }

    pub fn cmp<O>(&mut self, other: O) -> Result<Ordering>
    where
        O: IntoSeq<'a, Item = T>,
        T: Ord,
    {
        self.cmp_by(other, Ord::cmp)
    }

    pub fn partial_cmp<O>(&mut self, other: O) -> Result<Ordering>
    where
        O: IntoSeq<'a>,
        T: PartialOrd<O::Item>,
    {
        self.partial_cmp_by(other, PartialOrd::partial_cmp)
    }

    pub fn lt<O>(&mut self, other: O) -> Result<bool>
    where
        O: IntoSeq<'a>,
        T: PartialOrd<O::Item>,
    {
        Ok(self.partial_cmp(other)? == Ordering::Less)
    }

    pub fn le<O>(&mut self, other: O) -> Result<bool>
    where
        O: IntoSeq<'a>,
        T: PartialOrd<O::Item>,
    {
        Ok(self.partial_cmp(other)? != Ordering::Greater)
    }

    pub fn gt<O>(&mut self, other: O) -> Result<bool>
    where
        O: IntoSeq<'a>,
        T: PartialOrd<O::Item>,
    {
        Ok(self.partial_cmp(other)? == Ordering::Greater)
    }

    pub fn ge<O>(&mut self, other: O) -> Result<bool>
    where
        O: IntoSeq<'a>,
        T: PartialOrd<O::Item>,
    {
        Ok(self.partial_cmp(other)? != Ordering::Less)
    }

    /// True if both sequences have the same length and `eq` accepts every
    /// pair.
    pub fn eq_by<O, F>(&mut self, other: O, mut eq: F) -> Result<bool>
    where
        O: IntoSeq<'a>,
        F: FnMut(&T, &O::Item) -> bool,
    {
        let (mut left, mut right) = self.detach_pair(other)?;
        loop {
            match (left.next()?, right.next()?) {
                (None, None) => return Ok(true),
                (Some(a), Some(b)) if eq(&a, &b) => {}
                _ => return Ok(false),
            }
        }
    }

    pub fn eq<O>(&mut self, other: O) -> Result<bool>
    where
        O: IntoSeq<'a>,
        T: PartialEq<O::Item>,
    {
        self.eq_by(other, |a, b| a == b)
    }

    pub fn ne<O>(&mut self, other: O) -> Result<bool>
    where
        O: IntoSeq<'a>,
        T: PartialEq<O::Item>,
    {
        Ok(!self.eq(other)?)
    }

    pub fn is_sorted_by<F>(&mut self, mut in_order: F) -> Result<bool>
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut inner = self.detach()?;
        let Some(mut last) = inner.next()? else {
            return Ok(true);
        };
        while let Some(item) = inner.next()? {
            if !in_order(&last, &item) {
                return Ok(false);
            }
            last = item;
        }
        Ok(true)
    }

    pub fn is_sorted(&mut self) -> Result<bool>
    where
        T: PartialOrd,
    {
        self.is_sorted_by(|a, b| a <= b)
    }

    pub fn is_sorted_by_key<K, F>(&mut self, mut key: F) -> Result<bool>
    where
        F: FnMut(&T) -> K,
        K: PartialOrd,
    {
        self.is_sorted_by(|a, b| key(a) <= key(b))
    }
}
