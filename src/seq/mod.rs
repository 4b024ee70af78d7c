//! The sequence engine.
//!
//! A [`Seq`] owns one pull source and tracks how far it has been consumed.
//! Operations come in two flavors:
//!
//! - Stepping operations (`next`, `peek`, `advance_by`, ...) advance the
//!   sequence in place.
//! - Consuming operations (every combinator and every terminal) hand the
//!   remaining sequence off. The receiver is left consumed, and any later
//!   call on it fails with [`Error::Consumed`].

use std::fmt;

use crate::{
    error::{Error, Result},
    source::{Empty, FromFn, IterSource, Pull, TryFromFn},
    IntoSeq,
};

mod compare;
mod fork;
mod join;
mod limit;
mod map;
mod terminal;

#[derive(Clone, Copy, Debug, Default)]
struct Fused {
    /// Set by [`Seq::fuse`].
    called: bool,
    /// Set once a fused sequence has reported end. The source is never pulled
    /// again.
    dead: bool,
}

/// The outcome of [`Seq::advance_by`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Complete,
    /// The sequence ended after `taken` steps.
    Exhausted { taken: usize },
}

pub struct Seq<'a, T> {
    source: Box<dyn Pull<T> + 'a>,
    /// A value (or end) pulled by `peek` and not yet returned by `next`.
    peeked: Option<Option<T>>,
    done: bool,
    consumed: bool,
    fused: Fused,
}

impl<'a, T> Seq<'a, T> {
    pub fn new<P>(source: P) -> Self
    where
        P: Pull<T> + 'a,
    {
        Seq {
            source: Box::new(source),
            peeked: None,
            done: false,
            consumed: false,
            fused: Fused::default(),
        }
    }

    pub fn empty() -> Self {
        Seq::new(Empty)
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut() -> Option<T> + 'a,
    {
        Seq::new(FromFn::new(f))
    }

    pub fn try_from_fn<F>(f: F) -> Self
    where
        F: FnMut() -> Result<Option<T>> + 'a,
    {
        Seq::new(TryFromFn::new(f))
    }

    pub fn from_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Seq::new(IterSource::new(iterable.into_iter()))
    }

    /// True if the most recent `next` reported end.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn is_fused(&self) -> bool {
        self.fused.called
    }

    fn ensure_live(&self) -> Result<()> {
        if self.consumed {
            tracing::debug!("operation on a consumed sequence");
            return Err(Error::Consumed);
        }
        Ok(())
    }

    /// Moves the remaining sequence (source, pending peek, fuse state) into a
    /// new engine, leaving an empty source behind.
    fn split_off(&mut self) -> Seq<'a, T> {
        Seq {
            source: std::mem::replace(&mut self.source, Box::new(Empty)),
            peeked: self.peeked.take(),
            done: self.done,
            consumed: false,
            fused: self.fused,
        }
    }

    /// Hands the remaining sequence off, marking this engine consumed.
    pub(crate) fn detach(&mut self) -> Result<Seq<'a, T>> {
        self.ensure_live()?;
        let detached = self.split_off();
        self.consumed = true;
        Ok(detached)
    }

    /// Hands off this engine together with `other`. `other` is converted
    /// first, so a failed conversion leaves this engine untouched.
    fn detach_pair<O>(&mut self, other: O) -> Result<(Seq<'a, T>, Seq<'a, O::Item>)>
    where
        O: IntoSeq<'a>,
    {
        self.ensure_live()?;
        let other = other.into_seq()?;
        let this = self.detach()?;
        Ok((this, other))
    }

    pub fn next(&mut self) -> Result<Option<T>> {
        self.ensure_live()?;
        if self.fused.dead {
            return Ok(None);
        }
        let item = match self.peeked.take() {
            Some(item) => item,
            None => self.source.pull()?,
        };
        self.done = item.is_none();
        if self.done && self.fused.called {
            self.fused.dead = true;
        }
        Ok(item)
    }

    /// Returns the value the next call to [`Seq::next`] will return, without
    /// consuming it.
    pub fn peek(&mut self) -> Result<Option<&T>> {
        self.ensure_live()?;
        if self.fused.dead {
            return Ok(None);
        }
        if self.peeked.is_none() {
            let item = self.source.pull()?;
            self.peeked = Some(item);
        }
        Ok(self.peeked.as_ref().and_then(Option::as_ref))
    }

    pub fn peek_mut(&mut self) -> Result<Option<&mut T>> {
        self.peek()?;
        Ok(self.peeked.as_mut().and_then(Option::as_mut))
    }

    /// Consumes and returns the next value only if `predicate` accepts it.
    pub fn next_if<F>(&mut self, predicate: F) -> Result<Option<T>>
    where
        F: FnOnce(&T) -> bool,
    {
        let accepted = match self.peek()? {
            Some(item) => predicate(item),
            None => false,
        };
        if accepted {
            self.next()
        } else {
            Ok(None)
        }
    }

    pub fn next_if_eq<U>(&mut self, expected: &U) -> Result<Option<T>>
    where
        T: PartialEq<U>,
        U: ?Sized,
    {
        self.next_if(|item| item == expected)
    }

    pub fn advance_by(&mut self, n: usize) -> Result<Advance> {
        self.ensure_live()?;
        for taken in 0..n {
            if self.next()?.is_none() {
                return Ok(Advance::Exhausted { taken });
            }
        }
        Ok(Advance::Complete)
    }

    pub fn nth(&mut self, n: usize) -> Result<Option<T>> {
        match self.advance_by(n)? {
            Advance::Complete => self.next(),
            Advance::Exhausted { .. } => Ok(None),
        }
    }

    /// Takes up to `n` values. The chunk is shorter only if the sequence ends.
    pub fn next_chunk(&mut self, n: usize) -> Result<Vec<T>> {
        self.ensure_live()?;
        if n == 0 {
            return Err(Error::new_invalid_argument("n", "chunk size must be positive"));
        }
        let mut chunk = Vec::with_capacity(n);
        while chunk.len() < n {
            match self.next()? {
                Some(item) => chunk.push(item),
                None => break,
            }
        }
        Ok(chunk)
    }

    /// Borrows this sequence as a new engine that pulls through it.
    ///
    /// Consuming the view consumes only the view: values it pulled are gone
    /// from this sequence, and the rest remain available here once the view
    /// is dropped.
    pub fn by_ref(&mut self) -> Result<Seq<'_, T>> {
        self.ensure_live()?;
        Ok(Seq::new(ByRef(self)))
    }

    /// Makes exhaustion sticky: once `next` reports end, it always will.
    pub fn fuse(&mut self) -> &mut Self {
        self.fused.called = true;
        self
    }

    /// Iterates the remaining values as results.
    pub fn iter(&mut self) -> Iter<'_, 'a, T> {
        Iter(self)
    }
}

impl<T> Default for Seq<'_, T> {
    fn default() -> Self {
        Seq::empty()
    }
}

impl<T> fmt::Debug for Seq<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seq")
            .field("done", &self.done)
            .field("consumed", &self.consumed)
            .field("fused", &self.fused.called)
            .field("peeked", &self.peeked.is_some())
            .finish_non_exhaustive()
    }
}

struct ByRef<'s, 'a, T>(&'s mut Seq<'a, T>);

impl<T> Pull<T> for ByRef<'_, '_, T> {
    fn pull(&mut self) -> Result<Option<T>> {
        self.0.next()
    }
}

/// A standard [`Iterator`] over the remaining values of a [`Seq`].
pub struct Iter<'s, 'a, T>(&'s mut Seq<'a, T>);

impl<T> Iterator for Iter<'_, '_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().transpose()
    }
}
