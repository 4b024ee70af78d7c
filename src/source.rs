//! Pull sources: the primitive producers a [`Seq`](crate::Seq) is built on.

use crate::error::Result;

/// A producer that yields one value per call, or `None` once it has nothing
/// more to give.
///
/// A source is allowed to yield values again after returning `None`. Callers
/// that need sticky exhaustion use [`Seq::fuse`](crate::Seq::fuse).
pub trait Pull<T> {
    fn pull(&mut self) -> Result<Option<T>>;
}

impl<T, P> Pull<T> for Box<P>
where
    P: Pull<T> + ?Sized,
{
    fn pull(&mut self) -> Result<Option<T>> {
        (**self).pull()
    }
}

/// A source that never yields anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Empty;

impl<T> Pull<T> for Empty {
    fn pull(&mut self) -> Result<Option<T>> {
        Ok(None)
    }
}

/// Adapts a standard iterator.
#[derive(Clone, Debug)]
pub struct IterSource<I>(I);

impl<I> IterSource<I> {
    pub fn new(iter: I) -> Self {
        IterSource(iter)
    }
}

impl<I> Pull<I::Item> for IterSource<I>
where
    I: Iterator,
{
    fn pull(&mut self) -> Result<Option<I::Item>> {
        Ok(self.0.next())
    }
}

pub struct FromFn<F>(F);

impl<F> FromFn<F> {
    pub fn new(f: F) -> Self {
        FromFn(f)
    }
}

impl<T, F> Pull<T> for FromFn<F>
where
    F: FnMut() -> Option<T>,
{
    fn pull(&mut self) -> Result<Option<T>> {
        Ok((self.0)())
    }
}

/// Like [`FromFn`], for producers that can fail.
pub struct TryFromFn<F>(F);

impl<F> TryFromFn<F> {
    pub fn new(f: F) -> Self {
        TryFromFn(f)
    }
}

impl<T, F> Pull<T> for TryFromFn<F>
where
    F: FnMut() -> Result<Option<T>>,
{
    fn pull(&mut self) -> Result<Option<T>> {
        (self.0)()
    }
}
