use crate::{error::Result, source::Pull};

use super::Seq;

struct Map<'a, T, F> {
    inner: Seq<'a, T>,
    f: F,
}

impl<T, U, F> Pull<U> for Map<'_, T, F>
where
    F: FnMut(T) -> U,
{
    fn pull(&mut self) -> Result<Option<U>> {
        Ok(self.inner.next()?.map(&mut self.f))
    }
}

struct Inspect<'a, T, F> {
    inner: Seq<'a, T>,
    f: F,
}

impl<T, F> Pull<T> for Inspect<'_, T, F>
where
    F: FnMut(&T),
{
    fn pull(&mut self) -> Result<Option<T>> {
        let item = self.inner.next()?;
        if let Some(item) = &item {
            (self.f)(item);
        }
        Ok(item)
    }
}

struct Filter<'a, T, F> {
    inner: Seq<'a, T>,
    predicate: F,
}

impl<T, F> Pull<T> for Filter<'_, T, F>
where
    F: FnMut(&T) -> bool,
{
    fn pull(&mut self) -> Result<Option<T>> {
        while let Some(item) = self.inner.next()? {
            if (self.predicate)(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

struct FilterMap<'a, T, F> {
    inner: Seq<'a, T>,
    f: F,
}

impl<T, U, F> Pull<U> for FilterMap<'_, T, F>
where
    F: FnMut(T) -> Option<U>,
{
    fn pull(&mut self) -> Result<Option<U>> {
        while let Some(item) = self.inner.next()? {
            if let Some(mapped) = (self.f)(item) {
                return Ok(Some(mapped));
            }
        }
        Ok(None)
    }
}

struct MapWhile<'a, T, F> {
    inner: Seq<'a, T>,
    f: F,
    finished: bool,
}

impl<T, U, F> Pull<U> for MapWhile<'_, T, F>
where
    F: FnMut(T) -> Option<U>,
{
    fn pull(&mut self) -> Result<Option<U>> {
        if self.finished {
            return Ok(None);
        }
        let mapped = self.inner.next()?.and_then(&mut self.f);
        self.finished = mapped.is_none();
        Ok(mapped)
    }
}

struct Enumerate<'a, T> {
    inner: Seq<'a, T>,
    count: usize,
}

impl<T> Pull<(usize, T)> for Enumerate<'_, T> {
    fn pull(&mut self) -> Result<Option<(usize, T)>> {
        let Some(item) = self.inner.next()? else {
            return Ok(None);
        };
        let index = self.count;
        self.count += 1;
        Ok(Some((index, item)))
    }
}

struct Scan<'a, T, S, F> {
    inner: Seq<'a, T>,
    state: S,
    f: F,
}

impl<T, S, U, F> Pull<U> for Scan<'_, T, S, F>
where
    F: FnMut(&mut S, T) -> U,
{
    fn pull(&mut self) -> Result<Option<U>> {
        Ok(self
            .inner
            .next()?
            .map(|item| (self.f)(&mut self.state, item)))
    }
}

impl<'a, T> Seq<'a, T>
where
    T: 'a,
{
    pub fn map<U, F>(&mut self, f: F) -> Result<Seq<'a, U>>
    where
        F: FnMut(T) -> U + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(Map { inner, f }))
    }

    /// Calls `f` on each value as it passes through.
    pub fn inspect<F>(&mut self, f: F) -> Result<Seq<'a, T>>
    where
        F: FnMut(&T) + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(Inspect { inner, f }))
    }

    pub fn filter<F>(&mut self, predicate: F) -> Result<Seq<'a, T>>
    where
        F: FnMut(&T) -> bool + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(Filter { inner, predicate }))
    }

    pub fn filter_map<U, F>(&mut self, f: F) -> Result<Seq<'a, U>>
    where
        F: FnMut(T) -> Option<U> + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(FilterMap { inner, f }))
    }

    /// Maps values until `f` first returns `None`, then ends for good.
    pub fn map_while<U, F>(&mut self, f: F) -> Result<Seq<'a, U>>
    where
        F: FnMut(T) -> Option<U> + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(MapWhile {
            inner,
            f,
            finished: false,
        }))
    }

    pub fn enumerate(&mut self) -> Result<Seq<'a, (usize, T)>> {
        let inner = self.detach()?;
        Ok(Seq::new(Enumerate { inner, count: 0 }))
    }

    /// Threads `state` through every value. Unlike `fold`, each call's result
    /// is emitted, and the state itself is never yielded.
    pub fn scan<S, U, F>(&mut self, state: S, f: F) -> Result<Seq<'a, U>>
    where
        S: 'a,
        F: FnMut(&mut S, T) -> U + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(Scan { inner, state, f }))
    }
}
