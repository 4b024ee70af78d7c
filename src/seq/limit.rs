use crate::{
    error::{Error, Result},
    source::Pull,
};

use super::Seq;

struct Take<'a, T> {
    inner: Seq<'a, T>,
    remaining: usize,
}

impl<T> Pull<T> for Take<'_, T> {
    fn pull(&mut self) -> Result<Option<T>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let item = self.inner.next()?;
        match item {
            Some(_) => self.remaining -= 1,
            None => self.remaining = 0,
        }
        Ok(item)
    }
}

struct Skip<'a, T> {
    inner: Seq<'a, T>,
    pending: usize,
}

impl<T> Pull<T> for Skip<'_, T> {
    fn pull(&mut self) -> Result<Option<T>> {
        while self.pending > 0 {
            if self.inner.next()?.is_none() {
                self.pending = 0;
                return Ok(None);
            }
            self.pending -= 1;
        }
        self.inner.next()
    }
}

struct TakeWhile<'a, T, F> {
    inner: Seq<'a, T>,
    predicate: F,
    finished: bool,
}

impl<T, F> Pull<T> for TakeWhile<'_, T, F>
where
    F: FnMut(&T) -> bool,
{
    fn pull(&mut self) -> Result<Option<T>> {
        if self.finished {
            return Ok(None);
        }
        match self.inner.next()? {
            Some(item) if (self.predicate)(&item) => Ok(Some(item)),
            _ => {
                self.finished = true;
                Ok(None)
            }
        }
    }
}

struct SkipWhile<'a, T, F> {
    inner: Seq<'a, T>,
    predicate: F,
    skipping: bool,
}

impl<T, F> Pull<T> for SkipWhile<'_, T, F>
where
    F: FnMut(&T) -> bool,
{
    fn pull(&mut self) -> Result<Option<T>> {
        if !self.skipping {
            return self.inner.next();
        }
        while let Some(item) = self.inner.next()? {
            if !(self.predicate)(&item) {
                self.skipping = false;
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

struct StepBy<'a, T> {
    inner: Seq<'a, T>,
    /// Values dropped between two yielded ones.
    gap: usize,
    first: bool,
}

impl<T> Pull<T> for StepBy<'_, T> {
    fn pull(&mut self) -> Result<Option<T>> {
        if self.first {
            self.first = false;
            return self.inner.next();
        }
        self.inner.nth(self.gap)
    }
}

impl<'a, T> Seq<'a, T>
where
    T: 'a,
{
    /// Yields at most `n` values. The underlying sequence is not pulled past
    /// the `n`th value.
    pub fn take(&mut self, n: usize) -> Result<Seq<'a, T>> {
        let inner = self.detach()?;
        Ok(Seq::new(Take {
            inner,
            remaining: n,
        }))
    }

    pub fn skip(&mut self, n: usize) -> Result<Seq<'a, T>> {
        let inner = self.detach()?;
        Ok(Seq::new(Skip { inner, pending: n }))
    }

    /// Yields values while `predicate` holds, and ends the sequence at the
    /// first value it rejects.
    pub fn take_while<F>(&mut self, predicate: F) -> Result<Seq<'a, T>>
    where
        F: FnMut(&T) -> bool + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(TakeWhile {
            inner,
            predicate,
            finished: false,
        }))
    }

    /// Drops values while `predicate` holds. The predicate is not consulted
    /// again after it first rejects a value.
    pub fn skip_while<F>(&mut self, predicate: F) -> Result<Seq<'a, T>>
    where
        F: FnMut(&T) -> bool + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(SkipWhile {
            inner,
            predicate,
            skipping: true,
        }))
    }

    /// Yields the first value, then every `step`th one after it.
    pub fn step_by(&mut self, step: usize) -> Result<Seq<'a, T>> {
        self.ensure_live()?;
        if step == 0 {
            return Err(Error::new_invalid_argument("step", "step must be positive"));
        }
        let inner = self.detach()?;
        Ok(Seq::new(StepBy {
            inner,
            gap: step - 1,
            first: true,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::seq::tests::with_failures;

    use super::*;

    #[test]
    fn test_take_stops_pulling() -> anyhow::Result<()> {
        let pulls = Rc::new(RefCell::new(0));
        let mut seq = {
            let pulls = pulls.clone();
            Seq::from_fn(move || {
                *pulls.borrow_mut() += 1;
                Some(1)
            })
            .take(2)?
        };
        assert_eq!(seq.collect::<Vec<_>>()?, vec![1, 1]);
        assert_eq!(*pulls.borrow(), 2);
        Ok(())
    }

    #[test]
    fn test_take_more_than_available() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable([1, 2]).take(5)?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn test_skip() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable(1..=5).skip(3)?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![4, 5]);

        let mut past_end = Seq::from_iterable(1..=2).skip(3)?;
        assert_eq!(past_end.next()?, None);
        Ok(())
    }

    #[test]
    fn test_skip_resumes_after_source_error() -> anyhow::Result<()> {
        let mut source = with_failures(vec![Some(1), None, Some(3), Some(4), Some(5)]);
        let mut seq = source.skip(3)?;
        assert!(matches!(seq.next(), Err(Error::InvalidArgument { .. })));
        assert_eq!(seq.next()?, Some(5));
        assert_eq!(seq.next()?, None);
        Ok(())
    }

    #[test]
    fn test_take_while_halts_stream() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable([1, 2, 5, 1, 2]).take_while(|x| *x < 4)?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![1, 2]);

        let mut filtered = Seq::from_iterable([1, 2, 5, 1, 2]).filter(|x| *x < 4)?;
        assert_eq!(filtered.collect::<Vec<_>>()?, vec![1, 2, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_skip_while_tests_until_first_rejection() -> anyhow::Result<()> {
        let tested = Rc::new(RefCell::new(Vec::new()));
        let mut seq = {
            let tested = tested.clone();
            Seq::from_iterable([1, 2, 5, 1, 2]).skip_while(move |x| {
                tested.borrow_mut().push(*x);
                *x < 4
            })?
        };
        assert_eq!(seq.collect::<Vec<_>>()?, vec![5, 1, 2]);
        assert_eq!(*tested.borrow(), vec![1, 2, 5]);
        Ok(())
    }

    #[test]
    fn test_step_by() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable(0..10).step_by(3)?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![0, 3, 6, 9]);

        let mut single = Seq::from_iterable([7, 8]).step_by(1)?;
        assert_eq!(single.collect::<Vec<_>>()?, vec![7, 8]);
        Ok(())
    }

    #[test]
    fn test_step_by_zero_is_rejected() {
        let mut seq = Seq::from_iterable(0..10);
        assert!(matches!(
            seq.step_by(0),
            Err(Error::InvalidArgument { name: "step", .. })
        ));
        assert!(!seq.is_consumed());
    }
}
