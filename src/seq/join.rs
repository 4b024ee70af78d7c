use crate::{deep_clone::DeepClone, error::Result, source::Pull, IntoSeq};

use super::Seq;

struct Chain<'a, T> {
    /// Dropped once it reports end.
    first: Option<Seq<'a, T>>,
    second: Seq<'a, T>,
}

impl<T> Pull<T> for Chain<'_, T> {
    fn pull(&mut self) -> Result<Option<T>> {
        if let Some(first) = &mut self.first {
            if let Some(item) = first.next()? {
                return Ok(Some(item));
            }
            self.first = None;
        }
        self.second.next()
    }
}

struct Zip<'a, T, U> {
    left: Seq<'a, T>,
    right: Seq<'a, U>,
}

impl<T, U> Pull<(T, U)> for Zip<'_, T, U> {
    fn pull(&mut self) -> Result<Option<(T, U)>> {
        let Some(left) = self.left.next()? else {
            return Ok(None);
        };
        Ok(self.right.next()?.map(|right| (left, right)))
    }
}

struct Flatten<'a, T, U> {
    outer: Seq<'a, T>,
    current: Option<Seq<'a, U>>,
}

impl<'a, T, U> Pull<U> for Flatten<'a, T, U>
where
    T: IntoSeq<'a, Item = U>,
{
    fn pull(&mut self) -> Result<Option<U>> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(item) = current.next()? {
                    return Ok(Some(item));
                }
                self.current = None;
            }
            match self.outer.next()? {
                Some(nested) => self.current = Some(nested.into_seq()?),
                None => return Ok(None),
            }
        }
    }
}

struct Intersperse<'a, T, F> {
    inner: Seq<'a, T>,
    separator: F,
    /// Set after a value has been yielded, so a separator is due if another
    /// value follows.
    separator_due: bool,
}

impl<T, F> Pull<T> for Intersperse<'_, T, F>
where
    F: FnMut() -> T,
{
    fn pull(&mut self) -> Result<Option<T>> {
        if self.separator_due && self.inner.peek()?.is_some() {
            self.separator_due = false;
            return Ok(Some((self.separator)()));
        }
        let item = self.inner.next()?;
        self.separator_due = item.is_some();
        Ok(item)
    }
}

struct Cycle<'a, T> {
    /// The first pass, still being pulled.
    first_pass: Option<Seq<'a, T>>,
    /// Copies of every value the first pass yielded.
    replay: Vec<T>,
    position: usize,
}

impl<T> Pull<T> for Cycle<'_, T>
where
    T: DeepClone,
{
    fn pull(&mut self) -> Result<Option<T>> {
        if let Some(first_pass) = &mut self.first_pass {
            if let Some(item) = first_pass.next()? {
                self.replay.push(item.deep_clone());
                return Ok(Some(item));
            }
            self.first_pass = None;
        }
        if self.replay.is_empty() {
            return Ok(None);
        }
        if self.position == self.replay.len() {
            tracing::trace!(len = self.replay.len(), "restarting cycle");
            self.position = 0;
        }
        let item = self.replay[self.position].deep_clone();
        self.position += 1;
        Ok(Some(item))
    }
}

struct Rev<'a, T> {
    inner: Option<Seq<'a, T>>,
    items: Vec<T>,
}

impl<T> Pull<T> for Rev<'_, T> {
    fn pull(&mut self) -> Result<Option<T>> {
        if let Some(mut inner) = self.inner.take() {
            while let Some(item) = inner.next()? {
                self.items.push(item);
            }
        }
        Ok(self.items.pop())
    }
}

impl<'a, T> Seq<'a, T>
where
    T: 'a,
{
    /// Yields every value of this sequence, then every value of `other`.
    pub fn chain<O>(&mut self, other: O) -> Result<Seq<'a, T>>
    where
        O: IntoSeq<'a, Item = T>,
    {
        let (first, second) = self.detach_pair(other)?;
        Ok(Seq::new(Chain {
            first: Some(first),
            second,
        }))
    }

    /// Pairs values of both sequences in lock-step, ending as soon as either
    /// side does. When this side ends first, `other` is not pulled again.
    pub fn zip<O>(&mut self, other: O) -> Result<Seq<'a, (T, O::Item)>>
    where
        O: IntoSeq<'a>,
        O::Item: 'a,
    {
        let (left, right) = self.detach_pair(other)?;
        Ok(Seq::new(Zip { left, right }))
    }

    /// Concatenates the sequences each value converts into.
    ///
    /// A value that cannot be converted fails the pull that reaches it.
    pub fn flatten(&mut self) -> Result<Seq<'a, T::Item>>
    where
        T: IntoSeq<'a>,
        T::Item: 'a,
    {
        let outer = self.detach()?;
        Ok(Seq::new(Flatten {
            outer,
            current: None,
        }))
    }

    pub fn flat_map<V, F>(&mut self, f: F) -> Result<Seq<'a, V::Item>>
    where
        V: IntoSeq<'a> + 'a,
        V::Item: 'a,
        F: FnMut(T) -> V + 'a,
    {
        self.map(f)?.flatten()
    }

    /// Places a deep copy of `separator` between adjacent values.
    pub fn intersperse(&mut self, separator: T) -> Result<Seq<'a, T>>
    where
        T: DeepClone,
    {
        self.intersperse_with(move || separator.deep_clone())
    }

    /// Places a fresh `separator()` between adjacent values.
    pub fn intersperse_with<F>(&mut self, separator: F) -> Result<Seq<'a, T>>
    where
        F: FnMut() -> T + 'a,
    {
        let inner = self.detach()?;
        Ok(Seq::new(Intersperse {
            inner,
            separator,
            separator_due: false,
        }))
    }

    /// Repeats the sequence endlessly. Bound it with `take` or similar.
    ///
    /// The first pass is remembered, and every later pass yields fresh deep
    /// copies of it. A sequence that yields nothing ends instead of spinning.
    pub fn cycle(&mut self) -> Result<Seq<'a, T>>
    where
        T: DeepClone,
    {
        let first_pass = self.detach()?;
        Ok(Seq::new(Cycle {
            first_pass: Some(first_pass),
            replay: Vec::new(),
            position: 0,
        }))
    }

    /// Yields the remaining values in reverse order. The whole sequence is
    /// drained into memory on the first pull.
    pub fn rev(&mut self) -> Result<Seq<'a, T>> {
        let inner = self.detach()?;
        Ok(Seq::new(Rev {
            inner: Some(inner),
            items: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::{seq::tests::with_failures, Error, Value};

    use super::*;

    #[test]
    fn test_chain_preserves_order() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable([1, 2]).chain([3, 4])?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_chain_consumes_both() -> anyhow::Result<()> {
        let mut first = Seq::from_iterable([1]);
        let mut second = Seq::from_iterable([2]);
        let mut chained = first.chain(&mut second)?;
        assert!(first.is_consumed());
        assert!(second.is_consumed());
        assert!(matches!(second.next(), Err(Error::Consumed)));
        assert_eq!(chained.collect::<Vec<_>>()?, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn test_chain_with_consumed_other_leaves_receiver() -> anyhow::Result<()> {
        let mut first = Seq::from_iterable([1]);
        let mut second = Seq::from_iterable([2]);
        second.count()?;
        assert!(matches!(first.chain(&mut second), Err(Error::Consumed)));
        assert!(!first.is_consumed());
        assert_eq!(first.next()?, Some(1));
        Ok(())
    }

    #[test]
    fn test_zip_shorter_side_wins() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable(1..=5).zip([true, false, true])?;
        assert_eq!(seq.next()?, Some((1, true)));
        assert_eq!(seq.next()?, Some((2, false)));
        assert_eq!(seq.next()?, Some((3, true)));
        assert_eq!(seq.next()?, None);
        Ok(())
    }

    #[test]
    fn test_zip_does_not_pull_right_after_left_ends() -> anyhow::Result<()> {
        let mut right = Seq::from_iterable([10, 20, 30]);
        let mut zipped = Seq::from_iterable([1]).zip(right.by_ref()?)?;
        assert_eq!(zipped.count()?, 1);
        drop(zipped);
        assert_eq!(right.next()?, Some(20));
        Ok(())
    }

    #[test]
    fn test_chain_passes_errors_from_either_side() -> anyhow::Result<()> {
        let mut first = with_failures(vec![None, Some(1)]);
        let mut seq = first.chain(with_failures(vec![None]))?;
        assert!(seq.next().is_err());
        assert_eq!(seq.next()?, Some(1));
        assert!(seq.next().is_err());
        assert_eq!(seq.next()?, None);
        Ok(())
    }

    #[test]
    fn test_zip_error_on_left_does_not_pull_right() -> anyhow::Result<()> {
        let mut right = Seq::from_iterable([10, 20, 30]);
        let items = vec![Some(1), None, Some(3)];
        let mut zipped = with_failures(items).zip(right.by_ref()?)?;
        assert_eq!(zipped.next()?, Some((1, 10)));
        assert!(matches!(zipped.next(), Err(Error::InvalidArgument { .. })));
        assert_eq!(zipped.next()?, Some((3, 20)));
        drop(zipped);
        assert_eq!(right.next()?, Some(30));
        Ok(())
    }

    #[test]
    fn test_flatten() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable([vec![1, 2], vec![], vec![3]]).flatten()?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_flatten_values() -> anyhow::Result<()> {
        let mut seq = Value::parse("((1 2) (3) \"ab\")")?.into_seq()?.flatten()?;
        assert_eq!(
            seq.collect::<Vec<_>>()?,
            vec![
                Value::from(1),
                Value::from(2),
                Value::from(3),
                Value::from("a"),
                Value::from("b"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_flatten_rejects_non_iterable() -> anyhow::Result<()> {
        let mut seq = Value::parse("((1) 2 (3))")?.into_seq()?.flatten()?;
        assert_eq!(seq.next()?, Some(Value::from(1)));
        assert!(matches!(seq.next(), Err(Error::NotIterable { .. })));
        Ok(())
    }

    #[test]
    fn test_flat_map() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable([1, 3]).flat_map(|x| [x, x + 1])?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_intersperse_has_no_trailing_separator() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable([1, 2, 3]).intersperse(0)?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![1, 0, 2, 0, 3]);

        let mut single = Seq::from_iterable([1]).intersperse(0)?;
        assert_eq!(single.collect::<Vec<_>>()?, vec![1]);

        let mut empty = Seq::<i32>::empty().intersperse(0)?;
        assert_eq!(empty.next()?, None);
        Ok(())
    }

    #[test]
    fn test_intersperse_copies_separator() -> anyhow::Result<()> {
        let separator = Value::new_list([]);
        let mut seq = Seq::from_iterable([Value::from(1), Value::from(2), Value::from(3)])
            .intersperse(separator.clone())?;
        let items = seq.collect::<Vec<_>>()?;
        items[1].push(Value::from(9))?;
        assert_eq!(items[3], Value::new_list([]));
        assert_eq!(separator, Value::new_list([]));
        Ok(())
    }

    #[test]
    fn test_intersperse_with() -> anyhow::Result<()> {
        let counter = Rc::new(RefCell::new(0));
        let mut seq = {
            let counter = counter.clone();
            Seq::from_iterable([10, 20, 30]).intersperse_with(move || {
                *counter.borrow_mut() += 1;
                *counter.borrow()
            })?
        };
        assert_eq!(seq.collect::<Vec<_>>()?, vec![10, 1, 20, 2, 30]);
        Ok(())
    }

    #[test]
    fn test_cycle() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable([1, 2, 3]).cycle()?.take(7)?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![1, 2, 3, 1, 2, 3, 1]);
        Ok(())
    }

    #[test]
    fn test_cycle_of_empty_ends() -> anyhow::Result<()> {
        let mut seq = Seq::<i32>::empty().cycle()?;
        assert_eq!(seq.next()?, None);
        Ok(())
    }

    #[test]
    fn test_cycle_passes_do_not_share_values() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable([Value::new_list([])]).cycle()?;
        let first = seq
            .next()?
            .ok_or_else(|| anyhow::anyhow!("missing first pass"))?;
        first.push(Value::from(1))?;
        let second = seq
            .next()?
            .ok_or_else(|| anyhow::anyhow!("missing second pass"))?;
        assert_eq!(second, Value::new_list([]));
        Ok(())
    }

    #[test]
    fn test_rev() -> anyhow::Result<()> {
        let mut seq = Seq::from_iterable(1..=4).rev()?;
        assert_eq!(seq.collect::<Vec<_>>()?, vec![4, 3, 2, 1]);
        Ok(())
    }
}
