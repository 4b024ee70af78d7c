use crate::{error::Result, source::IterSource, Seq};

/// Conversion into a [`Seq`].
///
/// This is how combinators such as `chain`, `zip` and `flatten` accept their
/// operands. Conversion may fail for dynamically typed values that turn out
/// not to be sequences.
pub trait IntoSeq<'a> {
    type Item;

    fn into_seq(self) -> Result<Seq<'a, Self::Item>>;
}

impl<'a, I> IntoSeq<'a> for I
where
    I: IntoIterator,
    I::IntoIter: 'a,
{
    type Item = I::Item;

    fn into_seq(self) -> Result<Seq<'a, I::Item>> {
        Ok(Seq::new(IterSource::new(self.into_iter())))
    }
}

impl<'a, T> IntoSeq<'a> for Seq<'a, T> {
    type Item = T;

    fn into_seq(self) -> Result<Seq<'a, T>> {
        Ok(self)
    }
}

/// Hands the remaining sequence off, leaving the original consumed.
impl<'a, T> IntoSeq<'a> for &mut Seq<'a, T> {
    type Item = T;

    fn into_seq(self) -> Result<Seq<'a, T>> {
        self.detach()
    }
}

/// Builds a sequence from anything that converts into one.
pub fn seq<'a, S>(source: S) -> Result<Seq<'a, S::Item>>
where
    S: IntoSeq<'a>,
{
    source.into_seq()
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::*;

    #[test]
    fn test_seq_from_collections() -> anyhow::Result<()> {
        assert_eq!(seq(vec![1, 2])?.collect::<Vec<_>>()?, vec![1, 2]);
        assert_eq!(seq(Some('x'))?.collect::<String>()?, "x");
        assert_eq!(seq("ab".chars())?.count()?, 2);
        Ok(())
    }

    #[test]
    fn test_seq_from_seq_is_identity() -> anyhow::Result<()> {
        let mut original = Seq::from_iterable([1, 2, 3]);
        original.next()?;
        assert_eq!(seq(original)?.collect::<Vec<_>>()?, vec![2, 3]);
        Ok(())
    }

    #[test]
    fn test_seq_from_borrowed_seq_hands_off() -> anyhow::Result<()> {
        let mut original = Seq::from_iterable([1, 2, 3]);
        assert_eq!(original.peek()?, Some(&1));
        let mut taken = seq(&mut original)?;
        assert!(matches!(original.next(), Err(Error::Consumed)));
        assert_eq!(taken.collect::<Vec<_>>()?, vec![1, 2, 3]);
        Ok(())
    }
}
