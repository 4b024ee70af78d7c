//! Lazy, pull-based sequences.
//!
//! A [`Seq`] pulls elements from its source only on demand. Combinators and
//! terminals take the remaining sequence over, leaving the original consumed,
//! while [`Seq::cloned`] forks a sequence into two independent cursors.
//!
//! ```
//! use lazyseq::seq;
//!
//! # fn main() -> lazyseq::Result<()> {
//! let evens = seq(1..)?.filter(|n| n % 2 == 0)?.take(3)?.collect::<Vec<i32>>()?;
//! assert_eq!(evens, vec![2, 4, 6]);
//! # Ok(())
//! # }
//! ```

mod convert;
mod deep_clone;
mod error;
mod seq;
mod source;
mod value;

pub use convert::{seq, IntoSeq};
pub use deep_clone::DeepClone;
pub use error::{Error, Result};
pub use seq::{Advance, Iter, Seq};
pub use source::{Empty, FromFn, IterSource, Pull, TryFromFn};
pub use value::{Integer, Value};
