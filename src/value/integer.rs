use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Mul},
    rc::Rc,
};

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};

use crate::DeepClone;

#[derive(Clone, Debug)]
enum IntegerInner {
    Compact(i64),
    Big(Rc<BigInt>),
}

/// An integer that is stored inline while it fits in an `i64`, and promoted
/// to a big integer otherwise.
#[derive(Clone, Debug)]
pub struct Integer(IntegerInner);

impl Integer {
    pub fn to_compact_integer(&self) -> Option<i64> {
        match &self.0 {
            IntegerInner::Compact(i) => Some(*i),
            IntegerInner::Big(i) => i.to_i64(),
        }
    }

    pub fn to_big_integer(&self) -> BigInt {
        match &self.0 {
            IntegerInner::Compact(i) => BigInt::from(*i),
            IntegerInner::Big(i) => (**i).clone(),
        }
    }

    pub fn normalize(&mut self) {
        match &self.0 {
            IntegerInner::Compact(_) => {}
            IntegerInner::Big(i) => {
                if let Some(i) = i.to_i64() {
                    self.0 = IntegerInner::Compact(i);
                }
            }
        }
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(i1), Some(i2)) = (self.to_compact_integer(), other.to_compact_integer()) {
            i1 == i2
        } else if let (IntegerInner::Big(i1), IntegerInner::Big(i2)) = (&self.0, &other.0) {
            i1 == i2
        } else {
            false
        }
    }
}

impl Eq for Integer {}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (IntegerInner::Compact(i1), IntegerInner::Compact(i2)) => i1.cmp(i2),
            _ => self.to_big_integer().cmp(&other.to_big_integer()),
        }
    }
}

impl From<i64> for Integer {
    fn from(i: i64) -> Self {
        Integer(IntegerInner::Compact(i))
    }
}

impl From<BigInt> for Integer {
    fn from(i: BigInt) -> Self {
        Integer(if let Some(i) = i.to_i64() {
            IntegerInner::Compact(i)
        } else {
            IntegerInner::Big(Rc::new(i))
        })
    }
}

impl Add for Integer {
    type Output = Integer;

    fn add(self, rhs: Self) -> Self::Output {
        if let (IntegerInner::Compact(i1), IntegerInner::Compact(i2)) = (&self.0, &rhs.0) {
            if let Some(sum) = i1.checked_add(*i2) {
                return Integer::from(sum);
            }
        }
        Integer::from(self.to_big_integer() + rhs.to_big_integer())
    }
}

impl Mul for Integer {
    type Output = Integer;

    fn mul(self, rhs: Self) -> Self::Output {
        if let (IntegerInner::Compact(i1), IntegerInner::Compact(i2)) = (&self.0, &rhs.0) {
            if let Some(product) = i1.checked_mul(*i2) {
                return Integer::from(product);
            }
        }
        Integer::from(self.to_big_integer() * rhs.to_big_integer())
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Integer::from(0)
    }

    fn is_zero(&self) -> bool {
        self.to_compact_integer() == Some(0)
    }
}

impl One for Integer {
    fn one() -> Self {
        Integer::from(1)
    }
}

impl ToPrimitive for Integer {
    fn to_i64(&self) -> Option<i64> {
        self.to_compact_integer()
    }

    fn to_u64(&self) -> Option<u64> {
        match &self.0 {
            IntegerInner::Compact(i) => i.to_u64(),
            IntegerInner::Big(i) => i.to_u64(),
        }
    }

    fn to_i128(&self) -> Option<i128> {
        match &self.0 {
            IntegerInner::Compact(i) => Some(i128::from(*i)),
            IntegerInner::Big(i) => i.to_i128(),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match &self.0 {
            IntegerInner::Compact(i) => i.to_f64(),
            IntegerInner::Big(i) => i.to_f64(),
        }
    }
}

impl num_traits::NumCast for Integer {
    /// Accepts anything integral. Values with a fractional part are rejected
    /// rather than truncated.
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        if let Some(i) = n.to_i64() {
            if n.to_f64().is_some_and(|f| f.fract() != 0.0) {
                return None;
            }
            return Some(<Integer as From<i64>>::from(i));
        }
        if n.to_f64().is_some_and(|f| f.fract() != 0.0) {
            return None;
        }
        n.to_i128()
            .map(BigInt::from)
            .or_else(|| n.to_u128().map(BigInt::from))
            .map(<Integer as From<BigInt>>::from)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            IntegerInner::Compact(i) => write!(f, "{i}"),
            IntegerInner::Big(i) => write!(f, "{i}"),
        }
    }
}

impl DeepClone for Integer {
    fn deep_clone(&self) -> Self {
        self.clone()
    }
}
