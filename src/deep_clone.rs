use std::{cell::RefCell, collections::VecDeque, rc::Rc};

/// Structural copying.
///
/// Unlike [`Clone`], which may share structure behind an `Rc`, a deep clone
/// never shares mutable state with the original.
pub trait DeepClone {
    fn deep_clone(&self) -> Self;
}

macro_rules! deep_clone_by_clone {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DeepClone for $ty {
                fn deep_clone(&self) -> Self {
                    self.clone()
                }
            }
        )*
    };
}

deep_clone_by_clone!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    num_bigint::BigInt,
);

impl DeepClone for &str {
    fn deep_clone(&self) -> Self {
        self
    }
}

impl<T> DeepClone for Box<T>
where
    T: DeepClone,
{
    fn deep_clone(&self) -> Self {
        Box::new((**self).deep_clone())
    }
}

impl<T> DeepClone for Rc<T>
where
    T: DeepClone,
{
    fn deep_clone(&self) -> Self {
        Rc::new((**self).deep_clone())
    }
}

impl<T> DeepClone for RefCell<T>
where
    T: DeepClone,
{
    fn deep_clone(&self) -> Self {
        RefCell::new(self.borrow().deep_clone())
    }
}

impl<T> DeepClone for Option<T>
where
    T: DeepClone,
{
    fn deep_clone(&self) -> Self {
        self.as_ref().map(DeepClone::deep_clone)
    }
}

impl<T> DeepClone for Vec<T>
where
    T: DeepClone,
{
    fn deep_clone(&self) -> Self {
        self.iter().map(DeepClone::deep_clone).collect()
    }
}

impl<T> DeepClone for VecDeque<T>
where
    T: DeepClone,
{
    fn deep_clone(&self) -> Self {
        self.iter().map(DeepClone::deep_clone).collect()
    }
}

macro_rules! deep_clone_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> DeepClone for ($($name,)+)
        where
            $($name: DeepClone),+
        {
            #[allow(non_snake_case)]
            fn deep_clone(&self) -> Self {
                let ($($name,)+) = self;
                ($($name.deep_clone(),)+)
            }
        }
    };
}

deep_clone_tuple!(A);
deep_clone_tuple!(A, B);
deep_clone_tuple!(A, B, C);
deep_clone_tuple!(A, B, C, D);
