//! Splitting a sequence into two independently advancing engines.
//!
//! Both halves share the upstream engine and a backlog of the values the
//! lagging half has not seen yet. The receiver of the split keeps the raw
//! values, while the new half always gets duplicates.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{deep_clone::DeepClone, error::Result, source::Pull};

use super::Seq;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Original,
    Duplicate,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Side::Original => Side::Duplicate,
            Side::Duplicate => Side::Original,
        }
    }
}

struct Backlog<'a, T> {
    upstream: Seq<'a, T>,
    /// Values (and end markers) already pulled upstream but not yet seen by
    /// the `lagging` side.
    pending: VecDeque<Option<T>>,
    lagging: Side,
    duplicate: Box<dyn FnMut(&T) -> T + 'a>,
}

struct Branch<'a, T> {
    shared: Rc<RefCell<Backlog<'a, T>>>,
    side: Side,
}

impl<T> Pull<T> for Branch<'_, T> {
    fn pull(&mut self) -> Result<Option<T>> {
        let sibling_alive = Rc::strong_count(&self.shared) > 1;
        let mut guard = self.shared.borrow_mut();
        let backlog = &mut *guard;

        if backlog.lagging == self.side {
            if let Some(item) = backlog.pending.pop_front() {
                return Ok(item);
            }
        }

        let item = backlog.upstream.next()?;
        if !sibling_alive {
            return Ok(match self.side {
                Side::Original => item,
                Side::Duplicate => item.map(|value| (backlog.duplicate)(&value)),
            });
        }

        let (mine, theirs) = match item {
            None => (None, None),
            Some(value) => {
                let copy = (backlog.duplicate)(&value);
                match self.side {
                    Side::Original => (Some(value), Some(copy)),
                    Side::Duplicate => (Some(copy), Some(value)),
                }
            }
        };
        backlog.lagging = self.side.other();
        backlog.pending.push_back(theirs);

        let pending = backlog.pending.len();
        if pending >= 64 && pending.is_power_of_two() {
            tracing::trace!(pending, "fork backlog grew");
        }
        Ok(mine)
    }
}

impl<'a, T> Seq<'a, T>
where
    T: 'a,
{
    /// Splits off a copy of the remaining sequence, duplicating each value
    /// with `duplicate`.
    ///
    /// This engine keeps yielding the raw values. The returned engine yields
    /// the duplicates. Values are buffered until both sides have seen them,
    /// so letting one side run far ahead of the other grows the buffer.
    pub fn cloned_with<F>(&mut self, duplicate: F) -> Result<Seq<'a, T>>
    where
        F: FnMut(&T) -> T + 'a,
    {
        self.ensure_live()?;
        let fused = self.fused;
        let done = self.done;
        let shared = Rc::new(RefCell::new(Backlog {
            upstream: self.split_off(),
            pending: VecDeque::new(),
            lagging: Side::Original,
            duplicate: Box::new(duplicate),
        }));
        tracing::trace!("forked sequence");

        self.source = Box::new(Branch {
            shared: shared.clone(),
            side: Side::Original,
        });

        let mut twin = Seq::new(Branch {
            shared,
            side: Side::Duplicate,
        });
        twin.fused = fused;
        twin.done = done;
        Ok(twin)
    }

    /// Splits off a copy of the remaining sequence whose values are deep
    /// copies, so mutating a value taken from one side never shows through
    /// on the other.
    pub fn cloned(&mut self) -> Result<Seq<'a, T>>
    where
        T: DeepClone,
    {
        self.cloned_with(T::deep_clone)
    }

    pub fn copied(&mut self) -> Result<Seq<'a, T>>
    where
        T: Copy,
    {
        self.cloned_with(|value| *value)
    }
}
