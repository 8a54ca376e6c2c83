use crate::{Cell, Triplet};

/// Number of live cells
pub trait Population {
    fn population(&self) -> u64;
    fn is_empty(&self) -> bool;
}
impl<'a, T> Population for &'a T
where
    T: Population + ?Sized,
{
    fn population(&self) -> u64 {
        (**self).population()
    }
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl Population for bool {
    fn population(&self) -> u64 {
        u64::from(*self)
    }
    fn is_empty(&self) -> bool {
        !*self
    }
}

impl Population for Cell {
    fn population(&self) -> u64 {
        u64::from(self.is_alive())
    }
    fn is_empty(&self) -> bool {
        !self.is_alive()
    }
}

impl Population for Triplet {
    fn population(&self) -> u64 {
        self.states().count_ones().into()
    }
    fn is_empty(&self) -> bool {
        self.states() == 0
    }
}

impl<T> Population for [T]
where
    T: Population,
{
    fn population(&self) -> u64 {
        self.iter().map(T::population).sum()
    }
    fn is_empty(&self) -> bool {
        self.iter().all(T::is_empty)
    }
}
