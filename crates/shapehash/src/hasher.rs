use std::{fmt, marker::PhantomData};

use crate::{error::ShapeError, plan::Plan, shape::Shape};

/// Seedable structural hasher for values of `T`. The plan is compiled once
/// in [`Hasher::new`]; every `hash` call reuses it without further shape
/// analysis, and calls touch only local state, so a single hasher can be
/// shared across threads.
pub struct Hasher<T: Shape> {
    plan: Plan,
    seed: usize,
    _value: PhantomData<fn(&T) -> usize>,
}

impl<T: Shape> Hasher<T> {
    /// Compiles the region plan for `T`. Fails if the shape cannot be
    /// hashed; see [`ShapeError`] for the reasons.
    pub fn new(seed: usize) -> Result<Self, ShapeError> {
        Ok(Self { plan: Plan::compile(T::SHAPE)?, seed, _value: PhantomData })
    }

    #[inline]
    pub fn hash(&self, value: &T) -> usize {
        let base = (value as *const T).cast::<u8>();
        // Safety: the plan was compiled from T's own layout description.
        unsafe { self.plan.hash_base(base, self.seed) }
    }

    pub fn seed(&self) -> usize {
        self.seed
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }
}

impl<T: Shape> Clone for Hasher<T> {
    fn clone(&self) -> Self {
        Self { plan: self.plan.clone(), seed: self.seed, _value: PhantomData }
    }
}

impl<T: Shape> fmt::Debug for Hasher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher").field("seed", &self.seed).field("plan", &self.plan).finish()
    }
}
