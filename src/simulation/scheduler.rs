use std::marker::PhantomData;
use std::ops::Range;

use crate::particles::Particle;

/// Splits `0..len` into at most `workers` contiguous, near-equal ranges.
/// The last range absorbs the remainder; empty ranges are never produced.
pub(crate) fn chunk_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 || workers == 0 {
        return Vec::new();
    }
    let workers = workers.min(len);
    let base = len / workers;
    (0..workers)
        .map(|w| {
            let start = w * base;
            let end = if w + 1 == workers { len } else { start + base };
            start..end
        })
        .collect()
}

/// Shared view of the particle buffer for the leaf-parallel force phase.
///
/// Leaf membership partitions the particle index space, and the scheduler
/// hands whole leaves to a single task, so concurrent tasks never touch
/// the same particle. That invariant is what makes the `Sync` impl sound;
/// it is exercised by the single-vs-multi-thread equivalence test.
pub(crate) struct SharedParticles<'a> {
    ptr: *mut Particle,
    len: usize,
    _marker: PhantomData<&'a mut [Particle]>,
}

unsafe impl Send for SharedParticles<'_> {}
unsafe impl Sync for SharedParticles<'_> {}

impl<'a> SharedParticles<'a> {
    pub fn new(particles: &'a mut [Particle]) -> Self {
        Self {
            ptr: particles.as_mut_ptr(),
            len: particles.len(),
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// The caller must guarantee `index` is in bounds and that no other
    /// task holds a reference to the same particle. The frame scheduler
    /// guarantees the latter by assigning leaves wholesale to one task.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_mut(&self, index: usize) -> &mut Particle {
        debug_assert!(index < self.len);
        &mut *self.ptr.add(index)
    }
}
