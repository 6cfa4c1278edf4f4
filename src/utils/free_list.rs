use std::ops::{Index, IndexMut};

/// A reusable-slot pool addressed by integer handle.
///
/// Slots freed with [`erase`](FreeList::erase) are chained into an internal
/// free list and handed back by the next [`insert`](FreeList::insert), so
/// insert, erase and access are all O(1) and handles stay stable until
/// erased. [`clear`](FreeList::clear) drops everything in one go.
///
/// The quadtree uses this to recycle per-leaf gravity aggregates as leaves
/// split and the tree is rebuilt each frame.
///
/// # Examples
///
/// ```
/// use quadgrav::utils::FreeList;
///
/// let mut pool: FreeList<f64> = FreeList::new();
/// let a = pool.insert(1.5);
/// let b = pool.insert(2.5);
/// assert_eq!(pool[a], 1.5);
///
/// pool.erase(a);
/// // The freed slot is reused before the vector grows.
/// let c = pool.insert(3.5);
/// assert_eq!(c, a);
/// assert_eq!(pool[b], 2.5);
/// assert_eq!(pool.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FreeList<T> {
    slots: Vec<Slot<T>>,
    first_free: i32,
    len: usize,
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(T),
    /// Holds the handle of the next free slot, -1 at the chain's end.
    Vacant(i32),
}

impl<T> FreeList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            first_free: -1,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            first_free: -1,
            len: 0,
        }
    }

    /// Stores `value` in a reused or newly appended slot and returns its
    /// handle.
    pub fn insert(&mut self, value: T) -> i32 {
        self.len += 1;
        if self.first_free != -1 {
            let handle = self.first_free;
            match self.slots[handle as usize] {
                Slot::Vacant(next) => self.first_free = next,
                Slot::Occupied(_) => unreachable!("free chain points at an occupied slot"),
            }
            self.slots[handle as usize] = Slot::Occupied(value);
            handle
        } else {
            self.slots.push(Slot::Occupied(value));
            (self.slots.len() - 1) as i32
        }
    }

    /// Marks the slot as free and pushes it onto the free chain.
    ///
    /// Erasing a handle that is already free is a caller bug; the tree
    /// never double-frees an aggregate because a split frees exactly once
    /// per leaf-to-branch transition.
    pub fn erase(&mut self, handle: i32) {
        debug_assert!(
            matches!(self.slots.get(handle as usize), Some(Slot::Occupied(_))),
            "erase of vacant free-list handle {}",
            handle
        );
        self.slots[handle as usize] = Slot::Vacant(self.first_free);
        self.first_free = handle;
        self.len -= 1;
    }

    /// Drops all slots and the free chain in O(1); no per-element teardown.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.first_free = -1;
        self.len = 0;
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for FreeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<i32> for FreeList<T> {
    type Output = T;

    fn index(&self, handle: i32) -> &T {
        match &self.slots[handle as usize] {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("access to vacant free-list handle {}", handle),
        }
    }
}

impl<T> IndexMut<i32> for FreeList<T> {
    fn index_mut(&mut self, handle: i32) -> &mut T {
        match &mut self.slots[handle as usize] {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("access to vacant free-list handle {}", handle),
        }
    }
}
