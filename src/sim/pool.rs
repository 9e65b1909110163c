//! Fixed-capacity entity pools
//!
//! Slots are found by a linear scan for the first dead one. A full pool drops
//! the spawn request. Each slot carries a generation that is bumped when the
//! slot is freed, so a handle held past its entity's death resolves to `None`
//! instead of silently aliasing the next occupant.

use std::fmt;
use std::marker::PhantomData;

/// Stable reference to a pool slot
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index as u32,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index inside the pool
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

// Manual impls: derives would require `T: Clone` etc.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    alive: bool,
    value: T,
}

/// Fixed-size slot array with liveness flags
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    live: usize,
}

impl<T: Default> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                alive: false,
                value: T::default(),
            })
            .collect();
        Self { slots, live: 0 }
    }

    /// Place `value` in the first dead slot. `None` when the pool is full.
    pub fn allocate(&mut self, value: T) -> Option<Handle<T>> {
        let index = self.slots.iter().position(|s| !s.alive)?;
        let slot = &mut self.slots[index];
        slot.value = value;
        slot.alive = true;
        self.live += 1;
        Some(Handle::new(index, slot.generation))
    }

    /// Mark a slot dead. Returns false for stale or already-dead handles.
    pub fn free(&mut self, handle: Handle<T>) -> bool {
        match self.slots.get_mut(handle.index()) {
            Some(slot) if slot.alive && slot.generation == handle.generation => {
                slot.alive = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.live -= 1;
                true
            }
            _ => false,
        }
    }
}

impl<T> Pool<T> {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live slots
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_full(&self) -> bool {
        self.live == self.slots.len()
    }

    pub fn is_alive(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|s| s.alive && s.generation == handle.generation)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|s| s.alive && s.generation == handle.generation)
            .map(|s| &mut s.value)
    }

    /// Live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.alive)
            .map(|(i, s)| (Handle::new(i, s.generation), &s.value))
    }

    /// Snapshot of live handles, for loops that spawn or kill while iterating
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.iter().map(|(h, _)| h).collect()
    }
}
