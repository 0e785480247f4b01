use rand::{
    seq::{index, SliceRandom},
    Rng,
};

/// Selects up to `capacity` items uniformly without replacement from a
/// stream of unknown length, holding at most `capacity` items at a time.
pub(super) struct Reservoir<T> {
    capacity: usize,
    seen: usize,
    items: Vec<T>,
}

impl<T> Reservoir<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seen: 0,
            items: Vec::new(),
        }
    }

    /// Offers the next item of the stream.
    pub fn offer<R: Rng + ?Sized>(&mut self, item: T, rng: &mut R) {
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else {
            let slot = rng.gen_range(0..=self.seen);
            if slot < self.capacity {
                self.items[slot] = item;
            }
        }
        self.seen += 1;
    }

    /// Returns the selected items in random order.
    pub fn into_shuffled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Vec<T> {
        // Replaced items keep their slot, so the slot order is not random.
        self.items.shuffle(rng);
        self.items
    }
}

/// Returns `min(count, len)` distinct indices into `0..len` in random order.
pub(super) fn choose<R: Rng + ?Sized>(len: usize, count: usize, rng: &mut R) -> Vec<usize> {
    index::sample(rng, len, count.min(len)).into_vec()
}

/// Returns a random permutation of `0..len`.
pub(super) fn permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}
