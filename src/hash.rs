//! Hash pair and double-hashing probe sequence.
//!
//! Both hashes are polynomial rolling hashes over the key's bytes, evaluated
//! with Horner's rule and reduced after every step so long keys never
//! overflow the accumulator.

/// Base of the primary hash. Prime and larger than the byte alphabet.
pub const PRIME_1: u64 = 257;
/// Base of the step hash. Prime, larger than the byte alphabet, distinct from `PRIME_1`.
pub const PRIME_2: u64 = 263;

/// `Σ prime^(len-1-i) * key[i] mod modulus`, in `[0, modulus)`.
///
/// A `modulus` of 0 is treated as 1.
pub fn hash(key: &[u8], prime: u64, modulus: usize) -> usize {
    let m = modulus.max(1) as u128;
    let p = prime as u128 % m;
    let acc = key
        .iter()
        .fold(0u128, |acc, &b| (acc * p + b as u128) % m);
    acc as usize
}

/// Slot visited on the `attempt`-th probe for `key` in a table of `capacity` slots.
///
/// `(hash_a + attempt * (hash_b + 1)) mod capacity`, with
/// `hash_a = hash(key, PRIME_1, capacity)` and
/// `hash_b = hash(key, PRIME_2, capacity - 1)`.
///
/// Note the `capacity - 1` modulus for `hash_b`: reducing it modulo
/// `capacity` instead gives a different step for most keys, and for keys with
/// `hash_b == capacity - 1` a step of `capacity`, which never leaves the home
/// slot. With the `capacity - 1` modulus the step lies in `[1, capacity - 1]`
/// and, with a prime capacity, the first `capacity` attempts visit every slot
/// exactly once.
pub fn probe(key: &[u8], capacity: usize, attempt: usize) -> usize {
    let (home, step) = home_and_step(key, capacity);
    let cap = capacity.max(1) as u128;
    ((home as u128 + attempt as u128 * step as u128) % cap) as usize
}

fn home_and_step(key: &[u8], capacity: usize) -> (usize, usize) {
    let hash_a = hash(key, PRIME_1, capacity);
    let hash_b = hash(key, PRIME_2, capacity.saturating_sub(1));
    (hash_a, hash_b + 1)
}

/// The bounded probe sequence of a key: at most `capacity` slot indices.
///
/// Equivalent to `(0..capacity).map(|a| probe(key, capacity, a))` with both
/// hashes computed once.
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    index: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSeq {
    pub fn new(key: &[u8], capacity: usize) -> Self {
        let (home, step) = home_and_step(key, capacity);
        let capacity = capacity.max(1);
        Self {
            index: home,
            step: step % capacity,
            capacity,
            remaining: capacity,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.index;
        // index < capacity and step < capacity, so the sum cannot overflow
        // for any capacity an allocator can hand out.
        self.index = (self.index + self.step) % self.capacity;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
