use crate::bitvec::BitVector;
use crate::domain::{BvDomain, DomainError};
use log::trace;
use rand::Rng;

/// Enumerates all members of a [`BvDomain`] exactly once, in a pseudo-random order.
///
/// The `2^k` members (with `k` free bits) are indexed by `k`-bit numbers. A pass visits the
/// indices in the order `i -> a * i + c (mod 2^k)` with an odd multiplier `a`, which is a
/// permutation. `a` and `c` are drawn from the RNG given on construction, so the sequence is
/// reproducible from a seed without materializing the domain.
#[derive(Clone, Debug)]
pub struct DomainGenerator {
    domain: BvDomain,
    free: Vec<u32>,
    count: u128,
    emitted: u128,
    multiplier: u128,
    offset: u128,
}

impl DomainGenerator {
    pub fn new<R: Rng + ?Sized>(domain: BvDomain, rng: &mut R) -> Result<Self, DomainError> {
        let domain = domain.validate()?;

        let free_bits = domain.free_bits();
        let free = (0..domain.width())
            .filter(|b| free_bits.bit(*b))
            .collect::<Vec<_>>();

        let count = 1_u128 << free.len();

        trace!(
            "generator: {} with {} free bits ({} values)",
            domain,
            free.len(),
            count
        );

        Ok(Self {
            domain,
            free,
            count,
            emitted: 0,
            multiplier: (rng.gen::<u64>() | 1) as u128,
            offset: rng.gen::<u64>() as u128,
        })
    }

    pub fn domain(&self) -> &BvDomain {
        &self.domain
    }

    pub fn has_next(&self) -> bool {
        self.emitted < self.count
    }

    /// number of values left in this pass
    pub fn remaining(&self) -> u128 {
        self.count - self.emitted
    }

    /// restarts the pass, the same sequence is emitted again
    pub fn reset(&mut self) {
        self.emitted = 0;
    }

    /// the value with the given index, whose bits are deposited into the free positions
    fn member(&self, index: u128) -> BitVector {
        let deposited = self
            .free
            .iter()
            .enumerate()
            .filter(|(i, _)| (index >> i) & 1 == 1)
            .fold(0_u64, |acc, (_, b)| acc | (1 << b));

        self.domain.lo() | BitVector::new(deposited, self.domain.width())
    }
}

impl Iterator for DomainGenerator {
    type Item = BitVector;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }

        let index = self
            .multiplier
            .wrapping_mul(self.emitted)
            .wrapping_add(self.offset)
            & (self.count - 1);

        self.emitted += 1;

        Some(self.member(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();

        if remaining > usize::max_value() as u128 {
            (usize::max_value(), None)
        } else {
            (remaining as usize, Some(remaining as usize))
        }
    }
}
