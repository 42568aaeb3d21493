use crate::bitvec::{BitVector, MAX_WIDTH};
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid domain literal \"{literal}\": {reason}")]
    InvalidDomainSpec { literal: String, reason: String },

    #[error("width mismatch: domain has {expected} bits, value has {found} bits")]
    WidthMismatch { expected: u32, found: u32 },

    #[error("domain is empty (some bit is forced to 0 and 1 at the same time)")]
    EmptyDomain,
}

/// A three-valued bit-vector domain.
///
/// Bit `i` of a member `x` is forced to 1 if `lo[i] == 1` and forced to 0 if `hi[i] == 0`, all
/// other bits are free. A domain with `lo & !hi != 0` is empty and only ever produced by
/// [`BvDomain::new`] or [`BvDomain::intersect`]; check with [`BvDomain::is_valid`] or
/// [`BvDomain::validate`] before using it.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct BvDomain {
    lo: BitVector,
    hi: BitVector,
}

impl BvDomain {
    /// Creates a domain from its bounds without checking validity.
    pub fn new(lo: BitVector, hi: BitVector) -> Self {
        assert_eq!(
            lo.width(),
            hi.width(),
            "domain bounds have to be of the same width"
        );

        Self { lo, hi }
    }

    pub fn try_new(lo: BitVector, hi: BitVector) -> Result<Self, DomainError> {
        if lo.width() != hi.width() {
            return Err(DomainError::WidthMismatch {
                expected: lo.width(),
                found: hi.width(),
            });
        }

        Self { lo, hi }.validate()
    }

    /// singleton domain with all bits fixed to `value`
    pub fn from_value(value: BitVector) -> Self {
        Self {
            lo: value,
            hi: value,
        }
    }

    /// all bits free
    pub fn unconstrained(width: u32) -> Self {
        Self {
            lo: BitVector::zero(width),
            hi: BitVector::ones(width),
        }
    }

    pub fn lo(&self) -> BitVector {
        self.lo
    }

    pub fn hi(&self) -> BitVector {
        self.hi
    }

    pub fn width(&self) -> u32 {
        self.lo.width()
    }

    pub fn is_valid(&self) -> bool {
        (self.lo & !self.hi).is_zero()
    }

    pub fn validate(self) -> Result<Self, DomainError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(DomainError::EmptyDomain)
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.lo == self.hi
    }

    pub fn has_fixed_bits(&self) -> bool {
        !self.fixed_bits().is_zero()
    }

    /// 1 at every fixed bit position
    pub fn fixed_bits(&self) -> BitVector {
        !(self.lo ^ self.hi)
    }

    /// 1 at every free bit position
    pub fn free_bits(&self) -> BitVector {
        !self.lo & self.hi
    }

    pub fn num_free_bits(&self) -> u32 {
        self.free_bits().count_ones()
    }

    pub fn fixed_value(&self) -> Option<BitVector> {
        if self.is_fixed() {
            Some(self.lo)
        } else {
            None
        }
    }

    pub fn is_fixed_bit(&self, n: u32) -> bool {
        self.lo.bit(n) == self.hi.bit(n)
    }

    pub fn contains(&self, value: BitVector) -> Result<bool, DomainError> {
        if value.width() != self.width() {
            return Err(DomainError::WidthMismatch {
                expected: self.width(),
                found: value.width(),
            });
        }

        Ok(self.mcb(value))
    }

    /// matches constant bits: `value` is a member of this domain
    pub(crate) fn mcb(&self, value: BitVector) -> bool {
        (self.hi & value == value) && (self.lo | value == value)
    }

    /// Members of `self` that are also members of `other`; the result may be empty.
    pub fn intersect(&self, other: &BvDomain) -> BvDomain {
        Self::new(self.lo | other.lo, self.hi & other.hi)
    }

    /// Overwrites the fixed bits of `value` with the values of this domain.
    pub fn force_fixed_bits(&self, value: BitVector) -> BitVector {
        (self.lo | value) & self.hi
    }

    /// Fits a partially determined value into this domain.
    ///
    /// The bits of `value` selected by `care` have to be taken as they are, all other bits take
    /// the domain's fixed value where there is one and the bit of `value` otherwise. Returns
    /// `None` if a fixed bit conflicts with a cared-for bit of `value`.
    pub(crate) fn fit(&self, value: BitVector, care: BitVector) -> Option<BitVector> {
        if ((value ^ self.lo) & self.fixed_bits() & care).is_zero() {
            Some((value & care) | (self.force_fixed_bits(value) & !care))
        } else {
            None
        }
    }

    /// smallest member that is greater than or equal to `value`
    pub fn next_member_at_least(&self, value: BitVector) -> Option<BitVector> {
        if self.mcb(value) {
            return Some(value);
        }

        // above the highest conflicting bit the member has to agree with value, at the position
        // where it first exceeds value it has to set a bit that value clears
        let conflicts = (value ^ self.lo) & self.fixed_bits();
        let highest = 63 - conflicts.value().leading_zeros();
        let width = self.width();

        (highest..width)
            .find(|&i| !value.bit(i) && self.hi.bit(i))
            .map(|i| {
                let above = upper_bits(i + 1, width);
                (value & above) | BitVector::new(1 << i, width) | (self.lo & !above)
            })
    }

    /// largest member that is less than or equal to `value`
    pub fn prev_member_at_most(&self, value: BitVector) -> Option<BitVector> {
        if self.mcb(value) {
            return Some(value);
        }

        let conflicts = (value ^ self.lo) & self.fixed_bits();
        let highest = 63 - conflicts.value().leading_zeros();
        let width = self.width();

        (highest..width)
            .find(|&i| value.bit(i) && !self.lo.bit(i))
            .map(|i| {
                let above = upper_bits(i + 1, width);
                let below = !(above | BitVector::new(1 << i, width));
                (value & above) | (self.hi & below)
            })
    }

    /// smallest member
    pub fn min(&self) -> BitVector {
        self.lo
    }

    /// largest member
    pub fn max(&self) -> BitVector {
        self.hi
    }

    /// uniformly distributed random member
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BitVector {
        debug_assert!(self.is_valid(), "can not sample from an empty domain");

        self.force_fixed_bits(BitVector::new(rng.gen::<u64>(), self.width()))
    }
}

/// mask of all bits at position `from` and above
fn upper_bits(from: u32, width: u32) -> BitVector {
    BitVector::ones(width) << from
}

impl FromStr for BvDomain {
    type Err = DomainError;

    /// Parses a literal over `{0, 1, x}`, most significant bit first.
    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| DomainError::InvalidDomainSpec {
            literal: literal.to_string(),
            reason,
        };

        let width = literal.chars().count();

        if width == 0 || width > MAX_WIDTH as usize {
            return Err(invalid(format!(
                "has {} bits, expected 1 to {}",
                width, MAX_WIDTH
            )));
        }

        let (lo, hi) = literal
            .chars()
            .enumerate()
            .try_fold((0_u64, 0_u64), |(lo, hi), (i, c)| {
                let (l, h) = match c {
                    '0' => (0, 0),
                    '1' => (1, 1),
                    'x' => (0, 1),
                    _ => return Err(invalid(format!("unexpected '{}' at position {}", c, i))),
                };
                Ok(((lo << 1) | l, (hi << 1) | h))
            })?;

        let width = width as u32;

        Ok(Self::new(BitVector::new(lo, width), BitVector::new(hi, width)))
    }
}

impl fmt::Display for BvDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literal = (0..self.width())
            .rev()
            .map(|b| match (self.lo.bit(b), self.hi.bit(b)) {
                (false, false) => '0',
                (false, true) => 'x',
                (true, true) => '1',
                (true, false) => '?',
            })
            .collect::<String>();

        write!(f, "{}", literal)
    }
}

impl fmt::Debug for BvDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self)
    }
}
