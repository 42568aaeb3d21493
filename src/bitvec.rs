use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};
use std::str::FromStr;
use thiserror::Error;

pub const MAX_WIDTH: u32 = 64;

/// A fixed-width bit vector of up to 64 bits.
///
/// The value is always kept truncated to `width` bits, so all arithmetic wraps around modulo
/// `2^width`. Binary operations on bit vectors of different widths are programming errors and
/// panic.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct BitVector {
    value: u64,
    width: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseBitVectorError {
    #[error("bit vectors have to be 1 to 64 bits wide, got {0}")]
    InvalidWidth(usize),

    #[error("radix {0} is not supported (only 2, 10 and 16)")]
    UnsupportedRadix(u32),

    #[error("invalid digit '{digit}' in \"{literal}\"")]
    InvalidDigit { literal: String, digit: char },

    #[error("\"{literal}\" does not fit into {width} bits")]
    Overflow { literal: String, width: u32 },
}

pub(crate) fn mask(width: u32) -> u64 {
    debug_assert!(width >= 1 && width <= MAX_WIDTH);

    if width == MAX_WIDTH {
        u64::max_value()
    } else {
        (1_u64 << width) - 1
    }
}

impl BitVector {
    pub fn new(value: u64, width: u32) -> Self {
        assert!(
            width >= 1 && width <= MAX_WIDTH,
            "bit vector width has to be in range 1 - 64, got {}",
            width
        );

        Self {
            value: value & mask(width),
            width,
        }
    }

    pub fn zero(width: u32) -> Self {
        Self::new(0, width)
    }

    pub fn one(width: u32) -> Self {
        Self::new(1, width)
    }

    pub fn ones(width: u32) -> Self {
        Self::new(u64::max_value(), width)
    }

    pub fn from_bool(b: bool) -> Self {
        Self::new(b as u64, 1)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    pub fn is_ones(&self) -> bool {
        self.value == mask(self.width)
    }

    pub fn is_true(&self) -> bool {
        self.width == 1 && self.value == 1
    }

    pub fn odd(&self) -> bool {
        self.value % 2 == 1
    }

    pub fn bit(&self, n: u32) -> bool {
        assert!(n < self.width, "bit {} out of range for {}", n, self.width);

        (self.value >> n) & 1 == 1
    }

    /// number of trailing zeros, the width for zero
    pub fn ctz(&self) -> u32 {
        if self.value == 0 {
            self.width
        } else {
            self.value.trailing_zeros()
        }
    }

    pub fn count_ones(&self) -> u32 {
        self.value.count_ones()
    }

    /// The multiplicative inverse modulo `2^width`, which exists iff the value is odd.
    pub fn modinverse(&self) -> Option<BitVector> {
        if !self.odd() {
            return None;
        }

        // Newton iteration doubles the number of correct low bits in every step, the initial
        // guess is correct in 3 bits (a * a == 1 mod 8 for odd a).
        let a = self.value;
        let mut inv = a;
        for _ in 0..5 {
            inv = inv.wrapping_mul(2_u64.wrapping_sub(a.wrapping_mul(inv)));
        }

        Some(Self::new(inv, self.width))
    }

    /// does `self * other` overflow (unsigned)?
    pub fn mulo(&self, other: BitVector) -> bool {
        self.assert_same_width(other);

        (self.value as u128) * (other.value as u128) > mask(self.width) as u128
    }

    /// does `self + other` overflow (unsigned)?
    pub fn addo(&self, other: BitVector) -> bool {
        self.assert_same_width(other);

        (self.value as u128) + (other.value as u128) > mask(self.width) as u128
    }

    /// `self` as the most significant part, `other` as the least significant part
    pub fn concat(&self, other: BitVector) -> BitVector {
        let width = self.width + other.width;

        assert!(
            width <= MAX_WIDTH,
            "concatenation of {} and {} bits exceeds 64 bits",
            self.width,
            other.width
        );

        Self::new((self.value << other.width) | other.value, width)
    }

    /// bits `upper` down to `lower` (both inclusive)
    pub fn slice(&self, upper: u32, lower: u32) -> BitVector {
        assert!(
            lower <= upper && upper < self.width,
            "invalid slice [{}:{}] of {} bits",
            upper,
            lower,
            self.width
        );

        Self::new(self.value >> lower, upper - lower + 1)
    }

    pub fn ult(&self, other: BitVector) -> bool {
        self.assert_same_width(other);

        self.value < other.value
    }

    pub fn from_str_radix(literal: &str, radix: u32, width: u32) -> Result<Self, ParseBitVectorError> {
        if width < 1 || width > MAX_WIDTH {
            return Err(ParseBitVectorError::InvalidWidth(width as usize));
        }
        if ![2, 10, 16].contains(&radix) {
            return Err(ParseBitVectorError::UnsupportedRadix(radix));
        }

        let mut value: u128 = 0;

        for c in literal.chars() {
            let digit = c
                .to_digit(radix)
                .ok_or_else(|| ParseBitVectorError::InvalidDigit {
                    literal: literal.to_string(),
                    digit: c,
                })?;

            value = value * radix as u128 + digit as u128;

            if value > mask(width) as u128 {
                return Err(ParseBitVectorError::Overflow {
                    literal: literal.to_string(),
                    width,
                });
            }
        }

        if literal.is_empty() {
            return Err(ParseBitVectorError::InvalidWidth(0));
        }

        Ok(Self::new(value as u64, width))
    }

    pub fn to_string_radix(&self, radix: u32) -> String {
        match radix {
            2 => format!("{:0width$b}", self.value, width = self.width as usize),
            10 => format!("{}", self.value),
            16 => format!("{:x}", self.value),
            _ => panic!("radix {} is not supported (only 2, 10 and 16)", radix),
        }
    }

    fn assert_same_width(&self, other: BitVector) {
        assert_eq!(
            self.width, other.width,
            "bit vector width mismatch: {:?} vs. {:?}",
            self, other
        );
    }
}

/// Parses a binary literal, the length of the literal determines the width.
impl FromStr for BitVector {
    type Err = ParseBitVectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_radix(s, 2, s.chars().count() as u32)
    }
}

impl Neg for BitVector {
    type Output = BitVector;

    fn neg(self) -> Self::Output {
        Self::new(self.value.wrapping_neg(), self.width)
    }
}

impl Add<BitVector> for BitVector {
    type Output = BitVector;

    fn add(self, other: BitVector) -> Self::Output {
        self.assert_same_width(other);
        Self::new(self.value.wrapping_add(other.value), self.width)
    }
}

impl Sub<BitVector> for BitVector {
    type Output = BitVector;

    fn sub(self, other: BitVector) -> Self::Output {
        self.assert_same_width(other);
        Self::new(self.value.wrapping_sub(other.value), self.width)
    }
}

impl Mul<BitVector> for BitVector {
    type Output = BitVector;

    fn mul(self, other: BitVector) -> Self::Output {
        self.assert_same_width(other);
        Self::new(self.value.wrapping_mul(other.value), self.width)
    }
}

/// Unsigned division, division by zero yields all ones.
impl Div<BitVector> for BitVector {
    type Output = BitVector;

    fn div(self, other: BitVector) -> Self::Output {
        self.assert_same_width(other);

        if other.value == 0 {
            Self::ones(self.width)
        } else {
            Self::new(self.value / other.value, self.width)
        }
    }
}

/// Unsigned remainder, the remainder of a division by zero is the dividend.
impl Rem<BitVector> for BitVector {
    type Output = BitVector;

    fn rem(self, other: BitVector) -> Self::Output {
        self.assert_same_width(other);

        if other.value == 0 {
            self
        } else {
            Self::new(self.value % other.value, self.width)
        }
    }
}

impl BitOr<BitVector> for BitVector {
    type Output = BitVector;

    fn bitor(self, other: BitVector) -> Self::Output {
        self.assert_same_width(other);
        Self::new(self.value | other.value, self.width)
    }
}

impl BitAnd<BitVector> for BitVector {
    type Output = BitVector;

    fn bitand(self, other: BitVector) -> Self::Output {
        self.assert_same_width(other);
        Self::new(self.value & other.value, self.width)
    }
}

impl BitXor<BitVector> for BitVector {
    type Output = BitVector;

    fn bitxor(self, other: BitVector) -> Self::Output {
        self.assert_same_width(other);
        Self::new(self.value ^ other.value, self.width)
    }
}

/// Logical shift left, shifting by the width or more yields zero.
impl Shl<u32> for BitVector {
    type Output = BitVector;

    fn shl(self, shift: u32) -> Self::Output {
        if shift >= self.width {
            Self::zero(self.width)
        } else {
            Self::new(self.value << shift, self.width)
        }
    }
}

/// Logical shift right, shifting by the width or more yields zero.
impl Shr<u32> for BitVector {
    type Output = BitVector;

    fn shr(self, shift: u32) -> Self::Output {
        if shift >= self.width {
            Self::zero(self.width)
        } else {
            Self::new(self.value >> shift, self.width)
        }
    }
}

impl Not for BitVector {
    type Output = BitVector;

    fn not(self) -> Self::Output {
        Self::new(!self.value, self.width)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_radix(2))
    }
}

impl fmt::LowerHex for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self)
    }
}
