use super::{assert_domain_width, assert_same_width};
use crate::{bitvec::BitVector, domain::BvDomain, operator::OperandSide};

// x + s = t (and s + x = t) has the unique solution x = t - s.

pub fn cons_add(t: BitVector, s: BitVector, _pos_x: OperandSide) -> Option<BitVector> {
    assert_same_width(t, s);

    Some(t - s)
}

pub fn cons_add_const(
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    assert_domain_width(d_x, s.width());

    cons_add(t, s, pos_x).filter(|x| d_x.mcb(*x))
}

/// Solutions of `x * s = t` as a value and the mask of bits it determines.
///
/// With `c = ctz(s)` the equation is solvable iff the `c` least significant bits of `t` are zero.
/// Then `x * (s >> c) = t >> c (mod 2^(w - c))` determines the `w - c` least significant bits of
/// `x` through the inverse of the odd `s >> c`; the `c` most significant bits are arbitrary.
fn mul_solutions(t: BitVector, s: BitVector) -> Option<(BitVector, BitVector)> {
    let w = t.width();

    if s.is_zero() {
        return if t.is_zero() {
            Some((BitVector::zero(w), BitVector::zero(w)))
        } else {
            None
        };
    }

    let c = s.ctz();

    if (t >> c) << c != t {
        return None;
    }

    let inverse = (s >> c)
        .modinverse()
        .expect("s without trailing zeros is odd and has an inverse");

    let care = BitVector::ones(w) >> c;

    Some((((t >> c) * inverse) & care, care))
}

/// The arbitrary most significant bits are set to 0.
pub fn cons_mul(t: BitVector, s: BitVector, _pos_x: OperandSide) -> Option<BitVector> {
    assert_same_width(t, s);

    mul_solutions(t, s).map(|(x, _)| x)
}

pub fn cons_mul_const(
    t: BitVector,
    s: BitVector,
    _pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    assert_same_width(t, s);
    assert_domain_width(d_x, s.width());

    mul_solutions(t, s).and_then(|(x, care)| d_x.fit(x, care))
}
