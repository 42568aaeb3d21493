use super::assert_domain_width;
use crate::{bitvec::BitVector, domain::BvDomain, operator::OperandSide};

/// Bounds `[lower, upper]` of the `x` that solve `(x < s) = t` or `(s < x) = t`.
fn ult_interval(t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<(BitVector, BitVector)> {
    assert_eq!(t.width(), 1, "target of a predicate has to be a single bit");

    let w = s.width();
    let (zero, one, ones) = (BitVector::zero(w), BitVector::one(w), BitVector::ones(w));

    match (pos_x, t.is_true()) {
        (OperandSide::Lhs, true) if s.is_zero() => None,
        (OperandSide::Lhs, true) => Some((zero, s - one)),
        (OperandSide::Lhs, false) => Some((s, ones)),
        (OperandSide::Rhs, true) if s.is_ones() => None,
        (OperandSide::Rhs, true) => Some((s + one, ones)),
        (OperandSide::Rhs, false) => Some((zero, s)),
    }
}

/// The smallest solution is returned.
pub fn cons_ult(t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<BitVector> {
    ult_interval(t, s, pos_x).map(|(lower, _)| lower)
}

pub fn cons_ult_const(
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    assert_domain_width(d_x, s.width());

    ult_interval(t, s, pos_x).and_then(|(lower, upper)| {
        d_x.next_member_at_least(lower).filter(|x| *x <= upper)
    })
}
