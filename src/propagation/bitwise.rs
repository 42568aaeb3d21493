use super::{assert_domain_width, assert_same_width};
use crate::{bitvec::BitVector, domain::BvDomain, operator::OperandSide};

/// `x & s = t` is solvable iff `t & s = t`, the bits of `x` where `s` is 0 are set to 1.
pub fn cons_and(t: BitVector, s: BitVector, _pos_x: OperandSide) -> Option<BitVector> {
    assert_same_width(t, s);

    if t & s == t {
        Some(t | !s)
    } else {
        None
    }
}

pub fn cons_and_const(
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    assert_domain_width(d_x, s.width());

    // where s is 1, x has to agree with t
    cons_and(t, s, pos_x).and_then(|x| d_x.fit(x, s))
}

/// The parts of `t` that `x` and `s` have to match.
fn concat_parts(t: BitVector, s: BitVector, pos_x: OperandSide) -> (BitVector, BitVector) {
    let (wt, ws) = (t.width(), s.width());

    assert!(
        ws < wt,
        "concatenation result ({} bits) has to be wider than operand ({} bits)",
        wt,
        ws
    );

    let wx = wt - ws;

    match pos_x {
        // t = x ++ s
        OperandSide::Lhs => (t.slice(wt - 1, ws), t.slice(ws - 1, 0)),
        // t = s ++ x
        OperandSide::Rhs => (t.slice(wx - 1, 0), t.slice(wt - 1, wx)),
    }
}

pub fn cons_concat(t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<BitVector> {
    let (x, s_part) = concat_parts(t, s, pos_x);

    if s_part == s {
        Some(x)
    } else {
        None
    }
}

pub fn cons_concat_const(
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    let x = cons_concat(t, s, pos_x);

    assert_domain_width(d_x, t.width() - s.width());

    x.filter(|x| d_x.mcb(*x))
}

/// `(x = s) = t`, for `t = 0` the smallest value different from `s`
pub fn cons_eq(t: BitVector, s: BitVector, _pos_x: OperandSide) -> Option<BitVector> {
    assert_eq!(t.width(), 1, "target of a predicate has to be a single bit");

    if t.is_true() {
        Some(s)
    } else if s.is_zero() {
        Some(BitVector::one(s.width()))
    } else {
        Some(BitVector::zero(s.width()))
    }
}

pub fn cons_eq_const(
    t: BitVector,
    s: BitVector,
    _pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    assert_eq!(t.width(), 1, "target of a predicate has to be a single bit");
    assert_domain_width(d_x, s.width());

    if t.is_true() {
        Some(s).filter(|x| d_x.mcb(*x))
    } else if d_x.min() != s {
        Some(d_x.min())
    } else if s.is_ones() {
        None
    } else {
        d_x.next_member_at_least(s + BitVector::one(s.width()))
    }
}
