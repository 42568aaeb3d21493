use super::assert_domain_width;
use crate::{bitvec::BitVector, domain::BvDomain, operator::CondOperand};

fn assert_cond_widths(t: BitVector, cond: BitVector, then: BitVector, otherwise: BitVector) {
    assert_eq!(cond.width(), 1, "condition has to be a single bit");
    assert!(
        then.width() == t.width() && otherwise.width() == t.width(),
        "branches of a condition and its target have different widths"
    );
}

/// Value for `x` in `cond ? then : otherwise = t`, where `s` holds the other two operands in
/// operand order.
///
/// A condition prefers 0. A branch that is not selected does not matter and is set to 0.
pub fn cons_cond(t: BitVector, s: [BitVector; 2], pos_x: CondOperand) -> Option<BitVector> {
    match pos_x {
        CondOperand::Cond => {
            let [then, otherwise] = s;
            assert_cond_widths(t, BitVector::zero(1), then, otherwise);

            if otherwise == t {
                Some(BitVector::zero(1))
            } else if then == t {
                Some(BitVector::one(1))
            } else {
                None
            }
        }
        CondOperand::Then => {
            let [cond, otherwise] = s;
            assert_cond_widths(t, cond, t, otherwise);

            if cond.is_true() {
                Some(t)
            } else {
                Some(BitVector::zero(t.width())).filter(|_| otherwise == t)
            }
        }
        CondOperand::Else => {
            let [cond, then] = s;
            assert_cond_widths(t, cond, then, t);

            if cond.is_true() {
                Some(BitVector::zero(t.width())).filter(|_| then == t)
            } else {
                Some(t)
            }
        }
    }
}

pub fn cons_cond_const(
    t: BitVector,
    s: [BitVector; 2],
    pos_x: CondOperand,
    d_x: &BvDomain,
) -> Option<BitVector> {
    match pos_x {
        CondOperand::Cond => {
            let [then, otherwise] = s;
            assert_cond_widths(t, BitVector::zero(1), then, otherwise);
            assert_domain_width(d_x, 1);

            [(BitVector::zero(1), otherwise), (BitVector::one(1), then)]
                .iter()
                .find(|(c, branch)| *branch == t && d_x.mcb(*c))
                .map(|(c, _)| *c)
        }
        CondOperand::Then | CondOperand::Else => {
            let [cond, other] = s;
            let selected = cond.is_true() == (pos_x == CondOperand::Then);

            assert_cond_widths(t, cond, t, other);
            assert_domain_width(d_x, t.width());

            if selected {
                Some(t).filter(|x| d_x.mcb(*x))
            } else if other == t {
                Some(d_x.min())
            } else {
                None
            }
        }
    }
}
