use super::{assert_domain_width, assert_same_width};
use crate::{
    bitvec::BitVector,
    domain::BvDomain,
    operator::{shift_amount, OperandSide},
};
use std::ops::{Shl, Shr};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    Left,
    Right,
}

impl Direction {
    fn shift(self, v: BitVector, by: u32) -> BitVector {
        match self {
            Direction::Left => v.shl(by),
            Direction::Right => v.shr(by),
        }
    }

    fn back(self, v: BitVector, by: u32) -> BitVector {
        match self {
            Direction::Left => v.shr(by),
            Direction::Right => v.shl(by),
        }
    }
}

/// Solutions of `x <dir> s = t` for the shifted operand `x`, as a value and the mask of bits it
/// determines. The bits shifted out of `x` are arbitrary and left 0 in the value.
fn shifted_solutions(
    dir: Direction,
    t: BitVector,
    s: BitVector,
) -> Option<(BitVector, BitVector)> {
    let w = t.width();
    let by = shift_amount(s);

    // t must not have bits set where the shift moves in zeros
    if dir.shift(dir.back(t, by), by) != t {
        return None;
    }

    Some((dir.back(t, by), dir.back(BitVector::ones(w), by)))
}

/// Solutions of `s <dir> x = t` for the shift amount `x`.
///
/// Every amount of at least the width shifts out everything, so only the amounts below the width
/// are distinct and the width itself stands for all larger ones.
fn amount_solutions(dir: Direction, t: BitVector, s: BitVector) -> impl Iterator<Item = u32> {
    (0..=t.width()).filter(move |by| dir.shift(s, *by) == t)
}

fn cons_shift(dir: Direction, t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<BitVector> {
    assert_same_width(t, s);

    match pos_x {
        OperandSide::Lhs => shifted_solutions(dir, t, s).map(|(x, _)| x),
        OperandSide::Rhs => amount_solutions(dir, t, s)
            .next()
            .map(|by| BitVector::new(by as u64, t.width())),
    }
}

fn cons_shift_const(
    dir: Direction,
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    assert_same_width(t, s);
    assert_domain_width(d_x, s.width());

    let w = t.width();

    match pos_x {
        OperandSide::Lhs => shifted_solutions(dir, t, s).and_then(|(x, care)| d_x.fit(x, care)),
        OperandSide::Rhs => amount_solutions(dir, t, s).find_map(|by| {
            let x = BitVector::new(by as u64, w);

            if by < w {
                Some(x).filter(|x| d_x.mcb(*x))
            } else {
                d_x.next_member_at_least(x)
            }
        }),
    }
}

pub fn cons_sll(t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<BitVector> {
    cons_shift(Direction::Left, t, s, pos_x)
}

pub fn cons_sll_const(
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    cons_shift_const(Direction::Left, t, s, pos_x, d_x)
}

pub fn cons_srl(t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<BitVector> {
    cons_shift(Direction::Right, t, s, pos_x)
}

pub fn cons_srl_const(
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    cons_shift_const(Direction::Right, t, s, pos_x, d_x)
}
