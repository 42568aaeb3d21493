use super::{assert_domain_width, assert_same_width};
use crate::{bitvec::BitVector, domain::BvDomain, operator::OperandSide};
use log::trace;
use num::integer::Roots;

/// smallest member of `d_x` in `[lower, upper]`
fn member_in(d_x: &BvDomain, lower: BitVector, upper: BitVector) -> Option<BitVector> {
    d_x.next_member_at_least(lower).filter(|x| *x <= upper)
}

/// Interval of the `x >= 1` that solve `s / x = t`, i.e. `t * x <= s < (t + 1) * x`.
fn udiv_divisor_interval(t: BitVector, s: BitVector) -> Option<(BitVector, BitVector)> {
    let w = t.width();
    let (t, s_) = (t.value() as u128, s.value() as u128);

    let (lower, upper) = if t == 0 {
        (s_ + 1, BitVector::ones(w).value() as u128)
    } else {
        (s_ / (t + 1) + 1, s_ / t)
    };

    if lower <= upper {
        Some((BitVector::new(lower as u64, w), BitVector::new(upper as u64, w)))
    } else {
        None
    }
}

/// Interval of the `x` that solve `x / s = t` for `s != 0`, i.e. `t * s <= x <= t * s + s - 1`.
fn udiv_dividend_interval(t: BitVector, s: BitVector) -> Option<(BitVector, BitVector)> {
    if t.mulo(s) {
        return None;
    }

    let lower = t * s;
    let upper = if lower.addo(s - BitVector::one(s.width())) {
        BitVector::ones(s.width())
    } else {
        lower + s - BitVector::one(s.width())
    };

    Some((lower, upper))
}

/// Division by zero yields all ones. The smallest solution is returned.
pub fn cons_udiv(t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<BitVector> {
    assert_same_width(t, s);

    let w = t.width();

    match pos_x {
        OperandSide::Lhs if s.is_zero() => Some(BitVector::zero(w)).filter(|_| t.is_ones()),
        OperandSide::Lhs => udiv_dividend_interval(t, s).map(|(lower, _)| lower),
        OperandSide::Rhs if t.is_ones() => Some(BitVector::zero(w)),
        OperandSide::Rhs => udiv_divisor_interval(t, s).map(|(lower, _)| lower),
    }
}

pub fn cons_udiv_const(
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    assert_same_width(t, s);
    assert_domain_width(d_x, s.width());

    let w = t.width();

    match pos_x {
        OperandSide::Lhs if s.is_zero() => Some(d_x.min()).filter(|_| t.is_ones()),
        OperandSide::Lhs => udiv_dividend_interval(t, s)
            .and_then(|(lower, upper)| member_in(d_x, lower, upper)),
        OperandSide::Rhs => {
            if t.is_ones() && d_x.mcb(BitVector::zero(w)) {
                Some(BitVector::zero(w))
            } else {
                udiv_divisor_interval(t, s).and_then(|(lower, upper)| member_in(d_x, lower, upper))
            }
        }
    }
}

/// Upper bound on the candidates the `urem` oracles try before they give up on a search.
pub const SEARCH_BUDGET: usize = 1 << 16;

/// Divisors of `n` greater than `lower` in ascending order, found with at most [`SEARCH_BUDGET`]
/// trial divisions.
///
/// Divisors up to `sqrt(n)` are tried directly, the larger ones as `n / k` for decreasing `k`.
fn divisors_above(n: u64, lower: u64) -> impl Iterator<Item = u64> {
    let root = n.sqrt();
    let cofactors = if lower >= n {
        0
    } else {
        root.min(n / (lower + 1))
    };

    let small = (lower.saturating_add(1)..=root).map(move |d| Some(d).filter(|d| n % d == 0));
    let large = (1..=cofactors)
        .rev()
        .map(move |k| Some(n / k).filter(|d| n % k == 0 && *d > root));

    small.chain(large).take(SEARCH_BUDGET).flatten()
}

/// Candidates for `x` in `s % x = t` with `x >= 1` and `s > t`, in ascending order.
fn urem_divisor_candidates(t: BitVector, s: BitVector) -> impl Iterator<Item = BitVector> {
    let w = t.width();

    trace!("urem: enumerate divisors of {} greater than {}", s - t, t);

    divisors_above((s - t).value(), t.value()).map(move |d| BitVector::new(d, w))
}

/// `s - t` is a solution of `s % x = t` whenever it is greater than `t`.
fn urem_largest_divisor(t: BitVector, s: BitVector) -> Option<BitVector> {
    Some(s - t).filter(|n| t.ult(*n))
}

/// The remainder of a division by zero is the dividend. The smallest solution is returned.
pub fn cons_urem(t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<BitVector> {
    assert_same_width(t, s);

    let w = t.width();

    match pos_x {
        // x = t + k * s
        OperandSide::Lhs if s.is_zero() || t.ult(s) => Some(t),
        OperandSide::Lhs => None,
        OperandSide::Rhs if s == t => Some(BitVector::zero(w)),
        OperandSide::Rhs if t.ult(s) => urem_divisor_candidates(t, s)
            .next()
            .or_else(|| urem_largest_divisor(t, s)),
        OperandSide::Rhs => None,
    }
}

pub fn cons_urem_const(
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    assert_same_width(t, s);
    assert_domain_width(d_x, s.width());

    let w = t.width();

    match pos_x {
        OperandSide::Lhs if s.is_zero() => Some(t).filter(|x| d_x.mcb(*x)),
        OperandSide::Lhs if t.ult(s) => urem_dividend_const(t, s, d_x),
        OperandSide::Lhs => None,
        OperandSide::Rhs if s == t => {
            if d_x.mcb(BitVector::zero(w)) {
                Some(BitVector::zero(w))
            } else if t.is_ones() {
                None
            } else {
                // every x > s leaves s as remainder
                d_x.next_member_at_least(t + BitVector::one(w))
            }
        }
        OperandSide::Rhs if t.ult(s) => urem_divisor_candidates(t, s)
            .find(|x| d_x.mcb(*x))
            .or_else(|| urem_largest_divisor(t, s).filter(|x| d_x.mcb(*x))),
        OperandSide::Rhs => None,
    }
}

/// Smallest `x = t + k * s` (without overflow) in `d_x`, for `t < s`.
///
/// Every such `x` agrees with `t` in the `ctz(s)` least significant bits, which decides the
/// query for powers of two. Otherwise the walk alternates between the next member of the domain
/// and the next value of the progression until both meet, for at most [`SEARCH_BUDGET`] steps.
fn urem_dividend_const(t: BitVector, s: BitVector, d_x: &BvDomain) -> Option<BitVector> {
    let w = t.width();
    let c = s.ctz();
    let low = !(BitVector::ones(w) << c);

    let smallest = d_x.fit(t, low)?;

    if (s >> c) == BitVector::one(w) {
        return Some(smallest);
    }

    let max = BitVector::ones(w).value() as u128;
    let (t_, s_) = (t.value() as u128, s.value() as u128);

    let mut candidate = t;

    for _ in 0..SEARCH_BUDGET {
        let member = d_x.next_member_at_least(candidate)?;

        // next value of the progression that is not below member
        let k = (member.value() as u128 - t_ + s_ - 1) / s_;
        let next = t_ + k * s_;

        if next > max {
            return None;
        }
        if next == member.value() as u128 {
            return Some(member);
        }

        candidate = BitVector::new(next as u64, w);
    }

    trace!(
        "urem: no value of {} + k * {} in {} after {} steps",
        t,
        s,
        d_x,
        SEARCH_BUDGET
    );

    None
}
