//! Inverse and consistent value oracles.
//!
//! For every [`BvOperator`] there are two oracles. `cons_<op>(t, s, pos_x)` computes a value `x`
//! such that the operator yields `t` with `x` at `pos_x` and `s` at the other operand, and
//! `cons_<op>_const(t, s, pos_x, d_x)` additionally requires `x` to be a member of the domain
//! `d_x`. Both return `None` if no such value exists, which is an expected outcome and not an
//! error. Operands of the wrong width are programming errors and panic.
//!
//! When several values solve an equation the oracles pick a fixed one:
//! - `udiv`, `urem`, `ult`, `eq` and the shift amount of `sll`/`srl` return the smallest solution,
//! - `add`, `and`, `concat`, `mul` and the shifted operand of `sll`/`srl` determine some bits of
//!   `x`; the others are 1 for `and` and 0 for `mul`, `sll`, `srl`, unless `d_x` fixes them.
//!
//! Slices and conditionals do not fit the binary shape and have their own oracles
//! ([`cons_slice`], [`cons_cond`]). Bits outside a slice are 0, a condition prefers 0 and a branch
//! that is not selected is 0 (the smallest member of `d_x` with fixed bits).

mod arith;
mod bitwise;
mod compare;
mod cond;
mod division;
mod shift;
mod slice;

pub use self::{arith::*, bitwise::*, compare::*, cond::*, division::*, shift::*, slice::*};

use crate::{
    bitvec::BitVector,
    domain::BvDomain,
    operator::{BvOperator, CondOperand, OperandSide},
};
use log::{debug, trace};
use rand::{rngs::SmallRng, SeedableRng};

pub type ConsFn = fn(BitVector, BitVector, OperandSide) -> Option<BitVector>;
pub type ConsConstFn = fn(BitVector, BitVector, OperandSide, &BvDomain) -> Option<BitVector>;

impl BvOperator {
    pub fn cons_fn(&self) -> ConsFn {
        match self {
            BvOperator::Add => cons_add,
            BvOperator::And => cons_and,
            BvOperator::Concat => cons_concat,
            BvOperator::Eq => cons_eq,
            BvOperator::Mul => cons_mul,
            BvOperator::Sll => cons_sll,
            BvOperator::Srl => cons_srl,
            BvOperator::Udiv => cons_udiv,
            BvOperator::Ult => cons_ult,
            BvOperator::Urem => cons_urem,
        }
    }

    pub fn cons_const_fn(&self) -> ConsConstFn {
        match self {
            BvOperator::Add => cons_add_const,
            BvOperator::And => cons_and_const,
            BvOperator::Concat => cons_concat_const,
            BvOperator::Eq => cons_eq_const,
            BvOperator::Mul => cons_mul_const,
            BvOperator::Sll => cons_sll_const,
            BvOperator::Srl => cons_srl_const,
            BvOperator::Udiv => cons_udiv_const,
            BvOperator::Ult => cons_ult_const,
            BvOperator::Urem => cons_urem_const,
        }
    }
}

/// value for `x` with `op(x, s) = t` (`pos_x = Lhs`) or `op(s, x) = t` (`pos_x = Rhs`)
pub fn cons(op: BvOperator, t: BitVector, s: BitVector, pos_x: OperandSide) -> Option<BitVector> {
    let x = op.cons_fn()(t, s, pos_x);

    trace!("cons {} (t: {}, s: {}, {:?}) |- {:?}", op, t, s, pos_x, x);

    x
}

/// like [`cons`], but the value is taken from `d_x`
pub fn cons_const(
    op: BvOperator,
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> Option<BitVector> {
    debug_assert!(d_x.is_valid(), "empty domain passed to {}", op);

    let x = op.cons_const_fn()(t, s, pos_x, d_x);

    trace!(
        "cons {} (t: {}, s: {}, {:?}, d_x: {}) |- {:?}",
        op,
        t,
        s,
        pos_x,
        d_x,
        x
    );

    x
}

/// invertibility condition: is there any `x` at all?
pub fn is_invertible(op: BvOperator, t: BitVector, s: BitVector, pos_x: OperandSide) -> bool {
    op.cons_fn()(t, s, pos_x).is_some()
}

/// invertibility condition with respect to the domain of `x`
pub fn is_invertible_const(
    op: BvOperator,
    t: BitVector,
    s: BitVector,
    pos_x: OperandSide,
    d_x: &BvDomain,
) -> bool {
    op.cons_const_fn()(t, s, pos_x, d_x).is_some()
}

pub(crate) fn assert_same_width(t: BitVector, s: BitVector) {
    assert_eq!(
        t.width(),
        s.width(),
        "width mismatch between target {:?} and operand {:?}",
        t,
        s
    );
}

pub(crate) fn assert_domain_width(d_x: &BvDomain, width: u32) {
    assert_eq!(
        d_x.width(),
        width,
        "width mismatch between domain {:?} and operand ({} bits)",
        d_x,
        width
    );
}

pub mod defaults {
    pub const USE_FIXED_BITS: bool = true;
    pub const SEED: u64 = 0;
}

#[derive(Debug, Clone)]
pub struct PropagationOptions {
    /// Restrict values to the domain of the operand (`cons_<op>_const`)
    pub use_fixed_bits: bool,
    /// Seed of the random number generator used for resampling
    pub seed: u64,
}

impl Default for PropagationOptions {
    fn default() -> PropagationOptions {
        PropagationOptions {
            use_fixed_bits: defaults::USE_FIXED_BITS,
            seed: defaults::SEED,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct PropagationStatistics {
    pub queries: u64,
    pub solved: u64,
    pub no_solution: u64,
    pub resampled: u64,
}

/// Entry point for a propagation driver.
///
/// Owns its random number generator, so independent propagation attempts (e.g. one per worker)
/// each use their own instance.
#[derive(Debug)]
pub struct Propagator {
    options: PropagationOptions,
    rng: SmallRng,
    statistics: PropagationStatistics,
}

impl Propagator {
    pub fn new(options: &PropagationOptions) -> Self {
        debug!("create propagator with {:?}", options);

        Self {
            options: options.clone(),
            rng: SmallRng::seed_from_u64(options.seed),
            statistics: PropagationStatistics::default(),
        }
    }

    pub fn options(&self) -> &PropagationOptions {
        &self.options
    }

    pub fn statistics(&self) -> PropagationStatistics {
        self.statistics
    }

    /// Computes a new value for the operand at `pos_x` whose current domain is `d_x`.
    pub fn value(
        &mut self,
        op: BvOperator,
        t: BitVector,
        s: BitVector,
        pos_x: OperandSide,
        d_x: &BvDomain,
    ) -> Option<BitVector> {
        let x = if self.options.use_fixed_bits {
            cons_const(op, t, s, pos_x, d_x)
        } else {
            cons(op, t, s, pos_x)
        };

        self.record(x)
    }

    /// Computes a new value for `x` in `x[upper:lower] = t`.
    pub fn slice_value(
        &mut self,
        t: BitVector,
        upper: u32,
        lower: u32,
        d_x: &BvDomain,
    ) -> Option<BitVector> {
        let x = if self.options.use_fixed_bits {
            cons_slice_const(t, upper, lower, d_x)
        } else {
            cons_slice(t, d_x.width(), upper, lower)
        };

        trace!("cons slice [{}:{}] (t: {}, d_x: {}) |- {:?}", upper, lower, t, d_x, x);

        self.record(x)
    }

    /// Computes a new value for the operand at `pos_x` of `cond ? then : otherwise = t`, where
    /// `s` holds the other two operands in order.
    pub fn cond_value(
        &mut self,
        t: BitVector,
        s: [BitVector; 2],
        pos_x: CondOperand,
        d_x: &BvDomain,
    ) -> Option<BitVector> {
        let x = if self.options.use_fixed_bits {
            cons_cond_const(t, s, pos_x, d_x)
        } else {
            cons_cond(t, s, pos_x)
        };

        trace!(
            "cons cond (t: {}, s: [{}, {}], {:?}, d_x: {}) |- {:?}",
            t,
            s[0],
            s[1],
            pos_x,
            d_x,
            x
        );

        self.record(x)
    }

    fn record(&mut self, x: Option<BitVector>) -> Option<BitVector> {
        self.statistics.queries += 1;

        if x.is_some() {
            self.statistics.solved += 1;
        } else {
            self.statistics.no_solution += 1;
        }

        x
    }

    /// random member of `d_x`, used after a query without solution
    pub fn resample(&mut self, d_x: &BvDomain) -> BitVector {
        self.statistics.resampled += 1;

        let x = d_x.sample(&mut self.rng);

        trace!("resample {} |- {}", d_x, x);

        x
    }
}

impl Drop for Propagator {
    fn drop(&mut self) {
        debug!("propagation statistics: {:?}", self.statistics);
    }
}
