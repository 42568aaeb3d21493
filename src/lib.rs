pub mod bitvec;
pub mod domain;
pub mod generator;
pub mod operator;
pub mod propagation;

pub use crate::{
    bitvec::{BitVector, ParseBitVectorError},
    domain::{BvDomain, DomainError},
    generator::DomainGenerator,
    operator::{eval_cond, BvOperator, CondOperand, OperandSide},
    propagation::{
        cons, cons_cond, cons_cond_const, cons_const, cons_slice, cons_slice_const, is_invertible,
        is_invertible_const, PropagationOptions, PropagationStatistics, Propagator,
    },
};
