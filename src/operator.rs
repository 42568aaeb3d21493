use crate::bitvec::BitVector;
use std::fmt;
use strum::{EnumIter, EnumString, EnumVariantNames, IntoStaticStr};

#[derive(Clone, Debug, Copy, Eq, Hash, PartialEq)]
pub enum OperandSide {
    Lhs,
    Rhs,
}

impl OperandSide {
    pub fn other(&self) -> Self {
        match self {
            OperandSide::Lhs => OperandSide::Rhs,
            OperandSide::Rhs => OperandSide::Lhs,
        }
    }
}

/// Operand positions of the ternary `cond ? then : otherwise`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumIter)]
pub enum CondOperand {
    Cond,
    Then,
    Else,
}

impl CondOperand {
    /// All three operands in order, with `x` at this position and `s` at the other two.
    pub fn operands(&self, x: BitVector, s: [BitVector; 2]) -> [BitVector; 3] {
        match self {
            CondOperand::Cond => [x, s[0], s[1]],
            CondOperand::Then => [s[0], x, s[1]],
            CondOperand::Else => [s[0], s[1], x],
        }
    }
}

/// Evaluates `cond ? then : otherwise`.
pub fn eval_cond(cond: BitVector, then: BitVector, otherwise: BitVector) -> BitVector {
    assert_eq!(cond.width(), 1, "condition has to be a single bit");
    assert_eq!(
        then.width(),
        otherwise.width(),
        "branches of a condition have different widths"
    );

    if cond.is_true() {
        then
    } else {
        otherwise
    }
}

/// The binary bit-vector operators with inverse/consistent value oracles.
#[derive(
    Debug, Copy, Clone, Hash, Eq, PartialEq, EnumIter, EnumString, EnumVariantNames, IntoStaticStr,
)]
#[strum(serialize_all = "kebab_case")]
pub enum BvOperator {
    Add,
    And,
    Concat,
    Eq,
    Mul,
    Sll,
    Srl,
    Udiv,
    Ult,
    Urem,
}

impl BvOperator {
    pub fn is_commutative(&self) -> bool {
        matches!(
            self,
            BvOperator::Add | BvOperator::And | BvOperator::Eq | BvOperator::Mul
        )
    }

    /// is the result a single bit (a predicate)?
    pub fn is_predicate(&self) -> bool {
        matches!(self, BvOperator::Eq | BvOperator::Ult)
    }

    pub fn result_width(&self, lhs_width: u32, rhs_width: u32) -> u32 {
        match self {
            BvOperator::Concat => lhs_width + rhs_width,
            BvOperator::Eq | BvOperator::Ult => 1,
            _ => lhs_width,
        }
    }

    /// Evaluates `lhs op rhs`.
    pub fn eval(&self, lhs: BitVector, rhs: BitVector) -> BitVector {
        if *self != BvOperator::Concat {
            assert_eq!(
                lhs.width(),
                rhs.width(),
                "operands of {} have different widths",
                self
            );
        }

        match self {
            BvOperator::Add => lhs + rhs,
            BvOperator::And => lhs & rhs,
            BvOperator::Concat => lhs.concat(rhs),
            BvOperator::Eq => BitVector::from_bool(lhs == rhs),
            BvOperator::Mul => lhs * rhs,
            BvOperator::Sll => lhs << shift_amount(rhs),
            BvOperator::Srl => lhs >> shift_amount(rhs),
            BvOperator::Udiv => lhs / rhs,
            BvOperator::Ult => BitVector::from_bool(lhs.ult(rhs)),
            BvOperator::Urem => lhs % rhs,
        }
    }

    /// Evaluates the operator with `x` at `side` and `s` at the other side.
    pub fn eval_at(&self, x: BitVector, s: BitVector, side: OperandSide) -> BitVector {
        match side {
            OperandSide::Lhs => self.eval(x, s),
            OperandSide::Rhs => self.eval(s, x),
        }
    }
}

/// shift amounts that do not fit into `u32` shift everything out anyway
pub(crate) fn shift_amount(s: BitVector) -> u32 {
    if s.value() > u32::max_value() as u64 {
        u32::max_value()
    } else {
        s.value() as u32
    }
}

impl fmt::Display for BvOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BvOperator::Add => "+",
                BvOperator::And => "&",
                BvOperator::Concat => "++",
                BvOperator::Eq => "=",
                BvOperator::Mul => "*",
                BvOperator::Sll => "<<",
                BvOperator::Srl => ">>",
                BvOperator::Udiv => "/",
                BvOperator::Ult => "<",
                BvOperator::Urem => "%",
            }
        )
    }
}
