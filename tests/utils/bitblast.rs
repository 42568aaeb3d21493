use bvprop::{BitVector, BvDomain, BvOperator};
use varisat::{ExtendFormula, Lit, Solver};

/// Bits of a vector, least significant bit first.
pub type Bits = Vec<Lit>;

/// Gate-level encoding of bit-vector terms into a varisat instance.
pub struct Circuit {
    solver: Solver<'static>,
    tt: Lit,
}

impl Circuit {
    pub fn new() -> Self {
        let mut solver = Solver::new();
        let tt = solver.new_lit();

        solver.add_clause(&[tt]);

        Self { solver, tt }
    }

    fn constant(&self, b: bool) -> Lit {
        if b {
            self.tt
        } else {
            !self.tt
        }
    }

    pub fn input(&mut self, width: u32) -> Bits {
        (0..width).map(|_| self.solver.new_lit()).collect()
    }

    pub fn value(&self, v: BitVector) -> Bits {
        (0..v.width()).map(|i| self.constant(v.bit(i))).collect()
    }

    fn and(&mut self, a: Lit, b: Lit) -> Lit {
        let x = self.solver.new_lit();
        // Original: X := and(A, B)
        // Tseytin: (-A | -B | +X) &
        //          (+A | -X) &
        //          (+B | -X)
        self.solver.add_clause(&[!a, !b, x]);
        self.solver.add_clause(&[a, !x]);
        self.solver.add_clause(&[b, !x]);
        x
    }

    fn or(&mut self, a: Lit, b: Lit) -> Lit {
        !self.and(!a, !b)
    }

    fn xor(&mut self, a: Lit, b: Lit) -> Lit {
        let x = self.solver.new_lit();
        // Original: X := xor(A, B)
        // Tseytin: (+A | +B | -X) &
        //          (+A | -B | +X) &
        //          (-A | +B | +X) &
        //          (-A | -B | -X)
        self.solver.add_clause(&[a, b, !x]);
        self.solver.add_clause(&[a, !b, x]);
        self.solver.add_clause(&[!a, b, x]);
        self.solver.add_clause(&[!a, !b, !x]);
        x
    }

    pub fn mux(&mut self, c: Lit, a: Lit, b: Lit) -> Lit {
        let x = self.solver.new_lit();
        // Original: X := C ? A : B
        // Tseytin: (-C | -A | +X) &
        //          (-C | +A | -X) &
        //          (+C | -B | +X) &
        //          (+C | +B | -X)
        self.solver.add_clause(&[!c, !a, x]);
        self.solver.add_clause(&[!c, a, !x]);
        self.solver.add_clause(&[c, !b, x]);
        self.solver.add_clause(&[c, b, !x]);
        x
    }

    fn or_any(&mut self, lits: &[Lit]) -> Lit {
        let mut result = !self.tt;
        for l in lits {
            result = self.or(result, *l);
        }
        result
    }

    fn full_adder(&mut self, a: Lit, b: Lit, c: Lit) -> (Lit, Lit) {
        let half = self.xor(a, b);
        let sum = self.xor(half, c);
        let generate = self.and(a, b);
        let propagate = self.and(half, c);

        (sum, self.or(generate, propagate))
    }

    fn add(&mut self, a: &[Lit], b: &[Lit]) -> Bits {
        let mut carry = !self.tt;

        a.iter()
            .zip(b)
            .map(|(a, b)| {
                let (sum, next) = self.full_adder(*a, *b, carry);
                carry = next;
                sum
            })
            .collect()
    }

    /// shift-and-add, truncated to the width of `a`
    fn mul(&mut self, a: &[Lit], b: &[Lit]) -> Bits {
        let width = a.len();
        let mut product = vec![!self.tt; width];

        for (i, b_i) in b.iter().enumerate().take(width) {
            let partial = (0..width)
                .map(|j| match j.checked_sub(i) {
                    Some(k) => self.and(a[k], *b_i),
                    None => !self.tt,
                })
                .collect::<Bits>();

            product = self.add(&product, &partial);
        }

        product
    }

    fn equal(&mut self, a: &[Lit], b: &[Lit]) -> Lit {
        let diffs = a
            .iter()
            .zip(b)
            .map(|(a, b)| self.xor(*a, *b))
            .collect::<Bits>();

        !self.or_any(&diffs)
    }

    fn ult(&mut self, a: &[Lit], b: &[Lit]) -> Lit {
        let mut less = !self.tt;

        // the most significant differing bit decides
        for (a_i, b_i) in a.iter().zip(b) {
            let differ = self.xor(*a_i, *b_i);
            less = self.mux(differ, *b_i, less);
        }

        less
    }

    /// barrel shifter, amounts of at least the width shift everything out
    fn shift(&mut self, a: &[Lit], b: &[Lit], left: bool) -> Bits {
        let width = a.len();
        let stages = (0..b.len()).take_while(|i| (1_usize << i) < width).count();
        let mut result = a.to_vec();

        for (i, b_i) in b.iter().enumerate().take(stages) {
            let amount = 1_usize << i;

            result = (0..width)
                .map(|j| {
                    let source = if left {
                        j.checked_sub(amount)
                    } else {
                        Some(j + amount).filter(|k| *k < width)
                    };
                    let shifted = source.map_or(!self.tt, |k| result[k]);

                    self.mux(*b_i, shifted, result[j])
                })
                .collect();
        }

        let overflow = self.or_any(&b[stages..]);

        result.iter().map(|r| self.and(!overflow, *r)).collect()
    }

    /// Quotient and remainder as fresh vectors constrained by `q * b + r = a` and `r < b`, or by
    /// `q = ones` and `r = a` if `b = 0`.
    fn divide(&mut self, a: &[Lit], b: &[Lit]) -> (Bits, Bits) {
        let width = a.len() as u32;
        let q = self.input(width);
        let r = self.input(width);

        let b_is_zero = !self.or_any(b);

        for (i, q_i) in q.iter().enumerate() {
            let differ = self.xor(r[i], a[i]);

            self.solver.add_clause(&[!b_is_zero, *q_i]);
            self.solver.add_clause(&[!b_is_zero, !differ]);
        }

        let extend = |v: &[Lit], zero: Lit| {
            v.iter()
                .copied()
                .chain(std::iter::repeat(zero).take(v.len()))
                .collect::<Bits>()
        };
        let zero = !self.tt;

        let product = self.mul(&extend(&q[..], zero), &extend(b, zero));
        let sum = self.add(&product, &extend(&r[..], zero));
        let exact = self.equal(&sum, &extend(a, zero));
        let smaller = self.ult(&r, b);

        self.solver.add_clause(&[b_is_zero, exact]);
        self.solver.add_clause(&[b_is_zero, smaller]);

        (q, r)
    }

    pub fn eval(&mut self, op: BvOperator, lhs: &[Lit], rhs: &[Lit]) -> Bits {
        match op {
            BvOperator::Add => self.add(lhs, rhs),
            BvOperator::And => lhs.iter().zip(rhs).map(|(a, b)| self.and(*a, *b)).collect(),
            BvOperator::Concat => rhs.iter().chain(lhs).copied().collect(),
            BvOperator::Eq => vec![self.equal(lhs, rhs)],
            BvOperator::Mul => self.mul(lhs, rhs),
            BvOperator::Sll => self.shift(lhs, rhs, true),
            BvOperator::Srl => self.shift(lhs, rhs, false),
            BvOperator::Udiv => self.divide(lhs, rhs).0,
            BvOperator::Ult => vec![self.ult(lhs, rhs)],
            BvOperator::Urem => self.divide(lhs, rhs).1,
        }
    }

    pub fn assert_equal(&mut self, a: &[Lit], b: &[Lit]) {
        assert_eq!(a.len(), b.len(), "asserting equality of different widths");

        for (a, b) in a.iter().zip(b) {
            self.solver.add_clause(&[!*a, *b]);
            self.solver.add_clause(&[*a, !*b]);
        }
    }

    pub fn assert_member(&mut self, bits: &[Lit], d: &BvDomain) {
        for (i, bit) in bits.iter().enumerate() {
            let i = i as u32;

            if d.is_fixed_bit(i) {
                let fixed = if d.lo().bit(i) { *bit } else { !*bit };
                self.solver.add_clause(&[fixed]);
            }
        }
    }

    pub fn solve(mut self) -> bool {
        self.solver
            .solve()
            .expect("solving without proof output does not fail")
    }
}
