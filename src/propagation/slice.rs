use crate::{bitvec::BitVector, domain::BvDomain};

/// `x[upper:lower] = t` determines bits `upper` down to `lower` of `x`; returns the value with
/// all other bits 0 and the mask of the determined bits.
fn slice_solutions(t: BitVector, width: u32, upper: u32, lower: u32) -> (BitVector, BitVector) {
    assert!(
        lower <= upper && upper < width,
        "invalid slice [{}:{}] of {} bits",
        upper,
        lower,
        width
    );
    assert_eq!(
        t.width(),
        upper - lower + 1,
        "target of slice [{}:{}] has the wrong width",
        upper,
        lower
    );

    let care = (BitVector::ones(width) >> (width - 1 - upper)) & (BitVector::ones(width) << lower);

    (BitVector::new(t.value() << lower, width), care)
}

/// Value `x` of the given width with `x[upper:lower] = t`. The remaining bits are set to 0.
pub fn cons_slice(t: BitVector, width: u32, upper: u32, lower: u32) -> Option<BitVector> {
    Some(slice_solutions(t, width, upper, lower).0)
}

pub fn cons_slice_const(
    t: BitVector,
    upper: u32,
    lower: u32,
    d_x: &BvDomain,
) -> Option<BitVector> {
    let (x, care) = slice_solutions(t, d_x.width(), upper, lower);

    d_x.fit(x, care)
}
