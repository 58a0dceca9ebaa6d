//! Sine built only from IEEE-754 add, multiply, divide and floor.
//!
//! Platform `sin` implementations may differ in the last bit. The hash kernel
//! promises bit-identical vectors everywhere, so it uses this one. Argument
//! reduction is Cody-Waite with a two-part π/2; the kernels are the fdlibm
//! minimax polynomials, accurate to well under one f32 ulp on [0, 2π).

const INV_PIO2: f64 = 6.366_197_723_675_813_824_33e-01;
const PIO2_HI: f64 = 1.570_796_326_734_125_614_17e+00;
const PIO2_LO: f64 = 6.077_100_506_506_192_249_32e-11;

const S1: f64 = -1.666_666_666_666_663_243_48e-01;
const S2: f64 = 8.333_333_333_322_489_461_24e-03;
const S3: f64 = -1.984_126_982_985_794_931_34e-04;
const S4: f64 = 2.755_731_370_707_006_767_89e-06;
const S5: f64 = -2.505_076_025_340_686_341_95e-08;
const S6: f64 = 1.589_690_995_211_550_102_21e-10;

const C1: f64 = 4.166_666_666_666_660_190_37e-02;
const C2: f64 = -1.388_888_888_887_410_957_49e-03;
const C3: f64 = 2.480_158_728_947_672_941_78e-05;
const C4: f64 = -2.755_731_435_139_066_330_35e-07;
const C5: f64 = 2.087_572_321_298_174_827_90e-09;
const C6: f64 = -1.135_964_755_778_819_482_65e-11;

#[inline]
fn kernel_sin(x: f64) -> f64 {
    let z = x * x;
    let v = z * x;
    let r = S2 + z * (S3 + z * (S4 + z * (S5 + z * S6)));
    x + v * (S1 + z * r)
}

#[inline]
fn kernel_cos(x: f64) -> f64 {
    let z = x * x;
    let r = z * (C1 + z * (C2 + z * (C3 + z * (C4 + z * (C5 + z * C6)))));
    1.0 - (0.5 * z - z * r)
}

/// sin(x) for `x` in [0, 2π]; accurate beyond that only for small |x|.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn sin(x: f64) -> f64 {
    let k = (x * INV_PIO2 + 0.5).floor();
    let r = (x - k * PIO2_HI) - k * PIO2_LO;
    match (k as i64) & 3 {
        0 => kernel_sin(r),
        1 => kernel_cos(r),
        2 => -kernel_sin(r),
        _ => -kernel_cos(r),
    }
}
