//! Portable fallback. Mirrors the lane layout of `simd.rs` exactly.

use super::{LANES, reduce_lanes};

pub(super) fn sum_products(a: &[f32], b: &[f32]) -> f64 {
    let split = a.len() - a.len() % LANES;
    let mut lanes = [0.0f64; LANES];
    for (ca, cb) in a[..split]
        .chunks_exact(LANES)
        .zip(b[..split].chunks_exact(LANES))
    {
        for k in 0..LANES {
            lanes[k] += f64::from(ca[k]) * f64::from(cb[k]);
        }
    }

    let mut tail = 0.0f64;
    for (x, y) in a[split..].iter().zip(&b[split..]) {
        tail += f64::from(*x) * f64::from(*y);
    }
    reduce_lanes(lanes) + tail
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn divide_in_place(v: &mut [f32], divisor: f64) {
    for x in v.iter_mut() {
        *x = (f64::from(*x) / divisor) as f32;
    }
}

pub(super) fn add(a: &[f32], b: &[f32], out: &mut [f32]) {
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x + y;
    }
}
