//! Eight-lane implementation on `wide`.
//!
//! Products and squares accumulate in two `f64x4` halves. An f32·f32 product
//! is exact in f64, so only the additions round.

use wide::{f32x8, f64x4};

use super::{LANES, reduce_lanes};

#[inline]
fn load(chunk: &[f32]) -> f32x8 {
    let mut lanes = [0.0f32; LANES];
    lanes.copy_from_slice(chunk);
    f32x8::from(lanes)
}

#[inline]
fn widen(chunk: &[f32]) -> f64x4 {
    f64x4::from([
        f64::from(chunk[0]),
        f64::from(chunk[1]),
        f64::from(chunk[2]),
        f64::from(chunk[3]),
    ])
}

pub(super) fn sum_products(a: &[f32], b: &[f32]) -> f64 {
    let split = a.len() - a.len() % LANES;
    let mut lo = f64x4::splat(0.0);
    let mut hi = f64x4::splat(0.0);
    for (ca, cb) in a[..split]
        .chunks_exact(LANES)
        .zip(b[..split].chunks_exact(LANES))
    {
        // Multiply then add; no fused multiply-add, to match the scalar path.
        lo = lo + widen(&ca[..4]) * widen(&cb[..4]);
        hi = hi + widen(&ca[4..]) * widen(&cb[4..]);
    }

    let mut lanes = [0.0f64; LANES];
    lanes[..4].copy_from_slice(&lo.to_array());
    lanes[4..].copy_from_slice(&hi.to_array());

    let mut tail = 0.0f64;
    for (x, y) in a[split..].iter().zip(&b[split..]) {
        tail += f64::from(*x) * f64::from(*y);
    }
    reduce_lanes(lanes) + tail
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn divide_in_place(v: &mut [f32], divisor: f64) {
    let split = v.len() - v.len() % 4;
    let div = f64x4::splat(divisor);
    for chunk in v[..split].chunks_exact_mut(4) {
        let scaled = (widen(chunk) / div).to_array();
        for (x, s) in chunk.iter_mut().zip(scaled) {
            *x = s as f32;
        }
    }
    for x in &mut v[split..] {
        *x = (f64::from(*x) / divisor) as f32;
    }
}

pub(super) fn add(a: &[f32], b: &[f32], out: &mut [f32]) {
    let split = out.len() - out.len() % LANES;
    for ((co, ca), cb) in out[..split]
        .chunks_exact_mut(LANES)
        .zip(a[..split].chunks_exact(LANES))
        .zip(b[..split].chunks_exact(LANES))
    {
        let sum = load(ca) + load(cb);
        co.copy_from_slice(&sum.to_array());
    }
    for ((o, x), y) in out[split..].iter_mut().zip(&a[split..]).zip(&b[split..]) {
        *o = x + y;
    }
}
