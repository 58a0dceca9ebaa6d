//! Vector math kernel.
//!
//! Dot product, L2 norm, cosine similarity, in-place normalization and
//! element-wise addition over `f32` slices. Every function is pure and
//! reentrant. Unlike a raw pointer API, the slice forms check lengths:
//! two inputs of different lengths are an [`EmbedError::InvalidArgument`].
//!
//! The free functions use the process-wide [`Backend::global`]; build a
//! [`Kernel`] to pin a backend explicitly.

pub mod backend;
mod scalar;
mod simd;

pub use backend::Backend;

use crate::error::{EmbedError, Result};

pub(crate) const LANES: usize = 8;

/// Fixed left-to-right reduction shared by both backends.
#[inline]
pub(crate) fn reduce_lanes(lanes: [f64; LANES]) -> f64 {
    lanes.iter().fold(0.0f64, |acc, x| acc + x)
}

/// Vector operations bound to one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    backend: Backend,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::global()
    }
}

impl Kernel {
    #[must_use]
    pub const fn new(backend: Backend) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn global() -> Self {
        Self::new(Backend::global())
    }

    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Σ aᵢ·bᵢ accumulated in f64. Squares of any finite f32 neither
    /// overflow nor underflow there.
    fn sum_products(&self, a: &[f32], b: &[f32]) -> f64 {
        match self.backend {
            Backend::Simd => simd::sum_products(a, b),
            Backend::Scalar => scalar::sum_products(a, b),
        }
    }

    /// Σ aᵢ·bᵢ.
    #[allow(clippy::cast_possible_truncation)]
    pub fn dot_product(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        check_same_len(a.len(), b.len())?;
        Ok(self.sum_products(a, b) as f32)
    }

    /// Euclidean norm; 0.0 for the zero vector.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn vector_norm(&self, v: &[f32]) -> f32 {
        self.sum_products(v, v).sqrt() as f32
    }

    /// dot(a, b) / (|a|·|b|), clamped to [-1, 1]. Returns 0.0 when either
    /// norm is zero or the inputs hold non-finite values.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cosine_similarity(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        check_same_len(a.len(), b.len())?;
        let aa = self.sum_products(a, a);
        let bb = self.sum_products(b, b);
        if aa == 0.0 || bb == 0.0 {
            return Ok(0.0);
        }
        let dot = self.sum_products(a, b);
        // |a|·|b| = sqrt(aa·bb); sqrt(x·x) == x in IEEE arithmetic, so
        // cos(v, v) comes out as exactly 1.0.
        let cosine = dot / (aa * bb).sqrt();
        if cosine.is_nan() {
            return Ok(0.0);
        }
        Ok(cosine.clamp(-1.0, 1.0) as f32)
    }

    /// Scale `v` to unit length in place. Zero vectors are left untouched.
    pub fn normalize(&self, v: &mut [f32]) {
        let norm = self.sum_products(v, v).sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return;
        }
        match self.backend {
            Backend::Simd => simd::divide_in_place(v, norm),
            Backend::Scalar => scalar::divide_in_place(v, norm),
        }
    }

    /// `out[i] = a[i] + b[i]`; all three slices must have the same length.
    pub fn add_vectors(&self, a: &[f32], b: &[f32], out: &mut [f32]) -> Result<()> {
        check_same_len(a.len(), b.len())?;
        check_same_len(a.len(), out.len())?;
        match self.backend {
            Backend::Simd => simd::add(a, b, out),
            Backend::Scalar => scalar::add(a, b, out),
        }
        Ok(())
    }
}

fn check_same_len(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(EmbedError::invalid(format!(
            "vector length mismatch: {left} vs {right}"
        )));
    }
    Ok(())
}

pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f32> {
    Kernel::global().dot_product(a, b)
}

#[must_use]
pub fn vector_norm(v: &[f32]) -> f32 {
    Kernel::global().vector_norm(v)
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    Kernel::global().cosine_similarity(a, b)
}

pub fn normalize(v: &mut [f32]) {
    Kernel::global().normalize(v);
}

pub fn add_vectors(a: &[f32], b: &[f32], out: &mut [f32]) -> Result<()> {
    Kernel::global().add_vectors(a, b, out)
}
