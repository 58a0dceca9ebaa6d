//! C ABI.
//!
//! Status-returning functions yield 0 on success and -1 on failure; the
//! float-returning vector functions yield 0.0 on invalid input. Panics are
//! caught here and never unwind into the caller. Text is a NUL-terminated
//! byte string; it is not required to be UTF-8.
//!
//! The neural entry points share one process-wide [`ModelCache`]. Rust hosts
//! link the crate and call [`install_runtime`] once at startup; until then
//! every neural call fails with a model-load error.

use std::ffi::CStr;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use libc::{c_char, c_float, c_int};
use parking_lot::RwLock;

use crate::core::Dimension;
use crate::embed;
use crate::error::{EmbedError, Result};
use crate::neural::{InferenceRuntime, ModelCache, NeuralLoader};
use crate::vector;

/// Bumped whenever an exported signature or status convention changes.
pub const ABI_VERSION: c_int = 1;

const OK: c_int = 0;
const FAILED: c_int = -1;

/// Composition root behind the C surface.
struct FfiState {
    cache: Arc<ModelCache>,
    runtime: RwLock<Option<Arc<dyn InferenceRuntime>>>,
}

static STATE: LazyLock<FfiState> = LazyLock::new(|| FfiState {
    cache: Arc::new(ModelCache::new()),
    runtime: RwLock::new(None),
});

/// Install the inference runtime used by the `fastembed_onnx_*` functions.
///
/// Replacing a runtime drops any session loaded by the previous one.
pub fn install_runtime(runtime: Arc<dyn InferenceRuntime>) {
    tracing::info!(runtime = runtime.name(), "installing inference runtime");
    *STATE.runtime.write() = Some(runtime);
    STATE.cache.unload();
}

/// The cache shared by the C entry points.
#[must_use]
pub fn shared_cache() -> Arc<ModelCache> {
    Arc::clone(&STATE.cache)
}

fn loader() -> Result<NeuralLoader> {
    let runtime = STATE.runtime.read().clone();
    match runtime {
        Some(runtime) => Ok(NeuralLoader::new(runtime, shared_cache())),
        None => {
            let err = EmbedError::ModelLoadFailure("no inference runtime installed".into());
            STATE.cache.record_error(err.to_string());
            Err(err)
        }
    }
}

/// Run `f`, turning a panic into `fallback`.
fn boundary<T>(name: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        tracing::error!(function = name, "panic caught at C boundary");
        fallback
    })
}

fn status(name: &str, result: Result<()>) -> c_int {
    match result {
        Ok(()) => OK,
        Err(err) => {
            tracing::debug!(function = name, code = err.code(), error = %err, "call failed");
            FAILED
        }
    }
}

fn length(dim: c_int) -> Option<usize> {
    usize::try_from(dim).ok().filter(|len| *len > 0)
}

/// # Safety
/// `text` must be null or point to a NUL-terminated string that outlives the
/// returned slice.
unsafe fn text_bytes<'a>(text: *const c_char) -> &'a [u8] {
    if text.is_null() {
        return &[];
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract.
    unsafe { CStr::from_ptr(text) }.to_bytes()
}

/// # Safety
/// `ptr` must be null or valid for reads of `len` floats.
unsafe fn input<'a>(ptr: *const c_float, len: usize) -> Option<&'a [f32]> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and valid for `len` reads per the caller's contract.
    Some(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// # Safety
/// `ptr` must be null or valid for writes of `len` floats, unaliased for the
/// lifetime of the returned slice.
unsafe fn output<'a>(ptr: *mut c_float, len: usize) -> &'a mut [f32] {
    if ptr.is_null() {
        return &mut [];
    }
    // SAFETY: non-null, writable for `len` and unaliased per the caller's contract.
    unsafe { std::slice::from_raw_parts_mut(ptr, len) }
}

fn overlaps(a: *const c_float, b: *const c_float, len: usize) -> bool {
    let a_start = a as usize;
    let b_start = b as usize;
    let bytes = len * std::mem::size_of::<f32>();
    a_start < b_start + bytes && b_start < a_start + bytes
}

/// Hash-embed `text` into `out[..dim]`; `dim` 0 selects 128.
///
/// # Safety
/// `text` must be null or NUL-terminated; `out` must be null or writable for
/// the resolved dimension.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_generate(
    text: *const c_char,
    out: *mut c_float,
    dim: c_int,
) -> c_int {
    boundary("fastembed_generate", FAILED, || {
        let result = (|| {
            let requested = usize::try_from(dim)
                .map_err(|_| EmbedError::invalid(format!("negative dimension {dim}")))?;
            let resolved = Dimension::resolve(requested)?;
            // SAFETY: caller guarantees `text` and `out` per this function's contract.
            let (text, out) = unsafe { (text_bytes(text), output(out, resolved.get())) };
            embed::generate(text, out, requested).map(|_| ())
        })();
        status("fastembed_generate", result)
    })
}

/// Hash-embed `n` texts in order, stopping at the first failure. Outputs
/// before the failing index are filled; the rest are left as they were.
///
/// # Safety
/// `texts` and `outs` must each point to `n` entries. Every non-null output
/// must be writable for the resolved dimension and distinct from the others.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_batch_generate(
    texts: *const *const c_char,
    n: c_int,
    outs: *const *mut c_float,
    dim: c_int,
) -> c_int {
    boundary("fastembed_batch_generate", FAILED, || {
        let result = (|| {
            let count = length(n)
                .ok_or_else(|| EmbedError::invalid(format!("batch size {n}")))?;
            if texts.is_null() || outs.is_null() {
                return Err(EmbedError::invalid("null batch array"));
            }
            let requested = usize::try_from(dim)
                .map_err(|_| EmbedError::invalid(format!("negative dimension {dim}")))?;
            let resolved = Dimension::resolve(requested)?;

            // SAFETY: both arrays hold `count` entries per the contract.
            let (text_ptrs, out_ptrs) = unsafe {
                (
                    std::slice::from_raw_parts(texts, count),
                    std::slice::from_raw_parts(outs, count),
                )
            };
            // SAFETY: each entry is null or valid per the contract.
            let batch: Vec<&[u8]> = text_ptrs.iter().map(|p| unsafe { text_bytes(*p) }).collect();
            let mut buffers: Vec<&mut [f32]> = out_ptrs
                .iter()
                .map(|p| unsafe { output(*p, resolved.get()) })
                .collect();
            embed::batch_generate(&batch, &mut buffers, requested).map(|_| ())
        })();
        status("fastembed_batch_generate", result)
    })
}

/// # Safety
/// `a` and `b` must be null or readable for `dim` floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_dot_product(
    a: *const c_float,
    b: *const c_float,
    dim: c_int,
) -> c_float {
    boundary("fastembed_dot_product", 0.0, || {
        let Some(len) = length(dim) else { return 0.0 };
        // SAFETY: caller contract.
        match unsafe { (input(a, len), input(b, len)) } {
            (Some(a), Some(b)) => vector::dot_product(a, b).unwrap_or(0.0),
            _ => 0.0,
        }
    })
}

/// # Safety
/// `a` and `b` must be null or readable for `dim` floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_cosine_similarity(
    a: *const c_float,
    b: *const c_float,
    dim: c_int,
) -> c_float {
    boundary("fastembed_cosine_similarity", 0.0, || {
        let Some(len) = length(dim) else { return 0.0 };
        // SAFETY: caller contract.
        match unsafe { (input(a, len), input(b, len)) } {
            (Some(a), Some(b)) => vector::cosine_similarity(a, b).unwrap_or(0.0),
            _ => 0.0,
        }
    })
}

/// # Safety
/// `v` must be null or readable for `dim` floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_vector_norm(v: *const c_float, dim: c_int) -> c_float {
    boundary("fastembed_vector_norm", 0.0, || {
        let Some(len) = length(dim) else { return 0.0 };
        // SAFETY: caller contract.
        unsafe { input(v, len) }.map_or(0.0, vector::vector_norm)
    })
}

/// Scale `v` to unit length in place; zero vectors are left unchanged.
///
/// # Safety
/// `v` must be null or writable for `dim` floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_normalize(v: *mut c_float, dim: c_int) {
    boundary("fastembed_normalize", (), || {
        let Some(len) = length(dim) else { return };
        // SAFETY: caller contract.
        vector::normalize(unsafe { output(v, len) });
    });
}

/// `out[i] = a[i] + b[i]`. Does nothing if `out` overlaps either input.
///
/// # Safety
/// `a` and `b` must be null or readable, and `out` null or writable, for
/// `dim` floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_add_vectors(
    a: *const c_float,
    b: *const c_float,
    out: *mut c_float,
    dim: c_int,
) {
    boundary("fastembed_add_vectors", (), || {
        let Some(len) = length(dim) else { return };
        if a.is_null() || b.is_null() || out.is_null() {
            return;
        }
        if overlaps(out, a, len) || overlaps(out, b, len) {
            tracing::debug!("fastembed_add_vectors: output aliases an input, skipping");
            return;
        }
        // SAFETY: all three non-null, sized by caller contract, `out` disjoint.
        let (a, b, out) = unsafe { (input(a, len), input(b, len), output(out, len)) };
        if let (Some(a), Some(b)) = (a, b) {
            if let Err(err) = vector::add_vectors(a, b, out) {
                tracing::debug!(error = %err, "fastembed_add_vectors failed");
            }
        }
    });
}

/// Neural-embed `text` with the model at `path` into `out`.
///
/// `dim` 0 uses the model's dimension; otherwise it must match it.
///
/// # Safety
/// `path` and `text` must be null or NUL-terminated. `out` must be null or
/// writable for `dim` floats, or for the model's dimension when `dim` is 0.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_onnx_generate(
    path: *const c_char,
    text: *const c_char,
    out: *mut c_float,
    dim: c_int,
) -> c_int {
    boundary("fastembed_onnx_generate", FAILED, || {
        let result = (|| {
            // SAFETY: caller contract.
            let model = unsafe { model_arg(path) }?;
            let loader = loader()?;
            // SAFETY: caller contract.
            let text = unsafe { text_bytes(text) };
            let requested = match usize::try_from(dim) {
                Ok(requested) => requested,
                Err(_) => {
                    let err = EmbedError::invalid(format!("negative dimension {dim}"));
                    STATE.cache.record_error(err.to_string());
                    return Err(err);
                }
            };
            let capacity = if requested == 0 {
                loader.model_dimension(&model)?
            } else {
                requested
            };
            // SAFETY: `out` holds `capacity` floats per the contract.
            let out = unsafe { output(out, capacity) };
            loader.generate(&model, text, out, requested).map(|_| ())
        })();
        status("fastembed_onnx_generate", result)
    })
}

/// Drop the cached model session. Always returns 0.
#[unsafe(no_mangle)]
pub extern "C" fn fastembed_onnx_unload() -> c_int {
    boundary("fastembed_onnx_unload", OK, || {
        STATE.cache.unload();
        OK
    })
}

/// Copy the last neural-path error into `buf` as a NUL-terminated string,
/// truncated to `size - 1` bytes. Returns -1 when there is none.
///
/// # Safety
/// `buf` must be null or writable for `size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_onnx_get_last_error(buf: *mut c_char, size: c_int) -> c_int {
    boundary("fastembed_onnx_get_last_error", FAILED, || {
        let Some(capacity) = length(size) else { return FAILED };
        if buf.is_null() {
            return FAILED;
        }
        let Some(message) = STATE.cache.last_error() else { return FAILED };
        let bytes = message.as_bytes();
        let copied = bytes.len().min(capacity - 1);
        // SAFETY: `buf` is writable for `capacity` bytes and `copied < capacity`.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr().cast::<c_char>(), buf, copied);
            *buf.add(copied) = 0;
        }
        OK
    })
}

/// Output dimension of the model at `path`, or -1.
///
/// # Safety
/// `path` must be null or NUL-terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fastembed_onnx_get_model_dimension(path: *const c_char) -> c_int {
    boundary("fastembed_onnx_get_model_dimension", FAILED, || {
        // SAFETY: caller contract.
        let result = unsafe { model_arg(path) }
            .and_then(|model| loader()?.model_dimension(&model));
        match result {
            Ok(dim) => c_int::try_from(dim).unwrap_or(FAILED),
            Err(_) => FAILED,
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn fastembed_abi_version() -> c_int {
    ABI_VERSION
}

/// The model path argument; null is an invalid argument, recorded as the
/// last error.
///
/// # Safety
/// `path` must be null or NUL-terminated.
unsafe fn model_arg(path: *const c_char) -> Result<PathBuf> {
    if path.is_null() {
        let err = EmbedError::invalid("model path is null");
        STATE.cache.record_error(err.to_string());
        return Err(err);
    }
    // SAFETY: non-null per the check above, NUL-terminated per the contract.
    Ok(model_path(unsafe { text_bytes(path) }))
}

#[cfg(unix)]
fn model_path(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn model_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
