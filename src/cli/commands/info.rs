//! fastembed info - Version, ABI and kernel details

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, robot_ok};
use crate::core::dimension;
use crate::error::Result;
use crate::ffi::ABI_VERSION;
use crate::vector::Backend;

#[derive(Args, Debug)]
pub struct InfoArgs {}

#[derive(Debug, Serialize)]
pub struct Info {
    pub version: &'static str,
    pub abi_version: i32,
    pub supported_dimensions: Vec<usize>,
    pub default_dimension: usize,
    pub max_text_length: usize,
    pub max_model_dimension: usize,
    pub backend: Backend,
    pub detected_backend: Backend,
    pub model: Option<ModelInfo>,
}

/// The neural model named by `neural.model_path` / `FASTEMBED_MODEL_PATH`.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub path: PathBuf,
    pub present: bool,
    pub max_sequence_length: usize,
}

pub fn run(ctx: &AppContext, _args: &InfoArgs) -> Result<()> {
    let info = Info {
        version: env!("CARGO_PKG_VERSION"),
        abi_version: ABI_VERSION,
        supported_dimensions: dimension::SUPPORTED_DIMENSIONS.to_vec(),
        default_dimension: ctx.config.embedding.default_dimension,
        max_text_length: dimension::MAX_TEXT_LENGTH,
        max_model_dimension: dimension::MAX_MODEL_DIMENSION,
        backend: ctx.kernel.backend(),
        detected_backend: Backend::detect(),
        model: ctx.model_path().map(|path| ModelInfo {
            present: path.is_file(),
            path,
            max_sequence_length: ctx.config.neural.max_sequence_length,
        }),
    };

    if ctx.robot_mode {
        return ctx.emit_robot(&robot_ok(info));
    }

    let dims: Vec<String> = info
        .supported_dimensions
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut layout = HumanLayout::new();
    layout
        .title("fastembed")
        .kv("Version", info.version)
        .kv("ABI version", &info.abi_version.to_string())
        .kv("Dimensions", &dims.join(", "))
        .kv("Default dimension", &info.default_dimension.to_string())
        .kv("Max text bytes", &info.max_text_length.to_string())
        .kv("Max model dim", &info.max_model_dimension.to_string())
        .kv("Kernel backend", info.backend.as_str())
        .kv("Detected backend", info.detected_backend.as_str());
    match &info.model {
        Some(model) => {
            let state = if model.present { "" } else { " (missing)" };
            layout.kv("Model", &format!("{}{state}", model.path.display()));
        }
        None => {
            layout.kv("Model", "(not configured)");
        }
    }
    emit_human(layout);
    Ok(())
}
