//! fastembed batch - Hash-embed one text per line

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, format_vector, robot_ok, robot_partial};
use crate::embed;
use crate::error::{EmbedError, Result};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File with one text per line (stdin when omitted)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Output dimension (128, 256, 512, 768, 1024 or 2048)
    #[arg(long, short)]
    pub dim: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &BatchArgs) -> Result<()> {
    let raw = match &args.file {
        Some(path) => std::fs::read(path)?,
        None => super::read_stdin()?,
    };
    let texts = split_lines(&raw);
    let dim = ctx.dimension(args.dim)?;

    let mut outputs = vec![vec![0.0f32; dim.get()]; texts.len()];
    let mut buffers: Vec<&mut [f32]> = outputs.iter_mut().map(Vec::as_mut_slice).collect();
    let result = embed::batch_generate(&texts, &mut buffers, dim.get());

    match result {
        Ok(_) => {
            if ctx.robot_mode {
                ctx.emit_robot(&robot_ok(serde_json::json!({
                    "dimension": dim.get(),
                    "count": outputs.len(),
                    "embeddings": outputs,
                })))
            } else {
                emit_vectors(&outputs, dim.get())
            }
        }
        Err(EmbedError::Batch { completed, source }) => {
            let err = EmbedError::Batch { completed, source };
            let done = &outputs[..completed];
            if ctx.robot_mode {
                ctx.emit_robot(&robot_partial(
                    serde_json::json!({
                        "dimension": dim.get(),
                        "count": done.len(),
                        "embeddings": done,
                    }),
                    completed,
                    texts.len() - completed,
                    err.to_string(),
                ))?;
            } else if !done.is_empty() {
                emit_vectors(done, dim.get())?;
            }
            Err(err)
        }
        Err(err) => Err(err),
    }
}

/// Lines without their `\n` / `\r\n`; a final newline does not start a new line.
fn split_lines(raw: &[u8]) -> Vec<&[u8]> {
    let body = raw.strip_suffix(b"\n").unwrap_or(raw);
    if body.is_empty() {
        return Vec::new();
    }
    body.split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect()
}

fn emit_vectors(vectors: &[Vec<f32>], dim: usize) -> Result<()> {
    let mut layout = HumanLayout::new();
    layout
        .title("Hash embeddings")
        .kv("Dimension", &dim.to_string())
        .kv("Count", &vectors.len().to_string())
        .blank();
    for vector in vectors {
        layout.push_line(format_vector(vector)?);
    }
    emit_human(layout);
    Ok(())
}
