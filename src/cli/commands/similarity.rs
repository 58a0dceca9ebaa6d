//! fastembed similarity - Cosine similarity of two hash embeddings

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, robot_ok};
use crate::embed::HashEmbedder;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SimilarityArgs {
    pub a: String,

    pub b: String,

    /// Embedding dimension (128, 256, 512, 768, 1024 or 2048)
    #[arg(long, short)]
    pub dim: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &SimilarityArgs) -> Result<()> {
    let dim = ctx.dimension(args.dim)?;
    let embedder = HashEmbedder::new(dim);
    let a = embedder.embed(&args.a)?;
    let b = embedder.embed(&args.b)?;
    let similarity = ctx.kernel.cosine_similarity(&a, &b)?;

    if ctx.robot_mode {
        ctx.emit_robot(&robot_ok(serde_json::json!({
            "dimension": dim.get(),
            "similarity": similarity,
        })))
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Cosine similarity")
            .kv("Dimension", &dim.to_string())
            .kv("Similarity", &format!("{similarity:.6}"));
        emit_human(layout);
        Ok(())
    }
}
