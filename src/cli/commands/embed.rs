//! fastembed embed - Hash-embed one text

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, format_vector, robot_ok};
use crate::embed;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Text to embed (read from stdin when omitted)
    pub text: Option<String>,

    /// Output dimension (128, 256, 512, 768, 1024 or 2048)
    #[arg(long, short)]
    pub dim: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &EmbedArgs) -> Result<()> {
    let text = super::text_or_stdin(args.text.as_deref())?;
    let dim = ctx.dimension(args.dim)?;

    let mut embedding = vec![0.0f32; dim.get()];
    embed::generate(&text, &mut embedding, dim.get())?;

    if ctx.robot_mode {
        ctx.emit_robot(&robot_ok(serde_json::json!({
            "dimension": dim.get(),
            "bytes": text.len(),
            "norm": ctx.kernel.vector_norm(&embedding),
            "embedding": embedding,
        })))
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Hash embedding")
            .kv("Dimension", &dim.to_string())
            .kv("Input bytes", &text.len().to_string())
            .kv("Norm", &format!("{:.6}", ctx.kernel.vector_norm(&embedding)))
            .blank()
            .push_line(format_vector(&embedding)?);
        emit_human(layout);
        Ok(())
    }
}
