//! fastembed tokenize - Show the neural tokenizer's ids for a text

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// Text to tokenize (read from stdin when omitted)
    pub text: Option<String>,
}

pub fn run(ctx: &AppContext, args: &TokenizeArgs) -> Result<()> {
    let text = super::text_or_stdin(args.text.as_deref())?;
    let tokenizer = ctx.config.tokenizer();
    let encoded = tokenizer.encode(&text)?;

    if ctx.robot_mode {
        ctx.emit_robot(&robot_ok(serde_json::json!({
            "length": encoded.len(),
            "max_length": tokenizer.max_length(),
            "input_ids": encoded.input_ids,
        })))
    } else {
        let ids: Vec<String> = encoded.input_ids.iter().map(ToString::to_string).collect();
        let mut layout = HumanLayout::new();
        layout
            .title("Tokens")
            .kv("Length", &encoded.len().to_string())
            .kv("Max length", &tokenizer.max_length().to_string())
            .blank()
            .push_line(ids.join(" "));
        emit_human(layout);
        Ok(())
    }
}
