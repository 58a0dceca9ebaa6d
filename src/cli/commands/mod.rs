//! CLI command implementations
//!
//! Each subcommand has its own module with an Args struct and a `run`
//! function.

use std::io::Read;

use clap::Subcommand;

pub mod batch;
pub mod config;
pub mod embed;
pub mod info;
pub mod similarity;
pub mod tokenize;
pub mod vector;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Embed(args) => embed::run(ctx, args),
        Commands::Batch(args) => batch::run(ctx, args),
        Commands::Vector(args) => vector::run(ctx, args),
        Commands::Similarity(args) => similarity::run(ctx, args),
        Commands::Tokenize(args) => tokenize::run(ctx, args),
        Commands::Info(args) => info::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hash-embed one text
    Embed(embed::EmbedArgs),

    /// Hash-embed one text per line
    Batch(batch::BatchArgs),

    /// Vector math on JSON arrays
    Vector(vector::VectorArgs),

    /// Cosine similarity of two texts' hash embeddings
    Similarity(similarity::SimilarityArgs),

    /// Show the neural tokenizer's ids for a text
    Tokenize(tokenize::TokenizeArgs),

    /// Show version, ABI and kernel details
    Info(info::InfoArgs),

    /// Inspect configuration
    Config(config::ConfigArgs),
}

/// All of stdin as raw bytes.
pub(crate) fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}

/// Drop one trailing `\n` or `\r\n`.
pub(crate) fn strip_newline(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }
    bytes
}

/// Argument text, or stdin when absent.
pub(crate) fn text_or_stdin(text: Option<&str>) -> Result<Vec<u8>> {
    match text {
        Some(text) => Ok(text.as_bytes().to_vec()),
        None => read_stdin().map(strip_newline),
    }
}
