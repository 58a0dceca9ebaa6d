//! fastembed vector - Vector math on JSON arrays
//!
//! Operands come from `--a` / `--b`, or the whole request is read from stdin
//! as `{"op": "cosine", "vec1": [..], "vec2": [..]}`.

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::app::AppContext;
use crate::cli::output::{format_vector, robot_ok};
use crate::error::{EmbedError, Result};
use crate::vector::Kernel;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorOp {
    Dot,
    Cosine,
    Norm,
    Normalize,
    Add,
}

impl VectorOp {
    const fn is_binary(self) -> bool {
        matches!(self, Self::Dot | Self::Cosine | Self::Add)
    }
}

#[derive(Args, Debug)]
pub struct VectorArgs {
    /// Operation (reads a JSON request from stdin when omitted)
    #[arg(value_enum)]
    pub op: Option<VectorOp>,

    /// First operand as a JSON array
    #[arg(long)]
    pub a: Option<String>,

    /// Second operand as a JSON array
    #[arg(long)]
    pub b: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VectorRequest {
    pub op: VectorOp,
    pub vec1: Vec<f32>,
    #[serde(default)]
    pub vec2: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VectorResult {
    Scalar(f32),
    Vector(Vec<f32>),
}

pub fn run(ctx: &AppContext, args: &VectorArgs) -> Result<()> {
    let request = match args.op {
        Some(op) => VectorRequest {
            op,
            vec1: parse_operand("--a", args.a.as_deref())?,
            vec2: args
                .b
                .as_deref()
                .map(|raw| parse_operand("--b", Some(raw)))
                .transpose()?,
        },
        None => serde_json::from_slice(&super::read_stdin()?)?,
    };

    let result = evaluate(&ctx.kernel, &request)?;

    if ctx.robot_mode {
        ctx.emit_robot(&robot_ok(serde_json::json!({
            "op": request.op,
            "result": result,
        })))
    } else {
        match result {
            VectorResult::Scalar(value) => println!("{value}"),
            VectorResult::Vector(values) => println!("{}", format_vector(&values)?),
        }
        Ok(())
    }
}

pub fn evaluate(kernel: &Kernel, request: &VectorRequest) -> Result<VectorResult> {
    let a = request.vec1.as_slice();
    let b = match (&request.vec2, request.op.is_binary()) {
        (Some(b), true) => b.as_slice(),
        (None, true) => {
            return Err(EmbedError::invalid(format!(
                "{:?} needs a second vector",
                request.op
            )));
        }
        (_, false) => &[],
    };

    Ok(match request.op {
        VectorOp::Dot => VectorResult::Scalar(kernel.dot_product(a, b)?),
        VectorOp::Cosine => VectorResult::Scalar(kernel.cosine_similarity(a, b)?),
        VectorOp::Norm => VectorResult::Scalar(kernel.vector_norm(a)),
        VectorOp::Normalize => {
            let mut v = a.to_vec();
            kernel.normalize(&mut v);
            VectorResult::Vector(v)
        }
        VectorOp::Add => {
            let mut out = vec![0.0; a.len()];
            kernel.add_vectors(a, b, &mut out)?;
            VectorResult::Vector(out)
        }
    })
}

fn parse_operand(flag: &str, raw: Option<&str>) -> Result<Vec<f32>> {
    let raw = raw.ok_or_else(|| EmbedError::invalid(format!("{flag} is required")))?;
    serde_json::from_str(raw)
        .map_err(|err| EmbedError::invalid(format!("{flag} is not a JSON array of numbers: {err}")))
}
