//! Runs a Boolean operation on a pair of path sets and prints the result as
//! YAML.
//!
//! The input is either a YAML file with `subject` and `clip` keys (each a
//! list of paths, each path a list of `{x, y}` points) or one of the
//! built-in generated examples.

use std::path::PathBuf;

use clap::{Args, Parser};
use polysweep::{generators, Clipper64, ClipType, FillRule, Paths64};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Op {
    Union,
    Intersection,
    Xor,
    Difference,
}

impl From<Op> for ClipType {
    fn from(op: Op) -> ClipType {
        match op {
            Op::Union => ClipType::Union,
            Op::Intersection => ClipType::Intersection,
            Op::Xor => ClipType::Xor,
            Op::Difference => ClipType::Difference,
        }
    }
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Example {
    Checkerboard,
    SlantedCheckerboard,
    Slanties,
}

#[derive(Parser)]
struct Cli {
    #[arg(long, value_enum, default_value = "union")]
    op: Op,

    #[command(flatten)]
    input: Input,

    #[arg(long)]
    even_odd: bool,

    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    input: Option<PathBuf>,

    #[arg(long)]
    example: Option<Example>,
}

#[derive(Serialize, Deserialize)]
struct Operands {
    subject: Paths64,
    #[serde(default)]
    clip: Paths64,
}

fn get_operands(input: &Input) -> anyhow::Result<Operands> {
    let (subject, clip) = match (&input.input, &input.example) {
        (Some(path), None) => {
            let text = std::fs::read_to_string(path)?;
            return Ok(serde_yaml::from_str(&text)?);
        }
        (None, Some(Example::Checkerboard)) => generators::checkerboard(10),
        (None, Some(Example::SlantedCheckerboard)) => generators::slanted_checkerboard(10),
        (None, Some(Example::Slanties)) => generators::slanties(10),
        _ => anyhow::bail!("exactly one of an input file or --example is required"),
    };
    Ok(Operands { subject, clip })
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Cli::parse();
    let operands = get_operands(&args.input)?;
    let fill_rule = if args.even_odd {
        FillRule::EvenOdd
    } else {
        FillRule::NonZero
    };

    let mut clipper = Clipper64::new();
    clipper.add_subject(&operands.subject);
    clipper.add_clip(&operands.clip);
    let solution = clipper.execute(args.op.into(), fill_rule)?;
    tracing::info!(
        paths = solution.closed.len(),
        area = polysweep::paths::area_paths(&solution.closed),
        "done"
    );

    let yaml = serde_yaml::to_string(&solution.closed)?;
    match &args.output {
        Some(path) => std::fs::write(path, yaml)?,
        None => print!("{yaml}"),
    }
    Ok(())
}
