//! Inflates (or deflates) one of the generated examples and draws the input
//! and output to an SVG file.

use std::path::PathBuf;

use clap::Parser;
use polysweep::{generators, svg::SvgWriter, ClipperOffset, EndType, FillRule, JoinType, OffsetConfig, Point64};

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Join {
    Square,
    Bevel,
    Round,
    Miter,
}

impl From<Join> for JoinType {
    fn from(j: Join) -> JoinType {
        match j {
            Join::Square => JoinType::Square,
            Join::Bevel => JoinType::Bevel,
            Join::Round => JoinType::Round,
            Join::Miter => JoinType::Miter,
        }
    }
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Example {
    Checkerboard,
    Star,
}

#[derive(Parser)]
struct Cli {
    #[arg(long)]
    output: PathBuf,

    #[arg(long, value_enum, default_value = "checkerboard")]
    example: Example,

    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    delta: f64,

    #[arg(long, value_enum, default_value = "round")]
    join: Join,

    #[arg(long, default_value_t = 2.0)]
    miter_limit: f64,
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Cli::parse();
    let input = match args.example {
        Example::Checkerboard => generators::checkerboard(5).0,
        Example::Star => vec![generators::star(Point64::new(0, 0), 100.0, 7, 3)],
    };

    let mut offset = ClipperOffset::with_config(OffsetConfig {
        miter_limit: args.miter_limit,
        ..OffsetConfig::default()
    });
    offset.add_paths(&input, args.join.into(), EndType::Polygon);
    let output = offset.execute(args.delta)?;
    tracing::info!(inputs = input.len(), outputs = output.len(), "inflated");

    let mut svg = SvgWriter::new();
    svg.add_subject(&input, FillRule::NonZero)
        .add_solution(&output, FillRule::Positive, true);
    svg.save(&args.output)?;
    Ok(())
}
