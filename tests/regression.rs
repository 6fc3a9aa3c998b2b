use libtest_mimic::{Arguments, Failed, Trial};
use polysweep::{
    paths::area_paths, rect_clip, rect_clip_lines, Clipper64, ClipType, ClipperOffset, EndType, FillRule,
    JoinType, OffsetConfig, Paths64, Rect64,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
#[serde(tag = "kind")]
enum Operation {
    Boolean {
        op: ClipType,
        fill_rule: FillRule,
    },
    Offset {
        delta: f64,
        join: JoinType,
        end: EndType,
        #[serde(default = "default_miter_limit")]
        miter_limit: f64,
    },
    RectClip {
        rect: [i64; 4],
    },
}

fn default_miter_limit() -> f64 {
    2.0
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct Expectation {
    area: Option<f64>,
    area_tolerance: f64,
    paths: Option<usize>,
    open_paths: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct RegressionCaseDeclaration {
    operation: Operation,
    subject: Vec<Vec<i64>>,
    #[serde(default)]
    open_subject: Vec<Vec<i64>>,
    #[serde(default)]
    clip: Vec<Vec<i64>>,
    #[serde(default)]
    expect: Expectation,
}

fn to_paths(coords: &[Vec<i64>]) -> Paths64 {
    coords.iter().map(|c| polysweep::make_path64(c)).collect()
}

fn main() {
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_tests() -> Vec<Trial> {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let file_paths = glob::glob(&format!("{ws}/tests/regression/**/*.yml")).unwrap();

    file_paths
        .into_iter()
        .map(|p| {
            let p = p.unwrap();
            let name = input_path_base(&p).display().to_string();
            Trial::test(name, || run_regression_case(p))
        })
        .collect()
}

fn input_path_base(input_path: &Path) -> &Path {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let base = format!("{ws}/tests/regression");
    input_path.strip_prefix(base).unwrap()
}

fn run_regression_case(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path)?;
    let case: RegressionCaseDeclaration = serde_yaml::from_str(&input)?;
    let subject = to_paths(&case.subject);

    let (closed, open) = match case.operation {
        Operation::Boolean { op, fill_rule } => {
            let mut c = Clipper64::new();
            c.add_subject(&subject);
            c.add_open_subject(&to_paths(&case.open_subject));
            c.add_clip(&to_paths(&case.clip));
            let solution = c.execute(op, fill_rule)?;
            (solution.closed, solution.open)
        }
        Operation::Offset {
            delta,
            join,
            end,
            miter_limit,
        } => {
            let mut co = ClipperOffset::with_config(OffsetConfig {
                miter_limit,
                ..OffsetConfig::default()
            });
            co.add_paths(&subject, join, end);
            (co.execute(delta)?, Vec::new())
        }
        Operation::RectClip { rect: [l, t, r, b] } => {
            let rect = Rect64::new(l, t, r, b);
            (
                rect_clip(rect, &subject),
                rect_clip_lines(rect, &to_paths(&case.open_subject)),
            )
        }
    };

    if closed.iter().any(|p| p.len() < 3) {
        return Err(format!("degenerate output path in {closed:?}").into());
    }
    if let Some(n) = case.expect.paths {
        if closed.len() != n {
            return Err(format!("expected {n} closed paths, got {}: {closed:?}", closed.len()).into());
        }
    }
    if let Some(n) = case.expect.open_paths {
        if open.len() != n {
            return Err(format!("expected {n} open paths, got {}: {open:?}", open.len()).into());
        }
    }
    if let Some(want) = case.expect.area {
        let got = area_paths(&closed);
        if (got - want).abs() > case.expect.area_tolerance {
            return Err(format!("expected area {want}, got {got}").into());
        }
    }
    Ok(())
}
