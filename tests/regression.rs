use kurbo::BezPath;
use libtest_mimic::{Arguments, Failed, Trial};
use planar_cag::{binary_op, BinaryOp, FillRule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug)]
struct Expected {
    area: f64,
    contours: Option<usize>,
    tolerance: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug)]
struct RegressionCaseDeclaration {
    svg_path_1: String,
    svg_path_2: String,
    fill_rule: FillRule,
    op: BinaryOp,
    expected: Option<Expected>,
}

fn main() {
    let _ = env_logger::builder().is_test(true).try_init();
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_dir() -> String {
    let ws = env!("CARGO_MANIFEST_DIR");
    format!("{ws}/tests/regression")
}

fn regression_tests() -> Vec<Trial> {
    let file_paths = glob::glob(&format!("{}/**/*.yml", regression_dir())).unwrap();

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
    input_path
        .strip_prefix(regression_dir())
        .unwrap_or(input_path)
}

fn run_regression_case(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path)?;
    let case: RegressionCaseDeclaration = serde_yaml::from_str(&input)?;
    let p0 = BezPath::from_svg(case.svg_path_1.as_str())?;
    let p1 = BezPath::from_svg(case.svg_path_2.as_str())?;
    let contours = binary_op(&p0, &p1, case.fill_rule, case.op)?;

    let Some(expected) = case.expected else {
        return Ok(());
    };
    let area = contours.signed_area();
    let tolerance = expected
        .tolerance
        .unwrap_or(1e-6 * expected.area.abs().max(1.0));
    if (area - expected.area).abs() > tolerance {
        return Err(format!("expected area {}, got {area}", expected.area).into());
    }
    if let Some(count) = expected.contours {
        if contours.len() != count {
            return Err(format!("expected {count} contours, got {}", contours.len()).into());
        }
    }
    Ok(())
}
