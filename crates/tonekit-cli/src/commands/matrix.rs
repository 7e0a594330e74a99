//! Matrix command: prints the derived transform for a set of values.

use anyhow::Result;
use clap::Args;

use tonekit_math::Mat3x4;

use super::OperatorArgs;

/// Arguments for the `matrix` command.
#[derive(Args, Debug)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub operator: OperatorArgs,
}

fn format_matrix(label: &str, m: &Mat3x4) -> String {
    let mut out = format!("{label}:\n");
    for row in &m.m {
        out.push_str(&format!(
            "  [{:>10.6} {:>10.6} {:>10.6} | {:>10.6}]\n",
            row[0], row[1], row[2], row[3]
        ));
    }
    out
}

/// Render the derived pipeline as text.
pub fn render(args: &MatrixArgs) -> Result<String> {
    let mut op = args.operator.build()?;
    let pipeline = op.pipeline();

    let mut out = format!("{}\n", op.operation_type());
    out.push_str(&format_matrix("band combine", pipeline.band_combine_matrix()));
    match pipeline.vibrance() {
        Some(v) => out.push_str(&format_matrix("vibrance", v.matrix())),
        None => out.push_str("vibrance: off\n"),
    }
    out.push_str(&format!("hue turn: {:.6}\n", pipeline.hue_turn()));
    Ok(out)
}

/// Run the matrix command.
pub fn run(args: MatrixArgs) -> Result<()> {
    print!("{}", render(&args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonekit_adjust::OperationVersion;

    #[test]
    fn test_neutral_prints_identity() {
        let args = MatrixArgs {
            operator: OperatorArgs {
                version: OperationVersion::V3,
                hue: None,
                saturation: None,
                vibrance: None,
                luminosity: None,
                contrast: None,
            },
        };
        let text = render(&args).unwrap();
        assert!(text.contains("[  1.000000   0.000000   0.000000 |   0.000000]"));
        assert!(text.contains("vibrance: off"));
        assert!(text.contains("hue turn: 0.000000"));
    }

    #[test]
    fn test_hue_turn_printed() {
        let args = MatrixArgs {
            operator: OperatorArgs {
                version: OperationVersion::V2,
                hue: Some(-90.0),
                saturation: None,
                vibrance: None,
                luminosity: None,
                contrast: None,
            },
        };
        let text = render(&args).unwrap();
        assert!(text.contains("hue turn: 0.750000"));
    }
}
