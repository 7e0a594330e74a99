//! CLI command implementations

pub mod apply;
pub mod matrix;
pub mod params;

use anyhow::{bail, Result};
use clap::Args;
use tracing::debug;

use tonekit_adjust::{HueSaturationOperation, OperationVersion, ParamKind};

/// Operator version and parameter values shared by `apply` and `matrix`.
#[derive(Args, Debug, Clone)]
pub struct OperatorArgs {
    /// Operator version: v1, v2, v3 or the full type name
    #[arg(id = "op-version", long = "op-version", default_value = "v3")]
    pub version: OperationVersion,

    /// Hue rotation in degrees [-180, 180]
    #[arg(long, allow_negative_numbers = true)]
    pub hue: Option<f32>,

    /// Saturation [-100, 100]
    #[arg(long, allow_negative_numbers = true)]
    pub saturation: Option<f32>,

    /// Vibrance [-100, 100] (v3 only)
    #[arg(long, allow_negative_numbers = true)]
    pub vibrance: Option<f32>,

    /// Luminosity [-100, 100]
    #[arg(long, allow_negative_numbers = true)]
    pub luminosity: Option<f32>,

    /// Contrast [-127, 127]
    #[arg(long, allow_negative_numbers = true)]
    pub contrast: Option<f32>,
}

impl OperatorArgs {
    /// Parameter values given on the command line.
    pub fn values(&self) -> Vec<(ParamKind, f32)> {
        [
            (ParamKind::Hue, self.hue),
            (ParamKind::Saturation, self.saturation),
            (ParamKind::Vibrance, self.vibrance),
            (ParamKind::Luminosity, self.luminosity),
            (ParamKind::Contrast, self.contrast),
        ]
        .into_iter()
        .filter_map(|(kind, v)| v.map(|v| (kind, v)))
        .collect()
    }

    /// Builds the operator, rejecting controls the version does not have.
    pub fn build(&self) -> Result<HueSaturationOperation> {
        let values = self.values();
        let inactive: Vec<&str> = values
            .iter()
            .filter(|(kind, _)| !self.version.is_active(*kind))
            .map(|(kind, _)| kind.name())
            .collect();
        if !inactive.is_empty() {
            bail!(
                "{} not available in \"{}\" (available: {})",
                inactive.join(", "),
                self.version,
                self.version
                    .active_params()
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let mut op = HueSaturationOperation::new(self.version);
        let updates = op.set_parameter_values(&values)?;
        debug!(version = %self.version, ?values, ?updates, "operator configured");
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(version: OperationVersion) -> OperatorArgs {
        OperatorArgs {
            version,
            hue: None,
            saturation: None,
            vibrance: None,
            luminosity: None,
            contrast: None,
        }
    }

    #[test]
    fn test_build_rejects_inactive() {
        let mut a = args(OperationVersion::V1);
        a.hue = Some(30.0);
        let err = a.build().unwrap_err().to_string();
        assert!(err.contains("Hue"), "{err}");
    }

    #[test]
    fn test_build_rounds_values() {
        let mut a = args(OperationVersion::V2);
        a.saturation = Some(10.4);
        a.contrast = Some(-200.0);
        let op = a.build().unwrap();
        assert_eq!(op.value(ParamKind::Saturation), Some(10.0));
        assert_eq!(op.value(ParamKind::Contrast), Some(-127.0));
    }
}
