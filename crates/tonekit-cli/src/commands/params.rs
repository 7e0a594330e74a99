//! Params command: lists an operator version's controls.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use tonekit_adjust::{HueSaturationOperation, OperationVersion, ParamKind, SliderConfig};

/// Arguments for the `params` command.
#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Operator version: v1, v2, v3 or the full type name
    #[arg(id = "op-version", long = "op-version", default_value = "v3")]
    pub version: OperationVersion,

    /// Machine-readable output (JSON)
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ParamEntry<'a> {
    key: ParamKind,
    name: &'static str,
    value: f32,
    #[serde(flatten)]
    config: &'a SliderConfig,
}

#[derive(Serialize)]
struct ParamsReport<'a> {
    version: &'static str,
    neutral_default: bool,
    parameters: Vec<ParamEntry<'a>>,
}

fn report(op: &HueSaturationOperation) -> ParamsReport<'_> {
    let parameters = op
        .parameter_keys()
        .iter()
        .filter_map(|&key| {
            Some(ParamEntry {
                key,
                name: key.name(),
                value: op.value(key)?,
                config: op.slider_config(key)?,
            })
        })
        .collect();
    ParamsReport {
        version: op.operation_type().type_name(),
        neutral_default: op.is_neutral_default(),
        parameters,
    }
}

/// Render the listing for `version`.
pub fn render(version: OperationVersion, json: bool) -> Result<String> {
    let op = HueSaturationOperation::new(version);
    let report = report(&op);
    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = format!("{}\n", report.version);
    for p in &report.parameters {
        out.push_str(&format!(
            "  {:<12} [{:>5}, {:>4}]  default {}  step {}{}\n",
            p.name,
            p.config.min,
            p.config.max,
            p.config.default,
            p.config.step,
            if p.config.logarithmic { "  log" } else { "" },
        ));
    }
    Ok(out)
}

/// Run the params command.
pub fn run(args: ParamsArgs) -> Result<()> {
    print!("{}", render(args.version, args.json)?);
    Ok(())
}
