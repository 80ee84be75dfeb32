use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::CommonArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use nanorefine::engine::config::{DescriptorKind, RefineConfigBuilder};

/// Values given through dedicated subcommand flags. They take precedence over everything else.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub energy_threshold: Option<f64>,
    pub gate_bandwidth: Option<f64>,
    pub descriptor_kind: Option<DescriptorKind>,
    pub cutoff_scale: Option<f64>,
}

/// Resolves the run configuration: built-in defaults, then the config file, then `--set`
/// assignments, then dedicated flags.
pub fn build_config(common: &CommonArgs, overrides: &CliOverrides) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &common.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &common.set_values)?;

    let window_file = file_config.energy_window.take().unwrap_or_default();
    let energy_threshold = overrides
        .energy_threshold
        .or(window_file.threshold)
        .unwrap_or(defaults.energy_threshold);

    let gate_file = file_config.quality_gate.take().unwrap_or_default();
    let gate_bandwidth = overrides
        .gate_bandwidth
        .or(gate_file.bandwidth)
        .unwrap_or(defaults.gate_bandwidth);
    let separation_warning = gate_file
        .separation_warning
        .unwrap_or(defaults.separation_warning);

    let descriptor_file = file_config.descriptor.take().unwrap_or_default();
    let descriptor_kind = match (overrides.descriptor_kind, descriptor_file.kind.as_deref()) {
        (Some(kind), _) => kind,
        (None, Some(name)) => name
            .parse::<DescriptorKind>()
            .map_err(|e| CliError::Config(e.to_string()))?,
        (None, None) => defaults.descriptor_kind,
    };
    let cutoff_scale = overrides
        .cutoff_scale
        .or(descriptor_file.cutoff_scale)
        .unwrap_or(defaults.cutoff_scale);

    let core_config = RefineConfigBuilder::new()
        .energy_threshold(energy_threshold)
        .gate_bandwidth(gate_bandwidth)
        .separation_warning(separation_warning)
        .descriptor_kind(descriptor_kind)
        .cutoff_scale(cutoff_scale)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let output_path = parser::run_output_path(&common.output, common.run_index);
    if common.input.contains(&output_path) {
        return Err(CliError::Argument(format!(
            "Output path {:?} would overwrite an input batch.",
            output_path
        )));
    }

    Ok(AppConfig {
        input_paths: common.input.clone(),
        output_path,
        core_config,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for assignment in set_values {
        let (key, value) =
            parser::parse_assignment(assignment).map_err(|e| CliError::Config(e.to_string()))?;
        let float = || parser::parse_float(key, value).map_err(|e| CliError::Config(e.to_string()));

        match key {
            "energy-window.threshold" => {
                config
                    .energy_window
                    .get_or_insert_with(Default::default)
                    .threshold = Some(float()?);
            }
            "quality-gate.bandwidth" => {
                config
                    .quality_gate
                    .get_or_insert_with(Default::default)
                    .bandwidth = Some(float()?);
            }
            "quality-gate.separation-warning" => {
                config
                    .quality_gate
                    .get_or_insert_with(Default::default)
                    .separation_warning = Some(float()?);
            }
            "descriptor.kind" => {
                config.descriptor.get_or_insert_with(Default::default).kind =
                    Some(value.to_string());
            }
            "descriptor.cutoff-scale" => {
                config
                    .descriptor
                    .get_or_insert_with(Default::default)
                    .cutoff_scale = Some(float()?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
