use crate::core::descriptors::cutoff::DEFAULT_CUTOFF_SCALE;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_ENERGY_WINDOW: f64 = 1.0;
pub const DEFAULT_GATE_BANDWIDTH: f64 = 0.1;
pub const DEFAULT_SEPARATION_WARNING: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyWindowConfig {
    /// Width of the kept window above the lowest energy, in eV.
    pub threshold: f64,
}

impl Default for EnergyWindowConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ENERGY_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityGateConfig {
    /// Absolute kernel width of the energy-change density estimate, in eV.
    pub bandwidth: f64,
    /// Valley-to-peak density ratio above which the fitted threshold is reported as unstable.
    pub separation_warning: f64,
}

impl Default for QualityGateConfig {
    fn default() -> Self {
        Self {
            bandwidth: DEFAULT_GATE_BANDWIDTH,
            separation_warning: DEFAULT_SEPARATION_WARNING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptorKind {
    /// Values shipped with the batch by the external descriptor service.
    #[default]
    Precomputed,
    /// Scaled covalent-radius neighbour cutoff.
    Cutoff,
}

impl DescriptorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKind::Precomputed => "precomputed",
            DescriptorKind::Cutoff => "cutoff",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "precomputed" => Ok(DescriptorKind::Precomputed),
            "cutoff" => Ok(DescriptorKind::Cutoff),
            other => Err(ConfigError::InvalidParameter {
                name: "descriptor.kind",
                reason: format!("unknown descriptor kind '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CutoffConfig {
    /// Multiplier on the sum of covalent radii.
    pub scale: f64,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_CUTOFF_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescriptorConfig {
    pub kind: DescriptorKind,
    pub cutoff: CutoffConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefineConfig {
    pub energy_window: EnergyWindowConfig,
    pub quality_gate: QualityGateConfig,
    pub descriptor: DescriptorConfig,
}

#[derive(Default)]
pub struct RefineConfigBuilder {
    energy_threshold: Option<f64>,
    gate_bandwidth: Option<f64>,
    separation_warning: Option<f64>,
    descriptor_kind: Option<DescriptorKind>,
    cutoff_scale: Option<f64>,
}

impl RefineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn energy_threshold(mut self, threshold: f64) -> Self {
        self.energy_threshold = Some(threshold);
        self
    }
    pub fn gate_bandwidth(mut self, bandwidth: f64) -> Self {
        self.gate_bandwidth = Some(bandwidth);
        self
    }
    pub fn separation_warning(mut self, ratio: f64) -> Self {
        self.separation_warning = Some(ratio);
        self
    }
    pub fn descriptor_kind(mut self, kind: DescriptorKind) -> Self {
        self.descriptor_kind = Some(kind);
        self
    }
    pub fn cutoff_scale(mut self, scale: f64) -> Self {
        self.cutoff_scale = Some(scale);
        self
    }

    pub fn build(self) -> Result<RefineConfig, ConfigError> {
        let threshold = self
            .energy_threshold
            .ok_or(ConfigError::MissingParameter("energy_threshold"))?;
        check(threshold.is_finite() && threshold >= 0.0, "energy_threshold", || {
            format!("must be a non-negative finite energy, got {threshold}")
        })?;

        let bandwidth = self
            .gate_bandwidth
            .ok_or(ConfigError::MissingParameter("gate_bandwidth"))?;
        check(bandwidth.is_finite() && bandwidth > 0.0, "gate_bandwidth", || {
            format!("must be a positive finite energy, got {bandwidth}")
        })?;

        let separation_warning = self
            .separation_warning
            .ok_or(ConfigError::MissingParameter("separation_warning"))?;
        check(
            separation_warning.is_finite() && separation_warning > 0.0,
            "separation_warning",
            || format!("must be a positive ratio, got {separation_warning}"),
        )?;

        let kind = self
            .descriptor_kind
            .ok_or(ConfigError::MissingParameter("descriptor_kind"))?;
        let scale = self
            .cutoff_scale
            .ok_or(ConfigError::MissingParameter("cutoff_scale"))?;
        check(scale.is_finite() && scale > 0.0, "cutoff_scale", || {
            format!("must be a positive factor, got {scale}")
        })?;

        Ok(RefineConfig {
            energy_window: EnergyWindowConfig { threshold },
            quality_gate: QualityGateConfig {
                bandwidth,
                separation_warning,
            },
            descriptor: DescriptorConfig {
                kind,
                cutoff: CutoffConfig { scale },
            },
        })
    }
}

fn check(
    valid: bool,
    name: &'static str,
    reason: impl FnOnce() -> String,
) -> Result<(), ConfigError> {
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: reason(),
        })
    }
}
