use nanorefine::core::descriptors::cutoff::DEFAULT_CUTOFF_SCALE;
use nanorefine::engine::config::{
    DEFAULT_ENERGY_WINDOW, DEFAULT_GATE_BANDWIDTH, DEFAULT_SEPARATION_WARNING, DescriptorKind,
};

pub struct DefaultsConfig {
    pub energy_threshold: f64,
    pub gate_bandwidth: f64,
    pub separation_warning: f64,
    pub descriptor_kind: DescriptorKind,
    pub cutoff_scale: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            energy_threshold: DEFAULT_ENERGY_WINDOW,
            gate_bandwidth: DEFAULT_GATE_BANDWIDTH,
            separation_warning: DEFAULT_SEPARATION_WARNING,
            descriptor_kind: DescriptorKind::Precomputed,
            cutoff_scale: DEFAULT_CUTOFF_SCALE,
        }
    }
}
