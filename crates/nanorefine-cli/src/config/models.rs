use nanorefine::engine::config::RefineConfig;
use std::path::PathBuf;

pub struct AppConfig {
    /// Input batches, pooled in the given order.
    pub input_paths: Vec<PathBuf>,
    /// Output path with the run index applied.
    pub output_path: PathBuf,
    pub core_config: RefineConfig,
}
