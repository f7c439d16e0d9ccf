//! Logging setup and configuration files.

use std::path::Path;

use pointlod_core::{OptimizerConfig, Result};

/// Installs `env_logger` as the global logger.
///
/// The log level is read from `RUST_LOG`. Calling this more than once, or
/// after another logger was installed, has no effect.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::debug!("pointlod logging initialized");
    }
}

/// Reads an [`OptimizerConfig`] from a JSON file.
///
/// Missing fields take their defaults. The loaded values are validated.
///
/// # Example
///
/// ```no_run
/// use pointlod::*;
///
/// fn main() -> Result<()> {
///     let config = load_config("pointlod.json")?;
///     println!("{} segments", config.segment_count);
///     Ok(())
/// }
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<OptimizerConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let config = OptimizerConfig::from_json_str(&json)?;
    config.validate()?;
    log::info!("loaded optimizer config from {}", path.display());
    Ok(config)
}

/// Writes an [`OptimizerConfig`] to a JSON file.
pub fn save_config(path: impl AsRef<Path>, config: &OptimizerConfig) -> Result<()> {
    std::fs::write(path, config.to_json_string()?)?;
    Ok(())
}
