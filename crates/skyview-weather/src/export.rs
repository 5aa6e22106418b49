use std::path::Path;

use crate::types::WeatherError;

/// Write the displayed summary and forecast to `path` as UTF-8.
///
/// An existing file is overwritten.
pub fn export_text(path: &Path, summary: &str, forecast: &str) -> Result<(), WeatherError> {
    let contents = format!("{}\n\n{}", summary, forecast);
    std::fs::write(path, contents).map_err(|source| WeatherError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Exported weather info to {}", path.display());
    Ok(())
}
