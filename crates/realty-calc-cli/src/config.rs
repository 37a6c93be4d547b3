use std::path::Path;

use realty_calc_core::CalculatorConfig;

use crate::input;

/// Load calculator assumptions, or the built-in defaults when no file is given.
///
/// `.json` files are read as JSON; anything else as YAML.
pub fn load(path: Option<&str>) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(CalculatorConfig::default());
    };

    let contents = input::file::read_text(path)?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = if is_json {
        CalculatorConfig::from_json_str(&contents)?
    } else {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{path}': {e}"))?
    };

    tracing::debug!(path, "calculator config loaded");
    Ok(config)
}
