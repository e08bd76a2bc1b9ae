use std::{fs, path::Path};

use anyhow::{Context, Result};
use survival_core::Settings;

/// Reads settings from `path`, or the defaults when no file is given.
///
/// Missing keys fall back to their defaults section by section.
pub(crate) fn load(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid config {}", path.display()))
}

pub(crate) fn parse(text: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(text).context("failed to parse settings TOML")?;
    settings.validate()?;
    Ok(settings)
}
