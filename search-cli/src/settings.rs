use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dynamic_search::adapters::outbound::{InMemoryDatasource, InMemoryRegistry};
use dynamic_search::PanelOptions;
use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub search: SearchSettings,
    pub datasource: DatasourceSettings,
    pub panel: PanelSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub debounce_ms: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatasourceSettings {
    pub uid: String,
    /// JSON series fixture, relative to the config directory.
    pub fixture: PathBuf,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PanelSettings {
    /// Panel options JSON as saved by the host, relative to the config directory.
    pub options: PathBuf,
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    fn resolve_paths(mut self, config_directory: &Path) -> Self {
        self.datasource.fixture = config_directory.join(&self.datasource.fixture);
        self.panel.options = config_directory.join(&self.panel.options);
        self
    }

    pub fn load_panel_options(&self) -> Result<PanelOptions> {
        let path = &self.panel.options;
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read panel options at {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse panel options at {}", path.display()))
    }

    pub fn load_registry(&self) -> Result<InMemoryRegistry> {
        let path = &self.datasource.fixture;
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read series fixture at {}", path.display()))?;
        let datasource = InMemoryDatasource::from_json(&self.datasource.uid, &raw)
            .with_context(|| format!("Failed to parse series fixture at {}", path.display()))?;
        Ok(InMemoryRegistry::new().with_datasource(Arc::new(datasource)))
    }
}

/// Layered settings: `base.yaml`, then `<environment>.yaml`, then
/// `SEARCH_`-prefixed environment variables (`SEARCH_SEARCH__DEBOUNCE_MS`).
pub fn read_settings(config_directory: &Path, environment: &Environment) -> Result<Settings> {
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(config_directory.join(environment_filename)).required(false))
        .add_source(
            config::Environment::with_prefix("SEARCH")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .context("Failed to load settings")?;

    let settings = settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")?;
    Ok(settings.resolve_paths(config_directory))
}

#[derive(Display, Debug, EnumString, PartialEq, Eq)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}

impl Environment {
    /// Read `APP_ENVIRONMENT`, defaulting to `local`.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into());
        Environment::from_str(&raw).with_context(|| format!("Failed to parse APP_ENVIRONMENT={raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    fn base(dir: &Path) {
        write(
            dir,
            "base.yaml",
            "search:\n  debounce_ms: 350\ndatasource:\n  uid: prom\n  fixture: series.json\npanel:\n  options: panel.json\n",
        );
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(Environment::from_str("LOCAL").unwrap(), Environment::Local);
        assert_eq!(Environment::from_str("production").unwrap(), Environment::Production);
        assert!(Environment::from_str("staging").is_err());
        assert_eq!(Environment::Local.to_string(), "local");
    }

    #[test]
    fn environment_file_overrides_base() {
        let dir = tempfile::tempdir().unwrap();
        base(dir.path());
        write(dir.path(), "local.yaml", "search:\n  debounce_ms: 100\n");

        let settings = read_settings(dir.path(), &Environment::Local).unwrap();

        assert_eq!(settings.debounce(), Duration::from_millis(100));
        assert_eq!(settings.datasource.uid, "prom");
        assert_eq!(settings.datasource.fixture, dir.path().join("series.json"));
        assert_eq!(settings.panel.options, dir.path().join("panel.json"));
    }

    #[test]
    fn environment_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        base(dir.path());

        let settings = read_settings(dir.path(), &Environment::Production).unwrap();
        assert_eq!(settings.debounce(), Duration::from_millis(350));
    }

    #[test]
    fn loads_options_and_registry() {
        let dir = tempfile::tempdir().unwrap();
        base(dir.path());
        write(
            dir.path(),
            "panel.json",
            r#"{"datasourceUid": "prom", "queryType": "metrics", "metric": "up", "variableName": "metric"}"#,
        );
        write(dir.path(), "series.json", r#"[{"metric": "up", "labels": {"job": "node"}}]"#);

        let settings = read_settings(dir.path(), &Environment::Local).unwrap();
        let options = settings.load_panel_options().unwrap();
        let registry = settings.load_registry().unwrap();

        assert_eq!(options.variable_name, "metric");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn missing_fixture_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        base(dir.path());

        let settings = read_settings(dir.path(), &Environment::Local).unwrap();
        let error = settings.load_registry().err().unwrap();
        assert!(error.to_string().contains("Failed to read series fixture"));
    }
}
