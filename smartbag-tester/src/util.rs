use anyhow::{Context, Result};
use smartbag_engine::{BaggingConfig, Catalog};
use std::fs;
use std::path::Path;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Catalog from `path`, or the bundled one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Catalog::load_default().context("bundled catalog is invalid");
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    Catalog::from_json(&json).with_context(|| format!("invalid catalog {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<BaggingConfig> {
    let Some(path) = path else {
        return Ok(BaggingConfig::default_config());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = BaggingConfig::from_json(&json)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(label: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "smartbag-util-{label}-{}.json",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn loads_bundled_defaults_without_paths() {
        assert_eq!(load_catalog(None).unwrap().len(), 7);
        assert_eq!(load_config(None).unwrap(), BaggingConfig::default());
    }

    #[test]
    fn loads_config_overrides_from_file() {
        let path = temp_file("config", r#"{"items_per_bag": 3}"#);
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.items_per_bag, 3);
        assert_eq!(config.duplicate_cap, 2);
    }

    #[test]
    fn rejects_invalid_config_values() {
        let path = temp_file("zero-cap", r#"{"duplicate_cap": 0}"#);
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));
    }

    #[test]
    fn reports_missing_catalog_path() {
        let err = load_catalog(Some(Path::new("/nonexistent/catalog.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read catalog"));
    }
}
