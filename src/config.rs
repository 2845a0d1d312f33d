use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use statement_ocr_to_table::ExtractOptions;

pub const CONFIG_PATH_VAR: &str = "STATEMENT_WEB_CONFIG";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Optional JSON config file; every field can also be set (and is overridden)
/// by the matching `STATEMENT_*` environment variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub bind: Option<String>,
    pub pdftoppm: Option<PathBuf>,
    pub tesseract: Option<PathBuf>,
    pub ocr_lang: Option<String>,
    pub tool_timeout_secs: Option<u64>,
    pub raster_dpi: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub extract: ExtractOptions,
}

pub fn load_from_env() -> Result<AppConfig> {
    let file = match env_var(CONFIG_PATH_VAR) {
        Some(path) => read_config_file(Path::new(&path))?,
        None => ConfigFile::default(),
    };
    resolve(&file)
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

pub fn resolve(file: &ConfigFile) -> Result<AppConfig> {
    let bind_raw = env_var("STATEMENT_WEB_BIND")
        .or_else(|| file.bind.clone())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid bind address '{bind_raw}'"))?;

    let mut extract = ExtractOptions::default();
    if let Some(path) = env_var("STATEMENT_PDFTOPPM")
        .map(PathBuf::from)
        .or_else(|| file.pdftoppm.clone())
    {
        extract.rasterizer_path = path;
    }
    if let Some(path) = env_var("STATEMENT_TESSERACT")
        .map(PathBuf::from)
        .or_else(|| file.tesseract.clone())
    {
        extract.ocr_path = path;
    }
    if let Some(lang) = env_var("STATEMENT_OCR_LANG").or_else(|| file.ocr_lang.clone()) {
        extract.ocr_lang = lang;
    }
    if let Some(secs) = parsed_env_var::<u64>("STATEMENT_TOOL_TIMEOUT_SECS")?
        .or(file.tool_timeout_secs)
    {
        extract.tool_timeout = Duration::from_secs(secs);
    }
    if let Some(dpi) = parsed_env_var::<u32>("STATEMENT_RASTER_DPI")?.or(file.raster_dpi) {
        extract.raster_dpi = dpi;
    }

    check_tool_path("pdftoppm", &extract.rasterizer_path)?;
    check_tool_path("tesseract", &extract.ocr_path)?;

    Ok(AppConfig { bind_addr, extract })
}

/// Bare command names resolve through PATH at spawn time; only explicit paths
/// can be checked up front.
fn check_tool_path(tool: &str, path: &Path) -> Result<()> {
    if path.components().count() > 1 && !path.is_file() {
        bail!(
            "configured {tool} path '{}' does not exist",
            path.display()
        );
    }
    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parsed_env_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_var(name)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("invalid {name} '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::{ConfigFile, read_config_file, resolve};

    #[test]
    fn defaults_apply_when_file_is_empty() {
        let config = resolve(&ConfigFile::default()).expect("defaults should resolve");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.extract.rasterizer_path, PathBuf::from("pdftoppm"));
        assert_eq!(config.extract.ocr_lang, "eng");
    }

    #[test]
    fn file_values_override_defaults() {
        let file = ConfigFile {
            bind: Some("0.0.0.0:9000".to_string()),
            ocr_lang: Some("eng+deu".to_string()),
            tool_timeout_secs: Some(5),
            raster_dpi: Some(150),
            ..ConfigFile::default()
        };
        let config = resolve(&file).expect("file values should resolve");
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.extract.ocr_lang, "eng+deu");
        assert_eq!(config.extract.tool_timeout, Duration::from_secs(5));
        assert_eq!(config.extract.raster_dpi, 150);
    }

    #[test]
    fn invalid_bind_address_is_a_clear_error() {
        let file = ConfigFile {
            bind: Some("not-an-addr".to_string()),
            ..ConfigFile::default()
        };
        let error = resolve(&file).expect_err("bad bind should fail");
        assert!(error.to_string().contains("invalid bind address"));
    }

    #[test]
    fn explicit_tool_path_must_exist() {
        let file = ConfigFile {
            pdftoppm: Some(PathBuf::from("/definitely/not/here/pdftoppm")),
            ..ConfigFile::default()
        };
        let error = resolve(&file).expect_err("missing tool path should fail");
        assert!(error.to_string().contains("does not exist"));
    }

    #[test]
    fn config_file_parses_and_rejects_unknown_fields() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"ocr_lang": "eng", "raster_dpi": 200}"#)
            .expect("fixture should be written");
        let parsed = read_config_file(&good).expect("valid config should parse");
        assert_eq!(parsed.ocr_lang.as_deref(), Some("eng"));
        assert_eq!(parsed.raster_dpi, Some(200));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"unknown_key": true}"#).expect("fixture should be written");
        assert!(read_config_file(&bad).is_err());
    }
}
