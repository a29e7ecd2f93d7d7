// sheetload-core/src/infrastructure/config/job.rs

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

use crate::infrastructure::error::InfrastructureError;

static SQL_IDENTIFIER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").ok());

/// Job settings (`sheetload.yaml`). Everything has a default so a bare
/// project directory with a credential file is enough.
#[derive(Debug, Deserialize, Validate, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    #[validate(length(min = 1, message = "credentials_path cannot be empty"))]
    pub credentials_path: String,

    #[validate(length(min = 1, message = "csv_path cannot be empty"))]
    pub csv_path: String,

    #[validate(length(min = 1, message = "database_path cannot be empty"))]
    pub database_path: String,

    #[validate(custom(function = "validate_table_name"))]
    pub table_name: String,

    #[validate(length(min = 1, message = "api_base_url cannot be empty"))]
    pub api_base_url: String,

    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,

    pub report_path: Option<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            credentials_path: "credentials.json".to_string(),
            csv_path: "output/fan_support.csv".to_string(),
            database_path: "output/sheetload.duckdb".to_string(),
            table_name: "fan_support".to_string(),
            api_base_url: "https://sheets.googleapis.com/v4".to_string(),
            request_timeout_secs: 30,
            report_path: Some("target/run_results.json".to_string()),
        }
    }
}

fn validate_table_name(name: &str) -> Result<(), ValidationError> {
    let valid = SQL_IDENTIFIER
        .as_ref()
        .is_some_and(|re| re.is_match(name));
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("sql_identifier");
        err.message = Some("table_name must be a plain SQL identifier".into());
        Err(err)
    }
}

/// A [`JobConfig`] with every path resolved against the project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedJobConfig {
    pub credentials_path: PathBuf,
    pub csv_path: PathBuf,
    pub database_path: PathBuf,
    pub table_name: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub report_path: Option<PathBuf>,
}

impl JobConfig {
    pub fn resolve(&self, project_dir: &Path) -> ResolvedJobConfig {
        let abs = |p: &str| {
            let p = Path::new(p);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                project_dir.join(p)
            }
        };
        ResolvedJobConfig {
            credentials_path: abs(&self.credentials_path),
            csv_path: abs(&self.csv_path),
            database_path: abs(&self.database_path),
            table_name: self.table_name.clone(),
            api_base_url: self.api_base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            report_path: self.report_path.as_deref().map(abs),
        }
    }
}

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_job_config(project_dir: &Path) -> Result<ResolvedJobConfig, InfrastructureError> {
    let mut config = match find_job_config(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading job configuration");
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str::<JobConfig>(&content).map_err(|source| {
                InfrastructureError::ConfigParse {
                    path: path.display().to_string(),
                    source,
                }
            })?
        }
        None => {
            info!("No sheetload.yaml found, using defaults");
            JobConfig::default()
        }
    };

    // Layering: ENV wins over file, e.g. SHEETLOAD_TABLE=fan_support_staging sheetload run
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config.validate()?;

    Ok(config.resolve(project_dir))
}

fn find_job_config(root: &Path) -> Option<PathBuf> {
    ["sheetload.yaml", "sheetload.yml"]
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn apply_env_overrides<F>(config: &mut JobConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let overrides: [(&str, &mut String); 4] = [
        ("SHEETLOAD_CREDENTIALS", &mut config.credentials_path),
        ("SHEETLOAD_CSV_PATH", &mut config.csv_path),
        ("SHEETLOAD_DATABASE_PATH", &mut config.database_path),
        ("SHEETLOAD_TABLE", &mut config.table_name),
    ];
    for (key, slot) in overrides {
        if let Some(val) = lookup(key) {
            info!(key, old = %slot, new = %val, "Overriding job config via ENV");
            *slot = val;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_defaults_without_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = load_job_config(dir.path())?;
        assert_eq!(config.table_name, "fan_support");
        assert_eq!(config.credentials_path, dir.path().join("credentials.json"));
        assert_eq!(
            config.report_path,
            Some(dir.path().join("target/run_results.json"))
        );
        Ok(())
    }

    #[test]
    fn test_file_values_and_absolute_paths() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("sheetload.yaml"),
            "credentials_path: /etc/sheetload/sa.json\ntable_name: fans_2024\nrequest_timeout_secs: 10\n",
        )?;
        let config = load_job_config(dir.path())?;
        assert_eq!(
            config.credentials_path,
            PathBuf::from("/etc/sheetload/sa.json")
        );
        assert_eq!(config.table_name, "fans_2024");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.csv_path, dir.path().join("output/fan_support.csv"));
        Ok(())
    }

    #[test]
    fn test_invalid_table_name_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("sheetload.yaml"),
            "table_name: \"fans; DROP TABLE x\"\n",
        )?;
        let res = load_job_config(dir.path());
        assert!(matches!(res, Err(InfrastructureError::InvalidConfig(_))));
        Ok(())
    }

    #[test]
    fn test_unknown_key_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("sheetload.yml"), "tabel_name: typo\n")?;
        let res = load_job_config(dir.path());
        assert!(matches!(res, Err(InfrastructureError::ConfigParse { .. })));
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let mut config = JobConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "SHEETLOAD_TABLE" => Some("staging".to_string()),
            "SHEETLOAD_CSV_PATH" => Some("/tmp/out.csv".to_string()),
            _ => None,
        });
        assert_eq!(config.table_name, "staging");
        assert_eq!(config.csv_path, "/tmp/out.csv");
        assert_eq!(config.database_path, "output/sheetload.duckdb");
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("fan_support").is_ok());
        assert!(validate_table_name("_x1").is_ok());
        assert!(validate_table_name("1abc").is_err());
        assert!(validate_table_name("a-b").is_err());
        assert!(validate_table_name("").is_err());
    }
}
