use crate::domain::model::{
    MatchRules, DEFAULT_ACTIVE_STATUS, DEFAULT_EMAIL_DOMAIN, DEFAULT_INACTIVE_STATUS,
};
use crate::utils::error::{Result, SyncError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_KEY_COLUMN: &str = "Employee ID";

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub roster: RosterConfig,
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub key_column: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            key_column: DEFAULT_KEY_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub email_domain: String,
    pub active_status: String,
    pub inactive_status: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            active_status: DEFAULT_ACTIVE_STATUS.to_string(),
            inactive_status: DEFAULT_INACTIVE_STATUS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: LogFormat,
}

impl SyncConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SyncError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SyncError::FileReadError {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STAFF_EMAIL_DOMAIN})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            email_domain: self.rules.email_domain.clone(),
            active_status: self.rules.active_status.clone(),
            inactive_status: self.rules.inactive_status.clone(),
        }
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("roster.key_column", &self.roster.key_column)?;
        validation::validate_email_domain("rules.email_domain", &self.rules.email_domain)?;
        validation::validate_non_empty_string("rules.active_status", &self.rules.active_status)?;
        validation::validate_non_empty_string(
            "rules.inactive_status",
            &self.rules.inactive_status,
        )?;
        validation::validate_distinct(
            "rules.inactive_status",
            &self.rules.active_status,
            &self.rules.inactive_status,
        )?;

        if let Some(level) = &self.logging.level {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.as_str()) {
                return Err(SyncError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}
