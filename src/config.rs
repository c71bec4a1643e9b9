//! Runtime settings.
//!
//! Resolution order (later wins):
//! 1. built-in defaults
//! 2. `.env` file (via `dotenvy`) and process environment
//! 3. CLI flags (applied by `app`)

use std::path::PathBuf;

use crate::domain::ParameterNames;
use crate::error::AppError;

pub const DEFAULT_MODEL_PATH: &str = "saved_mmm.json";
pub const DEFAULT_LOG_FILTER: &str = "warn";

pub const ENV_MODEL_PATH: &str = "MMM_MODEL_PATH";
pub const ENV_API_TOKEN: &str = "MMM_API_TOKEN";
pub const ENV_ACCEPTED_TOKEN: &str = "MMM_ACCEPTED_TOKEN";
pub const ENV_LOG: &str = "MMM_LOG";
pub const ENV_PARAM_ROI: &str = "MMM_PARAM_ROI";
pub const ENV_PARAM_EFFECTIVENESS: &str = "MMM_PARAM_EFFECTIVENESS";
pub const ENV_PARAM_EC: &str = "MMM_PARAM_EC";
pub const ENV_PARAM_SLOPE: &str = "MMM_PARAM_SLOPE";
pub const ENV_PARAM_CONTRIBUTION: &str = "MMM_PARAM_CONTRIBUTION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Fitted-model artifact path.
    pub model_path: PathBuf,
    /// Credential presented on behalf of the CLI user.
    pub api_token: Option<String>,
    /// If set, the only credential the gate accepts.
    pub accepted_token: Option<String>,
    /// `tracing` filter directive (e.g. `info`, `mmm_insights=debug`).
    pub log_filter: String,
    pub parameters: ParameterNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            api_token: None,
            accepted_token: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            parameters: ParameterNames::default(),
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and read settings from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (environment, map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| -> Result<Option<String>, AppError> {
            match lookup(key) {
                None => Ok(None),
                Some(v) if v.trim().is_empty() => Err(AppError::Config(format!("{key} is set but empty"))),
                Some(v) => Ok(Some(v.trim().to_string())),
            }
        };

        let mut settings = Self::default();
        if let Some(path) = get(ENV_MODEL_PATH)? {
            settings.model_path = PathBuf::from(path);
        }
        settings.api_token = get(ENV_API_TOKEN)?;
        settings.accepted_token = get(ENV_ACCEPTED_TOKEN)?;
        if let Some(filter) = get(ENV_LOG)? {
            settings.log_filter = filter;
        }

        let params = &mut settings.parameters;
        for (key, slot) in [
            (ENV_PARAM_ROI, &mut params.roi),
            (ENV_PARAM_EFFECTIVENESS, &mut params.effectiveness),
            (ENV_PARAM_EC, &mut params.ec),
            (ENV_PARAM_SLOPE, &mut params.slope),
            (ENV_PARAM_CONTRIBUTION, &mut params.contribution),
        ] {
            if let Some(name) = get(key)? {
                *slot = name;
            }
        }

        Ok(settings)
    }
}
