//! Configuration loading and validation for Coralink agents.
//!
//! All configuration comes from named environment variables (the contract
//! an orchestrator host injects into managed agents). In standalone mode a
//! `.env` file is loaded first via `dotenvy`; when
//! `CORAL_ORCHESTRATION_RUNTIME` is set the host is responsible for the
//! environment and the `.env` file is ignored.
//!
//! Settings are constructed exactly once at process start and passed by
//! reference to every component. Nothing outside this crate reads the
//! environment.

use coralink_core::error::ConfigError;

/// Default agent description advertised to the orchestration server.
pub const DEFAULT_AGENT_DESCRIPTION: &str = "A specialized high school economics tutor agent \
    that helps students understand and solve economics problems including supply and demand, \
    market equilibrium, elasticity, GDP analysis, and other microeconomics and macroeconomics \
    concepts.";

/// The complete runtime configuration.
#[derive(Clone)]
pub struct Settings {
    pub coral: CoralSettings,
    pub model: ModelSettings,
}

/// Connection settings for the orchestration endpoint.
#[derive(Debug, Clone)]
pub struct CoralSettings {
    /// Base URL of the orchestration endpoint's SSE session route
    /// (`CORAL_SSE_URL`).
    pub sse_url: String,

    /// This agent's identifier within the session (`CORAL_AGENT_ID`).
    pub agent_id: String,

    /// Description advertised when registering the session.
    pub agent_description: String,

    /// Whether an orchestrator host launched this process
    /// (`CORAL_ORCHESTRATION_RUNTIME` set).
    pub orchestrated: bool,

    /// Read timeout for session operations, in seconds (`TIMEOUT_MS`; the
    /// variable name is historical, the unit is seconds).
    pub timeout_secs: u64,
}

/// LLM provider settings.
#[derive(Clone)]
pub struct ModelSettings {
    /// Model name (`MODEL_NAME`).
    pub name: String,

    /// Provider label (`MODEL_PROVIDER`): "openai", "openrouter", "ollama",
    /// or anything OpenAI-compatible together with `MODEL_BASE_URL`.
    pub provider: String,

    /// API key (`MODEL_API_KEY`, falling back to `OPENAI_API_KEY`).
    pub api_key: String,

    /// Sampling temperature (`MODEL_TEMPERATURE`).
    pub temperature: f32,

    /// Max completion tokens (`MODEL_MAX_TOKENS`).
    pub max_tokens: u32,

    /// Optional base URL override (`MODEL_BASE_URL`).
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSettings")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("coral", &self.coral)
            .field("model", &self.model)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// In standalone mode (no `CORAL_ORCHESTRATION_RUNTIME`) a `.env` file
    /// in the working directory is loaded first; missing files are fine.
    pub fn from_env() -> Result<Self, ConfigError> {
        if std::env::var("CORAL_ORCHESTRATION_RUNTIME").is_err() {
            match dotenvy::dotenv() {
                Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
                Err(_) => tracing::debug!("No .env file found, using process environment"),
            }
        }
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup. `from_env` wires this to
    /// the process environment; tests use a map.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let sse_url = lookup("CORAL_SSE_URL").ok_or(ConfigError::MissingVar("CORAL_SSE_URL"))?;
        let agent_id =
            lookup("CORAL_AGENT_ID").ok_or(ConfigError::MissingVar("CORAL_AGENT_ID"))?;

        let api_key = lookup("MODEL_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .ok_or(ConfigError::MissingVar("MODEL_API_KEY"))?;

        let settings = Self {
            coral: CoralSettings {
                sse_url,
                agent_id,
                agent_description: lookup("CORAL_AGENT_DESCRIPTION")
                    .unwrap_or_else(|| DEFAULT_AGENT_DESCRIPTION.to_string()),
                orchestrated: lookup("CORAL_ORCHESTRATION_RUNTIME").is_some(),
                timeout_secs: parse_or("TIMEOUT_MS", lookup("TIMEOUT_MS"), 300)?,
            },
            model: ModelSettings {
                name: lookup("MODEL_NAME").unwrap_or_else(|| "gpt-4.1".to_string()),
                provider: lookup("MODEL_PROVIDER").unwrap_or_else(|| "openai".to_string()),
                api_key,
                temperature: parse_or("MODEL_TEMPERATURE", lookup("MODEL_TEMPERATURE"), 0.1)?,
                max_tokens: parse_or("MODEL_MAX_TOKENS", lookup("MODEL_MAX_TOKENS"), 8000)?,
                base_url: lookup("MODEL_BASE_URL").filter(|s| !s.is_empty()),
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.coral.sse_url.starts_with("http://") && !self.coral.sse_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                var: "CORAL_SSE_URL",
                reason: format!("expected an http(s) URL, got '{}'", self.coral.sse_url),
            });
        }

        if self.coral.agent_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "CORAL_AGENT_ID",
                reason: "must not be empty".into(),
            });
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::Validation(
                "MODEL_TEMPERATURE must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "MODEL_MAX_TOKENS must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

/// Presence of one configuration variable, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarStatus {
    /// Set; the value is safe to show.
    Set(String),
    /// Set; the value is a secret and is not carried.
    SetSecret,
    Missing,
}

/// One line of the configuration presence report.
#[derive(Debug, Clone)]
pub struct VarReport {
    pub var: &'static str,
    pub required: bool,
    pub status: VarStatus,
}

/// Report which configuration variables the process environment provides,
/// without validating them. Secret values are never carried in the report.
pub fn env_report() -> Vec<VarReport> {
    report_from_source(|key| std::env::var(key).ok())
}

pub fn report_from_source(lookup: impl Fn(&str) -> Option<String>) -> Vec<VarReport> {
    let mut report = Vec::new();

    for var in ["CORAL_SSE_URL", "CORAL_AGENT_ID"] {
        report.push(VarReport {
            var,
            required: true,
            status: match lookup(var) {
                Some(value) => VarStatus::Set(value),
                None => VarStatus::Missing,
            },
        });
    }

    // Either key variable satisfies the requirement.
    report.push(VarReport {
        var: "MODEL_API_KEY / OPENAI_API_KEY",
        required: true,
        status: if lookup("MODEL_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .is_some()
        {
            VarStatus::SetSecret
        } else {
            VarStatus::Missing
        },
    });

    for var in [
        "CORAL_ORCHESTRATION_RUNTIME",
        "CORAL_AGENT_DESCRIPTION",
        "TIMEOUT_MS",
        "MODEL_NAME",
        "MODEL_PROVIDER",
        "MODEL_TEMPERATURE",
        "MODEL_MAX_TOKENS",
        "MODEL_BASE_URL",
    ] {
        report.push(VarReport {
            var,
            required: false,
            status: match lookup(var) {
                Some(value) => VarStatus::Set(value),
                None => VarStatus::Missing,
            },
        });
    }

    report
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            var,
            reason: format!("could not parse '{raw}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn minimal() -> HashMap<String, String> {
        env(&[
            ("CORAL_SSE_URL", "http://localhost:5555/sse"),
            ("CORAL_AGENT_ID", "econ-tutor"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
    }

    fn load(vars: &HashMap<String, String>) -> Result<Settings, ConfigError> {
        Settings::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn minimal_env_uses_documented_defaults() {
        let settings = load(&minimal()).unwrap();
        assert_eq!(settings.model.name, "gpt-4.1");
        assert_eq!(settings.model.provider, "openai");
        assert_eq!(settings.model.temperature, 0.1);
        assert_eq!(settings.model.max_tokens, 8000);
        assert_eq!(settings.coral.timeout_secs, 300);
        assert!(!settings.coral.orchestrated);
        assert!(settings.model.base_url.is_none());
    }

    #[test]
    fn missing_endpoint_is_an_error() {
        let mut vars = minimal();
        vars.remove("CORAL_SSE_URL");
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("CORAL_SSE_URL")));
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let mut vars = minimal();
        vars.remove("OPENAI_API_KEY");
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("MODEL_API_KEY")));
    }

    #[test]
    fn model_api_key_takes_priority() {
        let mut vars = minimal();
        vars.insert("MODEL_API_KEY".into(), "sk-model".into());
        let settings = load(&vars).unwrap();
        assert_eq!(settings.model.api_key, "sk-model");
    }

    #[test]
    fn overrides_are_applied() {
        let mut vars = minimal();
        vars.insert("MODEL_NAME".into(), "gpt-4o-mini".into());
        vars.insert("MODEL_TEMPERATURE".into(), "0.7".into());
        vars.insert("TIMEOUT_MS".into(), "60".into());
        vars.insert("CORAL_ORCHESTRATION_RUNTIME".into(), "docker".into());
        let settings = load(&vars).unwrap();
        assert_eq!(settings.model.name, "gpt-4o-mini");
        assert_eq!(settings.model.temperature, 0.7);
        assert_eq!(settings.coral.timeout_secs, 60);
        assert!(settings.coral.orchestrated);
    }

    #[test]
    fn rejects_bad_url_scheme() {
        let mut vars = minimal();
        vars.insert("CORAL_SSE_URL".into(), "ftp://example.com".into());
        let err = load(&vars).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: "CORAL_SSE_URL",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unparseable_temperature() {
        let mut vars = minimal();
        vars.insert("MODEL_TEMPERATURE".into(), "warm".into());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let mut vars = minimal();
        vars.insert("MODEL_TEMPERATURE".into(), "3.5".into());
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let settings = load(&minimal()).unwrap();
        let debug = format!("{settings:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-test"));
    }

    #[test]
    fn report_flags_missing_required_vars() {
        let vars: HashMap<String, String> = HashMap::new();
        let report = report_from_source(|key| vars.get(key).cloned());
        let missing_required: Vec<_> = report
            .iter()
            .filter(|line| line.required && line.status == VarStatus::Missing)
            .map(|line| line.var)
            .collect();
        assert!(missing_required.contains(&"CORAL_SSE_URL"));
        assert!(missing_required.contains(&"CORAL_AGENT_ID"));
        assert!(missing_required.contains(&"MODEL_API_KEY / OPENAI_API_KEY"));
    }

    #[test]
    fn report_never_carries_the_api_key() {
        let report = report_from_source(|key| minimal().get(key).cloned());
        let key_line = report
            .iter()
            .find(|line| line.var.contains("API_KEY"))
            .unwrap();
        assert_eq!(key_line.status, VarStatus::SetSecret);
        let rendered = format!("{report:?}");
        assert!(!rendered.contains("sk-test"));
    }

    #[test]
    fn report_shows_non_secret_values() {
        let mut vars = minimal();
        vars.insert("MODEL_NAME".into(), "gpt-4o-mini".into());
        let report = report_from_source(|key| vars.get(key).cloned());
        let model_line = report.iter().find(|line| line.var == "MODEL_NAME").unwrap();
        assert_eq!(model_line.status, VarStatus::Set("gpt-4o-mini".into()));
        assert!(!model_line.required);
    }
}
