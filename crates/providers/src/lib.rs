//! LLM provider implementations for Coralink.
//!
//! All providers implement the `coralink_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use coralink_config::ModelSettings;
use coralink_core::Provider;
use coralink_core::error::ProviderError;
use std::sync::Arc;

/// Build a provider from model settings.
///
/// The provider label picks the default base URL; `MODEL_BASE_URL` wins
/// when set, which also enables arbitrary OpenAI-compatible endpoints.
pub fn from_settings(settings: &ModelSettings) -> Result<Arc<dyn Provider>, ProviderError> {
    let provider = OpenAiCompatProvider::from_settings(settings)?;
    Ok(Arc::new(provider))
}
