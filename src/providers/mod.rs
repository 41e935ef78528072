//! Provider module for Madan
//!
//! This module contains the completion provider abstraction and the
//! OpenRouter-compatible HTTP implementation.

pub mod base;
pub mod openrouter;

pub use base::{build_request_messages, system_prompt, Message, Provider, Role};
pub use openrouter::OpenRouterProvider;

use crate::config::ProviderConfig;
use crate::error::Result;

/// Create the configured completion provider
///
/// # Errors
///
/// Returns error if provider initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    Ok(Box::new(OpenRouterProvider::new(config.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_uses_configured_model() {
        let config = ProviderConfig {
            model: "test/model".to_string(),
            ..ProviderConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model(), "test/model");
    }
}
