//! Provider registry.
//!
//! The registry provides static access to all provider configurations
//! and is the central point for looking up providers.

use std::sync::OnceLock;
use whispr_core::{ProviderConfig, ProviderKind};

use crate::anthropic::anthropic_config;
use crate::gemini::gemini_config;
use crate::openai::{groq_config, openai_config, openrouter_config};

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all provider configurations.
static CONFIGS: OnceLock<Vec<ProviderConfig>> = OnceLock::new();

/// Builds all provider configurations in display order.
fn init_configs() -> Vec<ProviderConfig> {
    vec![
        gemini_config(),
        groq_config(),
        openai_config(),
        anthropic_config(),
        openrouter_config(),
    ]
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Global registry of provider configurations.
///
/// Initialized lazily on first access; entries are never mutated.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all provider configurations.
    pub fn all() -> &'static [ProviderConfig] {
        CONFIGS.get_or_init(init_configs)
    }

    /// Gets a provider configuration by kind.
    pub fn get(id: ProviderKind) -> Option<&'static ProviderConfig> {
        Self::all().iter().find(|c| c.id == id)
    }

    /// Looks up a provider by its string id (case-insensitive).
    pub fn get_by_id(id: &str) -> Option<&'static ProviderConfig> {
        let kind = id.parse::<ProviderKind>().ok()?;
        Self::get(kind)
    }

    /// Returns the number of registered providers.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all provider kinds.
    pub fn kinds() -> Vec<ProviderKind> {
        Self::all().iter().map(|c| c.id).collect()
    }

    /// Returns providers that accept attachments inline.
    pub fn multimodal() -> Vec<&'static ProviderConfig> {
        Self::all()
            .iter()
            .filter(|c| c.supports_multimodal)
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
