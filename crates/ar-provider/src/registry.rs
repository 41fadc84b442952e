// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Provider Registry: in-process directory keyed by provider id.

use crate::base::Provider;
use crate::types::HealthStatus;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<dyn Provider>>>,
    enabled: RwLock<HashMap<String, bool>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
            enabled: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, provider: Arc<dyn Provider>) {
        let id = provider.provider_id().to_string();
        self.enabled.write().entry(id.clone()).or_insert(true);
        self.providers.write().insert(id, provider);
    }

    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn Provider>> {
        self.providers.read().get(provider_id).cloned()
    }

    pub fn get_or_err(&self, provider_id: &str) -> Result<Arc<dyn Provider>, String> {
        self.get(provider_id)
            .ok_or_else(|| format!("provider not registered: {provider_id}"))
    }

    pub fn all(&self) -> Vec<Arc<dyn Provider>> {
        self.providers.read().values().cloned().collect()
    }

    pub fn enabled_providers(&self) -> Vec<Arc<dyn Provider>> {
        let enabled = self.enabled.read();
        self.providers
            .read()
            .iter()
            .filter(|(id, _)| enabled.get(*id).copied().unwrap_or(false))
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn is_enabled(&self, provider_id: &str) -> bool {
        self.enabled.read().get(provider_id).copied().unwrap_or(false)
    }

    pub fn set_enabled(&self, provider_id: &str, enabled: bool) {
        self.enabled.write().insert(provider_id.to_string(), enabled);
    }

    pub fn enable(&self, provider_id: &str) {
        self.set_enabled(provider_id, true);
    }

    pub fn disable(&self, provider_id: &str) {
        self.set_enabled(provider_id, false);
    }

    /// First enabled provider whose `supports_model` returns true.
    pub fn provider_for_model(&self, model_id: &str) -> Option<Arc<dyn Provider>> {
        self.enabled_providers()
            .into_iter()
            .find(|p| p.supports_model(model_id))
    }

    /// Runs `health_check` on each enabled provider in parallel. A missing
    /// key for a provider yields a synthetic unhealthy status rather than
    /// calling out.
    pub async fn health_check_all(&self, keys: &HashMap<String, String>) -> HashMap<String, HealthStatus> {
        let handles: Vec<_> = self
            .enabled_providers()
            .into_iter()
            .map(|provider| {
                let key = keys.get(provider.provider_id()).cloned();
                tokio::spawn(async move {
                    let id = provider.provider_id().to_string();
                    let status = match key {
                        Some(key) => provider.health_check(&key).await.unwrap_or(HealthStatus::Unhealthy),
                        None => HealthStatus::Unhealthy,
                    };
                    (id, status)
                })
            })
            .collect();

        let mut results = HashMap::with_capacity(handles.len());
        for handle in handles {
            if let Ok((id, status)) = handle.await {
                results.insert(id, status);
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{BaseProvider, ProviderPolicyConfig};
    use crate::providers::AnthropicProvider;

    fn registry_with_anthropic() -> ProviderRegistry {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(BaseProvider::new(AnthropicProvider::default(), ProviderPolicyConfig::default())));
        registry
    }

    #[test]
    fn register_defaults_to_enabled() {
        let registry = registry_with_anthropic();
        assert!(registry.is_enabled("anthropic"));
    }

    #[test]
    fn disabled_provider_is_excluded_from_provider_for_model() {
        let registry = registry_with_anthropic();
        registry.disable("anthropic");
        assert!(registry.provider_for_model("claude-sonnet-4-20250514").is_none());
    }

    #[tokio::test]
    async fn health_check_all_marks_missing_key_as_unhealthy() {
        let registry = registry_with_anthropic();
        let statuses = registry.health_check_all(&HashMap::new()).await;
        assert_eq!(statuses.get("anthropic"), Some(&HealthStatus::Unhealthy));
    }
}
