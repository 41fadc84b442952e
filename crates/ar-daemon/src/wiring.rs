// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Global singleton wiring: builds the Session Store, Supervisor, Provider
//! Registry, Catalog Client, Task Router, and Stream Publisher from a
//! loaded `Config`.

use crate::config::Config;
use crate::error::DaemonError;
use ar_catalog::CatalogClient;
use ar_core::{Clock, SystemClock};
use ar_provider::providers::{AnthropicProvider, DeepSeekProvider, GoogleProvider, OpenAiProvider};
use ar_provider::{BaseProvider, ProviderPolicyConfig, ProviderRegistry};
use ar_router::TaskRouter;
use ar_store::{KeyValueStore, RedisStore, SessionStore};
use ar_stream::{PublisherConfig, StreamPublisher};
use ar_supervisor::{HealthMonitor, HealthMonitorConfig, Supervisor, SupervisorConfig, TokioSpawner};
use std::sync::Arc;

pub struct Daemon {
    pub supervisor: Supervisor<TokioSpawner>,
    pub health_monitor: Arc<HealthMonitor<TokioSpawner>>,
    pub publisher: Arc<StreamPublisher>,
    pub provider_registry: Arc<ProviderRegistry>,
    pub catalog_client: Arc<CatalogClient>,
    pub router: Arc<TaskRouter>,
    health_shutdown_tx: tokio::sync::watch::Sender<bool>,
}

impl Daemon {
    pub async fn build(config: &Config) -> Result<Self, DaemonError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let kv: Arc<dyn KeyValueStore> = Arc::new(
            RedisStore::connect(
                &config.redis_host,
                config.redis_port,
                config.redis_password.as_deref(),
                config.redis_db,
            )
            .await?,
        );
        let store = Arc::new(SessionStore::new(kv.clone()));
        let health_store = store.clone();

        let supervisor_config = SupervisorConfig {
            max_concurrent_sessions: config.max_concurrent_sessions,
            heartbeat_interval: config.heartbeat_interval,
            ..SupervisorConfig::default()
        };
        let supervisor = Supervisor::new(Arc::new(TokioSpawner), store, clock.clone(), supervisor_config);

        let health_monitor_config = HealthMonitorConfig {
            sweep_interval: config.health_check_interval,
            stale_threshold: config.stale_threshold,
        };
        let (health_shutdown_tx, health_shutdown_rx) = tokio::sync::watch::channel(false);
        let health_monitor = Arc::new(HealthMonitor::new(
            supervisor.clone(),
            health_store,
            clock.clone(),
            health_monitor_config,
            supervisor.notifier(),
        ));
        tokio::spawn(health_monitor.clone().run(health_shutdown_rx));

        let publisher = Arc::new(StreamPublisher::new(kv, clock, PublisherConfig::default()));
        spawn_notification_bridge(&supervisor, publisher.clone());

        let policy = ProviderPolicyConfig {
            timeout: config.provider_timeout,
            ..ProviderPolicyConfig::default()
        };
        let provider_registry = Arc::new(ProviderRegistry::new());
        provider_registry.register(Arc::new(BaseProvider::new(
            AnthropicProvider::new(config.anthropic_base_url.clone().unwrap_or_else(|| ar_provider::providers::anthropic::DEFAULT_BASE_URL.to_string())),
            policy.clone(),
        )));
        provider_registry.register(Arc::new(BaseProvider::new(
            OpenAiProvider::new(config.openai_base_url.clone().unwrap_or_else(|| ar_provider::providers::openai::DEFAULT_BASE_URL.to_string())),
            policy.clone(),
        )));
        provider_registry.register(Arc::new(BaseProvider::new(
            GoogleProvider::new(config.google_ai_base_url.clone().unwrap_or_else(|| ar_provider::providers::google::DEFAULT_BASE_URL.to_string())),
            policy.clone(),
        )));
        provider_registry.register(Arc::new(BaseProvider::new(
            DeepSeekProvider::new(config.deepseek_base_url.clone().unwrap_or_else(|| ar_provider::providers::deepseek::DEFAULT_BASE_URL.to_string())),
            policy,
        )));

        let catalog_client = Arc::new(CatalogClient::new(
            config
                .model_registry_api_url
                .clone()
                .unwrap_or_else(|| "http://localhost:4000".to_string()),
            None,
            Arc::new(SystemClock),
        ));

        let router = Arc::new(TaskRouter::new());

        Ok(Self {
            supervisor,
            health_monitor,
            publisher,
            provider_registry,
            catalog_client,
            router,
            health_shutdown_tx,
        })
    }

    /// Shutdown cascade: stop Health Monitor, drain Publisher,
    /// terminate all sessions, then the caller drops the store connection.
    pub async fn shutdown(&self) {
        let _ = self.health_shutdown_tx.send(true);
        self.publisher.shutdown().await;
        self.supervisor.terminate_all_sessions().await;
    }
}

/// Supervisor notifications of type `Output` are forwarded to the
/// Publisher as StreamEvents, enriched inline with the originating
/// session's tenancy fields.
fn spawn_notification_bridge(supervisor: &Supervisor<TokioSpawner>, publisher: Arc<StreamPublisher>) {
    let supervisor = supervisor.clone();
    let mut rx = supervisor.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ar_supervisor::SupervisorNotification::Output(event)) => {
                    let Some(session) = supervisor.get_session(event.session_id.as_str()) else {
                        continue;
                    };
                    publisher.enqueue(ar_stream::enrich(&event, &session.project_id, &session.workspace_id));
                }
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
