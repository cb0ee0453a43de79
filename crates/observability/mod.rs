mod config;
mod layer;
mod notifier;
mod webhook;

use anyhow::Result;
use config::ObservabilityConfig;
use layer::AlertLayer;
use notifier::{AlertQueue, REPEAT_COOLDOWN};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};
use webhook::JsonWebhookSink;

/// Installs the global subscriber for a binary. Must run inside a Tokio runtime when the
/// alert webhook is configured, because delivery happens on a spawned task.
pub fn init_observability(component: &str) -> Result<()> {
    let config = ObservabilityConfig::from_env(component);

    let alert_layer = match config.alert_webhook.as_ref() {
        Some(webhook) => {
            let sink = JsonWebhookSink::new(webhook.url.clone())?;
            let queue = AlertQueue::spawn(Arc::new(sink), REPEAT_COOLDOWN);
            Some(
                AlertLayer::new(queue, config.service_context.clone())
                    .with_filter(LevelFilter::from_level(webhook.min_level)),
            )
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(alert_layer)
        .with(env_filter)
        .try_init()?;

    for warning in &config.warnings {
        warn!(
            component = %config.service_context.component,
            warning = %warning,
            "observability: config warning"
        );
    }

    info!(
        service = %config.service_context.service_name,
        environment = %config.service_context.environment,
        component = %config.service_context.component,
        alerts_enabled = config.alert_webhook.is_some(),
        "observability: initialized"
    );

    Ok(())
}
