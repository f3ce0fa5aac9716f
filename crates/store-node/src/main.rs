//! # Store Node
//!
//! Deploys one message store and serves calls read from stdin, one JSON
//! object per line, writing one JSON response per line to stdout.
//!
//! ```text
//! {"caller":"0x…","call":{"type":"set_message","message":"hi"}}
//! {"ok":{"store":"0x…","sequence":1,"kind":{"event":"MessageUpdated","payload":{…}}}}
//! ```
//!
//! Logs go to stderr so stdout carries responses only. With `STORE_METRICS`
//! enabled, the Prometheus counters are written to stderr in text format on
//! exit.

use anyhow::{Context, Result};
use message_store::adapters::SystemClock;
use store_node::{render_metrics, NodeConfig, StoreNode};
use store_telemetry::{init_telemetry, TelemetryConfig};
use tokio::io::{stderr, stdin, stdout, AsyncWriteExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry_config = TelemetryConfig::from_env();
    let metrics_enabled = telemetry_config.metrics_enabled;
    let _telemetry = init_telemetry(telemetry_config).context("failed to initialize telemetry")?;

    let config = NodeConfig::from_env().context("failed to load configuration")?;

    info!("===========================================");
    info!("  Message Store Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let node = StoreNode::start(&config, &SystemClock)
        .await
        .context("failed to start store node")?;

    let served = tokio::select! {
        served = node.serve(BufReader::new(stdin()), stdout()) => {
            served.context("transport failed")?
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            info!("Interrupted");
            0
        }
    };

    info!(served, "Input closed");
    node.shutdown().await;

    if metrics_enabled {
        let metrics = render_metrics().context("failed to encode metrics")?;
        let mut err = stderr();
        err.write_all(metrics.as_bytes())
            .await
            .context("failed to write metrics")?;
        err.flush().await.context("failed to write metrics")?;
    }

    Ok(())
}
