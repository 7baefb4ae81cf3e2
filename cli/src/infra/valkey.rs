//! Valkey publisher for launched process output.
//!
//! Implements `OutputPublisher` with Redis `PUBLISH` over a lazily opened,
//! shared multiplexed connection.

use std::sync::Arc;

use anyhow::{Context, Result};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tokio::sync::OnceCell;

use crate::application::ports::OutputPublisher;

/// Publishes to Valkey/Redis pub/sub channels.
///
/// Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct ValkeyPublisher {
    client: redis::Client,
    conn: Arc<OnceCell<MultiplexedConnection>>,
}

impl ValkeyPublisher {
    /// Create a publisher for `url`. No connection is opened until the first publish.
    ///
    /// # Errors
    /// Returns error if the connection URL is invalid.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("failed to create Valkey client")?;
        Ok(Self {
            client,
            conn: Arc::new(OnceCell::new()),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                self.client
                    .get_multiplexed_async_connection()
                    .await
                    .context("failed to connect to Valkey")
            })
            .await?;
        Ok(conn.clone())
    }
}

impl OutputPublisher for ValkeyPublisher {
    async fn publish(&self, channel: &str, message: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let receivers: i64 = conn
            .publish(channel, message)
            .await
            .with_context(|| format!("failed to publish to {channel}"))?;
        tracing::trace!(channel, receivers, "published process output");
        Ok(())
    }
}
