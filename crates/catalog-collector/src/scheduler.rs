//! [`Scheduler`]: periodic refresh of the catalog.

use std::{sync::Arc, time::Duration};

use catalog_core::source::DirectorySource;
use tokio::{task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::collector::Collector;

/// Runs a collector pass, sleeps for `interval`, and repeats.
///
/// Passes never overlap. Cancellation is observed only between passes: a
/// pass already running always completes first.
pub struct Scheduler<S> {
  collector: Arc<Collector<S>>,
  interval:  Duration,
  shutdown:  CancellationToken,
}

impl<S: DirectorySource + 'static> Scheduler<S> {
  pub fn new(collector: Arc<Collector<S>>, interval: Duration) -> Self {
    Self {
      collector,
      interval,
      shutdown: CancellationToken::new(),
    }
  }

  /// Cancelling this token stops the loop after the current pass.
  pub fn shutdown_token(&self) -> CancellationToken { self.shutdown.clone() }

  pub fn spawn(self) -> JoinHandle<()> { tokio::spawn(self.run()) }

  pub async fn run(self) {
    info!(interval_secs = self.interval.as_secs(), "refresh scheduler started");
    loop {
      if let Err(err) = self.collector.run_pass().await {
        warn!(error = %err, "refresh pass failed; keeping previous snapshot");
      }

      if self.shutdown.is_cancelled() {
        break;
      }
      tokio::select! {
        _ = self.shutdown.cancelled() => break,
        _ = sleep(self.interval) => {}
      }
    }
    info!("refresh scheduler stopped");
  }
}
