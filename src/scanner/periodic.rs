use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::feed::SignalSource;
use crate::models::ScanTimeframe;
use crate::scanner::ScanFeed;
use crate::strategies::signals::ScanRow;

/// Owner of a background scan loop. Dropping the handle aborts the loop;
/// `cancel` stops it cleanly and hands the source back.
pub struct ScanHandle {
    pub timeframe: ScanTimeframe,
    rows: watch::Receiver<Vec<ScanRow>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Box<dyn SignalSource>>>,
}

impl ScanHandle {
    /// Receiver that changes on every completed refresh.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ScanRow>> {
        self.rows.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop after any in-flight refresh and return the source so the
    /// caller can restart on another timeframe.
    pub async fn cancel(mut self) -> Option<Box<dyn SignalSource>> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Shortest refresh period; `tokio::time::interval` rejects zero.
pub const MIN_SCAN_PERIOD: Duration = Duration::from_millis(1);

/// Refresh `feed` immediately and then every `every` (at least
/// `MIN_SCAN_PERIOD`), publishing each result.
pub fn spawn_periodic(
    mut source: Box<dyn SignalSource>,
    mut feed: ScanFeed,
    every: Duration,
) -> ScanHandle {
    let every = every.max(MIN_SCAN_PERIOD);
    let timeframe = feed.timeframe;
    let (tx, rx) = watch::channel(Vec::new());
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        info!("Scanner {} started, refreshing every {}s", timeframe, every.as_secs());
        let mut ticker = tokio::time::interval(every);
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    let rows = feed.refresh(source.as_mut()).await.to_vec();
                    debug!("Scanner {} published {} rows", timeframe, rows.len());
                    if tx.send(rows).is_err() {
                        break;
                    }
                }
            }
        }
        info!("Scanner {} stopped", timeframe);
        source
    });

    ScanHandle {
        timeframe,
        rows: rx,
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}
