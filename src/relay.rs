//! Event stream relay
//!
//! Reads CLEF lines and dispatches each event on its own task, bounded by a
//! semaphore. Stops at end of input, on a read error, or when the shutdown
//! future resolves, then drains the tasks still in flight.

use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::dispatcher::{AlertDispatcher, DispatchOutcome};
use crate::domain::LogEvent;
use crate::error::{RelayError, Result};

/// Counters for one relay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub delivered: u64,
    pub failed: u64,
    /// Lines that could not be decoded or parsed as events
    pub skipped: u64,
}

impl RelayStats {
    fn record(&mut self, joined: std::result::Result<Result<DispatchOutcome>, JoinError>) {
        match joined {
            Ok(Ok(DispatchOutcome::Delivered(_))) => self.delivered += 1,
            Ok(Ok(DispatchOutcome::Failed { .. })) => self.failed += 1,
            Ok(Err(e)) => {
                error!(error = %e, "Dispatcher rejected event");
                self.failed += 1;
            }
            Err(e) => {
                error!(error = %e, "Dispatch task panicked");
                self.failed += 1;
            }
        }
    }
}

/// Relay every event from `reader` until EOF or `shutdown`.
pub async fn relay_events<R, S>(
    dispatcher: Arc<AlertDispatcher>,
    reader: R,
    max_in_flight: usize,
    shutdown: S,
) -> Result<RelayStats>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let permits = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut tasks = JoinSet::new();
    let mut stats = RelayStats::default();
    let mut lines = reader.split(b'\n');
    let mut read_error = None;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, draining in-flight alerts");
                break;
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                stats.record(joined);
            }
            segment = lines.next_segment() => {
                let mut raw = match segment {
                    Ok(Some(raw)) => raw,
                    Ok(None) => {
                        debug!("End of event stream");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "Event stream read failed, draining in-flight alerts");
                        read_error = Some(e);
                        break;
                    }
                };
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }

                let line = match String::from_utf8(raw) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Skipping event line that is not UTF-8");
                        stats.skipped += 1;
                        continue;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let event = match LogEvent::from_clef(&line) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "Skipping unreadable event");
                        stats.skipped += 1;
                        continue;
                    }
                };

                let permit = tokio::select! {
                    _ = &mut shutdown => {
                        info!(event_id = %event.id, "Shutdown requested while waiting for capacity, event not sent");
                        break;
                    }
                    permit = permits.clone().acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(e) => {
                            error!(error = %e, "Dispatch permits closed");
                            break;
                        }
                    },
                };
                let dispatcher = dispatcher.clone();
                tasks.spawn(async move {
                    let _permit = permit;
                    dispatcher.handle(Some(&event)).await
                });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        stats.record(joined);
    }

    info!(
        delivered = stats.delivered,
        failed = stats.failed,
        skipped = stats.skipped,
        "Event stream finished"
    );
    match read_error {
        Some(e) => Err(RelayError::Io(e)),
        None => Ok(stats),
    }
}
