//! Fan-out over a batch of targets.
//!
//! Every spec is resolved before anything is dialed, so a broken spec fails the batch
//! without touching the network. Probes then run as one task per target inside a
//! [`JoinSet`]; the first failure to complete wins and the remaining probes are
//! aborted when the set is dropped.

use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use crate::config::model::ConnectionSpec;
use crate::connection::{ConnectionDescriptor, resolve};
use crate::error::{Result, WaitError};
use crate::probe::{ProbePolicy, dial_conn};
use crate::progress::ProgressSink;

/// A resolved target ready to be probed.
#[derive(Debug, Clone)]
pub struct Target {
    pub label: String,
    pub conn: ConnectionDescriptor,
    pub policy: ProbePolicy,
}

/// Resolves every spec, stopping at the first one that does not resolve.
pub fn resolve_all(specs: &[ConnectionSpec]) -> Result<Vec<Target>> {
    specs
        .iter()
        .map(|spec| {
            let label = spec.label();
            let conn = resolve(spec).map_err(|e| e.for_target(label.clone()))?;
            Ok(Target {
                label,
                conn,
                policy: ProbePolicy::from(spec),
            })
        })
        .collect()
}

/// Waits for all targets concurrently. Succeeds only when every target does.
pub async fn dial_configs(specs: &[ConnectionSpec], sink: Arc<dyn ProgressSink>) -> Result<()> {
    let targets = resolve_all(specs)?;
    dial_targets(targets, sink).await
}

pub async fn dial_targets(targets: Vec<Target>, sink: Arc<dyn ProgressSink>) -> Result<()> {
    let mut set = JoinSet::new();

    for target in targets {
        let sink = Arc::clone(&sink);
        set.spawn(async move {
            dial_conn(&target.conn, &target.policy, sink.as_ref())
                .await
                .map_err(|e| e.for_target(target.label))
        });
    }

    while let Some(joined) = set.join_next().await {
        if let Some(Err(err)) = settle(joined) {
            tracing::debug!(error = %err, remaining = set.len(), "target failed, aborting the rest");
            set.abort_all();
            return Err(err);
        }
    }

    Ok(())
}

/// Folds one finished task into the batch outcome; `Some` ends the wait.
fn settle(joined: std::result::Result<Result<()>, JoinError>) -> Option<Result<()>> {
    match joined {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(Err(err)),
        Err(join_err) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
        // Only `dial_targets` aborts its tasks, and it returns right after doing so;
        // a cancelled task is never the one deciding the outcome.
        Err(join_err) => {
            tracing::trace!(error = %join_err, "target task cancelled");
            None
        }
    }
}
