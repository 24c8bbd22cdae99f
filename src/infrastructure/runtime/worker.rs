//! Async worker - runs in the Tokio runtime and performs selector lookups

use std::sync::mpsc::Sender;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::infrastructure::fourbyte::SignatureResolver;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Run the worker loop until `Shutdown` arrives or the bridge is dropped.
///
/// Each lookup runs in its own task, so a slow response never delays a newer
/// one. Stale results are filtered by generation on the receiving side.
pub async fn run_async_worker(
    resolver: Arc<dyn SignatureResolver>,
    mut cmd_rx: UnboundedReceiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            RuntimeCommand::Shutdown => break,

            RuntimeCommand::LookupSelector {
                generation,
                selector,
            } => {
                let resolver = Arc::clone(&resolver);
                let evt_tx = evt_tx.clone();
                tokio::spawn(async move {
                    let result = resolver
                        .lookup(&selector)
                        .await
                        .map_err(|err| err.to_string());
                    if let Err(message) = &result {
                        tracing::warn!(selector = %selector, generation, "lookup failed: {message}");
                    }
                    let _ = evt_tx.send(RuntimeEvent::LookupFinished {
                        generation,
                        selector,
                        result,
                    });
                });
            }
        }
    }

    tracing::debug!("runtime worker stopped");
}
