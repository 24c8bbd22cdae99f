//! Runtime bridge - connects the sync TUI thread with an async Tokio runtime
//!
//! Selector lookups are the only async work. The UI thread sends commands
//! and polls for events without ever blocking on the network.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::domain::abi::CandidateSignature;
use crate::domain::calldata::FunctionSelector;
use crate::infrastructure::fourbyte::SignatureResolver;
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the UI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Resolve a selector; the generation is echoed back in the result
    LookupSelector {
        generation: u64,
        selector: FunctionSelector,
    },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the UI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A lookup finished, successfully or not
    LookupFinished {
        generation: u64,
        selector: FunctionSelector,
        result: Result<Vec<CandidateSignature>, String>,
    },
    /// The worker could not start or stopped unexpectedly
    Error { message: String },
}

/// Bridge between the sync UI thread and the async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: UnboundedSender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime
    pub fn new(resolver: Arc<dyn SignatureResolver>) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = unbounded_channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        thread::Builder::new()
            .name("hexsplit-runtime".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(2)
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(err) => {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Failed to start runtime: {err}"),
                        });
                        return;
                    }
                };
                rt.block_on(run_async_worker(resolver, cmd_rx, evt_tx));
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        self.evt_rx.try_iter().collect()
    }

    /// Wait for a single event, up to `timeout`
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<RuntimeEvent> {
        self.evt_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
