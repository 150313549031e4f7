//! Per-sender request workers
//!
//! Every sender gets a dedicated worker task fed by its own queue, so one
//! sender's messages are handled strictly in arrival order and a search never
//! overlaps that sender's next `more`. Workers for different senders run
//! concurrently. The engine itself is synchronous (SQLite), so each request
//! runs on the blocking pool.
//!
//! Routing never waits on a worker. A sender whose queue is full loses the
//! message, and a worker that sits idle stops and is pruned from the routing
//! table. A sender's next worker waits for the previous one to finish.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use nef3a_core::{Engine, Inbound, QueryStore, SenderId, SessionStore};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::channel::OutboundMessage;

/// Queue depth of each sender's worker.
const SENDER_QUEUE: usize = 32;

/// How long a worker waits for its sender's next message before stopping.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

struct Worker {
    queue: mpsc::Sender<Inbound>,
    handle: JoinHandle<()>,
}

/// Drives an [`Engine`] from an inbound queue.
pub struct BotService<S, A> {
    engine: Arc<Engine<S, A>>,
    idle_timeout: Duration,
}

impl<S, A> Clone for BotService<S, A> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            idle_timeout: self.idle_timeout,
        }
    }
}

impl<S, A> BotService<S, A>
where
    S: QueryStore + 'static,
    A: SessionStore + 'static,
{
    pub fn new(engine: Engine<S, A>) -> Self {
        Self {
            engine: Arc::new(engine),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Route inbound messages to per-sender workers until `inbound` closes,
    /// then wait for every worker to drain its queue.
    pub async fn run(
        &self,
        mut inbound: mpsc::Receiver<Inbound>,
        outbound: mpsc::Sender<OutboundMessage>,
    ) {
        let mut workers: HashMap<SenderId, Worker> = HashMap::new();

        while let Some(msg) = inbound.recv().await {
            workers.retain(|_, worker| !worker.handle.is_finished());
            self.route(&mut workers, msg, &outbound);
        }

        info!(senders = workers.len(), "inbound closed, draining workers");
        for (sender, worker) in workers {
            drop(worker.queue);
            if let Err(e) = worker.handle.await {
                error!(sender, error = %e, "sender worker failed");
            }
        }
    }

    fn route(
        &self,
        workers: &mut HashMap<SenderId, Worker>,
        msg: Inbound,
        outbound: &mpsc::Sender<OutboundMessage>,
    ) {
        let sender = msg.sender;
        let msg = match workers.get(&sender) {
            Some(worker) => match worker.queue.try_send(msg) {
                Ok(()) => return,
                Err(TrySendError::Full(_)) => {
                    warn!(sender, "sender queue full, dropping message");
                    return;
                }
                // Worker went idle; hand over to a fresh one
                Err(TrySendError::Closed(msg)) => msg,
            },
            None => msg,
        };

        let previous = workers.remove(&sender).map(|worker| worker.handle);
        debug!(sender, "starting sender worker");
        let worker = self.spawn_worker(sender, previous, outbound.clone());
        if worker.queue.try_send(msg).is_err() {
            error!(sender, "new sender worker refused message");
        }
        workers.insert(sender, worker);
    }

    fn spawn_worker(
        &self,
        sender: SenderId,
        previous: Option<JoinHandle<()>>,
        outbound: mpsc::Sender<OutboundMessage>,
    ) -> Worker {
        let (queue, mut rx) = mpsc::channel::<Inbound>(SENDER_QUEUE);
        let engine = Arc::clone(&self.engine);
        let idle_timeout = self.idle_timeout;

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    error!(sender, error = %e, "previous sender worker failed");
                }
            }

            loop {
                let msg = match tokio::time::timeout(idle_timeout, rx.recv()).await {
                    Ok(Some(msg)) => msg,
                    Ok(None) => break,
                    Err(_) => {
                        debug!(sender, "sender worker idle, stopping");
                        // Anything routed before the close is still ours
                        rx.close();
                        while let Some(msg) = rx.recv().await {
                            if !handle_one(&engine, sender, msg, &outbound).await {
                                break;
                            }
                        }
                        break;
                    }
                };

                if !handle_one(&engine, sender, msg, &outbound).await {
                    break;
                }
            }
        });

        Worker { queue, handle }
    }
}

/// Run one request and forward its replies. Returns `false` once the
/// outbound side is gone.
async fn handle_one<S, A>(
    engine: &Arc<Engine<S, A>>,
    sender: SenderId,
    msg: Inbound,
    outbound: &mpsc::Sender<OutboundMessage>,
) -> bool
where
    S: QueryStore + 'static,
    A: SessionStore + 'static,
{
    let engine = Arc::clone(engine);
    let blocks = match tokio::task::spawn_blocking(move || engine.handle(&msg)).await {
        Ok(blocks) => blocks,
        Err(e) => {
            error!(sender, error = %e, "request handler panicked");
            return true;
        }
    };

    if outbound
        .send(OutboundMessage { sender, blocks })
        .await
        .is_err()
    {
        debug!(sender, "outbound closed, stopping worker");
        return false;
    }
    true
}
