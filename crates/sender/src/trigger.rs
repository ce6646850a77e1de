use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    task::JoinHandle,
};
use tokio_stream::{StreamExt, wrappers::LinesStream};
use tracing::{debug, error, info, warn};

/// The operator command that arms the trigger.
const SEND_COMMAND: &str = "s";

/// A latch armed by the operator to allow the next sequence to be sent.
///
/// Clones share the same latch.
#[derive(Debug, Clone, Default)]
pub struct SendTrigger(Arc<AtomicBool>);

impl SendTrigger {
    /// Creates a disarmed trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the trigger.
    pub fn arm(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Disarms the trigger, returning whether it was armed.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }

    /// Returns whether the trigger is armed.
    pub fn is_armed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Spawns a task arming `trigger` whenever the operator types `s` on stdin.
pub fn spawn_stdin_trigger(trigger: SendTrigger) -> JoinHandle<()> {
    spawn_line_trigger(BufReader::new(tokio::io::stdin()), trigger)
}

/// Spawns a task arming `trigger` for every `s` line read from `reader`. The task ends when
/// the reader is exhausted.
pub fn spawn_line_trigger<R>(reader: R, trigger: SendTrigger) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = LinesStream::new(reader.lines());

        while let Some(line) = lines.next().await {
            match line {
                Ok(line) if line.trim() == SEND_COMMAND => {
                    trigger.arm();
                    info!("🟢 Send trigger armed");
                }
                Ok(line) => warn!(input = line.trim(), "Unknown command, type `s` to send"),
                Err(err) => {
                    error!(%err, "Failed to read operator input");
                    break;
                }
            }
        }

        debug!("Operator input closed");
    })
}
