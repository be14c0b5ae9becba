//! Native messaging channel and event loop.
//!
//! A [`NativeChannel`] owns one spawned native host process and the framed
//! stdio pipes to it. Two internal tasks drive the channel:
//!
//! - a writer draining posted messages onto the host's stdin
//! - a reader decoding host replies off stdout and routing them to the
//!   message handler, then reporting the disconnect
//!
//! The channel stays open until the host closes its end, a pipe fails, or
//! a local disconnect is requested. When the last handle is dropped the
//! writer closes the host's stdin but the reader keeps draining replies
//! until end-of-stream, so late host output is still observed.

// ============================================================================
// Imports
// ============================================================================

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{Notify, mpsc, watch};
use tracing::{debug, error, info, trace, warn};

use crate::error::{Error, Result};

use super::codec;
use super::host::NativeHostConfig;

// ============================================================================
// Constants
// ============================================================================

/// Grace period for the host to exit after its pipes close.
const HOST_EXIT_GRACE: Duration = Duration::from_secs(3);

// ============================================================================
// Types
// ============================================================================

/// Message handler callback type.
///
/// Called for each message received from the native host.
pub type MessageHandler = Box<dyn Fn(Value) + Send + Sync>;

/// Disconnect handler callback type.
///
/// Called exactly once when the channel ends; receives the error the
/// channel closed with, or `None` on a clean close.
pub type DisconnectHandler = Box<dyn FnOnce(Option<Error>) + Send + Sync>;

// ============================================================================
// ChannelCommand
// ============================================================================

/// Internal commands for the writer task.
enum ChannelCommand {
    /// Post a message to the host.
    Post(Value),
    /// Close the channel locally.
    Disconnect,
}

// ============================================================================
// NativeChannel
// ============================================================================

/// A persistent duplex channel to a spawned native host process.
///
/// # Thread Safety
///
/// `NativeChannel` is `Send + Sync` and cheap to clone; clones share the
/// same underlying channel.
pub struct NativeChannel {
    /// Channel for sending commands to the writer task.
    command_tx: mpsc::UnboundedSender<ChannelCommand>,
    /// Message handler slot (shared with the reader task).
    message_handler: Arc<Mutex<Option<MessageHandler>>>,
    /// Disconnect handler slot (shared with the reader task).
    disconnect_handler: Arc<Mutex<Option<DisconnectHandler>>>,
    /// Flips to `true` when the channel has fully closed.
    closed_rx: watch::Receiver<bool>,
}

impl std::fmt::Debug for NativeChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeChannel")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Clone for NativeChannel {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            message_handler: Arc::clone(&self.message_handler),
            disconnect_handler: Arc::clone(&self.disconnect_handler),
            closed_rx: self.closed_rx.clone(),
        }
    }
}

impl NativeChannel {
    /// Spawns the configured host process and opens a channel to it.
    ///
    /// # Errors
    ///
    /// [`Error::HostSpawnFailed`] if the executable cannot be launched.
    pub fn connect(config: &NativeHostConfig) -> Result<Self> {
        let mut child = Command::new(config.program())
            .args(config.command_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| Error::host_spawn_failed(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::host_spawn_failed("host stdin pipe unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::host_spawn_failed("host stdout pipe unavailable"))?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = watch::channel(false);
        let shutdown = Arc::new(Notify::new());
        let failure: Arc<Mutex<Option<Error>>> = Arc::new(Mutex::new(None));

        let message_handler: Arc<Mutex<Option<MessageHandler>>> = Arc::new(Mutex::new(None));
        let disconnect_handler: Arc<Mutex<Option<DisconnectHandler>>> = Arc::new(Mutex::new(None));

        let host = config.name().to_string();
        info!(host = %host, "native messaging channel connected");

        tokio::spawn(run_writer(
            stdin,
            command_rx,
            Arc::clone(&shutdown),
            Arc::clone(&failure),
            host.clone(),
        ));

        tokio::spawn(run_reader(
            child,
            stdout,
            Arc::clone(&message_handler),
            Arc::clone(&disconnect_handler),
            failure,
            closed_tx,
            shutdown,
            host,
        ));

        Ok(Self {
            command_tx,
            message_handler,
            disconnect_handler,
            closed_rx,
        })
    }

    /// Sets the message handler callback.
    ///
    /// The handler is called for each message received from the host for
    /// as long as the channel stays open. Without a handler, inbound
    /// messages are logged at debug level.
    pub fn set_message_handler(&self, handler: MessageHandler) {
        let mut guard = self.message_handler.lock();
        *guard = Some(handler);
    }

    /// Clears the message handler.
    pub fn clear_message_handler(&self) {
        let mut guard = self.message_handler.lock();
        *guard = None;
    }

    /// Sets the disconnect handler callback.
    ///
    /// Called exactly once when the channel ends, with the closing error
    /// if the close was abnormal.
    pub fn set_disconnect_handler(&self, handler: DisconnectHandler) {
        let mut guard = self.disconnect_handler.lock();
        *guard = Some(handler);
    }

    /// Posts a message to the native host.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelClosed`] if the channel has already closed
    /// - [`Error::Json`] if the message fails to serialize
    pub fn post_message<T: Serialize>(&self, message: &T) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ChannelClosed);
        }

        let value = serde_json::to_value(message)?;
        self.command_tx
            .send(ChannelCommand::Post(value))
            .map_err(|_| Error::ChannelClosed)
    }

    /// Requests a local close of the channel.
    ///
    /// Does not wait for the close to complete; use [`closed`](Self::closed)
    /// for that.
    pub fn disconnect(&self) {
        let _ = self.command_tx.send(ChannelCommand::Disconnect);
    }

    /// Returns `true` if the channel has fully closed.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed_rx.borrow()
    }

    /// Waits until the channel has fully closed.
    pub async fn closed(&self) {
        let mut rx = self.closed_rx.clone();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

// ============================================================================
// Writer Task
// ============================================================================

/// Drains posted messages onto the host's stdin.
async fn run_writer(
    mut stdin: ChildStdin,
    mut command_rx: mpsc::UnboundedReceiver<ChannelCommand>,
    shutdown: Arc<Notify>,
    failure: Arc<Mutex<Option<Error>>>,
    host: String,
) {
    while let Some(command) = command_rx.recv().await {
        match command {
            ChannelCommand::Post(value) => {
                if let Err(e) = codec::write_message(&mut stdin, &value).await {
                    error!(host = %host, error = %e, "native messaging write failed");
                    *failure.lock() = Some(e);
                    shutdown.notify_one();
                    return;
                }
                trace!(host = %host, "message posted to native host");
            }

            ChannelCommand::Disconnect => {
                debug!(host = %host, "local disconnect requested");
                shutdown.notify_one();
                return;
            }
        }
    }

    // Last handle dropped: returning closes the host's stdin while the
    // reader keeps draining replies until end-of-stream.
    debug!(host = %host, "all channel handles dropped; closing host stdin");
}

// ============================================================================
// Reader Task
// ============================================================================

/// Decodes host replies, routes them to the handler, reports the disconnect.
#[allow(clippy::too_many_arguments)]
async fn run_reader(
    mut child: Child,
    mut stdout: ChildStdout,
    message_handler: Arc<Mutex<Option<MessageHandler>>>,
    disconnect_handler: Arc<Mutex<Option<DisconnectHandler>>>,
    failure: Arc<Mutex<Option<Error>>>,
    closed_tx: watch::Sender<bool>,
    shutdown: Arc<Notify>,
    host: String,
) {
    let mut read_failure: Option<Error> = None;

    loop {
        tokio::select! {
            _ = shutdown.notified() => break,

            inbound = codec::read_message(&mut stdout) => {
                match inbound {
                    Ok(Some(message)) => {
                        let handler = message_handler.lock();
                        if let Some(ref handler) = *handler {
                            handler(message);
                        } else {
                            debug!(host = %host, %message, "native host message");
                        }
                    }

                    Ok(None) => {
                        debug!(host = %host, "native host closed the channel");
                        break;
                    }

                    Err(e) => {
                        error!(host = %host, error = %e, "native messaging read failed");
                        read_failure = Some(e);
                        break;
                    }
                }
            }
        }
    }

    // Reap the host: grace period after the pipes close, then kill.
    if tokio::time::timeout(HOST_EXIT_GRACE, child.wait())
        .await
        .is_err()
    {
        warn!(host = %host, "native host did not exit; killing");
        let _ = child.start_kill();
        let _ = child.wait().await;
    }

    let failure = failure.lock().take().or(read_failure);
    match disconnect_handler.lock().take() {
        Some(handler) => handler(failure),
        None => match failure {
            Some(e) => error!(host = %host, error = %e, "native host disconnected with error"),
            None => debug!(host = %host, "native host disconnected"),
        },
    }

    let _ = closed_tx.send(true);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::timeout;

    const TEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// `cat` echoes frames verbatim, which makes it a perfect loopback host.
    fn echo_host() -> NativeHostConfig {
        NativeHostConfig::new("com.example.echo", "cat")
    }

    #[tokio::test]
    async fn test_connect_spawn_failure() {
        let config = NativeHostConfig::new("com.example.missing", "/nonexistent/host-binary");
        let err = NativeChannel::connect(&config).expect_err("spawn should fail");
        assert!(matches!(err, Error::HostSpawnFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_echo_roundtrip() {
        let channel = NativeChannel::connect(&echo_host()).expect("connect");

        let (reply_tx, mut reply_rx) = unbounded_channel();
        channel.set_message_handler(Box::new(move |message| {
            let _ = reply_tx.send(message);
        }));

        let message = json!({ "item_type": "journalArticle", "creators": [] });
        channel.post_message(&message).expect("post");

        let echoed = timeout(TEST_TIMEOUT, reply_rx.recv())
            .await
            .expect("echo within timeout")
            .expect("one echo");
        assert_eq!(echoed, message);

        channel.disconnect();
        timeout(TEST_TIMEOUT, channel.closed())
            .await
            .expect("close within timeout");
        assert!(channel.is_closed());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_disconnect_handler_reports_clean_close() {
        let channel = NativeChannel::connect(&echo_host()).expect("connect");

        let (done_tx, mut done_rx) = unbounded_channel();
        channel.set_disconnect_handler(Box::new(move |error| {
            let _ = done_tx.send(error.map(|e| e.to_string()));
        }));

        channel.disconnect();

        let reported = timeout(TEST_TIMEOUT, done_rx.recv())
            .await
            .expect("handler within timeout")
            .expect("one report");
        assert_eq!(reported, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_drop_drains_pending_replies() {
        let channel = NativeChannel::connect(&echo_host()).expect("connect");

        let (reply_tx, mut reply_rx) = unbounded_channel();
        channel.set_message_handler(Box::new(move |message| {
            let _ = reply_tx.send(message);
        }));
        let (done_tx, mut done_rx) = unbounded_channel();
        channel.set_disconnect_handler(Box::new(move |error| {
            let _ = done_tx.send(error.is_none());
        }));

        channel.post_message(&json!({ "ping": 1 })).expect("post");
        drop(channel);

        // The echo posted before the drop still arrives, then the channel
        // closes cleanly once the host exits.
        let echoed = timeout(TEST_TIMEOUT, reply_rx.recv())
            .await
            .expect("echo within timeout")
            .expect("one echo");
        assert_eq!(echoed, json!({ "ping": 1 }));

        let clean = timeout(TEST_TIMEOUT, done_rx.recv())
            .await
            .expect("handler within timeout")
            .expect("one report");
        assert!(clean);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_post_after_close_fails() {
        let channel = NativeChannel::connect(&echo_host()).expect("connect");

        channel.disconnect();
        timeout(TEST_TIMEOUT, channel.closed())
            .await
            .expect("close within timeout");

        let err = channel
            .post_message(&json!({ "late": true }))
            .expect_err("post should fail");
        assert!(matches!(err, Error::ChannelClosed));
    }
}
