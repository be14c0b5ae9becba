//! The extraction-and-forward cycle orchestrator.
//!
//! The [`Relay`] is the background-worker side of the pipeline. On each
//! user action it runs one independent cycle:
//!
//! 1. Request the page's record from the target context
//! 2. Validate that the record carries a title
//! 3. Open a channel to the configured native host
//! 4. Forward the record envelope and log whatever the host replies
//!
//! Every error is consumed and logged inside the cycle; the caller only
//! sees which terminal branch the cycle took. Cycles are not coordinated:
//! rapid repeated user actions each spawn their own cycle and their own
//! channel, distinguishable in the logs by their [`CycleId`].
//!
//! # State machine (per invocation)
//!
//! ```text
//! Idle → AwaitingPageData → {RequestFailed | NoUsefulData | Forwarding}
//!                            Forwarding → ChannelOpen → ChannelClosed
//! ```

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::identifiers::CycleId;
use crate::page::PageHandle;
use crate::transport::{NativeChannel, NativeHostConfig};

// ============================================================================
// CycleOutcome
// ============================================================================

/// Terminal branch of one user-action cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The request never reached the page context, or went unanswered.
    RequestFailed,

    /// The record carried no title; the native host was not contacted.
    NoUsefulData,

    /// The native messaging channel could not be opened or written.
    ChannelFailed,

    /// The record was forwarded; the carried channel stays open until the
    /// host disconnects.
    Forwarded(NativeChannel),
}

impl CycleOutcome {
    /// Returns `true` if the record was forwarded to the native host.
    #[inline]
    #[must_use]
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Self::Forwarded(_))
    }
}

// ============================================================================
// RelayBuilder
// ============================================================================

/// Builder for configuring a [`Relay`] instance.
///
/// Use [`Relay::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct RelayBuilder {
    /// Native host identity and launch command.
    host: Option<NativeHostConfig>,
}

impl RelayBuilder {
    /// Creates a new relay builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the native host the relay forwards records to.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: NativeHostConfig) -> Self {
        self.host = Some(host);
        self
    }

    /// Builds the relay with validation.
    ///
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) if the host is not set or
    /// its name/executable is invalid.
    pub fn build(self) -> Result<Relay> {
        let host = self.host.ok_or_else(|| {
            Error::config(
                "Native host is required. Use .host() to set it.\n\
                 Example: Relay::builder().host(NativeHostConfig::new(\"com.example.host\", \"/opt/host\"))",
            )
        })?;
        host.validate()?;

        Ok(Relay { host })
    }
}

// ============================================================================
// Relay
// ============================================================================

/// Orchestrates user-triggered extraction-and-forward cycles.
///
/// The relay is stateless across cycles: it holds only the injected host
/// configuration, and each cycle exclusively owns whatever channel it
/// opens.
#[derive(Debug, Clone)]
pub struct Relay {
    /// Native host identity and launch command.
    host: NativeHostConfig,
}

impl Relay {
    /// Creates a configuration builder for the relay.
    #[inline]
    #[must_use]
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    /// Returns the configured native host.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &NativeHostConfig {
        &self.host
    }

    /// Runs one extraction-and-forward cycle against the target context.
    ///
    /// Infallible by design: every failure is logged where it occurs and
    /// folded into the returned [`CycleOutcome`]. There are no retries and
    /// no timeouts; an unanswered request suspends this call until the
    /// target context goes away.
    pub async fn on_user_action(&self, target: &PageHandle) -> CycleOutcome {
        let cycle = CycleId::generate();
        debug!(%cycle, "user action; requesting page data");

        let record = match target.request_page_data().await {
            Ok(record) => record,
            Err(e) => {
                error!(%cycle, error = %e, "failed to reach the page context");
                return CycleOutcome::RequestFailed;
            }
        };

        debug!(
            %cycle,
            title = %record.metadata.title,
            creators = record.creators.len(),
            "page data received"
        );

        if !record.has_title() {
            info!(%cycle, "nothing useful found on the page");
            return CycleOutcome::NoUsefulData;
        }

        info!(%cycle, host = %self.host.name(), "forwarding record to native host");
        let channel = match NativeChannel::connect(&self.host) {
            Ok(channel) => channel,
            Err(e) => {
                error!(%cycle, error = %e, "failed to open the native messaging channel");
                return CycleOutcome::ChannelFailed;
            }
        };

        channel.set_message_handler(Box::new(move |reply| {
            info!(%cycle, reply = %reply, "native host reply");
        }));
        channel.set_disconnect_handler(Box::new(move |error| match error {
            Some(e) => error!(%cycle, error = %e, "native host disconnected with error"),
            None => info!(%cycle, "native host disconnected"),
        }));

        if let Err(e) = channel.post_message(&record) {
            error!(%cycle, error = %e, "failed to post the record to the native host");
            return CycleOutcome::ChannelFailed;
        }

        CycleOutcome::Forwarded(channel)
    }
}

// ============================================================================
// Tests
// ============================================================================
