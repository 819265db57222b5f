//! Recording availability probe
//!
//! Before a recording is imported, its playback URL is probed to learn
//! whether the recorder still holds it. Classification is a small state
//! machine driven by one HTTP status at a time; the recorder answers 503
//! while it is busy serving a stream, so that status backs off and retries
//! with no cap.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::models::DeleteReason;

/// One step of the probe loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    /// Issue a request and feed the status to `transition`.
    Probing,
    /// Recorder is busy; wait out the backoff, then probe again.
    Backoff,
    /// The recording's deletion state is known.
    Classified(DeleteReason),
    /// An HTTP status the classifier has no mapping for.
    Fatal(u16),
}

/// Pure classification of one probe response status.
pub fn transition(status: StatusCode) -> ProbeState {
    if status.is_success() {
        ProbeState::Classified(DeleteReason::NotDeleted)
    } else if status == StatusCode::NOT_FOUND {
        ProbeState::Classified(DeleteReason::Downloaded)
    } else if status == StatusCode::SERVICE_UNAVAILABLE {
        ProbeState::Backoff
    } else {
        ProbeState::Fatal(status.as_u16())
    }
}

/// Probes playback URLs against the recorder.
pub struct Prober {
    client: Client,
    backoff: Duration,
}

impl Prober {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            backoff: Duration::from_secs(config.backoff_secs),
        })
    }

    /// Classify a recording by probing its playback URL.
    ///
    /// Runs the machine to a terminal state. The request is a plain GET whose
    /// body is never read; network-level failures propagate as fatal.
    pub async fn classify(&self, play_url: &str) -> Result<DeleteReason> {
        let url = Url::parse(play_url)?;
        let mut state = ProbeState::Probing;
        loop {
            state = match state {
                ProbeState::Probing => {
                    let response = self.client.get(url.clone()).send().await?;
                    transition(response.status())
                }
                ProbeState::Backoff => {
                    warn!(
                        url = %url,
                        backoff_secs = self.backoff.as_secs(),
                        "Recorder busy (503), retrying"
                    );
                    tokio::time::sleep(self.backoff).await;
                    ProbeState::Probing
                }
                ProbeState::Classified(reason) => {
                    debug!(url = %url, ?reason, "Probe classified recording");
                    return Ok(reason);
                }
                ProbeState::Fatal(status) => {
                    return Err(Error::ProbeStatus {
                        url: play_url.to_string(),
                        status,
                    });
                }
            };
        }
    }
}
