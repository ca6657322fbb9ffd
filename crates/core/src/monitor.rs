use crate::classify::classify;
use crate::models::{has_changed, NormalizedState};
use crate::traits::{PlayerStateSource, StatePublisher};
use std::time::Duration;
use tokio::time::Instant;

const INITIAL_RECONNECT_DELAY: Duration = Duration::from_secs(1);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

/// The polling loop: fetch → classify → normalize → detect → publish.
///
/// Holds the last published snapshot so identical state is published exactly
/// once. Starts with no last snapshot, so the first successfully classified
/// state is always published.
pub struct Monitor<S, P> {
    source: S,
    publisher: P,
    poll_interval: Duration,
    last_published: Option<NormalizedState>,
    reconnect_delay: Duration,
    next_reconnect: Option<Instant>,
}

impl<S: PlayerStateSource, P: StatePublisher> Monitor<S, P> {
    pub fn new(source: S, publisher: P, poll_interval: Duration) -> Self {
        Self {
            source,
            publisher,
            poll_interval,
            last_published: None,
            reconnect_delay: INITIAL_RECONNECT_DELAY,
            next_reconnect: None,
        }
    }

    /// Run cycles until the future is dropped. Shutdown is cooperative at the
    /// inter-cycle sleep; nothing is cancelled mid-cycle.
    pub async fn run(&mut self) {
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One poll cycle. All failures are local to the cycle: a fetch error
    /// skips it, a publish error leaves the state unpublished until the next
    /// change-detecting cycle.
    pub async fn run_cycle(&mut self) {
        let raw = match self.source.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("fetch failed, skipping cycle: {}", e);
                return;
            }
        };

        let source = classify(&raw);
        let state = NormalizedState::from_raw(&raw, source);

        let changed = match &self.last_published {
            Some(previous) => has_changed(previous, &state),
            None => true,
        };
        if !changed {
            return;
        }

        if !self.publisher.is_connected() && !self.try_reconnect().await {
            return;
        }

        tracing::info!("now playing: {} {:?}", state.source, state.details);
        if let Err(e) = self.publisher.publish_source(state.source).await {
            tracing::warn!("source publish failed: {}", e);
            return;
        }
        if let Err(e) = self.publisher.publish_details(&state.details).await {
            tracing::warn!("details publish failed: {}", e);
            return;
        }

        // Recorded only after both topics went out; a partial publish is
        // redone as a whole next cycle.
        self.last_published = Some(state);
    }

    /// Attempt a broker reconnect, honoring the capped-exponential backoff
    /// window between attempts.
    async fn try_reconnect(&mut self) -> bool {
        if let Some(not_before) = self.next_reconnect {
            if Instant::now() < not_before {
                tracing::debug!("broker reconnect backed off, skipping publish");
                return false;
            }
        }

        match self.publisher.connect().await {
            Ok(()) => {
                self.reconnect_delay = INITIAL_RECONNECT_DELAY;
                self.next_reconnect = None;
                true
            }
            Err(e) => {
                tracing::warn!(
                    "broker reconnect failed, next attempt in {:?}: {}",
                    self.reconnect_delay,
                    e
                );
                self.next_reconnect = Some(Instant::now() + self.reconnect_delay);
                self.reconnect_delay = (self.reconnect_delay * 2).min(MAX_RECONNECT_DELAY);
                false
            }
        }
    }

    pub fn last_published(&self) -> Option<&NormalizedState> {
        self.last_published.as_ref()
    }
}
