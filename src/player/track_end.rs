use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use poise::serenity_prelude::async_trait;
use songbird::tracks::PlayMode;
use tracing::error;

use super::{scheduler, PlayerContext};

/// Attached to every dispatched track for both the End and Error events.
/// Runs on songbird's event context, so it never touches session state
/// directly: it hands off to a fresh tokio task which re-enters the
/// scheduler.
#[derive(Clone)]
pub struct TrackCompletionHandler {
    player: PlayerContext,
    title: String,
    /// Both registered events may observe the same terminal state; only
    /// the first observer advances the cycle.
    fired: Arc<AtomicBool>,
}

impl TrackCompletionHandler {
    pub fn new(player: PlayerContext, title: String) -> Self {
        Self {
            player,
            title,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl songbird::EventHandler for TrackCompletionHandler {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        let track_id = {
            let track = match ctx {
                songbird::EventContext::Track(track) => track,
                _ => return None,
            };
            let (track_state, track_handle) = track[0];
            match &track_state.playing {
                // still live, not a completion
                PlayMode::Play | PlayMode::Pause => return None,
                PlayMode::Errored(e) => {
                    // a bad track must not stall the cycle; log and move on
                    error!("playback of `{}` failed: {}", self.title, e);
                }
                _ => (),
            }
            track_handle.uuid()
        };

        if self.fired.swap(true, Ordering::AcqRel) {
            return None;
        }

        let player = self.player.clone();
        tokio::spawn(async move {
            let session = player.session().await;
            // only the completion of the track still held as now-playing
            // may advance; a superseded handle's event is a no-op
            if session.clear_now_playing(track_id).await {
                scheduler::advance(player).await;
            }
        });

        None
    }
}
