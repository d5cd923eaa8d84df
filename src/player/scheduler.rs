use std::sync::Arc;

use poise::serenity_prelude::{CreateMessage, ReactionType};
use songbird::input::HttpRequest;
use songbird::{Event, TrackEvent};
use tracing::{error, warn};

use super::track_end::TrackCompletionHandler;
use super::{recommend, watchers, PlayerContext};
use crate::data::player_data::{Session, Track};

/// Reactions seeded under every "Now playing" message:
/// play/pause, skip, loop, shuffle, stop, queue.
pub const CONTROL_REACTIONS: [&str; 6] = ["⏯️", "⏭️", "🔁", "🔀", "⏹️", "📋"];

/// What one scheduler turn does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NextStep {
    Dispatch,
    FetchRecommendations,
    ArmIdleTimer,
}

/// Pure decision behind [`advance`]: a non-empty queue always dispatches;
/// an empty one fetches recommendations only when they are enabled and a
/// seed title exists, and otherwise arms the idle timer.
pub(crate) fn next_step(
    queue_empty: bool,
    recommendations_enabled: bool,
    has_last_played: bool,
) -> NextStep {
    if !queue_empty {
        return NextStep::Dispatch;
    }
    if recommendations_enabled && has_last_played {
        return NextStep::FetchRecommendations;
    }
    NextStep::ArmIdleTimer
}

/// Dispatch the next track of the guild's queue, or wind the cycle down.
///
/// Loop-mode reinsertion happens at pop time ([`Session::pop_next`]), so
/// the front of the queue is always the next and only track to dispatch.
/// The completion handler attached to the dispatched track re-invokes this
/// from a fresh task, which keeps dispatches strictly sequential per guild.
pub async fn advance(player: PlayerContext) {
    let session = player.session().await;

    // claim the dispatch before popping: until the handle is stored the
    // claim is what keeps a concurrent advance (or an enqueue observing
    // the session as idle) from starting a second stream
    let Some(permit) = session.dispatch.try_acquire() else {
        return;
    };

    let Some(track) = session.pop_next().await else {
        drop(permit);
        terminate_cycle(player, session).await;
        return;
    };

    session.set_last_played(track.title.clone()).await;

    let Some(call) = player.manager.get(player.guild_id) else {
        warn!(
            "guild {}: no voice connection to dispatch into, requeueing `{}`",
            player.guild_id, track.title
        );
        session.restore_front(track).await;
        return;
    };

    let input = HttpRequest::new(player.player_data.http_client.clone(), track.url.clone());
    let handle = call.lock().await.play_input(input.into());

    // one handler for both events; it fires advance exactly once whether
    // the track ends, is stopped, or errors out
    let completion = TrackCompletionHandler::new(player.clone(), track.display_title());
    for event in [
        Event::Track(TrackEvent::End),
        Event::Track(TrackEvent::Error),
    ] {
        if let Err(e) = handle.add_event(event, completion.clone()) {
            error!("can't attach completion handler: {}", e);
        }
    }

    // the stored handle answers busy checks from here on, so only now may
    // the dispatch claim be released
    session.set_now_playing(handle).await;
    drop(permit);

    announce_now_playing(&player, &track).await;
}

/// Empty-queue branch: recommendations keep the cycle alive, otherwise
/// the idle timer takes over.
async fn terminate_cycle(player: PlayerContext, session: Arc<Session>) {
    let seed = session.last_played().await;

    if next_step(true, session.recommendations_enabled(), seed.is_some())
        == NextStep::FetchRecommendations
    {
        if let Some(seed) = seed {
            player
                .say(format!(
                    "The queue has finished. Looking for songs similar to: **{}**",
                    seed
                ))
                .await;
            if recommend::fetch_recommendations(&player, &seed).await > 0 {
                return Box::pin(advance(player)).await;
            }
        }
    }

    watchers::arm_idle_timer(player, watchers::IDLE_GRACE).await;
}

async fn announce_now_playing(player: &PlayerContext, track: &Track) {
    let message = match player
        .channel_id
        .send_message(
            player.http.clone(),
            CreateMessage::default().content(format!("Now playing: **{}**", track.display_title())),
        )
        .await
    {
        Ok(message) => message,
        Err(e) => {
            warn!("can't send message 'now playing': {}", e);
            return;
        }
    };

    for emoji in CONTROL_REACTIONS {
        if let Err(e) = message
            .react(player.http.clone(), ReactionType::Unicode(emoji.to_string()))
            .await
        {
            warn!("can't add control reaction {}: {}", emoji, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonempty_queue_always_dispatches() {
        assert_eq!(next_step(false, false, false), NextStep::Dispatch);
        assert_eq!(next_step(false, true, true), NextStep::Dispatch);
    }

    #[test]
    fn empty_queue_without_recommendations_arms_the_idle_timer() {
        assert_eq!(next_step(true, false, false), NextStep::ArmIdleTimer);
        assert_eq!(next_step(true, false, true), NextStep::ArmIdleTimer);
    }

    #[test]
    fn recommendations_need_a_seed_title() {
        assert_eq!(next_step(true, true, false), NextStep::ArmIdleTimer);
        assert_eq!(next_step(true, true, true), NextStep::FetchRecommendations);
    }
}
