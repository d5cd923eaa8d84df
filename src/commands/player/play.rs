use crate::player::resolver::{self, ResolveError};
use crate::player::{scheduler, watchers, PlayerContext};
use crate::{AppError, Context};

use anyhow::anyhow;
use tracing::error;

/// Where a playlist entry goes when the resolved set is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaylistSlot {
    /// Jump the queue and dispatch right away.
    PlayNow,
    /// Append behind whatever is already queued.
    Append,
}

/// Only the first entry of an idle session starts immediately; everything
/// else keeps resolution order at the back of the queue.
fn playlist_slot(index: usize, busy: bool) -> PlaylistSlot {
    if index == 0 && !busy {
        PlaylistSlot::PlayNow
    } else {
        PlaylistSlot::Append
    }
}

/// Play a song or add it to the queue
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URLs supported by `yt-dlp` or YT search query"] query: String,
) -> Result<(), AppError> {
    if query.trim().is_empty() {
        return Err(AppError::from(anyhow!(
            "commands::player::play: query is empty, probably due to Discord's side"
        )));
    }

    let guild_id = match ctx.guild_id() {
        Some(guild_id) => guild_id,
        None => {
            if let Err(e) = ctx.say("This command must be invoked in a guild!").await {
                tracing::warn!("can't send message 'guild command only': {}", e);
            }
            return Ok(());
        }
    };

    let voice_channel_id = match ctx.guild().and_then(|guild| {
        guild
            .voice_states
            .get(&ctx.author().id)
            .and_then(|voice_state| voice_state.channel_id)
    }) {
        Some(voice_channel_id) => voice_channel_id,
        None => {
            let _ = ctx.say("You're not in a voice channel!").await;
            return Ok(());
        }
    };

    let player = match PlayerContext::from_command(&ctx, guild_id).await {
        Some(player) => player,
        None => {
            let _ = ctx.say("Can't get Songbird manager!").await;
            return Ok(());
        }
    };

    // join the invoker's channel, or follow them if we're elsewhere
    let call = {
        let needs_join = match player.manager.get(guild_id) {
            Some(call) => {
                let current = call.lock().await.current_channel();
                current.map(|channel| channel.0.get()) != Some(voice_channel_id.get())
            }
            None => true,
        };
        if needs_join {
            match player.manager.join(guild_id, voice_channel_id).await {
                Ok(call) => call,
                Err(e) => {
                    let _ = ctx.say(format!("Can't join voice channel: {}", e)).await;
                    return Ok(());
                }
            }
        } else {
            match player.manager.get(guild_id) {
                Some(call) => call,
                None => return Ok(()),
            }
        }
    };

    // the watcher's slot makes this a no-op while one is already running
    watchers::watch_occupancy(player.clone()).await;

    // deafen the bot
    {
        let mut call = call.lock().await;
        if !call.is_deaf() {
            if let Err(e) = call.deafen(true).await {
                tracing::warn!("can't deafen the bot: {}", e);
            }
        }
    }

    // resolution can take a while
    if let Err(e) = ctx.defer().await {
        return Err(AppError::from(anyhow!("can't send defer msg: {}", e)));
    }

    let resolved = match resolver::resolve(&player.yt_dlp_path, &query).await {
        Ok(resolved) => resolved,
        Err(ResolveError::NoResults) => {
            let _ = ctx.say("No results found.").await;
            return Ok(());
        }
        Err(ResolveError::Backend(e)) => {
            error!("commands::player::play: resolution failed: {}", e);
            let _ = ctx.say("Something went wrong while resolving that.").await;
            return Ok(());
        }
    };

    let session = player.session().await;

    if resolved.tracks.len() > 1 {
        // playlist / multi-entry result: the first entry jumps the queue
        // and starts immediately when nothing is playing, the rest append
        // in resolution order
        let count = resolved.tracks.len();
        let mut started = false;
        for (i, track) in resolved.tracks.into_iter().enumerate() {
            match playlist_slot(i, session.is_busy().await) {
                PlaylistSlot::PlayNow => {
                    session.push_front(track).await;
                    scheduler::advance(player.clone()).await;
                    started = true;
                }
                PlaylistSlot::Append => session.push_back(track).await,
            }
        }

        let playlist_title = resolved
            .playlist_title
            .unwrap_or_else(|| "Playlist".to_string());
        let _ = ctx
            .say(format!(
                "Added {} songs from **{}** to the queue.",
                count, playlist_title
            ))
            .await;

        // something was already playing when we looked, but it may have
        // finished while entries were appended
        if !started && !session.is_busy().await && session.queue_len().await > 0 {
            scheduler::advance(player).await;
        }
        return Ok(());
    }

    let Some(track) = resolved.tracks.into_iter().next() else {
        let _ = ctx.say("No results found.").await;
        return Ok(());
    };

    let title = track.display_title();
    session.push_back(track).await;

    if session.is_busy().await {
        let _ = ctx.say(format!("Added to queue: **{}**", title)).await;
    } else {
        let _ = ctx.say(format!("Now playing: **{}**", title)).await;
        scheduler::advance(player).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_playlist_entry_plays_immediately_when_idle() {
        assert_eq!(playlist_slot(0, false), PlaylistSlot::PlayNow);
    }

    #[test]
    fn first_playlist_entry_queues_behind_a_live_track() {
        assert_eq!(playlist_slot(0, true), PlaylistSlot::Append);
    }

    #[test]
    fn later_playlist_entries_always_append() {
        assert_eq!(playlist_slot(1, false), PlaylistSlot::Append);
        assert_eq!(playlist_slot(7, true), PlaylistSlot::Append);
    }
}
