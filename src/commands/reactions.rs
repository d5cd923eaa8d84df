use poise::serenity_prelude::{self as serenity, FullEvent, ReactionType};
use songbird::tracks::PlayMode;
use tracing::warn;

use crate::commands::player::{format_queue, head_marker};
use crate::data::Data;
use crate::player::PlayerContext;
use crate::AppError;

/// Reaction-driven playback controls: the scheduler seeds every
/// "Now playing" message with six reactions, and pressing one of them
/// mirrors the matching command.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &FullEvent,
    data: &Data,
) -> Result<(), AppError> {
    let FullEvent::ReactionAdd { add_reaction } = event else {
        return Ok(());
    };

    let bot_id = ctx.cache.current_user().id;

    // only reactions from humans, on the bot's own messages
    let Some(user_id) = add_reaction.user_id else {
        return Ok(());
    };
    if user_id == bot_id || ctx.cache.user(user_id).map_or(false, |user| user.bot) {
        return Ok(());
    }
    if add_reaction.message_author_id != Some(bot_id) {
        return Ok(());
    }
    let Some(guild_id) = add_reaction.guild_id else {
        return Ok(());
    };
    let ReactionType::Unicode(emoji) = &add_reaction.emoji else {
        return Ok(());
    };

    let Some(manager) = songbird::get(ctx).await else {
        return Ok(());
    };
    // controls only make sense with a live voice connection
    if manager.get(guild_id).is_none() {
        return Ok(());
    }

    let player = PlayerContext {
        guild_id,
        channel_id: add_reaction.channel_id,
        manager,
        http: ctx.http.clone(),
        cache: ctx.cache.clone(),
        player_data: data.player_data.clone(),
        yt_dlp_path: data.config.yt_dlp_path.clone(),
    };
    let session = player.session().await;

    match emoji.as_str() {
        // play/pause toggle
        "⏯️" => {
            if let Some(track_handle) = session.now_playing().await {
                match track_handle.get_info().await.map(|info| info.playing) {
                    Ok(PlayMode::Play) => {
                        if track_handle.pause().is_ok() {
                            player.say("Playback paused.").await;
                        }
                    }
                    Ok(PlayMode::Pause) => {
                        if track_handle.play().is_ok() {
                            player.say("Playback resumed.").await;
                        }
                    }
                    _ => (),
                }
            }
        }

        // skip
        "⏭️" => {
            if let Some(track_handle) = session.now_playing().await {
                let is_live = matches!(
                    track_handle.get_info().await.map(|info| info.playing),
                    Ok(PlayMode::Play | PlayMode::Pause)
                );
                if is_live && track_handle.stop().is_ok() {
                    player.say("Skipping to the next song.").await;
                }
            }
        }

        // cycle loop mode
        "🔁" => {
            let mode = session.cycle_loop_mode().await;
            player.say(mode.describe()).await;
        }

        // shuffle
        "🔀" => match session.shuffle().await {
            Ok(_) => player.say("Queue shuffled.").await,
            Err(_) => {
                player
                    .say("Not enough songs in the queue to shuffle.")
                    .await
            }
        },

        // stop: clear, halt, leave
        "⏹️" => {
            session.clear().await;
            if let Some(track_handle) = session.take_now_playing().await {
                if let Err(e) = track_handle.stop() {
                    warn!("can't stop current track: {}", e);
                }
            }
            if let Err(e) = player.manager.remove(guild_id).await {
                warn!("can't leave voice channel: {}", e);
            }
            player.say("Playback stopped and disconnected.").await;
        }

        // show queue
        "📋" => {
            let tracks = session.queue_snapshot().await;
            if tracks.is_empty() {
                player.say("The queue is empty.").await;
            } else {
                let listing = format_queue(
                    &tracks,
                    head_marker(session.is_busy().await, session.loop_mode().await),
                );
                player.say(format!("**Queue:**\n{}", listing)).await;
            }
        }

        _ => (),
    }

    Ok(())
}
