use crate::{AppError, Context};

use anyhow::anyhow;
use songbird::tracks::PlayMode;

/// Pause the currently playing track
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn pause(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = match ctx.guild_id() {
        Some(guild_id) => guild_id,
        None => {
            if let Err(e) = ctx.say("This command must be invoked in a guild!").await {
                tracing::warn!("can't send message 'guild command only': {}", e);
            }
            return Ok(());
        }
    };

    let songbird_manager = match songbird::get(ctx.serenity_context()).await {
        Some(songbird_manager) => songbird_manager,
        None => {
            if let Err(e) = ctx.say("Can't get Songbird manager!").await {
                tracing::warn!("can't send message 'can't get songbird manager': {}", e);
            }
            return Ok(());
        }
    };
    if songbird_manager.get(guild_id).is_none() {
        if let Err(e) = ctx.say("I'm not in a voice channel.").await {
            tracing::warn!("can't send message 'not in a voice channel': {}", e);
        }
        return Ok(());
    }

    let session = ctx.data().player_data.session(guild_id).await;
    if let Some(track_handle) = session.now_playing().await {
        if let Ok(info) = track_handle.get_info().await {
            if info.playing == PlayMode::Play {
                track_handle.pause().map_err(|e| {
                    AppError::from(anyhow!("commands::player::pause: can't pause: {}", e))
                })?;
                if let Err(e) = ctx.say("Playback paused!").await {
                    tracing::warn!("can't send message 'paused': {}", e);
                }
                return Ok(());
            }
        }
    }

    if let Err(e) = ctx.say("Nothing is currently playing.").await {
        tracing::warn!("can't send message 'nothing playing': {}", e);
    }

    Ok(())
}
