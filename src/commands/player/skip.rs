use crate::{AppError, Context};

use anyhow::anyhow;
use songbird::tracks::PlayMode;

/// Skip the current track
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn skip(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = match ctx.guild_id() {
        Some(guild_id) => guild_id,
        None => {
            if let Err(e) = ctx.say("This command must be invoked in a guild!").await {
                tracing::warn!("can't send message 'guild command only': {}", e);
            }
            return Ok(());
        }
    };

    let session = ctx.data().player_data.session(guild_id).await;

    let track_handle = match session.now_playing().await {
        Some(track_handle) => track_handle,
        None => {
            if let Err(e) = ctx.say("Not playing anything to skip.").await {
                tracing::warn!("can't send message 'nothing to skip': {}", e);
            }
            return Ok(());
        }
    };

    let is_live = match track_handle.get_info().await {
        Ok(info) => matches!(info.playing, PlayMode::Play | PlayMode::Pause),
        Err(_) => false,
    };
    if !is_live {
        if let Err(e) = ctx.say("Not playing anything to skip.").await {
            tracing::warn!("can't send message 'nothing to skip': {}", e);
        }
        return Ok(());
    }

    // stopping fires the completion handler, which dispatches the next one
    track_handle.stop().map_err(|e| {
        AppError::from(anyhow!("commands::player::skip: can't stop track: {}", e))
    })?;

    if let Err(e) = ctx.say("Skipped the current song.").await {
        tracing::warn!("can't send message 'skipped': {}", e);
    }

    Ok(())
}
