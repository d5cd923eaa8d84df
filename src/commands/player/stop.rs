use crate::{AppError, Context};

/// Stop playback, clear the queue and leave the voice channel
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn stop(ctx: Context<'_>) -> Result<(), AppError> {
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
        if let Err(e) = ctx.say("I'm not connected to any voice channel.").await {
            tracing::warn!("can't send message 'not connected': {}", e);
        }
        return Ok(());
    }

    let session = ctx.data().player_data.session(guild_id).await;
    session.clear().await;

    if let Some(track_handle) = session.take_now_playing().await {
        if let Err(e) = track_handle.stop() {
            tracing::warn!("can't stop current track: {}", e);
        }
    }

    if let Err(e) = songbird_manager.remove(guild_id).await {
        tracing::warn!("can't leave voice channel: {}", e);
    }

    if let Err(e) = ctx.say("Stopped playback and disconnected!").await {
        tracing::warn!("can't send message 'stopped': {}", e);
    }

    Ok(())
}
