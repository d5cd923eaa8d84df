use crate::{AppError, Context};

/// Clear the queue without stopping the current track
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn clear(ctx: Context<'_>) -> Result<(), AppError> {
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
    let size = session.clear().await;

    let content = match size {
        0 => "The queue is already empty.".to_string(),
        1 => "Removed 1 song from the queue.".to_string(),
        size => format!("Removed {} songs from the queue.", size),
    };
    if let Err(e) = ctx.say(content).await {
        tracing::warn!("can't send message 'cleared': {}", e);
    }

    Ok(())
}
