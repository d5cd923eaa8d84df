use crate::{AppError, Context};

/// Shuffle the queue, keeping the current track first
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn shuffle(ctx: Context<'_>) -> Result<(), AppError> {
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

    let content = if session.queue_len().await == 0 {
        "The queue is empty.".to_string()
    } else {
        match session.shuffle().await {
            Ok(_) => "The queue has been shuffled.".to_string(),
            Err(_) => "You need at least 2 songs in the queue to shuffle them.".to_string(),
        }
    };
    if let Err(e) = ctx.say(content).await {
        tracing::warn!("can't send message 'shuffled': {}", e);
    }

    Ok(())
}
