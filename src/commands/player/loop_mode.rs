use crate::data::player_data::LoopMode;
use crate::{AppError, Context};

/// Show or set the loop mode (none, song, queue)
#[poise::command(prefix_command, slash_command, guild_only, rename = "loop")]
pub async fn loop_mode(
    ctx: Context<'_>,
    #[description = "none, song or queue"] mode: Option<String>,
) -> Result<(), AppError> {
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

    let content = match mode {
        None => format!("Current loop mode: **{}**", session.loop_mode().await),
        Some(mode) => match mode.parse::<LoopMode>() {
            Ok(mode) => {
                session.set_loop_mode(mode).await;
                mode.describe().to_string()
            }
            // no state change on bad input
            Err(()) => "Invalid mode. Available options: none, song, queue".to_string(),
        },
    };
    if let Err(e) = ctx.say(content).await {
        tracing::warn!("can't send message 'loop mode': {}", e);
    }

    Ok(())
}
