use crate::{AppError, Context};

/// Show or toggle automatic recommendations when the queue runs out
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn recommendations(
    ctx: Context<'_>,
    #[description = "enable or disable"] enabled: Option<bool>,
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

    let content = match enabled {
        None => format!(
            "Automatic recommendations are {}.",
            if session.recommendations_enabled() {
                "enabled"
            } else {
                "disabled"
            }
        ),
        Some(true) => {
            session.set_recommendations_enabled(true);
            "Automatic recommendations enabled. When the queue runs out, similar songs will be added."
                .to_string()
        }
        Some(false) => {
            session.set_recommendations_enabled(false);
            "Automatic recommendations disabled.".to_string()
        }
    };
    if let Err(e) = ctx.say(content).await {
        tracing::warn!("can't send message 'recommendations': {}", e);
    }

    Ok(())
}
