use std::time::Duration;

use crate::{AppError, Context};

use anyhow::anyhow;
use humantime::format_duration;
use poise::{
    serenity_prelude::{CreateEmbed, CreateEmbedFooter},
    CreateReply,
};

/// Check the App's status and latency
#[poise::command(prefix_command, slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), AppError> {
    let shard_id = ctx.serenity_context().shard_id;
    let heartbeat = ctx
        .data()
        .shard_manager
        .runners
        .lock()
        .await
        .get(&shard_id)
        .and_then(|runner| runner.latency)
        .map_or_else(
            || "not measured yet".to_string(),
            |latency| format!("{}ms", latency.as_millis()),
        );

    let uptime = format_duration(Duration::from_secs(
        ctx.data().start_time.elapsed().as_secs(),
    ))
    .to_string();

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title("Still spinning!")
                .color(0x7b2cbf)
                .fields(vec![
                    ("Gateway heartbeat", heartbeat, true),
                    ("Uptime", uptime, true),
                ])
                .footer(CreateEmbedFooter::new(format!(
                    "melodica, built on rustc {}",
                    rustc_version_runtime::version()
                ))),
        ),
    )
    .await
    .map_err(|e| AppError::from(anyhow!("can't send ping reply: {}", e)))?;

    Ok(())
}
