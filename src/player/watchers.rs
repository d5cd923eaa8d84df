use std::time::Duration;

use anyhow::anyhow;
use tracing::{info, warn};

use super::PlayerContext;

/// How long an empty queue may sit before the bot leaves. Long enough that
/// queueing the next song shortly after doesn't cost a reconnect.
pub const IDLE_GRACE: Duration = Duration::from_secs(300);

/// How often the occupancy watcher counts listeners.
const OCCUPANCY_POLL: Duration = Duration::from_secs(5);
/// How long an empty channel gets before the recheck that disconnects.
const OCCUPANCY_GRACE: Duration = Duration::from_secs(10);

/// Arm the empty-queue disconnect timer. No-op while a previous timer for
/// this guild is still pending; the permit's drop re-opens the slot. A
/// superseded timer does nothing at expiry because its guard ("still
/// connected, nothing dispatched") no longer holds.
pub async fn arm_idle_timer(player: PlayerContext, grace: Duration) {
    let session = player.session().await;
    let Some(permit) = session.idle_timer.try_acquire() else {
        return;
    };

    tokio::spawn(async move {
        let _permit = permit;
        tokio::time::sleep(grace).await;

        let session = player.session().await;
        if session.is_busy().await {
            return;
        }
        if player.manager.get(player.guild_id).is_none() {
            return;
        }

        match player.manager.remove(player.guild_id).await {
            Ok(()) => info!(
                "guild {}: disconnected after {}s of inactivity",
                player.guild_id,
                grace.as_secs()
            ),
            Err(e) => warn!("guild {}: can't disconnect: {}", player.guild_id, e),
        }
    });
}

/// Watch the bot's voice channel and leave once no real (non-bot) users
/// remain. Started when a connection is established; at most one instance
/// per guild. Exits when the connection is gone; transient count failures
/// log and retry on the next poll.
pub async fn watch_occupancy(player: PlayerContext) {
    let session = player.session().await;
    let Some(permit) = session.occupancy_watcher.try_acquire() else {
        return;
    };

    tokio::spawn(async move {
        let _permit = permit;
        loop {
            let Some(channel_id) = connected_channel(&player).await else {
                break;
            };

            match count_listeners(&player, channel_id) {
                Ok(0) => {
                    info!(
                        "guild {}: voice channel is empty, waiting {}s before disconnecting",
                        player.guild_id,
                        OCCUPANCY_GRACE.as_secs()
                    );
                    tokio::time::sleep(OCCUPANCY_GRACE).await;

                    // someone may have joined, or we may have moved/left
                    let Some(channel_id) = connected_channel(&player).await else {
                        break;
                    };
                    if matches!(count_listeners(&player, channel_id), Ok(0)) {
                        info!("guild {}: disconnecting, channel still empty", player.guild_id);
                        if let Err(e) = player.manager.remove(player.guild_id).await {
                            warn!("guild {}: can't disconnect: {}", player.guild_id, e);
                        }
                        break;
                    }
                }
                Ok(_) => (),
                Err(e) => warn!("guild {}: occupancy check failed: {}", player.guild_id, e),
            }

            tokio::time::sleep(OCCUPANCY_POLL).await;
        }
    });
}

/// The channel the bot is currently connected to, if any.
async fn connected_channel(player: &PlayerContext) -> Option<songbird::id::ChannelId> {
    let call = player.manager.get(player.guild_id)?;
    let channel = call.lock().await.current_channel();
    channel
}

/// Count non-bot users in the given voice channel from the gateway cache.
/// Users missing from the cache count as humans.
fn count_listeners(
    player: &PlayerContext,
    channel_id: songbird::id::ChannelId,
) -> anyhow::Result<usize> {
    let guild = player
        .cache
        .guild(player.guild_id)
        .ok_or_else(|| anyhow!("guild not in cache"))?;

    Ok(guild
        .voice_states
        .values()
        .filter(|voice_state| {
            voice_state.channel_id.map(|id| id.get()) == Some(channel_id.0.get())
        })
        .filter(|voice_state| {
            player
                .cache
                .user(voice_state.user_id)
                .map_or(true, |user| !user.bot)
        })
        .count())
}
