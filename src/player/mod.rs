pub mod recommend;
pub mod resolver;
pub mod scheduler;
pub mod track_end;
pub mod watchers;

use std::sync::Arc;

use poise::serenity_prelude::{Cache, ChannelId, GuildId, Http};
use songbird::Songbird;

use crate::data::player_data::{PlayerData, Session};
use crate::Context;

/// Everything the scheduler and its background activities need to run
/// detached from a command invocation.
#[derive(Clone)]
pub struct PlayerContext {
    pub guild_id: GuildId,
    /// Text channel where playback announcements go.
    pub channel_id: ChannelId,
    pub manager: Arc<Songbird>,
    pub http: Arc<Http>,
    pub cache: Arc<Cache>,
    pub player_data: Arc<PlayerData>,
    pub yt_dlp_path: String,
}

impl PlayerContext {
    pub async fn from_command(ctx: &Context<'_>, guild_id: GuildId) -> Option<Self> {
        let manager = songbird::get(ctx.serenity_context()).await?;
        Some(Self {
            guild_id,
            channel_id: ctx.channel_id(),
            manager,
            http: ctx.serenity_context().http.clone(),
            cache: ctx.serenity_context().cache.clone(),
            player_data: ctx.data().player_data.clone(),
            yt_dlp_path: ctx.data().config.yt_dlp_path.clone(),
        })
    }

    pub async fn session(&self) -> Arc<Session> {
        self.player_data.session(self.guild_id).await
    }

    pub async fn say(&self, content: impl Into<String>) {
        if let Err(e) = self.channel_id.say(self.http.clone(), content).await {
            tracing::warn!("can't send message: {}", e);
        }
    }
}
