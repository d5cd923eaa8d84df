mod loop_mode;
mod session;
mod track;

pub use loop_mode::LoopMode;
pub use session::{Session, TaskSlot, TooFewTracks};
pub use track::{RawTrack, Track};

use std::collections::HashMap;
use std::sync::Arc;

use poise::serenity_prelude::GuildId;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct PlayerData {
    /// One [`Session`] per guild, created lazily and kept for the process
    /// lifetime. Each session carries its own locks; this map's lock is
    /// only held for the lookup.
    sessions: Mutex<HashMap<GuildId, Arc<Session>>>,

    /// The reqwest client handed to songbird for streaming direct URLs.
    pub http_client: reqwest::Client,
}

impl PlayerData {
    pub async fn session(&self, guild_id: GuildId) -> Arc<Session> {
        let mut sessions = self.sessions.lock().await;
        Arc::clone(sessions.entry(guild_id).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_is_created_once_per_guild() {
        let data = PlayerData::default();
        let a = data.session(GuildId::new(1)).await;
        let b = data.session(GuildId::new(1)).await;
        let other = data.session(GuildId::new(2)).await;

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let data = PlayerData::default();
        let a = data.session(GuildId::new(1)).await;
        a.push_back(Track {
            url: "u".into(),
            title: "t".into(),
        })
        .await;

        let b = data.session(GuildId::new(2)).await;
        assert_eq!(b.queue_len().await, 0);
        assert_eq!(a.queue_len().await, 1);
    }
}
