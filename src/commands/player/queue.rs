use std::fmt::Write;

use anyhow::anyhow;
use poise::{serenity_prelude::CreateEmbed, CreateReply};

use crate::data::player_data::{LoopMode, Track};
use crate::{AppError, Context};

/// How many entries a queue listing shows before collapsing the rest
/// into a remainder count.
const QUEUE_DISPLAY_CAP: usize = 20;

/// Whether the head of the queue is the track currently playing. Popping
/// reinserts at the front only under song-loop, so everywhere else the
/// head is the next track up and gets no marker.
pub fn head_marker(busy: bool, mode: LoopMode) -> bool {
    busy && mode == LoopMode::Song
}

/// Render the queue listing shared by the `/queue` command and the 📋
/// reaction. `mark_head` puts the playing marker on the first entry.
pub fn format_queue(tracks: &[Track], mark_head: bool) -> String {
    let mut listing = String::new();
    for (i, track) in tracks.iter().take(QUEUE_DISPLAY_CAP).enumerate() {
        let marker = if i == 0 && mark_head { "▶️ " } else { "" };
        let _ = writeln!(listing, "{}{}. {}", marker, i + 1, track.display_title());
    }
    if tracks.len() > QUEUE_DISPLAY_CAP {
        let _ = write!(listing, "... and {} more.", tracks.len() - QUEUE_DISPLAY_CAP);
    }
    listing
}

/// List the tracks in the queue
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn queue(ctx: Context<'_>) -> Result<(), AppError> {
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
    let tracks = session.queue_snapshot().await;

    if tracks.is_empty() {
        if let Err(e) = ctx.say("The queue is empty.").await {
            tracing::warn!("can't send message 'queue is empty': {}", e);
        }
        return Ok(());
    }

    let listing = format_queue(
        &tracks,
        head_marker(session.is_busy().await, session.loop_mode().await),
    );
    ctx.send(
        CreateReply::default().embed(CreateEmbed::default().title("Queue").description(listing)),
    )
    .await
    .map_err(|e| {
        AppError::from(anyhow!(
            "commands::player::queue: can't send message: {}",
            e
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                url: format!("https://cdn.example/{i}"),
                title: format!("track {i}"),
            })
            .collect()
    }

    #[test]
    fn marks_the_head_when_playing() {
        let listing = format_queue(&tracks(2), true);
        assert!(listing.starts_with("▶️ 1. track 0"));
        assert!(listing.contains("2. track 1"));
    }

    #[test]
    fn no_marker_when_idle() {
        let listing = format_queue(&tracks(1), false);
        assert!(listing.starts_with("1. track 0"));
    }

    #[test]
    fn head_marker_only_under_song_loop() {
        assert!(head_marker(true, LoopMode::Song));
        assert!(!head_marker(true, LoopMode::None));
        assert!(!head_marker(true, LoopMode::Queue));
        assert!(!head_marker(false, LoopMode::Song));
    }

    #[test]
    fn caps_at_twenty_with_remainder() {
        let listing = format_queue(&tracks(25), false);
        assert!(listing.contains("20. track 19"));
        assert!(!listing.contains("21. track 20"));
        assert!(listing.ends_with("... and 5 more."));
    }
}
