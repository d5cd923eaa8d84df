use tracing::error;

use super::resolver::{self, ResolveError};
use super::PlayerContext;

/// How many similar tracks one fetch may add.
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Search for tracks similar to `seed_title` and append them to the
/// guild's queue. Returns the number added; zero tells the caller to fall
/// back to the idle timer. Backend failures are reported to the channel
/// and count as zero.
pub async fn fetch_recommendations(player: &PlayerContext, seed_title: &str) -> usize {
    let resolved = match resolver::resolve_similar(
        &player.yt_dlp_path,
        seed_title,
        RECOMMENDATION_LIMIT,
    )
    .await
    {
        Ok(resolved) => resolved,
        Err(ResolveError::NoResults) => {
            player.say("No recommendations found.").await;
            return 0;
        }
        Err(ResolveError::Backend(e)) => {
            error!("recommendation lookup failed: {}", e);
            player
                .say("Something went wrong while looking for recommendations.")
                .await;
            return 0;
        }
    };

    let session = player.session().await;
    let count = resolved.tracks.len();
    for track in resolved.tracks {
        session.push_back(track).await;
    }

    player
        .say(format!(
            "Added {} recommendation{} to the queue.",
            count,
            if count == 1 { "" } else { "s" }
        ))
        .await;
    count
}
