use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::seq::SliceRandom;
use songbird::tracks::{PlayMode, TrackHandle};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::loop_mode::LoopMode;
use super::track::Track;

/// Guards a kind of background activity so at most one instance runs per
/// session. Claiming is a single compare-and-swap, so two callers can't
/// both observe "not running" and both spawn.
#[derive(Debug, Default)]
pub struct TaskSlot {
    running: AtomicBool,
}

impl TaskSlot {
    /// Atomically claim the slot. `None` means an activity already holds it.
    /// Dropping the permit frees the slot again.
    pub fn try_acquire(self: &Arc<Self>) -> Option<TaskPermit> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TaskPermit {
                slot: Arc::clone(self),
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct TaskPermit {
    slot: Arc<TaskSlot>,
}

impl Drop for TaskPermit {
    fn drop(&mut self) {
        self.slot.running.store(false, Ordering::Release);
    }
}

/// Queue too short to shuffle.
#[derive(Debug, PartialEq, Eq)]
pub struct TooFewTracks;

/// Per-guild playback state. Created on first touch, never removed; an
/// entry with an empty queue and no voice connection holds nothing live.
#[derive(Debug, Default)]
pub struct Session {
    queue: Mutex<VecDeque<Track>>,
    loop_mode: Mutex<LoopMode>,
    recommendations_enabled: AtomicBool,
    last_played: Mutex<Option<String>>,
    now_playing: Mutex<Option<TrackHandle>>,

    /// At most one pending empty-queue disconnect timer.
    pub idle_timer: Arc<TaskSlot>,
    /// At most one channel-occupancy watcher per live connection.
    pub occupancy_watcher: Arc<TaskSlot>,
    /// Held across pop-to-handle-storage so a dispatch in flight is never
    /// observed as idle, and two dispatches can't overlap.
    pub dispatch: Arc<TaskSlot>,
}

impl Session {
    /// Pop the next track to dispatch, applying loop-mode reinsertion
    /// under the same lock. Song mode puts the track back at the front,
    /// queue mode at the back.
    pub async fn pop_next(&self) -> Option<Track> {
        let mode = *self.loop_mode.lock().await;
        let mut queue = self.queue.lock().await;
        let track = queue.pop_front()?;
        match mode {
            LoopMode::Song => queue.push_front(track.clone()),
            LoopMode::Queue => queue.push_back(track.clone()),
            LoopMode::None => {}
        }
        Some(track)
    }

    pub async fn push_back(&self, track: Track) {
        self.queue.lock().await.push_back(track);
    }

    /// Used for the first entry of a fresh playlist so it plays before the
    /// remainder that's still being resolved.
    pub async fn push_front(&self, track: Track) {
        self.queue.lock().await.push_front(track);
    }

    /// Empty the queue, returning how many tracks were dropped.
    pub async fn clear(&self) -> usize {
        let mut queue = self.queue.lock().await;
        let size = queue.len();
        queue.clear();
        size
    }

    /// Randomly permute the queue while keeping index 0 (the playing /
    /// next-up track) in place.
    pub async fn shuffle(&self) -> Result<usize, TooFewTracks> {
        let mut queue = self.queue.lock().await;
        if queue.len() < 2 {
            return Err(TooFewTracks);
        }
        let mut rest: Vec<Track> = queue.drain(1..).collect();
        rest.shuffle(&mut rand::thread_rng());
        queue.extend(rest);
        Ok(queue.len())
    }

    /// Undo a [`Self::pop_next`] whose dispatch could not happen: remove
    /// the loop-mode copy that pop reinserted, then put the track back at
    /// the front so it is neither lost nor duplicated.
    pub async fn restore_front(&self, track: Track) {
        let mode = *self.loop_mode.lock().await;
        let mut queue = self.queue.lock().await;
        match mode {
            LoopMode::Song => {
                if queue.front() == Some(&track) {
                    queue.pop_front();
                }
            }
            LoopMode::Queue => {
                if let Some(pos) = queue.iter().rposition(|t| t == &track) {
                    queue.remove(pos);
                }
            }
            LoopMode::None => (),
        }
        queue.push_front(track);
    }

    pub async fn queue_len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn queue_snapshot(&self) -> Vec<Track> {
        self.queue.lock().await.iter().cloned().collect()
    }

    pub async fn loop_mode(&self) -> LoopMode {
        *self.loop_mode.lock().await
    }

    pub async fn set_loop_mode(&self, mode: LoopMode) {
        *self.loop_mode.lock().await = mode;
    }

    /// Cycle the loop mode (reaction control), returning the new mode.
    pub async fn cycle_loop_mode(&self) -> LoopMode {
        let mut mode = self.loop_mode.lock().await;
        *mode = mode.cycle();
        *mode
    }

    pub fn recommendations_enabled(&self) -> bool {
        self.recommendations_enabled.load(Ordering::Acquire)
    }

    pub fn set_recommendations_enabled(&self, enabled: bool) {
        self.recommendations_enabled.store(enabled, Ordering::Release);
    }

    pub async fn last_played(&self) -> Option<String> {
        self.last_played.lock().await.clone()
    }

    /// Recorded at dispatch time, never at enqueue time.
    pub async fn set_last_played(&self, title: String) {
        *self.last_played.lock().await = Some(title);
    }

    pub async fn set_now_playing(&self, handle: TrackHandle) {
        *self.now_playing.lock().await = Some(handle);
    }

    pub async fn take_now_playing(&self) -> Option<TrackHandle> {
        self.now_playing.lock().await.take()
    }

    /// Clear the stored handle, but only while it still belongs to the
    /// track that just completed. `false` means a newer dispatch has
    /// replaced it and this completion must not advance the cycle.
    pub async fn clear_now_playing(&self, track_id: Uuid) -> bool {
        let mut now_playing = self.now_playing.lock().await;
        if now_playing.as_ref().map(|handle| handle.uuid()) == Some(track_id) {
            *now_playing = None;
            return true;
        }
        false
    }

    pub async fn now_playing(&self) -> Option<TrackHandle> {
        self.now_playing.lock().await.clone()
    }

    /// Whether a track is currently dispatched (playing or paused), or a
    /// dispatch is in flight between pop and handle storage. A handle
    /// whose state can no longer be queried counts as idle.
    pub async fn is_busy(&self) -> bool {
        if self.dispatch.is_running() {
            return true;
        }
        let handle = self.now_playing.lock().await.clone();
        let Some(handle) = handle else {
            return false;
        };
        match handle.get_info().await {
            Ok(info) => matches!(info.playing, PlayMode::Play | PlayMode::Pause),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str) -> Track {
        Track {
            url: format!("https://cdn.example/{name}"),
            title: name.to_string(),
        }
    }

    #[tokio::test]
    async fn pop_drains_in_fifo_order() {
        let session = Session::default();
        for name in ["a", "b", "c"] {
            session.push_back(track(name)).await;
        }

        assert_eq!(session.pop_next().await, Some(track("a")));
        assert_eq!(session.pop_next().await, Some(track("b")));
        assert_eq!(session.pop_next().await, Some(track("c")));
        assert_eq!(session.pop_next().await, None);
    }

    #[tokio::test]
    async fn song_mode_repeats_the_front_track() {
        let session = Session::default();
        session.push_back(track("a")).await;
        session.push_back(track("b")).await;
        session.set_loop_mode(LoopMode::Song).await;

        for _ in 0..5 {
            assert_eq!(session.pop_next().await, Some(track("a")));
            assert_eq!(session.queue_len().await, 2);
        }
    }

    #[tokio::test]
    async fn queue_mode_cycles_with_period_n() {
        let session = Session::default();
        let names = ["a", "b", "c"];
        for name in names {
            session.push_back(track(name)).await;
        }
        session.set_loop_mode(LoopMode::Queue).await;

        let mut order = Vec::new();
        for _ in 0..6 {
            order.push(session.pop_next().await.unwrap().title);
            assert_eq!(session.queue_len().await, 3);
        }
        assert_eq!(order, ["a", "b", "c", "a", "b", "c"]);
    }

    #[tokio::test]
    async fn loop_mode_is_applied_at_pop_time() {
        let session = Session::default();
        session.push_back(track("a")).await;
        session.push_back(track("b")).await;

        // enqueued under NONE, popped under SONG: still reinserted
        session.set_loop_mode(LoopMode::Song).await;
        assert_eq!(session.pop_next().await, Some(track("a")));
        assert_eq!(session.queue_snapshot().await[0], track("a"));
    }

    #[tokio::test]
    async fn push_front_jumps_the_line() {
        let session = Session::default();
        session.push_back(track("rest")).await;
        session.push_front(track("first")).await;
        assert_eq!(session.pop_next().await, Some(track("first")));
    }

    #[tokio::test]
    async fn clear_reports_prior_size() {
        let session = Session::default();
        for name in ["a", "b", "c", "d"] {
            session.push_back(track(name)).await;
        }
        assert_eq!(session.clear().await, 4);
        assert_eq!(session.clear().await, 0);
    }

    #[tokio::test]
    async fn shuffle_pins_the_head_and_keeps_the_rest() {
        let session = Session::default();
        for name in ["head", "b", "c", "d", "e"] {
            session.push_back(track(name)).await;
        }

        for _ in 0..100 {
            session.shuffle().await.unwrap();
            let queue = session.queue_snapshot().await;
            assert_eq!(queue[0].title, "head");

            let mut rest: Vec<_> = queue[1..].iter().map(|t| t.title.clone()).collect();
            rest.sort();
            assert_eq!(rest, ["b", "c", "d", "e"]);
        }
    }

    #[tokio::test]
    async fn shuffle_needs_two_tracks() {
        let session = Session::default();
        assert_eq!(session.shuffle().await, Err(TooFewTracks));
        session.push_back(track("only")).await;
        assert_eq!(session.shuffle().await, Err(TooFewTracks));
        assert_eq!(session.queue_snapshot().await, vec![track("only")]);
    }

    #[tokio::test]
    async fn last_played_tracks_latest_dispatch() {
        let session = Session::default();
        assert_eq!(session.last_played().await, None);
        session.set_last_played("x".into()).await;
        session.set_last_played("y".into()).await;
        assert_eq!(session.last_played().await.as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn restore_front_reverses_a_pop_under_every_mode() {
        for mode in [LoopMode::None, LoopMode::Song, LoopMode::Queue] {
            let session = Session::default();
            for name in ["a", "b", "c"] {
                session.push_back(track(name)).await;
            }
            session.set_loop_mode(mode).await;

            let popped = session.pop_next().await.unwrap();
            session.restore_front(popped).await;

            let titles: Vec<_> = session
                .queue_snapshot()
                .await
                .iter()
                .map(|t| t.title.clone())
                .collect();
            assert_eq!(titles, ["a", "b", "c"], "mode {:?}", mode);
        }
    }

    #[tokio::test]
    async fn restore_front_keeps_tracks_enqueued_meanwhile() {
        let session = Session::default();
        session.push_back(track("a")).await;
        session.push_back(track("b")).await;
        session.set_loop_mode(LoopMode::Queue).await;

        let popped = session.pop_next().await.unwrap();
        session.push_back(track("d")).await;
        session.restore_front(popped).await;

        let titles: Vec<_> = session
            .queue_snapshot()
            .await
            .iter()
            .map(|t| t.title.clone())
            .collect();
        assert_eq!(titles, ["a", "b", "d"]);
    }

    #[tokio::test]
    async fn in_flight_dispatch_reads_as_busy() {
        let session = Session::default();
        assert!(!session.is_busy().await);

        let permit = session.dispatch.try_acquire().unwrap();
        assert!(session.is_busy().await);
        assert!(session.dispatch.try_acquire().is_none());

        drop(permit);
        assert!(!session.is_busy().await);
    }

    #[tokio::test]
    async fn stale_completion_does_not_clear_now_playing() {
        let session = Session::default();
        // nothing stored: any completion is stale
        assert!(!session.clear_now_playing(Uuid::nil()).await);
    }

    #[test]
    fn task_slot_allows_one_holder() {
        let slot = Arc::new(TaskSlot::default());
        let permit = slot.try_acquire().expect("first claim succeeds");
        assert!(slot.try_acquire().is_none());
        assert!(slot.is_running());

        drop(permit);
        assert!(!slot.is_running());
        assert!(slot.try_acquire().is_some());
    }
}
