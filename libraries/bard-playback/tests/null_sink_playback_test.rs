//! Sequencer driven by the null-sink session
//!
//! Completions come from the session's own timer task instead of the test,
//! on a paused clock.

mod common;

use bard_core::GuildId;
use bard_media::{LocalVoiceConnections, NullSinkSession};
use bard_playback::{PlaybackQueueManager, PlayerStatus};
use common::{FakeResolver, RecordingNotifier, CHANNEL};
use std::sync::Arc;
use std::time::Duration;

const GUILD: GuildId = GuildId::new(3);

fn setup() -> (
    PlaybackQueueManager,
    Arc<LocalVoiceConnections>,
    Arc<RecordingNotifier>,
) {
    let connections = Arc::new(LocalVoiceConnections::new(|_guild| {
        Arc::new(NullSinkSession::new(Duration::from_secs(60)))
    }));
    let notifier = RecordingNotifier::new();
    let manager =
        PlaybackQueueManager::new(FakeResolver::new(), connections.clone(), notifier.clone());
    (manager, connections, notifier)
}

#[tokio::test(start_paused = true)]
async fn test_tracks_advance_on_their_own() {
    let (manager, connections, notifier) = setup();
    connections.connect(GUILD);

    for query in ["a", "b", "c"] {
        manager.enqueue(GUILD, query, CHANNEL).await.unwrap();
    }

    tokio::time::sleep(Duration::from_secs(61)).await;
    let snapshot = manager.peek(GUILD).await.unwrap();
    assert_eq!(snapshot.current.as_ref().unwrap().track.title, "b");

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(manager.peek(GUILD).await.unwrap().is_idle());
    assert_eq!(notifier.now_playing_titles(GUILD), vec!["a", "b", "c"]);
}

#[tokio::test(start_paused = true)]
async fn test_paused_track_holds_the_queue() {
    let (manager, connections, _notifier) = setup();
    connections.connect(GUILD);

    manager.enqueue(GUILD, "a", CHANNEL).await.unwrap();
    manager.enqueue(GUILD, "b", CHANNEL).await.unwrap();

    tokio::time::sleep(Duration::from_secs(30)).await;
    manager.pause(GUILD, CHANNEL).await.unwrap();

    tokio::time::sleep(Duration::from_secs(600)).await;
    let snapshot = manager.peek(GUILD).await.unwrap();
    assert_eq!(snapshot.status(), PlayerStatus::Paused);
    assert_eq!(snapshot.current.as_ref().unwrap().track.title, "a");

    manager.resume(GUILD, CHANNEL).await.unwrap();
    tokio::time::sleep(Duration::from_secs(31)).await;
    let snapshot = manager.peek(GUILD).await.unwrap();
    assert_eq!(snapshot.current.as_ref().unwrap().track.title, "b");
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_leaves_and_next_play_needs_a_new_join() {
    let (manager, connections, notifier) = setup();
    connections.connect(GUILD);

    manager.enqueue(GUILD, "a", CHANNEL).await.unwrap();
    manager.disconnect(GUILD, CHANNEL).await.unwrap();
    assert!(!connections.is_connected(GUILD));

    // Late timer expiry must not revive anything
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(manager.peek(GUILD).await.unwrap().is_idle());

    connections.connect(GUILD);
    manager.enqueue(GUILD, "b", CHANNEL).await.unwrap();
    assert_eq!(notifier.now_playing_titles(GUILD), vec!["a", "b"]);
}
