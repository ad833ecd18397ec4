//! Property-based tests for the playback sequencer
//!
//! Random sequences of enqueues, completions, skips and failures against a
//! single guild. Whatever the interleaving, tracks play in enqueue order and
//! the pending queue is always the unplayed tail of that order.

mod common;

use common::{harness, CHANNEL, GUILD};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Enqueue,
    EnqueueBad,
    Finish,
    Fail,
    Skip,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Enqueue),
        1 => Just(Op::EnqueueBad),
        2 => Just(Op::Finish),
        1 => Just(Op::Fail),
        1 => Just(Op::Skip),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: played titles followed by pending queries reproduce the
    /// successful enqueue order, and `current` tracks the session exactly
    #[test]
    fn pending_is_suffix_of_enqueue_order(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        runtime().block_on(async {
            let h = harness();
            let session = h.connections.connect(GUILD);

            let mut enqueued = Vec::new();
            for (i, op) in ops.into_iter().enumerate() {
                match op {
                    Op::Enqueue => {
                        let query = format!("track-{}", i);
                        h.manager.enqueue(GUILD, query.clone(), CHANNEL).await.unwrap();
                        enqueued.push(query);
                    }
                    Op::EnqueueBad => {
                        h.manager.enqueue(GUILD, format!("bad-{}", i), CHANNEL).await.unwrap();
                    }
                    Op::Finish => {
                        if session.is_playing() {
                            session.finish_current();
                        }
                    }
                    Op::Fail => {
                        if session.is_playing() {
                            session.fail_current("decoder error");
                        }
                    }
                    Op::Skip => {
                        h.manager.skip(GUILD, CHANNEL).await.ok();
                    }
                }

                let snapshot = h.manager.peek(GUILD).await.unwrap();
                prop_assert_eq!(snapshot.current.is_some(), session.is_playing());

                let good_pending: Vec<String> = snapshot
                    .pending_queries()
                    .into_iter()
                    .filter(|q| !q.starts_with("bad"))
                    .map(str::to_string)
                    .collect();
                let mut seen = h.notifier.now_playing_titles(GUILD);
                seen.extend(good_pending);
                prop_assert_eq!(&seen, &enqueued);

                // A pending entry never sits behind an empty now-playing slot
                prop_assert!(snapshot.current.is_some() || snapshot.pending.is_empty());
            }
            Ok(())
        })?;
    }

    /// Property: enough completions always bring the guild back to idle
    #[test]
    fn completions_always_reach_idle(count in 1usize..30, bad_every in 2usize..6) {
        runtime().block_on(async {
            let h = harness();
            let session = h.connections.connect(GUILD);

            for i in 0..count {
                let query = if i % bad_every == 0 {
                    format!("bad-{}", i)
                } else {
                    format!("track-{}", i)
                };
                h.manager.enqueue(GUILD, query, CHANNEL).await.unwrap();
            }

            for _ in 0..count {
                if !session.is_playing() {
                    break;
                }
                session.finish_current();
                h.manager.peek(GUILD).await.unwrap();
            }

            let snapshot = h.manager.peek(GUILD).await.unwrap();
            prop_assert!(snapshot.is_idle());

            let bad = (0..count).filter(|i| i % bad_every == 0).count();
            prop_assert_eq!(h.notifier.error_count(GUILD), bad);
            prop_assert_eq!(h.notifier.now_playing_titles(GUILD).len(), count - bad);
            Ok(())
        })?;
    }
}
