use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use experience::{merge_batch, Episode, ExperienceRecorder, SnapshotPersistance, ValueStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn recorder(dir: &Path, worker_id: &str) -> ExperienceRecorder {
    let snapshots = SnapshotPersistance::new(dir.join("q"), worker_id.to_string()).unwrap();
    ExperienceRecorder::new(dir.join("q").join("q.json"), snapshots)
}

fn play(episode: &mut Episode, moves: &[(&str, &str)]) {
    for (action_key, state_key) in moves {
        episode
            .record_move(action_key.to_string(), state_key.to_string())
            .unwrap();
    }
}

const MOVES: [(&str, &str); 4] = [("7", "s0"), ("13", "s1"), ("4", "s2"), ("10", "s3")];

#[test]
fn win_then_loss_on_merged_pairs_returns_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().join("q").join("q.json");
    let recorder = recorder(dir.path(), "worker");
    let mut rng = StdRng::seed_from_u64(3);

    let mut episode = Episode::new();
    play(&mut episode, &MOVES);
    recorder.record_result(&mut episode, true).unwrap();
    merge_batch(&canonical, &dir.path().join("q"), 10, &mut rng).unwrap();

    let store = ValueStore::load(&canonical).unwrap();
    for (action_key, state_key) in MOVES {
        assert_eq!(store.get(state_key, action_key, 0.1), 0.01);
    }

    play(&mut episode, &MOVES);
    recorder.record_result(&mut episode, false).unwrap();
    merge_batch(&canonical, &dir.path().join("q"), 10, &mut rng).unwrap();

    // The loss snapshot holds 0.0 and the canonical store holds 0.01, which average to 0.005.
    let store = ValueStore::load(&canonical).unwrap();
    for (action_key, state_key) in MOVES {
        assert!((store.get(state_key, action_key, 0.1) - 0.005).abs() < 1e-6);
    }
}

#[test]
fn loss_snapshot_holds_zero_for_previously_won_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().join("q").join("q.json");
    let recorder = recorder(dir.path(), "worker");
    let mut rng = StdRng::seed_from_u64(3);

    let mut episode = Episode::new();
    play(&mut episode, &MOVES);
    recorder.record_result(&mut episode, true).unwrap();
    merge_batch(&canonical, &dir.path().join("q"), 10, &mut rng).unwrap();

    play(&mut episode, &MOVES);
    let snapshot = recorder.record_result(&mut episode, false).unwrap().unwrap();

    let store = ValueStore::load(snapshot).unwrap();
    for (action_key, state_key) in MOVES {
        assert_eq!(store.get(state_key, action_key, 0.1), 0.0);
    }
}

#[test]
fn short_history_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().join("q").join("q.json");
    let recorder = recorder(dir.path(), "worker");
    let mut rng = StdRng::seed_from_u64(3);

    for win in [true, false] {
        let mut episode = Episode::new();
        play(&mut episode, &MOVES[..2]);

        assert!(recorder.record_result(&mut episode, win).unwrap().is_none());
    }

    let report = merge_batch(&canonical, &dir.path().join("q"), 10, &mut rng).unwrap();

    assert_eq!(report.selected, 0);
    assert!(ValueStore::load(&canonical).unwrap().is_empty());
}

#[test]
fn concurrent_workers_and_merges_never_expose_partial_store() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let canonical = root.join("q").join("q.json");
    let done = Arc::new(AtomicBool::new(false));

    let workers = (0..4)
        .map(|worker| {
            let root = root.clone();
            thread::spawn(move || {
                let recorder = recorder(&root, &format!("worker-{}", worker));
                for game in 0..10 {
                    let mut episode = Episode::new();
                    for ply in 0..5 {
                        episode
                            .record_move(format!("a{}", ply), format!("w{}-g{}-p{}", worker, game, ply))
                            .unwrap();
                    }
                    recorder.record_result(&mut episode, game % 2 == 0).unwrap();
                }
            })
        })
        .collect::<Vec<_>>();

    let reader = {
        let canonical = canonical.clone();
        let done = done.clone();
        thread::spawn(move || {
            while !done.load(Ordering::SeqCst) {
                ValueStore::load(&canonical).expect("canonical store must always parse");
            }
        })
    };

    let mut rng = StdRng::seed_from_u64(11);
    let snapshot_dir = root.join("q");
    while workers.iter().any(|w| !w.is_finished()) {
        merge_batch(&canonical, &snapshot_dir, 3, &mut rng).unwrap();
    }

    for worker in workers {
        worker.join().unwrap();
    }

    while merge_batch(&canonical, &snapshot_dir, 3, &mut rng).unwrap().selected > 0 {}

    done.store(true, Ordering::SeqCst);
    reader.join().unwrap();

    let store = ValueStore::load(&canonical).unwrap();
    assert_eq!(store.len(), 4 * 10 * 5);
    for value in store.values() {
        assert!(value == 0.01 || value == -0.01);
    }
}
