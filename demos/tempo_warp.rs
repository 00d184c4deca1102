//! Tempo Warp Example
//!
//! Shows the coarse DTW time map on a performance that accelerates and
//! then settles, and the alignment built on top of it.

use log::info;
use segno::{alignment_times_from_dtw, AutomaticNoteMatcher, Note, COARSE_NODE_LENGTH};

fn main() {
    env_logger::init();
    info!("Tempo Warp Example");

    // One note per beat in the score; the performance rushes the first
    // two beats and then holds a steady one-second beat
    let perf_onsets = [0.0f32, 0.5, 1.0, 2.0, 3.0];
    let score: Vec<Note> = (0..5)
        .map(|i| Note::score(i as f32, 0.5, 60 + 3 * i as u8, &format!("s{i}")))
        .collect();
    let performance: Vec<Note> = perf_onsets
        .iter()
        .enumerate()
        .map(|(i, &t)| Note::performance(t, 0.4, 60 + 3 * i as u8, 70, &format!("p{i}")))
        .collect();

    let times = alignment_times_from_dtw(&score, &performance, COARSE_NODE_LENGTH, 16, 16).unwrap();
    info!("Coarse time map: {} nodes", times.len());
    for node in times.iter().take(10) {
        info!(
            "  beat {:.3} -> {:.3}s",
            node.score_time, node.performance_time
        );
    }

    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();

    info!("Alignment ({} records):", alignment.len());
    for record in &alignment {
        info!("  {record:?}");
    }
}
