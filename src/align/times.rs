//! Coarse score-time ↔ performance-time map from piano-roll DTW.

use crate::dtw::dtw;
use crate::metrics::Euclidean;
use crate::note::Note;
use crate::pianoroll::{compute_pianoroll_in_range, pitch_range};
use crate::{Error, Result};

/// One node of the score-time ↔ performance-time map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAlignment {
    pub score_time: f32,
    pub performance_time: f32,
}

/// Align score and performance piano rolls with DTW and convert the warping
/// path into `(score_time, performance_time)` nodes.
///
/// Both rolls are built over the union of the two pitch ranges so their
/// pitch vectors are comparable, then transposed to `(pitch, time)` so the
/// path steps through time with pitch vectors as features; the performance
/// roll is binarized first. Path steps `(r, c)` become
/// `(r / s_time_div, c / p_time_div)`; the node list is sorted by score
/// time and deduplicated at 1e-6.
///
/// `node_length` is reserved for node-list thinning and does not affect
/// the returned path.
///
/// # Errors
/// [`Error::EmptyInput`] when either side is empty.
pub fn alignment_times_from_dtw(
    score_notes: &[Note],
    performance_notes: &[Note],
    _node_length: f32,
    s_time_div: u32,
    p_time_div: u32,
) -> Result<Vec<TimeAlignment>> {
    let (min_pitch, max_pitch) = match (
        pitch_range(score_notes, false),
        pitch_range(performance_notes, false),
    ) {
        (Some((slo, shi)), Some((plo, phi))) => (slo.min(plo), shi.max(phi)),
        _ => return Err(Error::EmptyInput("piano roll")),
    };

    let s_roll = compute_pianoroll_in_range(score_notes, s_time_div, false, min_pitch, max_pitch);
    let mut p_roll =
        compute_pianoroll_in_range(performance_notes, p_time_div, false, min_pitch, max_pitch);
    p_roll.mapv_inplace(|v| if v > 0.0 { 1.0 } else { 0.0 });

    // (time, pitch) -> (pitch, time): DTW walks the time axis
    let s_features = s_roll.reversed_axes();
    let p_features = p_roll.reversed_axes();

    let result = dtw(&s_features, &p_features, &Euclidean)?;

    let mut times: Vec<TimeAlignment> = result
        .path
        .iter()
        .map(|&(r, c)| TimeAlignment {
            score_time: r as f32 / s_time_div as f32,
            performance_time: c as f32 / p_time_div as f32,
        })
        .collect();

    times.sort_by(|a, b| a.score_time.total_cmp(&b.score_time));

    let mut deduped: Vec<TimeAlignment> = Vec::with_capacity(times.len());
    for t in times {
        match deduped.last() {
            Some(last) if (t.score_time - last.score_time).abs() < 1e-6 => {}
            _ => deduped.push(t),
        }
    }
    Ok(deduped)
}
