//! Piano-roll construction.
//!
//! A piano roll is a `(time_steps, pitches)` grid with a 1 wherever a note
//! sounds. Rows discretize time at `time_div` steps per beat (score notes)
//! or per second (performance notes); columns cover a pitch range.

use ndarray::Array2;

use crate::note::Note;

/// The `(min_pitch, max_pitch)` span of a note array, or `None` when no
/// notes remain after drum removal.
pub fn pitch_range(notes: &[Note], remove_drums: bool) -> Option<(u8, u8)> {
    let mut range: Option<(u8, u8)> = None;
    for n in notes {
        if remove_drums && u32::from(n.pitch) >= 128 {
            continue;
        }
        range = Some(match range {
            None => (n.pitch, n.pitch),
            Some((lo, hi)) => (lo.min(n.pitch), hi.max(n.pitch)),
        });
    }
    range
}

/// Build a piano roll over the note array's own pitch range.
///
/// Beat-time fields are used when the first note has a non-zero beat onset
/// or duration; otherwise second-time fields are used. The grid has
/// `ceil(max_time * time_div) + 1` rows and `max_pitch - min_pitch + 1`
/// columns; every time step from `floor(onset * time_div)` through
/// `floor((onset + duration) * time_div)` inclusive is set in the note's
/// pitch column. An empty input yields an empty grid.
///
/// `remove_drums` drops notes with pitch ≥ 128; MIDI pitches are capped at
/// 127, so the flag only matters for callers that encode drums out of range.
///
/// # Example
/// ```
/// use segno::{compute_pianoroll, Note};
///
/// let notes = vec![Note::score(0.0, 1.0, 60, "s0"), Note::score(1.0, 1.0, 62, "s1")];
/// let roll = compute_pianoroll(&notes, 4, false);
/// assert_eq!(roll.ncols(), 3); // pitches 60..=62
/// assert_eq!(roll[(0, 0)], 1.0);
/// assert_eq!(roll[(0, 2)], 0.0);
/// ```
pub fn compute_pianoroll(notes: &[Note], time_div: u32, remove_drums: bool) -> Array2<f32> {
    match pitch_range(notes, remove_drums) {
        Some((min_pitch, max_pitch)) => {
            compute_pianoroll_in_range(notes, time_div, remove_drums, min_pitch, max_pitch)
        }
        None => Array2::zeros((0, 0)),
    }
}

/// Build a piano roll over an explicit pitch range.
///
/// Two rolls built over the same range have the same width and can be
/// compared column-for-column even when the underlying arrays cover
/// different pitches. Notes outside `[min_pitch, max_pitch]` are skipped.
pub fn compute_pianoroll_in_range(
    notes: &[Note],
    time_div: u32,
    remove_drums: bool,
    min_pitch: u8,
    max_pitch: u8,
) -> Array2<f32> {
    let retained: Vec<&Note> = notes
        .iter()
        .filter(|n| {
            !(remove_drums && u32::from(n.pitch) >= 128)
                && n.pitch >= min_pitch
                && n.pitch <= max_pitch
        })
        .collect();
    if retained.is_empty() {
        return Array2::zeros((0, 0));
    }

    let use_beat_time = retained[0].onset_beat != 0.0 || retained[0].duration_beat != 0.0;
    let onset = |n: &Note| if use_beat_time { n.onset_beat } else { n.onset_sec };
    let duration = |n: &Note| {
        if use_beat_time {
            n.duration_beat
        } else {
            n.duration_sec
        }
    };

    let mut max_time = 0.0f32;
    for n in &retained {
        max_time = max_time.max(onset(n) + duration(n));
    }

    let time_steps = (max_time * time_div as f32).ceil() as usize + 1;
    let pitches = (max_pitch - min_pitch) as usize + 1;
    let mut roll = Array2::zeros((time_steps, pitches));

    for n in &retained {
        let start = (onset(n) * time_div as f32).floor() as usize;
        let end = ((onset(n) + duration(n)) * time_div as f32).floor() as usize;
        let col = (n.pitch - min_pitch) as usize;
        for t in start..=end.min(time_steps - 1) {
            roll[(t, col)] = 1.0;
        }
    }

    roll
}
