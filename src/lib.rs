//! Symbolic score-to-performance note alignment for Rust.
//!
//! Segno aligns a notated score (onsets in beats) against a recorded
//! performance of it (onsets in seconds): every score note is resolved to a
//! performed note of the same pitch or marked as a deletion, and every
//! performed note without a counterpart is flagged as an insertion. The
//! result is a flat list of alignment records over stable note ids.
//!
//! # Pipeline
//!
//! 1. Both note arrays become piano rolls, and dynamic time warping over
//!    the rolls yields a coarse score-time ↔ performance-time map.
//! 2. The note arrays are cut into overlapping windows around that map.
//! 3. Each window is matched per pitch on interpolated onset times, with a
//!    combinatorial omission search absorbing extra or missing notes.
//! 4. The overlapping window decisions are mended into one global,
//!    conflict-free alignment.
//!
//! # Quick Start
//!
//! ```rust
//! use segno::{AutomaticNoteMatcher, Label, Note};
//!
//! let score: Vec<Note> = (0..4)
//!     .map(|i| Note::score(i as f32 * 0.5, 0.4, 60 + 2 * i as u8, &format!("s{i}")))
//!     .collect();
//! let performance: Vec<Note> = (0..4)
//!     .map(|i| Note::performance(i as f32 * 0.6, 0.4, 60 + 2 * i as u8, 70, &format!("p{i}")))
//!     .collect();
//!
//! let matcher = AutomaticNoteMatcher::with_defaults();
//! let alignment = matcher.align(&score, &performance).unwrap();
//! assert_eq!(alignment.iter().filter(|r| r.label() == Label::Match).count(), 4);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`note`] | Note records, note-array helpers, alignment records |
//! | [`pianoroll`] | Note array → time×pitch grid |
//! | [`metrics`] | Feature-vector distances (Euclidean, cosine) |
//! | [`dtw`] | Classic and weighted-step dynamic time warping |
//! | [`interpolate`] | Piecewise-linear time maps |
//! | [`align`] | Windowing, per-window matching, mending, the pipeline |
//! | [`evaluate`] | Precision/recall/F-score over alignment labels |
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. The [`Error`] enum covers shape
//! mismatches, empty inputs, invalid interpolation domains, and malformed
//! configuration. A one-sided alignment (empty score or empty performance)
//! is not an error: it yields the all-insertions or all-deletions result.
//!
//! # Safety
//!
//! This crate uses `#![forbid(unsafe_code)]` — no unsafe Rust anywhere.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod align;
pub mod dtw;
pub mod evaluate;
pub mod interpolate;
pub mod metrics;
pub mod note;
pub mod pianoroll;

pub use align::{
    alignment_times_from_dtw, cut_note_arrays, mend_alignments, sequence_greedy_match,
    sequence_greedy_match_with_rng, simple_match, AlignmentType, AutomaticNoteMatcher,
    MatcherConfig, TimeAlignment, Window, COARSE_NODE_LENGTH,
};
pub use evaluate::{fscore_alignments, fscore_matches, FScore};
pub use interpolate::LinearInterpolator;
pub use note::{AlignmentRecord, Label, Note};
pub use pianoroll::{compute_pianoroll, compute_pianoroll_in_range, pitch_range};
