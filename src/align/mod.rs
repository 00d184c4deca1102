mod greedy;
mod matcher;
mod mend;
mod sequence;
mod times;
mod windows;

// Coarse score-time <-> performance-time map
pub use times::{alignment_times_from_dtw, TimeAlignment};

// Window cutting around alignment nodes
pub use windows::{cut_note_arrays, Window};

// Matchers: pitch-only fallback and the onset-aware per-window routine
pub use greedy::simple_match;
pub use sequence::{sequence_greedy_match, sequence_greedy_match_with_rng};

// Cross-window conflict resolution
pub use mend::mend_alignments;

// Pipeline
pub use matcher::{AlignmentType, AutomaticNoteMatcher, MatcherConfig, COARSE_NODE_LENGTH};
