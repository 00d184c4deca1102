//! The end-to-end alignment pipeline.

use std::time::Instant;

use log::debug;
use rand::Rng;

use crate::align::greedy::simple_match;
use crate::align::mend::mend_alignments;
use crate::align::sequence::sequence_greedy_match_with_rng;
use crate::align::times::{alignment_times_from_dtw, TimeAlignment};
use crate::align::windows::cut_note_arrays;
use crate::note::{AlignmentRecord, Note};
use crate::{Error, Result};

/// Node length (beats) of the initial coarse DTW pass.
///
/// The coarse pass always runs at this span; `score_fine_node_length`
/// only drives the per-window fine passes.
pub const COARSE_NODE_LENGTH: f32 = 4.0;

const MAX_TRAVERSAL_DEPTH: usize = 150;

/// Per-window matching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentType {
    /// Fine DTW per window feeding the onset-aware matcher.
    #[default]
    Dtw,
    /// Feed each window only its coarse interval endpoints.
    Linear,
    /// Pitch-only greedy matching, no onset information.
    Greedy,
}

impl From<&str> for AlignmentType {
    /// `"dtw"`, `"linear"` and `"greedy"` select the matching variants;
    /// any other name falls back to `Linear` so string-typed
    /// configurations never fail to resolve.
    fn from(name: &str) -> Self {
        match name {
            "dtw" => AlignmentType::Dtw,
            "greedy" => AlignmentType::Greedy,
            _ => AlignmentType::Linear,
        }
    }
}

/// Tunables of [`AutomaticNoteMatcher`].
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub alignment_type: AlignmentType,
    /// Node spacing (beats) of the per-window fine DTW pass.
    pub score_fine_node_length: f32,
    /// Piano-roll steps per beat for the score.
    pub s_time_div: u32,
    /// Piano-roll steps per second for the performance.
    pub p_time_div: u32,
    /// Window overlap margin in score beats.
    pub sfuzziness: f32,
    /// Window overlap margin in performance seconds.
    pub pfuzziness: f32,
    /// Coarse intervals per window.
    pub window_size: usize,
    /// Scale `pfuzziness` by the window's local tempo ratio.
    pub pfuzziness_relative_to_tempo: bool,
    /// Subtract the optimal mean shift in the omission objective.
    pub shift_onsets: bool,
    /// Budget of the per-pitch omission search before random sampling.
    pub cap_combinations: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            alignment_type: AlignmentType::Dtw,
            score_fine_node_length: 0.25,
            s_time_div: 16,
            p_time_div: 16,
            sfuzziness: 4.0,
            pfuzziness: 4.0,
            window_size: 1,
            pfuzziness_relative_to_tempo: true,
            shift_onsets: false,
            cap_combinations: 10_000,
        }
    }
}

impl MatcherConfig {
    /// Check every numeric field against its valid range.
    pub fn validate(&self) -> Result<()> {
        if !(self.score_fine_node_length > 0.0) {
            return Err(Error::MalformedConfig {
                name: "score_fine_node_length",
                value: self.score_fine_node_length.to_string(),
                reason: "must be positive",
            });
        }
        if self.s_time_div == 0 {
            return Err(Error::MalformedConfig {
                name: "s_time_div",
                value: self.s_time_div.to_string(),
                reason: "must be positive",
            });
        }
        if self.p_time_div == 0 {
            return Err(Error::MalformedConfig {
                name: "p_time_div",
                value: self.p_time_div.to_string(),
                reason: "must be positive",
            });
        }
        if !(self.sfuzziness >= 0.0) {
            return Err(Error::MalformedConfig {
                name: "sfuzziness",
                value: self.sfuzziness.to_string(),
                reason: "must be non-negative",
            });
        }
        if !(self.pfuzziness >= 0.0) {
            return Err(Error::MalformedConfig {
                name: "pfuzziness",
                value: self.pfuzziness.to_string(),
                reason: "must be non-negative",
            });
        }
        if self.window_size < 1 {
            return Err(Error::MalformedConfig {
                name: "window_size",
                value: self.window_size.to_string(),
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// The multi-stage score-to-performance aligner.
///
/// Runs coarse piano-roll DTW, cuts both note arrays into overlapping
/// windows around the resulting time map, matches each window with the
/// configured strategy, and mends the windowed decisions into one global
/// alignment.
///
/// # Example
/// ```
/// use segno::{AutomaticNoteMatcher, Label, Note};
///
/// let score: Vec<Note> = (0..4)
///     .map(|i| Note::score(i as f32 * 0.5, 0.4, 60 + 2 * i as u8, &format!("s{i}")))
///     .collect();
/// let performance: Vec<Note> = (0..4)
///     .map(|i| Note::performance(i as f32 * 0.6, 0.4, 60 + 2 * i as u8, 70, &format!("p{i}")))
///     .collect();
///
/// let matcher = AutomaticNoteMatcher::with_defaults();
/// let alignment = matcher.align(&score, &performance).unwrap();
/// assert!(alignment.iter().all(|r| r.label() == Label::Match));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomaticNoteMatcher {
    config: MatcherConfig,
}

impl AutomaticNoteMatcher {
    /// Build a matcher with the given configuration.
    pub fn new(config: MatcherConfig) -> Self {
        AutomaticNoteMatcher { config }
    }

    /// Build a matcher with the default configuration.
    pub fn with_defaults() -> Self {
        AutomaticNoteMatcher::default()
    }

    /// The active configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Align a score against a performance.
    ///
    /// One empty side yields the all-DELETION or all-INSERTION alignment
    /// without error. Configuration problems surface as
    /// [`Error::MalformedConfig`] before any work is done.
    pub fn align(
        &self,
        score_notes: &[Note],
        performance_notes: &[Note],
    ) -> Result<Vec<AlignmentRecord>> {
        self.align_with_rng(score_notes, performance_notes, &mut rand::thread_rng())
    }

    /// [`align`](Self::align) with a caller-supplied RNG, so the random
    /// sampling inside the combinatorial search is reproducible.
    pub fn align_with_rng<R: Rng>(
        &self,
        score_notes: &[Note],
        performance_notes: &[Note],
        rng: &mut R,
    ) -> Result<Vec<AlignmentRecord>> {
        self.config.validate()?;

        if score_notes.is_empty() {
            return Ok(performance_notes
                .iter()
                .map(|n| AlignmentRecord::inserted(&n.id))
                .collect());
        }
        if performance_notes.is_empty() {
            return Ok(score_notes
                .iter()
                .map(|n| AlignmentRecord::deleted(&n.id))
                .collect());
        }

        let stage = Instant::now();
        let coarse_times = alignment_times_from_dtw(
            score_notes,
            performance_notes,
            COARSE_NODE_LENGTH,
            self.config.s_time_div,
            self.config.p_time_div,
        )?;
        debug!(
            "coarse dtw pass: {:.3}s, {} nodes",
            stage.elapsed().as_secs_f64(),
            coarse_times.len()
        );

        let stage = Instant::now();
        let windows = cut_note_arrays(
            score_notes,
            performance_notes,
            &coarse_times,
            self.config.sfuzziness,
            self.config.pfuzziness,
            self.config.window_size,
            self.config.pfuzziness_relative_to_tempo,
        );
        debug!(
            "cutting: {:.3}s, {} windows",
            stage.elapsed().as_secs_f64(),
            windows.len()
        );

        let stage = Instant::now();
        let mut window_alignments = Vec::with_capacity(windows.len());
        for (window_id, window) in windows.iter().enumerate() {
            let window_filled = !window.score.is_empty() && !window.performance.is_empty();
            let alignment = match self.config.alignment_type {
                AlignmentType::Greedy => simple_match(&window.score, &window.performance),
                AlignmentType::Dtw if window_filled => {
                    let fine_times = alignment_times_from_dtw(
                        &window.score,
                        &window.performance,
                        self.config.score_fine_node_length,
                        self.config.s_time_div,
                        self.config.p_time_div,
                    )?;
                    sequence_greedy_match_with_rng(
                        &window.score,
                        &window.performance,
                        &fine_times,
                        self.config.shift_onsets,
                        self.config.cap_combinations,
                        rng,
                    )
                }
                AlignmentType::Dtw | AlignmentType::Linear => sequence_greedy_match_with_rng(
                    &window.score,
                    &window.performance,
                    &self.window_endpoints(&coarse_times, window_id),
                    self.config.shift_onsets,
                    self.config.cap_combinations,
                    rng,
                ),
            };
            window_alignments.push(alignment);
        }
        debug!(
            "windowed matching: {:.3}s",
            stage.elapsed().as_secs_f64()
        );

        let stage = Instant::now();
        let alignment = mend_alignments(
            &window_alignments,
            score_notes,
            performance_notes,
            &coarse_times,
            MAX_TRAVERSAL_DEPTH,
        );
        debug!("mending: {:.3}s", stage.elapsed().as_secs_f64());

        Ok(alignment)
    }

    /// The coarse nodes bounding window `window_id`, or whatever nodes
    /// exist when there were too few to cut real windows.
    fn window_endpoints(
        &self,
        coarse_times: &[TimeAlignment],
        window_id: usize,
    ) -> Vec<TimeAlignment> {
        let last = window_id + self.config.window_size;
        if last < coarse_times.len() {
            vec![coarse_times[window_id], coarse_times[last]]
        } else {
            coarse_times.to_vec()
        }
    }
}
