//! Note records and alignment labels.
//!
//! A [`Note`] carries both time interpretations used by the aligner: a
//! score-time pair (onset and duration in beats) and a performance-time pair
//! (onset and duration in seconds, plus key velocity). A score note array
//! populates the beat fields; a performance note array populates the second
//! fields. Identifiers are the external contract: they must be non-empty and
//! unique within their array.

/// A single musical note.
///
/// Construct score notes with [`Note::score`] and performance notes with
/// [`Note::performance`]. The remaining fields (quarters, ticks, channel,
/// voice, divisions per quarter) are carried for callers that have them but
/// are not consulted by the aligner.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub onset_beat: f32,
    pub duration_beat: f32,
    pub onset_quarter: f32,
    pub duration_quarter: f32,
    pub onset_sec: f32,
    pub duration_sec: f32,
    pub onset_tick: i32,
    pub duration_tick: i32,
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
    pub voice: u8,
    pub divs_pq: u32,
    pub id: String,
}

impl Default for Note {
    fn default() -> Self {
        Note {
            onset_beat: 0.0,
            duration_beat: 0.0,
            onset_quarter: 0.0,
            duration_quarter: 0.0,
            onset_sec: 0.0,
            duration_sec: 0.0,
            onset_tick: 0,
            duration_tick: 0,
            pitch: 0,
            velocity: 0,
            channel: 0,
            voice: 0,
            divs_pq: 16,
            id: String::new(),
        }
    }
}

impl Note {
    /// Create a score note from beat-time fields.
    ///
    /// # Example
    /// ```
    /// use segno::Note;
    ///
    /// let n = Note::score(1.5, 0.5, 60, "s3");
    /// assert_eq!(n.pitch, 60);
    /// assert_eq!(n.onset_beat, 1.5);
    /// ```
    pub fn score(onset_beat: f32, duration_beat: f32, pitch: u8, id: &str) -> Self {
        Note {
            onset_beat,
            duration_beat,
            pitch,
            id: id.to_string(),
            ..Note::default()
        }
    }

    /// Create a performance note from second-time fields.
    ///
    /// # Example
    /// ```
    /// use segno::Note;
    ///
    /// let n = Note::performance(0.52, 0.4, 60, 72, "p3");
    /// assert_eq!(n.velocity, 72);
    /// assert_eq!(n.onset_sec, 0.52);
    /// ```
    pub fn performance(
        onset_sec: f32,
        duration_sec: f32,
        pitch: u8,
        velocity: u8,
        id: &str,
    ) -> Self {
        Note {
            onset_sec,
            duration_sec,
            pitch,
            velocity,
            id: id.to_string(),
            ..Note::default()
        }
    }
}

/// Collect the distinct pitches of a note array, ascending.
pub fn unique_pitches(notes: &[Note]) -> Vec<u8> {
    let mut pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();
    pitches.sort_unstable();
    pitches.dedup();
    pitches
}

/// Select the notes of a single pitch, preserving input order.
pub fn filter_by_pitch(notes: &[Note], pitch: u8) -> Vec<Note> {
    notes.iter().filter(|n| n.pitch == pitch).cloned().collect()
}

/// Score-side onset times (beats), in input order.
pub fn onset_times_beat(notes: &[Note]) -> Vec<f32> {
    notes.iter().map(|n| n.onset_beat).collect()
}

/// Performance-side onset times (seconds), in input order.
pub fn onset_times_sec(notes: &[Note]) -> Vec<f32> {
    notes.iter().map(|n| n.onset_sec).collect()
}

/// Discriminant of an [`AlignmentRecord`], used to filter evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Match,
    Deletion,
    Insertion,
}

/// One decision of the aligner.
///
/// A full alignment contains every score id exactly once (as `Match` or
/// `Deletion`) and every performance id exactly once (as `Match` or
/// `Insertion`); matched notes always share a pitch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentRecord {
    /// A score note was played: both ids refer to the same sounding note.
    Match {
        score_id: String,
        performance_id: String,
    },
    /// A score note was not played.
    Deletion { score_id: String },
    /// A performance note has no counterpart in the score.
    Insertion { performance_id: String },
}

impl AlignmentRecord {
    /// Convenience constructor for a match record.
    pub fn matched(score_id: &str, performance_id: &str) -> Self {
        AlignmentRecord::Match {
            score_id: score_id.to_string(),
            performance_id: performance_id.to_string(),
        }
    }

    /// Convenience constructor for a deletion record.
    pub fn deleted(score_id: &str) -> Self {
        AlignmentRecord::Deletion {
            score_id: score_id.to_string(),
        }
    }

    /// Convenience constructor for an insertion record.
    pub fn inserted(performance_id: &str) -> Self {
        AlignmentRecord::Insertion {
            performance_id: performance_id.to_string(),
        }
    }

    /// The record's label.
    pub fn label(&self) -> Label {
        match self {
            AlignmentRecord::Match { .. } => Label::Match,
            AlignmentRecord::Deletion { .. } => Label::Deletion,
            AlignmentRecord::Insertion { .. } => Label::Insertion,
        }
    }

    /// The score id, if the record carries one.
    pub fn score_id(&self) -> Option<&str> {
        match self {
            AlignmentRecord::Match { score_id, .. } => Some(score_id),
            AlignmentRecord::Deletion { score_id } => Some(score_id),
            AlignmentRecord::Insertion { .. } => None,
        }
    }

    /// The performance id, if the record carries one.
    pub fn performance_id(&self) -> Option<&str> {
        match self {
            AlignmentRecord::Match { performance_id, .. } => Some(performance_id),
            AlignmentRecord::Insertion { performance_id } => Some(performance_id),
            AlignmentRecord::Deletion { .. } => None,
        }
    }
}
