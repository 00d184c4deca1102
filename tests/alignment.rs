use segno::{
    fscore_matches, AlignmentRecord, AutomaticNoteMatcher, Label, MatcherConfig, Note,
    COARSE_NODE_LENGTH,
};

const SCALE_PITCHES: [u8; 8] = [60, 62, 64, 65, 67, 69, 71, 72];

fn scale_score() -> Vec<Note> {
    SCALE_PITCHES
        .iter()
        .enumerate()
        .map(|(i, &p)| Note::score(i as f32 * 0.5, 0.4, p, &format!("s{i}")))
        .collect()
}

fn scale_performance() -> Vec<Note> {
    SCALE_PITCHES
        .iter()
        .enumerate()
        .map(|(i, &p)| Note::performance(i as f32 * 0.6, 0.4, p, 70, &format!("p{i}")))
        .collect()
}

fn count_label(alignment: &[AlignmentRecord], label: Label) -> usize {
    alignment.iter().filter(|r| r.label() == label).count()
}

fn assert_uniqueness(alignment: &[AlignmentRecord], score: &[Note], performance: &[Note]) {
    for n in score {
        let occurrences = alignment
            .iter()
            .filter(|r| r.score_id() == Some(n.id.as_str()))
            .count();
        assert_eq!(occurrences, 1, "score id {} appears {occurrences} times", n.id);
    }
    for n in performance {
        let occurrences = alignment
            .iter()
            .filter(|r| r.performance_id() == Some(n.id.as_str()))
            .count();
        assert_eq!(occurrences, 1, "perf id {} appears {occurrences} times", n.id);
    }
    assert_eq!(
        count_label(alignment, Label::Match) + count_label(alignment, Label::Deletion),
        score.len()
    );
    assert_eq!(
        count_label(alignment, Label::Match) + count_label(alignment, Label::Insertion),
        performance.len()
    );
}

fn assert_matches_share_pitch(alignment: &[AlignmentRecord], score: &[Note], performance: &[Note]) {
    for record in alignment {
        if let AlignmentRecord::Match {
            score_id,
            performance_id,
        } = record
        {
            let s = score.iter().find(|n| &n.id == score_id).expect("known score id");
            let p = performance
                .iter()
                .find(|n| &n.id == performance_id)
                .expect("known performance id");
            assert_eq!(s.pitch, p.pitch, "match {score_id}/{performance_id}");
        }
    }
}

#[test]
fn perfect_scale_is_fully_matched() {
    let score = scale_score();
    let performance = scale_performance();
    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();

    assert_eq!(alignment.len(), 8);
    for i in 0..8 {
        assert!(
            alignment.contains(&AlignmentRecord::matched(&format!("s{i}"), &format!("p{i}"))),
            "missing match s{i}/p{i} in {alignment:?}"
        );
    }
    assert_uniqueness(&alignment, &score, &performance);
}

#[test]
fn extra_performance_note_flagged_as_insertion() {
    let score = scale_score();
    let mut performance = scale_performance();
    performance.insert(3, Note::performance(1.0, 0.4, 64, 70, "px"));

    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();

    assert_eq!(count_label(&alignment, Label::Match), 8);
    assert_eq!(count_label(&alignment, Label::Insertion), 1);
    assert_eq!(count_label(&alignment, Label::Deletion), 0);
    assert_uniqueness(&alignment, &score, &performance);
    assert_matches_share_pitch(&alignment, &score, &performance);

    // the leftover note is one of the two pitch-64 performance notes; the
    // piano roll cannot tell them apart once their activity overlaps
    let inserted = alignment
        .iter()
        .find(|r| r.label() == Label::Insertion)
        .and_then(|r| r.performance_id())
        .unwrap();
    assert!(inserted == "px" || inserted == "p2", "inserted {inserted}");

    // every other scale note keeps its straight pairing
    for i in (0..8).filter(|&i| i != 2) {
        assert!(alignment.contains(&AlignmentRecord::matched(&format!("s{i}"), &format!("p{i}"))));
    }
}

#[test]
fn dropped_performance_note_becomes_deletion() {
    let score = scale_score();
    let mut performance = scale_performance();
    performance.remove(4); // p4, pitch 67, is never played

    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();

    assert_eq!(count_label(&alignment, Label::Match), 7);
    assert_eq!(count_label(&alignment, Label::Insertion), 0);
    assert!(alignment.contains(&AlignmentRecord::deleted("s4")));
    assert_uniqueness(&alignment, &score, &performance);
}

#[test]
fn tempo_change_keeps_index_pairing() {
    // accelerando, then steady
    let score: Vec<Note> = (0..5)
        .map(|i| Note::score(i as f32, 0.5, 60 + 3 * i as u8, &format!("s{i}")))
        .collect();
    let perf_onsets = [0.0f32, 0.5, 1.0, 2.0, 3.0];
    let performance: Vec<Note> = perf_onsets
        .iter()
        .enumerate()
        .map(|(i, &t)| Note::performance(t, 0.4, 60 + 3 * i as u8, 70, &format!("p{i}")))
        .collect();

    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();

    assert_eq!(alignment.len(), 5);
    for i in 0..5 {
        assert!(alignment.contains(&AlignmentRecord::matched(&format!("s{i}"), &format!("p{i}"))));
    }
}

#[test]
fn repeated_pitch_run_drops_the_extra_middle_note() {
    let score: Vec<Note> = (0..4)
        .map(|i| Note::score(i as f32, 0.5, 60, &format!("s{i}")))
        .collect();
    let perf_onsets = [0.0f32, 1.0, 1.5, 2.0, 3.0];
    let performance: Vec<Note> = perf_onsets
        .iter()
        .enumerate()
        .map(|(i, &t)| Note::performance(t, 0.5, 60, 70, &format!("p{i}")))
        .collect();

    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();

    assert_eq!(count_label(&alignment, Label::Match), 4);
    assert!(alignment.contains(&AlignmentRecord::inserted("p2")));
    assert!(alignment.contains(&AlignmentRecord::matched("s0", "p0")));
    assert!(alignment.contains(&AlignmentRecord::matched("s1", "p1")));
    assert!(alignment.contains(&AlignmentRecord::matched("s2", "p3")));
    assert!(alignment.contains(&AlignmentRecord::matched("s3", "p4")));
    assert_uniqueness(&alignment, &score, &performance);
}

#[test]
fn empty_performance_yields_all_deletions() {
    let score = scale_score();
    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &[]).unwrap();

    assert_eq!(alignment.len(), 8);
    assert!(alignment.iter().all(|r| r.label() == Label::Deletion));
}

#[test]
fn empty_score_yields_all_insertions() {
    let performance = scale_performance();
    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&[], &performance).unwrap();

    assert_eq!(alignment.len(), 8);
    assert!(alignment.iter().all(|r| r.label() == Label::Insertion));
}

#[test]
fn coarse_pass_node_length_is_pinned() {
    assert_eq!(COARSE_NODE_LENGTH, 4.0);
}

#[test]
fn perfect_prediction_scores_one_against_ground_truth() {
    let score = scale_score();
    let performance = scale_performance();
    let truth: Vec<AlignmentRecord> = (0..8)
        .map(|i| AlignmentRecord::matched(&format!("s{i}"), &format!("p{i}")))
        .collect();

    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();
    let result = fscore_matches(&alignment, &truth);

    assert_eq!(result.precision, 1.0);
    assert_eq!(result.recall, 1.0);
    assert_eq!(result.f_score, 1.0);
}

#[test]
fn shift_onsets_handles_globally_offset_performance() {
    // the whole performance runs 5 seconds late; the mean-shift objective
    // should still pick the straight pairing
    let score = scale_score();
    let performance: Vec<Note> = SCALE_PITCHES
        .iter()
        .enumerate()
        .map(|(i, &p)| Note::performance(5.0 + i as f32 * 0.6, 0.4, p, 70, &format!("p{i}")))
        .collect();

    let matcher = AutomaticNoteMatcher::new(MatcherConfig {
        shift_onsets: true,
        ..MatcherConfig::default()
    });
    let alignment = matcher.align(&score, &performance).unwrap();

    assert_eq!(count_label(&alignment, Label::Match), 8);
    assert_uniqueness(&alignment, &score, &performance);
    assert_matches_share_pitch(&alignment, &score, &performance);
}

#[test]
fn chords_align_within_each_pitch() {
    // two four-note chords; every pitch occurs once per chord
    let chord = [60u8, 64, 67, 72];
    let mut score = Vec::new();
    let mut performance = Vec::new();
    for (c, beat) in [(0usize, 0.0f32), (1, 2.0)] {
        for (j, &p) in chord.iter().enumerate() {
            score.push(Note::score(beat, 1.0, p, &format!("s{c}_{j}")));
            performance.push(Note::performance(beat * 1.1, 1.0, p, 70, &format!("p{c}_{j}")));
        }
    }

    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();

    assert_eq!(count_label(&alignment, Label::Match), 8);
    assert_matches_share_pitch(&alignment, &score, &performance);
    assert_uniqueness(&alignment, &score, &performance);
    for c in 0..2 {
        for j in 0..4 {
            assert!(alignment.contains(&AlignmentRecord::matched(
                &format!("s{c}_{j}"),
                &format!("p{c}_{j}")
            )));
        }
    }
}
