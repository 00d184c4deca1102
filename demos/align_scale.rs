//! Score-to-Performance Alignment Example
//!
//! Aligns a notated C-major scale against a slightly slower performance
//! of it, with one extra played note.

use log::info;
use segno::{AutomaticNoteMatcher, Label, Note};

fn main() {
    env_logger::init();
    info!("Score-to-Performance Alignment Example");

    let pitches = [60u8, 62, 64, 65, 67, 69, 71, 72];

    // Notated scale: one note every half beat
    let score: Vec<Note> = pitches
        .iter()
        .enumerate()
        .map(|(i, &p)| Note::score(i as f32 * 0.5, 0.4, p, &format!("s{i}")))
        .collect();

    // Performed scale: a bit slower, with a stray extra E4
    let mut performance: Vec<Note> = pitches
        .iter()
        .enumerate()
        .map(|(i, &p)| Note::performance(i as f32 * 0.6, 0.4, p, 70, &format!("p{i}")))
        .collect();
    performance.push(Note::performance(1.0, 0.2, 64, 50, "extra"));

    info!("Score: {} notes", score.len());
    info!("Performance: {} notes", performance.len());

    let matcher = AutomaticNoteMatcher::with_defaults();
    let alignment = matcher.align(&score, &performance).unwrap();

    for record in &alignment {
        match record.label() {
            Label::Match => info!(
                "  match     {} -> {}",
                record.score_id().unwrap(),
                record.performance_id().unwrap()
            ),
            Label::Deletion => info!("  deletion  {}", record.score_id().unwrap()),
            Label::Insertion => info!("  insertion {}", record.performance_id().unwrap()),
        }
    }

    let matches = alignment.iter().filter(|r| r.label() == Label::Match).count();
    info!("{} matches, {} records total", matches, alignment.len());
}
