//! Feedback lines for crafting attempts.

use rand::seq::SliceRandom;
use rand::Rng;

/// Failure lines by plausibility band, lowest band first. `{}` is the attempt.
const FAILURE_BANDS: [(f64, f64, &[&str]); 5] = [
    (
        0.0,
        0.2,
        &[
            "{}? The townsfolk cannot stop laughing.",
            "Your {} contraption is declared an affront to the natural order.",
            "Even the village children know {} will never work.",
        ],
    ),
    (
        0.2,
        0.4,
        &[
            "The guild masters inspect your {} and call you a fraud.",
            "Your {} attempt ends in a small explosion and a visit from the magistrate.",
            "The Church has questions about your {} and where you learned it.",
        ],
    ),
    (
        0.4,
        0.6,
        &[
            "Your {} makes a lot of smoke and nothing else.",
            "That combination of {} just makes a mess.",
            "Your {} device falls apart. Back to the drawing board.",
        ],
    ),
    (
        0.6,
        0.8,
        &[
            "Your {} produces interesting results, just not the ones you wanted.",
            "The {} design looks promising, then fails its first test.",
            "Local scholars admire your {}, right up until it stops working.",
        ],
    ),
    (
        0.8,
        1.0,
        &[
            "Your {} approach was almost right. One small miscalculation sank it.",
            "So close! {} might have worked with a slight adjustment.",
            "Your theory behind {} is sound, but the era lacks one missing piece.",
        ],
    ),
];

const MIDDLE_BAND: usize = 2;

/// Success quips by depth band: (first depth, past-the-end depth, lines).
const SUCCESS_BANDS: [(u32, u32, &[&str]); 3] = [
    (
        0,
        2,
        &[
            "The locals are intrigued by your creation.",
            "Not bad for your first attempt in this era.",
            "A small step for you, a potential leap for the Renaissance.",
        ],
    ),
    (
        2,
        5,
        &[
            "Local craftsmen want to learn from you.",
            "Your future insights are proving valuable.",
            "You are making real progress in changing history.",
        ],
    ),
    (
        5,
        u32::MAX,
        &[
            "Da Vinci would be extremely jealous.",
            "You are rewriting the timeline one invention at a time.",
            "The Church is suspicious, but too impressed to burn you... yet.",
        ],
    ),
];

/// A failure line for an attempt, chosen from the band its plausibility falls in.
///
/// Bands are half-open except the last, which includes 1.0. Values outside
/// [0, 1] use the middle band.
pub fn failure_message<R: Rng + ?Sized>(attempt: &str, plausibility: f64, rng: &mut R) -> String {
    let band = FAILURE_BANDS
        .iter()
        .position(|(low, high, _)| {
            plausibility >= *low && (plausibility < *high || (*high >= 1.0 && plausibility <= 1.0))
        })
        .unwrap_or(MIDDLE_BAND);

    let lines = FAILURE_BANDS[band].2;
    let line = lines.choose(rng).copied().unwrap_or(lines[0]);
    line.replace("{}", attempt)
}

/// A quip celebrating a successful build at the given depth.
pub fn success_quip<R: Rng + ?Sized>(depth: u32, rng: &mut R) -> &'static str {
    let lines = SUCCESS_BANDS
        .iter()
        .find(|(low, high, _)| depth >= *low && depth < *high)
        .map(|(_, _, lines)| *lines)
        .unwrap_or(SUCCESS_BANDS[0].2);
    lines.choose(rng).copied().unwrap_or(lines[0])
}

/// Closing line for a finished crafting chain, by the depth it reached.
pub fn completion_message(depth: u32) -> &'static str {
    match depth {
        0..=2 => "You built the technology! You have made a small dent in history.",
        3..=5 => "You built the technology! The Renaissance will never be the same.",
        _ => {
            "You mastered the technology and revolutionized history. \
             The timeline is forever changed."
        }
    }
}
