// src/engine/generator.rs — Flag fabrication
//
// Pure given a seed: every random draw goes through the injected `Rng`, so
// tests pin a `StdRng::seed_from_u64` and get identical flag sets.

use rand::Rng;

use super::pool;
use super::types::{Flag, Platform, Severity, TIMELINE_SECS};

/// Number of bars in the cosmetic waveform strip.
pub const WAVEFORM_BARS: usize = 80;

/// Weighted severity draw over `[0, 100)`. Red and Orange are deliberately
/// rare; Blue and Yellow dominate.
fn draw_severity<R: Rng>(rng: &mut R) -> Severity {
    match rng.gen_range(0..100u8) {
        90.. => Severity::Red,
        70.. => Severity::Orange,
        40.. => Severity::Yellow,
        _ => Severity::Blue,
    }
}

/// How many flags to aim for. General audits run hotter than the
/// platform-tuned presets.
fn draw_count<R: Rng>(platform: Platform, rng: &mut R) -> usize {
    let base = rng.gen_range(2..=5usize);
    match platform {
        Platform::General => base + 2,
        _ => base,
    }
}

/// Fabricate a sorted flag set for one completed scan.
///
/// The drawn count is a maximum, not a guarantee: a draw whose transcript
/// already appears in this generation is skipped rather than redrawn, so the
/// result can come up short (never empty — the first draw always lands).
pub fn generate_flags<R: Rng>(platform: Platform, rng: &mut R) -> Vec<Flag> {
    let count = draw_count(platform, rng);
    let mut flags: Vec<Flag> = Vec::with_capacity(count);

    for _ in 0..count {
        let severity = draw_severity(rng);
        let table = pool::samples(severity);
        let (transcript, reason) = table[rng.gen_range(0..table.len())];
        if flags.iter().any(|f| f.transcript == transcript) {
            continue;
        }
        let seconds = rng.gen_range(0..TIMELINE_SECS);
        flags.push(Flag::new(severity, seconds, transcript, reason));
    }

    flags.sort_by_key(|f| f.seconds);
    flags
}

/// Cosmetic waveform: bar heights in `[20, 80)`, regenerated per scan.
pub fn generate_waveform<R: Rng>(rng: &mut R) -> Vec<u8> {
    (0..WAVEFORM_BARS).map(|_| rng.gen_range(20..80u8)).collect()
}

/// Canned "smart summary" line for a generated flag set.
pub fn smart_summary(flags: &[Flag]) -> String {
    let red_count = flags
        .iter()
        .filter(|f| f.severity == Severity::Red)
        .count();
    if red_count > 1 {
        return "Whoa there! High voltage detected. Multiple Kill-Switch threats found. \
                Recommend immediate review before export."
            .into();
    }
    if flags.len() > 3 {
        return "Spicy episode! Several unverified claims found. A few Receipt overlays \
                will keep the advertisers happy."
            .into();
    }
    "Safe vibe overall, but that medical claim at 12:04 is spicy.".into()
}
