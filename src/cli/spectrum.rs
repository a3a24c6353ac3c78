// src/cli/spectrum.rs — Print the risk-tier reference

use crate::engine::pool::{TierProfile, TIER_PROFILES};

pub fn run_spectrum() {
    println!();
    println!("THE RISK SPECTRUM — how flags are classified");
    println!("{}", "═".repeat(64));
    for profile in &TIER_PROFILES {
        for line in render_tier(profile) {
            println!("{line}");
        }
    }
}

/// Plain-text block for one tier; shared with tests so the layout is pinned.
pub fn render_tier(profile: &TierProfile) -> Vec<String> {
    let meter: String = (1..=10)
        .map(|i| if i <= profile.risk_meter { '█' } else { '░' })
        .collect();

    let mut lines = vec![
        String::new(),
        format!(
            "[{}] {} — \"{}\"  risk {meter} {}/10",
            profile.severity,
            profile.severity.category(),
            profile.title,
            profile.risk_meter
        ),
        format!("  {}", profile.desc),
    ];
    for bullet in &profile.bullets {
        lines.push(format!("  • {bullet}"));
    }
    lines.push(format!("  before: {}", profile.example_before));
    lines.push(format!("  after:  {}", profile.example_after));
    lines
}
