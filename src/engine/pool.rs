// src/engine/pool.rs — Canned sample pool and risk-tier reference data
//
// The "AI" never analyzes anything: completed scans fabricate flags by
// sampling these tables. Fixed at build time, read-only, non-empty per tier.

use super::types::Severity;

/// (transcript, ai_reason) samples for the Blue tier: unverified claims
/// that want a citation overlay.
const BLUE_SAMPLES: &[(&str, &str)] = &[
    (
        "Studies show 99% of doctors agree with me on this.",
        "Unverified statistical claim.",
    ),
    (
        "I read somewhere that this works for literally everyone.",
        "Uncited source presented as fact.",
    ),
    (
        "It's a proven fact, you can look it up anywhere.",
        "Appeal to unnamed authority.",
    ),
    (
        "Scientists basically admitted I was right all along.",
        "Misattributed research finding.",
    ),
    (
        "Four out of five experts would back me up here.",
        "Fabricated statistic.",
    ),
    (
        "The history books will tell you the exact same thing.",
        "Unverifiable historical claim.",
    ),
];

/// Yellow tier: hot takes that are safe but suppression-prone.
const YELLOW_SAMPLES: &[(&str, &str)] = &[
    (
        "Honestly, that entire country is overrated and boring.",
        "Subjective opinion / Hyperbole.",
    ),
    (
        "Anyone who disagrees with this has never read a book.",
        "Inflammatory generalization.",
    ),
    (
        "That whole genre of music is objectively garbage.",
        "Opinion framed as fact.",
    ),
    (
        "This is the worst take the internet has ever produced.",
        "Hyperbolic framing.",
    ),
    (
        "Nobody with functioning taste would watch that show.",
        "Gatekeeping hyperbole.",
    ),
    (
        "Modern art peaked in a mall parking lot, I said it.",
        "Dismissive hot take.",
    ),
];

/// Orange tier: advertiser-safety hazards.
const ORANGE_SAMPLES: &[(&str, &str)] = &[
    (
        "It's a total scam. Don't buy their garbage products ever.",
        "Advertiser conflict risk.",
    ),
    (
        "Their entire subscription model is legalized theft.",
        "Brand disparagement.",
    ),
    (
        "Sponsors in that category should honestly be illegal.",
        "Anti-sponsor sentiment.",
    ),
    (
        "Save your money, the premium tier does absolutely nothing.",
        "Product defamation risk.",
    ),
    (
        "Every single ad in this space is lying to your face.",
        "Blanket advertiser attack.",
    ),
    (
        "I would rather quit the show than read that ad copy.",
        "Sponsorship conflict.",
    ),
];

/// Red tier: direct TOS violations. The kill-switch cases.
const RED_SAMPLES: &[(&str, &str)] = &[
    (
        "You know, some people say we should just [bleep] all of them.",
        "Hate speech detected.",
    ),
    (
        "People like that don't deserve to be on the platform at all.",
        "Targeted harassment.",
    ),
    (
        "I know where that guy lives, and I'm just saying.",
        "Implied threat / Doxxing risk.",
    ),
    (
        "Here's the leaked audio nobody is allowed to play.",
        "Unlicensed material / Legal exposure.",
    ),
    (
        "Let's just say the allegations are definitely all true.",
        "Defamation exposure.",
    ),
    (
        "If you see them in public, well, you know what to do.",
        "Incitement risk.",
    ),
];

/// Sample table for one severity tier.
pub fn samples(severity: Severity) -> &'static [(&'static str, &'static str)] {
    match severity {
        Severity::Blue => BLUE_SAMPLES,
        Severity::Yellow => YELLOW_SAMPLES,
        Severity::Orange => ORANGE_SAMPLES,
        Severity::Red => RED_SAMPLES,
    }
}

/// Reference copy for one tier of the classification system, rendered by the
/// `spectrum` subcommand and the Spectrum tab.
#[derive(Debug, Clone, Copy)]
pub struct TierProfile {
    pub severity: Severity,
    pub title: &'static str,
    pub desc: &'static str,
    pub bullets: [&'static str; 3],
    /// 1–10 bar meter shown next to the tier.
    pub risk_meter: u8,
    pub example_before: &'static str,
    pub example_after: &'static str,
}

pub const TIER_PROFILES: [TierProfile; 4] = [
    TierProfile {
        severity: Severity::Blue,
        title: "Citation Needed",
        desc: "Flags missing sources, unverified statistics, or potential \
               misinformation that needs a citation overlay.",
        bullets: [
            "Unverified Statistics",
            "Historical Inaccuracies",
            "Missing Context",
        ],
        risk_meter: 2,
        example_before: "Studies show 90% of people hate kale.",
        example_after: "[Overlay]: 'Source: 2023 Kale Appreciation Study, Sample Size 100'",
    },
    TierProfile {
        severity: Severity::Yellow,
        title: "Hot Take",
        desc: "Marks controversial or subjective opinions that are safe but \
               might require a generic disclaimer to avoid suppression.",
        bullets: ["Subjective Opinions", "Polarizing Topics", "Slight Profanity"],
        risk_meter: 5,
        example_before: "This entire industry is a scam run by lizards.",
        example_after: "[Disclaimer]: 'The views expressed are solely those of the host.'",
    },
    TierProfile {
        severity: Severity::Orange,
        title: "Borderline",
        desc: "Statements that approach the line of advertiser safety. High \
               risk of limited monetization.",
        bullets: [
            "Aggressive Conflict",
            "Graphic Descriptions",
            "Sexual Innuendo",
        ],
        risk_meter: 8,
        example_before: "I'm going to punch him in the throat next time.",
        example_after: "I'm going to [bleep] him up next time.",
    },
    TierProfile {
        severity: Severity::Red,
        title: "The Nuke Zone",
        desc: "Direct TOS violations. Hate speech, dangerous medical \
               misinformation, or illegal incitement.",
        bullets: ["Hate Speech", "Medical Misinfo", "Incitement to Violence"],
        risk_meter: 10,
        example_before: "Drink bleach to cure your cold.",
        example_after: "[SEGMENT REMOVED / AUDIO SILENCED]",
    },
];

/// Profile for one tier.
pub fn tier_profile(severity: Severity) -> &'static TierProfile {
    &TIER_PROFILES[severity as usize]
}
