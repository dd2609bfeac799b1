//! Voice selection — pick the best available voice for a locale.
//!
//! Platform voice inventories are wildly uneven: some machines carry a
//! single robotic network voice, others a dozen local ones.  The ranking
//! here encodes what actually sounds acceptable for Traditional-Chinese exam
//! reading, learned the hard way from classroom machines.

use super::adapter::VoiceDescriptor;

// ---------------------------------------------------------------------------
// Ranking tables
// ---------------------------------------------------------------------------

/// Regional variant to avoid even when it matches the language family —
/// Cantonese-accented Mandarin reads exam text poorly.
const EXCLUDED_VARIANT: &str = "zh-hk";

/// Fixed quality ranking by known voice names; lower is better.
fn name_rank(name: &str) -> u8 {
    if name.contains("Online (Natural)") {
        0
    } else if name.contains("Yating") {
        1
    } else if name.contains("Hanhan") {
        2
    } else if name.contains("Zhiwei") {
        3
    } else if name.contains("Mei-Jia") || name.contains("Meijia") {
        4
    } else if name.contains("Tian-Tian") || name.contains("Tiantian") {
        5
    } else {
        9
    }
}

/// Locale proximity to the preferred tag; lower is better.
fn locale_score(locale: &str, preferred: &str) -> u8 {
    if locale == preferred {
        return 0;
    }
    let lower = locale.to_lowercase();
    if lower.contains("zh-hant") {
        1
    } else if lower.contains("zh-tw") {
        2
    } else if lower.contains("zh-cn") {
        3
    } else {
        9
    }
}

/// The language family of a BCP-47 tag (`"zh-TW"` → `"zh"`).
fn language_family(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

// ---------------------------------------------------------------------------
// pick_best_voice
// ---------------------------------------------------------------------------

/// Choose the best voice for `preferred` from `voices`.
///
/// Voices outside the preferred language family (or in the excluded regional
/// variant) are dropped.  Among the rest, exact-locale local voices are
/// preferred over any local voice, which beat network voices; ties break by
/// locale proximity, then local-service, then the known-name quality
/// ranking.
///
/// Returns `None` when no voice matches the language family at all — the
/// caller then lets the engine use its own default voice.
pub fn pick_best_voice(
    voices: &[VoiceDescriptor],
    preferred: &str,
) -> Option<VoiceDescriptor> {
    let family = language_family(preferred).to_lowercase();

    let candidates: Vec<&VoiceDescriptor> = voices
        .iter()
        .filter(|v| {
            let locale = v.locale.to_lowercase();
            locale.starts_with(&family) && !locale.contains(EXCLUDED_VARIANT)
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let local: Vec<&VoiceDescriptor> = candidates
        .iter()
        .copied()
        .filter(|v| v.local_service)
        .collect();
    let exact_local: Vec<&VoiceDescriptor> = local
        .iter()
        .copied()
        .filter(|v| v.locale == preferred)
        .collect();

    let mut pool = if !exact_local.is_empty() {
        exact_local
    } else if !local.is_empty() {
        local
    } else {
        candidates
    };

    pool.sort_by_key(|v| {
        (
            locale_score(&v.locale, preferred),
            !v.local_service, // local first
            name_rank(&v.name),
        )
    });

    pool.first().map(|v| (*v).clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
