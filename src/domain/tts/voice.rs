//! Translation of plan voice tags into the vocabularies the two endpoint
//! schemas understand.

use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_LANG: &str = "en-US";

fn locale_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([a-z]{2})-([A-Z]{2})-").expect("locale pattern is valid"))
}

fn percent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([+-])(\d{1,3})%$").expect("percent pattern is valid"))
}

/// Locale embedded in a neural voice id (`en-GB-SoniaNeural` -> `en-GB`)
pub fn lang_for_voice(voice: &str) -> String {
    match locale_pattern().captures(voice) {
        Some(caps) => format!("{}-{}", &caps[1], &caps[2]),
        None => DEFAULT_LANG.to_string(),
    }
}

/// Rate tag as a prosody percentage (`slow` -> `-25%`)
pub fn prosody_rate(rate: &str) -> String {
    let rate = rate.trim();
    if percent_pattern().is_match(rate) {
        return rate.to_string();
    }
    match rate.to_lowercase().as_str() {
        "x-slow" | "very-slow" => "-50%",
        "slow" => "-25%",
        "fast" => "+25%",
        "x-fast" | "very-fast" => "+50%",
        _ => "+0%",
    }
    .to_string()
}

/// Rate tag as a speed multiplier (`slow` -> 0.75)
pub fn speech_speed(rate: &str) -> f32 {
    let rate = rate.trim();
    if let Some(caps) = percent_pattern().captures(rate) {
        let magnitude: f32 = caps[2].parse().unwrap_or(0.0);
        let signed = if &caps[1] == "-" { -magnitude } else { magnitude };
        return (1.0 + signed / 100.0).clamp(0.25, 4.0);
    }
    match rate.to_lowercase().as_str() {
        "x-slow" | "very-slow" => 0.5,
        "slow" => 0.75,
        "fast" => 1.25,
        "x-fast" | "very-fast" => 1.5,
        _ => 1.0,
    }
}
