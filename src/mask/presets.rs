//! Ready-made patterns for common inputs.

use super::model::Matcher;
use super::resolver::{PatternSpec, ResolveContext};

const NAMES: &[&str] = &[
    "phone_us",
    "zip_us",
    "ssn",
    "credit_card",
    "ipv4",
    "hex_color",
];

pub fn names() -> &'static [&'static str] {
    NAMES
}

pub fn preset(name: &str) -> Option<PatternSpec> {
    let pattern = match name.trim() {
        "phone_us" => phone_us(),
        "zip_us" => zip_us(),
        "ssn" => ssn(),
        "credit_card" => credit_card(),
        "ipv4" => ipv4(),
        "hex_color" => hex_color(),
        _ => return None,
    };
    Some(pattern)
}

pub fn phone_us() -> PatternSpec {
    PatternSpec::template("(###) ###-####")
}

pub fn zip_us() -> PatternSpec {
    PatternSpec::template("#####")
}

pub fn ssn() -> PatternSpec {
    PatternSpec::template("###-##-####")
}

pub fn hex_color() -> PatternSpec {
    PatternSpec::template("\\#[0-9a-fA-F]{6}")
}

/// Groups of four, except American Express (`34`/`37`) which uses 4-6-5.
pub fn credit_card() -> PatternSpec {
    PatternSpec::dynamic(card_matchers)
}

fn card_matchers(raw: &str, _ctx: &ResolveContext<'_>) -> Vec<Matcher> {
    let digits: String = raw.chars().filter(|ch| ch.is_ascii_digit()).take(2).collect();
    let groups: &[usize] = if digits == "34" || digits == "37" {
        &[4, 6, 5]
    } else {
        &[4, 4, 4, 4]
    };

    let mut matchers = Vec::new();
    for (idx, len) in groups.iter().enumerate() {
        if idx > 0 {
            matchers.push(Matcher::literal(' '));
        }
        matchers.extend((0..*len).map(|_| Matcher::digit()));
    }
    matchers
}

/// Four dot-separated octets. An octet closed by a typed `.` shrinks to the
/// digits it holds; open octets allow three.
pub fn ipv4() -> PatternSpec {
    PatternSpec::dynamic(ipv4_matchers)
}

fn ipv4_matchers(raw: &str, _ctx: &ResolveContext<'_>) -> Vec<Matcher> {
    let segments: Vec<&str> = raw.split('.').collect();
    let mut matchers = Vec::new();
    for octet in 0..4 {
        if octet > 0 {
            matchers.push(Matcher::literal('.'));
        }
        let closed = octet + 1 < segments.len();
        let digits = segments
            .get(octet)
            .map_or(0, |segment| segment.chars().filter(|ch| ch.is_ascii_digit()).count());
        let len = if closed && digits > 0 { digits.min(3) } else { 3 };
        matchers.extend((0..len).map(|_| Matcher::digit()));
    }
    matchers
}
