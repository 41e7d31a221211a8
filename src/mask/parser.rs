use super::builtin::date;
use super::model::{MaskSpec, Matcher};
use crate::error::MaskError;
use regex::Regex;

const MAX_REPEAT: usize = 256;

/// Parses a compact template, logging and degrading to an empty (pass-through)
/// spec when it is malformed.
pub fn parse_template(template: &str) -> MaskSpec {
    match parse_template_strict(template) {
        Ok(spec) => spec,
        Err(err) => {
            log::warn!(target: "steply_mask::parser", "ignoring mask template `{template}`: {err}");
            MaskSpec::empty()
        }
    }
}

/// Template syntax:
///
/// - `#` digit, `A` ASCII letter, `*` ASCII letter or digit, `?` any char
/// - `[...]` a regex character class matched against one char; `[]` a caret trap
/// - `{n}` after a slot repeats it `n` times
/// - `YYYY`, `YY`, `MM`, `DD`, `HH`, `mm`, `ss` date/time fields
/// - `\x` the literal `x`; anything else is a literal
pub fn parse_template_strict(template: &str) -> Result<MaskSpec, MaskError> {
    let mut matchers = Vec::<Matcher>::new();
    let chars: Vec<char> = template.chars().collect();
    let mut idx = 0usize;

    while idx < chars.len() {
        let ch = chars[idx];

        if ch == '\\' {
            if let Some(escaped) = chars.get(idx + 1) {
                matchers.push(Matcher::Literal(*escaped));
                idx += 2;
            } else {
                matchers.push(Matcher::Literal(ch));
                idx += 1;
            }
            continue;
        }

        if ch == '[' {
            let close = chars[idx + 1..]
                .iter()
                .position(|c| *c == ']')
                .map(|offset| idx + 1 + offset)
                .ok_or(MaskError::UnterminatedClass(idx))?;
            if close == idx + 1 {
                matchers.push(Matcher::CaretTrap);
                idx = close + 1;
                continue;
            }

            let class: String = chars[idx..=close].iter().collect();
            let re = Regex::new(class.as_str()).map_err(|source| MaskError::InvalidRegex {
                class: class.clone(),
                source,
            })?;
            let (count, next_idx) = parse_quantifier(&chars, close + 1)?;
            for _ in 0..count {
                matchers.push(Matcher::pattern(re.clone()));
            }
            idx = next_idx;
            continue;
        }

        let short_kind: Option<fn() -> Matcher> = match ch {
            '#' => Some(Matcher::digit),
            'A' => Some(Matcher::alpha),
            '*' => Some(Matcher::alnum),
            '?' => Some(Matcher::any),
            _ => None,
        };

        if let Some(slot) = short_kind {
            let (count, next_idx) = parse_quantifier(&chars, idx + 1)?;
            matchers.extend(std::iter::repeat_with(slot).take(count));
            idx = next_idx;
            continue;
        }

        if ch.is_alphabetic() {
            let start = idx;
            while idx < chars.len() && chars[idx].is_alphabetic() && chars[idx] != 'A' {
                idx += 1;
            }
            let token: String = chars[start..idx].iter().collect();
            matchers.extend(date::format_matchers(token.as_str()));
            continue;
        }

        matchers.push(Matcher::Literal(ch));
        idx += 1;
    }

    Ok(MaskSpec::from_matchers(matchers))
}

/// `{n}` after a slot. Anything else (missing, unclosed, unparsable) counts
/// as a single repetition; more than [`MAX_REPEAT`] is an error.
fn parse_quantifier(chars: &[char], idx: usize) -> Result<(usize, usize), MaskError> {
    if chars.get(idx) != Some(&'{') {
        return Ok((1, idx));
    }
    let Some(close) = chars[idx + 1..]
        .iter()
        .position(|c| *c == '}')
        .map(|offset| idx + 1 + offset)
    else {
        return Ok((1, idx));
    };

    let inner: String = chars[idx + 1..close].iter().collect();
    let count = inner.trim().parse::<usize>().unwrap_or(1);
    if count > MAX_REPEAT {
        return Err(MaskError::QuantifierTooLarge {
            count,
            max: MAX_REPEAT,
        });
    }
    Ok((count, close + 1))
}
