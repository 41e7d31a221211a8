use crate::locale::LocaleSymbols;
use crate::mask::model::Matcher;
use crate::mask::options::PatternOptions;

const DEFAULT_DECIMAL_LIMIT: usize = 2;
const NEUTRAL_DECIMAL: char = '.';

#[derive(Debug, Clone)]
struct NumberSettings {
    symbols: LocaleSymbols,
    prefix: Vec<char>,
    suffix: Vec<char>,
    include_thousands_separator: bool,
    allow_decimal: bool,
    decimal_limit: usize,
    require_decimal: bool,
    allow_negative: bool,
    allow_leading_zeroes: bool,
    integer_limit: Option<usize>,
}

impl NumberSettings {
    fn from_options(options: &PatternOptions) -> Self {
        let symbols = options.symbols();
        let prefix = match options.prefix.as_deref() {
            Some(prefix) => prefix.chars().collect(),
            None if options.currency => symbols.currency.chars().collect(),
            None => Vec::new(),
        };
        Self {
            prefix,
            suffix: options
                .suffix
                .as_deref()
                .unwrap_or_default()
                .chars()
                .collect(),
            include_thousands_separator: options.include_thousands_separator.unwrap_or(true),
            allow_decimal: options.allow_decimal.unwrap_or(true),
            decimal_limit: options.decimal_limit.unwrap_or(DEFAULT_DECIMAL_LIMIT),
            require_decimal: options.require_decimal,
            allow_negative: options.allow_negative,
            allow_leading_zeroes: options.allow_leading_zeroes,
            integer_limit: options.integer_limit.filter(|limit| *limit > 0),
            symbols,
        }
    }

    fn decimal(&self) -> char {
        self.symbols.decimal
    }
}

/// Builds the numeric mask for the value typed so far. Group separators are
/// placed from the integer digit count, the decimal symbol is wrapped in caret
/// traps, and the fraction is capped at the decimal limit.
pub(super) fn number_matchers(
    raw: &str,
    previous_conformed_value: &str,
    options: &PatternOptions,
) -> Vec<Matcher> {
    let settings = NumberSettings::from_options(options);
    let raw: Vec<char> = raw.chars().collect();
    let decimal = settings.decimal();

    if raw.is_empty() || (raw.len() == 1 && settings.prefix.first() == raw.first()) {
        return wrap(&settings, vec![Matcher::digit()]);
    }

    let neutral = previous_conformed_value.is_empty() && decimal != NEUTRAL_DECIMAL;
    if settings.allow_decimal
        && raw.len() == 1
        && (raw[0] == decimal || (neutral && raw[0] == NEUTRAL_DECIMAL))
    {
        return wrap(
            &settings,
            vec![
                Matcher::literal('0'),
                Matcher::CaretTrap,
                Matcher::literal(decimal),
                Matcher::digit(),
            ],
        );
    }

    let is_negative = settings.allow_negative && raw.first() == Some(&settings.symbols.negative);
    let mut body: &[char] = if is_negative { &raw[1..] } else { &raw[..] };
    if !settings.suffix.is_empty() && body.ends_with(&settings.suffix) {
        body = &body[..body.len() - settings.suffix.len()];
    }
    let integer_start = if body.starts_with(&settings.prefix) {
        settings.prefix.len()
    } else {
        0
    };

    let decimal_at = find_decimal(body, &settings, neutral);
    let wants_decimal = settings.allow_decimal || settings.require_decimal;
    let (integer, fraction): (&[char], Option<&[char]>) = match decimal_at {
        Some(at) if wants_decimal => (
            &body[integer_start.min(at)..at],
            Some(&body[at + 1..]),
        ),
        _ => (&body[integer_start.min(body.len())..], None),
    };

    let mut digits: String = integer.iter().filter(|ch| ch.is_ascii_digit()).collect();
    if let Some(limit) = settings.integer_limit {
        digits = digits.chars().take(limit).collect();
    }
    if !settings.allow_leading_zeroes {
        digits = strip_leading_zeroes(digits.as_str());
    }
    let grouped = if settings.include_thousands_separator {
        group_thousands(digits.as_str(), settings.symbols.thousands)
    } else {
        digits
    };

    let mut matchers: Vec<Matcher> = grouped
        .chars()
        .map(|ch| {
            if ch.is_ascii_digit() {
                Matcher::digit()
            } else {
                Matcher::literal(ch)
            }
        })
        .collect();

    let follows_decimal = decimal_at
        .and_then(|at| at.checked_sub(1))
        .and_then(|before| body.get(before))
        .is_some_and(|ch| *ch == decimal);

    if (decimal_at.is_some() && settings.allow_decimal) || settings.require_decimal {
        if !follows_decimal {
            matchers.push(Matcher::CaretTrap);
        }
        matchers.push(Matcher::literal(decimal));
        matchers.push(Matcher::CaretTrap);

        if let Some(fraction) = fraction {
            matchers.extend(
                fraction
                    .iter()
                    .filter(|ch| ch.is_ascii_digit())
                    .take(settings.decimal_limit)
                    .map(|_| Matcher::digit()),
            );
        }
        if settings.require_decimal && follows_decimal {
            matchers.push(Matcher::digit());
        }
    }

    if !settings.prefix.is_empty() {
        let mut prefixed: Vec<Matcher> = settings.prefix.iter().copied().map(Matcher::literal).collect();
        prefixed.extend(matchers);
        matchers = prefixed;
    }

    if is_negative {
        if matcher_count(&matchers) == settings.prefix.len() {
            matchers.push(Matcher::digit());
        }
        matchers.insert(0, Matcher::one_of([settings.symbols.negative]));
    }

    matchers.extend(settings.suffix.iter().copied().map(Matcher::literal));
    matchers
}

/// Rewrites a number conformed under `from` into raw input for `to`: the
/// sign, the integer digits, and the fraction behind `to`'s decimal symbol.
/// Group separators, prefix and suffix are dropped; the mask puts them back.
pub(crate) fn translate_number(value: &str, from: &PatternOptions, to: &PatternOptions) -> String {
    let from_symbols = from.symbols();
    let to_symbols = to.symbols();
    let body = from
        .persistent_suffix()
        .and_then(|suffix| value.strip_suffix(suffix))
        .unwrap_or(value);

    let mut out = String::with_capacity(body.len());
    if body.starts_with(from_symbols.negative) {
        out.push(to_symbols.negative);
    }
    let (integer, fraction) = match body.rfind(from_symbols.decimal) {
        Some(at) => (&body[..at], Some(&body[at + from_symbols.decimal.len_utf8()..])),
        None => (body, None),
    };
    out.extend(integer.chars().filter(char::is_ascii_digit));
    if let Some(fraction) = fraction {
        out.push(to_symbols.decimal);
        out.extend(fraction.chars().filter(char::is_ascii_digit));
    }
    out
}

fn wrap(settings: &NumberSettings, core: Vec<Matcher>) -> Vec<Matcher> {
    settings
        .prefix
        .iter()
        .copied()
        .map(Matcher::literal)
        .chain(core)
        .chain(settings.suffix.iter().copied().map(Matcher::literal))
        .collect()
}

fn matcher_count(matchers: &[Matcher]) -> usize {
    matchers
        .iter()
        .filter(|matcher| !matches!(matcher, Matcher::CaretTrap))
        .count()
}

/// Last locale decimal symbol. On a fresh value (nothing conformed yet) a `.`
/// is read as a locale-neutral decimal point when it appears once and is not
/// followed by exactly three digits, so `1234.5` means the same number in
/// every locale while `1.234` still reads as a grouped integer.
fn find_decimal(body: &[char], settings: &NumberSettings, neutral: bool) -> Option<usize> {
    let decimal = settings.decimal();
    if let Some(at) = body.iter().rposition(|ch| *ch == decimal) {
        return Some(at);
    }
    if !neutral {
        return None;
    }

    let mut dots = body
        .iter()
        .enumerate()
        .filter(|(_, ch)| **ch == NEUTRAL_DECIMAL)
        .map(|(idx, _)| idx);
    let at = dots.next()?;
    if dots.next().is_some() {
        return None;
    }
    let digits_after = body[at + 1..]
        .iter()
        .take_while(|ch| ch.is_ascii_digit())
        .count();
    (digits_after != 3).then_some(at)
}

fn strip_leading_zeroes(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::model::MaskSpec;

    fn placeholder(raw: &str, previous: &str, options: &PatternOptions) -> String {
        MaskSpec::from_matchers(number_matchers(raw, previous, options)).placeholder('_')
    }

    #[test]
    fn empty_value_gets_a_single_digit_slot() {
        let options = PatternOptions::default().with_prefix("$");
        assert_eq!(placeholder("", "", &options), "$_");
        assert_eq!(placeholder("$", "", &options), "$_");
    }

    #[test]
    fn separators_follow_digit_count() {
        let options = PatternOptions::default();
        assert_eq!(placeholder("123", "12", &options), "___");
        assert_eq!(placeholder("1234", "123", &options), "_,___");
        assert_eq!(placeholder("1234567", "123,456", &options), "_,___,___");
    }

    #[test]
    fn decimal_is_wrapped_in_caret_traps() {
        let options = PatternOptions::default();
        let spec = MaskSpec::from_matchers(number_matchers("1234.5", "", &options));
        assert_eq!(spec.placeholder('_'), "_,___._");
        assert_eq!(spec.caret_traps(), &[5, 6]);
    }

    #[test]
    fn fraction_respects_decimal_limit() {
        let options = PatternOptions {
            decimal_limit: Some(1),
            ..PatternOptions::default()
        };
        assert_eq!(placeholder("1.234", "1.23", &options), "_._");
    }

    #[test]
    fn lone_decimal_expands_to_zero_point() {
        let options = PatternOptions::default();
        assert_eq!(placeholder(".", "", &options), "0._");
    }

    #[test]
    fn german_locale_swaps_symbols() {
        let options = PatternOptions::default().with_locale("de-DE");
        assert_eq!(placeholder("1234,5", "1.234", &options), "_.___,_");
    }

    #[test]
    fn neutral_decimal_only_applies_to_fresh_values() {
        let options = PatternOptions::default().with_locale("de-DE");
        assert_eq!(placeholder("1234.5", "", &options), "_.___,_");
        assert_eq!(placeholder("1.234", "", &options), "_.___");
        assert_eq!(placeholder("1.2345", "1.234", &options), "__.___");
    }

    #[test]
    fn negative_sign_is_a_slot() {
        let options = PatternOptions {
            allow_negative: true,
            ..PatternOptions::default()
        };
        let spec = MaskSpec::from_matchers(number_matchers("-12", "-1", &options));
        assert_eq!(spec.placeholder('_'), "___");
        assert!(spec.matchers()[0].is_slot());

        assert_eq!(placeholder("-", "", &options), "__");
    }

    #[test]
    fn currency_prefix_and_suffix_wrap_the_number() {
        let options = PatternOptions {
            currency: true,
            suffix: Some(" net".to_string()),
            ..PatternOptions::default().with_locale("en-GB")
        };
        assert_eq!(placeholder("£12 net", "£1 net", &options), "£__ net");
    }

    #[test]
    fn integer_limit_and_leading_zeroes() {
        let options = PatternOptions {
            integer_limit: Some(3),
            ..PatternOptions::default()
        };
        assert_eq!(placeholder("12345", "1234", &options), "___");
        assert_eq!(strip_leading_zeroes("0007"), "7");
        assert_eq!(strip_leading_zeroes("000"), "0");
    }

    #[test]
    fn translation_swaps_decimal_and_drops_grouping() {
        let us = PatternOptions::default();
        let de = PatternOptions::default().with_locale("de-DE");
        assert_eq!(translate_number("1,234.5", &us, &de), "1234,5");
        assert_eq!(translate_number("1.234,5", &de, &us), "1234.5");
        assert_eq!(translate_number("-1,234,567", &us, &de), "-1234567");

        let euro = PatternOptions {
            currency: true,
            suffix: Some(" net".to_string()),
            ..de.clone()
        };
        assert_eq!(translate_number("€12,50 net", &euro, &us), "12.50");
    }

    #[test]
    fn grouping_inserts_separator_every_three_digits() {
        assert_eq!(group_thousands("1234567", ','), "1,234,567");
        assert_eq!(group_thousands("123", ','), "123");
        assert_eq!(group_thousands("", ','), "");
    }
}
