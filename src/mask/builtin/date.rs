use crate::locale;
use crate::mask::model::{CharClass, Matcher, Slot};
use crate::mask::options::PatternOptions;

pub const DEFAULT_DATE_FORMAT: &str = "MM/DD/YYYY";
pub const DEFAULT_TIME_FORMAT: &str = "HH:mm";
pub const DEFAULT_TIME_FORMAT_SECONDS: &str = "HH:mm:ss";
pub const DEFAULT_RANGE_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    Year,
    ShortYear,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DateToken {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "YYYY" => Some(Self::Year),
            "YY" => Some(Self::ShortYear),
            "MM" => Some(Self::Month),
            "DD" => Some(Self::Day),
            "HH" => Some(Self::Hour),
            "mm" => Some(Self::Minute),
            "ss" => Some(Self::Second),
            _ => None,
        }
    }

    pub fn len(self) -> usize {
        match self {
            Self::Year => 4,
            _ => 2,
        }
    }

    pub fn min_value(self) -> u32 {
        match self {
            Self::Year | Self::Month | Self::Day => 1,
            _ => 0,
        }
    }

    pub fn max_value(self) -> u32 {
        match self {
            Self::Year => 9999,
            Self::ShortYear => 99,
            Self::Month => 12,
            Self::Day => 31,
            Self::Hour => 23,
            Self::Minute | Self::Second => 59,
        }
    }

    fn hint(self) -> char {
        match self {
            Self::Year | Self::ShortYear => 'Y',
            Self::Month => 'M',
            Self::Day => 'D',
            Self::Hour => 'H',
            Self::Minute => 'm',
            Self::Second => 's',
        }
    }

    /// Validation order: years before months before days, so day limits can
    /// see the month and leap year.
    pub fn order(self) -> u8 {
        match self {
            Self::Year => 0,
            Self::ShortYear => 1,
            Self::Month => 2,
            Self::Day => 3,
            Self::Hour => 4,
            Self::Minute => 5,
            Self::Second => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatPart {
    Field(DateToken),
    Literal(char),
}

/// A date/time field and its char offset inside the formatted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateField {
    pub token: DateToken,
    pub start: usize,
}

fn parse_format(format: &str) -> Vec<FormatPart> {
    let chars: Vec<char> = format.chars().collect();
    let mut parts = Vec::new();
    let mut idx = 0usize;

    'outer: while idx < chars.len() {
        for width in [4usize, 2] {
            if idx + width > chars.len() {
                continue;
            }
            let token: String = chars[idx..idx + width].iter().collect();
            if let Some(field) = DateToken::from_token(token.as_str()) {
                parts.push(FormatPart::Field(field));
                idx += width;
                continue 'outer;
            }
        }
        parts.push(FormatPart::Literal(chars[idx]));
        idx += 1;
    }

    parts
}

pub fn fields(format: &str) -> Vec<DateField> {
    let mut offset = 0usize;
    let mut out = Vec::new();
    for part in parse_format(format) {
        match part {
            FormatPart::Field(token) => {
                out.push(DateField {
                    token,
                    start: offset,
                });
                offset += token.len();
            }
            FormatPart::Literal(_) => offset += 1,
        }
    }
    out
}

fn has_fields(format: &str) -> bool {
    parse_format(format)
        .iter()
        .any(|part| matches!(part, FormatPart::Field(_)))
}

pub fn format_matchers(format: &str) -> Vec<Matcher> {
    let mut matchers = Vec::new();
    for part in parse_format(format) {
        match part {
            FormatPart::Field(token) => {
                for _ in 0..token.len() {
                    matchers.push(Slot::new(CharClass::Digit).with_hint(token.hint()).into());
                }
            }
            FormatPart::Literal(ch) => matchers.push(Matcher::Literal(ch)),
        }
    }
    matchers
}

/// Explicit format, else the locale's short date format, else the default.
pub fn date_format(options: &PatternOptions) -> String {
    if let Some(format) = options.format.as_deref() {
        if has_fields(format) {
            return format.to_string();
        }
        log::warn!(target: "steply_mask::builtin", "date format `{format}` has no fields, falling back");
    }

    let locale_format = locale::short_date_format(options.locale_tag());
    if has_fields(locale_format) {
        return locale_format.to_string();
    }
    DEFAULT_DATE_FORMAT.to_string()
}

pub fn time_format(options: &PatternOptions) -> String {
    if let Some(format) = options.format.as_deref()
        && has_fields(format)
    {
        return format.to_string();
    }
    if options.seconds {
        DEFAULT_TIME_FORMAT_SECONDS.to_string()
    } else {
        DEFAULT_TIME_FORMAT.to_string()
    }
}

pub(super) fn date_matchers(options: &PatternOptions) -> Vec<Matcher> {
    format_matchers(date_format(options).as_str())
}

pub(super) fn time_matchers(options: &PatternOptions) -> Vec<Matcher> {
    format_matchers(time_format(options).as_str())
}

pub(super) fn range_date_matchers(options: &PatternOptions) -> Vec<Matcher> {
    let single = date_matchers(options);
    let separator = options
        .range_separator
        .as_deref()
        .unwrap_or(DEFAULT_RANGE_SEPARATOR);

    let mut matchers = single.clone();
    matchers.extend(Matcher::literals(separator));
    matchers.extend(single);
    matchers
}

pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: Option<u32>, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => match year {
            Some(y) if is_leap_year(y) => 29,
            Some(_) => 28,
            None => 29,
        },
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::model::MaskSpec;

    #[test]
    fn format_tokens_become_hinted_digit_slots() {
        let spec = MaskSpec::from_matchers(format_matchers("MM/DD/YYYY"));
        assert_eq!(spec.placeholder('_'), "__/__/____");
        assert_eq!(spec.template('_'), "MM/DD/YYYY");
    }

    #[test]
    fn fields_record_offsets() {
        let fields = fields("DD.MM.YYYY HH:mm");
        let starts: Vec<(DateToken, usize)> = fields.iter().map(|f| (f.token, f.start)).collect();
        assert_eq!(
            starts,
            vec![
                (DateToken::Day, 0),
                (DateToken::Month, 3),
                (DateToken::Year, 6),
                (DateToken::Hour, 11),
                (DateToken::Minute, 14),
            ]
        );
    }

    #[test]
    fn adjacent_tokens_split_greedily() {
        let spec = MaskSpec::from_matchers(format_matchers("YYYYMMDD"));
        assert_eq!(spec.template('_'), "YYYYMMDD");
        assert_eq!(spec.slot_count(), 8);
    }

    #[test]
    fn date_format_prefers_explicit_then_locale() {
        let explicit = PatternOptions::default().with_format("YYYY-MM-DD");
        assert_eq!(date_format(&explicit), "YYYY-MM-DD");

        let german = PatternOptions::default().with_locale("de-DE");
        assert_eq!(date_format(&german), "DD.MM.YYYY");

        let malformed = PatternOptions::default()
            .with_format("nonsense")
            .with_locale("en-US");
        assert_eq!(date_format(&malformed), DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn time_format_honours_seconds_flag() {
        let options = PatternOptions {
            seconds: true,
            ..PatternOptions::default()
        };
        assert_eq!(time_format(&options), "HH:mm:ss");
        assert_eq!(time_format(&PatternOptions::default()), "HH:mm");
    }

    #[test]
    fn range_joins_two_dates() {
        let spec = MaskSpec::from_matchers(range_date_matchers(&PatternOptions::default()));
        assert_eq!(spec.template('_'), "MM/DD/YYYY - MM/DD/YYYY");
    }

    #[test]
    fn february_depends_on_known_year() {
        assert_eq!(days_in_month(Some(2024), 2), 29);
        assert_eq!(days_in_month(Some(2023), 2), 28);
        assert_eq!(days_in_month(None, 2), 29);
        assert_eq!(days_in_month(None, 4), 30);
    }
}
