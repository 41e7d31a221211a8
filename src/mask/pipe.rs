use super::builtin::date::{self, DateField, DateToken};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_MIN_YEAR: u32 = 1;
pub const DEFAULT_MAX_YEAR: u32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeOutcome {
    Accept(String),
    /// `piped_indexes` are the offsets of characters the pipe inserted, so the
    /// caret can step over them.
    Modified {
        value: String,
        piped_indexes: Vec<usize>,
    },
    /// Veto the edit; the previous conformed value is kept.
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub struct PipeContext<'a> {
    pub raw_value: &'a str,
    pub previous_conformed_value: &'a str,
    pub placeholder: &'a str,
    pub placeholder_char: char,
    pub caret: usize,
}

type PipeFn = dyn Fn(&str, &PipeContext<'_>) -> PipeOutcome + Send + Sync;

/// Post-conformance transform hook.
#[derive(Clone)]
pub struct Pipe {
    name: String,
    func: Arc<PipeFn>,
}

impl Pipe {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&str, &PipeContext<'_>) -> PipeOutcome + Send + Sync + 'static,
    {
        Self::named("custom", func)
    }

    pub fn named<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str, &PipeContext<'_>) -> PipeOutcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, conformed_value: &str, ctx: &PipeContext<'_>) -> PipeOutcome {
        (self.func)(conformed_value, ctx)
    }
}

impl fmt::Debug for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe").field("name", &self.name).finish()
    }
}

pub fn uppercase() -> Pipe {
    Pipe::named("uppercase", |value, _| {
        PipeOutcome::Accept(
            value
                .chars()
                .map(|ch| ch.to_uppercase().next().unwrap_or(ch))
                .collect(),
        )
    })
}

pub fn lowercase() -> Pipe {
    Pipe::named("lowercase", |value, _| {
        PipeOutcome::Accept(
            value
                .chars()
                .map(|ch| ch.to_lowercase().next().unwrap_or(ch))
                .collect(),
        )
    })
}

/// Date pipe for masks generated from `format`: a first digit that cannot
/// start a valid field is shifted right behind a `0` (`4` in a month becomes
/// `04`), and impossible values reject the edit. Years are checked digit by
/// digit against `min_year..=max_year` when those differ from the defaults.
pub fn auto_corrected_date(format: &str, min_year: u32, max_year: u32) -> Pipe {
    let mut fields = date::fields(format);
    fields.sort_by_key(|field| field.token.order());
    Pipe::named("auto_corrected_date", move |value, _| {
        correct_date(value, &fields, min_year, max_year)
    })
}

fn correct_date(value: &str, fields: &[DateField], min_year: u32, max_year: u32) -> PipeOutcome {
    let mut chars: Vec<char> = value.chars().collect();
    let mut piped_indexes = Vec::new();

    for field in fields {
        if matches!(field.token, DateToken::Year | DateToken::ShortYear) {
            continue;
        }
        let max_first = leading_digit(field.token.max_value());
        let pos = field.start;
        if let Some(first) = chars.get(pos).and_then(|ch| ch.to_digit(10))
            && first > max_first
        {
            let moved = chars[pos];
            match chars.get_mut(pos + 1) {
                Some(next) => *next = moved,
                None => chars.push(moved),
            }
            chars[pos] = '0';
            piped_indexes.push(pos);
        }
    }

    let bounded_years = min_year != DEFAULT_MIN_YEAR || max_year != DEFAULT_MAX_YEAR;
    let mut year = None;
    let mut month = None;

    for field in fields {
        let len = field.token.len();
        let text: String = chars
            .iter()
            .skip(field.start)
            .take(len)
            .filter(|ch| ch.is_ascii_digit())
            .collect();
        if text.is_empty() {
            continue;
        }
        let value: u32 = text.parse().unwrap_or(0);
        let complete = text.len() == len;

        let invalid = match field.token {
            DateToken::Year if bounded_years => {
                let scoped_min = scoped(min_year, text.len());
                let scoped_max = scoped(max_year, text.len());
                value < scoped_min || value > scoped_max
            }
            DateToken::Day => {
                let max = month.map_or(31, |month| date::days_in_month(year, month));
                value > max || (complete && value < 1)
            }
            token => value > token.max_value() || (complete && value < token.min_value()),
        };
        if invalid {
            log::debug!(target: "steply_mask::pipe", "date pipe rejected `{value}` for {:?}", field.token);
            return PipeOutcome::Reject;
        }

        match field.token {
            DateToken::Year if complete => year = Some(value),
            DateToken::Month if complete => month = Some(value),
            _ => {}
        }
    }

    let value: String = chars.into_iter().collect();
    if piped_indexes.is_empty() {
        PipeOutcome::Accept(value)
    } else {
        PipeOutcome::Modified {
            value,
            piped_indexes,
        }
    }
}

fn leading_digit(value: u32) -> u32 {
    value
        .to_string()
        .chars()
        .next()
        .and_then(|ch| ch.to_digit(10))
        .unwrap_or(9)
}

/// The first `digits` digits of `bound`, e.g. `scoped(2100, 2) == 21`.
fn scoped(bound: u32, digits: usize) -> u32 {
    bound
        .to_string()
        .chars()
        .take(digits)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> PipeContext<'static> {
        PipeContext {
            raw_value: "",
            previous_conformed_value: "",
            placeholder: "",
            placeholder_char: '_',
            caret: 0,
        }
    }

    fn run(pipe: &Pipe, value: &str) -> PipeOutcome {
        pipe.apply(value, &ctx())
    }

    #[test]
    fn month_first_digit_above_one_gets_zero_padded() {
        let pipe = auto_corrected_date("MM/DD/YYYY", DEFAULT_MIN_YEAR, DEFAULT_MAX_YEAR);
        assert_eq!(
            run(&pipe, "4_/__/____"),
            PipeOutcome::Modified {
                value: "04/__/____".to_string(),
                piped_indexes: vec![0],
            }
        );
    }

    #[test]
    fn day_is_padded_and_checked_against_month() {
        let pipe = auto_corrected_date("MM/DD/YYYY", DEFAULT_MIN_YEAR, DEFAULT_MAX_YEAR);
        assert_eq!(
            run(&pipe, "02/5_/____"),
            PipeOutcome::Modified {
                value: "02/05/____".to_string(),
                piped_indexes: vec![3],
            }
        );
        assert_eq!(run(&pipe, "02/30/____"), PipeOutcome::Reject);
        assert_eq!(run(&pipe, "04/31/____"), PipeOutcome::Reject);
        assert_eq!(
            run(&pipe, "02/29/2024"),
            PipeOutcome::Accept("02/29/2024".to_string())
        );
    }

    #[test]
    fn impossible_months_and_zero_fields_are_rejected() {
        let pipe = auto_corrected_date("MM/DD/YYYY", DEFAULT_MIN_YEAR, DEFAULT_MAX_YEAR);
        assert_eq!(run(&pipe, "13/__/____"), PipeOutcome::Reject);
        assert_eq!(run(&pipe, "00/__/____"), PipeOutcome::Reject);
        assert_eq!(run(&pipe, "12/00/____"), PipeOutcome::Reject);
    }

    #[test]
    fn bounded_years_are_checked_per_digit() {
        let pipe = auto_corrected_date("DD.MM.YYYY", 1900, 2100);
        assert_eq!(
            run(&pipe, "01.01.2"),
            PipeOutcome::Accept("01.01.2".to_string())
        );
        assert_eq!(run(&pipe, "01.01.3"), PipeOutcome::Reject);
        assert_eq!(run(&pipe, "01.01.22"), PipeOutcome::Reject);
        assert_eq!(run(&pipe, "01.01.18"), PipeOutcome::Reject);
    }

    #[test]
    fn time_fields_are_checked() {
        let pipe = auto_corrected_date("HH:mm", DEFAULT_MIN_YEAR, DEFAULT_MAX_YEAR);
        assert_eq!(
            run(&pipe, "7"),
            PipeOutcome::Modified {
                value: "07".to_string(),
                piped_indexes: vec![0],
            }
        );
        assert_eq!(run(&pipe, "24:00"), PipeOutcome::Reject);
        assert_eq!(
            run(&pipe, "23:59"),
            PipeOutcome::Accept("23:59".to_string())
        );
    }

    #[test]
    fn case_pipes_keep_length() {
        assert_eq!(
            run(&uppercase(), "ab-c1"),
            PipeOutcome::Accept("AB-C1".to_string())
        );
        assert_eq!(run(&lowercase(), "XY"), PipeOutcome::Accept("xy".to_string()));
        assert_eq!(format!("{:?}", uppercase()), "Pipe { name: \"uppercase\" }");
    }
}
