pub mod date;
mod number;

pub(crate) use number::translate_number;

use super::model::Matcher;
use super::resolver::ResolveContext;

/// Keywords that generate their matcher sequence from pattern options and
/// locale data instead of a fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKind {
    Date,
    Time,
    RangeDate,
    Number,
}

impl NamedKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim() {
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "rangeDate" | "range_date" | "range-date" => Some(Self::RangeDate),
            "number" => Some(Self::Number),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::RangeDate => "rangeDate",
            Self::Number => "number",
        }
    }

    /// Number masks depend on the raw value; the rest only on options.
    pub fn depends_on_input(self) -> bool {
        matches!(self, Self::Number)
    }
}

pub(super) fn generate(kind: NamedKind, raw: &str, ctx: &ResolveContext<'_>) -> Vec<Matcher> {
    match kind {
        NamedKind::Date => date::date_matchers(ctx.options),
        NamedKind::Time => date::time_matchers(ctx.options),
        NamedKind::RangeDate => date::range_date_matchers(ctx.options),
        NamedKind::Number => {
            number::number_matchers(raw, ctx.previous_conformed_value, ctx.options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NamedKind;

    #[test]
    fn keywords_round_trip() {
        for kind in [
            NamedKind::Date,
            NamedKind::Time,
            NamedKind::RangeDate,
            NamedKind::Number,
        ] {
            assert_eq!(NamedKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(NamedKind::from_keyword("range_date"), Some(NamedKind::RangeDate));
        assert_eq!(NamedKind::from_keyword("bogus"), None);
    }
}
