use super::pipe::Pipe;
use crate::locale::{self, LocaleSymbols};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PLACEHOLDER_CHAR: char = '_';

/// Per-pass configuration. Owned by [`MaskState`](super::MaskState).
#[derive(Debug, Clone)]
pub struct MaskOptions {
    pub guide: bool,
    pub keep_character_positions: bool,
    pub placeholder_char: char,
    /// Show the placeholder instead of an empty string when nothing is typed.
    pub show_mask: bool,
    pub pattern_options: PatternOptions,
    pub pipe: Option<Pipe>,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            guide: true,
            keep_character_positions: false,
            placeholder_char: DEFAULT_PLACEHOLDER_CHAR,
            show_mask: false,
            pattern_options: PatternOptions::default(),
            pipe: None,
        }
    }
}

/// Options read only by the named built-in patterns. Missing or malformed
/// values fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PatternOptions {
    /// Date or time format such as `DD.MM.YYYY` or `HH:mm`.
    pub format: Option<String>,
    pub locale: Option<String>,
    /// Overrides the symbols looked up from `locale`.
    pub symbols: Option<LocaleSymbols>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Use the locale currency sign as the prefix.
    pub currency: bool,
    pub allow_decimal: Option<bool>,
    pub decimal_limit: Option<usize>,
    pub require_decimal: bool,
    pub allow_negative: bool,
    pub allow_leading_zeroes: bool,
    pub integer_limit: Option<usize>,
    pub include_thousands_separator: Option<bool>,
    pub min_year: Option<u32>,
    pub max_year: Option<u32>,
    pub range_separator: Option<String>,
    pub seconds: bool,
}

impl PatternOptions {
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn locale_tag(&self) -> &str {
        self.locale.as_deref().unwrap_or(locale::DEFAULT_LOCALE)
    }

    pub fn symbols(&self) -> LocaleSymbols {
        self.symbols
            .clone()
            .unwrap_or_else(|| locale::symbols_for(self.locale_tag()))
    }

    /// Suffix that must persist once the value has content.
    pub fn persistent_suffix(&self) -> Option<&str> {
        self.suffix.as_deref().filter(|suffix| !suffix.is_empty())
    }
}
