//! Locale symbols consumed by the named built-in patterns.
//!
//! The table is immutable and keyed by BCP 47 style tags. Lookups normalize
//! `de_DE` / `DE-de` to `de-DE`, fall back from a regional tag to the first
//! entry sharing its language, and finally to [`DEFAULT_LOCALE`].

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocaleSymbols {
    pub decimal: char,
    pub thousands: char,
    pub negative: char,
    pub currency: String,
}

#[derive(Debug, Clone)]
struct LocaleEntry {
    symbols: LocaleSymbols,
    short_date: &'static str,
}

fn entry(
    decimal: char,
    thousands: char,
    negative: char,
    currency: &str,
    short_date: &'static str,
) -> LocaleEntry {
    LocaleEntry {
        symbols: LocaleSymbols {
            decimal,
            thousands,
            negative,
            currency: currency.to_string(),
        },
        short_date,
    }
}

static LOCALES: LazyLock<IndexMap<&'static str, LocaleEntry>> = LazyLock::new(|| {
    let mut table = IndexMap::new();
    table.insert("en-US", entry('.', ',', '-', "$", "MM/DD/YYYY"));
    table.insert("en-GB", entry('.', ',', '-', "£", "DD/MM/YYYY"));
    table.insert("de-DE", entry(',', '.', '-', "€", "DD.MM.YYYY"));
    table.insert("de-CH", entry('.', '’', '-', "CHF", "DD.MM.YYYY"));
    table.insert("fr-FR", entry(',', '\u{202f}', '-', "€", "DD/MM/YYYY"));
    table.insert("es-ES", entry(',', '.', '-', "€", "DD/MM/YYYY"));
    table.insert("it-IT", entry(',', '.', '-', "€", "DD/MM/YYYY"));
    table.insert("nl-NL", entry(',', '.', '-', "€", "DD-MM-YYYY"));
    table.insert("pt-BR", entry(',', '.', '-', "R$", "DD/MM/YYYY"));
    table.insert("ru-RU", entry(',', '\u{a0}', '-', "₽", "DD.MM.YYYY"));
    table.insert("sv-SE", entry(',', '\u{a0}', '\u{2212}', "kr", "YYYY-MM-DD"));
    table.insert("ja-JP", entry('.', ',', '-', "¥", "YYYY/MM/DD"));
    table.insert("zh-CN", entry('.', ',', '-', "¥", "YYYY/MM/DD"));
    table
});

pub fn symbols_for(tag: &str) -> LocaleSymbols {
    lookup(tag).symbols.clone()
}

pub fn short_date_format(tag: &str) -> &'static str {
    lookup(tag).short_date
}

pub fn known_locales() -> impl Iterator<Item = &'static str> {
    LOCALES.keys().copied()
}

fn lookup(tag: &str) -> &'static LocaleEntry {
    let (language, region) = normalize_tag(tag);

    if let Some(region) = region.as_deref() {
        let key = format!("{language}-{region}");
        if let Some(found) = LOCALES.get(key.as_str()) {
            return found;
        }
    }

    LOCALES
        .iter()
        .find(|(key, _)| key.split('-').next() == Some(language.as_str()))
        .map(|(_, found)| found)
        .unwrap_or_else(|| {
            log::debug!(target: "steply_mask::locale", "no locale data for `{tag}`, using {DEFAULT_LOCALE}");
            &LOCALES[DEFAULT_LOCALE]
        })
}

fn normalize_tag(tag: &str) -> (String, Option<String>) {
    let normalized = tag.trim().replace('_', "-");
    let mut parts = normalized.split('-').filter(|part| !part.is_empty());
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts
        .find(|part| part.len() == 2 && part.chars().all(|ch| ch.is_ascii_alphabetic()))
        .map(str::to_ascii_uppercase);
    (language, region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tags_resolve() {
        let de = symbols_for("de-DE");
        assert_eq!(de.decimal, ',');
        assert_eq!(de.thousands, '.');
        assert_eq!(de.currency, "€");
        assert_eq!(short_date_format("ja-JP"), "YYYY/MM/DD");
    }

    #[test]
    fn tags_are_normalized_before_lookup() {
        assert_eq!(short_date_format("en_gb"), "DD/MM/YYYY");
        assert_eq!(symbols_for("PT-br").currency, "R$");
    }

    #[test]
    fn language_only_and_unknown_regions_fall_back_to_language() {
        assert_eq!(short_date_format("en"), "MM/DD/YYYY");
        assert_eq!(symbols_for("de-AT").decimal, ',');
        assert_eq!(short_date_format("sv"), "YYYY-MM-DD");
    }

    #[test]
    fn unknown_languages_use_default_locale() {
        assert_eq!(symbols_for("xx-YY"), symbols_for(DEFAULT_LOCALE));
        assert_eq!(short_date_format(""), "MM/DD/YYYY");
    }

    #[test]
    fn known_locales_keep_insertion_order() {
        let locales: Vec<&str> = known_locales().take(3).collect();
        assert_eq!(locales, vec!["en-US", "en-GB", "de-DE"]);
    }
}
