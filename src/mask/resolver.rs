use super::builtin::{self, NamedKind};
use super::model::{MaskSpec, Matcher};
use super::options::PatternOptions;
use super::parser;
use std::fmt;
use std::sync::Arc;

/// What a generator sees when it builds the matcher sequence for a pass.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub options: &'a PatternOptions,
    pub caret: usize,
    pub previous_conformed_value: &'a str,
    pub placeholder_char: char,
}

type GeneratorFn = dyn Fn(&str, &ResolveContext<'_>) -> Vec<Matcher> + Send + Sync;

/// A function producing the matcher sequence from the raw value. May return
/// [`Matcher::CaretTrap`] markers.
#[derive(Clone)]
pub struct Generator(Arc<GeneratorFn>);

impl Generator {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&str, &ResolveContext<'_>) -> Vec<Matcher> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    pub fn generate(&self, raw: &str, ctx: &ResolveContext<'_>) -> Vec<Matcher> {
        (self.0)(raw, ctx)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Generator(..)")
    }
}

#[derive(Debug, Clone)]
pub enum PatternSpec {
    Static(Vec<Matcher>),
    Template(String),
    Named(NamedKind),
    Dynamic(Generator),
    /// A keyword nothing knows how to build. Resolves to pass-through.
    Unknown(String),
}

impl PatternSpec {
    pub fn keyword(keyword: &str) -> Self {
        NamedKind::from_keyword(keyword)
            .map(Self::Named)
            .unwrap_or_else(|| Self::Unknown(keyword.to_string()))
    }

    pub fn template(template: impl Into<String>) -> Self {
        Self::Template(template.into())
    }

    pub fn dynamic<F>(func: F) -> Self
    where
        F: Fn(&str, &ResolveContext<'_>) -> Vec<Matcher> + Send + Sync + 'static,
    {
        Self::Dynamic(Generator::new(func))
    }

    /// The resolved sequence depends only on the pattern and its options, so
    /// it can be cached between passes.
    pub fn is_cacheable(&self) -> bool {
        match self {
            Self::Static(_) | Self::Template(_) | Self::Unknown(_) => true,
            Self::Named(kind) => !kind.depends_on_input(),
            Self::Dynamic(_) => false,
        }
    }
}

impl From<Vec<Matcher>> for PatternSpec {
    fn from(matchers: Vec<Matcher>) -> Self {
        Self::Static(matchers)
    }
}

impl From<NamedKind> for PatternSpec {
    fn from(kind: NamedKind) -> Self {
        Self::Named(kind)
    }
}

/// Normalizes any pattern into a [`MaskSpec`]. Never fails: anything that
/// cannot be resolved becomes an empty spec, which conformance treats as
/// "no masking".
pub fn resolve(pattern: &PatternSpec, raw: &str, ctx: &ResolveContext<'_>) -> MaskSpec {
    let spec = match pattern {
        PatternSpec::Static(matchers) => MaskSpec::from_matchers(matchers.clone()),
        PatternSpec::Template(template) => parser::parse_template(template),
        PatternSpec::Named(kind) => MaskSpec::from_matchers(builtin::generate(*kind, raw, ctx)),
        PatternSpec::Dynamic(generator) => MaskSpec::from_matchers(generator.generate(raw, ctx)),
        PatternSpec::Unknown(keyword) => {
            log::warn!(target: "steply_mask::resolver", "unknown mask keyword `{keyword}`, masking disabled");
            return MaskSpec::empty();
        }
    };

    if let Some(ch) = spec.literal_collision(ctx.placeholder_char) {
        log::warn!(
            target: "steply_mask::resolver",
            "mask literal `{ch}` equals the placeholder character, masking disabled"
        );
        return MaskSpec::empty();
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(options: &PatternOptions) -> ResolveContext<'_> {
        ResolveContext {
            options,
            caret: 0,
            previous_conformed_value: "",
            placeholder_char: '_',
        }
    }

    #[test]
    fn static_sequences_resolve_unchanged() {
        let options = PatternOptions::default();
        let matchers = vec![Matcher::digit(), Matcher::literal('-'), Matcher::digit()];
        let spec = resolve(&PatternSpec::from(matchers.clone()), "", &ctx(&options));
        assert_eq!(spec.matchers(), matchers.as_slice());
    }

    #[test]
    fn named_keywords_use_pattern_options() {
        let options = PatternOptions::default().with_locale("de-DE");
        let spec = resolve(&PatternSpec::keyword("date"), "", &ctx(&options));
        assert_eq!(spec.template('_'), "DD.MM.YYYY");
    }

    #[test]
    fn dynamic_generators_see_the_raw_value() {
        let options = PatternOptions::default();
        let pattern = PatternSpec::dynamic(|raw, _| {
            raw.chars().map(|_| Matcher::alpha()).collect()
        });
        let spec = resolve(&pattern, "abc", &ctx(&options));
        assert_eq!(spec.len(), 3);
        assert!(!pattern.is_cacheable());
    }

    #[test]
    fn unknown_keyword_is_pass_through() {
        let options = PatternOptions::default();
        let spec = resolve(&PatternSpec::keyword("bogus"), "abc", &ctx(&options));
        assert!(spec.is_empty());
    }

    #[test]
    fn placeholder_collision_disables_masking() {
        let options = PatternOptions::default();
        let pattern = PatternSpec::from(vec![Matcher::digit(), Matcher::literal('_')]);
        assert!(resolve(&pattern, "", &ctx(&options)).is_empty());
    }

    #[test]
    fn cacheability_follows_input_dependence() {
        assert!(PatternSpec::keyword("date").is_cacheable());
        assert!(!PatternSpec::keyword("number").is_cacheable());
        assert!(PatternSpec::template("###").is_cacheable());
    }
}
