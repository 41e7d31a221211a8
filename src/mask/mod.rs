pub mod builtin;
mod caret;
mod conform;
mod model;
mod options;
mod parser;
pub mod pipe;
pub mod presets;
mod resolver;

pub use builtin::NamedKind;
pub use caret::{CaretArgs, adjust_caret_position};
pub use conform::{ConformContext, Conformed, conform_to_mask};
pub use model::{
    CaseTransform, CharClass, ConformanceResult, MaskSpec, Matcher, Selection, Slot,
};
pub use options::{DEFAULT_PLACEHOLDER_CHAR, MaskOptions, PatternOptions};
pub use parser::{parse_template, parse_template_strict};
pub use pipe::{Pipe, PipeContext, PipeOutcome};
pub use resolver::{Generator, PatternSpec, ResolveContext, resolve};

/// Masking state for one input. The host feeds every edit through
/// [`process`](Self::process) and writes the result back.
#[derive(Debug, Clone, Default)]
pub struct MaskState {
    pattern: Option<PatternSpec>,
    options: MaskOptions,
    cached: Option<MaskSpec>,
    previous_conformed_value: String,
    previous_placeholder: String,
}

impl MaskState {
    pub fn new(pattern: impl Into<PatternSpec>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// A state that never masks; [`process`](Self::process) always returns `None`.
    pub fn unmasked() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: MaskOptions) -> Self {
        self.options = options;
        self.cached = None;
        self
    }

    pub fn with_guide(mut self, guide: bool) -> Self {
        self.options.guide = guide;
        self
    }

    pub fn with_keep_character_positions(mut self, keep: bool) -> Self {
        self.options.keep_character_positions = keep;
        self
    }

    pub fn with_placeholder_char(mut self, placeholder_char: char) -> Self {
        self.options.placeholder_char = placeholder_char;
        self.cached = None;
        self
    }

    pub fn with_show_mask(mut self, show_mask: bool) -> Self {
        self.options.show_mask = show_mask;
        self
    }

    pub fn with_pipe(mut self, pipe: Pipe) -> Self {
        self.options.pipe = Some(pipe);
        self
    }

    pub fn with_pattern_options(mut self, pattern_options: PatternOptions) -> Self {
        self.options.pattern_options = pattern_options;
        self.cached = None;
        self
    }

    pub fn pattern(&self) -> Option<&PatternSpec> {
        self.pattern.as_ref()
    }

    pub fn options(&self) -> &MaskOptions {
        &self.options
    }

    pub fn previous_conformed_value(&self) -> &str {
        self.previous_conformed_value.as_str()
    }

    pub fn previous_placeholder(&self) -> &str {
        self.previous_placeholder.as_str()
    }

    /// Replaces the pattern and forgets everything derived from the old one.
    pub fn set_pattern(&mut self, pattern: Option<PatternSpec>) {
        self.pattern = pattern;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.cached = None;
        self.previous_conformed_value.clear();
        self.previous_placeholder.clear();
    }

    /// Applies new pattern options (after a locale change, say) and re-fits
    /// the current value under them. Numbers are first rewritten from the old
    /// symbols into the new ones so grouping is not read as a decimal point.
    pub fn refresh(&mut self, pattern_options: PatternOptions) -> Option<ConformanceResult> {
        let previous_options =
            std::mem::replace(&mut self.options.pattern_options, pattern_options);
        let mut current = std::mem::take(&mut self.previous_conformed_value);
        self.reset();
        if current.is_empty() {
            return None;
        }
        if matches!(self.pattern, Some(PatternSpec::Named(NamedKind::Number))) {
            current = builtin::translate_number(
                current.as_str(),
                &previous_options,
                &self.options.pattern_options,
            );
        }
        let end = current.chars().count();
        self.process(current.as_str(), Selection::caret(end))
    }

    /// Runs one conformance pass over `raw`.
    ///
    /// Returns `None` when there is no pattern or `raw` is exactly the value
    /// the previous pass produced, which keeps host write-backs from looping.
    ///
    /// # Panics
    ///
    /// When `selection` does not lie within `raw`. That is a host bug, not an
    /// input edge case.
    pub fn process(&mut self, raw: &str, selection: Selection) -> Option<ConformanceResult> {
        let raw_len = raw.chars().count();
        assert!(
            selection.start <= selection.end && selection.end <= raw_len,
            "selection {}..{} outside raw value of {raw_len} chars",
            selection.start,
            selection.end,
        );

        let pattern = self.pattern.as_ref()?;
        if raw == self.previous_conformed_value {
            return None;
        }

        let placeholder_char = self.options.placeholder_char;
        let caret = selection.end;
        let spec = if let Some(spec) = self.cached.clone() {
            spec
        } else {
            let ctx = ResolveContext {
                options: &self.options.pattern_options,
                caret,
                previous_conformed_value: self.previous_conformed_value.as_str(),
                placeholder_char,
            };
            let spec = resolve(pattern, raw, &ctx);
            if pattern.is_cacheable() {
                self.cached = Some(spec.clone());
            }
            spec
        };

        if spec.is_empty() {
            log::trace!(target: "steply_mask::state", "no matchers, passing `{raw}` through");
            self.previous_conformed_value = raw.to_string();
            self.previous_placeholder.clear();
            return Some(ConformanceResult {
                conformed_value: raw.to_string(),
                placeholder: String::new(),
                piped_value: None,
                caret_pos: caret,
                caret_trap_indexes: Vec::new(),
                rejected: false,
                pipe_rejected: false,
            });
        }

        let conformed = conform_to_mask(
            raw,
            &spec,
            &ConformContext {
                previous_conformed_value: self.previous_conformed_value.as_str(),
                caret,
                guide: self.options.guide,
                keep_character_positions: self.options.keep_character_positions,
                placeholder_char,
            },
        );

        let mut value = conformed.value;
        let mut piped_value = None;
        let mut piped_indexes = Vec::new();
        let mut pipe_rejected = false;
        if let Some(pipe) = &self.options.pipe {
            let ctx = PipeContext {
                raw_value: raw,
                previous_conformed_value: self.previous_conformed_value.as_str(),
                placeholder: conformed.placeholder.as_str(),
                placeholder_char,
                caret,
            };
            match pipe.apply(value.as_str(), &ctx) {
                PipeOutcome::Accept(piped) => {
                    piped_value = Some(piped.clone());
                    value = piped;
                }
                PipeOutcome::Modified {
                    value: piped,
                    piped_indexes: indexes,
                } => {
                    piped_value = Some(piped.clone());
                    piped_indexes = indexes;
                    value = piped;
                }
                PipeOutcome::Reject => {
                    log::debug!(target: "steply_mask::state", "pipe `{}` rejected `{value}`", pipe.name());
                    pipe_rejected = true;
                    value = self.previous_conformed_value.clone();
                }
            }
        }

        let mut caret_pos = adjust_caret_position(&CaretArgs {
            raw_value: raw,
            conformed_value: value.as_str(),
            placeholder: conformed.placeholder.as_str(),
            previous_placeholder: self.previous_placeholder.as_str(),
            previous_conformed_value: self.previous_conformed_value.as_str(),
            current_caret_position: caret,
            placeholder_char,
            indexes_of_piped_chars: piped_indexes.as_slice(),
            caret_trap_indexes: spec.caret_traps(),
        });

        if value == conformed.placeholder && caret_pos == 0 {
            value = if self.options.show_mask {
                conformed.placeholder.clone()
            } else {
                String::new()
            };
        }

        if let Some(suffix) = self.options.pattern_options.persistent_suffix()
            && !value.is_empty()
            && !value.ends_with(suffix)
        {
            value.push_str(suffix);
        }
        caret_pos = caret_pos.min(value.chars().count());

        log::trace!(target: "steply_mask::state", "`{raw}` -> `{value}` caret {caret_pos}");
        self.previous_conformed_value = value.clone();
        self.previous_placeholder = conformed.placeholder.clone();

        Some(ConformanceResult {
            conformed_value: value,
            placeholder: conformed.placeholder,
            piped_value,
            caret_pos,
            caret_trap_indexes: spec.caret_traps().to_vec(),
            rejected: conformed.rejected,
            pipe_rejected,
        })
    }
}
