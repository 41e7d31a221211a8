use crate::error::MaskError;
use crate::mask::builtin::date;
use crate::mask::{
    DEFAULT_PLACEHOLDER_CHAR, MaskOptions, MaskState, PatternOptions, PatternSpec, Pipe,
    parse_template_strict, pipe, presets,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the pattern comes from. Exactly one key is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PatternConfig {
    /// One of the built-in presets, e.g. `phone_us`.
    Preset(String),
    /// A named generator: `date`, `time`, `rangeDate` or `number`.
    Keyword(String),
    /// A compact template such as `(###) ###-####`.
    Template(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipeConfig {
    Uppercase,
    Lowercase,
    AutoCorrectedDate {
        #[serde(default)]
        format: Option<String>,
        #[serde(default)]
        min_year: Option<u32>,
        #[serde(default)]
        max_year: Option<u32>,
    },
}

impl PipeConfig {
    fn build(&self, options: &PatternOptions) -> Pipe {
        match self {
            Self::Uppercase => pipe::uppercase(),
            Self::Lowercase => pipe::lowercase(),
            Self::AutoCorrectedDate {
                format,
                min_year,
                max_year,
            } => {
                let format = format
                    .clone()
                    .unwrap_or_else(|| date::date_format(options));
                pipe::auto_corrected_date(
                    format.as_str(),
                    min_year.or(options.min_year).unwrap_or(pipe::DEFAULT_MIN_YEAR),
                    max_year.or(options.max_year).unwrap_or(pipe::DEFAULT_MAX_YEAR),
                )
            }
        }
    }
}

/// Declarative mask setup, loadable from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MaskConfig {
    #[serde(with = "serde_yaml::with::singleton_map")]
    #[schemars(with = "PatternConfig")]
    pub pattern: PatternConfig,
    #[serde(default = "default_guide")]
    pub guide: bool,
    #[serde(default)]
    pub keep_character_positions: bool,
    #[serde(default = "default_placeholder_char")]
    pub placeholder_char: char,
    #[serde(default)]
    pub show_mask: bool,
    #[serde(default)]
    pub options: PatternOptions,
    #[serde(default)]
    pub pipe: Option<PipeConfig>,
}

fn default_guide() -> bool {
    true
}

fn default_placeholder_char() -> char {
    DEFAULT_PLACEHOLDER_CHAR
}

impl MaskConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, MaskError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, MaskError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads `path`; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, MaskError> {
        let text = std::fs::read_to_string(path).map_err(|source| MaskError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        log::debug!(target: "steply_mask::config", "loading mask config from {}", path.display());
        if is_json {
            Self::from_json_str(text.as_str())
        } else {
            Self::from_yaml_str(text.as_str())
        }
    }

    /// Builds the state, validating templates strictly. Unknown keywords are
    /// kept and degrade to pass-through at runtime.
    pub fn into_state(self) -> Result<MaskState, MaskError> {
        let pattern = match &self.pattern {
            PatternConfig::Preset(name) => {
                presets::preset(name).ok_or_else(|| MaskError::UnknownPreset(name.clone()))?
            }
            PatternConfig::Keyword(keyword) => PatternSpec::keyword(keyword),
            PatternConfig::Template(template) => {
                let spec = parse_template_strict(template)?;
                if let Some(ch) = spec.literal_collision(self.placeholder_char) {
                    return Err(MaskError::PlaceholderCollision(ch));
                }
                PatternSpec::template(template.clone())
            }
        };

        let pipe = self.pipe.as_ref().map(|pipe| pipe.build(&self.options));
        let options = MaskOptions {
            guide: self.guide,
            keep_character_positions: self.keep_character_positions,
            placeholder_char: self.placeholder_char,
            show_mask: self.show_mask,
            pattern_options: self.options,
            pipe,
        };
        Ok(MaskState::new(pattern).with_options(options))
    }

    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(MaskConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }
}
