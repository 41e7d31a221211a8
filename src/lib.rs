pub mod config;
pub mod error;
pub mod field;
pub mod locale;
pub mod mask;
pub mod terminal;
pub mod text_edit;

pub use config::MaskConfig;
pub use error::MaskError;
pub use field::MaskedField;
pub use mask::{ConformanceResult, MaskOptions, MaskState, PatternOptions, PatternSpec, Selection};
