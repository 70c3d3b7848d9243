//! Errors raised while turning raw tokens into a `ParsedOptions` bag.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("option '{0}' expects an argument")]
    MissingArgument(String),

    #[error("invalid value '{value}' for option '{option}'")]
    InvalidArgumentValue { option: String, value: String },
}
