//! Errors reported while applying declarations to computed values.

use thiserror::Error;

/// A declaration that could not be applied.
///
/// Declarations failing to apply are dropped by the cascade; callers log
/// them with `warn_once` and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// The property name is not one this engine computes.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// The property is known but the value does not parse.
    #[error("invalid value '{value}' for property '{property}'")]
    InvalidValue {
        /// Property name as written.
        property: String,
        /// Value text as written.
        value: String,
    },

    /// A selector outside the supported compound-selector subset.
    #[error("unsupported selector '{0}'")]
    InvalidSelector(String),

    /// A style sheet rule without a matching `}`.
    #[error("unterminated rule starting at '{0}'")]
    UnterminatedRule(String),
}
