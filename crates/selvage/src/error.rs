//! Error types for the style core.
//!
//! Everything here marks a programmer error in a component factory (empty
//! rulesets, malformed manifests, bad fragment literals), not a runtime
//! condition. The core never catches these; they propagate to whatever
//! initiated the current render pass.

use std::fmt;
use std::path::PathBuf;

use selvage_markup::MarkupError;

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// A registration was attempted with no selector/declaration entries.
    EmptyRuleSet,

    /// A variable manifest could not be loaded or parsed.
    Theme(ThemeError),

    /// A markup fragment used by the core failed to parse.
    Markup(MarkupError),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::EmptyRuleSet => {
                write!(f, "cannot register a rule set with no entries")
            }
            StyleError::Theme(err) => write!(f, "theme error: {}", err),
            StyleError::Markup(err) => write!(f, "markup error: {}", err),
        }
    }
}

impl std::error::Error for StyleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StyleError::Theme(err) => Some(err),
            StyleError::Markup(err) => Some(err),
            StyleError::EmptyRuleSet => None,
        }
    }
}

impl From<ThemeError> for StyleError {
    fn from(err: ThemeError) -> Self {
        StyleError::Theme(err)
    }
}

impl From<MarkupError> for StyleError {
    fn from(err: MarkupError) -> Self {
        StyleError::Markup(err)
    }
}

/// Error type for variable-manifest parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// YAML parse error.
    Parse {
        /// Optional source file path.
        path: Option<PathBuf>,
        /// Error message from the YAML parser.
        message: String,
    },

    /// A themed entry is missing one of its two value slots.
    MissingVariant {
        /// Variable name where the error occurred.
        name: String,
        /// Which slot is absent, `"light"` or `"dark"`.
        missing: &'static str,
    },

    /// An entry has a shape that is neither a constant nor a light/dark pair.
    InvalidEntry {
        /// Variable name where the error occurred.
        name: String,
        /// Description of what was wrong.
        message: String,
    },

    /// File loading error.
    Load {
        /// Error message from the file loader.
        message: String,
    },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::Parse { path, message } => {
                if let Some(p) = path {
                    write!(f, "failed to parse manifest {}: {}", p.display(), message)
                } else {
                    write!(f, "failed to parse manifest: {}", message)
                }
            }
            ThemeError::MissingVariant { name, missing } => {
                write!(f, "variable '{}' is missing its '{}' value", name, missing)
            }
            ThemeError::InvalidEntry { name, message } => {
                write!(f, "invalid entry for variable '{}': {}", name, message)
            }
            ThemeError::Load { message } => {
                write!(f, "failed to load manifest: {}", message)
            }
        }
    }
}

impl std::error::Error for ThemeError {}
