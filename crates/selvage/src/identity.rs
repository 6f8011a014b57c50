//! Call-site identity for style registrations.
//!
//! Component factories run on every re-render, so the registry needs a key
//! that is stable across repeated invocations from the same place without
//! making every factory invent one. The identity is derived from the source
//! line of the registration call's direct caller, captured through
//! `#[track_caller]`, plus any caller-supplied discriminator strings.
//!
//! The derived token doubles as the issued class name: `r{line}` for a bare
//! registration, `r{line}_{d1}_{d2}` with discriminators.
//!
//! Two registrations on the same physical line with no discriminators share
//! one identity — the second ruleset is silently ignored because the first is
//! cached. That collapse is also the feature: a shared helper that registers
//! with a fixed discriminator list issues one class from every call site that
//! uses it.

use std::fmt;
use std::panic::Location;

/// A derived registration identity.
///
/// Stable across the process lifetime for a fixed call site and
/// discriminator list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    token: String,
}

impl Identity {
    /// Derives an identity from the caller's source line.
    #[track_caller]
    pub fn from_call_site() -> Self {
        Self::from_call_site_with(&[])
    }

    /// Derives an identity from the caller's source line plus discriminators,
    /// appended in the order given.
    #[track_caller]
    pub fn from_call_site_with(discriminators: &[&str]) -> Self {
        let line = Location::caller().line();
        let mut token = format!("r{}", line);
        for discriminator in discriminators {
            token.push('_');
            token.push_str(discriminator);
        }
        Self { token }
    }

    /// Returns the identity token (also the class name it will issue).
    pub fn as_str(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}
