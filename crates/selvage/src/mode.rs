//! Color-scheme preference detection.
//!
//! The registry never tracks a "current theme": themed variables carry both
//! values and the platform's media evaluation picks one at paint time.
//! Detection here exists for the read side — resolving what a variable
//! reference *would* evaluate to under a given preference, and letting tests
//! simulate one.
//!
//! ```rust
//! use selvage::{set_mode_detector, ColorMode};
//!
//! // Force dark mode for a test.
//! set_mode_detector(|| ColorMode::Dark);
//! ```

use once_cell::sync::Lazy;
use std::sync::Mutex;

/// The user's preferred color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Light preference (light background, dark text).
    Light,
    /// Dark preference, or any preference that is not light.
    Dark,
}

type ModeDetector = fn() -> ColorMode;

static MODE_DETECTOR: Lazy<Mutex<ModeDetector>> = Lazy::new(|| Mutex::new(os_mode_detector));

/// Overrides the preference detector, typically to simulate a mode in tests.
///
/// Tests that rely on this should restore their changes (or run serialized),
/// since the detector is process-wide.
pub fn set_mode_detector(detector: ModeDetector) {
    let mut guard = MODE_DETECTOR.lock().unwrap();
    *guard = detector;
}

/// Returns the user's preferred color scheme.
///
/// Queries the OS through the `dark-light` crate unless a detector override
/// is installed via [`set_mode_detector`]. An unreported or unknown
/// preference counts as light, matching how the negated light media
/// condition behaves.
pub fn detect_color_mode() -> ColorMode {
    let detector = MODE_DETECTOR.lock().unwrap();
    (*detector)()
}

fn os_mode_detector() -> ColorMode {
    match dark_light::detect() {
        Ok(dark_light::Mode::Dark) => ColorMode::Dark,
        _ => ColorMode::Light,
    }
}
