//! The deduplicating style registry.
//!
//! Component factories re-run on every re-render of dynamic content — chat
//! feeds, result rows, menu items — and each run re-declares the styles it
//! needs. The registry guarantees each distinct declaration materializes
//! into the document stylesheet exactly once: the first registration for an
//! identity inserts its rules, every later one is a pure cache hit.
//!
//! # Example
//!
//! ```rust
//! use selvage::{Declarations, RuleSet, StyleRegistry};
//!
//! let registry = StyleRegistry::new();
//! let fg = registry.declare_themed("c-foreground", "rgb(0, 0, 0)", "rgb(244, 255, 255)");
//!
//! let spinner = registry
//!     .register(RuleSet::new().rule(
//!         "",
//!         Declarations::new()
//!             .set("border", format!("0.06cm solid {}", fg))
//!             .set("width", "0.5cm")
//!             .set("height", "0.5cm"),
//!     ))
//!     .unwrap();
//!
//! // The rule is in the sheet before `register` returns; attaching the
//! // class to an element is immediately safe.
//! assert!(registry.has_rule(&format!(".{}", spinner)));
//! ```
//!
//! # First registration wins
//!
//! The cache key is the call-site identity, not the ruleset. Registering a
//! *different* ruleset under an identity that is already cached returns the
//! cached class and ignores the new declarations. This is the documented
//! hazard of line-derived identity: two logical rule sets on one source line
//! need discriminators ([`StyleRegistry::register_with`]) to stay distinct.

use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

use crate::error::StyleError;
use crate::identity::Identity;
use crate::mode::{detect_color_mode, ColorMode};
use crate::sheet::{Declarations, Sheet, StyleRule};
use crate::theme::{VarManifest, VarRef, VarValue};

/// A class name issued by the registry.
///
/// Stable for a fixed identity across the registry's lifetime. Displays as
/// the bare class (no leading dot), ready for a class list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName {
    name: String,
}

impl ClassName {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the class name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl From<ClassName> for String {
    fn from(class: ClassName) -> Self {
        class.name
    }
}

/// The declarative input to [`StyleRegistry::register`]: selector suffixes
/// mapped to declaration blocks.
///
/// The empty suffix addresses the class itself; any other suffix is appended
/// verbatim to the class selector (`>span`, `:hover`, `[open]>summary`, …).
/// Declarations are computed before insertion — no live style handle is
/// exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    entries: Vec<(String, Declarations)>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a rule set with only the base (empty-suffix) rule.
    pub fn base(declarations: Declarations) -> Self {
        Self::new().rule("", declarations)
    }

    /// Adds a suffix → declarations entry. Returns self for chaining.
    ///
    /// Adding the same suffix twice keeps both entries; they become separate
    /// rules in declaration order, as a stylesheet would hold them.
    pub fn rule(mut self, suffix: impl Into<String>, declarations: Declarations) -> Self {
        self.entries.push((suffix.into(), declarations));
        self
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the rule set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Structural utility class: vertical flex stack.
pub const VBOX: &str = "vbox";
/// Structural utility class: horizontal flex row.
pub const HBOX: &str = "hbox";
/// Structural utility class: overlay grid, all children in one cell.
pub const STACK: &str = "stack";
/// Structural utility class: layout-transparent grouping.
pub const GROUP: &str = "group";

struct RegistryInner {
    sheet: Sheet,
    issued: HashSet<String>,
}

/// The process-wide style registry.
///
/// Explicitly constructed and passed to component factories (no implicit
/// singleton), so tests get a fresh registry each. Internally the sheet and
/// cache sit behind a mutex: the browser-like execution model has a single
/// writer anyway, and the lock keeps that invariant if a host ever calls in
/// from more than one thread. No suspension point exists inside any method,
/// so a registration is atomic with respect to other registry calls.
pub struct StyleRegistry {
    inner: Mutex<RegistryInner>,
}

impl StyleRegistry {
    /// Creates a registry with an empty sheet and the structural utility
    /// classes ([`VBOX`], [`HBOX`], [`STACK`], [`GROUP`]) pre-registered.
    pub fn new() -> Self {
        let mut inner = RegistryInner {
            sheet: Sheet::new(),
            issued: HashSet::new(),
        };
        for (name, rules) in [
            (
                VBOX,
                RuleSet::base(
                    Declarations::new()
                        .set("display", "flex")
                        .set("flex-direction", "column"),
                ),
            ),
            (
                HBOX,
                RuleSet::base(
                    Declarations::new()
                        .set("display", "flex")
                        .set("flex-direction", "row"),
                ),
            ),
            (
                STACK,
                RuleSet::new()
                    .rule("", Declarations::new().set("display", "grid"))
                    .rule(
                        ">*",
                        Declarations::new().set("grid-column", "1").set("grid-row", "1"),
                    ),
            ),
            (GROUP, RuleSet::base(Declarations::new().set("display", "contents"))),
        ] {
            insert_rules(&mut inner, name, rules);
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Registers a rule set under this call site's identity.
    ///
    /// Returns the class name whose rules are guaranteed present in the
    /// sheet before this method returns. A repeated call from the same
    /// source line is a pure cache hit: same class, no sheet mutation —
    /// even if the ruleset differs (first registration wins, see the module
    /// docs).
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::EmptyRuleSet`] for a rule set with no entries;
    /// an empty registration is a factory defect, never a silent no-op.
    #[track_caller]
    pub fn register(&self, rules: RuleSet) -> Result<ClassName, StyleError> {
        self.register_identity(Identity::from_call_site(), rules)
    }

    /// Registers a rule set under this call site's identity extended with
    /// discriminators.
    ///
    /// Use discriminators when one source line produces value-dependent rule
    /// sets (put every closed-over argument in the list), or deliberately,
    /// from a shared helper, to issue one class across many call sites.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::EmptyRuleSet`] for a rule set with no entries.
    #[track_caller]
    pub fn register_with(
        &self,
        discriminators: &[&str],
        rules: RuleSet,
    ) -> Result<ClassName, StyleError> {
        self.register_identity(Identity::from_call_site_with(discriminators), rules)
    }

    fn register_identity(
        &self,
        identity: Identity,
        rules: RuleSet,
    ) -> Result<ClassName, StyleError> {
        if rules.is_empty() {
            return Err(StyleError::EmptyRuleSet);
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.issued.contains(identity.as_str()) {
            return Ok(ClassName::new(identity.as_str()));
        }
        insert_rules(&mut inner, identity.as_str(), rules);
        Ok(ClassName::new(identity.as_str()))
    }

    /// Returns the vertical flex stack utility class.
    pub fn vbox(&self) -> ClassName {
        ClassName::new(VBOX)
    }

    /// Returns the horizontal flex row utility class.
    pub fn hbox(&self) -> ClassName {
        ClassName::new(HBOX)
    }

    /// Returns the overlay grid utility class.
    pub fn stack(&self) -> ClassName {
        ClassName::new(STACK)
    }

    /// Returns the layout-transparent grouping utility class.
    pub fn group(&self) -> ClassName {
        ClassName::new(GROUP)
    }

    /// Declares a theme-agnostic variable in the root rule.
    ///
    /// Idempotent by construction: re-declaring an id overwrites its value
    /// in place, so no caching is involved.
    pub fn declare_const(&self, id: &str, value: &str) -> VarRef {
        let var = VarRef::new(id);
        self.inner
            .lock()
            .unwrap()
            .sheet
            .set_root(var.name(), value);
        var
    }

    /// Declares a variable with a light/dark value pair.
    ///
    /// Both conditional rules receive an entry under the same name; the
    /// returned reference resolves per the platform's reported preference at
    /// paint time, so a preference change needs no re-render.
    pub fn declare_themed(&self, id: &str, light: &str, dark: &str) -> VarRef {
        let var = VarRef::new(id);
        let mut inner = self.inner.lock().unwrap();
        inner.sheet.set_light(var.name(), light);
        inner.sheet.set_dark(var.name(), dark);
        var
    }

    /// Declares every entry of a manifest, in manifest order.
    ///
    /// Returns `(name, reference)` pairs in the same order.
    pub fn declare_manifest(&self, manifest: &VarManifest) -> Vec<(String, VarRef)> {
        manifest
            .entries()
            .map(|(name, value)| {
                let var = match value {
                    VarValue::Constant(v) => self.declare_const(name, v),
                    VarValue::Themed { light, dark } => self.declare_themed(name, light, dark),
                };
                (name.to_string(), var)
            })
            .collect()
    }

    /// Returns the number of class rules in the sheet.
    pub fn rule_count(&self) -> usize {
        self.inner.lock().unwrap().sheet.rule_count()
    }

    /// Returns true if a class rule with exactly this selector exists.
    pub fn has_rule(&self, selector: &str) -> bool {
        self.inner.lock().unwrap().sheet.rule(selector).is_some()
    }

    /// Returns a copy of the declarations for the rule with this selector.
    pub fn rule_declarations(&self, selector: &str) -> Option<Declarations> {
        self.inner
            .lock()
            .unwrap()
            .sheet
            .rule(selector)
            .map(StyleRule::declarations)
            .cloned()
    }

    /// Reads a custom property from the unconditional root rule.
    pub fn custom_property(&self, name: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .sheet
            .custom_property(name)
            .map(str::to_string)
    }

    /// Resolves a variable reference under a simulated preference.
    pub fn resolve_var(&self, var: &VarRef, mode: ColorMode) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .sheet
            .resolve_custom_property(var.name(), mode)
            .map(str::to_string)
    }

    /// Resolves a variable reference under the detected preference.
    pub fn resolve_var_detected(&self, var: &VarRef) -> Option<String> {
        self.resolve_var(var, detect_color_mode())
    }

    /// Serializes the current sheet to CSS text for the external renderer.
    pub fn to_css_string(&self) -> String {
        self.inner.lock().unwrap().sheet.to_css_string()
    }

    /// Returns a point-in-time copy of the sheet.
    pub fn sheet_snapshot(&self) -> Sheet {
        self.inner.lock().unwrap().sheet.clone()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("StyleRegistry")
            .field("rule_count", &inner.sheet.rule_count())
            .field("issued", &inner.issued.len())
            .finish()
    }
}

/// Inserts each `(suffix, declarations)` entry at the front of the sheet and
/// marks the class issued. Selector-side class text is escaped; the class
/// name handed to callers stays raw for class lists.
fn insert_rules(inner: &mut RegistryInner, class: &str, rules: RuleSet) {
    let mut escaped = String::new();
    // Writing into a String cannot fail.
    let _ = cssparser::serialize_identifier(class, &mut escaped);
    for (suffix, declarations) in rules.entries {
        inner
            .sheet
            .insert_front(format!(".{}{}", escaped, suffix), declarations);
    }
    inner.issued.insert(class.to_string());
}
