//! The in-memory document stylesheet.
//!
//! A [`Sheet`] models the single mutable stylesheet the registry owns for the
//! lifetime of the document: an ordered list of class rules plus the theme
//! rule triple — one unconditional `:root` block and one `:root` block under
//! each of the two color-scheme media conditions.
//!
//! Class rules are inserted at the *front* of the list. Later-declared
//! utility rules therefore never win an order tie against earlier component
//! rules; callers rely on selector specificity, not declaration order.
//!
//! The sheet is plain data. The registry is its only writer; the external
//! renderer reads it (usually through [`Sheet::to_css_string`]).

use std::fmt::Write as _;

use crate::mode::ColorMode;

/// Media condition for the light theme block.
pub const LIGHT_CONDITION: &str = "(prefers-color-scheme: light)";

/// Media condition for the dark theme block (the negation, so it also covers
/// platforms that report no preference as non-light).
pub const DARK_CONDITION: &str = "not (prefers-color-scheme: light)";

/// An insertion-ordered block of `property: value` declarations.
///
/// Setting a property that is already present overwrites its value in place:
/// last write wins, first-write order is kept for serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    entries: Vec<(String, String)>,
}

impl Declarations {
    /// Creates an empty declaration block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property. Returns self for chaining.
    ///
    /// Values are taken verbatim; a [`crate::VarRef`] converts into its
    /// `var(--name)` reference form.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(property.into(), value.into());
        self
    }

    pub(crate) fn insert(&mut self, property: String, value: String) {
        if let Some(slot) = self.entries.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = value;
        } else {
            self.entries.push((property, value));
        }
    }

    /// Sets a property to a quoted CSS string value.
    ///
    /// The text is serialized with CSS string escaping, for declarations such
    /// as `content` that take string literals rather than raw tokens.
    pub fn set_quoted(self, property: impl Into<String>, text: &str) -> Self {
        let mut quoted = String::new();
        // Writing into a String cannot fail.
        let _ = cssparser::serialize_string(text, &mut quoted);
        self.set(property, quoted)
    }

    /// Returns the value for `property`, if set.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the block has no declarations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    fn write_css(&self, out: &mut String, indent: &str) {
        for (property, value) in &self.entries {
            let _ = writeln!(out, "{}{}: {};", indent, property, value);
        }
    }
}

/// A single class rule: selector plus declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    selector: String,
    declarations: Declarations,
}

impl StyleRule {
    /// Returns the full selector, including the leading dot.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the rule's declaration block.
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }
}

/// The document stylesheet: class rules plus the theme rule triple.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    /// Class rules, newest first (front insertion).
    rules: Vec<StyleRule>,
    /// Unconditional `:root` declarations.
    root: Declarations,
    /// `:root` declarations under the light media condition.
    light: Declarations,
    /// `:root` declarations under the negated (dark) media condition.
    dark: Declarations,
}

impl Sheet {
    /// Creates an empty sheet with its theme rule triple in place.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a class rule at the front of the rule list.
    pub fn insert_front(&mut self, selector: impl Into<String>, declarations: Declarations) {
        self.rules.insert(
            0,
            StyleRule {
                selector: selector.into(),
                declarations,
            },
        );
    }

    /// Returns the number of class rules (the theme triple is not counted).
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Iterates class rules front to back (newest first).
    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter()
    }

    /// Returns the class rule with exactly this selector, if present.
    pub fn rule(&self, selector: &str) -> Option<&StyleRule> {
        self.rules.iter().find(|r| r.selector == selector)
    }

    /// Sets a declaration in the unconditional `:root` block.
    pub fn set_root(&mut self, property: &str, value: &str) {
        self.root.insert(property.to_string(), value.to_string());
    }

    /// Sets a declaration in the light-condition `:root` block.
    pub fn set_light(&mut self, property: &str, value: &str) {
        self.light.insert(property.to_string(), value.to_string());
    }

    /// Sets a declaration in the dark-condition `:root` block.
    pub fn set_dark(&mut self, property: &str, value: &str) {
        self.dark.insert(property.to_string(), value.to_string());
    }

    /// Returns the unconditional `:root` block.
    pub fn root(&self) -> &Declarations {
        &self.root
    }

    /// Returns the light-condition block.
    pub fn light(&self) -> &Declarations {
        &self.light
    }

    /// Returns the dark-condition block.
    pub fn dark(&self) -> &Declarations {
        &self.dark
    }

    /// Reads a custom property from the unconditional `:root` block.
    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.root.get(name)
    }

    /// Resolves a custom property as the platform would under `mode`:
    /// the matching conditional block first, then the `:root` fallback.
    pub fn resolve_custom_property(&self, name: &str, mode: ColorMode) -> Option<&str> {
        let conditional = match mode {
            ColorMode::Light => &self.light,
            ColorMode::Dark => &self.dark,
        };
        conditional.get(name).or_else(|| self.root.get(name))
    }

    /// Serializes the whole sheet to CSS text.
    ///
    /// Class rules come first in list order (newest first), then the `:root`
    /// block, then the two conditional blocks — the same document order the
    /// registry maintains while mutating.
    pub fn to_css_string(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            let _ = writeln!(out, "{} {{", rule.selector);
            rule.declarations.write_css(&mut out, "  ");
            out.push_str("}\n");
        }
        out.push_str(":root {\n");
        self.root.write_css(&mut out, "  ");
        out.push_str("}\n");
        for (condition, block) in [(LIGHT_CONDITION, &self.light), (DARK_CONDITION, &self.dark)] {
            let _ = writeln!(out, "@media {} {{", condition);
            out.push_str("  :root {\n");
            block.write_css(&mut out, "    ");
            out.push_str("  }\n}\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Declarations ---

    #[test]
    fn test_declarations_set_and_get() {
        let decls = Declarations::new().set("width", "3cm").set("height", "1cm");
        assert_eq!(decls.get("width"), Some("3cm"));
        assert_eq!(decls.get("height"), Some("1cm"));
        assert_eq!(decls.get("color"), None);
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn test_declarations_last_write_wins_in_place() {
        let decls = Declarations::new()
            .set("color", "red")
            .set("display", "flex")
            .set("color", "blue");
        assert_eq!(decls.get("color"), Some("blue"));
        // Overwrite kept the original position.
        let order: Vec<_> = decls.iter().map(|(p, _)| p).collect();
        assert_eq!(order, ["color", "display"]);
    }

    #[test]
    fn test_declarations_set_quoted_escapes() {
        let decls = Declarations::new().set_quoted("content", "\u{e5e1}");
        let value = decls.get("content").unwrap();
        assert!(value.starts_with('"') && value.ends_with('"'));

        let tricky = Declarations::new().set_quoted("content", "a\"b");
        assert_eq!(tricky.get("content"), Some("\"a\\\"b\""));
    }

    // --- Sheet ---

    #[test]
    fn test_insert_front_orders_newest_first() {
        let mut sheet = Sheet::new();
        sheet.insert_front(".first", Declarations::new().set("color", "red"));
        sheet.insert_front(".second", Declarations::new().set("color", "blue"));

        let selectors: Vec<_> = sheet.rules().map(StyleRule::selector).collect();
        assert_eq!(selectors, [".second", ".first"]);
        assert_eq!(sheet.rule_count(), 2);
    }

    #[test]
    fn test_rule_lookup_by_selector() {
        let mut sheet = Sheet::new();
        sheet.insert_front(".spinner", Declarations::new().set("width", "0.5cm"));
        assert!(sheet.rule(".spinner").is_some());
        assert!(sheet.rule(".spinner>*").is_none());
    }

    #[test]
    fn test_resolve_custom_property_prefers_conditional_block() {
        let mut sheet = Sheet::new();
        sheet.set_light("--background", "white");
        sheet.set_dark("--background", "black");
        sheet.set_root("--spacing", "0.3cm");

        assert_eq!(
            sheet.resolve_custom_property("--background", ColorMode::Light),
            Some("white")
        );
        assert_eq!(
            sheet.resolve_custom_property("--background", ColorMode::Dark),
            Some("black")
        );
        // Root declarations resolve identically in both modes.
        assert_eq!(
            sheet.resolve_custom_property("--spacing", ColorMode::Dark),
            Some("0.3cm")
        );
        assert_eq!(sheet.resolve_custom_property("--missing", ColorMode::Light), None);
    }

    #[test]
    fn test_to_css_string_layout() {
        let mut sheet = Sheet::new();
        sheet.set_root("--spacing", "0.3cm");
        sheet.set_light("--background", "white");
        sheet.set_dark("--background", "black");
        sheet.insert_front(".r10", Declarations::new().set("display", "flex"));

        let css = sheet.to_css_string();
        let class_pos = css.find(".r10 {").unwrap();
        let root_pos = css.find(":root {").unwrap();
        let light_pos = css.find("@media (prefers-color-scheme: light)").unwrap();
        let dark_pos = css.find("@media not (prefers-color-scheme: light)").unwrap();
        assert!(class_pos < root_pos && root_pos < light_pos && light_pos < dark_pos);
        assert!(css.contains("--spacing: 0.3cm;"));
        assert!(css.contains("display: flex;"));
    }
}
