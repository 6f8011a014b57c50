//! Theme variables: reference tokens and loadable manifests.
//!
//! A [`VarRef`] is the opaque token returned by the registry's declaration
//! methods. It renders as `var(--name)` and converts into a declaration
//! value, so a factory can close over it and use it anywhere a CSS value is
//! expected. One token, two resolved values: under a light preference the
//! platform picks the light slot, under dark the dark slot, with no explicit
//! re-render on a preference change.
//!
//! [`VarManifest`] is the file-loadable form of a set of declarations:
//!
//! ```yaml
//! background:
//!   light: "rgb(242, 243, 249)"
//!   dark: "rgb(70, 73, 77)"
//! f-menu: "16pt"
//! ```
//!
//! A plain string is a constant; a mapping must carry both `light` and
//! `dark`. Parsing is two-phase: YAML into raw values first, then each entry
//! checked into a [`VarValue`] with a precise error.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ThemeError;

/// An opaque reference to a declared theme variable.
///
/// Displays as `var(--name)`; obtain one from
/// [`StyleRegistry::declare_const`](crate::StyleRegistry::declare_const) or
/// [`StyleRegistry::declare_themed`](crate::StyleRegistry::declare_themed).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    name: String,
}

impl VarRef {
    /// Builds a reference for `id`, escaping it into a custom-property name.
    pub(crate) fn new(id: &str) -> Self {
        let mut escaped = String::from("--");
        // Writing into a String cannot fail.
        let _ = cssparser::serialize_identifier(id, &mut escaped);
        Self { name: escaped }
    }

    /// Returns the custom-property name, including the `--` prefix.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var({})", self.name)
    }
}

impl From<&VarRef> for String {
    fn from(var: &VarRef) -> Self {
        var.to_string()
    }
}

impl From<VarRef> for String {
    fn from(var: VarRef) -> Self {
        var.to_string()
    }
}

/// A parsed variable declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    /// One value for every mode; lands in the unconditional root block.
    Constant(String),
    /// A light/dark pair; lands in both conditional blocks.
    Themed {
        /// Value under a light preference.
        light: String,
        /// Value under a dark (non-light) preference.
        dark: String,
    },
}

/// Raw YAML shape of one entry, before the build phase checks it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawVar {
    Constant(String),
    Themed {
        light: Option<String>,
        dark: Option<String>,
    },
}

/// An ordered set of variable declarations loaded from YAML.
///
/// Declare the whole manifest on a registry with
/// [`StyleRegistry::declare_manifest`](crate::StyleRegistry::declare_manifest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarManifest {
    entries: Vec<(String, VarValue)>,
}

impl VarManifest {
    /// Parses a manifest from YAML content.
    ///
    /// # Errors
    ///
    /// Returns a [`ThemeError`] when the YAML does not parse, the top level
    /// is not a mapping, or an entry is neither a string nor a complete
    /// light/dark pair.
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        Self::parse(yaml, None)
    }

    /// Loads a manifest from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ThemeError`] if the file cannot be read or parsed; parse
    /// errors carry the path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::Load {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::parse(&content, Some(path))
    }

    fn parse(yaml: &str, path: Option<&Path>) -> Result<Self, ThemeError> {
        let doc: serde_yaml::Mapping =
            serde_yaml::from_str(yaml).map_err(|e| ThemeError::Parse {
                path: path.map(Path::to_path_buf),
                message: e.to_string(),
            })?;

        let mut entries = Vec::with_capacity(doc.len());
        for (key, value) in doc {
            let name = match key {
                serde_yaml::Value::String(s) => s,
                other => {
                    return Err(ThemeError::Parse {
                        path: path.map(Path::to_path_buf),
                        message: format!("variable names must be strings, got {:?}", other),
                    })
                }
            };
            let raw: RawVar =
                serde_yaml::from_value(value).map_err(|e| ThemeError::InvalidEntry {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            let value = match raw {
                RawVar::Constant(v) => VarValue::Constant(v),
                RawVar::Themed { light, dark } => {
                    let light = light.ok_or(ThemeError::MissingVariant {
                        name: name.clone(),
                        missing: "light",
                    })?;
                    let dark = dark.ok_or(ThemeError::MissingVariant {
                        name: name.clone(),
                        missing: "dark",
                    })?;
                    VarValue::Themed { light, dark }
                }
            };
            entries.push((name, value));
        }
        Ok(Self { entries })
    }

    /// Iterates declarations in manifest order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &VarValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns the number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the manifest declares nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- VarRef ---

    #[test]
    fn test_var_ref_renders_reference_form() {
        let var = VarRef::new("c-foreground");
        assert_eq!(var.name(), "--c-foreground");
        assert_eq!(var.to_string(), "var(--c-foreground)");
    }

    #[test]
    fn test_var_ref_escapes_identifier() {
        let var = VarRef::new("top button");
        assert_eq!(var.name(), "--top\\ button");
    }

    #[test]
    fn test_var_ref_into_declaration_value() {
        let var = VarRef::new("background");
        let value: String = (&var).into();
        assert_eq!(value, "var(--background)");
    }

    // --- Manifest parsing ---

    #[test]
    fn test_manifest_constants_and_pairs() {
        let manifest = VarManifest::from_yaml(
            r#"
            background:
              light: "rgb(242, 243, 249)"
              dark: "rgb(70, 73, 77)"
            f-menu: "16pt"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.len(), 2);
        let entries: Vec<_> = manifest.entries().collect();
        assert_eq!(entries[0].0, "background");
        assert!(matches!(entries[0].1, VarValue::Themed { .. }));
        assert_eq!(entries[1].1, &VarValue::Constant("16pt".to_string()));
    }

    #[test]
    fn test_manifest_preserves_order() {
        let manifest = VarManifest::from_yaml("a: \"1\"\nz: \"2\"\nm: \"3\"\n").unwrap();
        let names: Vec<_> = manifest.entries().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "z", "m"]);
    }

    #[test]
    fn test_manifest_missing_dark_slot() {
        let err = VarManifest::from_yaml("background:\n  light: white\n").unwrap_err();
        assert_eq!(
            err,
            ThemeError::MissingVariant {
                name: "background".to_string(),
                missing: "dark",
            }
        );
    }

    #[test]
    fn test_manifest_invalid_yaml() {
        let err = VarManifest::from_yaml("not valid yaml: [").unwrap_err();
        assert!(matches!(err, ThemeError::Parse { .. }));
    }

    #[test]
    fn test_manifest_non_string_value_rejected() {
        let err = VarManifest::from_yaml("depth: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ThemeError::InvalidEntry { .. }));
    }

    #[test]
    fn test_manifest_from_file() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vars.yaml");
        fs::write(&path, "f-menu: \"16pt\"\n").unwrap();

        let manifest = VarManifest::from_file(&path).unwrap();
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_manifest_from_file_not_found() {
        let err = VarManifest::from_file("/nonexistent/vars.yaml").unwrap_err();
        assert!(matches!(err, ThemeError::Load { .. }));
    }
}
