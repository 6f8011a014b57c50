//! # selvage
//!
//! A runtime style registry for document-hosted UIs: styles are declared
//! where components are built, deduplicated by call-site identity, and
//! themed through light/dark custom-property pairs that the platform
//! resolves at paint time.
//!
//! ## Quick start
//!
//! ```rust
//! use selvage::{Declarations, RuleSet, StyleRegistry};
//!
//! let registry = StyleRegistry::new();
//!
//! // Themed variables: one reference, two values, resolved by the
//! // platform's color-scheme preference.
//! let fg = registry.declare_themed("c-foreground", "rgb(0, 0, 0)", "rgb(244, 255, 255)");
//! let bg = registry.declare_themed("c-background", "rgb(242, 243, 249)", "rgb(70, 73, 77)");
//!
//! // Register a rule set; the returned class is stable for this call
//! // site, so re-running the factory is a pure cache hit.
//! let panel = registry
//!     .register(
//!         RuleSet::new()
//!             .rule(
//!                 "",
//!                 Declarations::new()
//!                     .set("background-color", &bg)
//!                     .set("color", &fg)
//!                     .set("padding", "0.3cm"),
//!             )
//!             .rule(">h1", Declarations::new().set("font-size", "16pt")),
//!     )
//!     .unwrap();
//!
//! assert!(registry.to_css_string().contains(&format!(".{} {{", panel)));
//! ```
//!
//! ## Building elements
//!
//! The companion [`Element`] builder constructs the fragments the classes
//! attach to, either programmatically or from a markup string:
//!
//! ```rust
//! use selvage::{from_markup, Element};
//!
//! let status = Element::new("div")
//!     .class("hbox")
//!     .child(Element::new("span").text("ready"));
//! assert_eq!(status.to_html(), "<div class=\"hbox\"><span>ready</span></div>");
//!
//! let icon = from_markup("<svg viewBox=\"0 0 16 16\"><path d=\"M0 0h16v16\"/></svg>").unwrap();
//! assert_eq!(icon.tag(), "svg");
//! ```
//!
//! ## Loading theme manifests
//!
//! Variable sets can live in YAML and be declared in one call:
//!
//! ```rust
//! use selvage::{StyleRegistry, VarManifest};
//!
//! let manifest = VarManifest::from_yaml(
//!     "background:\n  light: white\n  dark: black\nf-menu: \"16pt\"\n",
//! )
//! .unwrap();
//!
//! let registry = StyleRegistry::new();
//! let vars = registry.declare_manifest(&manifest);
//! assert_eq!(vars.len(), 2);
//! ```

pub mod boot;
pub mod error;
pub mod identity;
pub mod mode;
pub mod registry;
pub mod sheet;
pub mod theme;

pub use boot::DocumentSetup;
pub use error::{StyleError, ThemeError};
pub use identity::Identity;
pub use mode::{detect_color_mode, set_mode_detector, ColorMode};
pub use registry::{ClassName, RuleSet, StyleRegistry, GROUP, HBOX, STACK, VBOX};
pub use sheet::{Declarations, Sheet, StyleRule, DARK_CONDITION, LIGHT_CONDITION};
pub use theme::{VarManifest, VarRef, VarValue};

// Element construction lives in its own crate; re-exported here so most
// consumers depend on selvage alone.
pub use selvage_markup::{coerce_property, from_markup, Element, MarkupError, Node};
