//! Document bootstrap: the one-time setup applied before first paint.
//!
//! [`DocumentSetup::prepare`] assembles everything the host shell attaches to
//! a fresh document: a reset-stylesheet link for the head, a `<style>` element
//! carrying the shared spin animation, a registered class for the document
//! element (base font and themed colors) and the class for the body. The
//! assembly is all-or-nothing: any failure leaves the returned setup
//! unbuilt, so the host never attaches half a bootstrap.

use selvage_markup::{from_markup, Element};

use crate::error::StyleError;
use crate::registry::{ClassName, RuleSet, StyleRegistry};
use crate::sheet::Declarations;
use crate::theme::VarRef;

const RESET_STYLESHEET_HREF: &str = "style_reset.css";

const SPIN_ANIMATION: &str = "<style>\
@keyframes spin { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }\
</style>";

/// The pieces a host shell attaches to a new document.
#[derive(Debug, Clone)]
pub struct DocumentSetup {
    /// `<link rel="stylesheet">` pointing at the reset stylesheet.
    pub reset_link: Element,
    /// `<style>` element with the shared keyframe animations.
    pub animation_style: Element,
    /// Class for the document element: base font plus themed colors.
    pub document_class: ClassName,
    /// Class for the body element (the overlay-grid utility, so absolutely
    /// positioned layers can sit over the main content).
    pub body_class: ClassName,
}

impl DocumentSetup {
    /// Builds the bootstrap pieces against `registry`.
    ///
    /// `background` and `foreground` are the themed color variables the
    /// document element inherits down to every component.
    ///
    /// # Errors
    ///
    /// Returns a [`StyleError`] if the document class cannot be registered or
    /// the animation markup fails to parse.
    pub fn prepare(
        registry: &StyleRegistry,
        font_family: &str,
        background: &VarRef,
        foreground: &VarRef,
    ) -> Result<Self, StyleError> {
        let document_class = registry.register_with(
            &["document"],
            RuleSet::base(
                Declarations::new()
                    .set("font-family", font_family)
                    .set("background-color", background)
                    .set("color", foreground),
            ),
        )?;

        let reset_link = Element::new("link")
            .prop("rel", "stylesheet")
            .prop("href", RESET_STYLESHEET_HREF);
        let animation_style = from_markup(SPIN_ANIMATION)?;

        Ok(Self {
            reset_link,
            animation_style,
            document_class,
            body_class: registry.stack(),
        })
    }
}
