//! Integration tests exercising builder + fragment parsing together, the way
//! component factories use them.

use proptest::prelude::*;
use selvage_markup::{from_markup, Element, MarkupError, Node};

/// An icon factory in the shape the style layer uses: a literal svg fragment
/// with interpolated text, then class attachment on the parsed root.
fn icon(glyph: &str, extra_classes: &[&str]) -> Result<Element, MarkupError> {
    let root = from_markup(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
             <g transform="translate(50 50)"><text fill="currentColor"/></g>
           </svg>"#,
    )?;
    // Glyph arrives as data, never spliced into the markup string.
    let label = Element::new("tspan").text(glyph);
    Ok(root
        .class("icon")
        .classes(extra_classes.iter().copied())
        .child(label))
}

#[test]
fn icon_factory_assembles_classed_fragment() {
    let el = icon("\u{e145}", &["head-button"]).unwrap();
    assert_eq!(el.tag(), "svg");
    assert!(el.has_class("icon"));
    assert!(el.has_class("head-button"));

    let html = el.to_html();
    assert!(html.contains(r#"viewBox="0 0 100 100""#));
    assert!(html.contains("\u{e145}"));
}

#[test]
fn menu_bar_tree_serializes_children_in_order() {
    let bar = Element::new("div")
        .class("hbox")
        .child(Element::new("a").prop("href", "/back").text("back"))
        .child(Element::new("span").prop("textContent", "Channel"))
        .child(Element::new("button").prop("textContent", "Ok"));

    let html = bar.to_html();
    let back = html.find("/back").unwrap();
    let center = html.find("Channel").unwrap();
    let ok = html.find("Ok").unwrap();
    assert!(back < center && center < ok);
}

#[test]
fn sibling_roots_are_rejected_not_truncated() {
    let err = from_markup("<div><span/></div><div/>").unwrap_err();
    assert_eq!(err, MarkupError::MultipleRoots { count: 2 });
}

proptest! {
    // Interpolated text must be escaped by construction: whatever goes in as
    // data comes back out as the same character data, never as markup.
    #[test]
    fn text_children_never_become_markup(text in "[ -~]{1,40}") {
        let el = Element::new("span").text(text.clone());
        let parsed = from_markup(&el.to_html());
        match parsed {
            Ok(round) => {
                let expect = text.trim();
                match round.child_nodes() {
                    [] => prop_assert!(expect.is_empty()),
                    [Node::Text(t)] => prop_assert_eq!(t.trim(), expect),
                    other => prop_assert!(false, "unexpected children: {:?}", other),
                }
            }
            Err(err) => prop_assert!(false, "escaping failed for {:?}: {}", text, err),
        }
    }
}
