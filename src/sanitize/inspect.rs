//! Structural inspection of HTML for executable content.
//!
//! Used to double-check sanitizer output before it leaves the process.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::fmt;

const EXECUTABLE_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "embed"];
const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "xlink:href"];
const EXECUTABLE_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

/// A piece of executable content found in supposedly safe HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// An element that can execute or load active content
    Element(String),
    /// An inline event handler attribute
    EventHandler { element: String, attribute: String },
    /// A URL attribute with an executable scheme
    ExecutableUrl { element: String, attribute: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Element(name) => write!(f, "<{}> element", name),
            Violation::EventHandler { element, attribute } => {
                write!(f, "event handler '{}' on <{}>", attribute, element)
            }
            Violation::ExecutableUrl { element, attribute } => {
                write!(f, "executable URL in '{}' on <{}>", attribute, element)
            }
        }
    }
}

/// Find the first executable construct in `html`, if any.
pub fn find_violation(html: &str) -> Option<Violation> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    walk(&dom.document)
}

fn walk(node: &Handle) -> Option<Violation> {
    if let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = node.data
    {
        let element = name.local.to_string();
        if EXECUTABLE_ELEMENTS.contains(&element.as_str()) {
            return Some(Violation::Element(element));
        }

        for attr in attrs.borrow().iter() {
            let attribute = attr.name.local.to_ascii_lowercase().to_string();
            if attribute.starts_with("on") {
                return Some(Violation::EventHandler {
                    element,
                    attribute,
                });
            }
            if URL_ATTRIBUTES.contains(&attribute.as_str()) && has_executable_scheme(&attr.value) {
                return Some(Violation::ExecutableUrl {
                    element,
                    attribute,
                });
            }
        }
    }

    node.children.borrow().iter().find_map(walk)
}

fn has_executable_scheme(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    EXECUTABLE_SCHEMES
        .iter()
        .any(|scheme| compact.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html_has_no_violation() {
        assert_eq!(
            find_violation("<p>Hello <a href=\"https://x.test\">x</a></p>"),
            None
        );
    }

    #[test]
    fn test_escaped_script_text_is_not_a_violation() {
        assert_eq!(find_violation("&lt;script&gt;alert(1)&lt;/script&gt;"), None);
    }

    #[test]
    fn test_detects_script_element() {
        assert_eq!(
            find_violation("<div><script>x</script></div>"),
            Some(Violation::Element("script".to_string()))
        );
    }

    #[test]
    fn test_detects_event_handler() {
        let violation = find_violation("<p OnClick=\"x\">y</p>");
        assert_eq!(
            violation,
            Some(Violation::EventHandler {
                element: "p".to_string(),
                attribute: "onclick".to_string(),
            })
        );
    }

    #[test]
    fn test_detects_obfuscated_javascript_url() {
        let violation = find_violation("<a href=\" java\tscript:alert(1)\">y</a>");
        assert!(matches!(violation, Some(Violation::ExecutableUrl { .. })));
    }
}
