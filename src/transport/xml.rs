//! XML to JSON-value conversion.
//!
//! The root element becomes the top-level value. Rules, applied recursively:
//!
//! | XML | Value |
//! |-----|-------|
//! | child elements | mapping keyed by tag name |
//! | repeated sibling elements | sequence, document order |
//! | text-only element | string (trimmed) |
//! | empty element | empty mapping |
//! | attributes | mapping under `"@attributes"` |
//! | text next to child elements | string under `"#text"` |

use roxmltree::{Document, Node};
use serde_json::{Map, Value};

pub const ATTRIBUTES_KEY: &str = "@attributes";
pub const TEXT_KEY: &str = "#text";

/// Parse `body` as XML and convert it structurally.
pub fn to_json(body: &str) -> std::result::Result<Value, roxmltree::Error> {
    let doc = Document::parse(body)?;
    Ok(element_to_value(doc.root_element()))
}

fn element_to_value(node: Node<'_, '_>) -> Value {
    let attributes: Map<String, Value> = node
        .attributes()
        .map(|a| (a.name().to_string(), Value::String(a.value().to_string())))
        .collect();

    let mut fields = Map::new();
    let mut text = String::new();
    let mut has_elements = false;

    for child in node.children() {
        if child.is_element() {
            has_elements = true;
            let name = child.tag_name().name().to_string();
            let value = element_to_value(child);
            match fields.get_mut(&name) {
                // Element values are never sequences, so an array here means
                // the tag has already repeated.
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    fields.insert(name, value);
                }
            }
        } else if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        }
    }

    let text = text.trim();
    if !has_elements && attributes.is_empty() {
        return if text.is_empty() {
            Value::Object(Map::new())
        } else {
            Value::String(text.to_string())
        };
    }

    if !attributes.is_empty() {
        fields.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
    }
    if !text.is_empty() {
        fields.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
    }
    Value::Object(fields)
}
