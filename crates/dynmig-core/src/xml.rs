//! Reading and writing workspace files.
//!
//! Workspace files are plain XML. [`parse_document`] builds a [`Document`]
//! from text using `quick-xml`'s pull reader; [`write_document`] serializes
//! it back with an XML declaration and two-space indentation. Comments,
//! processing instructions and the doctype are not preserved.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::document::{Document, Element};
use crate::error::CoreError;

/// Parses workspace XML into a [`Document`].
pub fn parse_document(input: &str) -> Result<Document, CoreError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    // Open elements, innermost last.
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(CoreError::xml)? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| CoreError::Xml {
                    reason: "unbalanced closing tag".to_string(),
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(CoreError::xml)?;
                if let Some(open) = stack.last_mut() {
                    append_text(open, &text);
                }
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                if let Some(open) = stack.last_mut() {
                    append_text(open, &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(CoreError::Xml {
            reason: format!("unclosed element <{}>", open.name()),
        });
    }

    root.map(Document::new).ok_or_else(|| CoreError::Xml {
        reason: "document has no root element".to_string(),
    })
}

/// Serializes a [`Document`] to XML text.
pub fn write_document(document: &Document) -> Result<String, CoreError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(CoreError::xml)?;
    write_element(&mut writer, document.root())?;
    String::from_utf8(writer.into_inner()).map_err(CoreError::xml)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, CoreError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(CoreError::xml)?
        .to_string();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(CoreError::xml)?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(CoreError::xml)?
            .to_string();
        let value = attr.unescape_value().map_err(CoreError::xml)?.into_owned();
        element.set_attribute(key, value);
    }

    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), CoreError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_child(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(CoreError::Xml {
            reason: format!("second root element <{}>", element.name()),
        }),
    }
}

fn append_text(element: &mut Element, text: &str) {
    let combined = match element.text() {
        Some(existing) => format!("{}{}", existing, text),
        None => text.to_string(),
    };
    element.set_text(Some(combined));
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), CoreError> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children().is_empty() && element.text().is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(CoreError::xml);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(CoreError::xml)?;
    if let Some(text) = element.text() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(CoreError::xml)?;
    }
    for child in element.children() {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(CoreError::xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<dynWorkspace X="0" Y="0" zoom="1" Version="0.6.3.20048" Name="Home">
  <dynElements>
    <Dynamo.Nodes.ArcStartMiddleEnd type="Dynamo.Nodes.ArcStartMiddleEnd" guid="a1" nickname="Arc &amp; more" x="10" y="20" />
    <Dynamo.Nodes.StringInput type="Dynamo.Nodes.StringInput" guid="s1">
      <System.String>hello &lt;world&gt;</System.String>
    </Dynamo.Nodes.StringInput>
  </dynElements>
  <dynConnectors>
    <Dynamo.Models.ConnectorModel start="s1" start_index="0" end="a1" end_index="0" portType="0" />
  </dynConnectors>
  <dynNotes />
</dynWorkspace>
"#;

    #[test]
    fn parses_legacy_workspace() {
        let doc = parse_document(LEGACY).unwrap();
        assert_eq!(doc.root().name(), "dynWorkspace");
        assert_eq!(doc.declared_version_text(), Some("0.6.3.20048"));
        assert_eq!(doc.nodes().len(), 2);
        assert_eq!(doc.connectors().len(), 1);

        let arc = &doc.nodes()[0];
        assert_eq!(arc.attribute("nickname"), Some("Arc & more"));
        let string_node = &doc.nodes()[1];
        assert_eq!(
            string_node.child("System.String").unwrap().text(),
            Some("hello <world>")
        );
    }

    #[test]
    fn write_then_parse_preserves_tree() {
        let doc = parse_document(LEGACY).unwrap();
        let text = write_document(&doc).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        let back = parse_document(&text).unwrap();
        assert_eq!(doc, back);
    }

    #[test]
    fn attribute_order_survives_writing() {
        let doc = parse_document(LEGACY).unwrap();
        let text = write_document(&doc).unwrap();
        let x = text.find("X=\"0\"").unwrap();
        let version = text.find("Version=").unwrap();
        assert!(x < version);
    }

    #[test]
    fn rejects_unclosed_element() {
        assert!(parse_document("<a><b></b>").is_err());
    }

    #[test]
    fn rejects_mismatched_close() {
        assert!(matches!(
            parse_document("<a><b></c></a>"),
            Err(CoreError::Xml { .. })
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_document("").is_err());
        assert!(parse_document("<?xml version=\"1.0\"?>").is_err());
    }

    #[test]
    fn rejects_second_root() {
        assert!(parse_document("<a/><b/>").is_err());
    }
}
