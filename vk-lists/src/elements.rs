//! Element based registry reader.
//!
//! Instead of trusting that every `<extension>` tag sits on one physical
//! line, the registry is walked with `xml-rs` and each extension element is
//! rendered back into a single line. The result goes through exactly the
//! same selection and cleaning as the line scanner.

use std::io::Read;
use std::path::Path;

use xml::reader::XmlEvent;

use crate::extensions::{insert_candidate, CleanedLines};
use crate::types::Error;

type XmlEvents<R> = xml::reader::Events<R>;
type XmlAttribute = xml::attribute::OwnedAttribute;

const EXTENSION_XPATH: &str = "/registry/extensions/extension";

//--------------------------------------------------------------------------------------------------
struct ScanCtx<R: Read> {
    events: XmlEvents<R>,
    xpath: String,
}

impl<R: Read> ScanCtx<R> {
    fn push_element(&mut self, name: &str) {
        self.xpath.push('/');
        self.xpath.push_str(name);
    }

    fn pop_element(&mut self) {
        if let Some(separator_pos) = self.xpath.rfind('/') {
            self.xpath.truncate(separator_pos);
        }
    }
}

//--------------------------------------------------------------------------------------------------
/// Collects candidate lines from every `<extension>` element of a registry.
pub fn scan_elements<R: Read>(stream: R, path: &Path) -> Result<CleanedLines, Error> {
    let parser = xml::reader::ParserConfig::new().create_reader(stream);
    let mut ctx = ScanCtx {
        events: parser.into_iter(),
        xpath: String::new(),
    };
    let mut cleaned = CleanedLines::new();

    while let Some(event) = ctx.events.next() {
        let event = event.map_err(|source| Error::Xml {
            path: path.to_path_buf(),
            source,
        })?;
        match event {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                ctx.push_element(&name.local_name);
                if ctx.xpath == EXTENSION_XPATH {
                    let line = render_start_tag(&name.local_name, &attributes);
                    insert_candidate(&mut cleaned, &line);
                }
            }
            XmlEvent::EndElement { .. } => ctx.pop_element(),
            _ => {}
        }
    }

    Ok(cleaned)
}

/// `<name a="v" b="w">`, attributes in document order.
fn render_start_tag(name: &str, attributes: &[XmlAttribute]) -> String {
    let mut line = String::from("<");
    line.push_str(name);
    for a in attributes {
        line.push(' ');
        line.push_str(&a.name.local_name);
        line.push_str("=\"");
        line.push_str(&a.value.replace('"', "&quot;"));
        line.push('"');
    }
    line.push('>');
    line
}
