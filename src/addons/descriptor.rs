//! Add-on descriptor (`addon.xml`) extraction.
//!
//! The structured fields come from the `<addon>` element's attributes. The
//! body that gets republished in `addons.xml` is the raw document with its
//! XML declaration removed, so upstream formatting is kept byte for byte.

use super::types::AddonError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Root element of an add-on descriptor.
const ADDON_ELEMENT: &[u8] = b"addon";

/// Prefix of the XML declaration line.
const XML_PREAMBLE: &str = "<?xml";

/// Parsed add-on descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// `id` attribute.
    pub id: String,
    /// `version` attribute.
    pub version: String,
    /// `name` attribute.
    pub name: Option<String>,
    /// `provider-name` attribute.
    pub provider: Option<String>,
    /// Raw document without its preamble.
    pub xml_body: String,
}

/// Parses a raw descriptor document.
///
/// # Errors
/// Returns `AddonError::Descriptor` if the markup is malformed, the root
/// element is not `<addon>`, or `id`/`version` are missing.
pub fn parse_descriptor(raw: &str) -> Result<Descriptor, AddonError> {
    let mut reader = Reader::from_str(raw);

    loop {
        let event = reader.read_event().map_err(|e| {
            AddonError::Descriptor(format!(
                "malformed markup at byte {}: {}",
                reader.error_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().as_ref() != ADDON_ELEMENT {
                    return Err(AddonError::Descriptor(format!(
                        "root element is <{}>, expected <addon>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                return from_attributes(&e, strip_preamble(raw));
            }
            Event::Eof => {
                return Err(AddonError::Descriptor("no <addon> element".to_string()));
            }
            _ => {}
        }
    }
}

/// Reads the identifying attributes of the `<addon>` element.
fn from_attributes(element: &BytesStart<'_>, xml_body: String) -> Result<Descriptor, AddonError> {
    let mut id = None;
    let mut version = None;
    let mut name = None;
    let mut provider = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| AddonError::Descriptor(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| AddonError::Descriptor(e.to_string()))?
            .into_owned();

        match attr.key.as_ref() {
            b"id" => id = Some(value),
            b"version" => version = Some(value),
            b"name" => name = Some(value),
            b"provider-name" => provider = Some(value),
            _ => {}
        }
    }

    let id = id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AddonError::Descriptor("missing id attribute".to_string()))?;
    let version =
        version.ok_or_else(|| AddonError::Descriptor(format!("{}: missing version attribute", id)))?;

    Ok(Descriptor {
        id,
        version,
        name,
        provider,
        xml_body,
    })
}

/// Removes XML declaration lines and newline-terminates every other line.
#[must_use]
pub fn strip_preamble(raw: &str) -> String {
    let mut body = String::with_capacity(raw.len() + 1);
    for line in raw.lines() {
        if line.trim_start_matches('\u{feff}').starts_with(XML_PREAMBLE) {
            continue;
        }
        body.push_str(line);
        body.push('\n');
    }
    body
}
