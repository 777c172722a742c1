use quick_xml::encoding::Decoder;
use quick_xml::events::BytesStart;

use super::XmlError;

/// Decode the qualified tag name of a start or empty element
pub(super) fn tag_name(e: &BytesStart) -> Result<String, XmlError> {
    Ok(std::str::from_utf8(e.name().as_ref())?.to_string())
}

/// Decode every attribute of an element, unescaping entity references
pub(super) fn attributes(
    e: &BytesStart,
    decoder: Decoder,
    position: u64,
) -> Result<Vec<(String, String)>, XmlError> {
    let xml_err = |source: quick_xml::Error| XmlError::XmlError { position, source };

    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| xml_err(quick_xml::Error::from(e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(xml_err)?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}
