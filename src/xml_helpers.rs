//! Shared XML attribute and element-name helpers for the XMLTV decoder.
//!
//! All functions ignore namespace prefixes where that makes sense and
//! handle UTF-8 conversion without panicking.

use quick_xml::events::BytesStart;

use crate::error::Result;

/// Extract an attribute value by local name (ignoring namespace prefix),
/// XML-unescaped.
///
/// Every attribute on the element is checked, so a malformed attribute is
/// an error even when it is not the one asked for. Returns `Ok(None)` if
/// the attribute is missing.
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    let mut found = None;
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        if found.is_none() && attr.key.local_name().as_ref() == key {
            found = Some(value.into_owned());
        }
    }
    Ok(found)
}

/// Check that every attribute on the element is well-formed and that its
/// value unescapes cleanly.
pub fn check_attributes(e: &BytesStart) -> Result<()> {
    for attr in e.attributes() {
        let attr = attr?;
        attr.unescape_value()?;
    }
    Ok(())
}

/// Get the local element name as an owned string.
///
/// Returns empty string if not valid UTF-8.
#[inline]
pub fn local_name_string(e: &BytesStart) -> String {
    let bytes = e.local_name();
    std::str::from_utf8(bytes.as_ref())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_attr_string_local() {
        let e = make_start(r#"<channel id="bbc1.uk" />"#);
        assert_eq!(
            attr_string_local(&e, b"id").unwrap(),
            Some("bbc1.uk".to_string())
        );
        assert_eq!(attr_string_local(&e, b"missing").unwrap(), None);
    }

    #[test]
    fn test_attr_string_local_unescapes() {
        let e = make_start(r#"<channel id="news &amp; weather" />"#);
        assert_eq!(
            attr_string_local(&e, b"id").unwrap(),
            Some("news & weather".to_string())
        );
    }

    #[test]
    fn test_attr_string_local_ignores_prefix_on_attr() {
        let e = make_start(r#"<programme tv:channel="c1" />"#);
        assert_eq!(
            attr_string_local(&e, b"channel").unwrap(),
            Some("c1".to_string())
        );
    }

    #[test]
    fn test_attr_string_local_rejects_unquoted_value() {
        let e = make_start(r#"<programme start=20230115140000 channel="c1">"#);
        assert!(attr_string_local(&e, b"channel").is_err());
        assert!(check_attributes(&e).is_err());
    }

    #[test]
    fn test_attr_string_local_rejects_unknown_entity() {
        let e = make_start(r#"<programme channel="a&bogus;b">"#);
        assert!(attr_string_local(&e, b"channel").is_err());
    }

    #[test]
    fn test_check_attributes_accepts_well_formed() {
        let e = make_start(r#"<channel id="c1" lang="en">"#);
        assert!(check_attributes(&e).is_ok());
    }

    #[test]
    fn test_local_name_string() {
        let e = make_start(r#"<tv:programme start="x">"#);
        assert_eq!(local_name_string(&e), "programme");
    }
}
