//! XMLTV document decoder
//!
//! Streams the markup with quick-xml and collects the `<channel>` and
//! `<programme>` children of the root element into a [`Document`]. The
//! root element's name is not checked and anything after its end tag is
//! ignored.
//!
//! # XML Structure
//! ```xml
//! <tv>
//!   <channel id="bbc1.uk">
//!     <display-name>BBC One</display-name>
//!   </channel>
//!   <programme start="20230115200000 +0000" stop="20230115203000 +0000" channel="bbc1.uk">
//!     <title>News</title>
//!     <category>News</category>
//!     <rating><value>U</value></rating>
//!   </programme>
//! </tv>
//! ```

mod records;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{GridError, Result};
use crate::types::Document;
use crate::xml_helpers::{check_attributes, local_name_string};

use records::{read_channel, read_programme, walk_children};

/// Decode an XMLTV document.
///
/// # Errors
/// Returns an error for malformed markup (including malformed attributes,
/// unknown entities and invalid UTF-8), mismatched tags, a document with
/// no root element, or a root element left open at the end of input.
pub fn parse(data: &[u8]) -> Result<Document> {
    let mut xml = Reader::from_reader(data);

    let mut doc = Document::default();
    let mut buf = Vec::new();
    let mut in_root = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) if !in_root => {
                check_attributes(e)?;
                in_root = true;
            }
            Event::Start(ref e) => match local_name_string(e).as_str() {
                "channel" => doc.channels.push(read_channel(&mut xml, e, true)?),
                "programme" => doc.programmes.push(read_programme(&mut xml, e, true)?),
                other => {
                    check_attributes(e)?;
                    walk_children(&mut xml, other, |_, _| {})?;
                }
            },
            // `<tv/>`: a document with no records
            Event::Empty(ref e) if !in_root => {
                check_attributes(e)?;
                break;
            }
            Event::Empty(ref e) => match local_name_string(e).as_str() {
                "channel" => doc.channels.push(read_channel(&mut xml, e, false)?),
                "programme" => doc.programmes.push(read_programme(&mut xml, e, false)?),
                _ => check_attributes(e)?,
            },
            // Stray text between records is not kept, but must still decode
            Event::Text(ref t) => {
                let _text = t.unescape()?;
            }
            Event::CData(ref c) => {
                let _text = std::str::from_utf8(c)?;
            }
            Event::End(_) if in_root => break,
            Event::End(_) => {
                return Err(GridError::Decode(
                    "closing tag before any root element".to_string(),
                ));
            }
            Event::Eof if in_root => {
                return Err(GridError::Decode(
                    "unexpected end of document: root element not closed".to_string(),
                ));
            }
            Event::Eof => {
                return Err(GridError::Decode("no root element".to_string()));
            }
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "decoded XMLTV document: {} channels, {} programmes",
        doc.channels.len(),
        doc.programmes.len()
    );
    Ok(doc)
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

    #[test]
    fn test_parse_channel_and_programme() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE tv SYSTEM "xmltv.dtd">
<tv generator-info-name="test">
  <channel id="bbc1.uk">
    <display-name>BBC One</display-name>
  </channel>
  <programme start="20230115200000 +0000" stop="20230115203000 +0000" channel="bbc1.uk">
    <title lang="en">News</title>
    <sub-title>Evening</sub-title>
    <desc>The day's headlines.</desc>
    <credits>Presenter</credits>
    <date>2023</date>
    <category>News</category>
    <category>Current Affairs</category>
    <rating system="BBFC"><value>U</value></rating>
  </programme>
</tv>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.channels.len(), 1);
        assert_eq!(doc.channels[0].id, "bbc1.uk");
        assert_eq!(doc.channels[0].display_name, "BBC One");

        let p = &doc.programmes[0];
        assert_eq!(p.start, "20230115200000 +0000");
        assert_eq!(p.stop, "20230115203000 +0000");
        assert_eq!(p.channel, "bbc1.uk");
        assert_eq!(p.title, "News");
        assert_eq!(p.sub_title, "Evening");
        assert_eq!(p.desc, "The day's headlines.");
        assert_eq!(p.credits, "Presenter");
        assert_eq!(p.date, "2023");
        assert_eq!(p.categories, vec!["News", "Current Affairs"]);
        assert_eq!(p.rating, "U");
    }

    #[test]
    fn test_nested_credits_children_are_not_captured() {
        let xml = r#"<tv><programme channel="c"><credits><director>Someone</director><actor>Else</actor></credits></programme></tv>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.programmes[0].credits, "");
    }

    #[test]
    fn test_repeated_field_last_wins() {
        let xml = r#"<tv><channel id="c"><display-name>First</display-name><display-name>Second</display-name></channel>
<programme channel="c"><title>One</title><title>Two</title></programme></tv>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.channels[0].display_name, "Second");
        assert_eq!(doc.programmes[0].title, "Two");
    }

    #[test]
    fn test_escaped_text_and_cdata() {
        let xml = r#"<tv><programme channel="c"><title>Fish &amp; Chips</title><desc><![CDATA[<b>bold</b>]]></desc></programme></tv>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.programmes[0].title, "Fish & Chips");
        assert_eq!(doc.programmes[0].desc, "<b>bold</b>");
    }

    #[test]
    fn test_self_closing_records() {
        let xml = r#"<tv><channel id="c"/><programme start="20230115200000 +0000" channel="c"/></tv>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.channels[0].id, "c");
        assert!(doc.channels[0].display_name.is_empty());
        assert_eq!(doc.programmes[0].start, "20230115200000 +0000");
        assert!(doc.programmes[0].stop.is_empty());
    }

    #[test]
    fn test_unknown_elements_skipped() {
        let xml = r#"<tv><meta><channel id="hidden"/></meta><channel id="c"/></tv>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.channels.len(), 1);
        assert_eq!(doc.channels[0].id, "c");
    }

    #[test]
    fn test_empty_root() {
        let doc = parse(b"<tv/>").unwrap();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_no_root_is_error() {
        assert!(matches!(parse(b""), Err(GridError::Decode(_))));
        assert!(matches!(
            parse(b"<?xml version=\"1.0\"?>"),
            Err(GridError::Decode(_))
        ));
    }

    #[test]
    fn test_unclosed_root_is_error() {
        let result = parse(b"<tv><channel id=\"c\"/>");
        assert!(result.is_err());
    }

    #[test]
    fn test_mismatched_tags_is_error() {
        let result = parse(b"<tv><programme channel=\"c\"><title>x</desc></programme></tv>");
        assert!(result.is_err());
    }

    #[test]
    fn test_unquoted_attribute_is_error() {
        let xml = br#"<tv><programme start=20230115140000 stop="20230115150000 +0000" channel="c"/></tv>"#;
        assert!(matches!(parse(xml), Err(GridError::Xml(_))));
    }

    #[test]
    fn test_unknown_entity_in_attribute_is_error() {
        let xml = br#"<tv><programme channel="a&bogus;b"><title>x</title></programme></tv>"#;
        assert!(matches!(parse(xml), Err(GridError::Xml(_))));
    }

    #[test]
    fn test_malformed_attribute_in_skipped_element_is_error() {
        let xml = br#"<tv><meta kind=broken/><channel id="c"/></tv>"#;
        assert!(parse(xml).is_err());
        let nested = br#"<tv><programme channel="c"><icon src=x/></programme></tv>"#;
        assert!(parse(nested).is_err());
    }

    #[test]
    fn test_invalid_utf8_between_records_is_error() {
        let mut xml = b"<tv><channel id=\"c\"/>".to_vec();
        xml.extend_from_slice(b"\xff\xfe");
        xml.extend_from_slice(b"<channel id=\"d\"/></tv>");
        assert!(parse(&xml).is_err());
    }

    #[test]
    fn test_comment_inside_text_keeps_surrounding_spaces() {
        let xml = br#"<tv><programme channel="c"><title>Fish <!-- c --> Chips</title></programme></tv>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(doc.programmes[0].title, "Fish  Chips");
    }

    #[test]
    fn test_mixed_text_and_cdata_keeps_inner_spaces() {
        let xml = br#"<tv><programme channel="c"><desc>a <![CDATA[b]]> c</desc></programme></tv>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(doc.programmes[0].desc, "a b c");
    }

    #[test]
    fn test_fields_trimmed_once_per_record() {
        let xml = b"<tv><channel id=\"c\"><display-name>\n  BBC &amp; One \n</display-name></channel>\
<programme channel=\"c\"><category> <![CDATA[Film]]> </category><rating><value> 12A </value></rating></programme></tv>";
        let doc = parse(xml).unwrap();
        assert_eq!(doc.channels[0].display_name, "BBC & One");
        assert_eq!(doc.programmes[0].categories, vec!["Film"]);
        assert_eq!(doc.programmes[0].rating, "12A");
    }
}
