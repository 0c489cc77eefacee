//! Readers for the `<channel>` and `<programme>` records under the root.
//!
//! Single-valued fields keep only the direct character data of their
//! element, and a repeated element overwrites the earlier one. Nested
//! children such as `<credits><actor>` are walked but not captured.
//! Character data is gathered fragment by fragment (text, entity-expanded
//! text, CDATA) and each field is trimmed once the record is complete.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

use crate::error::{GridError, Result};
use crate::types::{ChannelRecord, ProgrammeRecord};
use crate::xml_helpers::{attr_string_local, check_attributes, local_name_string};

/// What [`walk_children`] reports for a position inside a record.
#[derive(Clone, Copy)]
pub(super) enum Node<'a> {
    /// A child element opened (also sent for self-closing elements).
    Open,
    /// Character data directly inside the innermost open element.
    Text(&'a str),
}

/// Consume events up to and including the end tag of the element whose
/// start tag was just read, reporting each child by its element path
/// relative to it. Attributes and text are validated even where nothing
/// is captured.
pub(super) fn walk_children<R: BufRead>(
    xml: &mut Reader<R>,
    record: &str,
    mut visit: impl FnMut(&[String], Node<'_>),
) -> Result<()> {
    let mut path: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                check_attributes(e)?;
                path.push(local_name_string(e));
                visit(&path, Node::Open);
            }
            Event::Empty(ref e) => {
                check_attributes(e)?;
                path.push(local_name_string(e));
                visit(&path, Node::Open);
                path.pop();
            }
            Event::End(_) => {
                if path.pop().is_none() {
                    return Ok(());
                }
            }
            Event::Text(ref t) => {
                let text = t.unescape()?;
                visit(&path, Node::Text(&text));
            }
            Event::CData(ref c) => {
                let text = std::str::from_utf8(c)?;
                visit(&path, Node::Text(text));
            }
            Event::Eof => {
                return Err(GridError::Decode(format!(
                    "unexpected end of document inside <{record}>"
                )));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn trim_in_place(field: &mut String) {
    let trimmed = field.trim();
    if trimmed.len() != field.len() {
        *field = trimmed.to_string();
    }
}

fn assign(field: &mut String, node: Node<'_>) {
    match node {
        Node::Open => field.clear(),
        Node::Text(text) => field.push_str(text),
    }
}

/// Read a `<channel>` element. `has_children` is false for `<channel/>`.
pub(super) fn read_channel<R: BufRead>(
    xml: &mut Reader<R>,
    start: &BytesStart,
    has_children: bool,
) -> Result<ChannelRecord> {
    let mut channel = ChannelRecord {
        id: attr_string_local(start, b"id")?.unwrap_or_default(),
        ..ChannelRecord::default()
    };

    if has_children {
        walk_children(xml, "channel", |path, node| {
            if let [name] = path {
                if name == "display-name" {
                    assign(&mut channel.display_name, node);
                }
            }
        })?;
        trim_in_place(&mut channel.display_name);
    }

    Ok(channel)
}

fn programme_field<'a>(programme: &'a mut ProgrammeRecord, name: &str) -> Option<&'a mut String> {
    match name {
        "title" => Some(&mut programme.title),
        "sub-title" => Some(&mut programme.sub_title),
        "desc" => Some(&mut programme.desc),
        "credits" => Some(&mut programme.credits),
        "date" => Some(&mut programme.date),
        _ => None,
    }
}

/// Read a `<programme>` element. `has_children` is false for `<programme/>`.
pub(super) fn read_programme<R: BufRead>(
    xml: &mut Reader<R>,
    start: &BytesStart,
    has_children: bool,
) -> Result<ProgrammeRecord> {
    let mut programme = ProgrammeRecord {
        start: attr_string_local(start, b"start")?.unwrap_or_default(),
        stop: attr_string_local(start, b"stop")?.unwrap_or_default(),
        channel: attr_string_local(start, b"channel")?.unwrap_or_default(),
        ..ProgrammeRecord::default()
    };

    if has_children {
        walk_children(xml, "programme", |path, node| match path {
            [name] if name == "category" => match node {
                Node::Open => programme.categories.push(String::new()),
                Node::Text(text) => {
                    if let Some(last) = programme.categories.last_mut() {
                        last.push_str(text);
                    }
                }
            },
            [name] => {
                if let Some(field) = programme_field(&mut programme, name) {
                    assign(field, node);
                }
            }
            [outer, inner] if outer == "rating" && inner == "value" => {
                assign(&mut programme.rating, node);
            }
            _ => {}
        })?;

        for field in [
            &mut programme.title,
            &mut programme.sub_title,
            &mut programme.desc,
            &mut programme.credits,
            &mut programme.date,
            &mut programme.rating,
        ] {
            trim_in_place(field);
        }
        programme.categories.iter_mut().for_each(trim_in_place);
    }

    Ok(programme)
}
