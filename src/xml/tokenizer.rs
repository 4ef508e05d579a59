//! Drives a [`quick_xml`] reader, turning raw XML syntax into the
//! `on_begin_parse`/`on_start_element`/`on_end_element`/`on_character_data`/`on_end_parse`
//! callback sequence consumed by [`super::parser::Parser`].
//!
//! This is the "underlying XML tokenizer" the parser state machine treats as
//! an external collaborator: it owns all byte-level XML concerns (entity
//! unescaping, whitespace-vs-markup, self-closing tags, file I/O) so that the
//! parser never has to.

use quick_xml::{events::Event as XmlEvent, Error as XmlReaderError, Reader as EventReader};
use std::io::{self, BufReader, Read};

use crate::error::{Error, ErrorKind, FilePosition};

use super::parser::XmlEventSink;

impl From<XmlReaderError> for ErrorKind {
    fn from(err: XmlReaderError) -> Self {
        match err {
            XmlReaderError::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                ErrorKind::UnexpectedEof
            }
            XmlReaderError::Io(err) => match std::sync::Arc::try_unwrap(err) {
                Ok(err) => ErrorKind::Io(err),
                Err(err) => ErrorKind::Io(io::Error::from(err.kind())),
            },
            XmlReaderError::UnexpectedEof(_) => ErrorKind::UnexpectedEof,
            XmlReaderError::NonDecodable(_) => ErrorKind::InvalidXmlUtf8,
            _ => ErrorKind::InvalidXmlSyntax,
        }
    }
}

/// Runs `sink` to completion over the XML document read from `reader`.
///
/// Returns the first fatal error encountered while tokenizing the XML itself
/// (malformed syntax, truncated input, bad UTF-8). Semantic errors detected
/// by `sink` are reported through `sink.report_error` / `sink.stop()`, not
/// through this function's `Result`.
pub(crate) fn drive<R: Read>(reader: R, sink: &mut dyn XmlEventSink) -> Result<(), Error> {
    let mut xml_reader = EventReader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(false);
    xml_reader.check_end_names(true);
    xml_reader.expand_empty_elements(true);

    let mut buffer = Vec::new();
    let mut depth: usize = 0;

    sink.on_begin_parse();

    let result = loop {
        if sink.is_stopped() {
            break Ok(());
        }

        let pos_before = xml_reader.buffer_position() as u64;
        let event = match xml_reader.read_event(&mut buffer) {
            Ok(event) => event,
            Err(err) => {
                break Err(ErrorKind::from(err).with_byte_offset(pos_before));
            }
        };

        match event {
            XmlEvent::Start(start) => {
                let name = resolve_name(start.name());
                let attrs = Vec::new(); // attribute values (e.g. plist's `version`) are ignored
                sink.on_start_element(&name, &attrs, depth);
                depth += 1;
            }
            XmlEvent::End(end) => {
                depth = depth.saturating_sub(1);
                let name = resolve_name(end.name());
                sink.on_end_element(&name, depth);
            }
            XmlEvent::Text(text) => {
                let unescaped = match text.unescaped() {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        break Err(ErrorKind::from(err).with_byte_offset(pos_before));
                    }
                };
                match std::str::from_utf8(&unescaped) {
                    Ok(text) => sink.on_character_data(text, depth),
                    Err(_) => break Err(ErrorKind::InvalidXmlUtf8.with_byte_offset(pos_before)),
                }
            }
            XmlEvent::Eof => break Ok(()),
            XmlEvent::PI(_)
            | XmlEvent::Decl(_)
            | XmlEvent::DocType(_)
            | XmlEvent::CData(_)
            | XmlEvent::Comment(_) => {
                // Not part of the plist grammar; skip.
            }
            XmlEvent::Empty(_) => unreachable!("expand_empty_elements splits these into Start/End"),
        }

        buffer.clear();
    };

    let success = result.is_ok() && !sink.is_stopped();
    sink.on_end_parse(success);
    result.map(|_| ())
}

fn resolve_name(name: &[u8]) -> String {
    let local = match name.iter().rposition(|&b| b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    };
    String::from_utf8_lossy(local).into_owned()
}
