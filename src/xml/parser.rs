//! The XML-plist parser: a SAX-style consumer of XML events that builds an
//! [`Object`] tree via an explicit stack of partially-built frames.

use std::{fs::File, io::Read, path::Path};

use base64::{engine::general_purpose::STANDARD as base64_standard, Engine};

use crate::{
    error::{from_io_without_position, Error, ErrorKind},
    Date, Dictionary, Object,
};

use super::tokenizer;

/// The callback interface the tokenizer drives. Exists as a trait (rather
/// than a closure bundle) so the parser's state machine can be exercised in
/// tests without going through real XML at all.
pub(crate) trait XmlEventSink {
    fn on_begin_parse(&mut self);
    fn on_end_parse(&mut self, success: bool);
    fn on_start_element(&mut self, name: &str, attrs: &[(String, String)], depth: usize);
    fn on_end_element(&mut self, name: &str, depth: usize);
    fn on_character_data(&mut self, text: &str, depth: usize);
    fn is_stopped(&self) -> bool;
    /// Aborts the parse: once called, no further events should be delivered.
    fn stop(&mut self);
    /// Records a free-form diagnostic (e.g. a tokenizer-level syntax error)
    /// and implicitly stops the parse, the same way a semantic error does.
    fn report_error(&mut self, message: &str);
}

/// One of the three states a `<dict>` cycles through while pairing keys with values.
#[derive(Clone, Debug, PartialEq, Eq)]
enum KeyState {
    /// No `<key>` has been opened since the last value was committed (or since the dict opened).
    AwaitingKey,
    /// A `<key>` element is currently open and accumulating cdata.
    KeyActive,
    /// A key has been captured; the next child element becomes its value.
    KeyReady { key: String },
}

impl Default for KeyState {
    fn default() -> Self {
        KeyState::AwaitingKey
    }
}

/// One partially-built node plus (if it is a dictionary) its key-pairing state.
struct Frame {
    current: Object,
    key: KeyState,
}

impl Frame {
    fn new(current: Object) -> Self {
        Frame {
            current,
            key: KeyState::default(),
        }
    }
}

/// Parses a single XML plist document into an [`Object`] tree.
///
/// A `Parser` is single-shot: once it has produced a root, further calls to
/// `parse_reader`/`parse_file` return `None` without touching the XML layer
/// again. Construct a fresh `Parser` to parse another document.
pub struct Parser {
    stack: Vec<Frame>,
    current: Option<Frame>,
    cdata: String,
    root: Option<Object>,
    seen_root_child: bool,
    stopped: bool,
    error: Option<Error>,
    error_sink: Box<dyn FnMut(&str)>,
    used: bool,
}

impl Parser {
    /// Creates a parser that reports semantic and lexical errors to `error_sink`.
    pub fn new<F>(error_sink: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        Parser {
            stack: Vec::new(),
            current: None,
            cdata: String::new(),
            root: None,
            seen_root_child: false,
            stopped: false,
            error: None,
            error_sink: Box::new(error_sink),
            used: false,
        }
    }

    /// Parses the plist file at `path`. Returns the root object, or `None` on
    /// any parse failure (after invoking the error sink) or on re-use of an
    /// already-used parser.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Option<Object> {
        if self.used {
            return None;
        }
        match File::open(path) {
            Ok(file) => self.parse_reader(file),
            Err(err) => {
                self.record_error(from_io_without_position(err));
                None
            }
        }
    }

    /// Parses an already-open byte stream. Returns the root object, or `None`
    /// on any parse failure (after invoking the error sink) or on re-use of
    /// an already-used parser.
    pub fn parse_reader<R: Read>(&mut self, reader: R) -> Option<Object> {
        if self.used {
            // Re-use is refused silently: the error sink is not invoked.
            return None;
        }
        self.used = true;

        if let Err(err) = tokenizer::drive(reader, self) {
            self.record_error(err);
        }

        self.root.take()
    }

    /// The first error encountered, if the most recent parse failed.
    pub fn into_error(self) -> Option<Error> {
        self.error
    }

    fn record_error(&mut self, err: Error) {
        if self.error.is_none() {
            (self.error_sink)(&err.to_string());
            self.error = Some(err);
        }
    }

    fn fail(&mut self, kind: ErrorKind) {
        XmlEventSink::stop(self);
        let err = kind.without_position();
        self.record_error(err);
    }

    /// Pushes a freshly constructed object as the new current frame, saving
    /// the previous current frame (if any) on the stack.
    fn push(&mut self, obj: Object) {
        if let Some(prev) = self.current.take() {
            self.stack.push(prev);
        }
        self.current = Some(Frame::new(obj));
    }

    /// Detaches the current frame's object from the parser, either making it
    /// the root (if there is no parent to attach it to) or attaching it to
    /// the parent dictionary/array now restored as the current frame.
    fn pop(&mut self) {
        let popped = match self.current.take() {
            Some(frame) => frame.current,
            None => {
                self.fail(ErrorKind::StackUnderflow);
                return;
            }
        };

        match self.stack.pop() {
            None => {
                // No parent: this object is the root.
                self.root = Some(popped);
            }
            Some(mut parent) => {
                match &mut parent.current {
                    Object::Array(array) => array.push(popped),
                    Object::Dictionary(dict) => {
                        let key = match std::mem::replace(&mut parent.key, KeyState::AwaitingKey) {
                            KeyState::KeyReady { key } => key,
                            other => {
                                // The state machine should never let a value
                                // close while its dict isn't key-ready.
                                parent.key = other;
                                self.stack.push(parent);
                                self.fail(ErrorKind::StackUnderflow);
                                return;
                            }
                        };
                        dict.insert(key, popped);
                    }
                    _ => {
                        // Parents on the stack are always containers.
                        self.fail(ErrorKind::StackUnderflow);
                        return;
                    }
                }
                self.current = Some(parent);
            }
        }

        self.cdata.clear();
    }

    fn current_is_container_context(&self) -> bool {
        match &self.current {
            None => !self.seen_root_child,
            Some(frame) => match &frame.current {
                Object::Array(_) => true,
                // While a <key> is open and collecting cdata, no nested
                // element may begin -- only character data is valid there.
                Object::Dictionary(_) => !matches!(frame.key, KeyState::KeyActive),
                _ => false,
            },
        }
    }

    fn wants_character_data(&self) -> bool {
        match &self.current {
            None => false,
            Some(frame) => {
                if frame.key == KeyState::KeyActive {
                    return true;
                }
                matches!(
                    frame.current,
                    Object::String(_) | Object::Integer(_) | Object::Real(_) | Object::Data(_) | Object::Date(_)
                )
            }
        }
    }
}

impl XmlEventSink for Parser {
    fn on_begin_parse(&mut self) {}

    fn on_end_parse(&mut self, success: bool) {
        if !success {
            // Dropping `current`/`stack`/`root` recursively frees every
            // object still owned by the parser -- ordinary Rust ownership
            // stands in for the manual cleanup pass a non-GC'd parser needs.
            self.current = None;
            self.stack.clear();
            self.root = None;
        } else {
            self.current = None;
            self.stack.clear();
            self.cdata.clear();
        }
    }

    fn on_start_element(&mut self, name: &str, _attrs: &[(String, String)], depth: usize) {
        if self.stopped {
            return;
        }

        if depth == 0 {
            if name != "plist" {
                self.fail(ErrorKind::MissingPlistRoot);
            }
            return;
        }

        if depth == 1 {
            if self.seen_root_child {
                self.fail(ErrorKind::ElementAfterRootElement {
                    name: name.to_owned(),
                });
                return;
            }
            self.seen_root_child = true;
        } else if !self.current_is_container_context() {
            self.fail(ErrorKind::ElementOutsideContainer {
                name: name.to_owned(),
            });
            return;
        }

        // Dictionary key/value pairing is only meaningful once we're inside one.
        // `current_is_container_context` already ruled out the *key-active*
        // state above, so only *awaiting-key* and *key-ready* reach here.
        if let Some(frame) = &mut self.current {
            if let Object::Dictionary(_) = frame.current {
                match &frame.key {
                    KeyState::AwaitingKey => {
                        if name != "key" {
                            self.fail(ErrorKind::ExpectedKey {
                                found: name.to_owned(),
                            });
                            return;
                        }
                        frame.key = KeyState::KeyActive;
                        self.cdata.clear();
                        return;
                    }
                    KeyState::KeyReady { .. } => {
                        if name == "key" {
                            self.fail(ErrorKind::KeyOutsideDictionary);
                            return;
                        }
                        // Any other element name is the value for the pending key.
                    }
                    KeyState::KeyActive => unreachable!("filtered by current_is_container_context"),
                }
            }
        }

        let obj = match name {
            "array" => Object::Array(Vec::new()),
            "dict" => Object::Dictionary(Dictionary::new()),
            "string" => {
                self.cdata.clear();
                Object::String(String::new())
            }
            "integer" => {
                self.cdata.clear();
                Object::Integer(0)
            }
            "real" => {
                self.cdata.clear();
                Object::Real(0.0)
            }
            "true" => Object::Boolean(true),
            "false" => Object::Boolean(false),
            "null" => Object::Null,
            "data" => {
                self.cdata.clear();
                Object::Data(Vec::new())
            }
            "date" => {
                self.cdata.clear();
                Object::Date(Date::from_xml_format("1970-01-01T00:00:00Z").unwrap())
            }
            "key" => {
                // Reached only when not inside a dictionary at all (the
                // in-dictionary <key> handling above already returned).
                self.fail(ErrorKind::KeyOutsideDictionary);
                return;
            }
            _ => {
                self.fail(ErrorKind::UnknownElement {
                    name: name.to_owned(),
                });
                return;
            }
        };

        self.push(obj);
    }

    fn on_end_element(&mut self, name: &str, depth: usize) {
        if self.stopped {
            return;
        }

        if depth == 0 {
            // Closing `</plist>`: nothing to do on the stack.
            return;
        }

        if name == "key" {
            match &mut self.current {
                Some(frame) if frame.key == KeyState::KeyActive => {
                    let key = std::mem::take(&mut self.cdata);
                    frame.key = KeyState::KeyReady { key };
                }
                _ => self.fail(ErrorKind::KeyOutsideDictionary),
            }
            self.cdata.clear();
            return;
        }

        let conversion = match name {
            "string" => {
                if let Some(frame) = &mut self.current {
                    frame.current = Object::String(std::mem::take(&mut self.cdata));
                }
                Ok(())
            }
            "integer" => self.convert_integer(),
            "real" => self.convert_real(),
            "data" => self.convert_data(),
            "date" => self.convert_date(),
            "dict" => {
                // A key captured but never given a value is a grammar error,
                // not a silently-dropped key.
                match &self.current {
                    Some(frame) if matches!(frame.key, KeyState::KeyReady { .. }) => {
                        Err(ErrorKind::UnterminatedKey)
                    }
                    _ => Ok(()),
                }
            }
            "true" | "false" | "null" | "array" => Ok(()),
            _ => Err(ErrorKind::UnknownElement {
                name: name.to_owned(),
            }),
        };

        match conversion {
            Ok(()) => self.pop(),
            Err(kind) => self.fail(kind),
        }
    }

    fn on_character_data(&mut self, text: &str, _depth: usize) {
        if self.stopped {
            return;
        }

        if self.wants_character_data() {
            self.cdata.push_str(text);
        } else if !text.chars().all(char::is_whitespace) {
            self.fail(ErrorKind::UnexpectedCharacterData);
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn report_error(&mut self, message: &str) {
        self.stop();
        self.record_error(ErrorKind::Reported(message.to_owned()).without_position());
    }
}

impl Parser {
    fn convert_integer(&mut self) -> Result<(), ErrorKind> {
        let trimmed = self.cdata.trim();
        let value: i64 = if let Some(hex) = trimmed.strip_prefix("0x") {
            // NetBSD-dialect unsigned hex literals, matching Apple's own parser.
            u64::from_str_radix(hex, 16)
                .map(|v| v as i64)
                .map_err(|_| ErrorKind::InvalidIntegerString)?
        } else {
            trimmed
                .parse::<i64>()
                .map_err(|_| ErrorKind::InvalidIntegerString)?
        };
        if let Some(frame) = &mut self.current {
            frame.current = Object::Integer(value);
        }
        Ok(())
    }

    fn convert_real(&mut self) -> Result<(), ErrorKind> {
        let value: f64 = self
            .cdata
            .trim()
            .parse()
            .map_err(|_| ErrorKind::InvalidRealString)?;
        if let Some(frame) = &mut self.current {
            // Written into the Real slot -- not the Integer slot, unlike the
            // buggy lineage this parser is corrected from.
            frame.current = Object::Real(value);
        }
        Ok(())
    }

    fn convert_data(&mut self) -> Result<(), ErrorKind> {
        let mut encoded = self.cdata.clone();
        encoded.retain(|c| !c.is_ascii_whitespace());
        let bytes = base64_standard
            .decode(&encoded)
            .map_err(|_| ErrorKind::InvalidDataString)?;
        if let Some(frame) = &mut self.current {
            frame.current = Object::Data(bytes);
        }
        Ok(())
    }

    fn convert_date(&mut self) -> Result<(), ErrorKind> {
        let date = Date::from_xml_format(self.cdata.trim()).map_err(|_| ErrorKind::InvalidDateString)?;
        if let Some(frame) = &mut self.current {
            frame.current = Object::Date(date);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives the state machine purely through `XmlEventSink`, with no XML
    /// tokenizer involved, to confirm the trait alone is enough to control a
    /// `Parser` -- including aborting it early via `stop()`/`report_error()`.
    #[test]
    fn trait_alone_can_drive_and_abort_the_parser() {
        let mut parser = Parser::new(|_| {});
        let sink: &mut dyn XmlEventSink = &mut parser;

        sink.on_begin_parse();
        sink.on_start_element("plist", &[], 0);
        sink.on_start_element("array", &[], 1);
        assert!(!sink.is_stopped());

        sink.report_error("synthetic tokenizer failure");
        assert!(sink.is_stopped());

        // Further events are ignored once stopped.
        sink.on_start_element("integer", &[], 2);
        sink.on_end_element("array", 1);
        sink.on_end_parse(false);

        assert!(parser.root.is_none());
        assert!(parser.error.is_some());
    }

    #[test]
    fn stop_alone_halts_event_delivery_without_recording_an_error() {
        let mut parser = Parser::new(|_| {});
        let sink: &mut dyn XmlEventSink = &mut parser;

        sink.on_begin_parse();
        sink.on_start_element("plist", &[], 0);
        sink.stop();
        assert!(sink.is_stopped());

        sink.on_start_element("string", &[], 1);
        sink.on_end_parse(true);

        assert!(parser.root.is_none());
        assert!(parser.error.is_none());
    }
}
