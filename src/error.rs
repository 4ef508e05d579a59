use std::{error, fmt, io};

/// This type represents all possible errors that can occur when parsing an XML plist.
#[derive(Debug)]
pub struct Error {
    inner: Box<ErrorImpl>,
}

#[derive(Debug)]
struct ErrorImpl {
    kind: ErrorKind,
    file_position: Option<FilePosition>,
}

#[derive(Debug)]
pub(crate) enum ErrorKind {
    // Structural errors (grammar nesting)
    MissingPlistRoot,
    ElementAfterRootElement { name: String },
    ElementOutsideContainer { name: String },

    // Dictionary key/value pairing errors
    KeyOutsideDictionary,
    ExpectedKey { found: String },
    UnterminatedKey,

    // Grammar vocabulary errors
    UnknownElement { name: String },
    UnexpectedCharacterData,

    // Typed-conversion errors
    InvalidIntegerString,
    InvalidRealString,
    InvalidDataString,
    InvalidDateString,

    // Defensive / tokenizer-invariant errors
    StackUnderflow,

    UnexpectedEof,
    InvalidXmlSyntax,
    InvalidXmlUtf8,

    Io(io::Error),

    /// A free-form diagnostic reported through `XmlEventSink::report_error`
    /// by a driver that has no structured `ErrorKind` of its own to raise.
    Reported(String),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FilePosition(pub(crate) u64);

impl Error {
    /// Returns true if this error was caused by a failure to read bytes from the underlying stream.
    pub fn is_io(&self) -> bool {
        self.as_io().is_some()
    }

    /// Returns true if this error was caused by prematurely reaching the end of the input data.
    pub fn is_eof(&self) -> bool {
        matches!(self.inner.kind, ErrorKind::UnexpectedEof)
    }

    /// Returns the underlying error if it was caused by a failure to read bytes from the
    /// underlying stream.
    pub fn as_io(&self) -> Option<&io::Error> {
        if let ErrorKind::Io(err) = &self.inner.kind {
            Some(err)
        } else {
            None
        }
    }

    /// Returns the byte offset into the input at which this error was detected, if known.
    pub fn byte_offset(&self) -> Option<u64> {
        self.inner.file_position.map(|pos| pos.0)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.inner.kind {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(position) = &self.inner.file_position {
            write!(f, "{} ({})", &self.inner.kind, position)
        } else {
            fmt::Display::fmt(&self.inner.kind, f)
        }
    }
}

impl fmt::Display for FilePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "offset {}", self.0)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::MissingPlistRoot => write!(f, "document does not start with a <plist> root element"),
            ErrorKind::ElementAfterRootElement { name } => {
                write!(f, "unexpected element '{}' after root element", name)
            }
            ErrorKind::ElementOutsideContainer { name } => {
                write!(f, "element '{}' opened outside of a container context", name)
            }
            ErrorKind::KeyOutsideDictionary => {
                write!(f, "<key> element is invalid here (outside a <dict>, or before the previous key's value)")
            }
            ErrorKind::ExpectedKey { found } => write!(f, "expected key, got '{}'", found),
            ErrorKind::UnterminatedKey => write!(f, "dictionary closed with a key awaiting its value"),
            ErrorKind::UnknownElement { name } => write!(f, "unknown element '{}'", name),
            ErrorKind::UnexpectedCharacterData => {
                write!(f, "unexpected character data outside of a leaf or key element")
            }
            ErrorKind::InvalidIntegerString => write!(f, "malformed <integer> contents"),
            ErrorKind::InvalidRealString => write!(f, "malformed <real> contents"),
            ErrorKind::InvalidDataString => write!(f, "malformed <data> (base64) contents"),
            ErrorKind::InvalidDateString => write!(f, "malformed <date> (ISO-8601) contents"),
            ErrorKind::StackUnderflow => write!(f, "parser stack underflow"),
            ErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ErrorKind::InvalidXmlSyntax => write!(f, "invalid XML syntax"),
            ErrorKind::InvalidXmlUtf8 => write!(f, "input is not valid UTF-8"),
            ErrorKind::Io(err) => write!(f, "{}", err),
            ErrorKind::Reported(message) => write!(f, "{}", message),
        }
    }
}

impl ErrorKind {
    pub fn with_byte_offset(self, offset: u64) -> Error {
        self.with_position(FilePosition(offset))
    }

    pub fn with_position(self, pos: FilePosition) -> Error {
        Error {
            inner: Box::new(ErrorImpl {
                kind: self,
                file_position: Some(pos),
            }),
        }
    }

    pub fn without_position(self) -> Error {
        Error {
            inner: Box::new(ErrorImpl {
                kind: self,
                file_position: None,
            }),
        }
    }
}

pub(crate) fn from_io_without_position(err: io::Error) -> Error {
    ErrorKind::Io(err).without_position()
}
