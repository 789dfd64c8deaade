use crate::FormatTag;
use std::fmt;

/// An error that can occur when decoding or encoding map data
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Unwrap the specific type of error
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset where the data ran out (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.offset()
    }

    pub(crate) fn truncated(format: FormatTag, expected: usize, actual: usize) -> Error {
        Error::new(ErrorKind::Truncated {
            format,
            expected,
            actual,
        })
    }

    pub(crate) fn dimensions(format: FormatTag, width: i32, height: i32) -> Error {
        Error::new(ErrorKind::InvalidDimensions {
            format,
            width,
            height,
        })
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// The native map header carries a version other than 1
    UnsupportedVersion { version: i16 },

    /// The buffer is shorter than the header and cell records require
    Truncated {
        format: FormatTag,
        expected: usize,
        actual: usize,
    },

    /// An object file count promises more records than the buffer holds
    TruncatedObjects { expected: usize, actual: usize },

    /// Map dimensions fall outside of `1..=10000`
    InvalidDimensions {
        format: FormatTag,
        width: i32,
        height: i32,
    },

    /// A grid whose cell storage does not match its dimensions
    InvalidGrid {
        width: u32,
        height: u32,
        cells: usize,
    },

    /// A numeric format tag that has no codec
    UnsupportedFormat(u16),

    /// Reading or writing a map or object file failed
    Io(std::io::Error),
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::Truncated { actual, .. } => Some(actual),
            ErrorKind::TruncatedObjects { actual, .. } => Some(actual),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::UnsupportedVersion { version } => {
                write!(f, "unsupported native map version: {}", version)
            }
            ErrorKind::Truncated {
                format,
                expected,
                actual,
            } => write!(
                f,
                "{} map truncated (tag: {}, expected: {} bytes, found: {} bytes, offset: {})",
                format.name(),
                format.value(),
                expected,
                actual,
                actual
            ),
            ErrorKind::TruncatedObjects { expected, actual } => write!(
                f,
                "object file truncated (expected: {} bytes, found: {} bytes)",
                expected, actual
            ),
            ErrorKind::InvalidDimensions {
                format,
                width,
                height,
            } => write!(
                f,
                "invalid {} map dimensions (tag: {}, width: {}, height: {})",
                format.name(),
                format.value(),
                width,
                height
            ),
            ErrorKind::InvalidGrid {
                width,
                height,
                cells,
            } => write!(
                f,
                "grid failed validation (width: {}, height: {}, cells: {})",
                width, height, cells
            ),
            ErrorKind::UnsupportedFormat(tag) => write!(f, "no codec for map format tag {}", tag),
            ErrorKind::Io(ref err) => write!(f, "io error: {}", err),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}
