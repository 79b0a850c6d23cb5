//! JSON body decoding
//!
//! Parser errors are sorted into a small fixed set of [`DecodeFailure`]s so
//! the executor can log a useful diagnostic and still hand the caller a plain
//! [`NetworkError::Decoding`](crate::NetworkError::Decoding).

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// Why a body could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    /// Body is not valid JSON or ends early
    DataCorrupted(Context),
    /// A required key is absent
    KeyNotFound {
        /// Name of the missing key
        key: String,
        /// Parser context
        context: Context,
    },
    /// A value has the wrong type or shape
    TypeMismatch(Context),
    /// A required value is `null`
    ValueNotFound(Context),
    /// Anything the parser reported that fits none of the above
    Unrecognized(Context),
}

/// Parser message and position of a decode failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Message reported by the parser
    pub message: String,
    /// 1-based line, 0 when unknown
    pub line: usize,
    /// 1-based column, 0 when unknown
    pub column: usize,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (line {}, column {})", self.message, self.line, self.column)
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeFailure::DataCorrupted(ctx) => write!(f, "data corrupted: {}", ctx),
            DecodeFailure::KeyNotFound { key, context } => {
                write!(f, "{} was not found: {}", key, context)
            }
            DecodeFailure::TypeMismatch(ctx) => write!(f, "type mismatch: {}", ctx),
            DecodeFailure::ValueNotFound(ctx) => write!(f, "no value was found: {}", ctx),
            DecodeFailure::Unrecognized(ctx) => write!(f, "unrecognized error: {}", ctx),
        }
    }
}

impl From<serde_json::Error> for DecodeFailure {
    fn from(err: serde_json::Error) -> Self {
        let full = err.to_string();
        // serde_json appends " at line X column Y" to the message
        let message = match full.rfind(" at line ") {
            Some(idx) if err.line() != 0 => full[..idx].to_string(),
            _ => full,
        };
        let context = Context {
            message,
            line: err.line(),
            column: err.column(),
        };

        match err.classify() {
            Category::Syntax | Category::Eof => DecodeFailure::DataCorrupted(context),
            Category::Data => classify_data(context),
            Category::Io => DecodeFailure::Unrecognized(context),
        }
    }
}

fn classify_data(context: Context) -> DecodeFailure {
    if let Some(rest) = context.message.strip_prefix("missing field `") {
        let key = rest.split('`').next().unwrap_or_default().to_string();
        return DecodeFailure::KeyNotFound { key, context };
    }

    if context.message.starts_with("invalid type: null") {
        return DecodeFailure::ValueNotFound(context);
    }

    DecodeFailure::TypeMismatch(context)
}

/// Decode a JSON body into `T`
pub fn decode<T>(bytes: &[u8]) -> Result<T, DecodeFailure>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes).map_err(DecodeFailure::from)
}
