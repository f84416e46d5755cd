//! Run-level error type.
//!
//! Every failure aborts the run: this is a one-shot analysis tool with no
//! retry or partial-result mode. The `ErrorKind` determines the process exit
//! code, which keeps failures scriptable (e.g. distinguishing a network
//! outage from a feed schema change).

/// Failure classes, each mapped to a stable exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid flags or parameters (bad death rate, bad chart size, ...).
    Usage,
    /// Local file I/O failure (exports, debug bundles).
    Io,
    /// Network/transport failure or a non-success HTTP status.
    Fetch,
    /// Response body is not a JSON array of objects.
    Parse,
    /// A `date` field is not a valid 8-digit `YYYYMMDD` numeral.
    DateFormat,
    /// A required field is absent, duplicated, or carries an invalid value.
    Schema,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::Io => 3,
            ErrorKind::Fetch => 4,
            ErrorKind::Parse => 5,
            ErrorKind::DateFormat => 6,
            ErrorKind::Schema => 7,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
