use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location as PanicLocation;

/// Source position attached to error variants so failure reports point at
/// the call site that produced them rather than the conversion boilerplate.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ErrorLocation {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl ErrorLocation {
    /// Capture the caller's position. Combine with `#[track_caller]` on the
    /// enclosing function to walk the capture up to the interesting frame.
    #[track_caller]
    pub fn here() -> Self {
        Self::from(PanicLocation::caller())
    }

    pub const fn from(location: &'static PanicLocation<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl Display for ErrorLocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "[{}:{}:{}]", self.file, self.line, self.column)
    }
}
