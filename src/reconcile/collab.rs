//! Host-environment collaborators: the address bar and the clipboard.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Location update failed: {0}")]
pub struct LocationError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// The document location. `replace` rewrites history in place, without
/// navigating and without leaving the old entry behind.
pub trait Location {
    fn href(&self) -> String;
    fn replace(&mut self, href: &str) -> Result<(), LocationError>;
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-memory location, for the CLI and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLocation {
    href: String,
    replacements: usize,
}

impl MemoryLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            replacements: 0,
        }
    }

    /// How many times history was rewritten.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> String {
        self.href.clone()
    }

    fn replace(&mut self, href: &str) -> Result<(), LocationError> {
        self.href = href.to_string();
        self.replacements += 1;
        Ok(())
    }
}

/// Clipboard that keeps the last written text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
