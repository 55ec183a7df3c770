//! # Source
//!
//! Resettable producers of function signatures. The synthesis engine traverses a
//! source once per output section, so every implementation must support being
//! iterated from the start multiple times within one generation run.

pub mod catalog;
pub mod txt;

use std::io;

use thiserror::Error;

use crate::signature::FunctionSignature;

/// Errors produced while resetting or advancing a source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying stream failed to read or rewind
    #[error("source stream error: {0}")]
    Io(#[from] io::Error),
    /// A text-list line does not match the expected format
    #[error("malformed signature line: {line}")]
    Format {
        /// Offending input line
        line: String,
    },
}

/// A resettable, ordered producer of function signatures
///
/// The traversal order must be deterministic across repeated resets for the lifetime
/// of one generation call; the engine relies on each pass observing the same sequence.
pub trait Source {
    /// Rewinds to the logical start; idempotent when already at the start
    ///
    /// Sources backed by an external resource must physically rewind that resource.
    fn reset(&mut self) -> Result<(), SourceError>;

    /// Advances and returns the next signature, or `None` once exhausted
    ///
    /// After exhaustion, keeps returning `None` until the next [`Source::reset`].
    fn next_function(&mut self) -> Result<Option<FunctionSignature>, SourceError>;
}

/// In-memory source backed by a signature vector
///
/// The cursor restarts on reset, making the sequence iterable any number of times.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    /// Signatures in emission order
    functions: Vec<FunctionSignature>,
    /// Index of the next signature to yield
    cursor: usize,
}

impl VecSource {
    /// Creates a source over the given signatures
    pub fn new(functions: Vec<FunctionSignature>) -> Self {
        Self {
            functions,
            cursor: 0,
        }
    }
}

impl From<Vec<FunctionSignature>> for VecSource {
    fn from(functions: Vec<FunctionSignature>) -> Self {
        Self::new(functions)
    }
}

impl Source for VecSource {
    fn reset(&mut self) -> Result<(), SourceError> {
        self.cursor = 0;
        Ok(())
    }

    fn next_function(&mut self) -> Result<Option<FunctionSignature>, SourceError> {
        let next = self.functions.get(self.cursor).cloned();
        if next.is_some() {
            self.cursor += 1;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use crate::signature::FunctionSignature;
    use crate::source::{Source, VecSource};

    /// A minimal parameterless signature named `name`
    fn signature(name: &str) -> FunctionSignature {
        FunctionSignature {
            name: name.into(),
            return_type: "void".into(),
            call_convention: None,
            parameters: Vec::new(),
        }
    }

    #[test]
    /// The cursor yields in order, sticks at the end, and restarts on reset
    fn cursor_contract() {
        let mut source = VecSource::new(vec![signature("First"), signature("Second")]);

        assert_eq!(source.next_function().unwrap().unwrap().name, "First");
        assert_eq!(source.next_function().unwrap().unwrap().name, "Second");

        // exhausted sources keep yielding the end marker
        assert!(source.next_function().unwrap().is_none());
        assert!(source.next_function().unwrap().is_none());

        // reset restarts the traversal from the top
        source.reset().unwrap();
        assert_eq!(source.next_function().unwrap().unwrap().name, "First");
    }

    #[test]
    /// Resetting at the start is a no-op
    fn reset_idempotent() {
        let mut source = VecSource::new(vec![signature("Only")]);

        source.reset().unwrap();
        source.reset().unwrap();
        assert_eq!(source.next_function().unwrap().unwrap().name, "Only");
    }
}
