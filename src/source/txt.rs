//! # Text List Source
//!
//! Parses the flat text format: one function per line,
//! `"<ReturnType> <Name>(<parameters>)[ <CallingConventionTag>]"`. Parameters are
//! comma-separated `"<Type> <Name>"` pairs, optionally prefixed with `in`/`ref`/`out`;
//! an empty or `void` parameter list means zero parameters. A blank line (or the end
//! of the stream) terminates the sequence.

use std::io::{BufRead, Seek, SeekFrom};

use crate::signature::{FunctionSignature, ParameterSignature};

use super::{Source, SourceError};

/// Source reading signatures from a rewindable text stream
pub struct TxtListSource<R> {
    /// Underlying rewindable stream
    reader: R,
    /// Latched once a blank line or the end of the stream is seen; only a reset clears it
    exhausted: bool,
}

impl<R: BufRead + Seek> TxtListSource<R> {
    /// Creates a source over a rewindable text stream
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            exhausted: false,
        }
    }
}

impl<R: BufRead + Seek> Source for TxtListSource<R> {
    fn reset(&mut self) -> Result<(), SourceError> {
        // physically rewind so the list can be traversed once per output section
        self.reader.seek(SeekFrom::Start(0))?;
        self.exhausted = false;
        Ok(())
    }

    fn next_function(&mut self) -> Result<Option<FunctionSignature>, SourceError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        let line = line.trim();

        if read == 0 || line.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }

        parse_line(line).map(Some)
    }
}

/// Parses a single signature line
fn parse_line(line: &str) -> Result<FunctionSignature, SourceError> {
    let malformed = || SourceError::Format {
        line: line.to_string(),
    };

    let parm_start = line.find('(').ok_or_else(malformed)?;
    let parm_end = line.rfind(')').ok_or_else(malformed)?;
    if parm_end < parm_start {
        return Err(malformed());
    }

    let header = &line[..parm_start];
    let first_space = header.find(' ').ok_or_else(malformed)?;
    let return_type = header[..first_space].trim();
    let name = header[first_space + 1..].trim();
    if return_type.is_empty() || name.is_empty() {
        return Err(malformed());
    }

    let convention = line[parm_end + 1..].trim();
    let convention = (!convention.is_empty()).then(|| convention.to_string());

    let parameters = parse_parameters(&line[parm_start + 1..parm_end], line)?;

    Ok(FunctionSignature {
        name: name.to_string(),
        return_type: return_type.to_string(),
        call_convention: convention,
        parameters,
    })
}

/// Parses the comma-separated parameter list between the parentheses
fn parse_parameters(list: &str, line: &str) -> Result<Vec<ParameterSignature>, SourceError> {
    let list = list.trim();
    if list.is_empty() || list == "void" {
        return Ok(Vec::new());
    }

    list.split(',')
        .map(|parameter| parse_parameter(parameter, line))
        .collect()
}

/// Parses one `"[in|ref|out ]<Type> <Name>"` parameter
fn parse_parameter(parameter: &str, line: &str) -> Result<ParameterSignature, SourceError> {
    let tokens: Vec<&str> = parameter.split_whitespace().collect();

    match tokens.as_slice() {
        [ty, name] => Ok(ParameterSignature::new(*ty, *name)),
        // three tokens mean the first one must be a by-ref modifier keyword
        [modifier, ty, name] if matches!(*modifier, "in" | "ref" | "out") => Ok(
            ParameterSignature::new(format!("{modifier} {ty}"), *name),
        ),
        _ => Err(SourceError::Format {
            line: line.to_string(),
        }),
    }
}
