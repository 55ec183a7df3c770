//! # Generator Settings
//!
//! Validated configuration consumed by the code synthesis engine

use thiserror::Error;

/// Whether generated members belong to the type itself or to instances of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Class, fields and methods are all marked `static`
    #[default]
    Static,
    /// Members are instance members and `this` qualifies field access
    Instance,
}

/// Whether/how the generated artifact wires up pointer fields at initialization time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderMode {
    /// No loader block is emitted
    #[default]
    None,
    /// A public `Init` method assigns every pointer field
    Function,
    /// A constructor (type initializer in static scope) assigns every pointer field
    Constructor,
}

/// Errors raised by [`GeneratorSettings::validate`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// Class name missing or blank
    #[error("class name must not be blank")]
    MissingClassName,
    /// Namespace missing or blank
    #[error("namespace must not be blank")]
    MissingNamespace,
}

/// Configuration for a single generation run
///
/// Built once from CLI arguments, validated exactly once before use, then treated as
/// immutable input by the engine.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Name of the generated class; must not be blank
    pub class_name: String,
    /// Namespace wrapping the generated class; must not be blank
    pub namespace: String,
    /// Member scope of the generated class
    pub scope: Scope,
    /// Loader emission mode
    pub loader: LoaderMode,
    /// Emit an inlining hint before each wrapper method
    pub aggressive_inline: bool,
    /// Default calling convention tag applied when a signature specifies none
    pub calling_convention: Option<String>,
    /// Line terminator; [`GeneratorSettings::validate`] fills in the host default when unset
    pub newline: Option<String>,
    /// Indent unit width: 0 means one tab, N > 0 means N space characters
    pub indentation: u8,
}

impl GeneratorSettings {
    /// Creates settings with the default scope, loader and policy values
    pub fn new(namespace: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            namespace: namespace.into(),
            scope: Scope::Static,
            loader: LoaderMode::Function,
            aggressive_inline: true,
            calling_convention: None,
            newline: None,
            indentation: 0,
        }
    }

    /// Checks required fields and fills in the default newline
    ///
    /// Must run exactly once before generation starts; a blank class name or namespace
    /// is fatal to the invocation and no output may be written afterwards.
    pub fn validate(&mut self) -> Result<(), SettingsError> {
        if self.class_name.trim().is_empty() {
            return Err(SettingsError::MissingClassName);
        }
        if self.namespace.trim().is_empty() {
            return Err(SettingsError::MissingNamespace);
        }
        if self.newline.as_deref().map_or(true, str::is_empty) {
            self.newline = Some(host_newline().to_string());
        }
        Ok(())
    }
}

/// Line terminator of the host platform
fn host_newline() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }
}
