//! # Code Synthesis Engine
//!
//! Consumes a resettable source of translated signatures and writes the generated
//! class in five ordered sections: preamble, pointer declarations, optional loader,
//! call-forwarding wrappers, epilogue

use std::io::Write;

use log::debug;
use thiserror::Error;

use crate::settings::{GeneratorSettings, LoaderMode, Scope, SettingsError};
use crate::source::{Source, SourceError};

/// Suffix appended to every function pointer field name
const POINTER_NAME_SUFFIX: &str = "Ptr";
/// Name of the generated private loader stub
const FUNCTION_LOADER_NAME: &str = "LoadFunction";

/// Errors aborting a generation run
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Settings failed validation; nothing has been written
    #[error("invalid generator settings: {0}")]
    Settings(#[from] SettingsError),
    /// The source failed to yield or rewind
    #[error("source failure: {0}")]
    Source(#[from] SourceError),
    /// The output sink rejected a write
    #[error("output failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Code synthesis engine for one generation run
///
/// Construction validates the settings before anything touches the sink; generation
/// then traverses the source once per section, resetting it between passes.
pub struct Generator<S, W> {
    /// Validated settings for this run
    settings: GeneratorSettings,
    /// Signature source, traversed once per output section
    source: S,
    /// Output sink receiving the artifact
    output: W,
    /// One indent unit: N spaces, or a single tab when the configured width is 0
    indent: String,
    /// Line terminator written after every line
    newline: String,
}

impl<S: Source, W: Write> Generator<S, W> {
    /// Creates a generator, validating `settings` before any output is written
    pub fn new(
        source: S,
        output: W,
        mut settings: GeneratorSettings,
    ) -> Result<Self, GeneratorError> {
        settings.validate()?;

        let indent = if settings.indentation > 0 {
            " ".repeat(settings.indentation as usize)
        } else {
            String::from("\t")
        };
        // validate filled in the newline
        let newline = settings.newline.clone().unwrap_or_default();

        Ok(Self {
            settings,
            source,
            output,
            indent,
            newline,
        })
    }

    /// Runs the full generation pass, writing the artifact to the sink
    ///
    /// Each emitting section observes the source from a fresh reset; no signatures are
    /// cached across passes.
    pub fn process(&mut self) -> Result<(), GeneratorError> {
        self.write_preamble()?;

        debug!("writing pointer declarations");
        self.source.reset()?;
        self.write_pointer_fields()?;

        if self.settings.loader != LoaderMode::None {
            self.blank_line()?;
            debug!("writing loader block");
            self.source.reset()?;
            self.write_loader()?;
        }

        self.blank_line()?;
        debug!("writing call wrappers");
        self.source.reset()?;
        self.write_wrappers()?;

        self.write_epilogue()?;
        Ok(())
    }

    /// Consumes the generator, returning the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes `text` terminated with the configured newline
    fn line(&mut self, text: &str) -> Result<(), GeneratorError> {
        self.output.write_all(text.as_bytes())?;
        self.output.write_all(self.newline.as_bytes())?;
        Ok(())
    }

    /// Writes an empty line
    fn blank_line(&mut self) -> Result<(), GeneratorError> {
        self.output.write_all(self.newline.as_bytes())?;
        Ok(())
    }

    /// Self-reference qualifier for field access: `this` or the class name
    fn qualifier(&self) -> &str {
        match self.settings.scope {
            Scope::Instance => "this",
            Scope::Static => &self.settings.class_name,
        }
    }

    /// Default convention tag from the settings, when one is configured
    fn default_convention(&self) -> Option<&str> {
        self.settings
            .calling_convention
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }

    /// Section 1: usings, namespace and class opening
    fn write_preamble(&mut self) -> Result<(), GeneratorError> {
        self.line("using System;")?;
        if self.settings.aggressive_inline {
            self.line("using System.Runtime.CompilerServices;")?;
        }
        self.blank_line()?;

        self.line(&format!("namespace {}", self.settings.namespace))?;
        self.line("{")?;

        let keyword = if self.settings.scope == Scope::Static {
            "static "
        } else {
            ""
        };
        self.line(&format!(
            "{}{}unsafe class {}",
            self.indent, keyword, self.settings.class_name
        ))?;
        self.line(&format!("{}{{", self.indent))?;
        Ok(())
    }

    /// Section 2: one private pointer field per signature
    fn write_pointer_fields(&mut self) -> Result<(), GeneratorError> {
        let two = self.indent.repeat(2);
        let visibility = if self.settings.scope == Scope::Static {
            "private static "
        } else {
            "private "
        };

        while let Some(signature) = self.source.next_function()? {
            let pointer = signature.pointer_type(self.default_convention());
            self.line(&format!(
                "{two}{visibility}{pointer} {}{POINTER_NAME_SUFFIX};",
                signature.name
            ))?;
        }
        Ok(())
    }

    /// Section 3: `Init` method or constructor assigning every field, plus the loader stub
    fn write_loader(&mut self) -> Result<(), GeneratorError> {
        let two = self.indent.repeat(2);
        let three = self.indent.repeat(3);
        let qualifier = self.qualifier().to_string();

        let header = match (self.settings.loader, self.settings.scope) {
            (LoaderMode::Function, Scope::Static) => String::from("public static void Init()"),
            (LoaderMode::Function, Scope::Instance) => String::from("public void Init()"),
            (LoaderMode::Constructor, Scope::Static) => {
                format!("static {}()", self.settings.class_name)
            }
            (LoaderMode::Constructor, Scope::Instance) => {
                format!("public {}()", self.settings.class_name)
            }
            // process never enters the loader section in this mode
            (LoaderMode::None, _) => return Ok(()),
        };
        self.line(&format!("{two}{header}"))?;
        self.line(&format!("{two}{{"))?;

        while let Some(signature) = self.source.next_function()? {
            let pointer = signature.pointer_type(self.default_convention());
            self.line(&format!(
                "{three}{qualifier}.{name}{POINTER_NAME_SUFFIX} = ({pointer}){qualifier}.{FUNCTION_LOADER_NAME}(\"{name}\");",
                name = signature.name
            ))?;
        }

        self.line(&format!("{two}}}"))?;
        self.blank_line()?;

        let keyword = if self.settings.scope == Scope::Static {
            "static "
        } else {
            ""
        };
        self.line(&format!(
            "{two}private {keyword}void* {FUNCTION_LOADER_NAME}(string name)"
        ))?;
        self.line(&format!("{two}{{"))?;
        self.line(&format!("{three}// Provide a function loader pls"))?;
        self.line(&format!("{three}throw new NotImplementedException();"))?;
        self.line(&format!("{two}}}"))?;
        self.blank_line()?;
        Ok(())
    }

    /// Section 4: one public call-forwarding wrapper per signature
    fn write_wrappers(&mut self) -> Result<(), GeneratorError> {
        let two = self.indent.repeat(2);
        let three = self.indent.repeat(3);
        let qualifier = self.qualifier().to_string();

        while let Some(signature) = self.source.next_function()? {
            if self.settings.aggressive_inline {
                self.line(&format!(
                    "{two}[MethodImpl(MethodImplOptions.AggressiveInlining)]"
                ))?;
            }

            self.line(&format!(
                "{two}public {}",
                signature.declaration(self.settings.scope)
            ))?;
            self.line(&format!("{two}{{"))?;

            let arguments = signature
                .parameters
                .iter()
                .map(|parameter| parameter.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let keyword = if signature.returns_value() {
                "return "
            } else {
                ""
            };
            self.line(&format!(
                "{three}{keyword}{qualifier}.{}{POINTER_NAME_SUFFIX}({arguments});",
                signature.name
            ))?;

            self.line(&format!("{two}}}"))?;
            self.blank_line()?;
        }
        Ok(())
    }

    /// Section 5: closes the class and namespace blocks
    fn write_epilogue(&mut self) -> Result<(), GeneratorError> {
        self.line(&format!("{}}}", self.indent))?;
        // the final namespace brace carries no trailing newline
        self.output.write_all(b"}")?;
        Ok(())
    }
}
