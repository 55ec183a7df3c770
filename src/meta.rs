//! # Reflected Metadata Model
//!
//! Native type and parameter descriptions the way a metadata catalog records them,
//! mirroring what a reflection walk over a managed assembly yields. The translator
//! consumes these; the catalog sources only enumerate them.

use serde::Deserialize;

/// Native ABI tag governing how arguments and results cross a function pointer boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CallingConvention {
    /// Caller-cleans-stack C convention
    Cdecl,
    /// Callee-cleans-stack convention
    StdCall,
    /// Register-first argument passing
    FastCall,
    /// `this` pointer in a register
    ThisCall,
    /// Platform default marker; carries no textual spelling
    Winapi,
}

/// A reflected native type description
///
/// `name` is the simple name including the reflection suffixes (`&` for by-reference,
/// `[]` for arrays, `*` for pointers); `full_name` is namespace-qualified and uses `+`
/// as the nesting separator, exactly as reflection reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NativeType {
    /// Namespace portion of the qualified name (e.g. `System`)
    #[serde(default)]
    pub namespace: String,
    /// Simple name including suffixes (e.g. `Int32&`, `Byte[]`)
    pub name: String,
    /// Fully qualified name; nested types separate nesting levels with `+`
    #[serde(default)]
    pub full_name: String,
    /// Whether the type is delegate-shaped (a callback)
    #[serde(default)]
    pub is_delegate: bool,
}

impl NativeType {
    /// Creates a type in the given namespace, deriving the qualified name
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        let full_name = format!("{namespace}.{name}");
        Self {
            namespace,
            name,
            full_name,
            is_delegate: false,
        }
    }

    /// Creates a type in the core `System` namespace
    pub fn system(name: impl Into<String>) -> Self {
        Self::new("System", name)
    }

    /// Marks the type as delegate-shaped
    pub fn delegate(mut self) -> Self {
        self.is_delegate = true;
        self
    }

    /// Returns the by-reference form of this type
    pub fn by_ref(mut self) -> Self {
        self.name.push('&');
        self.full_name.push('&');
        self
    }

    /// Returns the single-dimensional array form of this type
    pub fn array(mut self) -> Self {
        self.name.push_str("[]");
        self.full_name.push_str("[]");
        self
    }

    /// Whether the type is passed by reference
    pub fn is_by_ref(&self) -> bool {
        self.name.ends_with('&')
    }

    /// Whether the type is an array type
    pub fn is_array(&self) -> bool {
        self.name.contains("[]")
    }
}

/// A reflected parameter description
///
/// The `is_in`/`is_out` flags mirror the reflection attributes on by-reference
/// parameters; both false means a plain unrestricted reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NativeParameter {
    /// Parameter type
    #[serde(rename = "type")]
    pub ty: NativeType,
    /// Parameter identifier
    pub name: String,
    /// Declared input-only
    #[serde(default)]
    pub is_in: bool,
    /// Declared output-only
    #[serde(default)]
    pub is_out: bool,
}

impl NativeParameter {
    /// Creates a plain parameter with no direction attributes
    pub fn new(ty: NativeType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            is_in: false,
            is_out: false,
        }
    }

    /// Marks the parameter input-only
    pub fn input(mut self) -> Self {
        self.is_in = true;
        self
    }

    /// Marks the parameter output-only
    pub fn output(mut self) -> Self {
        self.is_out = true;
        self
    }
}
