//! # Signature Model
//!
//! Translated, target-neutral descriptions of callable functions, produced by sources
//! and consumed by the code synthesis engine

use crate::settings::Scope;

/// Sentinel return type meaning "no return value"
pub const VOID: &str = "void";

/// The translated shape of a single native function
///
/// Sources produce a fresh value per call; once constructed a signature is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Function identifier
    pub name: String,
    /// Textual return type; [`VOID`] means the function returns nothing
    pub return_type: String,
    /// Calling convention override, or `None` to fall back to the generator-wide default
    pub call_convention: Option<String>,
    /// Parameters in exact call-site order
    pub parameters: Vec<ParameterSignature>,
}

impl FunctionSignature {
    /// Renders the unmanaged function pointer type for this signature
    ///
    /// The signature's own convention wins over `default_convention`; when neither is
    /// set, no convention tag is emitted.
    pub fn pointer_type(&self, default_convention: Option<&str>) -> String {
        let mut out = String::from("delegate* unmanaged ");

        let convention = self
            .call_convention
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| default_convention.filter(|c| !c.trim().is_empty()));

        if let Some(convention) = convention {
            out.push_str(&format!("[{convention}] "));
        }

        out.push('<');
        for parameter in &self.parameters {
            out.push_str(&parameter.ty);
            out.push_str(", ");
        }
        out.push_str(&self.return_type);
        out.push('>');

        out
    }

    /// Renders the wrapper method header: return type, name and parameter list
    pub fn declaration(&self, scope: Scope) -> String {
        let mut out = String::new();

        if scope == Scope::Static {
            out.push_str("static ");
        }
        out.push_str(&format!("{} {}(", self.return_type, self.name));

        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("{} {}", parameter.ty, parameter.name));
        }
        out.push(')');

        out
    }

    /// Whether wrappers must `return` the pointer invocation's result
    pub fn returns_value(&self) -> bool {
        self.return_type != VOID
    }
}

/// A translated parameter: textual type and verbatim name
///
/// The type may carry an `in`/`out`/`ref` prefix or be pointer-erased, depending on
/// the translation policy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSignature {
    /// Textual parameter type
    pub ty: String,
    /// Parameter identifier, copied verbatim from the source
    pub name: String,
}

impl ParameterSignature {
    /// Creates a new parameter signature
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::Scope;
    use crate::signature::{FunctionSignature, ParameterSignature};

    /// Signature of `int Add(int a, int b)` with no convention override
    fn add() -> FunctionSignature {
        FunctionSignature {
            name: "Add".into(),
            return_type: "int".into(),
            call_convention: None,
            parameters: vec![
                ParameterSignature::new("int", "a"),
                ParameterSignature::new("int", "b"),
            ],
        }
    }

    #[test]
    /// Pointer types list parameter types before the return type
    fn pointer_type_with_parameters() {
        assert_eq!(
            add().pointer_type(None),
            "delegate* unmanaged <int, int, int>"
        );
    }

    #[test]
    /// A parameterless signature renders only its return type
    fn pointer_type_without_parameters() {
        let signature = FunctionSignature {
            name: "Tick".into(),
            return_type: "ulong".into(),
            call_convention: None,
            parameters: Vec::new(),
        };

        assert_eq!(signature.pointer_type(None), "delegate* unmanaged <ulong>");
    }

    #[test]
    /// The signature's own convention wins over the generator default
    fn pointer_type_convention_precedence() {
        let mut signature = add();

        // no override: the default applies
        assert_eq!(
            signature.pointer_type(Some("Cdecl")),
            "delegate* unmanaged [Cdecl] <int, int, int>"
        );

        // override: the default is ignored
        signature.call_convention = Some("Stdcall".into());
        assert_eq!(
            signature.pointer_type(Some("Cdecl")),
            "delegate* unmanaged [Stdcall] <int, int, int>"
        );

        // blank values never emit a tag
        signature.call_convention = Some("  ".into());
        assert_eq!(
            signature.pointer_type(Some(" ")),
            "delegate* unmanaged <int, int, int>"
        );
    }

    #[test]
    /// Static scope prefixes the declaration with the `static` keyword
    fn declaration_scope() {
        assert_eq!(add().declaration(Scope::Static), "static int Add(int a, int b)");
        assert_eq!(add().declaration(Scope::Instance), "int Add(int a, int b)");
    }

    #[test]
    /// Only the `void` sentinel suppresses the wrapper's return statement
    fn returns_value() {
        assert!(add().returns_value());

        let mut signature = add();
        signature.return_type = "void".into();
        assert!(!signature.returns_value());

        // a pointer to void is still a value
        signature.return_type = "void*".into();
        assert!(signature.returns_value());
    }
}
