//! # Type/Signature Translator
//!
//! Policy-driven conversion of reflected native types, parameters and calling
//! conventions into the textual forms consumed by the code synthesis engine

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::meta::{CallingConvention, NativeParameter, NativeType};
use crate::signature::ParameterSignature;

/// Which spelling is used for pointer-sized integer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordType {
    /// Keep the framework `IntPtr`/`UIntPtr` spellings
    #[default]
    IntPtr,
    /// Rewrite to the native-int aliases `nint`/`nuint`
    Nint,
}

/// Translation policy shared by reference across all signature translations in one run
#[derive(Debug, Clone, Copy)]
pub struct TranslationOptions {
    /// Preferred spelling for pointer-sized integer types
    pub preferred_word: WordType,
    /// Keep framework primitive type names instead of rewriting to native-style spellings
    pub preserve_type_names: bool,
    /// Keep `in`/`out`/`ref` modifiers instead of erasing them to raw pointers
    pub preserve_by_ref: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            preferred_word: WordType::IntPtr,
            preserve_type_names: false,
            preserve_by_ref: true,
        }
    }
}

lazy_static! {
    /// Fixed substitution table from framework primitive names to native-style spellings
    static ref PRIMITIVES: HashMap<&'static str, &'static str> = HashMap::from([
        ("Boolean", "bool"),
        ("Byte", "byte"),
        ("SByte", "sbyte"),
        ("UInt16", "ushort"),
        ("Int16", "short"),
        ("UInt32", "uint"),
        ("Int32", "int"),
        ("UInt64", "ulong"),
        ("Int64", "long"),
        ("Single", "float"),
        ("Double", "double"),
        ("Decimal", "decimal"),
        ("String", "byte*"),
        ("StringBuilder", "byte*"),
        ("Char", "char"),
        ("Void", "void"),
    ]);
}

/// Translator applying one [`TranslationOptions`] policy to reflected descriptions
///
/// Translation is total: an unrecognized type falls through with its simple name
/// rather than failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    /// Policy honored by every translation
    options: TranslationOptions,
}

impl Translator {
    /// Creates a translator for the given options
    pub fn new(options: TranslationOptions) -> Self {
        Self { options }
    }

    /// Maps a reflected calling convention to its fixed textual spelling
    ///
    /// Absent or unrecognized conventions map to `None`, so the caller falls back to
    /// the generator-wide default.
    pub fn calling_convention(convention: Option<CallingConvention>) -> Option<&'static str> {
        match convention? {
            CallingConvention::Cdecl => Some("Cdecl"),
            CallingConvention::StdCall => Some("Stdcall"),
            CallingConvention::FastCall => Some("Fastcall"),
            CallingConvention::ThisCall => Some("Thiscall"),
            CallingConvention::Winapi => None,
        }
    }

    /// Translates a reflected type to its textual spelling
    pub fn type_name(&self, ty: &NativeType) -> String {
        // a permanent temporary solution to callback terror
        if ty.is_delegate {
            return String::from("void*");
        }

        let mut name = if ty.full_name.contains('+') {
            // keep nested qualification, drop namespace qualification
            ty.full_name
                .replace(&format!("{}.", ty.namespace), "")
                .replace('+', ".")
        } else {
            ty.name.clone()
        };

        if !self.options.preserve_type_names && ty.namespace == "System" {
            name = self.rewrite_primitive(&name);
        }

        if ty.is_array() {
            name = name.replace("[]", "*");
        }

        name
    }

    /// Applies the substitution table once to the base token of `name`
    ///
    /// Suffix characters (`&`, `*`, `[]`) are split off before the lookup and
    /// reattached after, so a substitution can never fire twice on one name.
    fn rewrite_primitive(&self, name: &str) -> String {
        let split = name
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(name.len());
        let (base, suffix) = name.split_at(split);

        let rewritten = PRIMITIVES.get(base).copied().or_else(|| {
            match (self.options.preferred_word, base) {
                (WordType::Nint, "IntPtr") => Some("nint"),
                (WordType::Nint, "UIntPtr") => Some("nuint"),
                _ => None,
            }
        });

        match rewritten {
            Some(rewritten) => format!("{rewritten}{suffix}"),
            None => name.to_string(),
        }
    }

    /// Translates a reflected parameter to its textual type, honoring the by-ref policy
    pub fn parameter_type(&self, parameter: &NativeParameter) -> String {
        if parameter.ty.is_by_ref() {
            if self.options.preserve_by_ref {
                // in wins over out wins over plain ref
                let modifier = if parameter.is_in {
                    "in"
                } else if parameter.is_out {
                    "out"
                } else {
                    "ref"
                };

                let name = self.type_name(&parameter.ty);
                format!("{modifier} {}", name.trim_end_matches('&'))
            } else {
                // erase to pointers if we aren't preserving by reference
                self.type_name(&parameter.ty).replace('&', "*")
            }
        } else {
            self.type_name(&parameter.ty)
        }
    }

    /// Translates an ordered reflected parameter list, copying names verbatim
    pub fn parameters(&self, parameters: &[NativeParameter]) -> Vec<ParameterSignature> {
        parameters
            .iter()
            .map(|parameter| {
                ParameterSignature::new(self.parameter_type(parameter), parameter.name.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::meta::{CallingConvention, NativeParameter, NativeType};
    use crate::translate::{TranslationOptions, Translator, WordType};

    /// Translator with the default policy (rewrite names, preserve by-ref, IntPtr word)
    fn default_translator() -> Translator {
        Translator::new(TranslationOptions::default())
    }

    #[test]
    /// Recognized conventions map to their fixed spellings, everything else to absent
    fn calling_conventions() {
        assert_eq!(
            Translator::calling_convention(Some(CallingConvention::Cdecl)),
            Some("Cdecl")
        );
        assert_eq!(
            Translator::calling_convention(Some(CallingConvention::StdCall)),
            Some("Stdcall")
        );
        assert_eq!(
            Translator::calling_convention(Some(CallingConvention::FastCall)),
            Some("Fastcall")
        );
        assert_eq!(
            Translator::calling_convention(Some(CallingConvention::ThisCall)),
            Some("Thiscall")
        );
        assert_eq!(
            Translator::calling_convention(Some(CallingConvention::Winapi)),
            None
        );
        assert_eq!(Translator::calling_convention(None), None);
    }

    #[test]
    /// Well-known primitives rewrite to their native-style spellings
    fn primitive_rewrites() {
        let translator = default_translator();

        assert_eq!(translator.type_name(&NativeType::system("Boolean")), "bool");
        assert_eq!(translator.type_name(&NativeType::system("Int32")), "int");
        assert_eq!(translator.type_name(&NativeType::system("UInt64")), "ulong");
        assert_eq!(translator.type_name(&NativeType::system("Single")), "float");
        assert_eq!(translator.type_name(&NativeType::system("String")), "byte*");
        assert_eq!(translator.type_name(&NativeType::system("Void")), "void");
    }

    #[test]
    /// `preserve_type_names` keeps the framework spellings untouched
    fn preserved_type_names() {
        let translator = Translator::new(TranslationOptions {
            preserve_type_names: true,
            ..TranslationOptions::default()
        });

        assert_eq!(translator.type_name(&NativeType::system("Int32")), "Int32");
        assert_eq!(translator.type_name(&NativeType::system("String")), "String");
    }

    #[test]
    /// Pointer-sized integers follow the configured word spelling, signed and unsigned
    fn word_size_policy() {
        let intptr = default_translator();
        assert_eq!(intptr.type_name(&NativeType::system("IntPtr")), "IntPtr");
        assert_eq!(intptr.type_name(&NativeType::system("UIntPtr")), "UIntPtr");

        let nint = Translator::new(TranslationOptions {
            preferred_word: WordType::Nint,
            ..TranslationOptions::default()
        });
        assert_eq!(nint.type_name(&NativeType::system("IntPtr")), "nint");
        assert_eq!(nint.type_name(&NativeType::system("UIntPtr")), "nuint");
    }

    #[test]
    /// Delegate-shaped types always degrade to an opaque pointer
    fn delegate_degrades_to_void_pointer() {
        let translator = Translator::new(TranslationOptions {
            preserve_type_names: true,
            ..TranslationOptions::default()
        });
        let callback = NativeType::new("Game", "LogHandler").delegate();

        // even with name preservation on, callbacks are out of scope
        assert_eq!(translator.type_name(&callback), "void*");
    }

    #[test]
    /// Nested types drop the namespace but keep the nesting as member access
    fn nested_type_names() {
        let translator = default_translator();
        let nested = NativeType {
            namespace: "Wrappers".into(),
            name: "Handle".into(),
            full_name: "Wrappers.Native+Handle".into(),
            is_delegate: false,
        };

        assert_eq!(translator.type_name(&nested), "Native.Handle");
    }

    #[test]
    /// Arrays rewrite their bracket suffix to a pointer suffix
    fn array_suffix() {
        let translator = default_translator();
        assert_eq!(
            translator.type_name(&NativeType::system("Int32").array()),
            "int*"
        );

        // name preservation only skips the primitive rewrite, not the array rewrite
        let preserving = Translator::new(TranslationOptions {
            preserve_type_names: true,
            ..TranslationOptions::default()
        });
        assert_eq!(
            preserving.type_name(&NativeType::system("Int32").array()),
            "Int32*"
        );
    }

    #[test]
    /// Types outside the core namespace never hit the substitution table
    fn non_system_namespace_untouched() {
        let translator = default_translator();
        let ty = NativeType::new("Game", "Int32");

        assert_eq!(translator.type_name(&ty), "Int32");
    }

    #[test]
    /// By-reference parameters keep their direction modifier under the preserve policy
    fn by_ref_preserved() {
        let translator = default_translator();
        let ty = NativeType::system("Int32").by_ref();

        let output = NativeParameter::new(ty.clone(), "value").output();
        assert_eq!(translator.parameter_type(&output), "out int");

        let input = NativeParameter::new(ty.clone(), "value").input();
        assert_eq!(translator.parameter_type(&input), "in int");

        let plain = NativeParameter::new(ty, "value");
        assert_eq!(translator.parameter_type(&plain), "ref int");
    }

    #[test]
    /// Input-only wins when a parameter carries both direction attributes
    fn by_ref_precedence() {
        let translator = default_translator();
        let parameter = NativeParameter::new(NativeType::system("Int32").by_ref(), "value")
            .input()
            .output();

        assert_eq!(translator.parameter_type(&parameter), "in int");
    }

    #[test]
    /// Erasing by-ref converts the reference marker into a pointer marker
    fn by_ref_erased() {
        let translator = Translator::new(TranslationOptions {
            preserve_by_ref: false,
            ..TranslationOptions::default()
        });
        let parameter =
            NativeParameter::new(NativeType::system("Int32").by_ref(), "value").output();

        assert_eq!(translator.parameter_type(&parameter), "int*");
    }

    #[test]
    /// Translation is a pure function of type and options
    fn rewrite_idempotence() {
        let translator = default_translator();

        for name in ["Boolean", "String", "IntPtr"] {
            let ty = NativeType::system(name);
            assert_eq!(translator.type_name(&ty), translator.type_name(&ty));
        }
    }

    #[test]
    /// Parameter lists preserve order and verbatim names
    fn parameter_list_order() {
        let translator = default_translator();
        let parameters = vec![
            NativeParameter::new(NativeType::system("Int32"), "first"),
            NativeParameter::new(NativeType::system("String"), "second"),
        ];

        let translated = translator.parameters(&parameters);
        assert_eq!(translated.len(), 2);
        assert_eq!(translated[0].ty, "int");
        assert_eq!(translated[0].name, "first");
        assert_eq!(translated[1].ty, "byte*");
        assert_eq!(translated[1].name, "second");
    }
}
