//! # Metadata Catalog Sources
//!
//! Adapters walking an assembly metadata catalog: delegate types and P/Invoke
//! methods. The catalog is the serialized counterpart of a reflection walk; these
//! sources only enumerate it and leave every naming decision to the translator.

use serde::Deserialize;

use crate::meta::{CallingConvention, NativeParameter, NativeType};
use crate::signature::FunctionSignature;
use crate::translate::{TranslationOptions, Translator};

use super::{Source, SourceError};

/// Serialized type/method catalog of a managed assembly
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssemblyCatalog {
    /// Every type the catalog records
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

/// One recorded type
#[derive(Debug, Clone, Deserialize)]
pub struct TypeEntry {
    /// Fully qualified type name; nested types use `+` as the nesting separator
    pub full_name: String,
    /// Invoke shape, present when the type is a non-generic delegate
    #[serde(default)]
    pub delegate: Option<DelegateEntry>,
    /// Static methods declared by the type
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

/// The invoke shape of a delegate type
#[derive(Debug, Clone, Deserialize)]
pub struct DelegateEntry {
    /// Convention from the unmanaged function pointer attribute, when present
    #[serde(default)]
    pub calling_convention: Option<CallingConvention>,
    /// Return type of the delegate's invoke method
    pub return_type: NativeType,
    /// Parameters of the delegate's invoke method, in declaration order
    #[serde(default)]
    pub parameters: Vec<NativeParameter>,
}

/// One recorded method
#[derive(Debug, Clone, Deserialize)]
pub struct MethodEntry {
    /// Method identifier
    pub name: String,
    /// Reflected return type
    pub return_type: NativeType,
    /// Reflected parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<NativeParameter>,
    /// Import data, present when the method carries a P/Invoke attribute
    #[serde(default)]
    pub pinvoke: Option<PInvokeEntry>,
}

/// P/Invoke attribute data for an imported method
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PInvokeEntry {
    /// Convention from the import attribute, when present
    #[serde(default)]
    pub calling_convention: Option<CallingConvention>,
}

/// Whether a fully qualified name passes a `*`-style prefix filter
///
/// A blank filter or a lone `*` matches everything.
fn matches_filter(filter: &str, full_name: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() || filter == "*" {
        return true;
    }
    full_name.starts_with(filter.trim_matches('*'))
}

/// Simple (unqualified) name of a possibly nested full name
fn simple_name(full_name: &str) -> &str {
    full_name
        .rsplit(['.', '+'])
        .next()
        .unwrap_or(full_name)
}

/// Source enumerating delegate types recorded in a metadata catalog
///
/// Each matching delegate becomes one signature named after the type's simple name;
/// translation happens lazily on every call, so repeated passes re-translate.
pub struct DelegateSource {
    /// Matching delegate types, as (simple name, invoke shape) pairs
    types: Vec<(String, DelegateEntry)>,
    /// Index of the next type to translate
    cursor: usize,
    /// Translator applying this run's policy
    translator: Translator,
}

impl DelegateSource {
    /// Creates a source over every delegate in `catalog` whose full name passes `filter`
    pub fn new(catalog: AssemblyCatalog, filter: &str, options: TranslationOptions) -> Self {
        let types = catalog
            .types
            .into_iter()
            .filter(|entry| matches_filter(filter, &entry.full_name))
            .filter_map(|entry| {
                let name = simple_name(&entry.full_name).to_string();
                entry.delegate.map(|delegate| (name, delegate))
            })
            .collect();

        Self {
            types,
            cursor: 0,
            translator: Translator::new(options),
        }
    }
}

impl Source for DelegateSource {
    fn reset(&mut self) -> Result<(), SourceError> {
        self.cursor = 0;
        Ok(())
    }

    fn next_function(&mut self) -> Result<Option<FunctionSignature>, SourceError> {
        let Some((name, delegate)) = self.types.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;

        Ok(Some(FunctionSignature {
            name: name.clone(),
            return_type: self.translator.type_name(&delegate.return_type),
            call_convention: Translator::calling_convention(delegate.calling_convention)
                .map(str::to_string),
            parameters: self.translator.parameters(&delegate.parameters),
        }))
    }
}

/// Source enumerating P/Invoke methods recorded in a metadata catalog
///
/// Walks every type passing the filter and keeps the methods tagged with import data.
pub struct PInvokeSource {
    /// Matching imported methods in catalog order
    methods: Vec<MethodEntry>,
    /// Index of the next method to translate
    cursor: usize,
    /// Translator applying this run's policy
    translator: Translator,
}

impl PInvokeSource {
    /// Creates a source over every imported method in `catalog` under types passing `filter`
    pub fn new(catalog: AssemblyCatalog, filter: &str, options: TranslationOptions) -> Self {
        let methods = catalog
            .types
            .into_iter()
            .filter(|entry| matches_filter(filter, &entry.full_name))
            .flat_map(|entry| entry.methods)
            .filter(|method| method.pinvoke.is_some())
            .collect();

        Self {
            methods,
            cursor: 0,
            translator: Translator::new(options),
        }
    }
}

impl Source for PInvokeSource {
    fn reset(&mut self) -> Result<(), SourceError> {
        self.cursor = 0;
        Ok(())
    }

    fn next_function(&mut self) -> Result<Option<FunctionSignature>, SourceError> {
        let Some(method) = self.methods.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;

        Ok(Some(FunctionSignature {
            name: method.name.clone(),
            return_type: self.translator.type_name(&method.return_type),
            call_convention: Translator::calling_convention(
                method.pinvoke.as_ref().and_then(|p| p.calling_convention),
            )
            .map(str::to_string),
            parameters: self.translator.parameters(&method.parameters),
        }))
    }
}
