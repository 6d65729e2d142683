//! Declaration registry
//!
//! Catalog of identifiers, message types and functions a filter may use.
//! Built once per endpoint, read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::expr::{
    Type, FUNCTION_AND, FUNCTION_HAS, FUNCTION_NOT, FUNCTION_OR, RELATIONAL_FUNCTIONS,
};

/// Declared identifiers, message types and functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declarations {
    /// Identifier naming the listed resource itself, if filters address it explicitly
    #[serde(default)]
    pub root: Option<String>,

    /// Top-level identifiers and their types
    #[serde(default)]
    pub identifiers: BTreeMap<String, Type>,

    /// Message types by name, each a map of field name to type
    #[serde(default)]
    pub messages: BTreeMap<String, BTreeMap<String, Type>>,

    /// Supported function names
    #[serde(default = "standard_functions")]
    pub functions: BTreeSet<String>,
}

/// The AIP-160 function set: logical operators, comparators and has
pub fn standard_functions() -> BTreeSet<String> {
    let mut functions: BTreeSet<String> = RELATIONAL_FUNCTIONS
        .iter()
        .map(|f| f.to_string())
        .collect();
    for f in [FUNCTION_AND, FUNCTION_OR, FUNCTION_NOT, FUNCTION_HAS] {
        functions.insert(f.to_string());
    }
    functions
}

impl Default for Declarations {
    fn default() -> Self {
        Self {
            root: None,
            identifiers: BTreeMap::new(),
            messages: BTreeMap::new(),
            functions: standard_functions(),
        }
    }
}

impl Declarations {
    /// Starts an empty registry with the standard function set
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collection root identifier
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Declares a top-level identifier
    pub fn with_ident(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.identifiers.insert(name.into(), ty);
        self
    }

    /// Declares a message type and its fields
    pub fn with_message<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.messages.insert(name.into(), fields);
        self
    }

    /// Removes a function from the supported set
    pub fn without_function(mut self, name: &str) -> Self {
        self.functions.remove(name);
        self
    }

    pub fn ident(&self, name: &str) -> Option<&Type> {
        self.identifiers.get(name)
    }

    /// Resolves `field` on the named message type
    pub fn field(&self, message: &str, field: &str) -> Option<&Type> {
        self.messages.get(message).and_then(|fields| fields.get(field))
    }

    pub fn has_message(&self, message: &str) -> bool {
        self.messages.contains_key(message)
    }

    pub fn supports(&self, function: &str) -> bool {
        self.functions.contains(function)
    }
}
