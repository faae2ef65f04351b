//! Constant bindings and identifier rules.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::ValidationError;

/// Reserved words of the target source language.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Globals a binding may not shadow.
const GLOBAL_BINDINGS: &[&str] = &[
    "undefined", "NaN", "Infinity", "globalThis", "window", "self", "document", "console",
    "Object", "Array", "String", "Number", "Boolean", "Symbol", "JSON", "Math", "Promise",
    "Error", "eval", "arguments",
];

/// A registered constant binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingEntry {
    pub identifier: String,
    pub value: Value,
    /// JSON text substituted for the identifier.
    pub literal: String,
}

/// Table of compile-time constants.
#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    entries: BTreeMap<String, BindingEntry>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identifier` → `value`.
    ///
    /// Fails on malformed identifiers, reserved words, globals, and on an
    /// identifier that is already bound.
    pub fn bind(&mut self, identifier: &str, value: Value) -> Result<BindingEntry, ValidationError> {
        validate_identifier(identifier)?;
        if self.entries.contains_key(identifier) {
            return Err(ValidationError::DuplicateConstant(identifier.to_string()));
        }

        let literal =
            serde_json::to_string(&value).map_err(|e| ValidationError::UnserializableLiteral {
                identifier: identifier.to_string(),
                reason: e.to_string(),
            })?;

        let entry = BindingEntry {
            identifier: identifier.to_string(),
            value,
            literal,
        };
        self.entries.insert(identifier.to_string(), entry.clone());

        tracing::debug!(identifier = %identifier, literal = %entry.literal, "Constant bound");
        Ok(entry)
    }

    pub fn get(&self, identifier: &str) -> Option<&BindingEntry> {
        self.entries.get(identifier)
    }

    pub fn entries(&self) -> impl Iterator<Item = &BindingEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn validate_identifier(identifier: &str) -> Result<(), ValidationError> {
    let well_formed = !identifier.is_empty()
        && identifier.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars.next().is_some_and(is_ident_start) && chars.all(is_ident_char)
        });
    if !well_formed {
        return Err(ValidationError::InvalidIdentifier(identifier.to_string()));
    }

    // Member paths like `import.meta.env.MODE` are fine; only the bare
    // identifier and the root of a path are checked against globals.
    let root = identifier.split('.').next().unwrap_or(identifier);
    let dotted = identifier.contains('.');
    if RESERVED_WORDS.contains(&identifier)
        || (!dotted && GLOBAL_BINDINGS.contains(&root))
        || (dotted && RESERVED_WORDS.contains(&root) && root != "import")
    {
        return Err(ValidationError::ReservedIdentifier(identifier.to_string()));
    }
    Ok(())
}
