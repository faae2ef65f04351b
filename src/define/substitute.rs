//! Whole-token substitution of bound constants in source text.

use regex::Regex;

use crate::define::binding::{is_ident_char, ConstantTable};

/// A compiled substitution pass over one `ConstantTable`.
///
/// Compile once and reuse it for every source file of a build.
#[derive(Debug, Clone)]
pub struct Substituter {
    /// `None` when the table is empty.
    pattern: Option<Regex>,
    /// (identifier, literal), longest identifier first.
    bindings: Vec<(String, String)>,
}

impl Substituter {
    pub fn new(table: &ConstantTable) -> Self {
        let mut bindings: Vec<(String, String)> = table
            .entries()
            .map(|e| (e.identifier.clone(), e.literal.clone()))
            .collect();
        bindings.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let pattern = if bindings.is_empty() {
            None
        } else {
            let alternation = bindings
                .iter()
                .map(|(id, _)| regex::escape(id))
                .collect::<Vec<_>>()
                .join("|");
            // Identifiers are validated and escaped, so this cannot fail.
            Regex::new(&alternation).ok()
        };

        Self { pattern, bindings }
    }

    /// Replace every whole-token occurrence of a bound identifier.
    pub fn apply(&self, source: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return source.to_string();
        };

        let mut out = String::with_capacity(source.len());
        let mut copied = 0;
        let mut pos = 0;

        while let Some(m) = pattern.find_at(source, pos) {
            let start = m.start();
            let hit = self
                .bindings
                .iter()
                .find(|(id, _)| {
                    source[start..].starts_with(id.as_str())
                        && is_token(source, start, start + id.len())
                });

            match hit {
                Some((id, literal)) => {
                    out.push_str(&source[copied..start]);
                    out.push_str(literal);
                    copied = start + id.len();
                    pos = copied;
                }
                None => {
                    pos = start + source[start..].chars().next().map_or(1, char::len_utf8);
                }
            }
            if pos >= source.len() {
                break;
            }
        }

        out.push_str(&source[copied..]);
        out
    }
}

impl ConstantTable {
    /// Substitute this table's constants into `source`.
    pub fn apply(&self, source: &str) -> String {
        Substituter::new(self).apply(source)
    }
}

/// Whether `source[start..end]` stands alone as a substitutable token.
fn is_token(source: &str, start: usize, end: usize) -> bool {
    let before = &source[..start];
    match before.chars().next_back() {
        Some(c) if is_ident_char(c) => return false,
        // Member access (`obj.ID`) is not the identifier; spread (`...ID`) is.
        Some('.') if !before[..before.len() - 1].ends_with("..") => return false,
        _ => {}
    }

    let after = &source[end..];
    if after.chars().next().is_some_and(is_ident_char) {
        return false;
    }

    // Assignment targets stay untouched; comparisons do not.
    let rest = after.trim_start();
    let mut chars = rest.chars();
    !(chars.next() == Some('=') && chars.next() != Some('='))
}
