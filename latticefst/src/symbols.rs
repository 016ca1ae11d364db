use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::Label;

/// The conventional display string for the epsilon label.
pub const EPSILON_SYMBOL: &str = "<eps>";

/// An ordered table of symbol strings; a symbol's label is its position.
///
/// Tables are carried by an fst for display and persistence only; every
/// algorithm operates on label ids. Composition requires the two tables at
/// the matching seam to be identical, which is checked with plain equality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    key_table: Vec<SmolStr>,
    string_to_symbol: HashMap<SmolStr, Label>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// A table with the epsilon string pre-seeded at label 0.
    pub fn with_epsilon() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.add_symbol(EPSILON_SYMBOL);
        table
    }

    pub fn from_symbols<I, S>(symbols: I) -> SymbolTable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = SymbolTable::new();
        for s in symbols {
            table.add_symbol(s.as_ref());
        }
        table
    }

    /// Append `string` if it is not present yet; returns its label either way.
    pub fn add_symbol(&mut self, string: &str) -> Label {
        if let Some(&label) = self.string_to_symbol.get(string) {
            return label;
        }
        let label = self.key_table.len() as Label;
        self.string_to_symbol.insert(string.into(), label);
        self.key_table.push(string.into());
        label
    }

    #[inline(always)]
    pub fn symbol(&self, label: Label) -> Option<&str> {
        self.key_table.get(label as usize).map(|s| s.as_str())
    }

    #[inline(always)]
    pub fn label(&self, string: &str) -> Option<Label> {
        self.string_to_symbol.get(string).copied()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.key_table.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.key_table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.key_table.iter().map(|s| s.as_str())
    }

    /// Concatenate the strings for a label sequence, skipping epsilons.
    pub fn string_from_labels(&self, labels: &[Label]) -> SmolStr {
        labels
            .iter()
            .filter(|&&l| l != crate::constants::EPSILON)
            .filter_map(|&l| self.symbol(l))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_look_up() {
        let mut table = SymbolTable::with_epsilon();
        let a = table.add_symbol("a");
        let b = table.add_symbol("b");
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(table.label("a"), Some(1));
        assert_eq!(table.symbol(2), Some("b"));
        assert_eq!(table.symbol(3), None);
    }

    #[test]
    fn add_symbol_is_idempotent() {
        let mut table = SymbolTable::with_epsilon();
        assert_eq!(table.add_symbol("x"), 1);
        assert_eq!(table.add_symbol("x"), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn string_from_labels_skips_epsilon() {
        let table = SymbolTable::from_symbols(["<eps>", "f", "o"]);
        assert_eq!(table.string_from_labels(&[1, 0, 2, 2]), "foo");
    }
}
