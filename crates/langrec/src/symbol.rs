//! Symbol types for automata transitions.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single-character token from a finite alphabet.
///
/// Epsilon is deliberately *not* a `Symbol`: transition slots that may be
/// epsilon are typed `Option<Symbol>`, with `None` meaning epsilon. This
/// keeps the sentinel outside every declared alphabet by construction. The
/// TM blank is an ordinary `Symbol` chosen per machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(char);

impl Symbol {
    /// Wrap a character as a symbol.
    pub fn new(c: char) -> Self {
        Self(c)
    }

    /// The underlying character.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, insertion-ordered set of symbols.
///
/// Iteration order is registration order, which keeps everything derived
/// from an alphabet walk (subset construction in particular) deterministic.
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    symbols: IndexSet<Symbol>,
}

impl Alphabet {
    /// Create an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol. Returns false if it was already present.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        self.symbols.insert(symbol)
    }

    /// Membership test.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }

    /// The number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<Symbol> for Alphabet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        iter.into_iter().map(Symbol::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_membership() {
        let alphabet: Alphabet = "ab".chars().collect();
        assert!(alphabet.contains(Symbol::new('a')));
        assert!(alphabet.contains(Symbol::new('b')));
        assert!(!alphabet.contains(Symbol::new('c')));
        assert_eq!(alphabet.len(), 2);
    }

    #[test]
    fn test_alphabet_order_is_registration_order() {
        let alphabet: Alphabet = "bca".chars().collect();
        let order: Vec<char> = alphabet.iter().map(Symbol::as_char).collect();
        assert_eq!(order, vec!['b', 'c', 'a']);
    }

    #[test]
    fn test_alphabet_dedup() {
        let mut alphabet = Alphabet::new();
        assert!(alphabet.insert(Symbol::new('a')));
        assert!(!alphabet.insert(Symbol::new('a')));
        assert_eq!(alphabet.len(), 1);
    }
}
