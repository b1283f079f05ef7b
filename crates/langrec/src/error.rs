//! Load-time definition errors.
//!
//! Run-time rejections are ordinary recognition outcomes and live in the
//! executors' run results; only malformed definitions are errors.

use thiserror::Error;

/// A structurally valid but semantically broken automaton definition.
/// Surfaced by the `build` methods in [`crate::definition`] before any run
/// starts; fatal to that load attempt only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("duplicate state '{0}' in state list")]
    DuplicateState(String),

    #[error("duplicate symbol '{symbol}' in {alphabet} alphabet")]
    DuplicateSymbol { symbol: char, alphabet: &'static str },

    #[error("{role} references unknown state '{name}'")]
    UnknownState { role: &'static str, name: String },

    #[error("symbol '{symbol}' is not in the {alphabet} alphabet")]
    UnknownSymbol { symbol: char, alphabet: &'static str },

    #[error("blank symbol '{0}' must not appear in the input alphabet")]
    BlankInInputAlphabet(char),
}
