//! Formal-language recognizers.
//!
//! This crate provides the executable core of an automata simulator:
//! - DFA, epsilon-NFA, pushdown and single-tape Turing machine executors
//! - Epsilon closure computation
//! - Subset construction (NFA to DFA conversion)
//! - Loader-facing definition records with load-time validation
//!
//! Automata are immutable once built; every run owns its own
//! configurations and returns a verdict plus a trace for visualization.

pub mod definition;
pub mod dfa;
pub mod error;
pub mod nfa;
pub mod pda;
pub mod state;
pub mod subset;
pub mod symbol;
pub mod tm;

pub use definition::{AutomatonDef, DfaDef, NfaDef, PdaDef, TmDef};
pub use dfa::{Dfa, DfaConfig, DfaRun};
pub use error::DefinitionError;
pub use nfa::{Nfa, NfaConfig, NfaRun};
pub use pda::{Pda, PdaConfig, PdaRule, PdaRun, PdaVerdict};
pub use state::{StateId, StateRegistry, StateSet};
pub use subset::subset_construction;
pub use symbol::{Alphabet, Symbol};
pub use tm::{
    Direction, Tape, TmOutcome, TmRule, TmSimulator, TmStep, TmStepRecord, TuringMachine,
};
