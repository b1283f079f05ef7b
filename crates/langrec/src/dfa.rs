//! Deterministic finite automaton and its executor.

use crate::state::{StateId, StateRegistry, StateSet};
use crate::symbol::{Alphabet, Symbol};
use std::collections::HashMap;
use tracing::debug;

/// A deterministic finite automaton.
///
/// At most one destination per (state, symbol); a missing entry is an
/// implicit trap, not an error. The definition is immutable once executed:
/// `run` takes `&self` and never mutates, so one automaton may serve any
/// number of concurrent runs.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: StateRegistry,
    alphabet: Alphabet,
    transitions: HashMap<(StateId, Symbol), StateId>,
    start: StateId,
    accepting: StateSet,
}

/// One recorded step of a DFA run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DfaConfig {
    /// The machine sits in `state` with `cursor` input symbols consumed.
    At { state: StateId, cursor: usize },
    /// Marker appended when the run hit a missing transition.
    Trap,
}

/// The outcome of one DFA run: verdict, trace and a human-readable cause.
#[derive(Debug, Clone)]
pub struct DfaRun {
    pub accepted: bool,
    pub trace: Vec<DfaConfig>,
    pub diagnostic: String,
}

impl Dfa {
    /// Create a DFA with no transitions yet.
    pub fn new(
        states: StateRegistry,
        alphabet: Alphabet,
        start: StateId,
        accepting: StateSet,
    ) -> Self {
        Self {
            states,
            alphabet,
            transitions: HashMap::new(),
            start,
            accepting,
        }
    }

    /// Add a transition. A later insert for the same (source, symbol)
    /// replaces the earlier one.
    pub fn add_transition(&mut self, source: StateId, symbol: Symbol, destination: StateId) {
        self.transitions.insert((source, symbol), destination);
    }

    /// The destination for (source, symbol), if any.
    pub fn transition(&self, source: StateId, symbol: Symbol) -> Option<StateId> {
        self.transitions.get(&(source, symbol)).copied()
    }

    /// All transitions as (source, symbol, destination) triples.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.transitions
            .iter()
            .map(|(&(src, sym), &dst)| (src, sym, dst))
    }

    /// The state name registry.
    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    /// The input alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The accept set.
    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    /// Run the automaton over an input string.
    ///
    /// A symbol outside the alphabet aborts the run with a rejecting
    /// verdict naming the symbol and its position. A missing transition
    /// appends [`DfaConfig::Trap`] to the trace and rejects. Otherwise the
    /// verdict is accept iff the state after the last symbol is accepting.
    pub fn run(&self, input: &str) -> DfaRun {
        debug!(input, start = self.states.name(self.start), "dfa run");
        let mut state = self.start;
        let mut trace = vec![DfaConfig::At { state, cursor: 0 }];

        for (pos, c) in input.chars().enumerate() {
            let symbol = Symbol::new(c);
            if !self.alphabet.contains(symbol) {
                let diagnostic =
                    format!("symbol '{symbol}' at position {pos} is not in the alphabet");
                debug!(%diagnostic, "dfa rejected");
                return DfaRun {
                    accepted: false,
                    trace,
                    diagnostic,
                };
            }
            match self.transition(state, symbol) {
                Some(next) => {
                    state = next;
                    trace.push(DfaConfig::At {
                        state,
                        cursor: pos + 1,
                    });
                }
                None => {
                    let diagnostic = format!(
                        "no transition from {} on '{symbol}' at position {pos}",
                        self.states.name(state)
                    );
                    trace.push(DfaConfig::Trap);
                    debug!(%diagnostic, "dfa rejected");
                    return DfaRun {
                        accepted: false,
                        trace,
                        diagnostic,
                    };
                }
            }
        }

        let accepted = self.accepting.contains(state);
        let diagnostic = format!("input consumed; final state {}", self.states.name(state));
        debug!(accepted, %diagnostic, "dfa finished");
        DfaRun {
            accepted,
            trace,
            diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// DFA for 0(0|1)*1 over {0,1}.
    fn zero_then_one() -> Dfa {
        let mut states = StateRegistry::new();
        let q0 = states.insert("q0");
        let q1 = states.insert("q1");
        let q2 = states.insert("q2");
        let q3 = states.insert("q3");
        let accepting = StateSet::singleton(q2, 4);
        let mut dfa = Dfa::new(states, "01".chars().collect(), q0, accepting);
        let (zero, one) = (Symbol::new('0'), Symbol::new('1'));
        dfa.add_transition(q0, zero, q1);
        dfa.add_transition(q0, one, q3);
        dfa.add_transition(q1, zero, q1);
        dfa.add_transition(q1, one, q2);
        dfa.add_transition(q2, zero, q1);
        dfa.add_transition(q2, one, q2);
        dfa.add_transition(q3, zero, q3);
        dfa.add_transition(q3, one, q3);
        dfa
    }

    #[test]
    fn test_accepts_and_rejects() {
        let dfa = zero_then_one();
        assert!(dfa.run("01").accepted);
        assert!(dfa.run("00101").accepted);
        assert!(!dfa.run("10").accepted);
        assert!(!dfa.run("0").accepted);
        assert!(!dfa.run("").accepted);
    }

    #[test]
    fn test_trace_records_every_configuration() {
        let dfa = zero_then_one();
        let run = dfa.run("01");
        assert_eq!(
            run.trace,
            vec![
                DfaConfig::At { state: 0, cursor: 0 },
                DfaConfig::At { state: 1, cursor: 1 },
                DfaConfig::At { state: 2, cursor: 2 },
            ]
        );
    }

    #[test]
    fn test_symbol_outside_alphabet_rejects_with_position() {
        let dfa = zero_then_one();
        let run = dfa.run("0x1");
        assert!(!run.accepted);
        assert!(run.diagnostic.contains('x'));
        assert!(run.diagnostic.contains("position 1"));
    }

    #[test]
    fn test_trap_on_missing_transition() {
        // Sigma = {a,b}, only q0 -a-> q0 defined. Input "b" must reject
        // with a diagnostic naming q0 and 'b', without panicking.
        let mut states = StateRegistry::new();
        let q0 = states.insert("q0");
        let mut dfa = Dfa::new(states, "ab".chars().collect(), q0, StateSet::with_capacity(1));
        dfa.add_transition(q0, Symbol::new('a'), q0);

        let run = dfa.run("b");
        assert!(!run.accepted);
        assert_eq!(run.trace.last(), Some(&DfaConfig::Trap));
        assert!(run.diagnostic.contains("q0"));
        assert!(run.diagnostic.contains('b'));
    }

    #[test]
    fn test_run_is_deterministic() {
        let dfa = zero_then_one();
        let first = dfa.run("00110");
        let second = dfa.run("00110");
        assert_eq!(first.accepted, second.accepted);
        assert_eq!(first.trace, second.trace);
        assert_eq!(first.diagnostic, second.diagnostic);
    }
}
