//! Nondeterministic finite automaton with epsilon moves and its executor.

use crate::state::{StateId, StateRegistry, StateSet};
use crate::symbol::{Alphabet, Symbol};
use std::collections::HashMap;
use tracing::debug;

/// A nondeterministic finite automaton with epsilon transitions.
///
/// Transition keys carry `Option<Symbol>`; `None` is the epsilon move.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: StateRegistry,
    alphabet: Alphabet,
    transitions: HashMap<(StateId, Option<Symbol>), StateSet>,
    start: StateId,
    accepting: StateSet,
}

/// One recorded step of an NFA run: the current state set after consuming
/// `cursor` input symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaConfig {
    pub states: StateSet,
    pub cursor: usize,
}

/// The outcome of one NFA run.
#[derive(Debug, Clone)]
pub struct NfaRun {
    pub accepted: bool,
    pub trace: Vec<NfaConfig>,
    pub diagnostic: String,
}

impl Nfa {
    /// Create an NFA with no transitions yet.
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

    /// Add a transition. `read == None` is an epsilon move.
    pub fn add_transition(
        &mut self,
        source: StateId,
        read: Option<Symbol>,
        destination: StateId,
    ) {
        let capacity = self.states.len();
        self.transitions
            .entry((source, read))
            .or_insert_with(|| StateSet::with_capacity(capacity))
            .insert(destination);
    }

    /// The state name registry.
    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    /// The input alphabet (epsilon excluded by construction).
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

    /// The destinations for (source, read), if any.
    pub fn destinations(&self, source: StateId, read: Option<Symbol>) -> Option<&StateSet> {
        self.transitions.get(&(source, read))
    }

    /// The epsilon closure of a set of states: every state reachable from
    /// the set through epsilon moves alone, the set itself included.
    ///
    /// Worklist expansion; already-visited states are never re-pushed, so
    /// this terminates even with epsilon cycles.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.states.len());
        let mut stack: Vec<StateId> = states.iter().collect();

        while let Some(s) = stack.pop() {
            if closure.contains(s) {
                continue;
            }
            closure.insert(s);

            if let Some(destinations) = self.transitions.get(&(s, None)) {
                for dest in destinations.iter() {
                    if !closure.contains(dest) {
                        stack.push(dest);
                    }
                }
            }
        }

        closure
    }

    /// One-step move: the union over `states` of the destinations reachable
    /// on `symbol`. No implicit closure; callers compose
    /// `epsilon_closure(move_on_symbol(..))` themselves.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: Symbol) -> StateSet {
        let mut reached = StateSet::with_capacity(self.states.len());
        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(&(state, Some(symbol))) {
                reached.union_with(destinations);
            }
        }
        reached
    }

    /// Run the automaton over an input string.
    ///
    /// The current set starts as the epsilon closure of the start state and
    /// becomes `epsilon_closure(move(current, symbol))` per input symbol.
    /// An empty set rejects immediately: it can never become nonempty again.
    pub fn run(&self, input: &str) -> NfaRun {
        debug!(input, start = self.states.name(self.start), "nfa run");
        let mut current = self.epsilon_closure(&StateSet::singleton(self.start, self.states.len()));
        let mut trace = vec![NfaConfig {
            states: current.clone(),
            cursor: 0,
        }];

        for (pos, c) in input.chars().enumerate() {
            let symbol = Symbol::new(c);
            if !self.alphabet.contains(symbol) {
                let diagnostic =
                    format!("symbol '{symbol}' at position {pos} is not in the alphabet");
                debug!(%diagnostic, "nfa rejected");
                return NfaRun {
                    accepted: false,
                    trace,
                    diagnostic,
                };
            }

            let previous = self.states.canonical_name(&current);
            current = self.epsilon_closure(&self.move_on_symbol(&current, symbol));
            trace.push(NfaConfig {
                states: current.clone(),
                cursor: pos + 1,
            });

            if current.is_empty() {
                let diagnostic = format!(
                    "no transition from {previous} on '{symbol}' at position {pos}"
                );
                debug!(%diagnostic, "nfa rejected");
                return NfaRun {
                    accepted: false,
                    trace,
                    diagnostic,
                };
            }
        }

        let accepted = current.intersects(&self.accepting);
        let diagnostic = format!(
            "input consumed; final states {}",
            self.states.canonical_name(&current)
        );
        debug!(accepted, %diagnostic, "nfa finished");
        NfaRun {
            accepted,
            trace,
            diagnostic,
        }
    }
}
