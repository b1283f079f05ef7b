//! Loader-facing automaton definition records.
//!
//! These structs mirror the persisted JSON layout 1:1 and carry no
//! behavior beyond `build`, which validates the definition (dangling state
//! references, symbols outside the declared alphabets) and produces the
//! immutable executor-side automaton.

use crate::dfa::Dfa;
use crate::error::DefinitionError;
use crate::nfa::Nfa;
use crate::pda::{Pda, PdaRule};
use crate::state::{StateId, StateRegistry, StateSet};
use crate::symbol::{Alphabet, Symbol};
use crate::tm::{Direction, TmRule, TuringMachine};
use serde::{Deserialize, Serialize};

/// A variant-tagged automaton definition, as produced by the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum AutomatonDef {
    Dfa(DfaDef),
    Nfa(NfaDef),
    Pda(PdaDef),
    Tm(TmDef),
}

/// DFA definition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DfaDef {
    pub states: Vec<String>,
    pub alphabet: Vec<char>,
    pub transitions: Vec<DfaTransitionDef>,
    pub start: String,
    pub accept: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DfaTransitionDef {
    pub from: String,
    pub read: char,
    pub to: String,
}

/// NFA definition record. `read: null` is an epsilon move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NfaDef {
    pub states: Vec<String>,
    pub alphabet: Vec<char>,
    pub transitions: Vec<NfaTransitionDef>,
    pub start: String,
    pub accept: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NfaTransitionDef {
    pub from: String,
    pub read: Option<char>,
    pub to: String,
}

/// PDA definition record. `read`/`pop`/`push` use `null` for epsilon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdaDef {
    pub states: Vec<String>,
    pub input_alphabet: Vec<char>,
    pub stack_alphabet: Vec<char>,
    pub initial_stack: char,
    pub transitions: Vec<PdaTransitionDef>,
    pub start: String,
    pub accept: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdaTransitionDef {
    pub from: String,
    pub read: Option<char>,
    pub pop: Option<char>,
    pub push: Option<char>,
    pub to: String,
}

/// TM definition record. The blank is added to the tape alphabet if the
/// definition omitted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmDef {
    pub states: Vec<String>,
    pub input_alphabet: Vec<char>,
    pub tape_alphabet: Vec<char>,
    pub blank: char,
    pub start: String,
    pub accept: Vec<String>,
    pub reject: Vec<String>,
    pub transitions: Vec<TmTransitionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmTransitionDef {
    pub from: String,
    pub read: char,
    pub to: String,
    pub write: char,
    #[serde(rename = "move")]
    pub direction: Direction,
}

fn build_registry(names: &[String]) -> Result<StateRegistry, DefinitionError> {
    let mut registry = StateRegistry::new();
    for name in names {
        if registry.contains(name) {
            return Err(DefinitionError::DuplicateState(name.clone()));
        }
        registry.insert(name);
    }
    Ok(registry)
}

fn build_alphabet(symbols: &[char], which: &'static str) -> Result<Alphabet, DefinitionError> {
    let mut alphabet = Alphabet::new();
    for &c in symbols {
        if !alphabet.insert(Symbol::new(c)) {
            return Err(DefinitionError::DuplicateSymbol {
                symbol: c,
                alphabet: which,
            });
        }
    }
    Ok(alphabet)
}

fn resolve(
    registry: &StateRegistry,
    name: &str,
    role: &'static str,
) -> Result<StateId, DefinitionError> {
    registry.resolve(name).ok_or_else(|| DefinitionError::UnknownState {
        role,
        name: name.to_owned(),
    })
}

fn resolve_set(
    registry: &StateRegistry,
    names: &[String],
    role: &'static str,
) -> Result<StateSet, DefinitionError> {
    let mut set = StateSet::with_capacity(registry.len());
    for name in names {
        set.insert(resolve(registry, name, role)?);
    }
    Ok(set)
}

fn check_symbol(
    alphabet: &Alphabet,
    c: char,
    which: &'static str,
) -> Result<Symbol, DefinitionError> {
    let symbol = Symbol::new(c);
    if !alphabet.contains(symbol) {
        return Err(DefinitionError::UnknownSymbol {
            symbol: c,
            alphabet: which,
        });
    }
    Ok(symbol)
}

impl DfaDef {
    /// Validate and build the executable DFA.
    pub fn build(&self) -> Result<Dfa, DefinitionError> {
        let registry = build_registry(&self.states)?;
        let alphabet = build_alphabet(&self.alphabet, "input")?;
        let start = resolve(&registry, &self.start, "start state")?;
        let accepting = resolve_set(&registry, &self.accept, "accept set")?;

        let mut dfa = Dfa::new(registry, alphabet, start, accepting);
        for t in &self.transitions {
            let from = resolve(dfa.states(), &t.from, "transition source")?;
            let to = resolve(dfa.states(), &t.to, "transition destination")?;
            let read = check_symbol(dfa.alphabet(), t.read, "input")?;
            dfa.add_transition(from, read, to);
        }
        Ok(dfa)
    }
}

impl NfaDef {
    /// Validate and build the executable NFA.
    pub fn build(&self) -> Result<Nfa, DefinitionError> {
        let registry = build_registry(&self.states)?;
        let alphabet = build_alphabet(&self.alphabet, "input")?;
        let start = resolve(&registry, &self.start, "start state")?;
        let accepting = resolve_set(&registry, &self.accept, "accept set")?;

        let mut nfa = Nfa::new(registry, alphabet, start, accepting);
        for t in &self.transitions {
            let from = resolve(nfa.states(), &t.from, "transition source")?;
            let to = resolve(nfa.states(), &t.to, "transition destination")?;
            let read = match t.read {
                Some(c) => Some(check_symbol(nfa.alphabet(), c, "input")?),
                None => None,
            };
            nfa.add_transition(from, read, to);
        }
        Ok(nfa)
    }
}

impl PdaDef {
    /// Validate and build the executable PDA.
    pub fn build(&self) -> Result<Pda, DefinitionError> {
        let registry = build_registry(&self.states)?;
        let input_alphabet = build_alphabet(&self.input_alphabet, "input")?;
        let stack_alphabet = build_alphabet(&self.stack_alphabet, "stack")?;
        let start = resolve(&registry, &self.start, "start state")?;
        let accepting = resolve_set(&registry, &self.accept, "accept set")?;
        let initial_stack = check_symbol(&stack_alphabet, self.initial_stack, "stack")?;

        let mut pda = Pda::new(
            registry,
            input_alphabet,
            stack_alphabet,
            start,
            accepting,
            initial_stack,
        );
        for t in &self.transitions {
            let source = resolve(pda.states(), &t.from, "transition source")?;
            let target = resolve(pda.states(), &t.to, "transition destination")?;
            let read = match t.read {
                Some(c) => Some(check_symbol(pda.input_alphabet(), c, "input")?),
                None => None,
            };
            let pop = match t.pop {
                Some(c) => Some(check_symbol(pda.stack_alphabet(), c, "stack")?),
                None => None,
            };
            let push = match t.push {
                Some(c) => Some(check_symbol(pda.stack_alphabet(), c, "stack")?),
                None => None,
            };
            pda.add_rule(PdaRule {
                source,
                read,
                pop,
                push,
                target,
            });
        }
        Ok(pda)
    }
}

impl TmDef {
    /// Validate and build the executable Turing machine.
    pub fn build(&self) -> Result<TuringMachine, DefinitionError> {
        let registry = build_registry(&self.states)?;
        let input_alphabet = build_alphabet(&self.input_alphabet, "input")?;
        let mut tape_alphabet = build_alphabet(&self.tape_alphabet, "tape")?;

        let blank = Symbol::new(self.blank);
        if input_alphabet.contains(blank) {
            return Err(DefinitionError::BlankInInputAlphabet(self.blank));
        }
        tape_alphabet.insert(blank);

        let start = resolve(&registry, &self.start, "start state")?;
        let accepting = resolve_set(&registry, &self.accept, "accept set")?;
        let mut rejecting = Vec::with_capacity(self.reject.len());
        for name in &self.reject {
            rejecting.push(resolve(&registry, name, "reject set")?);
        }

        let mut tm = TuringMachine::new(
            registry,
            input_alphabet,
            tape_alphabet,
            blank,
            start,
            accepting,
            &rejecting,
        );
        for t in &self.transitions {
            let from = resolve(tm.states(), &t.from, "transition source")?;
            let target = resolve(tm.states(), &t.to, "transition destination")?;
            let read = check_symbol(tm.tape_alphabet(), t.read, "tape")?;
            let write = check_symbol(tm.tape_alphabet(), t.write, "tape")?;
            tm.add_rule(
                from,
                read,
                TmRule {
                    write,
                    direction: t.direction,
                    target,
                },
            );
        }
        Ok(tm)
    }
}
