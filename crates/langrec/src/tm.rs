//! Single-tape Turing machine: sparse tape, definition, and stepper.

use crate::state::{StateId, StateRegistry, StateSet};
use crate::symbol::{Alphabet, Symbol};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Head movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "S")]
    Stay,
}

impl Direction {
    /// Apply the move to a head position.
    pub fn apply(self, position: i64) -> i64 {
        match self {
            Direction::Left => position - 1,
            Direction::Right => position + 1,
            Direction::Stay => position,
        }
    }
}

/// The action half of a TM rule: what to write, where to move, where to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TmRule {
    pub write: Symbol,
    pub direction: Direction,
    pub target: StateId,
}

/// A sparse, unbounded two-way tape. Positions without an explicit cell
/// read as the blank symbol.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: HashMap<i64, Symbol>,
    blank: Symbol,
    head: i64,
}

impl Tape {
    /// Create an empty tape with the given blank symbol, head at 0.
    pub fn new(blank: Symbol) -> Self {
        Self {
            cells: HashMap::new(),
            blank,
            head: 0,
        }
    }

    /// Clear the tape and write the input at positions 0..n-1, one symbol
    /// per character. The head returns to position 0.
    pub fn reset(&mut self, input: &str) {
        self.cells.clear();
        for (i, c) in input.chars().enumerate() {
            self.cells.insert(i as i64, Symbol::new(c));
        }
        self.head = 0;
    }

    /// The symbol under the head.
    pub fn read(&self) -> Symbol {
        self.symbol_at(self.head)
    }

    /// Write a symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells.insert(self.head, symbol);
    }

    /// Move the head.
    pub fn move_head(&mut self, direction: Direction) {
        self.head = direction.apply(self.head);
    }

    /// The current head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// The symbol at an arbitrary position.
    pub fn symbol_at(&self, position: i64) -> Symbol {
        self.cells.get(&position).copied().unwrap_or(self.blank)
    }

    /// Display window of `2 * radius + 1` cells centered on the head.
    pub fn window(&self, radius: i64) -> Vec<(i64, Symbol)> {
        (self.head - radius..=self.head + radius)
            .map(|i| (i, self.symbol_at(i)))
            .collect()
    }
}

/// A deterministic single-tape Turing machine definition.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    states: StateRegistry,
    input_alphabet: Alphabet,
    tape_alphabet: Alphabet,
    blank: Symbol,
    start: StateId,
    accepting: StateSet,
    rejecting: StateSet,
    rejecting_order: Vec<StateId>,
    rules: IndexMap<(StateId, Symbol), TmRule>,
}

impl TuringMachine {
    /// Create a machine with no rules yet. `rejecting` lists the reject
    /// states in registration order.
    pub fn new(
        states: StateRegistry,
        input_alphabet: Alphabet,
        tape_alphabet: Alphabet,
        blank: Symbol,
        start: StateId,
        accepting: StateSet,
        rejecting: &[StateId],
    ) -> Self {
        Self {
            states,
            input_alphabet,
            tape_alphabet,
            blank,
            start,
            accepting,
            rejecting: rejecting.iter().copied().collect(),
            rejecting_order: rejecting.to_vec(),
            rules: IndexMap::new(),
        }
    }

    /// Register a rule for (state, read). First registration wins: a later
    /// rule for the same key is a no-op, which is the machine's determinism
    /// policy for duplicate entries.
    pub fn add_rule(&mut self, state: StateId, read: Symbol, rule: TmRule) {
        self.rules.entry((state, read)).or_insert(rule);
    }

    /// The rule for (state, read), if one was registered.
    pub fn rule(&self, state: StateId, read: Symbol) -> Option<&TmRule> {
        self.rules.get(&(state, read))
    }

    /// The state name registry.
    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    /// The input alphabet.
    pub fn input_alphabet(&self) -> &Alphabet {
        &self.input_alphabet
    }

    /// The tape alphabet (blank included).
    pub fn tape_alphabet(&self) -> &Alphabet {
        &self.tape_alphabet
    }

    /// The blank symbol.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// The start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The accept set.
    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    /// The reject set.
    pub fn rejecting(&self) -> &StateSet {
        &self.rejecting
    }

    /// The first-registered reject state, used as the landing state when no
    /// rule matches.
    fn first_rejecting(&self) -> Option<StateId> {
        self.rejecting_order.first().copied()
    }
}

/// One applied rule, recorded for tracing: state and head before the step,
/// the symbol read, the symbol written, the move, the destination state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmStepRecord {
    pub from: StateId,
    pub head: i64,
    pub read: Symbol,
    pub write: Symbol,
    pub direction: Direction,
    pub to: StateId,
}

/// What one call to [`TmSimulator::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmStep {
    /// A rule was applied.
    Applied(TmStepRecord),
    /// No rule matched (state, read); the run landed in a rejecting
    /// outcome.
    NoRule { state: StateId, read: Symbol },
    /// The machine was already halted; no side effect.
    Halted,
}

/// Final outcome of driving a simulator to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmOutcome {
    Accepted { steps: u64 },
    Rejected { steps: u64, diagnostic: String },
    /// The step ceiling was reached without halting. Distinct from
    /// rejection: the machine is not proven to reject.
    OutOfBudget { steps: u64 },
}

/// A mutable stepper over one machine definition.
///
/// The definition itself is only read; several simulators may share one
/// machine. Interactive drivers call [`TmSimulator::step`] one move at a
/// time (and may poll a cancellation flag between calls); batch drivers use
/// [`TmSimulator::run`] with a step ceiling.
#[derive(Debug, Clone)]
pub struct TmSimulator<'a> {
    machine: &'a TuringMachine,
    tape: Tape,
    current: StateId,
    steps: u64,
    trace: Vec<TmStepRecord>,
    no_rule: Option<(StateId, Symbol)>,
}

impl<'a> TmSimulator<'a> {
    /// Create a simulator positioned on an empty tape.
    pub fn new(machine: &'a TuringMachine) -> Self {
        Self {
            machine,
            tape: Tape::new(machine.blank()),
            current: machine.start(),
            steps: 0,
            trace: Vec::new(),
            no_rule: None,
        }
    }

    /// Load an input string and rewind: tape holds the input at 0..n-1,
    /// head at 0, current state is the start state, step counter at 0.
    pub fn reset(&mut self, input: &str) {
        self.tape.reset(input);
        self.current = self.machine.start();
        self.steps = 0;
        self.trace.clear();
        self.no_rule = None;
    }

    /// The current machine state.
    pub fn current(&self) -> StateId {
        self.current
    }

    /// Number of rules applied since the last reset.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// The tape, for display queries such as [`Tape::window`].
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Applied rules since the last reset, in order.
    pub fn trace(&self) -> &[TmStepRecord] {
        &self.trace
    }

    /// Whether the machine halted in an accept state.
    pub fn is_accepted(&self) -> bool {
        self.machine.accepting().contains(self.current)
    }

    /// Whether the machine halted rejecting: either it sits in a reject
    /// state, or it ran out of rules while the reject set was empty.
    pub fn is_rejected(&self) -> bool {
        self.machine.rejecting().contains(self.current) || self.no_rule.is_some()
    }

    /// Perform one move.
    ///
    /// Halted machines (accepted or rejected) return [`TmStep::Halted`]
    /// idempotently. When no rule matches the current (state, symbol), the
    /// run lands on the first-registered reject state (or stays un-landed
    /// if the reject set is empty) and the outcome is rejecting either way.
    pub fn step(&mut self) -> TmStep {
        if self.is_accepted() || self.is_rejected() {
            return TmStep::Halted;
        }

        let read = self.tape.read();
        let Some(rule) = self.machine.rule(self.current, read).copied() else {
            let state = self.current;
            self.no_rule = Some((state, read));
            if let Some(landing) = self.machine.first_rejecting() {
                self.current = landing;
            }
            return TmStep::NoRule { state, read };
        };

        let record = TmStepRecord {
            from: self.current,
            head: self.tape.head(),
            read,
            write: rule.write,
            direction: rule.direction,
            to: rule.target,
        };
        self.tape.write(rule.write);
        self.tape.move_head(rule.direction);
        self.current = rule.target;
        self.steps += 1;
        self.trace.push(record.clone());
        TmStep::Applied(record)
    }

    /// Drive the machine until it halts or `max_steps` rules have been
    /// applied. Reaching the ceiling without halting is reported as
    /// [`TmOutcome::OutOfBudget`], never as a rejection.
    pub fn run(&mut self, max_steps: u64) -> TmOutcome {
        loop {
            if self.is_accepted() {
                debug!(steps = self.steps, "tm accepted");
                return TmOutcome::Accepted { steps: self.steps };
            }
            if self.is_rejected() {
                let diagnostic = match self.no_rule {
                    Some((state, read)) => format!(
                        "no rule for ({}, '{read}')",
                        self.machine.states().name(state)
                    ),
                    None => format!(
                        "halted in reject state {}",
                        self.machine.states().name(self.current)
                    ),
                };
                debug!(steps = self.steps, %diagnostic, "tm rejected");
                return TmOutcome::Rejected {
                    steps: self.steps,
                    diagnostic,
                };
            }
            if self.steps >= max_steps {
                debug!(steps = self.steps, "tm out of budget");
                return TmOutcome::OutOfBudget { steps: self.steps };
            }
            self.step();
        }
    }
}
