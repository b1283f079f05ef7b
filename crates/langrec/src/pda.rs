//! Pushdown automaton and its breadth-first executor.

use crate::state::{StateId, StateRegistry, StateSet};
use crate::symbol::{Alphabet, Symbol};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// One PDA transition rule.
///
/// `read`, `pop` and `push` are all optional: `None` reads no input, guards
/// no stack top, or pushes nothing, respectively. Several rules may share
/// the same (source, read) pair; that is where the nondeterminism lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdaRule {
    pub source: StateId,
    pub read: Option<Symbol>,
    pub pop: Option<Symbol>,
    pub push: Option<Symbol>,
    pub target: StateId,
}

/// A pushdown automaton.
#[derive(Debug, Clone)]
pub struct Pda {
    states: StateRegistry,
    input_alphabet: Alphabet,
    stack_alphabet: Alphabet,
    rules: Vec<PdaRule>,
    start: StateId,
    accepting: StateSet,
    initial_stack: Symbol,
}

/// One explored configuration: state, input cursor and the full stack with
/// the top at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdaConfig {
    pub state: StateId,
    pub cursor: usize,
    pub stack: Vec<Symbol>,
}

/// Verdict of a PDA run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdaVerdict {
    Accepted,
    Rejected,
    /// The exploration bound was hit before the search settled. Never
    /// returned by the unbounded [`Pda::run`].
    Inconclusive,
}

/// The outcome of one PDA run: verdict, dequeue-ordered trace, cause.
#[derive(Debug, Clone)]
pub struct PdaRun {
    pub verdict: PdaVerdict,
    pub trace: Vec<PdaConfig>,
    pub diagnostic: String,
}

impl Pda {
    /// Create a PDA with no rules yet.
    pub fn new(
        states: StateRegistry,
        input_alphabet: Alphabet,
        stack_alphabet: Alphabet,
        start: StateId,
        accepting: StateSet,
        initial_stack: Symbol,
    ) -> Self {
        Self {
            states,
            input_alphabet,
            stack_alphabet,
            rules: Vec::new(),
            start,
            accepting,
            initial_stack,
        }
    }

    /// Register a rule.
    pub fn add_rule(&mut self, rule: PdaRule) {
        self.rules.push(rule);
    }

    /// The state name registry.
    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    /// The input alphabet.
    pub fn input_alphabet(&self) -> &Alphabet {
        &self.input_alphabet
    }

    /// The stack alphabet.
    pub fn stack_alphabet(&self) -> &Alphabet {
        &self.stack_alphabet
    }

    /// The start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The accept set.
    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    /// The initial stack symbol.
    pub fn initial_stack(&self) -> Symbol {
        self.initial_stack
    }

    /// Breadth-first search over configurations, unbounded.
    ///
    /// A rule that only pushes under an epsilon guard generates unboundedly
    /// many distinct stacks, and this search will then not terminate. That
    /// matches the simulator this machine model comes from; use
    /// [`Pda::run_bounded`] to cap the exploration instead.
    pub fn run(&self, input: &str) -> PdaRun {
        self.explore(input, None)
    }

    /// Breadth-first search capped at `limit` dequeued configurations.
    /// Hitting the cap yields [`PdaVerdict::Inconclusive`], never a
    /// rejection.
    pub fn run_bounded(&self, input: &str, limit: usize) -> PdaRun {
        self.explore(input, Some(limit))
    }

    fn explore(&self, input: &str, bound: Option<usize>) -> PdaRun {
        debug!(input, ?bound, "pda run");
        let input: Vec<Symbol> = input.chars().map(Symbol::new).collect();

        let mut queue: VecDeque<PdaConfig> = VecDeque::new();
        queue.push_back(PdaConfig {
            state: self.start,
            cursor: 0,
            stack: vec![self.initial_stack],
        });

        let mut visited: HashSet<(StateId, usize, Vec<Symbol>)> = HashSet::new();
        let mut trace: Vec<PdaConfig> = Vec::new();
        let mut explored = 0usize;

        while let Some(config) = queue.pop_front() {
            if !visited.insert((config.state, config.cursor, config.stack.clone())) {
                continue;
            }

            if bound.is_some_and(|limit| explored >= limit) {
                let diagnostic =
                    format!("exploration bound of {explored} configurations reached");
                debug!(%diagnostic, "pda inconclusive");
                return PdaRun {
                    verdict: PdaVerdict::Inconclusive,
                    trace,
                    diagnostic,
                };
            }
            explored += 1;
            trace.push(config.clone());

            // First accepting configuration wins and halts the search.
            if config.cursor == input.len()
                && self.accepting.contains(config.state)
                && (config.stack.is_empty() || config.stack == [self.initial_stack])
            {
                let diagnostic = format!(
                    "accepting configuration reached in state {}",
                    self.states.name(config.state)
                );
                debug!(%diagnostic, "pda accepted");
                return PdaRun {
                    verdict: PdaVerdict::Accepted,
                    trace,
                    diagnostic,
                };
            }

            for rule in self.rules.iter().filter(|r| r.source == config.state) {
                let next_cursor = match rule.read {
                    Some(symbol) => {
                        if config.cursor >= input.len() || input[config.cursor] != symbol {
                            continue;
                        }
                        config.cursor + 1
                    }
                    None => config.cursor,
                };

                let mut stack = config.stack.clone();
                if let Some(guard) = rule.pop {
                    if stack.last() != Some(&guard) {
                        continue;
                    }
                    stack.pop();
                }
                if let Some(push) = rule.push {
                    stack.push(push);
                }

                queue.push_back(PdaConfig {
                    state: rule.target,
                    cursor: next_cursor,
                    stack,
                });
            }
        }

        let diagnostic = format!("search exhausted after {explored} configurations");
        debug!(%diagnostic, "pda rejected");
        PdaRun {
            verdict: PdaVerdict::Rejected,
            trace,
            diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// PDA for a^n b^n: push X per 'a', pop X per 'b', bottom marker Z.
    fn balanced_ab() -> Pda {
        let mut states = StateRegistry::new();
        let q0 = states.insert("q0");
        let q1 = states.insert("q1");
        let accepting: StateSet = [q0, q1].into_iter().collect();
        let mut pda = Pda::new(
            states,
            "ab".chars().collect(),
            "XZ".chars().collect(),
            q0,
            accepting,
            Symbol::new('Z'),
        );
        let (a, b, x) = (Symbol::new('a'), Symbol::new('b'), Symbol::new('X'));
        pda.add_rule(PdaRule {
            source: q0,
            read: Some(a),
            pop: None,
            push: Some(x),
            target: q0,
        });
        pda.add_rule(PdaRule {
            source: q0,
            read: Some(b),
            pop: Some(x),
            push: None,
            target: q1,
        });
        pda.add_rule(PdaRule {
            source: q1,
            read: Some(b),
            pop: Some(x),
            push: None,
            target: q1,
        });
        pda
    }

    #[test]
    fn test_balanced_stack_language() {
        let pda = balanced_ab();
        assert_eq!(pda.run("aabb").verdict, PdaVerdict::Accepted);
        assert_eq!(pda.run("").verdict, PdaVerdict::Accepted);
        assert_eq!(pda.run("aaabbb").verdict, PdaVerdict::Accepted);
        assert_eq!(pda.run("aab").verdict, PdaVerdict::Rejected);
        assert_eq!(pda.run("abab").verdict, PdaVerdict::Rejected);
        assert_eq!(pda.run("ba").verdict, PdaVerdict::Rejected);
    }

    #[test]
    fn test_trace_starts_at_initial_configuration() {
        let pda = balanced_ab();
        let run = pda.run("ab");
        assert_eq!(
            run.trace.first(),
            Some(&PdaConfig {
                state: 0,
                cursor: 0,
                stack: vec![Symbol::new('Z')],
            })
        );
        assert_eq!(run.verdict, PdaVerdict::Accepted);
    }

    #[test]
    fn test_visited_set_breaks_epsilon_cycles() {
        // An epsilon self-loop that leaves the stack unchanged revisits the
        // same configuration forever; the visited set must end the search.
        let mut states = StateRegistry::new();
        let q0 = states.insert("q0");
        let mut pda = Pda::new(
            states,
            "a".chars().collect(),
            "Z".chars().collect(),
            q0,
            StateSet::with_capacity(1),
            Symbol::new('Z'),
        );
        pda.add_rule(PdaRule {
            source: q0,
            read: None,
            pop: None,
            push: None,
            target: q0,
        });

        let run = pda.run("a");
        assert_eq!(run.verdict, PdaVerdict::Rejected);
    }

    #[test]
    fn test_bounded_search_reports_inconclusive() {
        // Pure pusher: every epsilon step grows the stack, so the stacks
        // are all distinct and the unbounded search would never return.
        let mut states = StateRegistry::new();
        let q0 = states.insert("q0");
        let mut pda = Pda::new(
            states,
            "a".chars().collect(),
            "XZ".chars().collect(),
            q0,
            StateSet::with_capacity(1),
            Symbol::new('Z'),
        );
        pda.add_rule(PdaRule {
            source: q0,
            read: None,
            pop: None,
            push: Some(Symbol::new('X')),
            target: q0,
        });

        let run = pda.run_bounded("", 50);
        assert_eq!(run.verdict, PdaVerdict::Inconclusive);
        assert!(run.diagnostic.contains("50"));
    }

    #[test]
    fn test_empty_stack_acceptance() {
        // Accept by draining the bottom marker: q0 -a, pop Z-> q1.
        let mut states = StateRegistry::new();
        let q0 = states.insert("q0");
        let q1 = states.insert("q1");
        let accepting = StateSet::singleton(q1, 2);
        let mut pda = Pda::new(
            states,
            "a".chars().collect(),
            "Z".chars().collect(),
            q0,
            accepting,
            Symbol::new('Z'),
        );
        pda.add_rule(PdaRule {
            source: q0,
            read: Some(Symbol::new('a')),
            pop: Some(Symbol::new('Z')),
            push: None,
            target: q1,
        });

        let run = pda.run("a");
        assert_eq!(run.verdict, PdaVerdict::Accepted);
        assert!(run.trace.last().unwrap().stack.is_empty());
    }
}
