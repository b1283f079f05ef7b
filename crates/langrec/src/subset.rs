//! Subset construction: converting an epsilon-NFA to an equivalent DFA.

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::state::{StateId, StateRegistry, StateSet};
use crate::symbol::Symbol;
use std::collections::VecDeque;
use tracing::debug;

/// Convert an NFA to a DFA with the powerset construction.
///
/// Pure function: the source NFA is not mutated. Each reachable set of NFA
/// states becomes one DFA state, named canonically (member names sorted and
/// joined, e.g. `{q0,q1}`) so that structurally identical sets always land
/// on the same DFA state. An empty closure/move result records no
/// transition, matching the DFA's implicit-trap semantics. Termination
/// follows from the composite count being bounded by 2^|states|.
pub fn subset_construction(nfa: &Nfa) -> Dfa {
    let capacity = nfa.states().len();
    let alphabet = nfa.alphabet().clone();
    let start_set = nfa.epsilon_closure(&StateSet::singleton(nfa.start(), capacity));

    let mut registry = StateRegistry::new();

    // The closure always contains the start state, so this branch is a
    // normally-unreachable fallback: a lone non-accepting trap state.
    if start_set.is_empty() {
        let trap = registry.insert("Ø");
        return Dfa::new(registry, alphabet, trap, StateSet::with_capacity(1));
    }

    // The registry doubles as the processed-set index: a composite is seen
    // iff its canonical name is registered.
    let start_name = nfa.states().canonical_name(&start_set);
    let start_id = registry.insert(&start_name);
    debug!(start = %start_name, "subset construction");

    let mut accepting_ids: Vec<StateId> = Vec::new();
    if start_set.intersects(nfa.accepting()) {
        accepting_ids.push(start_id);
    }

    let mut transitions: Vec<(StateId, Symbol, StateId)> = Vec::new();
    let mut worklist: VecDeque<(StateId, StateSet)> = VecDeque::new();
    worklist.push_back((start_id, start_set));

    while let Some((current_id, composite)) = worklist.pop_front() {
        for symbol in alphabet.iter() {
            let next = nfa.epsilon_closure(&nfa.move_on_symbol(&composite, symbol));
            if next.is_empty() {
                continue;
            }

            let name = nfa.states().canonical_name(&next);
            let next_id = match registry.resolve(&name) {
                Some(id) => id,
                None => {
                    let id = registry.insert(&name);
                    if next.intersects(nfa.accepting()) {
                        accepting_ids.push(id);
                    }
                    debug!(composite = %name, "discovered composite state");
                    worklist.push_back((id, next));
                    id
                }
            };
            transitions.push((current_id, symbol, next_id));
        }
    }

    let accepting: StateSet = accepting_ids.into_iter().collect();
    let mut dfa = Dfa::new(registry, alphabet, start_id, accepting);
    for (source, symbol, destination) in transitions {
        dfa.add_transition(source, symbol, destination);
    }
    dfa
}

#[cfg(test)]
mod tests {
    use super::*;

    /// NFA with epsilon moves for 0*1*2* over {0,1,2}.
    fn zeros_ones_twos() -> Nfa {
        let mut states = StateRegistry::new();
        let q1 = states.insert("q1");
        let q2 = states.insert("q2");
        let q3 = states.insert("q3");
        let accepting = StateSet::singleton(q3, 3);
        let mut nfa = Nfa::new(states, "012".chars().collect(), q1, accepting);
        nfa.add_transition(q1, Some(Symbol::new('0')), q1);
        nfa.add_transition(q1, None, q2);
        nfa.add_transition(q2, Some(Symbol::new('1')), q2);
        nfa.add_transition(q2, None, q3);
        nfa.add_transition(q3, Some(Symbol::new('2')), q3);
        nfa
    }

    /// NFA over {0,1}: q0 -0-> q0, q0 -eps-> q1, q1 -1-> q2, q2 -0-> q1,
    /// accepting {q2}.
    fn epsilon_bridge() -> Nfa {
        let mut states = StateRegistry::new();
        let q0 = states.insert("q0");
        let q1 = states.insert("q1");
        let q2 = states.insert("q2");
        let accepting = StateSet::singleton(q2, 3);
        let mut nfa = Nfa::new(states, "01".chars().collect(), q0, accepting);
        nfa.add_transition(q0, Some(Symbol::new('0')), q0);
        nfa.add_transition(q0, None, q1);
        nfa.add_transition(q1, Some(Symbol::new('1')), q2);
        nfa.add_transition(q2, Some(Symbol::new('0')), q1);
        nfa
    }

    fn strings_up_to(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut all = vec![String::new()];
        let mut layer = vec![String::new()];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for prefix in &layer {
                for &c in alphabet {
                    let mut s = prefix.clone();
                    s.push(c);
                    next.push(s);
                }
            }
            all.extend(next.iter().cloned());
            layer = next;
        }
        all
    }

    #[test]
    fn test_start_state_is_closure_of_nfa_start() {
        let dfa = subset_construction(&epsilon_bridge());
        assert_eq!(dfa.states().name(dfa.start()), "{q0,q1}");
    }

    #[test]
    fn test_accepting_iff_intersects_source_accept_set() {
        let dfa = subset_construction(&epsilon_bridge());
        for (id, name) in dfa.states().iter() {
            let expected = name.contains("q2");
            assert_eq!(dfa.accepting().contains(id), expected, "state {name}");
        }
    }

    #[test]
    fn test_language_equivalence_bounded() {
        for nfa in [zeros_ones_twos(), epsilon_bridge()] {
            let dfa = subset_construction(&nfa);
            let alphabet: Vec<char> = nfa.alphabet().iter().map(Symbol::as_char).collect();
            for word in strings_up_to(&alphabet, 4) {
                assert_eq!(
                    nfa.run(&word).accepted,
                    dfa.run(&word).accepted,
                    "disagreement on {word:?}"
                );
            }
        }
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let nfa = zeros_ones_twos();
        let first = subset_construction(&nfa);
        let second = subset_construction(&nfa);

        let names = |dfa: &Dfa| -> Vec<String> {
            dfa.states().iter().map(|(_, n)| n.to_owned()).collect()
        };
        assert_eq!(names(&first), names(&second));
        assert_eq!(first.accepting().to_vec(), second.accepting().to_vec());

        let table = |dfa: &Dfa| {
            let mut t: Vec<_> = dfa.transitions().collect();
            t.sort_unstable();
            t
        };
        assert_eq!(table(&first), table(&second));
    }

    #[test]
    fn test_source_nfa_untouched() {
        let nfa = epsilon_bridge();
        let before = nfa.run("01").accepted;
        let _ = subset_construction(&nfa);
        assert_eq!(nfa.run("01").accepted, before);
        assert_eq!(nfa.states().len(), 3);
    }

    #[test]
    fn test_missing_moves_stay_implicit_traps() {
        let dfa = subset_construction(&epsilon_bridge());
        // From {q2} there is no '1' move anywhere reachable; the DFA must
        // reject through its implicit trap, not through a recorded state.
        let run = dfa.run("011");
        assert!(!run.accepted);
        assert!(run.diagnostic.contains("no transition"));
    }
}
