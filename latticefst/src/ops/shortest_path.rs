/*! Shortest distances and n-best path extraction.

[`shortest_distance`] runs a generalized label-correcting relaxation (a
worklist plus a residual vector, not a priority queue) so it stays correct
for any semiring, not just the tropical one. It runs over the *reversed*
machine, which makes the resulting vector read as "distance to the final
states" against the original machine; [`n_shortest_paths`] depends on that
direction for its cost estimates.

Both operations assume `natural_less` is monotonic with respect to `times`
(true for the tropical and log semirings); semirings without that property
are unsupported here.
*/

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use log::debug;

use crate::fst::{Arc, Fst, MutableFst, VectorFst};
use crate::ops::reverse::{extend_final, reverse};
use crate::semiring::Semiring;
use crate::types::{StateId, NO_STATE};

/// For every state, the `plus`-combined weight of all paths from that state
/// to acceptance. The vector has one extra trailing entry for the unified
/// final state the reversal introduces; entry `i` belongs to state `i` of
/// the input machine. A machine without a start state yields all-`zero()`.
pub fn shortest_distance<W: Semiring, F: Fst<W>>(fst: &F) -> Vec<W> {
    let rev = reverse(fst);
    let n = rev.num_states();
    let mut d = vec![W::zero(); n];
    let mut r = vec![W::zero(); n];
    let start = match rev.start() {
        Some(start) => start,
        None => return d,
    };
    d[start as usize] = W::one();
    r[start as usize] = W::one();

    let mut queue: VecDeque<StateId> = VecDeque::new();
    let mut queued = vec![false; n];
    queue.push_back(start);
    queued[start as usize] = true;

    while let Some(state) = queue.pop_front() {
        queued[state as usize] = false;
        let rnew = r[state as usize];
        r[state as usize] = W::zero();
        for arc in rev.arcs(state) {
            let dest = arc.nextstate as usize;
            let relaxed = d[dest].plus(rnew.times(arc.weight));
            if relaxed != d[dest] {
                d[dest] = relaxed;
                r[dest] = r[dest].plus(rnew.times(arc.weight));
                if !queued[dest] {
                    queued[dest] = true;
                    queue.push_back(arc.nextstate);
                }
            }
        }
    }
    d
}

struct SearchNode<W> {
    state: StateId,
    cost: W,
    parent: Option<usize>,
    via: Option<Arc<W>>,
    /// Result state materialized for this node, `NO_STATE` until popped.
    out_state: StateId,
}

struct QueueEntry<W> {
    /// `times(cost so far, distance to acceptance)`; the exact remaining
    /// tail is already known, so this estimate never undershoots.
    estimate: W,
    seq: u64,
    node: usize,
}

impl<W: Semiring> Ord for QueueEntry<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops its greatest entry: the cheapest estimate must
        // compare greatest, and ties go to the earlier discovery.
        if self.estimate.natural_less(other.estimate) {
            Ordering::Greater
        } else if other.estimate.natural_less(self.estimate) {
            Ordering::Less
        } else {
            other.seq.cmp(&self.seq)
        }
    }
}

impl<W: Semiring> PartialOrd for QueueEntry<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: Semiring> PartialEq for QueueEntry<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: Semiring> Eq for QueueEntry<W> {}

/// Extract the `n` lowest-weight accepted paths as a new machine (a tree of
/// prefixes, one leaf per extracted path). Ties break by discovery order.
///
/// The input is not determinized here: on nondeterministic machines several
/// extracted paths may spell the same string. Callers wanting the `n` best
/// *unique* strings determinize first.
///
/// Returns `None` when the machine has no start state or accepts nothing.
pub fn n_shortest_paths<W: Semiring, F: Fst<W>>(fst: &F, n: usize) -> Option<VectorFst<W>> {
    let start = match fst.start() {
        Some(start) => start,
        None => {
            debug!("n_shortest_paths: no start state");
            return None;
        }
    };
    let mut result = VectorFst::new();
    result.set_input_symbols(fst.input_symbols().clone());
    result.set_output_symbols(fst.output_symbols().clone());
    if n == 0 {
        return Some(result);
    }

    let d = shortest_distance(fst);
    if d[start as usize] == W::zero() {
        debug!("n_shortest_paths: the machine accepts nothing");
        return None;
    }

    let mut ext = VectorFst::from_fst(fst);
    let unified = extend_final(&mut ext);
    debug_assert_eq!(unified as usize + 1, d.len());

    let mut repetitions = vec![0usize; ext.num_states()];
    let mut nodes: Vec<SearchNode<W>> = vec![SearchNode {
        state: start,
        cost: W::one(),
        parent: None,
        via: None,
        out_state: NO_STATE,
    }];
    let mut heap: BinaryHeap<QueueEntry<W>> = BinaryHeap::new();
    let mut seq = 0u64;
    heap.push(QueueEntry {
        estimate: W::one().times(d[start as usize]),
        seq,
        node: 0,
    });

    let mut completed = 0usize;
    while let Some(entry) = heap.pop() {
        let (state, cost, parent, via) = {
            let node = &nodes[entry.node];
            (node.state, node.cost, node.parent, node.via)
        };
        repetitions[state as usize] += 1;

        if state == unified {
            // Fold the synthetic final hop back into a final weight, so the
            // result contains only real states.
            let parent = parent.expect("the unified final is never the search root");
            let via = via.expect("the unified final is never the search root");
            result.set_final(nodes[parent].out_state, via.weight);
            completed += 1;
            if completed == n {
                break;
            }
            continue;
        }

        let out = result
            .add_state()
            .expect("growable fst never refuses add_state");
        nodes[entry.node].out_state = out;
        match parent {
            None => result.set_start(out),
            Some(parent) => {
                let via = via.expect("non-root nodes record the arc they took");
                result
                    .add_arc(
                        nodes[parent].out_state,
                        Arc::new(via.ilabel, via.olabel, via.weight, out),
                    )
                    .expect("growable fst never refuses arcs");
            }
        }

        if repetitions[state as usize] <= n {
            for arc in ext.arcs(state) {
                let next_cost = cost.times(arc.weight);
                seq += 1;
                nodes.push(SearchNode {
                    state: arc.nextstate,
                    cost: next_cost,
                    parent: Some(entry.node),
                    via: Some(*arc),
                    out_state: NO_STATE,
                });
                heap.push(QueueEntry {
                    estimate: next_cost.times(d[arc.nextstate as usize]),
                    seq,
                    node: nodes.len() - 1,
                });
            }
        }
    }

    debug!(
        "n_shortest_paths: extracted {} of {} requested paths",
        completed, n
    );
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::{LogWeight, TropicalWeight};
    use crate::test_util::accepted_paths;

    #[test]
    fn distances_on_a_diamond() {
        let mut fst = VectorFst::<TropicalWeight>::new();
        for _ in 0..3 {
            fst.add_state().unwrap();
        }
        fst.set_start(0);
        fst.set_final(2, TropicalWeight::one());
        fst.add_arc(0, Arc::new(1, 1, TropicalWeight(1.0), 1)).unwrap();
        fst.add_arc(0, Arc::new(2, 2, TropicalWeight(4.0), 2)).unwrap();
        fst.add_arc(1, Arc::new(3, 3, TropicalWeight(1.0), 2)).unwrap();

        let d = shortest_distance(&fst);
        assert_eq!(d.len(), 4);
        assert_eq!(d[0], TropicalWeight(2.0));
        assert_eq!(d[1], TropicalWeight(1.0));
        assert_eq!(d[2], TropicalWeight(0.0));
        assert_eq!(d[3], TropicalWeight::one());
    }

    #[test]
    fn log_distances_combine_parallel_paths() {
        let mut fst = VectorFst::<LogWeight>::new();
        fst.add_state().unwrap();
        fst.add_state().unwrap();
        fst.set_start(0);
        fst.set_final(1, LogWeight::one());
        fst.add_arc(0, Arc::new(1, 1, LogWeight(1.0), 1)).unwrap();
        fst.add_arc(0, Arc::new(2, 2, LogWeight(1.0), 1)).unwrap();

        let d = shortest_distance(&fst);
        // two weight-1.0 paths: -ln(2 e^-1) = 1 - ln 2
        assert!((d[0].value() - (1.0 - 2.0f32.ln())).abs() < 1e-6);
    }

    /// Two states, one arc, one accepted path of weight 1.0: the single
    /// best path comes back as a two-state machine.
    #[test]
    fn one_best_of_a_single_arc_machine() {
        let mut fst = VectorFst::<TropicalWeight>::new();
        fst.add_state().unwrap();
        fst.add_state().unwrap();
        fst.set_start(0);
        fst.set_final(1, TropicalWeight::one());
        fst.add_arc(0, Arc::new(5, 5, TropicalWeight(1.0), 1)).unwrap();

        let best = n_shortest_paths(&fst, 1).unwrap();
        assert_eq!(best.num_states(), 2);
        let paths = accepted_paths(&best);
        assert_eq!(paths.len(), 1);
        let (ilabels, _, weight) = &paths[0];
        assert_eq!(ilabels, &vec![5]);
        assert_eq!(*weight, TropicalWeight(1.0));
    }

    fn three_way_fst() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        fst.add_state().unwrap();
        fst.add_state().unwrap();
        fst.set_start(0);
        fst.set_final(1, TropicalWeight::one());
        fst.add_arc(0, Arc::new(2, 2, TropicalWeight(2.0), 1)).unwrap();
        fst.add_arc(0, Arc::new(1, 1, TropicalWeight(1.0), 1)).unwrap();
        fst.add_arc(0, Arc::new(3, 3, TropicalWeight(3.0), 1)).unwrap();
        fst
    }

    #[test]
    fn paths_come_out_cheapest_first() {
        let fst = three_way_fst();
        let two = n_shortest_paths(&fst, 2).unwrap();
        let paths = accepted_paths(&two);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].2, TropicalWeight(1.0));
        assert_eq!(paths[1].2, TropicalWeight(2.0));
    }

    #[test]
    fn smaller_n_is_a_prefix_of_larger_n() {
        let fst = three_way_fst();
        for n1 in 1..3usize {
            for n2 in (n1 + 1)..=3usize {
                let small = accepted_paths(&n_shortest_paths(&fst, n1).unwrap());
                let large = accepted_paths(&n_shortest_paths(&fst, n2).unwrap());
                assert_eq!(&large[..small.len()], &small[..]);
            }
        }
    }

    #[test]
    fn n_beyond_path_count_returns_everything() {
        let fst = three_way_fst();
        let all = n_shortest_paths(&fst, 10).unwrap();
        assert_eq!(accepted_paths(&all).len(), 3);
    }

    #[test]
    fn cycles_yield_repeated_unrollings() {
        let mut fst = VectorFst::<TropicalWeight>::new();
        fst.add_state().unwrap();
        fst.set_start(0);
        fst.set_final(0, TropicalWeight::one());
        fst.add_arc(0, Arc::new(1, 1, TropicalWeight(1.0), 0)).unwrap();

        let best = n_shortest_paths(&fst, 3).unwrap();
        let paths = accepted_paths(&best);
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].2, TropicalWeight(0.0));
        assert_eq!(paths[1].2, TropicalWeight(1.0));
        assert_eq!(paths[2].2, TropicalWeight(2.0));
    }

    #[test]
    fn machine_accepting_nothing_returns_none() {
        let mut fst = VectorFst::<TropicalWeight>::new();
        fst.add_state().unwrap();
        fst.add_state().unwrap();
        fst.set_start(0);
        // state 1 is final but unreachable; nothing is accepted
        fst.set_final(1, TropicalWeight::one());
        assert!(n_shortest_paths(&fst, 1).is_none());
    }
}
