//! Backtracking search over the segment chain.
//!
//! Segments are filled one at a time. Inside a segment the value for each
//! position is either the one already there or one swapped in from the
//! untried tail `(segment end..exempt)`, so each combination of values is
//! reached once. The last value of a segment is forced by the target.
//! Completing a segment moves on along the chain:
//! - an axis segment hands a fresh copy of the set to the next axis segment,
//!   or, after the last one, to the first regular segment (counting pass
//!   stops there and only counts);
//! - a regular segment is tried in every internal ordering before the next
//!   segment is resolved;
//! - completing the last searched segment yields a solution, the final
//!   segment's values being forced.
//!
//! Recursion depth is bounded by the set size plus the number of segments.

use crate::error::Result;
use crate::grid::Value;
use crate::progress::ProgressCounters;
use crate::topology::{Segment, SegmentId, Topology};
use crate::SolutionSink;

/// Which of the two traversals is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// Stops at each complete axis solidification set and counts it.
    Counting,
    /// Continues through the regular segments and emits solutions.
    Generating,
}

/// Returns `1..=set_size` with `origin_value` moved to set coordinate 0.
pub fn initial_set(set_size: usize, origin_value: Value) -> Vec<Value> {
    let mut set: Vec<Value> = (1..=set_size as Value).collect();
    set.swap(0, (origin_value - 1) as usize);
    set
}

pub(crate) struct Search<'a, S: SolutionSink + ?Sized> {
    topology: &'a Topology,
    pass: Pass,
    counters: &'a ProgressCounters,
    sink: &'a mut S,
}

impl<'a, S: SolutionSink + ?Sized> Search<'a, S> {
    pub fn new(topology: &'a Topology, pass: Pass, counters: &'a ProgressCounters, sink: &'a mut S) -> Self {
        Self {
            topology,
            pass,
            counters,
            sink,
        }
    }

    /// Runs the pass from the head of the chain.
    ///
    /// Swaps made while resolving the first segment stay in `set`, so a pass
    /// run on the same buffer afterwards starts from where this one left it.
    pub fn run(&mut self, set: &mut Vec<Value>) -> Result<()> {
        let topology = self.topology;

        let Some(first) = topology.first_segment() else {
            // a single cell: the empty axis set, and the origin is the solution
            return match self.pass {
                Pass::Counting => {
                    self.counters.record_axis_set_counted();
                    Ok(())
                }
                Pass::Generating => {
                    self.counters.record_axis_set_traversed();
                    self.emit(set)
                }
            };
        };

        let segment = topology.segment(first);
        let target = topology.target_for(segment, set);
        let set_size = topology.set_size();
        self.resolve_segment(set, first, segment.start, set_size, set_size, target)
    }

    /// Places a value at `depth` of segment `id`, `target` being what the
    /// rest of the segment (including `depth`) still has to add up to.
    fn resolve_segment(
        &mut self,
        set: &mut Vec<Value>,
        id: SegmentId,
        depth: usize,
        mut exempt: usize,
        mut segment_exempt: usize,
        target: Value,
    ) -> Result<()> {
        let topology = self.topology;
        let segment = topology.segment(id);

        if depth == segment.end() - 1 {
            if !sum_checks_hold(set, segment, topology.magic_constant(), target) {
                return Ok(());
            }
            let Some(found) = (depth..exempt).find(|&i| set[i] == target) else {
                return Ok(());
            };
            set.swap(found, depth);
            return self.complete_segment(set, id, segment_exempt);
        }

        if set[depth] < target {
            let remaining = target - set[depth];
            self.resolve_segment(set, id, depth + 1, exempt, segment_exempt, remaining)?;
        }

        while exempt > segment.end() {
            exempt -= 1;
            if segment.is_axis && depth == segment.start {
                segment_exempt -= 1;
            }
            if set[exempt] < target {
                set.swap(exempt, depth);
                let remaining = target - set[depth];
                self.resolve_segment(set, id, depth + 1, exempt, segment_exempt, remaining)?;
            }
        }

        Ok(())
    }

    fn complete_segment(&mut self, set: &mut Vec<Value>, id: SegmentId, segment_exempt: usize) -> Result<()> {
        let topology = self.topology;
        let segment = topology.segment(id);

        if !segment.is_axis {
            return match segment.next {
                Some(next) => self.permute_segment(set.clone(), segment, next),
                None => self.emit(set),
            };
        }

        let last_axis = topology.is_last_axis_segment(id);
        if last_axis {
            if self.pass == Pass::Counting {
                self.counters.record_axis_set_counted();
                return Ok(());
            }
            self.counters.record_axis_set_traversed();
        }

        let mut branch = set.clone();
        let Some(next_id) = segment.next else {
            // nothing left to search but the forced segment
            return self.emit(&branch);
        };
        let next = topology.segment(next_id);
        let exempt = if last_axis { topology.set_size() } else { segment_exempt };
        let target = topology.target_for(next, &branch);
        self.resolve_segment(&mut branch, next_id, next.start, exempt, segment_exempt, target)
    }

    /// Resolves `next` once for every ordering of `segment`'s values.
    ///
    /// Whatever the nested search leaves behind in later positions carries
    /// over to the following ordering.
    fn permute_segment(&mut self, mut set: Vec<Value>, segment: &Segment, next: SegmentId) -> Result<()> {
        let topology = self.topology;
        self.resolve_from_start(&mut set, next)?;
        for &(a, b) in topology.permutations().swaps_for(segment.length) {
            set.swap(segment.start + a, segment.start + b);
            self.resolve_from_start(&mut set, next)?;
        }
        Ok(())
    }

    fn resolve_from_start(&mut self, set: &mut Vec<Value>, id: SegmentId) -> Result<()> {
        let topology = self.topology;
        let segment = topology.segment(id);
        let target = topology.target_for(segment, set);
        let set_size = topology.set_size();
        self.resolve_segment(set, id, segment.start, set_size, set_size, target)
    }

    fn emit(&mut self, set: &[Value]) -> Result<()> {
        self.counters.record_cube_identity();
        self.sink.accept(set)
    }
}

/// Every cross-check line must leave exactly `target` for its missing cell.
#[inline]
fn sum_checks_hold(set: &[Value], segment: &Segment, magic_constant: Value, target: Value) -> bool {
    segment
        .sum_checks
        .iter()
        .all(|check| magic_constant - check.iter().map(|&i| set[i]).sum::<Value>() == target)
}
