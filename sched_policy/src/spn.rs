//! Shortest-Process-Next with aging

use crate::{PolicyKind, SchedulingPolicy};
use core_types::ProcessId;
use process_model::ProcessTable;

/// Shortest-Process-Next with aging
///
/// Takes the Ready process with the smallest aged burst estimate. On a
/// tie the lowest index wins, which makes the choice deterministic and
/// keeps arrival order among equals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortestProcessNext;

impl ShortestProcessNext {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for ShortestProcessNext {
    fn kind(&self) -> PolicyKind {
        PolicyKind::ShortestProcessNext
    }

    fn select_next(&self, table: &ProcessTable) -> Option<ProcessId> {
        let mut best: Option<(ProcessId, f64)> = None;
        for process in table.ready() {
            let estimate = process.estimated_burst();
            match best {
                // Strictly smaller only, so earlier indices win ties
                Some((_, best_estimate)) if estimate.total_cmp(&best_estimate).is_ge() => {}
                _ => best = Some((process.id(), estimate)),
            }
        }
        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use process_model::ProcessParams;
    use sim_random::test_utils::ScriptedDeviates;

    fn table_with_intervals(intervals: &[u64]) -> ProcessTable {
        ProcessTable::from_params(intervals.iter().map(|&io| ProcessParams::new(1000, io)))
    }

    #[test]
    fn test_picks_smallest_estimate() {
        let table = table_with_intervals(&[5, 2, 8]);
        let policy = ShortestProcessNext::new();
        assert_eq!(policy.select_next(&table), Some(ProcessId::new(1)));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let table = table_with_intervals(&[4, 3, 3, 3]);
        let policy = ShortestProcessNext::new();
        assert_eq!(policy.select_next(&table), Some(ProcessId::new(1)));
    }

    #[test]
    fn test_ignores_blocked_shortest() {
        let mut table = table_with_intervals(&[5, 1, 8]);
        let mut source = ScriptedDeviates::zero();
        let p1 = ProcessId::new(1);
        table.step(p1, 0, &mut source, 1).unwrap();
        table.step(p1, 1, &mut source, 1).unwrap();
        assert!(table.get(p1).unwrap().is_blocked());

        let policy = ShortestProcessNext::new();
        assert_eq!(policy.select_next(&table), Some(ProcessId::new(0)));
    }

    #[test]
    fn test_uses_initial_estimate_override() {
        let table = ProcessTable::from_params(vec![
            ProcessParams::new(10, 1).with_initial_estimate(50.0),
            ProcessParams::new(10, 9).with_initial_estimate(20.0),
        ]);
        let policy = ShortestProcessNext::new();
        assert_eq!(policy.select_next(&table), Some(ProcessId::new(1)));
    }

    #[test]
    fn test_none_when_all_completed() {
        let mut table = ProcessTable::from_params(vec![ProcessParams::new(0, 3)]);
        table.finish_if_done(ProcessId::new(0), 0);
        assert_eq!(ShortestProcessNext::new().select_next(&table), None);
    }
}
