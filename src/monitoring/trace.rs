/*!
 * Execution Trace
 * Append-only record of what the CPU did in every simulated unit
 */

use crate::core::types::{Pid, Tick};
use serde::{Deserialize, Serialize};

/// One trace record covering `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEntry {
    Execution {
        start: Tick,
        end: Tick,
        pid: Pid,
        name: String,
        color: String,
    },
    ContextSwitch {
        start: Tick,
        end: Tick,
    },
    Idle {
        start: Tick,
        end: Tick,
    },
}

impl TraceEntry {
    #[inline]
    pub fn start(&self) -> Tick {
        match self {
            Self::Execution { start, .. } | Self::ContextSwitch { start, .. } | Self::Idle { start, .. } => {
                *start
            }
        }
    }

    #[inline]
    pub fn end(&self) -> Tick {
        match self {
            Self::Execution { end, .. } | Self::ContextSwitch { end, .. } | Self::Idle { end, .. } => *end,
        }
    }

    #[inline]
    pub fn duration(&self) -> Tick {
        self.end() - self.start()
    }

    #[inline]
    pub fn pid(&self) -> Option<Pid> {
        match self {
            Self::Execution { pid, .. } => Some(*pid),
            _ => None,
        }
    }

    /// Whether `next` continues this entry without a gap
    fn continues_with(&self, next: &TraceEntry) -> bool {
        if self.end() != next.start() {
            return false;
        }
        match (self, next) {
            (Self::Execution { pid: a, .. }, Self::Execution { pid: b, .. }) => a == b,
            (Self::ContextSwitch { .. }, Self::ContextSwitch { .. }) => true,
            (Self::Idle { .. }, Self::Idle { .. }) => true,
            _ => false,
        }
    }

    fn extend_to(&mut self, new_end: Tick) {
        match self {
            Self::Execution { end, .. } | Self::ContextSwitch { end, .. } | Self::Idle { end, .. } => {
                *end = new_end
            }
        }
    }
}

/// Ordered trace of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Gantt view: adjacent entries of the same kind (and process) merged
    pub fn segments(&self) -> Vec<TraceEntry> {
        let mut merged: Vec<TraceEntry> = Vec::new();
        for entry in &self.entries {
            match merged.last_mut() {
                Some(last) if last.continues_with(entry) => last.extend_to(entry.end()),
                _ => merged.push(entry.clone()),
            }
        }
        merged
    }

    /// Contiguous `(start, end)` execution intervals of one process
    pub fn execution_segments(&self, pid: Pid) -> Vec<(Tick, Tick)> {
        self.segments()
            .iter()
            .filter(|e| e.pid() == Some(pid))
            .map(|e| (e.start(), e.end()))
            .collect()
    }

    /// Total units spent executing `pid`
    pub fn executed_units(&self, pid: Pid) -> Tick {
        self.entries
            .iter()
            .filter(|e| e.pid() == Some(pid))
            .map(TraceEntry::duration)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec(start: Tick, pid: Pid) -> TraceEntry {
        TraceEntry::Execution {
            start,
            end: start + 1,
            pid,
            name: format!("P{}", pid),
            color: "#000".into(),
        }
    }

    #[test]
    fn test_segments_merge_runs() {
        let mut trace = Trace::new();
        trace.push(TraceEntry::ContextSwitch { start: 0, end: 1 });
        trace.push(exec(1, 1));
        trace.push(exec(2, 1));
        trace.push(TraceEntry::ContextSwitch { start: 3, end: 4 });
        trace.push(exec(4, 2));
        trace.push(TraceEntry::Idle { start: 5, end: 6 });
        trace.push(TraceEntry::Idle { start: 6, end: 7 });

        let segments = trace.segments();
        assert_eq!(segments.len(), 5);
        assert_eq!((segments[1].start(), segments[1].end()), (1, 3));
        assert_eq!((segments[4].start(), segments[4].end()), (5, 7));
        assert_eq!(trace.execution_segments(1), vec![(1, 3)]);
        assert_eq!(trace.executed_units(2), 1);
    }

    #[test]
    fn test_different_processes_not_merged() {
        let mut trace = Trace::new();
        trace.push(exec(0, 1));
        trace.push(exec(1, 2));
        trace.push(exec(2, 1));
        assert_eq!(trace.segments().len(), 3);
        assert_eq!(trace.execution_segments(1), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_entry_serializes_with_kind() {
        let json = serde_json::to_value(TraceEntry::Idle { start: 2, end: 3 }).unwrap();
        assert_eq!(json["kind"], "idle");
        assert_eq!(json["start"], 2);
    }
}
