use super::{
    state::{Process, Ticks},
    trace::{Occupant, Trace},
};

// Debug-build invariant checks after every engine primitive. Each call only
// looks at the newest span and the record it touched.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn reset(&mut self) {
        self.step = 0;
    }

    pub fn observe(&mut self, now: Ticks, touched: Option<&Process>, trace: &Trace) {
        self.step += 1;

        debug_assert_eq!(
            trace.total_time(),
            now,
            "Clock {now} out of sync with trace end"
        );
        if let [.., prev, last] = trace.entries() {
            debug_assert_eq!(
                prev.end, last.start,
                "Trace lost continuity at step {}",
                self.step
            );
        }
        debug_assert!(
            trace.entries().last().is_none_or(|e| e.start < e.end),
            "Empty span recorded at step {}",
            self.step
        );

        let Some(process) = touched else {
            // Idle jump
            debug_assert!(
                trace.entries().last().is_none_or(|e| e.is_idle()),
                "Idle jump at step {} left a busy span on top",
                self.step
            );
            return;
        };

        let pid = process.pid;
        debug_assert!(
            trace
                .entries()
                .last()
                .is_some_and(|e| e.occupant == Occupant::Process(pid)),
            "Dispatch of process {pid} not on top of the trace"
        );
        debug_assert!(
            process.remaining < process.burst,
            "Process {pid} dispatched without losing remaining time"
        );

        if let Some(start) = process.start_time {
            debug_assert!(
                start >= process.arrival,
                "Process {pid} started at {start} before arriving at {}",
                process.arrival
            );
        }

        if process.is_complete() {
            debug_assert!(
                process.completion_time == Some(now) && process.metrics.is_some(),
                "Completed process {pid} missing completion bookkeeping"
            );
            debug_assert_eq!(
                process.metrics,
                process.derive_metrics(),
                "Process {pid} metrics disagree with its start/completion ticks"
            );
        } else {
            debug_assert!(
                process.completion_time.is_none(),
                "Process {pid} has completion time but work remaining"
            );
        }
    }
}
