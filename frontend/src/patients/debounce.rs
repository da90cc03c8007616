//! Generation-based debouncer.
//!
//! Every `input` supersedes the previous one and hands back a ticket; the
//! caller schedules a timer for the ticket's deadline and calls `fire` when it
//! elapses. Only the ticket from the most recent input yields the value.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebounceTicket {
    generation: u64,
    /// Absolute time at which the ticket may fire, in the caller's clock.
    pub deadline: f64,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    delay_ms: u32,
    generation: u64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn input(&mut self, value: T, now_ms: f64) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(value);
        DebounceTicket {
            generation: self.generation,
            deadline: now_ms + f64::from(self.delay_ms),
        }
    }

    /// Takes the pending value if `ticket` is still the latest one.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    /// Drops the pending value; outstanding tickets become no-ops.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fires every ticket whose deadline is `<= now`, like a timer queue.
    fn elapse(
        debouncer: &mut Debouncer<String>,
        timers: &mut Vec<DebounceTicket>,
        now: f64,
    ) -> Vec<String> {
        let (due, rest): (Vec<_>, Vec<_>) = timers.drain(..).partition(|t| t.deadline <= now);
        *timers = rest;
        due.into_iter().filter_map(|t| debouncer.fire(t)).collect()
    }

    #[test]
    fn rapid_typing_produces_one_value_after_the_last_keystroke() {
        let mut debouncer = Debouncer::new(300);
        let mut timers = Vec::new();
        let mut fired = Vec::new();

        for (at, text) in [(0.0, "M"), (100.0, "Ma"), (200.0, "Mar")] {
            fired.extend(elapse(&mut debouncer, &mut timers, at));
            timers.push(debouncer.input(text.to_string(), at));
        }

        fired.extend(elapse(&mut debouncer, &mut timers, 499.0));
        assert!(fired.is_empty());

        fired.extend(elapse(&mut debouncer, &mut timers, 500.0));
        assert_eq!(fired, vec!["Mar".to_string()]);

        fired.extend(elapse(&mut debouncer, &mut timers, 10_000.0));
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn spaced_inputs_each_fire() {
        let mut debouncer = Debouncer::new(300);
        let first = debouncer.input("a", 0.0);
        assert_eq!(debouncer.fire(first), Some("a"));
        let second = debouncer.input("b", 1_000.0);
        assert_eq!(second.deadline, 1_300.0);
        assert_eq!(debouncer.fire(second), Some("b"));
        assert_eq!(debouncer.fire(second), None);
    }

    #[test]
    fn cancel_invalidates_outstanding_tickets() {
        let mut debouncer = Debouncer::new(300);
        let ticket = debouncer.input(1, 0.0);
        debouncer.cancel();
        assert_eq!(debouncer.fire(ticket), None);
        assert_eq!(debouncer.pending, None);
    }

    #[test]
    fn a_newer_toast_outlives_the_earlier_timer() {
        let mut toast = Debouncer::new(3_000);
        let first = toast.input((), 0.0);
        let second = toast.input((), 2_000.0);

        // first timer elapses at 3s while the second toast is still up
        assert_eq!(toast.fire(first), None);
        assert_eq!(second.deadline, 5_000.0);
        assert_eq!(toast.fire(second), Some(()));
    }
}
