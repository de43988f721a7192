use std::collections::HashSet;

use tracing::{info, warn};

/// Tracks the largest sequence seen and the sequences skipped over,
/// separating recoverable late arrivals from confirmed losses.
#[derive(Debug)]
pub struct SequenceTracker {
    last_seq: u64,
    worst_lag: u64,
    missed: HashSet<u64>,
    log_out_of_order: bool,
    max_out_of_order: u64,
}

impl SequenceTracker {
    pub fn new(log_out_of_order: bool, max_out_of_order: u64) -> Self {
        SequenceTracker {
            last_seq: 0,
            worst_lag: 0,
            missed: HashSet::with_capacity(10),
            log_out_of_order,
            max_out_of_order,
        }
    }

    /// Account for one admitted sequence number.
    pub fn observe(&mut self, seq: u64) {
        if seq > self.last_seq + 1 && self.last_seq != 0 {
            // Likely leap frogged over messages; hold them until later
            // sequences tell us whether they were reordered or lost.
            for skipped in self.last_seq + 1..seq {
                self.missed.insert(skipped);
            }
        }

        let outstanding: Vec<u64> = self.missed.iter().copied().collect();
        for missed_seq in outstanding {
            if missed_seq == seq {
                let lag = self.last_seq - missed_seq;
                if lag > self.worst_lag {
                    self.worst_lag = lag;
                }
                if self.log_out_of_order {
                    info!(
                        "Got sequence {} after {} messages. Worst lag so far {} messages",
                        missed_seq, lag, self.worst_lag
                    );
                }
                self.missed.remove(&missed_seq);
            } else if seq.saturating_sub(missed_seq) > self.max_out_of_order {
                warn!(
                    "Likely missed sequence {}, current {}, worst message delay {}",
                    missed_seq, seq, self.worst_lag
                );
                self.missed.remove(&missed_seq);
            }
        }

        if seq > self.last_seq {
            self.last_seq = seq;
        }
    }

    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    pub fn worst_lag(&self) -> u64 {
        self.worst_lag
    }

    /// Sequences still unaccounted for.
    pub fn outstanding(&self) -> usize {
        self.missed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_sequences_leave_nothing_outstanding() {
        let mut tracker = SequenceTracker::new(false, 500);
        for seq in 1..=5 {
            tracker.observe(seq);
        }

        assert_eq!(tracker.last_seq(), 5);
        assert_eq!(tracker.outstanding(), 0);
        assert_eq!(tracker.worst_lag(), 0);
    }

    #[test]
    fn leapfrog_records_the_skipped_range() {
        let mut tracker = SequenceTracker::new(false, 500);
        tracker.observe(1);
        tracker.observe(5);

        assert_eq!(tracker.outstanding(), 3);
        assert_eq!(tracker.last_seq(), 5);
    }

    #[test]
    fn first_observation_never_counts_as_a_gap() {
        let mut tracker = SequenceTracker::new(false, 500);
        tracker.observe(100);

        assert_eq!(tracker.outstanding(), 0);
        assert_eq!(tracker.last_seq(), 100);
    }

    #[test]
    fn late_arrival_resolves_and_updates_worst_lag() {
        let mut tracker = SequenceTracker::new(true, 500);
        tracker.observe(1);
        tracker.observe(5);
        tracker.observe(3);

        assert_eq!(tracker.outstanding(), 2);
        assert_eq!(tracker.worst_lag(), 2);

        tracker.observe(4);
        assert_eq!(tracker.outstanding(), 1);
        // worst_lag is monotonic: the later, closer arrival does not shrink it.
        assert_eq!(tracker.worst_lag(), 2);
    }

    #[test]
    fn stale_sequences_are_evicted_past_the_window() {
        let mut tracker = SequenceTracker::new(false, 2);
        tracker.observe(1);
        tracker.observe(10);
        assert_eq!(tracker.outstanding(), 8);

        tracker.observe(11);
        // Only 9 is still within the reorder window of 2.
        assert_eq!(tracker.outstanding(), 1);
    }

    #[test]
    fn older_sequence_does_not_move_last_seq_back() {
        let mut tracker = SequenceTracker::new(false, 500);
        tracker.observe(1);
        tracker.observe(5);
        tracker.observe(2);

        assert_eq!(tracker.last_seq(), 5);
    }
}
