use std::sync::Arc;

use dashmap::DashMap;

/// Channel for every fetch that feeds the shared discover pool.
pub const DISCOVER: &str = "discover";

/// Latest-wins bookkeeping for overlapping fetches. Each request takes a
/// ticket on its channel before going upstream; when it comes back, its
/// result may only be applied while the ticket is still the newest one.
/// Channels are compile-time names, so the map never outgrows them.
#[derive(Clone, Default)]
pub struct RequestGenerations {
    latest: Arc<DashMap<&'static str, u64>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    channel: &'static str,
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, channel: &'static str) -> Ticket {
        let mut entry = self.latest.entry(channel).or_insert(0);
        *entry += 1;
        Ticket { channel, generation: *entry }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(ticket.channel).map(|g| *g == ticket.generation).unwrap_or(false)
    }

    pub fn channels(&self) -> usize {
        self.latest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let gens = RequestGenerations::new();
        let first = gens.begin(DISCOVER);
        let second = gens.begin(DISCOVER);
        assert!(!gens.is_current(&first));
        assert!(gens.is_current(&second));
        assert_eq!(second.generation(), 2);
    }

    #[test]
    fn channels_are_independent() {
        let gens = RequestGenerations::new();
        let a = gens.begin(DISCOVER);
        let b = gens.begin("charts");
        assert!(gens.is_current(&a));
        assert!(gens.is_current(&b));
    }

    #[test]
    fn repeated_requests_reuse_one_entry() {
        let gens = RequestGenerations::new();
        for _ in 0..1000 {
            gens.begin(DISCOVER);
        }
        assert_eq!(gens.channels(), 1);
    }
}
