//! Lookup of one third-party address relative to the signed-in user.
//!
//! Each lookup is tagged with the input it was issued for and a generation
//! number. A response is only stored if its tag still matches, so a slow
//! answer for an old input never overwrites a newer one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AddressError;
use crate::model::{Address, SearchResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTicket {
    input: String,
    generation: u64,
    target: Address,
}

impl SearchTicket {
    #[must_use]
    pub fn target(&self) -> &Address {
        &self.target
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Why an input did not turn into a lookup. Never surfaced as a failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Suppressed {
    InvalidAddress(AddressError),
    NoSession,
    SelfLookup,
}

#[derive(Debug, Default)]
pub struct SearchResolver {
    input: String,
    generation: u64,
    in_flight: Option<u64>,
    result: Option<SearchResult>,
}

impl SearchResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Records `input` as the current query and, if it is a lookup worth
    /// making, returns the ticket to issue it under. Any earlier ticket is
    /// superseded either way.
    pub fn begin(&mut self, from: Option<&Address>, input: &str) -> Result<SearchTicket, Suppressed> {
        self.input = input.to_string();
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;

        let suppressed = match (Address::parse(input), from) {
            (Err(e), _) => Suppressed::InvalidAddress(e),
            (Ok(_), None) => Suppressed::NoSession,
            (Ok(target), Some(from)) if &target == from => Suppressed::SelfLookup,
            (Ok(target), Some(_)) => {
                self.in_flight = Some(self.generation);
                return Ok(SearchTicket {
                    input: self.input.clone(),
                    generation: self.generation,
                    target,
                });
            }
        };

        self.result = None;
        Err(suppressed)
    }

    #[must_use]
    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation && ticket.input == self.input
    }

    /// Stores `result` if `ticket` is still current. Returns whether it was kept.
    pub fn complete(&mut self, ticket: &SearchTicket, result: SearchResult) -> bool {
        if !self.is_current(ticket) {
            debug!(target = %ticket.target, "discarding stale search response");
            return false;
        }
        self.in_flight = None;
        self.result = Some(result);
        true
    }

    /// Ends a failed lookup. The previous result stays as it was.
    pub fn fail(&mut self, ticket: &SearchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Sets `isFollowing` on the live result if it is for `address`.
    /// Returns the previous value.
    pub fn set_following(&mut self, address: &Address, is_following: bool) -> Option<bool> {
        let result = self.result.as_mut().filter(|r| r.address() == address)?;
        let prior = result.follow_status.is_following;
        result.follow_status.is_following = is_following;
        Some(prior)
    }

    /// Drops the result and orphans any in-flight lookup.
    pub fn reset(&mut self) {
        self.input.clear();
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identity;

    fn addr(n: u8) -> Address {
        Address::parse(format!("0x{n:040x}")).unwrap()
    }

    fn result_for(n: u8, following: bool) -> SearchResult {
        SearchResult::new(Identity::new(addr(n)), following)
    }

    #[test]
    fn test_invalid_input_is_suppressed_and_clears() {
        let me = addr(1);
        let mut resolver = SearchResolver::new();
        let ticket = resolver.begin(Some(&me), addr(2).as_str()).unwrap();
        resolver.complete(&ticket, result_for(2, false));

        let err = resolver.begin(Some(&me), "0xnope").unwrap_err();
        assert!(matches!(err, Suppressed::InvalidAddress(_)));
        assert!(resolver.result().is_none());
        assert!(!resolver.is_searching());
        assert_eq!(resolver.input(), "0xnope");
    }

    #[test]
    fn test_self_lookup_and_missing_session_are_suppressed() {
        let me = addr(1);
        let mut resolver = SearchResolver::new();
        assert_eq!(
            resolver.begin(Some(&me), &me.to_string().to_uppercase().replace("0X", "0x")),
            Err(Suppressed::SelfLookup)
        );
        assert_eq!(
            resolver.begin(None, addr(2).as_str()),
            Err(Suppressed::NoSession)
        );
    }

    #[test]
    fn test_newer_ticket_wins_regardless_of_arrival_order() {
        let me = addr(1);
        let mut resolver = SearchResolver::new();
        let first = resolver.begin(Some(&me), addr(2).as_str()).unwrap();
        let second = resolver.begin(Some(&me), addr(3).as_str()).unwrap();

        assert!(resolver.complete(&second, result_for(3, true)));
        assert!(!resolver.complete(&first, result_for(2, false)));
        assert_eq!(resolver.result().unwrap().address(), &addr(3));
        assert!(!resolver.is_searching());
    }

    #[test]
    fn test_retyping_same_input_still_supersedes() {
        let me = addr(1);
        let mut resolver = SearchResolver::new();
        let first = resolver.begin(Some(&me), addr(2).as_str()).unwrap();
        let second = resolver.begin(Some(&me), addr(2).as_str()).unwrap();
        assert!(!resolver.is_current(&first));
        assert!(resolver.is_current(&second));
    }

    #[test]
    fn test_failed_lookup_keeps_previous_result() {
        let me = addr(1);
        let mut resolver = SearchResolver::new();
        let ok = resolver.begin(Some(&me), addr(2).as_str()).unwrap();
        resolver.complete(&ok, result_for(2, false));

        let failing = resolver.begin(Some(&me), addr(2).as_str()).unwrap();
        assert!(resolver.is_searching());
        assert!(resolver.fail(&failing));
        assert!(!resolver.is_searching());
        assert_eq!(resolver.result().unwrap().address(), &addr(2));
    }

    #[test]
    fn test_set_following_only_touches_matching_result() {
        let me = addr(1);
        let mut resolver = SearchResolver::new();
        let ticket = resolver.begin(Some(&me), addr(2).as_str()).unwrap();
        resolver.complete(&ticket, result_for(2, false));

        assert_eq!(resolver.set_following(&addr(3), true), None);
        assert_eq!(resolver.set_following(&addr(2), true), Some(false));
        assert!(resolver.result().unwrap().is_following());
    }

    #[test]
    fn test_reset_orphans_in_flight_ticket() {
        let me = addr(1);
        let mut resolver = SearchResolver::new();
        let ticket = resolver.begin(Some(&me), addr(2).as_str()).unwrap();
        resolver.reset();
        assert!(!resolver.complete(&ticket, result_for(2, false)));
        assert!(resolver.result().is_none());
    }
}
