//! Request sequencing for last-issued-wins responses
//!
//! Each async request carries the [`RequestToken`] it was issued with. When
//! the response arrives, it is applied only if no newer request was issued
//! on the same sequence in the meantime.

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues tokens and remembers the latest one.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    last: u64,
    in_flight: bool,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&mut self) -> RequestToken {
        self.last += 1;
        self.in_flight = true;
        RequestToken(self.last)
    }

    /// Whether `token` is the latest issued token.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.last
    }

    /// Accept a response: returns true and marks the request done when
    /// `token` is current; stale tokens are rejected.
    pub fn complete(&mut self, token: RequestToken) -> bool {
        if self.is_current(token) && self.in_flight {
            self.in_flight = false;
            true
        } else {
            false
        }
    }

    /// Drop whatever is in flight; its response will be ignored.
    pub fn cancel(&mut self) {
        self.last += 1;
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_token_wins() {
        let mut seq = RequestSequence::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(!seq.complete(first));
        assert!(seq.is_in_flight());
        assert!(seq.complete(second));
        assert!(!seq.is_in_flight());
    }

    #[test]
    fn test_response_accepted_once() {
        let mut seq = RequestSequence::new();
        let token = seq.issue();
        assert!(seq.complete(token));
        assert!(!seq.complete(token));
    }

    #[test]
    fn test_cancel_invalidates_in_flight() {
        let mut seq = RequestSequence::new();
        let token = seq.issue();
        seq.cancel();
        assert!(!seq.complete(token));
        assert!(!seq.is_in_flight());
    }

    #[test]
    fn test_out_of_order_arrival() {
        let mut seq = RequestSequence::new();
        let tokens: Vec<_> = (0..5).map(|_| seq.issue()).collect();
        // Responses arrive newest first; only the newest applies
        let applied: Vec<bool> = tokens.iter().rev().map(|t| seq.complete(*t)).collect();
        assert_eq!(applied, [true, false, false, false, false]);
    }
}
