//! Response parsing for the relay-board protocol.
//!
//! A response is `+<HEADER>` optionally followed by `=<PAYLOAD>`. The header
//! must match the header of the request that produced it.

use crate::codec::{PAYLOAD_SEPARATOR, RESPONSE_PREFIX};
use crate::commands::{RelayAction, RelayLevel};
use crate::error::{CliError, CliResult};

/// Parsed response from the firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Header echoed by the firmware.
    pub header: String,
    /// Payload after the separator, empty if none was sent.
    pub payload: String,
}

impl Response {
    /// Parse a response line (terminator already stripped).
    ///
    /// Only the text between the first and second separator is kept as
    /// payload.
    pub fn parse(line: &str, expected_header: &str) -> CliResult<Response> {
        let echoed = line
            .strip_prefix(RESPONSE_PREFIX)
            .filter(|rest| rest.starts_with(expected_header))
            .ok_or_else(|| CliError::UnexpectedResponse {
                header: expected_header.to_string(),
                line: line.to_string(),
            })?;

        let payload = match echoed.split(PAYLOAD_SEPARATOR).nth(1) {
            Some(payload) => payload.to_string(),
            None => String::new(),
        };

        Ok(Response {
            header: expected_header.to_string(),
            payload,
        })
    }

    /// Check if the response carried a payload.
    pub fn has_payload(&self) -> bool {
        !self.payload.is_empty()
    }
}

/// Relay levels as reported by `GET` (or requested by a pattern).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayState {
    /// Relays reported open.
    pub open: Vec<u32>,
    /// Relays reported closed.
    pub close: Vec<u32>,
}

impl RelayState {
    /// Parse a `GET` payload, e.g. `1-O,2-C`.
    pub fn parse(payload: &str) -> CliResult<RelayState> {
        let mut state = RelayState::default();
        for entry in payload.split(',').filter(|e| !e.trim().is_empty()) {
            state.push(RelayAction::parse(entry)?);
        }
        Ok(state)
    }

    /// Record a relay at the given level.
    pub fn push(&mut self, action: RelayAction) {
        match action.level {
            RelayLevel::Open => self.open.push(action.relay),
            RelayLevel::Close => self.close.push(action.relay),
        }
    }

    /// Actions that drive the relays to this state, opens first.
    pub fn actions(&self) -> Vec<RelayAction> {
        self.open
            .iter()
            .map(|&r| RelayAction::open(r))
            .chain(self.close.iter().map(|&r| RelayAction::close(r)))
            .collect()
    }

    /// Check that every relay in `subset` has the same level here.
    pub fn contains_all(&self, subset: &RelayState) -> bool {
        subset.open.iter().all(|r| self.open.contains(r))
            && subset.close.iter().all(|r| self.close.contains(r))
    }

    /// Relays of `subset` that do not have the same level here.
    pub fn missing_from(&self, subset: &RelayState) -> Vec<RelayAction> {
        subset
            .actions()
            .into_iter()
            .filter(|a| match a.level {
                RelayLevel::Open => !self.open.contains(&a.relay),
                RelayLevel::Close => !self.close.contains(&a.relay),
            })
            .collect()
    }

    /// Check if no relays are listed.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.close.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_payload() {
        let response = Response::parse("+SERIAL=RB90FJ7SIHYU1F", "SERIAL").unwrap();
        assert_eq!(response.header, "SERIAL");
        assert_eq!(response.payload, "RB90FJ7SIHYU1F");
        assert!(response.has_payload());
    }

    #[test]
    fn test_parse_without_payload() {
        let response = Response::parse("+SET", "SET").unwrap();
        assert!(!response.has_payload());
    }

    #[test]
    fn test_parse_keeps_only_first_field() {
        let response = Response::parse("+HW=1.0=extra", "HW").unwrap();
        assert_eq!(response.payload, "1.0");
    }

    #[test]
    fn test_parse_rejects_wrong_header() {
        let err = Response::parse("+FW=1.0", "HW").unwrap_err();
        assert!(matches!(err, CliError::UnexpectedResponse { .. }));

        assert!(Response::parse("HW=1.0", "HW").is_err());
        assert!(Response::parse("", "HW").is_err());
    }

    #[test]
    fn test_parse_relay_state() {
        let state = RelayState::parse("1-O,2-C,3-C").unwrap();
        assert_eq!(state.open, vec![1]);
        assert_eq!(state.close, vec![2, 3]);

        assert!(RelayState::parse("").unwrap().is_empty());
        assert!(RelayState::parse("1-O,bogus").is_err());
    }

    #[test]
    fn test_contains_all() {
        let read_back = RelayState::parse("1-O,2-C,3-O").unwrap();
        let requested = RelayState {
            open: vec![3],
            close: vec![2],
        };
        assert!(read_back.contains_all(&requested));
        assert!(read_back.missing_from(&requested).is_empty());

        let requested = RelayState {
            open: vec![2],
            close: vec![],
        };
        assert!(!read_back.contains_all(&requested));
        assert_eq!(read_back.missing_from(&requested), vec![RelayAction::open(2)]);
    }

    #[test]
    fn test_actions_order() {
        let state = RelayState {
            open: vec![4],
            close: vec![1],
        };
        assert_eq!(
            state.actions(),
            vec![RelayAction::open(4), RelayAction::close(1)]
        );
    }
}
