//! Status transition tables and the transition applier
//!
//! A [`TransitionTable`] is plain data: for every status it lists the statuses
//! reachable in one step. Domains ship a default table in code and the
//! workflow configuration may replace it (see [`crate::config`]).
//!
//! The applier never trusts its caller. Even when the UI only offers valid
//! targets, [`apply_transition`] re-checks the table before producing a new
//! record value.

use crate::core::error::{ConfigError, TransitionError};
use crate::core::record::Record;
use crate::core::status::Status;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeSet, HashMap};

/// Per-domain mapping from a status to the statuses reachable in one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable<S: Status> {
    edges: HashMap<S, BTreeSet<S>>,
}

impl<S: Status> TransitionTable<S> {
    /// Create a table where every status is terminal
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    /// Allow `from -> to` for every `to` in `targets`
    pub fn allow(mut self, from: S, targets: impl IntoIterator<Item = S>) -> Self {
        self.edges.entry(from).or_default().extend(targets);
        self
    }

    /// Build a table from string-keyed configuration data
    ///
    /// Every key and target must be a member of the status enum.
    pub fn from_config(
        resource: &str,
        transitions: &HashMap<String, Vec<String>>,
    ) -> Result<Self, ConfigError> {
        let parse = |value: &str| {
            S::parse(value).ok_or_else(|| ConfigError::UnknownStatus {
                resource: resource.to_string(),
                status: value.to_string(),
            })
        };

        let mut table = Self::new();
        for (from, targets) in transitions {
            let from = parse(from)?;
            let targets = targets
                .iter()
                .map(|t| parse(t))
                .collect::<Result<Vec<_>, _>>()?;
            table = table.allow(from, targets);
        }
        Ok(table)
    }

    /// Whether `to` is reachable from `from` in one step
    pub fn is_allowed(&self, from: S, to: S) -> bool {
        self.edges.get(&from).is_some_and(|targets| targets.contains(&to))
    }

    /// Statuses reachable from `from`, in enum declaration order
    pub fn allowed_from(&self, from: S) -> Vec<S> {
        self.edges
            .get(&from)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// A status with no outbound transitions
    pub fn is_terminal(&self, status: S) -> bool {
        self.edges.get(&status).is_none_or(|targets| targets.is_empty())
    }

    /// Fail if any of `terminal` has an outbound edge
    pub fn ensure_terminal(&self, resource: &str, terminal: &[S]) -> Result<(), ConfigError> {
        match terminal.iter().find(|s| !self.is_terminal(**s)) {
            Some(status) => Err(ConfigError::TerminalStatus {
                resource: resource.to_string(),
                status: status.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// String-keyed form, the inverse of [`TransitionTable::from_config`]
    pub fn to_config(&self) -> HashMap<String, Vec<String>> {
        self.edges
            .iter()
            .map(|(from, targets)| {
                (
                    from.as_str().to_string(),
                    targets.iter().map(|t| t.as_str().to_string()).collect(),
                )
            })
            .collect()
    }
}

impl<S: Status> Default for TransitionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A record domain with a built-in status workflow
pub trait Workflow: Record {
    /// Transition table used when configuration does not override it
    fn default_transitions() -> TransitionTable<Self::Status>;

    /// Statuses that never have outbound transitions, whatever the
    /// configuration says
    fn terminal_statuses() -> &'static [Self::Status] {
        &[]
    }
}

/// Validate and apply a status change, stamping `updated_at` with now
pub fn apply_transition<R: Record>(
    record: &R,
    new_status: R::Status,
    table: &TransitionTable<R::Status>,
) -> Result<R, TransitionError> {
    apply_transition_at(record, new_status, table, Utc::now())
}

/// Validate and apply a status change at an explicit instant.
///
/// The resulting `updated_at` is always strictly greater than the input's:
/// if `now` does not move past it, the previous value plus one microsecond
/// is used instead.
pub fn apply_transition_at<R: Record>(
    record: &R,
    new_status: R::Status,
    table: &TransitionTable<R::Status>,
    now: DateTime<Utc>,
) -> Result<R, TransitionError> {
    let current = record.status();
    if !table.is_allowed(current, new_status) {
        return Err(TransitionError::Invalid {
            from: current.as_str().to_string(),
            to: new_status.as_str().to_string(),
            allowed: table
                .allowed_from(current)
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        });
    }

    let previous = record.updated_at();
    let updated_at = if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    };

    Ok(record.with_status(new_status, updated_at))
}

/// Parse a wire status for `R`, mapping failures to [`TransitionError::UnknownStatus`]
pub fn parse_status<R: Record>(value: &str) -> Result<R::Status, TransitionError> {
    R::Status::parse(value).ok_or_else(|| TransitionError::UnknownStatus {
        resource: R::resource_name().to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::status_enum!(
        TicketStatus,
        "ticket status",
        {
            Open => ("open", "Open", "circle", Default),
            Closed => ("closed", "Closed", "check", Success),
            Archived => ("archived", "Archived", "archive", Secondary),
        }
    );

    crate::impl_record!(
        Ticket,
        "ticket",
        "tickets",
        TicketStatus,
        search: [title],
        {
            title: String,
        }
    );

    fn table() -> TransitionTable<TicketStatus> {
        TransitionTable::new()
            .allow(TicketStatus::Open, [TicketStatus::Closed])
            .allow(TicketStatus::Closed, [TicketStatus::Open, TicketStatus::Archived])
    }

    #[test]
    fn test_allowed_from_is_ordered() {
        assert_eq!(
            table().allowed_from(TicketStatus::Closed),
            vec![TicketStatus::Open, TicketStatus::Archived]
        );
        assert!(table().allowed_from(TicketStatus::Archived).is_empty());
        assert!(table().is_terminal(TicketStatus::Archived));
        assert!(!table().is_terminal(TicketStatus::Open));
    }

    #[test]
    fn test_apply_valid_transition() {
        let ticket = Ticket::new("t-1", TicketStatus::Open, "Broken login".to_string());
        let closed = apply_transition(&ticket, TicketStatus::Closed, &table()).unwrap();

        assert_eq!(closed.status, TicketStatus::Closed);
        assert_eq!(closed.id, ticket.id);
        assert_eq!(closed.title, ticket.title);
        assert_eq!(closed.created_at, ticket.created_at);
        assert!(closed.updated_at > ticket.updated_at);
        assert_eq!(ticket.status, TicketStatus::Open);
    }

    #[test]
    fn test_apply_invalid_transition() {
        let ticket = Ticket::new("t-1", TicketStatus::Open, "Broken login".to_string());
        let before = ticket.clone();

        let err = apply_transition(&ticket, TicketStatus::Archived, &table()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::Invalid {
                from: "open".to_string(),
                to: "archived".to_string(),
                allowed: vec!["closed".to_string()],
            }
        );
        assert_eq!(ticket, before);
    }

    #[test]
    fn test_updated_at_strictly_increases_with_stale_clock() {
        let ticket = Ticket::new("t-1", TicketStatus::Open, "Broken login".to_string());
        let earlier = ticket.updated_at - Duration::hours(1);

        let closed = apply_transition_at(&ticket, TicketStatus::Closed, &table(), earlier).unwrap();
        assert_eq!(closed.updated_at, ticket.updated_at + Duration::microseconds(1));
    }

    #[test]
    fn test_self_transition_requires_explicit_edge() {
        let ticket = Ticket::new("t-1", TicketStatus::Open, "Broken login".to_string());
        assert!(apply_transition(&ticket, TicketStatus::Open, &table()).is_err());
    }

    #[test]
    fn test_from_config_round_trips() {
        let config = table().to_config();
        let rebuilt = TransitionTable::<TicketStatus>::from_config("tickets", &config).unwrap();
        assert_eq!(rebuilt, table());
    }

    #[test]
    fn test_from_config_rejects_unknown_status() {
        let mut config = HashMap::new();
        config.insert("open".to_string(), vec!["resolved".to_string()]);

        let err = TransitionTable::<TicketStatus>::from_config("tickets", &config).unwrap_err();
        match err {
            ConfigError::UnknownStatus { resource, status } => {
                assert_eq!(resource, "tickets");
                assert_eq!(status, "resolved");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ensure_terminal() {
        assert!(table().ensure_terminal("tickets", &[TicketStatus::Archived]).is_ok());

        let err = table()
            .ensure_terminal("tickets", &[TicketStatus::Archived, TicketStatus::Closed])
            .unwrap_err();
        match err {
            ConfigError::TerminalStatus { resource, status } => {
                assert_eq!(resource, "tickets");
                assert_eq!(status, "closed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status::<Ticket>("closed"), Ok(TicketStatus::Closed));
        assert!(matches!(
            parse_status::<Ticket>("all"),
            Err(TransitionError::UnknownStatus { .. })
        ));
    }
}
