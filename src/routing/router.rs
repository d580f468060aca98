//! Route lookup.
//!
//! # Responsibilities
//! - Store the ordered routing rules
//! - Decide which upstream service a path belongs to
//! - Return the matched service or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins; `v1/` is checked before the BFF fragments, so a path
//!   carrying both always goes to the query service
//! - Explicit NoMatch rather than silent default

use std::fmt;

use crate::routing::matcher::{AnyMatcher, ContainsMatcher, Matcher};

/// One of the two upstream services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Query service, addressed via `v1/` paths.
    Query,
    /// Backend-for-frontend.
    Bff,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Query => "query",
            Service::Bff => "bff",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of routing a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Matched(Service),
    NoMatch,
}

#[derive(Debug)]
struct Rule {
    matcher: Box<dyn Matcher>,
    service: Service,
}

/// Ordered path rules mapping requests onto upstream services.
#[derive(Debug)]
pub struct Router {
    rules: Vec<Rule>,
}

impl Router {
    /// Build the gateway's routing table.
    pub fn new() -> Self {
        let rules = vec![
            Rule {
                matcher: Box::new(ContainsMatcher::new("v1/")),
                service: Service::Query,
            },
            Rule {
                matcher: Box::new(AnyMatcher::new(vec![
                    Box::new(ContainsMatcher::new("categories")),
                    Box::new(ContainsMatcher::new("data/")),
                ])),
                service: Service::Bff,
            },
        ];

        tracing::debug!(rules = rules.len(), "Router compiled");
        Self { rules }
    }

    /// Select the upstream for a path. The first matching rule wins.
    pub fn select_target(&self, path: &str) -> RouteDecision {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| RouteDecision::Matched(rule.service))
            .unwrap_or(RouteDecision::NoMatch)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
