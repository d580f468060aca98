//! Path matching logic.
//!
//! # Responsibilities
//! - Match a raw request path by substring containment (case-sensitive)
//! - Combine conditions with OR semantics
//!
//! # Design Decisions
//! - Paths are matched exactly as received: no decoding, no slash trimming
//! - No regex to guarantee O(n) matching

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches when the path contains a fixed fragment anywhere.
#[derive(Debug, Clone)]
pub struct ContainsMatcher {
    fragment: String,
}

impl ContainsMatcher {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }
}

impl Matcher for ContainsMatcher {
    fn matches(&self, path: &str) -> bool {
        path.contains(self.fragment.as_str())
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}
