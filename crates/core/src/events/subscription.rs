// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event name patterns and subscriptions

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`: exactly one segment
    One,
    /// `**`: the rest of the name
    Rest,
}

/// Colon-separated pattern over event names, e.g. `ledger:*` or `flush:**`.
///
/// A bare `*` or `**` matches every event. The empty pattern matches none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl EventPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = match pattern {
            "" => Vec::new(),
            "*" | "**" => vec![Segment::Rest],
            _ => pattern
                .split(':')
                .map(|part| match part {
                    "*" => Segment::One,
                    "**" => Segment::Rest,
                    literal => Segment::Literal(literal.to_string()),
                })
                .collect(),
        };
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn matches(&self, event_name: &str) -> bool {
        if self.segments.is_empty() {
            return false;
        }

        let mut parts = event_name.split(':');
        for segment in &self.segments {
            let part = match segment {
                Segment::Rest => return true,
                Segment::One => parts.next(),
                Segment::Literal(literal) => parts.next().filter(|p| p == literal),
            };
            if part.is_none() {
                return false;
            }
        }
        parts.next().is_none()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Subscriber handle for unsubscribing
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

/// Named observer interested in one or more patterns
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub patterns: Vec<EventPattern>,
}

impl Subscription {
    pub fn new(id: impl Into<String>, patterns: Vec<EventPattern>) -> Self {
        Self {
            id: SubscriberId(id.into()),
            patterns,
        }
    }

    /// Subscribe to a list of pattern strings
    pub fn to(id: impl Into<String>, patterns: &[&str]) -> Self {
        Self::new(id, patterns.iter().map(|p| EventPattern::new(p)).collect())
    }

    pub fn matches(&self, event_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(event_name))
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
