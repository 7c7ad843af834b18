//! Cumulative diagnostic log.
//!
//! Every stage returns the diagnostics it produced and the caller merges them,
//! so the log is an ordinary value rather than process-wide state. Entries are
//! only ever appended.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry and echo it to the log.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.entries.push(message);
    }

    /// Append every entry of `other`, preserving its order.
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_appends_in_order() {
        let mut a = Diagnostics::new();
        a.push("first");
        let mut b = Diagnostics::new();
        b.push("second");
        b.push("third");
        a.merge(b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["first", "second", "third"]);
        assert_eq!(a.len(), 3);
    }
}
