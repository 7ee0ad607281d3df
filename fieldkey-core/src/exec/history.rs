//! Append-only audit log of executed tool calls.

use std::collections::VecDeque;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::{Arguments, Source};

/// One executed call. Failed calls carry an `{"error": ...}` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub arguments: Arguments,
    pub result: Value,
    /// Local time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub source: Source,
    pub latency_ms: f64,
}

/// Read view returned by [`HistoryLog::query`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    #[serde(rename = "history")]
    pub entries: Vec<HistoryEntry>,
    pub count: usize,
}

/// History with optional retention. When full, the oldest entry is evicted.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: Option<usize>,
}

impl HistoryLog {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` entries. `0` means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            capacity: (capacity > 0).then_some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub(crate) fn append(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write();
        if let Some(cap) = self.capacity {
            while entries.len() >= cap {
                entries.pop_front();
            }
        }
        entries.push_back(entry);
    }

    /// Entries in append order, optionally only those for `tool`.
    pub fn query(&self, tool: Option<&str>) -> HistoryPage {
        let entries: Vec<HistoryEntry> = self
            .entries
            .read()
            .iter()
            .filter(|e| tool.map_or(true, |t| e.name == t))
            .cloned()
            .collect();
        HistoryPage {
            count: entries.len(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: &str) -> HistoryEntry {
        HistoryEntry {
            name: name.into(),
            arguments: Arguments::new(),
            result: json!({}),
            timestamp: "2024-01-01 00:00:00".into(),
            source: Source::OnDevice,
            latency_ms: 1.0,
        }
    }

    #[test]
    fn filters_by_tool() {
        let log = HistoryLog::unbounded();
        log.append(entry("lookup_part"));
        log.append(entry("contact_dispatch"));
        log.append(entry("lookup_part"));

        let page = log.query(Some("lookup_part"));
        assert_eq!(page.count, 2);
        assert!(page.entries.iter().all(|e| e.name == "lookup_part"));
        assert_eq!(log.query(None).count, 3);
        assert_eq!(log.query(Some("nope")).count, 0);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let log = HistoryLog::with_capacity(2);
        for name in ["a", "b", "c"] {
            log.append(entry(name));
        }
        let names: Vec<_> = log.query(None).entries.into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!(HistoryLog::with_capacity(0).capacity(), None);
    }

    #[test]
    fn page_serializes_as_history_and_count() {
        let log = HistoryLog::unbounded();
        log.append(entry("a"));
        let v = serde_json::to_value(log.query(None)).unwrap();
        assert_eq!(v["count"], 1);
        assert_eq!(v["history"][0]["source"], "on-device");
    }
}
