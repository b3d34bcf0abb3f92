use std::collections::VecDeque;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Keeps only the most recent `capacity` lines, oldest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MessageLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn latest(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_four_most_recent() {
        let mut log = MessageLog::new(4);
        for i in 0..6 {
            log.push(format!("line {i}"));
        }
        assert_eq!(log.len(), 4);
        assert_eq!(
            log.iter().collect::<Vec<_>>(),
            ["line 2", "line 3", "line 4", "line 5"]
        );
        assert_eq!(log.latest(), Some("line 5"));
    }

    #[test]
    fn zero_capacity_still_holds_one_line() {
        let mut log = MessageLog::new(0);
        log.push("a");
        log.push("b");
        assert_eq!(log.iter().collect::<Vec<_>>(), ["b"]);
        log.clear();
        assert!(log.is_empty());
    }
}
