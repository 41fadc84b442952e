// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded in-memory ring of the last N OutputEvents per session
//! (default 1,000).

use ar_core::OutputEvent;
use std::collections::VecDeque;

pub struct RingBuffer {
    capacity: usize,
    events: VecDeque<OutputEvent>,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity.min(256)),
        }
    }

    pub fn push(&mut self, event: OutputEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn snapshot(&self) -> Vec<OutputEvent> {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_core::{AgentId, OutputEventType, SessionId};

    fn ev(n: u64) -> OutputEvent {
        OutputEvent {
            session_id: SessionId::new("s1"),
            agent_id: AgentId::new("a1"),
            event_type: OutputEventType::Stdout,
            content: format!("line-{n}"),
            timestamp: "t".to_string(),
            line_number: n,
        }
    }

    #[test]
    fn evicts_oldest_when_over_capacity() {
        let mut ring = RingBuffer::new(3);
        for i in 1..=5 {
            ring.push(ev(i));
        }
        let nums: Vec<u64> = ring.snapshot().iter().map(|e| e.line_number).collect();
        assert_eq!(nums, vec![3, 4, 5]);
    }
}
