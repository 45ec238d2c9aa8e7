//! 日志环形缓冲区
//!
//! 读写索引单调递增，槽位为 `index % LOG_BUFFER_CAPACITY`。
//! 缓冲区满时覆盖最旧条目并计入丢弃数。

use sync::{RawSpinLock, SpinLock};

use crate::config::LOG_BUFFER_CAPACITY;
use crate::entry::LogEntry;

struct Ring {
    entries: [LogEntry; LOG_BUFFER_CAPACITY],
    reader: usize,
    writer: usize,
    dropped: usize,
}

/// 固定容量的日志缓冲区
pub(crate) struct LogBuffer {
    ring: SpinLock<Ring>,
}

impl LogBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            ring: SpinLock::const_new(
                RawSpinLock::new(),
                Ring {
                    entries: [LogEntry::empty(); LOG_BUFFER_CAPACITY],
                    reader: 0,
                    writer: 0,
                    dropped: 0,
                },
            ),
        }
    }

    pub(crate) fn write(&self, entry: &LogEntry) {
        let mut ring = self.ring.lock();
        if ring.writer - ring.reader == LOG_BUFFER_CAPACITY {
            ring.reader += 1;
            ring.dropped += 1;
        }
        let slot = ring.writer % LOG_BUFFER_CAPACITY;
        ring.entries[slot] = *entry;
        ring.writer += 1;
    }

    pub(crate) fn read(&self) -> Option<LogEntry> {
        let mut ring = self.ring.lock();
        if ring.reader == ring.writer {
            return None;
        }
        let entry = ring.entries[ring.reader % LOG_BUFFER_CAPACITY];
        ring.reader += 1;
        Some(entry)
    }

    pub(crate) fn peek(&self, index: usize) -> Option<LogEntry> {
        let ring = self.ring.lock();
        if index < ring.reader || index >= ring.writer {
            return None;
        }
        Some(ring.entries[index % LOG_BUFFER_CAPACITY])
    }

    pub(crate) fn reader_index(&self) -> usize {
        self.ring.lock().reader
    }

    pub(crate) fn writer_index(&self) -> usize {
        self.ring.lock().writer
    }

    pub(crate) fn len(&self) -> usize {
        let ring = self.ring.lock();
        ring.writer - ring.reader
    }

    pub(crate) fn dropped_count(&self) -> usize {
        self.ring.lock().dropped
    }
}
