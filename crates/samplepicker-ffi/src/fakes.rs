//! In-memory host doubles shared by the unit tests.

use crate::host::{HostContentResolver, HostContentStream};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A Kotlin `InputStream` over a byte buffer.
pub struct MemoryStream {
    data: Vec<u8>,
    position: Mutex<usize>,
    fail: AtomicBool,
    closed: AtomicBool,
    reads: AtomicUsize,
    largest_read: AtomicUsize,
}

impl MemoryStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            position: Mutex::new(0),
            fail: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            largest_read: AtomicUsize::new(0),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn largest_read(&self) -> usize {
        self.largest_read.load(Ordering::SeqCst)
    }
}

impl HostContentStream for MemoryStream {
    fn read(&self, max_len: u32) -> Option<Vec<u8>> {
        assert!(!self.is_closed(), "read after close");
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.largest_read
            .fetch_max(max_len as usize, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return None;
        }

        let mut position = self.position.lock().unwrap();
        let end = (*position + max_len as usize).min(self.data.len());
        let chunk = self.data[*position..end].to_vec();
        *position = end;
        Some(chunk)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// A ContentResolver over a fixed set of URIs. Remembers every stream it opened.
#[derive(Default)]
pub struct MemoryResolver {
    content: HashMap<String, Vec<u8>>,
    fail_reads: AtomicBool,
    opened: Mutex<Vec<Arc<MemoryStream>>>,
}

impl MemoryResolver {
    pub fn with(content: &[(&str, &[u8])]) -> Arc<Self> {
        Arc::new(Self {
            content: content
                .iter()
                .map(|(uri, bytes)| (uri.to_string(), bytes.to_vec()))
                .collect(),
            ..Self::default()
        })
    }

    /// Streams opened from now on fail on their first read.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn opened(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn all_closed(&self) -> bool {
        self.opened.lock().unwrap().iter().all(|s| s.is_closed())
    }
}

impl HostContentResolver for MemoryResolver {
    fn open(&self, uri: String) -> Option<Arc<dyn HostContentStream>> {
        let stream = Arc::new(MemoryStream::new(self.content.get(&uri)?.clone()));
        stream
            .fail
            .store(self.fail_reads.load(Ordering::SeqCst), Ordering::SeqCst);
        self.opened.lock().unwrap().push(stream.clone());
        Some(stream)
    }
}
