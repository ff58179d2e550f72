use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Process-wide counters for monitoring.
#[derive(Clone)]
pub struct Metrics {
    pub characters_created: Arc<AtomicU64>,
    pub characters_updated: Arc<AtomicU64>,
    pub characters_deleted: Arc<AtomicU64>,
    pub uploads_stored: Arc<AtomicU64>,
    pub uploads_rejected: Arc<AtomicU64>,
    pub uploads_deleted: Arc<AtomicU64>,
    pub upload_bytes: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            characters_created: Arc::new(AtomicU64::new(0)),
            characters_updated: Arc::new(AtomicU64::new(0)),
            characters_deleted: Arc::new(AtomicU64::new(0)),
            uploads_stored: Arc::new(AtomicU64::new(0)),
            uploads_rejected: Arc::new(AtomicU64::new(0)),
            uploads_deleted: Arc::new(AtomicU64::new(0)),
            upload_bytes: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_created(&self) {
        self.characters_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_updated(&self) {
        self.characters_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_deleted(&self) {
        self.characters_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upload(&self, bytes: u64) {
        self.uploads_stored.fetch_add(1, Ordering::Relaxed);
        self.upload_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn inc_upload_rejected(&self) {
        self.uploads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_upload_deleted(&self) {
        self.uploads_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            characters_created: self.characters_created.load(Ordering::Relaxed),
            characters_updated: self.characters_updated.load(Ordering::Relaxed),
            characters_deleted: self.characters_deleted.load(Ordering::Relaxed),
            uploads_stored: self.uploads_stored.load(Ordering::Relaxed),
            uploads_rejected: self.uploads_rejected.load(Ordering::Relaxed),
            uploads_deleted: self.uploads_deleted.load(Ordering::Relaxed),
            upload_bytes: self.upload_bytes.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub characters_created: u64,
    pub characters_updated: u64,
    pub characters_deleted: u64,
    pub uploads_stored: u64,
    pub uploads_rejected: u64,
    pub uploads_deleted: u64,
    pub upload_bytes: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Prometheus text exposition format (version 0.0.4).
    pub fn to_prometheus(&self) -> String {
        let counters: [(&str, &str, u64); 7] = [
            ("characters_created", "Characters created", self.characters_created),
            ("characters_updated", "Characters updated", self.characters_updated),
            ("characters_deleted", "Characters deleted", self.characters_deleted),
            ("uploads_stored", "Images stored", self.uploads_stored),
            ("uploads_rejected", "Image uploads rejected", self.uploads_rejected),
            ("uploads_deleted", "Images deleted", self.uploads_deleted),
            ("upload_bytes", "Bytes of stored images", self.upload_bytes),
        ];
        let mut out = String::new();
        for (name, help, value) in counters {
            out.push_str(&format!(
                "# HELP heroes_{name} {help}\n# TYPE heroes_{name} counter\nheroes_{name} {value}\n"
            ));
        }
        out.push_str(&format!(
            "# HELP heroes_uptime_seconds Uptime seconds\n# TYPE heroes_uptime_seconds gauge\nheroes_uptime_seconds {}\n",
            self.uptime_seconds
        ));
        out
    }
}
