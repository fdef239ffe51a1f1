use std::sync::Mutex;

/// Counters recorded on the sweep cadence and read by the status display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepCounters {
    /// Sweeps whose poll returned a decodable document.
    pub sweeps: usize,
    /// Contacts in range on the most recent such sweep.
    pub contacts: usize,
    /// Failed polls (transport, decode or upstream status).
    pub errors: usize,
}

pub struct SweepMetrics {
    inner: Mutex<SweepCounters>,
}

impl SweepMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SweepCounters::default()),
        }
    }

    pub fn record_sweep(&self, contacts: usize) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.sweeps += 1;
            counters.contacts = contacts;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.errors += 1;
        }
    }

    pub fn snapshot(&self) -> SweepCounters {
        self.inner.lock().map(|counters| *counters).unwrap_or_default()
    }
}

impl Default for SweepMetrics {
    fn default() -> Self {
        Self::new()
    }
}
