use log::info;

/// Track progress of per-game detail ingestion
pub struct IngestProgress {
    total: usize,
    fetched: usize,
    cached: usize,
}

impl IngestProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            fetched: 0,
            cached: 0,
        }
    }

    pub fn mark_fetched(&mut self) {
        self.fetched += 1;
        self.log_progress();
    }

    pub fn mark_cached(&mut self) {
        self.cached += 1;
        self.log_progress();
    }

    pub fn current_count(&self) -> usize {
        self.fetched + self.cached
    }

    fn log_progress(&self) {
        let current = self.current_count();
        if is_milestone(current) || current == self.total {
            info!(
                "  → Details: {}/{} ({} fetched, {} from cache)",
                current, self.total, self.fetched, self.cached
            );
        }
    }
}

fn is_milestone(count: usize) -> bool {
    count % 10 == 0
}
