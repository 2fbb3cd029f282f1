use crate::models::job::{JobDetails, JobRecord};

/// Run-scoped record accumulator.
///
/// Records are append-only and kept in acceptance order. Ids start at 1 and
/// are consumed only when a record is accepted, so they never have gaps.
#[derive(Debug)]
pub struct CrawlSession {
    records: Vec<JobRecord>,
    next_id: u32,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Assign the next id to `details` and append the record.
    pub fn accept(&mut self, details: JobDetails) -> &JobRecord {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(JobRecord { id, details });
        &self.records[self.records.len() - 1]
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for CrawlSession {
    fn default() -> Self {
        Self::new()
    }
}
