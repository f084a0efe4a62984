// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory store of job status records.

use chrono::Utc;
use dashmap::DashMap;
use nimbuscommon::{JobStatus, JobStatusId, JobStatusRecord};
use tracing::warn;

/// Concurrent map of all job status records known to this server.
///
/// Records move only forward through their lifecycle; an update against a
/// terminal record is dropped. Records are never deleted.
#[derive(Default)]
pub struct JobStatusStore {
    records: DashMap<JobStatusId, JobStatusRecord>,
}

impl JobStatusStore {
    pub fn insert(&self, record: JobStatusRecord) {
        self.records.insert(record.job_status_id, record);
    }

    /// Snapshot of a record, if known.
    pub fn get(&self, id: JobStatusId) -> Option<JobStatusRecord> {
        self.records.get(&id).map(|record| record.value().clone())
    }

    /// Applies a forward transition, stamping the matching timestamp and, on
    /// a terminal transition, the message. Disallowed transitions are
    /// dropped.
    pub fn transition(&self, id: JobStatusId, next: JobStatus, message: Option<String>) {
        let Some(mut record) = self.records.get_mut(&id) else {
            warn!(%id, "transition for unknown job status record");
            return;
        };
        if !record.status.can_transition_to(next) {
            warn!(
                %id,
                current = %record.status,
                %next,
                "dropping disallowed job status transition"
            );
            return;
        }
        record.status = next;
        if next == JobStatus::Running {
            record.started_at = Some(Utc::now());
        }
        if next.is_terminal() {
            record.finished_at = Some(Utc::now());
            record.message = message;
        }
    }

    /// Names of jobs with a record currently mid-execution, deduplicated.
    pub fn running_job_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .records
            .iter()
            .filter(|record| record.status == JobStatus::Running)
            .map(|record| record.job_name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use nimbuscommon::Params;

    use super::*;

    fn queued_record() -> JobStatusRecord {
        JobStatusRecord::queued("TestJob", Params::new())
    }

    #[test]
    fn forward_transitions_apply() {
        let store = JobStatusStore::default();
        let record = queued_record();
        let id = record.job_status_id;
        store.insert(record);

        store.transition(id, JobStatus::Running, None);
        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Running);
        assert!(record.started_at.is_some());
        assert!(record.finished_at.is_none());

        store.transition(id, JobStatus::Succeeded, Some("done".to_owned()));
        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Succeeded);
        assert_eq!(record.message.as_deref(), Some("done"));
        assert!(record.finished_at.is_some());
    }

    #[test]
    fn terminal_records_do_not_regress() {
        let store = JobStatusStore::default();
        let record = queued_record();
        let id = record.job_status_id;
        store.insert(record);

        store.transition(id, JobStatus::Failed, Some("boom".to_owned()));
        store.transition(id, JobStatus::Running, None);
        store.transition(id, JobStatus::Succeeded, None);

        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.message.as_deref(), Some("boom"));
    }

    #[test]
    fn running_names_are_deduplicated() {
        let store = JobStatusStore::default();
        for _ in 0..2 {
            let record = queued_record();
            let id = record.job_status_id;
            store.insert(record);
            store.transition(id, JobStatus::Running, None);
        }
        assert_eq!(store.running_job_names(), vec!["TestJob".to_owned()]);

        let record = queued_record();
        store.insert(record);
        // still queued, not mid-execution
        assert_eq!(store.running_job_names(), vec!["TestJob".to_owned()]);
    }

    #[test]
    fn unknown_record_lookup_is_none() {
        let store = JobStatusStore::default();
        assert!(store.get(JobStatusId::random()).is_none());
    }
}
