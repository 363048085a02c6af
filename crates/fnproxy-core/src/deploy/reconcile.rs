//! Idempotency decisions against previously persisted records.
//!
//! | module  | no record | live record | record without endpoint/key |
//! |---------|-----------|-------------|-----------------------------|
//! | http    | fresh     | skip        | resume trigger              |
//! | socks   | fresh     | skip        | resume trigger              |
//! | reverse | fresh     | fresh       | fresh                       |

use crate::records::{KeyedRecords, LiveRecord, ReverseHistory, ReverseRecord};

/// What to do for one (provider, region) given its current record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Already live; no provider call
    Skip,
    /// Function exists; only the trigger is (re)created
    Resume,
    /// Create function and trigger
    Fresh,
}

impl Decision {
    pub fn resume_trigger(&self) -> bool {
        matches!(self, Decision::Resume)
    }
}

/// A module's record set as seen by the dispatcher.
pub trait Reconciler {
    type Record;

    fn decide(&self, provider: &str, region: &str) -> Decision;

    /// Fold a successful deployment into the set.
    fn fold(&mut self, provider: &str, region: &str, record: Self::Record);
}

impl<R: LiveRecord> Reconciler for KeyedRecords<R> {
    type Record = R;

    fn decide(&self, provider: &str, region: &str) -> Decision {
        match self.get(provider, region) {
            None => Decision::Fresh,
            Some(record) if record.is_live() => Decision::Skip,
            Some(_) => Decision::Resume,
        }
    }

    fn fold(&mut self, provider: &str, region: &str, record: R) {
        self.set(provider, region, record);
    }
}

impl Reconciler for ReverseHistory {
    type Record = ReverseRecord;

    fn decide(&self, _provider: &str, _region: &str) -> Decision {
        Decision::Fresh
    }

    fn fold(&mut self, _provider: &str, _region: &str, record: ReverseRecord) {
        self.add(record);
    }
}
