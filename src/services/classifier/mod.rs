//! Participant classification.
//!
//! Derives whale / non-whale membership from a holding snapshot, applies
//! delegation transfers for non-voting delegators, and summarizes voter
//! participation per class.

mod error;
mod service;

pub use error::ClassifierError;
pub use service::{
    standardized_hhi, Classification, DelegationRecord, ParticipantClassifier,
    ParticipationSummary,
};
