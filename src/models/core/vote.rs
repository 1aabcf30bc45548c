use serde::{Deserialize, Serialize};

/// One cast vote on a proposal, as loaded from the vote table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VoteRecord {
    pub voter: String,
    pub choice: String,
    pub vp: f64,
}
