mod delegation;
mod snapshot;
mod token;
mod transfer;
mod vote;

pub use delegation::{
    resolve_delegatee, DelegationAction, DelegationEvent, DelegationState, WILDCARD_SPACE,
};
pub use snapshot::{Snapshot, SnapshotEntry};
pub use token::Token;
pub use transfer::{FlowEdge, TransactionFlow, TransferEvent};
pub use vote::VoteRecord;
