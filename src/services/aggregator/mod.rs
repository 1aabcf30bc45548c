//! Router-flow aggregation.
//!
//! Within one transaction, multiple transfer edges mean an intermediary
//! (typically a DEX router or aggregator contract) passed value through
//! itself. Replaying those edges verbatim would make the intermediary look
//! like a holder that gained and lost balance inside a single transaction,
//! so the aggregator collapses each multi-edge transaction into net
//! source → sink flows that conserve total value.

mod error;
mod router;

pub use error::AggregatorError;
pub use router::{RouterFlowAggregator, FLOW_TOLERANCE};
