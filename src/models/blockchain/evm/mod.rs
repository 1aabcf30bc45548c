mod log;

pub use log::{DelegationArgs, RawDelegationLog, RawTransferLog, TransferArgs};
