//! Constants for the application

/// Default directory holding per-token JSON configuration files.
pub const DEFAULT_CONFIG_DIR: &str = "config/tokens";

/// Default root of the raw fetched data tree (transfer shards, labels,
/// delegation dumps, vote tables).
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default root of the processed output tree (normalized transfers, holding
/// snapshots, delegation snapshots).
pub const DEFAULT_OUT_DIR: &str = "out";

/// A wallet holding at least this fraction of the filtered snapshot supply
/// is classified as a whale.
pub const WHALE_THRESHOLD: f64 = 0.05;
