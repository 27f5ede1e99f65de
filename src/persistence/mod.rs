//! Snapshot and overlay persistence.

pub mod snapshot;
pub mod storage;

pub use snapshot::{
    load_snapshot, save_snapshot, LoadReport, ResidentRecord, SkippedRecord, WorldSnapshot,
    SNAPSHOT_VERSION,
};
pub use storage::{FileOverlayStorage, MemoryOverlayStorage, OverlayStorage};
