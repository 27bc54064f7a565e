// Library root: the player dataset pipeline and the read-only views the
// dashboard pages are built from.

pub mod analysis;
pub mod config;
pub mod context;
pub mod dataset;
pub mod format;
pub mod photo;
