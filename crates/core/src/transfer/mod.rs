//! Moves job artifacts between remote storage and the working directory.

mod artifacts;
mod layout;

pub use artifacts::{ArtifactTransfer, TransferSummary};
pub use layout::StorageLayout;
