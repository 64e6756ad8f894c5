//! Database access: connection setup and the item repository

pub mod init;
pub mod items;

pub use init::*;
pub use items::*;
