//! Unit tests mirroring the `src` tree

pub mod engine;
pub mod io;
pub mod oracle;
