//! Filesystem utilities for gitmeta.

pub mod atomic;

pub use atomic::atomic_write_file;
