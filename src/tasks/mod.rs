//! Concrete metadata tasks.
//!
//! Property tasks (`commit`, `branch`, `describe`) publish values into the
//! [`crate::properties::PropertyStore`]; the `summary` task writes a
//! human-readable report to the output sink.

mod branch;
mod commit;
mod describe;
mod summary;


pub use branch::BranchTask;
pub use commit::CommitTask;
pub use describe::DescribeTask;
pub use summary::SummaryTask;
