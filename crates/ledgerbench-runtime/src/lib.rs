pub mod aggregator;
pub mod driver;
pub mod job;
pub mod pool;
pub mod queue;
pub mod report;
pub mod worker;

pub use aggregator::*;
pub use driver::*;
pub use job::*;
pub use pool::*;
pub use queue::*;
pub use report::*;
pub use worker::*;
