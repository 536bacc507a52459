pub mod connect;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod profile;
pub mod transaction;

pub use connect::*;
pub use error::*;
pub use gateway::*;
pub use identity::*;
pub use profile::*;
pub use transaction::*;
