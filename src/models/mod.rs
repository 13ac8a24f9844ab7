pub mod scan;
pub mod stats;
pub mod violation;
pub mod user;

pub use scan::*;
pub use stats::ScanStats;
pub use violation::*;
pub use user::*;
