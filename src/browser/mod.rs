pub mod executable;
pub mod node;
pub mod runner;
pub mod session;

pub use executable::resolve_executable;
pub use node::NodeLauncher;
pub use session::{BrowserLauncher, BrowserSession, SessionGuard};
