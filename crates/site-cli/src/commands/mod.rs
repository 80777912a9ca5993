pub mod cleanup;
pub mod serve;

pub use cleanup::CleanupCommand;
pub use serve::ServeCommand;
