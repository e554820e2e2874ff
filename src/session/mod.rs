pub mod plugin;
pub mod session;
