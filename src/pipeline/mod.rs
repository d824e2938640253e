pub mod config;
pub mod runner;

pub use config::MediationConfig;
pub use runner::Dispatcher;
