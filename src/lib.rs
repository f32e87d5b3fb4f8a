pub mod audio;
pub mod config;
pub mod hands;
pub mod pipeline;
pub mod recorder;
pub mod rng;
pub mod services;
pub mod session;
pub mod state;

// Re-export the lifecycle entry point for convenient access
pub use session::SessionController;
