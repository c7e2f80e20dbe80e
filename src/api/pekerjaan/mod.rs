pub mod dto;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod query;
pub mod service;

// Re-export commonly used types
pub use handlers::pekerjaan_config;
pub use service::PekerjaanService;
