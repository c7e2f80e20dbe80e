pub mod auth;
pub mod health;
pub mod pekerjaan;
pub mod validation;
