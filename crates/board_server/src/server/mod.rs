//! Server implementation module.

pub mod core;
pub mod routes;

pub use self::core::BoardServer;
pub use self::routes::build_router;
