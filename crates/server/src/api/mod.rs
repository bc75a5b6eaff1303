pub mod handlers;
pub mod launches;
pub mod routes;

pub use routes::create_router;
