pub mod control;
pub mod games;
pub mod handlers;
pub mod launches;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
