pub mod middleware;
pub mod orders;
pub mod server;
pub mod validation;

pub use server::{router, HttpServer, HttpServerConfig};
