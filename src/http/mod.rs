// Gateway HTTP module: server and response rendering.

pub mod render;
pub mod server;

// Re-export server types
pub use server::{GatewayServer, Server};
