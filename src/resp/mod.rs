// RESP transport: wire framing, request parsing, reply mapping

pub mod handler;
pub mod parser;
pub mod server;
mod utils;

pub use parser::{parse_request, Request};
pub use server::{RespConfig, RespServer};
