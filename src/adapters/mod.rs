// Adapters layer: concrete implementations of the domain ports (http, terminal, memory).

pub mod http;
pub mod memory;
pub mod terminal;
