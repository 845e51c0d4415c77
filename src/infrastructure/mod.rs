//! Adapters for the domain ports: the HTTP merchant backend, and in-memory
//! stand-ins for the backend, the document and the gateway SDK.

pub mod http;
pub mod in_memory;
