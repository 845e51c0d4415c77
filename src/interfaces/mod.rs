//! Terminal adapters used by the `checkout` binary.

pub mod console;
