//! HTTP handlers for the server.

pub mod print_queue;
