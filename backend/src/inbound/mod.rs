//! Inbound adapters driving the dispatch core.

pub mod http;
