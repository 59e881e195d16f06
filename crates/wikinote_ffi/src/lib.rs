//! Flutter-facing bindings for the WikiNote store.

pub mod api;
