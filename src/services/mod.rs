//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own room bookkeeping and persistence concerns so route
//! handlers can stay focused on protocol translation.

pub mod names;
pub mod persistence;
pub mod rooms;
