//! Campaign Pulse - live progress for bulk email campaigns
//!
//! Folds delivery outcomes from the send executor into per-campaign and
//! per-account counters, and pushes full-state snapshots to every connected
//! dashboard over server-sent events.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
