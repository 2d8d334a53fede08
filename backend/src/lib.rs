//! # Launch Board
//!
//! Keeps an always-consistent, periodically refreshed view of upcoming
//! launches from Cape Canaveral and serves it to any number of concurrent
//! readers.
//!
//! ## Architecture
//!
//! - [`source`]: the upstream provider client ([`source::LaunchSource`])
//! - [`services`]: pure transformation, map artifact building, fingerprints
//! - [`refresh`]: snapshot store, startup retry and the periodic refresh loop
//! - [`query`]: read-only projections (next launch, countdown, last refresh)
//! - [`config`]: TOML file plus environment overrides
//! - [`http`]: Axum-based page, JSON endpoints and SSE stream
//!
//! ## Flow
//!
//! ```text
//! LaunchSource ─fetch─► transform ─► ArtifactBuilder ─► SnapshotWriter::publish
//!                                                          │
//!                                 LaunchQuery ◄─current()─┘ (SnapshotReader)
//! ```
//!
//! A published [`models::Snapshot`] is immutable and always handed out as an
//! `Arc`, so a reader holding one is never affected by later refreshes.

pub mod config;
pub mod models;
pub mod query;
pub mod refresh;
pub mod services;
pub mod source;

#[cfg(feature = "http-server")]
pub mod http;
