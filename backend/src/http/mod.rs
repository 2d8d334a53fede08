//! HTTP surface for the launch board.
//!
//! Handlers only ever read: every request takes one snapshot from the
//! [`LaunchQuery`](crate::query::LaunchQuery) and renders it. The refresh
//! scheduler runs on its own task and is never touched from here.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                   │
//! │  - HTML page, JSON endpoints, SSE stream      │
//! │  - CORS, compression, tracing                 │
//! └───────────────────┬──────────────────────────┘
//!                     │ current()
//! ┌───────────────────▼──────────────────────────┐
//! │  Snapshot store (refresh::store)              │
//! └───────────────────▲──────────────────────────┘
//!                     │ publish()
//! ┌───────────────────┴──────────────────────────┐
//! │  Refresh scheduler (background task)          │
//! └──────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod page;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
