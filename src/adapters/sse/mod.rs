//! Server-sent events transport for live campaign progress.
//!
//! - `GET /api/campaigns/:campaign_id/stream` - `text/event-stream` of
//!   `progress` frames, with keep-alive comments while idle

mod frames;
mod handler;

pub use frames::{progress_event, ProgressFrame, KEEP_ALIVE_TEXT, PROGRESS_EVENT};
pub use handler::{
    snapshot_stream, stream_progress, stream_routes, SseState, StreamQuery, DEFAULT_HEARTBEAT,
};
