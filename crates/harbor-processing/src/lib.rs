//! Harbor Processing Library
//!
//! Turns stored uploads into downloadable PDF reports. Images are embedded,
//! text is typeset in a monospaced font and anything else gets a summary
//! page. Serialization happens on a blocking thread into a chunked sink so
//! the HTTP response can start before the whole document is written.

pub mod report;

pub use report::{
    spawn_render, ChunkSink, RenderOptions, RenderSummary, ReportRenderer, ReportSource,
    ReportStream,
};
