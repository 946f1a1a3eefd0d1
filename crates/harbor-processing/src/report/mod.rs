//! Report rendering
//!
//! A report is a PDF built from one stored upload. PDFs are passed through by
//! the caller and never reach this module; everything else is rendered here.

mod image;
pub mod layout;
mod pdf;
mod sink;

pub use self::image::{decode_for_embedding, fit_centered, RgbImage};
pub use pdf::PdfBuilder;
pub use sink::{channel, ChunkSink, ReportStream, CHUNK_SIZE};

use anyhow::Result;
use harbor_core::ContentKind;
use std::io::{self, Write};
use std::time::Instant;

pub const IMAGE_FAILURE_NOTE: &str = "Could not embed image in PDF.";
pub const TEXT_FAILURE_NOTE: &str = "Could not read text content.";
pub const GENERIC_FAILURE_NOTE: &str = "Error processing file content.";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Characters of text kept before the truncation notice
    pub text_cap_chars: usize,
    /// Deflate content and image streams
    pub compress: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            text_cap_chars: 500_000,
            compress: true,
        }
    }
}

/// What to render: the upload's type and size, plus its bytes or the reason
/// they could not be read.
#[derive(Debug)]
pub struct ReportSource {
    pub kind: ContentKind,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content: Result<Vec<u8>, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub truncated: bool,
    /// True when a failure note replaced the file's content
    pub degraded: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    options: RenderOptions,
}

impl ReportRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render `source` as a PDF into `writer`.
    ///
    /// Content problems (undecodable image, unreadable text) never fail the
    /// call; they become a note in the document. Only write errors are returned.
    pub fn render<W: Write>(&self, source: ReportSource, writer: &mut W) -> Result<RenderSummary> {
        let mut pdf = PdfBuilder::new();
        let (truncated, degraded) = match self.add_content(&mut pdf, source) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Report content failed, writing error note");
                pdf = PdfBuilder::new();
                pdf.add_text(&[GENERIC_FAILURE_NOTE.to_string()])?;
                (false, true)
            }
        };

        let pages = pdf.finish(self.options.compress, writer)?;
        Ok(RenderSummary {
            pages,
            truncated,
            degraded,
        })
    }

    /// Returns (truncated, degraded).
    fn add_content(&self, pdf: &mut PdfBuilder, source: ReportSource) -> Result<(bool, bool)> {
        match source.kind {
            ContentKind::Image => {
                let decoded = source
                    .content
                    .map_err(anyhow::Error::msg)
                    .and_then(|data| decode_for_embedding(&data));
                match decoded {
                    Ok(image) => {
                        pdf.add_image_page(image)?;
                        Ok((false, false))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, mime_type = %source.mime_type, "Image could not be embedded");
                        pdf.add_text(&[IMAGE_FAILURE_NOTE.to_string()])?;
                        Ok((false, true))
                    }
                }
            }
            ContentKind::Text => match source.content {
                Ok(data) => {
                    let text = String::from_utf8_lossy(&data);
                    let (text, truncated) =
                        layout::truncate_text(&text, self.options.text_cap_chars);
                    let lines = layout::wrap_text(&text, layout::chars_per_line());
                    pdf.add_text(&lines)?;
                    Ok((truncated, false))
                }
                Err(e) => {
                    tracing::warn!(error = %e, mime_type = %source.mime_type, "Text content unreadable");
                    pdf.add_text(&[TEXT_FAILURE_NOTE.to_string()])?;
                    Ok((false, true))
                }
            },
            ContentKind::Pdf | ContentKind::Other => {
                pdf.add_centered_page(&layout::placeholder_lines(
                    &source.mime_type,
                    source.size_bytes,
                ))?;
                Ok((false, false))
            }
        }
    }
}

/// Render on a blocking thread and return the bytes as a stream.
///
/// Pages, image pixels included, are assembled in memory first; only the
/// serialization of the finished document is streamed. That output runs
/// ahead of the consumer by at most a few chunks, and if the consumer goes
/// away serialization stops at the next chunk boundary.
pub fn spawn_render(renderer: ReportRenderer, source: ReportSource) -> ReportStream {
    let (mut sink, stream) = channel();

    tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let mime_type = source.mime_type.clone();

        let rendered = renderer.render(source, &mut sink).and_then(|summary| {
            sink.flush()?;
            Ok(summary)
        });

        match rendered {
            Ok(summary) => {
                tracing::info!(
                    mime_type = %mime_type,
                    pages = summary.pages,
                    truncated = summary.truncated,
                    degraded = summary.degraded,
                    size_bytes = sink.bytes_written(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Report rendered"
                );
            }
            Err(_) if sink.is_closed() => {
                tracing::debug!(mime_type = %mime_type, "Report consumer disconnected");
            }
            Err(e) => {
                tracing::error!(mime_type = %mime_type, error = %e, "Report rendering failed");
                sink.fail(io::Error::other(e.to_string()));
            }
        }
    });

    stream
}
