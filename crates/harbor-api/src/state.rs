//! Application state shared by every handler.
//!
//! Stores, blob storage and the compliance rule are held behind traits so the
//! process wires in Postgres and the local filesystem while tests wire in
//! in-memory stores and a temp directory.

use harbor_core::{ComplianceRule, Config};
use harbor_db::{RequirementStore, ResultStore};
use harbor_processing::{RenderOptions, ReportRenderer};
use harbor_storage::BlobStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub results: Arc<dyn ResultStore>,
    pub requirements: Arc<dyn RequirementStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub rule: Arc<dyn ComplianceRule>,
    pub renderer: ReportRenderer,
}

impl AppState {
    pub fn new(
        config: Config,
        results: Arc<dyn ResultStore>,
        requirements: Arc<dyn RequirementStore>,
        blobs: Arc<dyn BlobStore>,
        rule: Arc<dyn ComplianceRule>,
    ) -> Self {
        let renderer = ReportRenderer::new(RenderOptions {
            text_cap_chars: config.report_text_cap_chars,
            ..RenderOptions::default()
        });

        Self {
            config,
            results,
            requirements,
            blobs,
            rule,
            renderer,
        }
    }
}
