pub mod report_download;
pub mod requirements;
pub mod result_delete;
pub mod result_get;
pub mod upload;
