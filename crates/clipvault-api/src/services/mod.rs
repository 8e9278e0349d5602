pub mod ingest;
pub mod signing;

pub use ingest::{AuthorizedRecord, IngestSettings, UploadedFile, VideoIngestService};
pub use signing::{sign_locator, sign_record};
