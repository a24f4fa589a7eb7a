pub mod charset;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filename;
pub mod locality;
pub mod mirror;
pub mod page;
pub mod result;

pub use config::MirrorConfig;
pub use error::MirrorError;
pub use filename::format_filename;
pub use locality::is_local;
pub use mirror::{PageMirror, ProgressCallback, download};
pub use result::{LocalizedAsset, MirrorEvent, MirrorResult};
