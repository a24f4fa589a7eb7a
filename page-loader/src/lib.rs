pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    DownloadArgs, OutputFormat, default_log_level, expand_output_dir, handle_download,
    render_result, run_download,
};

// Re-export the mirroring API from page-loader-core
pub use page_loader_core::{MirrorConfig, MirrorError, MirrorResult, download};
