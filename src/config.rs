use std::path::PathBuf;

/// Runtime configuration assembled once at startup and passed to every
/// component that needs it. There is no ambient global state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_path: String,
    /// Working directory for upload processing. Archive uploads are
    /// extracted into scratch directories created underneath it.
    pub upload_dir: PathBuf,
    pub cors_origin: Option<String>,
}
