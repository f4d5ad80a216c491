use std::path::Path;

/// Files read at startup, highest precedence first. Variables already set
/// in the process environment are never overwritten.
pub const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Load the dotenv files found in `dir`. Missing files are skipped.
/// Returns the names of the files that were loaded.
pub fn load_env_files(dir: &Path) -> Vec<&'static str> {
    ENV_FILES
        .into_iter()
        .filter(|name| match dotenvy::from_path(dir.join(name)) {
            Ok(()) => true,
            Err(e) if e.not_found() => false,
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", name, e);
                false
            }
        })
        .collect()
}
