use std::path::Path;

use tracing::debug;

/// Load a `.env` file into the process environment before any config is
/// resolved. With no explicit path the working directory and its parents
/// are searched. A missing file is not an error; `Ok(false)` is returned.
///
/// Variables that are already set are left alone.
pub fn load_env_file(path: Option<&Path>) -> Result<bool, dotenvy::Error> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|_| true),
        None => dotenvy::dotenv().map(|path| {
            debug!(path = %path.display(), "loaded env file");
            true
        }),
    };

    loaded.or_else(|err| match err {
        dotenvy::Error::Io(_) => Ok(false),
        _ => Err(err),
    })
}
