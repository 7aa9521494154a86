use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

/// Variables read from a `.env` file
pub type EnvironmentMap = BTreeMap<String, String>;

/// Read a `.env` file without touching the process environment
///
/// Variables already set in the process environment are left out of the
/// returned map, so an explicit `export` always wins over the file. A
/// missing file is not an error and yields an empty map.
pub fn load(path: &Path) -> EnvironmentMap {
    load_with(path, |key| std::env::var_os(key).is_some())
}

/// Same as [`load`], with `is_set` deciding which keys are already defined
pub fn load_with(path: &Path, is_set: impl Fn(&str) -> bool) -> EnvironmentMap {
    let mut vars = EnvironmentMap::new();

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => {
            debug!("No env file at {}", path.display());
            return vars;
        }
        Err(e) => {
            warn!("Ignoring env file {}: {}", path.display(), e);
            return vars;
        }
    };

    for entry in entries {
        match entry {
            Ok((key, _)) if key.is_empty() || is_set(&key) => {
                debug!("Keeping existing value of {}", key);
            }
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(e) => warn!("Skipping malformed line in {}: {}", path.display(), e),
        }
    }

    debug!("Loaded {} variables from {}", vars.len(), path.display());
    vars
}
