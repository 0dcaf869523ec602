use dx_core::paths::DX_DIR;
use std::path::{Path, PathBuf};

/// Resolve the workspace root that holds the project folders.
///
/// Priority:
/// 1. `--root` flag / `DX_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.dx/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_marked(&cwd).unwrap_or(cwd)
}

fn find_marked(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(DX_DIR).is_dir())
        .map(Path::to_path_buf)
}
