//! Home directory resolution.

use std::path::PathBuf;

/// Environment variable that replaces the user's home directory as the root
/// for every kiro-proxy path.
pub const HOME_OVERRIDE_ENV: &str = "KIRO_PROXY_HOME";

/// Resolve the home root, preferring `KIRO_PROXY_HOME` over the OS home.
pub fn resolve_home() -> Option<PathBuf> {
    resolve_home_with(std::env::var_os(HOME_OVERRIDE_ENV).map(PathBuf::from))
}

fn resolve_home_with(override_root: Option<PathBuf>) -> Option<PathBuf> {
    match override_root {
        Some(root) if !root.as_os_str().is_empty() => Some(root),
        _ => dirs::home_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let root = PathBuf::from("/tmp/kiro-home");
        assert_eq!(resolve_home_with(Some(root.clone())), Some(root));
    }

    #[test]
    fn test_empty_override_falls_back_to_os_home() {
        assert_eq!(
            resolve_home_with(Some(PathBuf::new())),
            dirs::home_dir()
        );
        assert_eq!(resolve_home_with(None), dirs::home_dir());
    }
}
