//! Plugin discovery via 2-level path scanning.
//!
//! For each configured path, checks three locations:
//! 1. The path itself (contains `spyglass-plugin.toml`)
//! 2. Immediate subdirectories (`<path>/razor/spyglass-plugin.toml`)
//! 3. Nested plugin directories (`<path>/razor/spyglass-plugin/spyglass-plugin.toml`)
//!
//! Subdirectories are visited in name order so engine registration order is
//! stable across platforms.

use std::path::{Path, PathBuf};

use super::manifest::MANIFEST_FILENAME;

const PLUGIN_SUBDIR: &str = "spyglass-plugin";

/// Discover all directories containing a `spyglass-plugin.toml` under the given search paths.
pub(crate) fn discover_plugin_dirs(search_paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for base in search_paths {
        if !base.is_dir() {
            tracing::debug!(?base, "Plugin search path does not exist, skipping");
            continue;
        }

        if has_manifest(base) {
            found.push(base.clone());
            continue;
        }

        let entries = match std::fs::read_dir(base) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(?base, error = %e, "Cannot read plugin search path");
                continue;
            }
        };

        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        subdirs.sort();

        for subdir in subdirs {
            if has_manifest(&subdir) {
                found.push(subdir);
                continue;
            }

            let nested = subdir.join(PLUGIN_SUBDIR);
            if nested.is_dir() && has_manifest(&nested) {
                found.push(nested);
            }
        }
    }

    found
}

fn has_manifest(dir: &Path) -> bool {
    dir.join(MANIFEST_FILENAME).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_manifest(dir: &Path, id: &str) {
        let content = format!(
            r#"
[engine]
id = "{id}"
name = "{id}"
command = "cat"
"#
        );
        fs::write(dir.join(MANIFEST_FILENAME), content).unwrap();
    }

    #[test]
    fn test_discover_root_manifest() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), "root");

        let found = discover_plugin_dirs(&[dir.path().to_path_buf()]);
        assert_eq!(found, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn test_discover_immediate_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let razor = dir.path().join("razor");
        fs::create_dir(&razor).unwrap();
        write_manifest(&razor, "razor");

        let found = discover_plugin_dirs(&[dir.path().to_path_buf()]);
        assert_eq!(found, vec![razor]);
    }

    #[test]
    fn test_discover_nested_plugin_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("razor").join(PLUGIN_SUBDIR);
        fs::create_dir_all(&nested).unwrap();
        write_manifest(&nested, "razor");

        let found = discover_plugin_dirs(&[dir.path().to_path_buf()]);
        assert_eq!(found, vec![nested]);
    }

    #[test]
    fn test_discover_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            let plugin = dir.path().join(name);
            fs::create_dir(&plugin).unwrap();
            write_manifest(&plugin, name);
        }

        let found = discover_plugin_dirs(&[dir.path().to_path_buf()]);
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_discover_nonexistent_path() {
        let found = discover_plugin_dirs(&[PathBuf::from("/nonexistent/path")]);
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_skips_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("not-a-plugin.txt"), "hello").unwrap();
        assert!(discover_plugin_dirs(&[dir.path().to_path_buf()]).is_empty());
    }

    #[test]
    fn test_discover_multiple_search_paths() {
        let dir1 = tempfile::tempdir().unwrap();
        let dir2 = tempfile::tempdir().unwrap();
        write_manifest(dir1.path(), "a");
        let b = dir2.path().join("b");
        fs::create_dir(&b).unwrap();
        write_manifest(&b, "b");

        let found = discover_plugin_dirs(&[dir1.path().to_path_buf(), dir2.path().to_path_buf()]);
        assert_eq!(found.len(), 2);
    }
}
