//! Scanning for declaration unit files.
//!
//! Units are discovered under the source root using the config's include and
//! ignore patterns. Patterns without glob wildcards are treated as literal
//! directory paths relative to the source root.

use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

/// File suffix the front end uses for serialized declaration units.
pub const UNIT_FILE_SUFFIX: &str = ".decls.json";

/// Check if a pattern contains glob wildcards (* or ?).
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning for unit files.
pub struct ScanResult {
    /// Discovered unit files, sorted for deterministic processing order.
    pub files: Vec<PathBuf>,
    /// Paths skipped due to filesystem access errors.
    pub skipped_count: usize,
}

/// Scan `base_dir` for unit files honoring include/ignore patterns.
pub fn scan_units(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    verbose: bool,
) -> ScanResult {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        includes
            .iter()
            .map(|inc| base_dir.join(inc))
            .filter(|p| p.exists())
            .collect()
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(&dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Skipping path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(UNIT_FILE_SUFFIX) {
                continue;
            }

            if literal_ignore_paths.iter().any(|ig| path.starts_with(ig)) {
                continue;
            }
            let path_str = path.to_string_lossy();
            if glob_patterns.iter().any(|g| g.matches(&path_str)) {
                continue;
            }

            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();

    ScanResult {
        files,
        skipped_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn finds_only_unit_files() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a/widget.decls.json");
        touch(tmp.path(), "a/readme.md");
        touch(tmp.path(), "b/game.decls.json");

        let result = scan_units(tmp.path(), &[], &[], false);
        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().all(|f| {
            f.file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with(UNIT_FILE_SUFFIX)
        }));
    }

    #[test]
    fn literal_ignore_paths_prune_directories() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "keep/widget.decls.json");
        touch(tmp.path(), "vendor/dep.decls.json");

        let result = scan_units(tmp.path(), &[], &["vendor".to_string()], false);
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("keep/widget.decls.json"));
    }

    #[test]
    fn glob_ignores_match_anywhere() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "src/widget.decls.json");
        touch(tmp.path(), "src/widget_test.decls.json");

        let result = scan_units(tmp.path(), &[], &["**/*_test.decls.json".to_string()], false);
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn includes_narrow_the_scan() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "src/widget.decls.json");
        touch(tmp.path(), "other/game.decls.json");

        let result = scan_units(tmp.path(), &["src".to_string()], &[], false);
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn output_is_sorted() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b.decls.json");
        touch(tmp.path(), "a.decls.json");

        let result = scan_units(tmp.path(), &[], &[], false);
        let names: Vec<_> = result
            .files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.decls.json", "b.decls.json"]);
    }
}
