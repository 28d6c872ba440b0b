//! Structural tests for the layer boundaries.
//!
//! Source files are scanned as text; comment lines and `#[cfg(test)]` blocks
//! are ignored.

use std::path::{Path, PathBuf};

fn src_dir(sub: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(sub)
}

fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines outside `#[cfg(test)]` blocks, with their line numbers.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut depth = 0i32;
    let mut test_start: Option<i32> = None;
    let mut out = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") && test_start.is_none() {
            test_start = Some(depth);
        }
        let in_test = test_start.is_some();
        for ch in line.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if test_start.is_some_and(|d| depth <= d) {
                        test_start = None;
                    }
                }
                _ => {}
            }
        }
        if !in_test && !trimmed.starts_with("//") {
            out.push((i + 1, line.to_string()));
        }
    }
    out
}

fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut found = Vec::new();
    for file in collect_rs_files(&src_dir(layer)) {
        let rel = file.strip_prefix(root).unwrap_or(&file).display().to_string();
        for (lineno, line) in production_lines(&file) {
            for pattern in forbidden {
                if line.contains(pattern) {
                    found.push(format!("{rel}:{lineno}: `{pattern}` in: {}", line.trim()));
                }
            }
        }
    }
    found
}

#[test]
fn test_domain_has_no_io_or_outer_layer_imports() {
    let found = violations(
        "domain",
        &[
            "crate::application",
            "crate::infra",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(found.is_empty(), "domain boundary violations:\n{}", found.join("\n"));
}

#[test]
fn test_application_depends_only_on_domain() {
    let found = violations(
        "application",
        &["crate::infra", "crate::commands", "crate::output", "std::process::Command"],
    );
    assert!(
        found.is_empty(),
        "application boundary violations:\n{}",
        found.join("\n")
    );
}

#[test]
fn test_commands_do_not_branch_on_json() {
    let found = violations("commands", &["json: bool", "if json", "if !json"]);
    assert!(
        found.is_empty(),
        "commands must go through the Renderer:\n{}",
        found.join("\n")
    );
}
