use std::fs;
use std::path::{Path, PathBuf};

/// Only the production adapter may talk HTTP directly.
const ALLOWED_TRANSPORT_FILES: &[&str] = &["src/adapters/opsgenie.rs"];

/// Only attach may construct the production client.
const ALLOWED_CLIENT_CONSTRUCTORS: &[&str] = &["src/adapters/opsgenie.rs", "src/app.rs"];

fn collect_rust_files(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rust_files(&path, out);
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) == Some("rs") {
            out.push(path);
        }
    }
}

fn offenders(allowed: &[&str], matches: impl Fn(&str) -> bool) -> Vec<String> {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    collect_rust_files(&repo_root.join("src"), &mut files);

    let mut found = Vec::new();
    for file in files {
        let rel = file
            .strip_prefix(repo_root)
            .unwrap_or(&file)
            .to_string_lossy()
            .replace('\\', "/");
        if allowed.iter().any(|a| *a == rel) {
            continue;
        }
        let content = fs::read_to_string(&file).unwrap_or_default();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if matches(trimmed) {
                found.push(format!("{rel}:{}: {}", idx + 1, trimmed));
            }
        }
    }
    found
}

#[test]
fn http_transport_stays_in_the_adapter() {
    let found = offenders(ALLOWED_TRANSPORT_FILES, |line| {
        line.contains("use reqwest") || line.contains("reqwest::Client")
    });
    assert!(
        found.is_empty(),
        "direct HTTP usage detected outside the Opsgenie adapter:\n{}",
        found.join("\n")
    );
}

#[test]
fn production_client_is_only_built_on_attach() {
    let found = offenders(ALLOWED_CLIENT_CONSTRUCTORS, |line| {
        line.contains("OpsgenieClient::new(") || line.contains("OpsgenieClient::from_config(")
    });
    assert!(
        found.is_empty(),
        "production client constructed outside attach:\n{}",
        found.join("\n")
    );
}
