//! Layering guardrails to keep the core crate free of IO and runtime machinery.
//!
//! `tally_core` holds the store, the result-state table and the severity vocabulary. It must not
//! depend on the engine crate, on logging, or on CLI parsing. This test scans its `Cargo.toml` and
//! fails if any of those appear in `[dependencies]`.

const FORBIDDEN: &[&str] = &["tally", "tracing", "tracing-subscriber", "clap"];

/// Dependency names listed in the `[dependencies]` table of `manifest`.
fn dependency_names(manifest: &str) -> Vec<&str> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().trim_end_matches(".workspace"));
        }
    }
    names
}

#[test]
fn core_does_not_depend_on_engine_logging_or_cli() {
    let manifest = include_str!("../crates/tally_core/Cargo.toml");
    for name in dependency_names(manifest) {
        assert!(
            !FORBIDDEN.contains(&name),
            "`{name}` must not appear in tally_core's [dependencies]; keep the core free of IO and runtime state"
        );
    }
}

#[test]
fn dependency_scan_reads_only_the_dependencies_table() {
    let manifest = "[package]\nname = \"x\"\n\n[dependencies]\n# comment\nthiserror = \"2.0\"\nfoo = { path = \"../foo\" } # inline\n\n[dev-dependencies]\nclap = \"4\"\n";
    assert_eq!(dependency_names(manifest), vec!["thiserror", "foo"]);
}
