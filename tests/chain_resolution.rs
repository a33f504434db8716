//! Integration tests for template chain resolution

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use extends_chain::{resolve, ChainError, ChainResolver};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/site")
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn test_leaf_without_directive_is_its_own_chain() {
    let dir = TempDir::new().unwrap();
    let leaf = write(&dir, "plain.html", "<p>no parent</p>\n<!-- USE other.html -->\n");

    assert_eq!(resolve(&leaf).unwrap(), vec![leaf]);
}

#[test]
fn test_three_level_chain_is_root_first() {
    let dir = TempDir::new().unwrap();
    let c = write(&dir, "c.html", "root\n");
    let b = write(&dir, "b.html", &format!("<!-- USE {} -->\nmiddle\n", c.display()));
    let a = write(&dir, "a.html", &format!("<!-- USE {} -->\nleaf\n", b.display()));

    assert_eq!(resolve(&a).unwrap(), vec![c, b, a]);
}

#[test]
fn test_child_extends_base() {
    let dir = TempDir::new().unwrap();
    write(&dir, "base.html", "<html>{% block body %}{% endblock %}</html>\n");
    write(
        &dir,
        "child.html",
        "<!-- USE base.html -->\n{% block body %}hi{% endblock %}\nmore content\n",
    );

    let resolver = ChainResolver::new().with_base_path(dir.path());
    assert_eq!(
        resolver.resolve("child.html").unwrap(),
        vec![dir.path().join("base.html"), dir.path().join("child.html")]
    );
}

#[test]
fn test_resolution_is_repeatable() {
    let resolver = ChainResolver::new().with_base_path(fixtures());

    let first = resolver.resolve("pages/about.html").unwrap();
    let second = resolver.resolve("pages/about.html").unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            fixtures().join("layouts/base.html"),
            fixtures().join("layouts/page.html"),
            fixtures().join("pages/about.html"),
        ]
    );
}

#[test]
fn test_trailing_space_after_directive_is_ignored() {
    let resolver = ChainResolver::new().with_base_path(fixtures());

    let chain = resolver.resolve("pages/stray.html").unwrap();
    assert_eq!(chain, vec![fixtures().join("pages/stray.html")]);
}

#[test]
fn test_missing_parent_names_the_parent() {
    let dir = TempDir::new().unwrap();
    write(&dir, "child.html", "<!-- USE missing.html -->\n");

    let resolver = ChainResolver::new().with_base_path(dir.path());
    let err = resolver.resolve("child.html").unwrap_err();
    match &err {
        ChainError::Open { path, source } => {
            assert_eq!(path, &dir.path().join("missing.html"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected open error, got {other:?}"),
    }
    assert!(err.to_string().contains("missing.html"));
}

#[test]
fn test_missing_leaf() {
    let err = resolve("/nonexistent/extends-chain/leaf.html").unwrap_err();
    assert!(matches!(err, ChainError::Open { .. }));
    assert_eq!(err.path(), Path::new("/nonexistent/extends-chain/leaf.html"));
}

#[test]
fn test_parent_whitespace_is_preserved() {
    let dir = TempDir::new().unwrap();
    write(&dir, " spaced.html", "root\n");
    write(&dir, "child.html", "<!-- USE  spaced.html -->\n");

    let resolver = ChainResolver::new().with_base_path(dir.path());
    assert_eq!(
        resolver.resolve("child.html").unwrap(),
        vec![dir.path().join(" spaced.html"), dir.path().join("child.html")]
    );
}

#[test]
fn test_mutual_cycle_detected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.html", "<!-- USE b.html -->\n");
    write(&dir, "b.html", "<!-- USE a.html -->\n");

    let resolver = ChainResolver::new()
        .with_base_path(dir.path())
        .with_cycle_detection(true);
    let err = resolver.resolve("a.html").unwrap_err();
    match err {
        ChainError::Cycle { path, chain } => {
            let a = dir.path().join("a.html");
            let b = dir.path().join("b.html");
            assert_eq!(path, a);
            assert_eq!(chain, vec![a.clone(), b, a]);
        }
        other => panic!("expected cycle error, got {other:?}"),
    }
}

#[test]
fn test_cycle_detection_allows_repeated_names_in_different_directories() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("inner")).unwrap();
    write(&dir, "page.html", "root\n");
    write(&dir, "inner/page.html", "<!-- USE page.html -->\n");

    let resolver = ChainResolver::new()
        .with_base_path(dir.path())
        .with_cycle_detection(true);
    assert_eq!(
        resolver.resolve("inner/page.html").unwrap(),
        vec![dir.path().join("page.html"), dir.path().join("inner/page.html")]
    );
}
