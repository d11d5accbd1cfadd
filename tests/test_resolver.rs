use std::fs;
use std::path::PathBuf;

use lantern::static_files::{FileResolver, ResolveError};
use tempfile::TempDir;

fn site() -> (TempDir, FileResolver) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(dir.path().join("notes.txt"), "plain notes").unwrap();
    fs::create_dir(dir.path().join("img")).unwrap();
    fs::write(dir.path().join("img").join("logo.png"), [0x89, b'P', b'N', b'G', 0, 1]).unwrap();

    let resolver = FileResolver::new(dir.path(), "index.html");
    (dir, resolver)
}

#[test]
fn test_relative_path_root_maps_to_index() {
    let resolver = FileResolver::new("/srv", "index.html");
    assert_eq!(resolver.relative_path("/"), Some(PathBuf::from("index.html")));
}

#[test]
fn test_relative_path_normalizes_dot_segments() {
    let resolver = FileResolver::new("/srv", "index.html");

    assert_eq!(resolver.relative_path("/a/./b.txt"), Some(PathBuf::from("a/b.txt")));
    assert_eq!(resolver.relative_path("/a/../b.txt"), Some(PathBuf::from("b.txt")));
    assert_eq!(resolver.relative_path("/a//b.txt"), Some(PathBuf::from("a/b.txt")));
}

#[test]
fn test_relative_path_rejects_escape() {
    let resolver = FileResolver::new("/srv", "index.html");

    assert_eq!(resolver.relative_path("/../etc/passwd"), None);
    assert_eq!(resolver.relative_path("/a/../../etc/passwd"), None);
    assert_eq!(resolver.relative_path("/.."), None);
}

#[test]
fn test_relative_path_rejects_absolute_injection() {
    let resolver = FileResolver::new("/srv", "index.html");
    assert_eq!(resolver.relative_path("//etc/passwd"), None);
}

#[test]
fn test_relative_path_requires_leading_slash() {
    let resolver = FileResolver::new("/srv", "index.html");

    assert_eq!(resolver.relative_path("index.html"), None);
    assert_eq!(resolver.relative_path(""), None);
}

#[tokio::test]
async fn test_resolve_root_and_index_are_identical() {
    let (_dir, resolver) = site();

    let root = resolver.resolve("/").await.unwrap();
    let index = resolver.resolve("/index.html").await.unwrap();

    assert_eq!(root.body, index.body);
    assert_eq!(root.content_type, "text/html");
    assert_eq!(&root.body[..], b"<h1>home</h1>");
}

#[tokio::test]
async fn test_resolve_returns_exact_bytes_and_type() {
    let (_dir, resolver) = site();

    let logo = resolver.resolve("/img/logo.png").await.unwrap();
    assert_eq!(&logo.body[..], &[0x89, b'P', b'N', b'G', 0, 1]);
    assert_eq!(logo.content_type, "image/png");

    let notes = resolver.resolve("/notes.txt").await.unwrap();
    assert_eq!(notes.content_type, "text/plain");
}

#[tokio::test]
async fn test_resolve_missing_file_is_not_found() {
    let (_dir, resolver) = site();

    let err = resolver.resolve("/missing.html").await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { ref path } if path == "/missing.html"));
}

#[tokio::test]
async fn test_resolve_directory_is_not_found() {
    let (_dir, resolver) = site();

    assert!(resolver.resolve("/img").await.is_err());
    assert!(resolver.resolve("/img/").await.is_err());
}

#[tokio::test]
async fn test_resolve_traversal_is_not_found_even_if_target_exists() {
    let outer = tempfile::tempdir().unwrap();
    fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
    let root = outer.path().join("www");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("index.html"), "hi").unwrap();

    let resolver = FileResolver::new(&root, "index.html");

    assert!(resolver.resolve("/../secret.txt").await.is_err());
    assert!(resolver.resolve("/./../secret.txt").await.is_err());
    assert!(resolver.resolve("/index.html").await.is_ok());
}

#[tokio::test]
async fn test_resolve_custom_index_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("home.txt"), "welcome").unwrap();

    let resolver = FileResolver::new(dir.path(), "home.txt");
    let file = resolver.resolve("/").await.unwrap();

    assert_eq!(&file.body[..], b"welcome");
    assert_eq!(file.content_type, "text/plain");
}

#[tokio::test]
async fn test_resolve_query_string_is_part_of_the_name() {
    let (_dir, resolver) = site();
    assert!(resolver.resolve("/notes.txt?v=2").await.is_err());
}

#[test]
fn test_relative_path_accepts_raw_bytes() {
    let resolver = FileResolver::new("/srv", "index.html");

    let relative = resolver.relative_path(&b"/docs/../a.txt"[..]);
    assert_eq!(relative, Some(PathBuf::from("a.txt")));
    assert_eq!(resolver.relative_path(&b"/../\xff"[..]), None);
}
