use std::fs;
use std::path::Path;

use quill_cli::commands::{BuildOptions, run_build, run_scan};
use quill_core::model::DiagnosticLevel;
use quill_core::report::DiagnosticCollector;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir");
    }
    fs::write(path, contents).expect("write file");
}

fn create_site(root: &Path) {
    write_file(
        &root.join("quill.yaml"),
        "site:\n  title: Demo\n  base_url: https://example.com/\n  timezone: Europe/Oslo\nindex:\n  items_per_page: 5\nrss:\n  enabled: true\n  max_items: 5\njson_index:\n  enabled: true\n  append: [extra.json]\n",
    );
    write_file(&root.join("extra.json"), "{\"generator\": \"quill\"}\n");
    write_file(
        &root.join("templates/post.html"),
        "<html>\n  <body>\n    <h1 data-block=\"page-name\"></h1>\n    <article data-block=\"post-content\"></article>\n  </body>\n</html>\n",
    );
    write_file(
        &root.join("templates/index.html"),
        "<html>\n  <body>\n    <section data-block=\"index-entries\"></section>\n  </body>\n</html>\n",
    );
    write_file(
        &root.join("templates/landing.html"),
        "<html>\n  <body>\n    <section data-block=\"newest-posts\"></section>\n  </body>\n</html>\n",
    );
    write_file(
        &root.join("templates/index-entry.html"),
        "<h2 data-block=\"entry-title\"></h2>\n",
    );
    write_file(
        &root.join("articles/first.md"),
        "title: First\ndate: 2024-01-05\ntags: rust\n\nHello.\n",
    );
    write_file(
        &root.join("articles/2024/second.md"),
        "title: Second\ndate: 2024-02-05\ntags: Rust\n\nAgain.\n",
    );
    write_file(
        &root.join("articles/later.md"),
        "title: Later\ndate: 2999-01-01\n\nSomeday.\n",
    );
}

fn options(root: &Path, allow_future: bool, clean: bool) -> BuildOptions {
    BuildOptions {
        root: root.to_path_buf(),
        out: "out".into(),
        allow_future,
        clean,
    }
}

#[test]
fn build_writes_site_under_out() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    create_site(root);

    let reporter = DiagnosticCollector::new();
    let summary = run_build(&options(root, false, false), &reporter).expect("build");
    assert_eq!(summary.posts, 2);
    assert_eq!(summary.excluded, 1);
    assert!(reporter.has_message(DiagnosticLevel::Warning, "in the future"));

    let out = root.join("out");
    assert!(out.join("posts/2.html").exists());
    assert!(out.join("posts/1.html").exists());
    assert!(out.join("index.html").exists());
    assert!(out.join("index/by_date/0.html").exists());
    assert!(out.join("rss.xml").exists());

    let second = fs::read_to_string(out.join("posts/2.html")).expect("read post");
    assert!(second.contains("      Second"));

    let json = fs::read_to_string(out.join("index.json")).expect("read json");
    assert!(json.contains("\"generator\": \"quill\""));
    assert!(json.contains("\"title\": \"Second\""));
}

#[test]
fn rebuild_without_clean_reports_collision() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    create_site(root);
    let reporter = DiagnosticCollector::new();

    run_build(&options(root, false, false), &reporter).expect("first build");
    let err = run_build(&options(root, false, false), &reporter).expect_err("collision");
    assert!(format!("{err:#}").contains("refusing to overwrite"));

    run_build(&options(root, false, true), &reporter).expect("clean build");
}

#[test]
fn allow_future_includes_future_documents() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    create_site(root);
    let reporter = DiagnosticCollector::new();

    let summary = run_build(&options(root, true, false), &reporter).expect("build");
    assert_eq!(summary.posts, 3);
    assert!(root.join("out/posts/3.html").exists());
}

#[test]
fn scan_counts_without_writing() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    create_site(root);

    let report = run_scan(root, None).expect("scan");
    assert_eq!(report.documents, 2);
    assert_eq!(report.excluded, 1);
    assert_eq!(report.tags, 1);
    assert_eq!(report.years, 1);
    assert!(!report.has_errors());
    assert!(!root.join("out").exists());
}

#[test]
fn broken_header_is_reported_by_scan() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    create_site(root);
    write_file(&root.join("articles/bad.md"), "title: Bad\ndate: soon\n\nBody.\n");

    let report = run_scan(root, Some(Path::new("articles"))).expect("scan");
    assert!(report.has_errors());
    assert_eq!(report.documents, 2);
}
