#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, path::PathBuf};

use citemark::{
  chunks::{collect_chunks, load_chunks},
  cli::ChunkArgs,
  run::{
    OutputTarget,
    collect_inputs,
    highlight_file,
    locate_file,
    run_highlight,
  },
};
use citemark_core::HighlightOptions;
use tempfile::tempdir;

const PAGE: &str = "<html><head><title>Fox</title></head><body><article><p>The \
                    quick brown fox jumps over the lazy \
                    dog</p></article></body></html>";

#[test]
fn test_collect_inputs_walks_directories() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let nested = dir.path().join("docs/guide");
  fs::create_dir_all(&nested).expect("Failed to create dir in test");
  fs::write(dir.path().join("docs/index.html"), PAGE)
    .expect("Failed to write file in test");
  fs::write(nested.join("intro.htm"), PAGE)
    .expect("Failed to write file in test");
  fs::write(nested.join("notes.md"), "# notes")
    .expect("Failed to write file in test");

  let inputs =
    collect_inputs(&[dir.path().join("docs")]).expect("Failed to collect");
  let relative: Vec<_> = inputs.iter().map(|i| i.relative.clone()).collect();
  assert_eq!(relative, [
    PathBuf::from("guide/intro.htm"),
    PathBuf::from("index.html")
  ]);

  assert!(collect_inputs(&[dir.path().join("missing.html")]).is_err());
}

#[test]
fn test_highlight_to_stdout() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let page = dir.path().join("page.html");
  fs::write(&page, PAGE).expect("Failed to write file in test");

  let inputs = collect_inputs(&[page]).expect("Failed to collect");
  let mut out = Vec::new();
  let summary = run_highlight(
    &inputs,
    &["quick brown fox".to_string()],
    &HighlightOptions::default(),
    &OutputTarget::Stdout,
    1,
    &mut out,
  )
  .expect("Failed to highlight");

  assert_eq!(summary.processed, 1);
  assert_eq!(summary.highlighted, 1);
  let html = String::from_utf8(out).expect("utf-8 output");
  assert!(html.contains(
    r#"The <span class="chunk-highlight">quick brown fox</span> jumps"#
  ));
}

#[test]
fn test_highlight_directory_in_parallel() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let src = dir.path().join("src");
  let out = dir.path().join("out");
  fs::create_dir_all(src.join("nested")).expect("Failed to create dir");
  fs::write(src.join("a.html"), PAGE).expect("Failed to write file in test");
  fs::write(src.join("nested/b.html"), "<p>nothing relevant here</p>")
    .expect("Failed to write file in test");

  let inputs = collect_inputs(&[src]).expect("Failed to collect");
  let summary = run_highlight(
    &inputs,
    &["the lazy dog".to_string()],
    &HighlightOptions::default(),
    &OutputTarget::Dir(out.clone()),
    2,
    &mut Vec::new(),
  )
  .expect("Failed to highlight");

  assert_eq!(summary.processed, 2);
  assert_eq!(summary.highlighted, 1);

  let a = fs::read_to_string(out.join("a.html")).expect("a.html written");
  assert!(a.contains(r#"<span class="chunk-highlight">the lazy dog</span>"#));
  // Untouched documents are copied byte for byte.
  let b = fs::read_to_string(out.join("nested/b.html")).expect("b.html written");
  assert_eq!(b, "<p>nothing relevant here</p>");
}

#[test]
fn test_failed_document_reported() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let page = dir.path().join("page.html");
  fs::write(&page, PAGE).expect("Failed to write file in test");

  let options = HighlightOptions {
    container: Some("main".to_string()),
    ..HighlightOptions::default()
  };
  let inputs = collect_inputs(&[page.clone()]).expect("Failed to collect");
  let result = run_highlight(
    &inputs,
    &["quick brown fox".to_string()],
    &options,
    &OutputTarget::Dir(dir.path().join("out")),
    1,
    &mut Vec::new(),
  );
  assert!(result.is_err());
  assert!(highlight_file(&page, &["fox".to_string()], &options).is_err());
}

#[test]
fn test_first_id_and_container_from_options() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let page = dir.path().join("page.html");
  fs::write(
    &page,
    "<nav>quick brown fox</nav><article>the quick brown fox</article>",
  )
  .expect("Failed to write file in test");

  let options = HighlightOptions {
    container: Some("article".to_string()),
    first_id: Some("first-highlight".to_string()),
    ..HighlightOptions::default()
  };
  let outcome = highlight_file(&page, &["quick brown fox".to_string()], &options)
    .expect("Failed to highlight");

  assert!(outcome.html.contains("<nav>quick brown fox</nav>"));
  assert!(outcome.html.contains(r#"id="first-highlight""#));
}

#[test]
fn test_locate_reports_without_modifying() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let page = dir.path().join("page.html");
  fs::write(&page, PAGE).expect("Failed to write file in test");

  let chunks_file = dir.path().join("chunks.json");
  fs::write(
    &chunks_file,
    r#"{"chunks": [{"text": "quick   brown fox", "score": 0.7}, "absent text"]}"#,
  )
  .expect("Failed to write file in test");

  let chunks = collect_chunks(&ChunkArgs {
    chunks_file: Some(chunks_file.clone()),
    chunk:       vec!["lazy dog".to_string()],
  })
  .expect("Failed to load chunks");
  assert_eq!(chunks, ["quick   brown fox", "absent text", "lazy dog"]);

  let report = locate_file(&page, &chunks, &HighlightOptions::default())
    .expect("Failed to locate");
  assert_eq!(report.matched(), 2);
  assert_eq!(report.chunks[0].text.as_deref(), Some("quick brown fox"));
  assert!(report.chunks[1].range.is_none());
  assert_eq!(report.chunks[2].text.as_deref(), Some("lazy dog"));

  let json = serde_json::to_value(&report).expect("report serializes");
  assert!(json["chunks"][1]["text"].is_null());

  assert_eq!(fs::read_to_string(&page).expect("page readable"), PAGE);

  fs::write(&chunks_file, r#"{"text": "wrong shape"}"#)
    .expect("Failed to write file in test");
  assert!(load_chunks(&chunks_file).is_err());
}

#[test]
fn test_same_file_name_in_two_inputs_rejected() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  for name in ["a", "b"] {
    let sub = dir.path().join(name);
    fs::create_dir_all(&sub).expect("Failed to create dir in test");
    fs::write(sub.join("index.html"), format!("<p>{name} quick brown fox</p>"))
      .expect("Failed to write file in test");
  }

  let inputs = collect_inputs(&[
    dir.path().join("a/index.html"),
    dir.path().join("b/index.html"),
  ])
  .expect("Failed to collect");
  let out = dir.path().join("out");
  let result = run_highlight(
    &inputs,
    &["quick brown fox".to_string()],
    &HighlightOptions::default(),
    &OutputTarget::Dir(out.clone()),
    2,
    &mut Vec::new(),
  );

  assert!(result.is_err());
  assert!(!out.join("index.html").exists());
}

#[test]
fn test_fragments_written_as_fragments() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let page = dir.path().join("snippet.html");
  fs::write(&page, "<p>The quick brown fox</p>")
    .expect("Failed to write file in test");

  let out = dir.path().join("out");
  let inputs = collect_inputs(&[page]).expect("Failed to collect");
  run_highlight(
    &inputs,
    &["quick brown".to_string()],
    &HighlightOptions::default(),
    &OutputTarget::Dir(out.clone()),
    1,
    &mut Vec::new(),
  )
  .expect("Failed to highlight");

  let written =
    fs::read_to_string(out.join("snippet.html")).expect("snippet written");
  assert_eq!(
    written,
    r#"<p>The <span class="chunk-highlight">quick brown</span> fox</p>"#
  );
}
