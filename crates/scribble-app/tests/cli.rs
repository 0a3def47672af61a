//! Command line round trips against a temporary annotation store.

use clap::Parser;
use scribble_app::{AppError, Cli, run};
use scribble_core::SurfaceError;
use std::fs;
use std::path::Path;

fn invoke(store: &Path, args: &[&str]) -> Result<String, AppError> {
    let mut argv = vec!["scribble", "--store", store.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::parse_from(argv);
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

const DRAW_TWO: &str = r##"[
    { "op": "toggle_drawing" },
    { "op": "color", "color": "#ff0000" },
    { "op": "width", "width": 4 },
    { "op": "down", "x": 10, "y": 10 },
    { "op": "move", "x": 30, "y": 10 },
    { "op": "up", "x": 30, "y": 10 },
    { "op": "down", "x": 10, "y": 40 },
    { "op": "up", "x": 10, "y": 40 }
]"##;

#[test]
fn replay_then_show() {
    let store = tempfile::tempdir().unwrap();
    let script = store.path().join("draw.json");
    fs::write(&script, DRAW_TWO).unwrap();

    let replayed = invoke(
        store.path(),
        &["replay", "https://x.test/doc?tab=1", script.to_str().unwrap()],
    )
    .unwrap();
    assert!(replayed.contains("replayed 8 steps (2 changes), 2 strokes"));

    let shown = invoke(store.path(), &["show", "https://x.test/doc#notes"]).unwrap();
    assert_eq!(shown.trim(), "scribble:https://x.test/doc: 2 strokes, 3 points");
}

#[test]
fn undo_in_a_later_replay_is_saved() {
    let store = tempfile::tempdir().unwrap();
    let draw = store.path().join("draw.json");
    let undo = store.path().join("undo.json");
    fs::write(&draw, DRAW_TWO).unwrap();
    fs::write(&undo, r#"[{ "op": "undo" }]"#).unwrap();

    invoke(store.path(), &["replay", "https://x.test/doc", draw.to_str().unwrap()]).unwrap();
    // History is per session, so a fresh session has nothing to undo.
    let report =
        invoke(store.path(), &["replay", "https://x.test/doc", undo.to_str().unwrap()]).unwrap();
    assert!(report.contains("(0 changes), 2 strokes"));
}

#[test]
fn export_writes_png_with_strokes() {
    let store = tempfile::tempdir().unwrap();
    let script = store.path().join("draw.json");
    let png = store.path().join("page.png");
    fs::write(&script, DRAW_TWO).unwrap();
    invoke(store.path(), &["replay", "https://x.test/doc", script.to_str().unwrap()]).unwrap();

    let report = invoke(
        store.path(),
        &["export", "https://x.test/doc", "--out", png.to_str().unwrap()],
    )
    .unwrap();
    assert!(report.contains("(34x44)"));

    let image = image::load_from_memory(&fs::read(&png).unwrap())
        .unwrap()
        .to_rgba8();
    assert_eq!(image.dimensions(), (34, 44));
    assert_eq!(image.get_pixel(20, 10).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(20, 30).0, [0, 0, 0, 0]);
}

#[test]
fn export_honours_explicit_size() {
    let store = tempfile::tempdir().unwrap();
    let png = store.path().join("empty.png");

    invoke(
        store.path(),
        &[
            "export",
            "https://x.test/blank",
            "--out",
            png.to_str().unwrap(),
            "--width",
            "16",
            "--height",
            "8",
        ],
    )
    .unwrap();

    let image = image::load_from_memory(&fs::read(&png).unwrap()).unwrap();
    assert_eq!((image.width(), image.height()), (16, 8));
}

#[test]
fn clear_empties_the_page() {
    let store = tempfile::tempdir().unwrap();
    let script = store.path().join("draw.json");
    fs::write(&script, DRAW_TWO).unwrap();
    invoke(store.path(), &["replay", "https://x.test/doc", script.to_str().unwrap()]).unwrap();

    let cleared = invoke(store.path(), &["clear", "https://x.test/doc"]).unwrap();
    assert!(cleared.contains("cleared 2 strokes"));

    let again = invoke(store.path(), &["clear", "https://x.test/doc"]).unwrap();
    assert!(again.contains("cleared 0 strokes"));

    let shown = invoke(store.path(), &["show", "https://x.test/doc"]).unwrap();
    assert!(shown.contains("0 strokes"));
}

#[test]
fn list_shows_pages_with_strokes() {
    let store = tempfile::tempdir().unwrap();
    let scripts = tempfile::tempdir().unwrap();
    let script = scripts.path().join("draw.json");
    fs::write(&script, DRAW_TWO).unwrap();

    invoke(store.path(), &["replay", "https://b.test/two", script.to_str().unwrap()]).unwrap();
    invoke(store.path(), &["replay", "https://a.test/one?x=1", script.to_str().unwrap()]).unwrap();
    let listed = invoke(store.path(), &["list"]).unwrap();
    assert_eq!(
        listed.lines().collect::<Vec<_>>(),
        vec!["scribble:https://a.test/one", "scribble:https://b.test/two"]
    );

    // A cleared page no longer has a record.
    invoke(store.path(), &["clear", "https://b.test/two"]).unwrap();
    let listed = invoke(store.path(), &["list"]).unwrap();
    assert_eq!(listed.trim(), "scribble:https://a.test/one");
}

#[test]
fn export_of_far_away_stroke_fails_cleanly() {
    let store = tempfile::tempdir().unwrap();
    let script = store.path().join("far.json");
    let png = store.path().join("far.png");
    fs::write(
        &script,
        r#"[
            { "op": "toggle_drawing" },
            { "op": "down", "x": 1000000, "y": 1000000 },
            { "op": "up", "x": 1000000, "y": 1000000 }
        ]"#,
    )
    .unwrap();
    invoke(store.path(), &["replay", "https://x.test/doc", script.to_str().unwrap()]).unwrap();

    let result = invoke(
        store.path(),
        &["export", "https://x.test/doc", "--out", png.to_str().unwrap()],
    );
    assert!(matches!(
        result,
        Err(AppError::Surface(SurfaceError::TooLarge { .. }))
    ));
    assert!(!png.exists());
}

#[test]
fn oversized_resize_step_is_reported() {
    let store = tempfile::tempdir().unwrap();
    let script = store.path().join("resize.json");
    fs::write(&script, r#"[{ "op": "resize", "width": 1e9, "height": 10 }]"#).unwrap();

    let result = invoke(store.path(), &["replay", "https://x.test/doc", script.to_str().unwrap()]);
    assert!(matches!(
        result,
        Err(AppError::Surface(SurfaceError::TooLarge { .. }))
    ));
}

#[test]
fn malformed_script_is_reported() {
    let store = tempfile::tempdir().unwrap();
    let script = store.path().join("bad.json");
    fs::write(&script, r#"[{ "op": "warp" }]"#).unwrap();

    let result = invoke(store.path(), &["replay", "https://x.test/doc", script.to_str().unwrap()]);
    assert!(matches!(result, Err(AppError::Script { .. })));
}

#[test]
fn invalid_url_is_reported() {
    let store = tempfile::tempdir().unwrap();
    let result = invoke(store.path(), &["show", "not a url"]);
    assert!(matches!(result, Err(AppError::PageKey(_))));
}
