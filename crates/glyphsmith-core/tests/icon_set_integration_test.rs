//! Integration tests for discovery → ordering → allocation → emitters
//!
//! Tests use temporary directories with real icon trees to verify:
//! - Every discovered file becomes exactly one entry
//! - Code points are contiguous in collated order
//! - Duplicate derived names are rejected
//! - Emitter output is reproducible across runs

use std::path::PathBuf;

use glyphsmith_core::emit::{render_css, render_name_map};
use glyphsmith_core::icon::CODE_POINT_BASE;
use glyphsmith_core::{
    BuildConfig, BuildOptions, CodePointAllocator, Error, IconSet, NaturalCollation, discover,
};
use tempfile::TempDir;

const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><path d="M0 0H10V10Z"/></svg>"#;

fn write_icons(dir: &TempDir, files: &[&str]) {
    for file in files {
        let path = dir.path().join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, SVG).unwrap();
    }
}

fn config(dir: &TempDir) -> BuildConfig {
    BuildOptions {
        input: Some(dir.path().to_path_buf()),
        output_dir: Some(PathBuf::from("out")),
        font_name: Some("Test Icons".to_string()),
        prefix: Some("ti-".to_string()),
        base_class: Some("ti".to_string()),
        ..Default::default()
    }
    .resolve()
    .unwrap()
}

async fn allocate(dir: &TempDir) -> glyphsmith_core::Result<IconSet> {
    let config = config(dir);
    let found = discover(&config.input_dir).await?;
    IconSet::allocate(
        found,
        &config,
        &NaturalCollation::new()?,
        CodePointAllocator::new(),
    )
}

#[tokio::test]
async fn test_one_entry_per_file_in_collated_order() {
    let dir = TempDir::new().unwrap();
    write_icons(
        &dir,
        &[
            "icon-10.svg",
            "icon-2.svg",
            "Alpha.svg",
            "weather/rain.svg",
            "weather/Sun.svg",
        ],
    );

    let icons = allocate(&dir).await.unwrap();
    assert_eq!(icons.len(), 5);

    let names: Vec<&str> = icons.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        ["Alpha", "icon-2", "icon-10", "weather-rain", "weather-Sun"]
    );

    for (i, entry) in icons.iter().enumerate() {
        assert_eq!(entry.code_point as u32, CODE_POINT_BASE + i as u32);
        assert!(entry.source_path.is_absolute());
    }
}

#[tokio::test]
async fn test_colliding_nested_paths_fail() {
    let dir = TempDir::new().unwrap();
    write_icons(&dir, &["a/b.svg", "a-b.svg", "c.svg"]);

    match allocate(&dir).await {
        Err(Error::DuplicateName { name, .. }) => assert_eq!(name, "a-b"),
        other => panic!("Expected duplicate name error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_same_stem_different_extension_fails() {
    let dir = TempDir::new().unwrap();
    write_icons(&dir, &["logo.svg", "logo.SVG.bak"]);
    // `logo.SVG.bak` derives `logo.SVG`, which is a distinct name.
    assert!(allocate(&dir).await.is_ok());

    write_icons(&dir, &["logo.xml"]);
    assert!(matches!(
        allocate(&dir).await,
        Err(Error::DuplicateName { .. })
    ));
}

#[tokio::test]
async fn test_empty_directory_yields_empty_set() {
    let dir = TempDir::new().unwrap();
    let icons = allocate(&dir).await.unwrap();
    assert!(icons.is_empty());
    assert_eq!(render_name_map(&icons).unwrap(), "export default {};");
}

#[tokio::test]
async fn test_emitters_are_reproducible() {
    let dir = TempDir::new().unwrap();
    write_icons(&dir, &["b10.svg", "a.svg", "b2.svg", "nested/x y.svg"]);
    let config = config(&dir);

    let first = allocate(&dir).await.unwrap();
    let second = allocate(&dir).await.unwrap();

    assert_eq!(
        render_css(&first, &config).unwrap(),
        render_css(&second, &config).unwrap()
    );
    assert_eq!(
        render_name_map(&first).unwrap(),
        render_name_map(&second).unwrap()
    );

    let css = render_css(&first, &config).unwrap();
    assert!(css.contains(".ti-nested-x\\ y:before"));
}
