use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16"><path d="M1 1H15V15H1Z"/></svg>"#;

fn icon_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["home.svg", "icon-10.svg", "icon-2.svg", "weather/rain.svg"] {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, ICON).unwrap();
    }
    dir
}

#[test]
fn test_build_writes_all_artifacts() {
    let icons = icon_dir();
    let out = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("glyphsmith")
        .args([
            "build",
            icons.path().to_str().unwrap(),
            "--output",
            out.path().to_str().unwrap(),
            "--font-name",
            "Demo",
            "--prefix",
            "demo-",
        ])
        .assert()
        .success();

    for ext in ["svg", "ttf", "woff", "woff2", "eot", "css", "html", "js"] {
        let path = out.path().join(format!("Demo.{ext}"));
        assert!(path.exists(), "Demo.{ext} should exist");
    }

    // Name map uses camel-cased keys
    let js = std::fs::read_to_string(out.path().join("Demo.js")).unwrap();
    assert!(js.starts_with("export default {"));
    assert!(js.contains("\"weatherRain\": \"demo-weather-rain\""));
}

#[test]
fn test_build_without_prefix_or_base_fails() {
    let icons = icon_dir();
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");

    cargo_bin_cmd!("glyphsmith")
        .args([
            "build",
            icons.path().to_str().unwrap(),
            "-o",
            dist.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prefix"));

    assert!(!dist.exists(), "nothing should be written");
}

#[test]
fn test_build_reads_config_file() {
    let icons = icon_dir();
    let out = tempfile::tempdir().unwrap();
    let config = out.path().join("glyphsmith.yaml");
    std::fs::write(
        &config,
        format!(
            "input: {}\noutput_dir: {}\nfont_name: Configured\nbase_class: cfg\n",
            icons.path().display(),
            out.path().join("dist").display()
        ),
    )
    .unwrap();

    cargo_bin_cmd!("glyphsmith")
        .args(["--config", config.to_str().unwrap(), "build"])
        .assert()
        .success();

    let css = std::fs::read_to_string(out.path().join("dist/Configured.css")).unwrap();
    assert!(css.contains(".cfg"));
}

#[test]
fn test_list_prints_plan_in_natural_order() {
    let icons = icon_dir();

    cargo_bin_cmd!("glyphsmith")
        .args(["list", icons.path().to_str().unwrap(), "-p", "i-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("U+F000  home"))
        .stdout(predicate::str::contains("U+F001  icon-2"))
        .stdout(predicate::str::contains("U+F002  icon-10"))
        .stdout(predicate::str::contains("U+F003  weather-rain"));
}

#[test]
fn test_list_reports_missing_directory() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("glyphsmith")
        .args([
            "list",
            dir.path().join("missing").to_str().unwrap(),
            "-b",
            "icon",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}
