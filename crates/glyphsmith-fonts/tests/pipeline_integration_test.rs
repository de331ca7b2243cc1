//! End-to-end pipeline tests
//!
//! Each test builds a real icon directory and runs [`Build`] against it:
//! - A complete build produces valid, parseable fonts
//! - Unreadable icons abort the font job without touching the emitters
//! - Planning errors write nothing at all
//! - Reruns are byte-for-byte reproducible

use std::path::Path;
use std::sync::Arc;

use glyphsmith_core::{BuildOptions, FontFormat, Stage};
use glyphsmith_fonts::{
    Build, Error, SvgFontToTtf, TranscodeChain, Transcoder, TtfToEot, TtfToWoff, TtfToWoff2,
};
use tempfile::TempDir;

const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M2 2H22V22H2Z"/></svg>"#;
const CIRCLE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 48"><circle cx="24" cy="24" r="20"/></svg>"#;

fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn options(input: &Path, output: &Path) -> BuildOptions {
    BuildOptions {
        input: Some(input.to_path_buf()),
        output_dir: Some(output.to_path_buf()),
        font_name: Some("Pipeline Icons".to_string()),
        prefix: Some("pi-".to_string()),
        base_class: Some("pi".to_string()),
        ..Default::default()
    }
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_build_produces_valid_fonts() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "square.svg", SQUARE);
    write(input.path(), "shapes/circle.svg", CIRCLE);
    write(input.path(), "icon-10.svg", SQUARE);
    write(input.path(), "icon-2.svg", SQUARE);

    let build = Build::from_options(options(input.path(), output.path())).unwrap();
    let report = build.run().await.unwrap();
    assert!(report.is_success());

    assert_eq!(
        entries(output.path()),
        [
            "Pipeline Icons.css",
            "Pipeline Icons.eot",
            "Pipeline Icons.html",
            "Pipeline Icons.js",
            "Pipeline Icons.svg",
            "Pipeline Icons.ttf",
            "Pipeline Icons.woff",
            "Pipeline Icons.woff2",
        ]
    );

    let paths = build.config().artifact_paths();
    let ttf = std::fs::read(paths.font(FontFormat::Ttf)).unwrap();
    let face = ttf_parser::Face::parse(&ttf, 0).unwrap();
    assert_eq!(face.number_of_glyphs(), 5);

    // icon-2, icon-10, shapes-circle, square
    for (offset, gid) in [(0u32, 1u16), (1, 2), (2, 3), (3, 4)] {
        let c = char::from_u32(0xF000 + offset).unwrap();
        assert_eq!(face.glyph_index(c), Some(ttf_parser::GlyphId(gid)));
    }
    let circle = face.glyph_bounding_box(ttf_parser::GlyphId(3)).unwrap();
    assert!(circle.x_max > circle.x_min);

    let css = std::fs::read_to_string(paths.css()).unwrap();
    let first = css.find(".pi-icon-2:before").unwrap();
    let second = css.find(".pi-icon-10:before").unwrap();
    assert!(first < second);
    assert!(css.contains("Pipeline Icons.woff2"));

    let eot = std::fs::read(paths.font(FontFormat::Eot)).unwrap();
    assert!(eot.ends_with(&ttf));
}

#[tokio::test]
async fn test_unreadable_icon_aborts_font_job() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "a.svg", SQUARE);
    write(input.path(), "b.svg", "<svg this is not xml");
    write(input.path(), "c.svg", SQUARE);

    let build = Build::from_options(options(input.path(), output.path())).unwrap();
    let report = match build.run().await {
        Err(Error::Build(report)) => report,
        other => panic!("Expected build failure, got {other:?}"),
    };

    let failure = report.failure_of(Stage::Font(FontFormat::Svg)).unwrap();
    assert!(failure.message.contains("b.svg"), "{}", failure.message);

    let paths = build.config().artifact_paths();
    for format in FontFormat::ALL {
        assert!(!paths.font(format).exists(), "{format} should not exist");
    }
    // Emitters are independent of the font job.
    assert!(paths.css().exists());
    assert!(paths.html().exists());
    assert!(paths.name_map().exists());
}

#[tokio::test]
async fn test_duplicate_names_write_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "arrow.svg", SQUARE);
    write(input.path(), "arrow.xml", SQUARE);

    let out_dir = output.path().join("dist");
    let result = Build::from_options(options(input.path(), &out_dir))
        .unwrap()
        .run()
        .await;

    assert!(matches!(
        result,
        Err(Error::Core(glyphsmith_core::Error::DuplicateName { .. }))
    ));
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn test_missing_input_writes_nothing() {
    let output = TempDir::new().unwrap();
    let out_dir = output.path().join("dist");
    let result = Build::from_options(options(&output.path().join("missing"), &out_dir))
        .unwrap()
        .run()
        .await;

    assert!(matches!(
        result,
        Err(Error::Core(glyphsmith_core::Error::Discovery { .. }))
    ));
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn test_failing_variant_keeps_siblings() {
    struct Broken;

    impl Transcoder for Broken {
        fn format(&self) -> FontFormat {
            FontFormat::Woff
        }

        fn transcode(&self, _input: &[u8]) -> glyphsmith_fonts::Result<Vec<u8>> {
            Err(Error::transcode(FontFormat::Woff, "unsupported table"))
        }
    }

    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "a.svg", SQUARE);

    let chain = TranscodeChain::with_stages(
        Arc::new(SvgFontToTtf),
        vec![Arc::new(Broken), Arc::new(TtfToWoff2), Arc::new(TtfToEot)],
    );
    let build = Build::from_options(options(input.path(), output.path()))
        .unwrap()
        .with_chain(chain);

    let report = match build.run().await {
        Err(Error::Build(report)) => report,
        other => panic!("Expected build failure, got {other:?}"),
    };
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, Stage::Font(FontFormat::Woff));
    assert_eq!(report.written.len(), 7);

    let paths = build.config().artifact_paths();
    assert!(!paths.font(FontFormat::Woff).exists());
    assert!(paths.font(FontFormat::Woff2).exists());
    assert!(paths.font(FontFormat::Eot).exists());
}

#[tokio::test]
async fn test_rebuild_is_reproducible() {
    let input = TempDir::new().unwrap();
    write(input.path(), "z.svg", SQUARE);
    write(input.path(), "m/n.svg", CIRCLE);
    write(input.path(), "a 1.svg", SQUARE);

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let output = TempDir::new().unwrap();
        let build = Build::from_options(options(input.path(), output.path())).unwrap();
        build.run().await.unwrap();

        let paths = build.config().artifact_paths();
        let files: Vec<Vec<u8>> = [
            paths.css(),
            paths.name_map(),
            paths.font(FontFormat::Svg),
            paths.font(FontFormat::Ttf),
            paths.font(FontFormat::Woff),
            paths.font(FontFormat::Woff2),
            paths.font(FontFormat::Eot),
        ]
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();
        outputs.push(files);
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_woff_round_trip_keeps_table_sizes() {
    let svg = r#"<svg><defs><font horiz-adv-x="100"><font-face font-family="W" units-per-em="100" ascent="100" descent="0"/><glyph glyph-name="a" unicode="&#xF000;" horiz-adv-x="100" d="M0 0L100 0L100 100Z"/></font></defs></svg>"#;
    let ttf = SvgFontToTtf.transcode(svg.as_bytes()).unwrap();
    let woff = TtfToWoff.transcode(&ttf).unwrap();

    let total_sfnt = u32::from_be_bytes(woff[16..20].try_into().unwrap());
    assert_eq!(total_sfnt as usize, ttf.len());
}

#[tokio::test]
async fn test_wide_icon_keeps_full_outline() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "banner.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="10"><path d="M0 0H40V10H0Z"/></svg>"#,
    );

    let build = Build::from_options(options(input.path(), output.path())).unwrap();
    build.run().await.unwrap();

    let ttf = std::fs::read(build.config().artifact_paths().font(FontFormat::Ttf)).unwrap();
    let face = ttf_parser::Face::parse(&ttf, 0).unwrap();
    let banner = ttf_parser::GlyphId(1);
    assert_eq!(face.glyph_hor_advance(banner), Some(20000));
    let bbox = face.glyph_bounding_box(banner).unwrap();
    assert_eq!((bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max), (0, 0, 20000, 5000));
}
