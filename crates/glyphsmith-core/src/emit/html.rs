//! Preview page emitter

use serde::Serialize;

use crate::artifacts::relative_path;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::icon::IconSet;

#[derive(Serialize)]
struct PreviewIcon<'a> {
    html_class: &'a str,
    code: String,
}

/// Render the preview page. Every interpolated value is HTML-escaped by the
/// template engine.
pub fn render_html(icons: &IconSet, config: &BuildConfig) -> Result<String> {
    let paths = config.artifact_paths();
    let html_path = paths.html();
    let html_dir = html_path.parent().unwrap_or(paths.output_dir());
    let stylesheet = relative_path(html_dir, &paths.css());

    let icons: Vec<PreviewIcon<'_>> = icons
        .iter()
        .map(|entry| PreviewIcon {
            html_class: &entry.html_class,
            code: format!("{:04X}", entry.code_point as u32),
        })
        .collect();

    let env = super::environment()?;
    let html = env.get_template("preview.html")?.render(minijinja::context! {
        font_name => &config.font_name,
        stylesheet => stylesheet,
        icons => icons,
    })?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildOptions;
    use crate::icon::IconEntry;
    use std::path::PathBuf;

    fn config(font_name: &str) -> BuildConfig {
        BuildOptions {
            input: Some(PathBuf::from("icons")),
            output_dir: Some(PathBuf::from("out")),
            font_name: Some(font_name.to_string()),
            file_stem: Some("icons".to_string()),
            prefix: Some("icon-".to_string()),
            base_class: Some("icon".to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap()
    }

    fn entry(name: &str, code_point: char) -> IconEntry {
        IconEntry {
            source_path: PathBuf::from(format!("icons/{name}.svg")),
            name: name.to_string(),
            code_point,
            css_class: format!("icon-{name}"),
            html_class: format!("icon icon-{name}"),
        }
    }

    #[test]
    fn test_links_stylesheet_relative() {
        let config = config("Icons");
        let html = render_html(&IconSet::default(), &config).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"icons.css\">"));
    }

    #[test]
    fn test_one_cell_per_icon() {
        let config = config("Icons");
        let set: IconSet = vec![entry("home", '\u{F000}'), entry("star", '\u{F001}')]
            .into_iter()
            .collect();
        let html = render_html(&set, &config).unwrap();

        assert_eq!(html.matches("class=\"gs__icon-link\"").count(), 2);
        assert!(html.contains("<i class=\"icon icon-home\"></i>"));
        assert!(html.contains("<span class=\"gs__classname\">icon icon-star</span>"));
        assert!(html.contains("title=\"U+F001\""));
    }

    #[test]
    fn test_escapes_font_name() {
        let config = config("<Icons & \"Co\">");
        let html = render_html(&IconSet::default(), &config).unwrap();
        assert!(!html.contains("<Icons"));
        assert!(html.contains("&lt;Icons &amp; &quot;Co&quot;&gt; Preview</title>"));
    }

    #[test]
    fn test_escapes_class_names() {
        let config = config("Icons");
        let mut hostile = entry("x", '\u{F000}');
        hostile.html_class = "icon icon-\"><script>".to_string();
        let set: IconSet = std::iter::once(hostile).collect();
        let html = render_html(&set, &config).unwrap();
        assert!(!html.contains("\"><script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
