//! Style sheet emitter

use serde::Serialize;

use crate::artifacts::{FontFormat, relative_path};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::icon::IconSet;

#[derive(Serialize)]
struct FontSources {
    svg: String,
    ttf: String,
    woff: String,
    woff2: String,
    eot: String,
}

#[derive(Serialize)]
struct CssIcon<'a> {
    css_class: &'a str,
    glyph: String,
}

/// Render the style sheet: one `@font-face`, one shared font rule, and one
/// `:before` rule per icon.
pub fn render_css(icons: &IconSet, config: &BuildConfig) -> Result<String> {
    let paths = config.artifact_paths();
    let css_path = paths.css();
    let css_dir = css_path.parent().unwrap_or(paths.output_dir());
    let source = |format| relative_path(css_dir, &paths.font(format));

    let sources = FontSources {
        svg: source(FontFormat::Svg),
        ttf: source(FontFormat::Ttf),
        woff: source(FontFormat::Woff),
        woff2: source(FontFormat::Woff2),
        eot: source(FontFormat::Eot),
    };

    let icons: Vec<CssIcon<'_>> = icons
        .iter()
        .map(|entry| CssIcon {
            css_class: &entry.css_class,
            glyph: entry.glyph(),
        })
        .collect();

    let env = super::environment()?;
    let css = env.get_template("style.css")?.render(minijinja::context! {
        font_name => &config.font_name,
        prefix => &config.prefix,
        base_class => &config.base_class,
        sources => sources,
        icons => icons,
    })?;
    Ok(css)
}
