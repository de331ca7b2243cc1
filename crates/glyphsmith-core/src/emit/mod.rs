//! Web artifact emitters
//!
//! Each emitter is a pure function from the allocated [`IconSet`] and the
//! build configuration to the artifact's text. Writing the text to disk is
//! the caller's job, so emitters are testable without any file IO and can
//! run in any order relative to the font pipeline.

mod css;
mod html;
mod name_map;

use std::path::PathBuf;

use minijinja::Environment;

use crate::config::BuildConfig;
use crate::error::Result;
use crate::escape;
use crate::icon::IconSet;
use crate::report::Stage;

pub use css::render_css;
pub use html::render_html;
pub use name_map::{build_name_map, render_name_map};

const STYLE_TEMPLATE: &str = include_str!("templates/style.css");
const PREVIEW_TEMPLATE: &str = include_str!("templates/preview.html");

/// The three text artifacts of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emitter {
    /// Style sheet
    Css,
    /// Preview page
    Html,
    /// Name → class map
    NameMap,
}

impl Emitter {
    /// Every emitter
    pub const ALL: [Emitter; 3] = [Emitter::Css, Emitter::Html, Emitter::NameMap];

    /// Render this artifact
    pub fn render(self, icons: &IconSet, config: &BuildConfig) -> Result<String> {
        match self {
            Emitter::Css => render_css(icons, config),
            Emitter::Html => render_html(icons, config),
            Emitter::NameMap => render_name_map(icons),
        }
    }

    /// Destination of this artifact
    pub fn path(self, config: &BuildConfig) -> PathBuf {
        let paths = config.artifact_paths();
        match self {
            Emitter::Css => paths.css(),
            Emitter::Html => paths.html(),
            Emitter::NameMap => paths.name_map(),
        }
    }

    /// Report stage for this artifact
    pub fn stage(self) -> Stage {
        match self {
            Emitter::Css => Stage::Css,
            Emitter::Html => Stage::Html,
            Emitter::NameMap => Stage::NameMap,
        }
    }
}

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("css_ident", |value: String| escape::css_identifier(&value));
    env.add_filter("css_string", |value: String| escape::css_string(&value));
    env.add_template("style.css", STYLE_TEMPLATE)?;
    env.add_template("preview.html", PREVIEW_TEMPLATE)?;
    Ok(env)
}
