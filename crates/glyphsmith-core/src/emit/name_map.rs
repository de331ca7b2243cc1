//! Name map emitter
//!
//! Maps a script-friendly form of each icon name to its markup class string:
//!
//! ```text
//! export default {
//!     "weatherRain": "icon icon-weather-rain"
//! };
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::escape;
use crate::icon::IconSet;

/// Build the identifier → class map.
///
/// Names that camel-case to the same identifier collide; the later icon
/// wins and keeps the earlier key position.
pub fn build_name_map(icons: &IconSet) -> Map<String, Value> {
    let mut map = Map::new();
    for entry in icons.iter() {
        let key = escape::camel_case(&entry.name);
        if let Some(previous) = map.insert(key.clone(), Value::String(entry.html_class.clone())) {
            tracing::warn!(
                "Name map key '{}' for '{}' replaces {}",
                key,
                entry.name,
                previous
            );
        }
    }
    map
}

/// Render the name map as an ES module default export
pub fn render_name_map(icons: &IconSet) -> Result<String> {
    let map = build_name_map(icons);

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    map.serialize(&mut serializer)?;

    // serde_json only ever emits valid UTF-8.
    let json = String::from_utf8_lossy(&buf);
    Ok(format!("export default {json};"))
}
