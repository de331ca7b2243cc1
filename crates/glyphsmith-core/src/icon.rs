//! Icon set model and code point allocation
//!
//! An [`IconSet`] is built once per run from the discovered files: names are
//! ordered by the collation policy, checked for duplicates, and assigned
//! consecutive Private Use Area code points. It is immutable afterwards and
//! shared by the font stream and every emitter.

use std::ops::{Deref, RangeInclusive};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::collation::Collation;
use crate::config::BuildConfig;
use crate::discovery::DiscoveredIcon;
use crate::error::{Error, Result};

/// First code point handed out
pub const CODE_POINT_BASE: u32 = 0xF000;

/// Last code point handed out (end of the BMP Private Use Area)
pub const CODE_POINT_LIMIT: u32 = 0xF8FF;

/// One glyph source and everything derived from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconEntry {
    /// Absolute path of the icon file
    pub source_path: PathBuf,
    /// Icon name derived from the relative path
    pub name: String,
    /// Assigned code point
    pub code_point: char,
    /// Icon class: prefix + name
    pub css_class: String,
    /// Class attribute value used in markup (base class first, if any)
    pub html_class: String,
}

impl IconEntry {
    /// Code point as a one-character string
    pub fn glyph(&self) -> String {
        self.code_point.to_string()
    }
}

/// Hands out consecutive code points from a fixed range
#[derive(Debug, Clone)]
pub struct CodePointAllocator {
    range: RangeInclusive<u32>,
    next: u32,
    issued: usize,
}

impl CodePointAllocator {
    /// Allocator over [`CODE_POINT_BASE`]..=[`CODE_POINT_LIMIT`]
    pub fn new() -> Self {
        Self::with_range(CODE_POINT_BASE..=CODE_POINT_LIMIT)
    }

    /// Allocator over a custom range
    pub fn with_range(range: RangeInclusive<u32>) -> Self {
        Self {
            next: *range.start(),
            range,
            issued: 0,
        }
    }

    /// Next code point, or `AllocationOverflow` once the range is spent
    pub fn allocate(&mut self) -> Result<char> {
        let overflow = || Error::AllocationOverflow {
            index: self.issued,
            start: *self.range.start(),
            end: *self.range.end(),
        };

        if !self.range.contains(&self.next) {
            return Err(overflow());
        }
        let code_point = char::from_u32(self.next).ok_or_else(overflow)?;

        self.next += 1;
        self.issued += 1;
        Ok(code_point)
    }
}

impl Default for CodePointAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// The ordered, allocated icon sequence for one build
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    entries: Arc<[IconEntry]>,
}

impl IconSet {
    /// Order, validate, and allocate code points for discovered icons
    pub fn allocate(
        mut icons: Vec<DiscoveredIcon>,
        config: &BuildConfig,
        collation: &dyn Collation,
        mut allocator: CodePointAllocator,
    ) -> Result<Self> {
        icons.sort_by(|a, b| {
            collation
                .compare_total(&a.name, &b.name)
                .then_with(|| a.path.cmp(&b.path))
        });

        // Identical names are adjacent after a total sort.
        if let Some(pair) = icons.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(Error::DuplicateName {
                name: pair[0].name.clone(),
                first: pair[0].path.clone(),
                second: pair[1].path.clone(),
            });
        }

        let mut entries = Vec::with_capacity(icons.len());
        for icon in icons {
            let code_point = allocator.allocate()?;
            let css_class = format!("{}{}", config.prefix, icon.name);
            let html_class = match &config.base_class {
                Some(base) => format!("{base} {css_class}"),
                None => css_class.clone(),
            };
            tracing::debug!("U+{:04X} {}", code_point as u32, icon.name);
            entries.push(IconEntry {
                source_path: icon.path,
                name: icon.name,
                code_point,
                css_class,
                html_class,
            });
        }

        Ok(Self {
            entries: entries.into(),
        })
    }

    /// Entries in allocation order
    pub fn entries(&self) -> &[IconEntry] {
        &self.entries
    }
}

impl Deref for IconSet {
    type Target = [IconEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl FromIterator<IconEntry> for IconSet {
    fn from_iter<T: IntoIterator<Item = IconEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
