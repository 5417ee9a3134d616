//! Tag de-duplication and deterministic tag colors.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::models::{SpecRun, Tag};

/// Tags across the given specs in first-seen order, de-duplicated by id.
///
/// Two tags sharing a name but not an id are both kept.
pub fn unique_tags<'a>(spec_runs: impl IntoIterator<Item = &'a SpecRun>) -> Vec<Tag> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for spec in spec_runs {
        for tag in &spec.tags {
            if seen.insert(tag.id) {
                tags.push(tag.clone());
            }
        }
    }

    tags
}

/// A tag paired with its display color.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ColoredTag {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// [`unique_tags`] with a color attached to each tag.
pub fn colored_unique_tags<'a>(
    spec_runs: impl IntoIterator<Item = &'a SpecRun>,
) -> Vec<ColoredTag> {
    unique_tags(spec_runs)
        .into_iter()
        .map(|tag| ColoredTag {
            color: tag_color(&tag.name),
            id: tag.id,
            name: tag.name,
        })
        .collect()
}

/// Stable `#rrggbb` color for a tag name.
///
/// The name's SHA-256 digest picks hue, saturation and lightness, so equal
/// names always share a color while short distinct names rarely collide.
/// Saturation and lightness stay in a band that reads on light and dark themes.
pub fn tag_color(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());

    let hue = u16::from_be_bytes([digest[0], digest[1]]) % 360;
    let saturation = 50 + digest[2] % 36; // 50..=85
    let lightness = 40 + digest[3] % 21; // 40..=60

    let rgb = hsl_to_rgb(
        f64::from(hue),
        f64::from(saturation) / 100.0,
        f64::from(lightness) / 100.0,
    );
    format!("#{}", hex::encode(rgb))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r1), channel(g1), channel(b1)]
}
