//! `.lay` overlay layout reading.
//!
//! Only the `overlay` element matters:
//!
//! ```xml
//! <element name="overlay">
//!     <rect>
//!         <bounds left="0" top="0" right="224" bottom="260" />
//!         <color red="1" green="1" blue="1" />
//!     </rect>
//! </element>
//! ```

use std::path::Path;

use roxmltree::{Document, Node};
use tracing::trace;

use crate::error::LayoutError;
use crate::orientation::LayoutBounds;
use crate::overlay::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub enum RectRecord {
    /// Color without bounds: covers the whole screen.
    FullScreen { color: Rgb },
    Bounded { bounds: LayoutBounds, color: Rgb },
    /// Bounds without a color, or an empty `<rect>`. Nothing gets drawn.
    Skipped,
}

pub fn read_layout(path: &Path) -> Result<Vec<RectRecord>, LayoutError> {
    let text = std::fs::read_to_string(path)?;
    parse_layout(&text)
}

/// Every `rect` under every `element name="overlay"`, in document order.
pub fn parse_layout(text: &str) -> Result<Vec<RectRecord>, LayoutError> {
    let doc = Document::parse(text)?;

    let overlays = doc
        .descendants()
        .filter(|n| n.has_tag_name("element") && n.attribute("name") == Some("overlay"));

    let mut rects = Vec::new();
    for overlay in overlays {
        for rect in overlay.descendants().filter(|n| n.has_tag_name("rect")) {
            rects.push(parse_rect(rect)?);
        }
    }

    trace!("parsed {} overlay rects", rects.len());
    Ok(rects)
}

fn first_descendant<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants().skip(1).find(|n| n.has_tag_name(tag))
}

fn parse_rect(rect: Node<'_, '_>) -> Result<RectRecord, LayoutError> {
    let bounds = first_descendant(rect, "bounds");
    let color = first_descendant(rect, "color");

    let record = match (bounds, color) {
        (None, Some(color)) => RectRecord::FullScreen { color: parse_color(color)? },
        (Some(bounds), Some(color)) => RectRecord::Bounded {
            bounds: parse_bounds(bounds)?,
            color: parse_color(color)?,
        },
        _ => RectRecord::Skipped,
    };
    Ok(record)
}

fn parse_bounds(node: Node<'_, '_>) -> Result<LayoutBounds, LayoutError> {
    Ok(LayoutBounds {
        left: number(node, "bounds", "left")?,
        top: number(node, "bounds", "top")?,
        right: number(node, "bounds", "right")?,
        bottom: number(node, "bounds", "bottom")?,
    })
}

fn parse_color(node: Node<'_, '_>) -> Result<Rgb, LayoutError> {
    Ok(Rgb {
        red: number(node, "color", "red")?,
        green: number(node, "color", "green")?,
        blue: number(node, "color", "blue")?,
    })
}

fn number(node: Node<'_, '_>, tag: &'static str, attr: &'static str) -> Result<f64, LayoutError> {
    let raw = node
        .attribute(attr)
        .ok_or(LayoutError::MissingAttribute { node: tag, attr })?;

    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LayoutError::InvalidNumber {
            node: tag,
            attr,
            value: raw.to_string(),
        }),
    }
}
