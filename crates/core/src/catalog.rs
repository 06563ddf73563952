//! Element catalog - presentation metadata for the palette
//!
//! Static lookups from [`Element`] to display name, emoji fallback glyph, and
//! image-asset key. The matches are exhaustive over the closed enum, so a new
//! element variant fails compilation here until its metadata exists. Lookups
//! take `Option<Element>` so an empty cell renders through the same path as an
//! occupied one; the `None` arm carries the reference fallbacks.

use crate::types::Element;

/// Human-readable element name
pub fn display_name(element: Option<Element>) -> &'static str {
    match element {
        Some(Element::GreenFish) => "Green Fish",
        Some(Element::RedFish) => "Clownfish",
        Some(Element::BlueFish) => "Blue Fish",
        Some(Element::Bab) => "Bab",
        None => "Unknown Element",
    }
}

/// Emoji glyph used when no image assets are available
pub fn emoji(element: Option<Element>) -> &'static str {
    match element {
        Some(Element::GreenFish) => "\u{1F41F}",
        Some(Element::RedFish) => "\u{1F420}",
        Some(Element::BlueFish) => "\u{1F41F}",
        Some(Element::Bab) => "\u{1F997}",
        None => "\u{2753}",
    }
}

/// Image-asset key for a presentation layer with bitmap assets
pub fn asset_key(element: Option<Element>) -> &'static str {
    match element {
        Some(Element::GreenFish) => "fish/green",
        Some(Element::RedFish) => "fish/red",
        Some(Element::BlueFish) => "fish/blue",
        Some(Element::Bab) => "fish/bab",
        // The reference falls back to the green fish sprite.
        None => "fish/green",
    }
}
