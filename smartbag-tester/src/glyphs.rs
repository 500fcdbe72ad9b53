//! Icon keys from the catalog mapped to terminal glyphs.

/// Shown for any icon key without a dedicated glyph.
pub const DEFAULT_GLYPH: &str = "🛍";

#[must_use]
pub fn glyph_for(icon: &str) -> &'static str {
    match icon.trim().to_ascii_lowercase().as_str() {
        "milk" => "🥛",
        "egg" | "eggs" => "🥚",
        "croissant" | "bread" => "🥐",
        "wheat" | "cereal" => "🌾",
        "banana" => "🍌",
        "beef" | "meat" => "🥩",
        "citrus" => "🍋",
        "leaf" | "produce" => "🥬",
        "spray-can" => "🧴",
        "snowflake" => "❄",
        _ => DEFAULT_GLYPH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_icons_have_glyphs() {
        let catalog = smartbag_engine::Catalog::load_default().unwrap();
        for item in &catalog.items {
            assert_ne!(glyph_for(&item.icon), DEFAULT_GLYPH, "{}", item.icon);
        }
    }

    #[test]
    fn unknown_icons_fall_back_to_shopping_bag() {
        assert_eq!(glyph_for("rocket"), DEFAULT_GLYPH);
        assert_eq!(glyph_for(""), DEFAULT_GLYPH);
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(glyph_for(" Milk "), glyph_for("milk"));
    }
}
