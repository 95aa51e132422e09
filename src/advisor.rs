//! Static crop and fertilizer advice
//!
//! Two small case-insensitive tables with a fixed fallback message each.
//! Input is lowercased but otherwise taken verbatim, so `" loamy"` misses.

/// Message returned for an unknown soil type
pub const NO_CROP_FOUND: &str = "No matching crop found.";

/// Message returned for an unknown crop
pub const NO_FERTILIZER_FOUND: &str = "No fertilizer found.";

/// A fixed key→advice table with a fallback
#[derive(Debug, Clone, Copy)]
pub struct RecommendationMap {
    entries: &'static [(&'static str, &'static str)],
    fallback: &'static str,
}

impl RecommendationMap {
    pub const fn new(
        entries: &'static [(&'static str, &'static str)],
        fallback: &'static str,
    ) -> Self {
        Self { entries, fallback }
    }

    /// Advice for `key`, matched case-insensitively; the fallback otherwise
    pub fn lookup(&self, key: &str) -> &'static str {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(self.fallback)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(k, _)| *k)
    }
}

/// Soil type → suggested crops
pub const SOIL_TO_CROP: RecommendationMap = RecommendationMap::new(
    &[
        ("loamy", "Rice, Wheat"),
        ("sandy", "Groundnut, Potato"),
        ("clay", "Paddy, Sugarcane"),
        ("black", "Cotton, Soybean"),
    ],
    NO_CROP_FOUND,
);

/// Crop → suggested fertilizer
pub const CROP_TO_FERTILIZER: RecommendationMap = RecommendationMap::new(
    &[
        ("rice", "Urea + DAP"),
        ("wheat", "Urea + MOP"),
        ("maize", "NPK 20-20-20"),
        ("cotton", "NPK + Potash"),
    ],
    NO_FERTILIZER_FOUND,
);

pub fn recommend_crop(soil_type: &str) -> &'static str {
    SOIL_TO_CROP.lookup(soil_type)
}

pub fn recommend_fertilizer(crop: &str) -> &'static str {
    CROP_TO_FERTILIZER.lookup(crop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_table() {
        assert_eq!(recommend_crop("loamy"), "Rice, Wheat");
        assert_eq!(recommend_crop("sandy"), "Groundnut, Potato");
        assert_eq!(recommend_crop("clay"), "Paddy, Sugarcane");
        assert_eq!(recommend_crop("black"), "Cotton, Soybean");
    }

    #[test]
    fn test_fertilizer_table() {
        assert_eq!(recommend_fertilizer("rice"), "Urea + DAP");
        assert_eq!(recommend_fertilizer("wheat"), "Urea + MOP");
        assert_eq!(recommend_fertilizer("maize"), "NPK 20-20-20");
        assert_eq!(recommend_fertilizer("cotton"), "NPK + Potash");
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(recommend_crop("CLAY"), "Paddy, Sugarcane");
        assert_eq!(recommend_crop("Black"), "Cotton, Soybean");
        assert_eq!(recommend_fertilizer("MaIzE"), "NPK 20-20-20");
    }

    #[test]
    fn test_unknown_keys_fall_back() {
        assert_eq!(recommend_crop("volcanic"), NO_CROP_FOUND);
        assert_eq!(recommend_crop(""), NO_CROP_FOUND);
        assert_eq!(recommend_fertilizer("banana"), NO_FERTILIZER_FOUND);
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        assert_eq!(recommend_crop(" loamy"), NO_CROP_FOUND);
        assert_eq!(recommend_fertilizer("rice "), NO_FERTILIZER_FOUND);
    }

    #[test]
    fn test_keys_are_lowercase() {
        for key in SOIL_TO_CROP.keys().chain(CROP_TO_FERTILIZER.keys()) {
            assert_eq!(key, key.to_lowercase());
        }
    }
}
