//! Marketplace brand identifiers.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::ANY_BRAND;

const BRAND_IDS: [(&str, u32); 26] = [
    ("Nike", 53),
    ("Adidas", 14),
    ("Puma", 20),
    ("New Balance", 246),
    ("Jordan", 7592),
    ("Reebok", 88),
    ("Supreme", 435),
    ("Palace", 1178),
    ("Stussy", 441),
    ("BAPE", 976),
    ("Off-White", 2090),
    ("Stone Island", 467),
    ("Carhartt", 45),
    ("The North Face", 94),
    ("Nike x Off-White", 7591),
    ("Yeezy", 8272),
    ("Fear of God", 5429),
    ("Palm Angels", 4783),
    ("Essentials", 9102),
    ("Chrome Hearts", 3421),
    ("Ralph Lauren", 88),
    ("Tommy Hilfiger", 94),
    ("Patagonia", 150),
    ("Arc'teryx", 1543),
    ("Trapstar", 8891),
    ("Corteiz", 9988),
];

/// Every brand the monitor can pick from, including the catch-all.
pub fn known_brands() -> Vec<&'static str> {
    BRAND_IDS
        .iter()
        .map(|(name, _)| *name)
        .chain(std::iter::once(ANY_BRAND))
        .collect()
}

pub fn brand_id(name: &str) -> Option<u32> {
    BRAND_IDS
        .iter()
        .find(|(brand, _)| *brand == name)
        .map(|(_, id)| *id)
}

/// Comma-separated ids for the `brand_ids` query parameter.
///
/// Empty when the catch-all is selected; unknown brands are dropped.
pub fn brand_ids_param<S: AsRef<str>>(brands: &[S]) -> String {
    if brands.iter().any(|b| b.as_ref() == ANY_BRAND) {
        return String::new();
    }
    brands
        .iter()
        .filter_map(|b| brand_id(b.as_ref()))
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn random_brand<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    known_brands().choose(rng).copied().unwrap_or(ANY_BRAND)
}
