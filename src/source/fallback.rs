//! Synthetic listings served when the live marketplace cannot be reached.
//!
//! Everything here is plausible but fake. Ids carry a `demo`/`football`
//! prefix so they are easy to tell apart from live data.

use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use url::form_urlencoded;

use crate::models::{Listing, ShirtSearch};
use crate::utils::money::round2;

/// `(brand, item, low, high)` price band per sample item.
const SAMPLE_ITEMS: [(&str, &str, f64, f64); 25] = [
    ("Nike", "Air Force 1 Low - White", 40.0, 65.0),
    ("Nike", "Dunk Low Panda", 70.0, 95.0),
    ("Nike", "Tech Fleece Joggers", 25.0, 50.0),
    ("Nike", "Vintage Windbreaker Jacket", 15.0, 35.0),
    ("Adidas", "Ultraboost 21 Running Shoes", 40.0, 70.0),
    ("Adidas", "Gazelle Trainers in Green", 30.0, 55.0),
    ("Adidas", "Originals Trefoil Hoodie", 20.0, 40.0),
    ("Supreme", "Box Logo Hoodie FW21", 120.0, 180.0),
    ("Supreme", "Small Box Logo Tee", 30.0, 70.0),
    ("Jordan", "Retro 4 Military Black", 110.0, 170.0),
    ("Jordan", "Retro 1 High Mocha", 130.0, 200.0),
    ("Stone Island", "Ghost Piece Overshirt", 90.0, 150.0),
    ("Stone Island", "Nylon Metal Jacket", 80.0, 180.0),
    ("The North Face", "Nuptse 1996 Puffer Jacket", 80.0, 150.0),
    ("The North Face", "Mountain Light Jacket", 70.0, 120.0),
    ("Ralph Lauren", "Classic Polo Shirt", 15.0, 35.0),
    ("Carhartt", "Detroit Jacket", 35.0, 80.0),
    ("Carhartt", "Double Knee Work Pants", 25.0, 50.0),
    ("Trapstar", "Irongate Puffer Jacket", 80.0, 160.0),
    ("Corteiz", "Alcatraz Cargo Pants", 60.0, 110.0),
    ("Nike", "Manchester United 2021 Home Shirt", 40.0, 70.0),
    ("Adidas", "Arsenal 2020 Away Shirt", 35.0, 65.0),
    ("Adidas", "Real Madrid 2019 Home Jersey", 30.0, 60.0),
    ("Nike", "Barcelona 2017 Home Kit", 25.0, 55.0),
    ("Puma", "Manchester City 2022 Third Kit", 45.0, 75.0),
];

const GENERAL_CONDITIONS: [&str; 4] = ["Like new", "Great condition", "Barely worn", "Good condition"];
const SIZES: [&str; 4] = ["S", "M", "L", "XL"];

const KIT_BRANDS: [&str; 4] = ["Nike", "Adidas", "Puma", "Umbro"];
const KIT_KINDS: [&str; 4] = ["Home", "Away", "Third", "Special Edition"];
const DEFAULT_YEARS: [i32; 6] = [2000, 2005, 2010, 2015, 2020, 2024];
const MAX_SHIRTS: usize = 3;

/// Chance that a sample item is marked down into deal territory.
const MARKDOWN_CHANCE: f64 = 0.3;
const SHIRT_MARKDOWN_CHANCE: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    base_url: String,
    reference_year: i32,
}

impl FallbackGenerator {
    pub fn new(base_url: impl Into<String>, reference_year: i32) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            reference_year,
        }
    }

    pub fn set_reference_year(&mut self, year: i32) {
        self.reference_year = year;
    }

    /// Shuffled sample of popular resale items, about a third marked down.
    pub fn general_listings<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Listing> {
        let stamp = Utc::now().timestamp();
        let mut listings: Vec<Listing> = SAMPLE_ITEMS
            .iter()
            .enumerate()
            .map(|(i, (brand, item, low, high))| {
                let mut price = rng.gen_range(*low..=*high);
                if rng.gen_bool(MARKDOWN_CHANCE) {
                    price *= rng.gen_range(0.6..=0.8);
                }
                let condition = GENERAL_CONDITIONS.choose(rng).copied().unwrap_or("Good condition");
                let size = SIZES.choose(rng).copied().unwrap_or("M");

                Listing::new(
                    format!("demo{}_{}", i, stamp),
                    format!("{} - {}", item, condition),
                    round2(price),
                    *brand,
                    self.search_url(&format!("{} {}", brand, item)),
                )
                .with_size(size)
            })
            .collect();

        listings.shuffle(rng);
        listings
    }

    /// Up to three football shirts spread across the requested year range.
    pub fn football_shirts<R: Rng + ?Sized>(&self, search: &ShirtSearch, rng: &mut R) -> Vec<Listing> {
        let team = search.team_name().to_string();
        let term = search.search_term.to_lowercase();
        let stamp = Utc::now().timestamp();

        shirt_years(search)
            .into_iter()
            .take(MAX_SHIRTS)
            .map(|year| {
                let brand = match search.specific_brand() {
                    Some(b) => b.to_string(),
                    None => KIT_BRANDS.choose(rng).copied().unwrap_or("Nike").to_string(),
                };

                let age = self.reference_year - year;
                let (conditions, factor_range): (&[&str], _) = if age < 3 {
                    (&["Brand New", "Like new", "Excellent condition"], 0.7..=1.0)
                } else if age < 10 {
                    (&["Good condition", "Used but good", "Some wear"], 0.5..=0.8)
                } else {
                    (&["Vintage condition", "Showing age", "Collector's item"], 0.4..=1.2)
                };
                let condition = conditions.choose(rng).copied().unwrap_or("Good condition");

                let mut factor = rng.gen_range(factor_range);
                if term.contains("retro") || term.contains("vintage") {
                    factor *= 1.1;
                }
                if term.contains("special") || term.contains("limited") {
                    factor *= 1.3;
                }
                if rng.gen_bool(SHIRT_MARKDOWN_CHANCE) {
                    factor *= 0.6;
                }
                let price = round2(kit_base_price(&brand) * factor);

                let description = shirt_description(&term, year, rng);
                let id = format!("football_{}_{}", rng.gen_range(1_000_000..=9_999_999), stamp);

                Listing::new(
                    id,
                    format!("{} {} - {}", team, description, condition),
                    price,
                    brand,
                    self.search_url(&format!("{} football shirt", team)),
                )
                .with_size(SIZES.choose(rng).copied().unwrap_or("M"))
                .football_shirt(team.clone(), Some(year))
            })
            .collect()
    }

    fn search_url(&self, text: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
        format!("{}/catalog?search_text={}", self.base_url, encoded)
    }
}

fn shirt_years(search: &ShirtSearch) -> Vec<i32> {
    match (search.min_year, search.max_year) {
        (Some(min), Some(max)) if min <= max => (min..=max).step_by(3).collect(),
        _ => DEFAULT_YEARS.to_vec(),
    }
}

fn kit_base_price(brand: &str) -> f64 {
    match brand {
        "Nike" => 40.0,
        "Adidas" | "New Balance" => 35.0,
        "Puma" => 30.0,
        "Umbro" | "Kappa" | "Other" => 25.0,
        "Macron" => 20.0,
        _ => 30.0,
    }
}

fn shirt_description<R: Rng + ?Sized>(term: &str, year: i32, rng: &mut R) -> String {
    if term.contains("home") {
        format!("{} Home Shirt", year)
    } else if term.contains("away") {
        format!("{} Away Shirt", year)
    } else if term.contains("third") {
        format!("{} Third Kit", year)
    } else if term.contains("training") {
        format!("{} Training Top", year)
    } else {
        let kind = KIT_KINDS.choose(rng).copied().unwrap_or("Home");
        format!("{} {} Shirt", year, kind)
    }
}
