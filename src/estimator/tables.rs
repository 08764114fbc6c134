//! Static pricing tables. Built once at startup and shared read-only.

use std::collections::HashMap;

/// Title keywords → base resale price. Order matters: the first keyword found wins.
const ITEM_KEYWORDS: &[(&str, f64)] = &[
    ("hoodie", 60.0),
    ("jacket", 80.0),
    ("puffer", 100.0),
    ("nuptse", 120.0),
    ("shoes", 70.0),
    ("trainers", 65.0),
    ("shirt", 40.0),
    ("jersey", 50.0),
    ("tee", 35.0),
    ("joggers", 45.0),
    ("pants", 50.0),
    ("hat", 25.0),
    ("cap", 25.0),
    ("box logo", 150.0),
];

const BRAND_MULTIPLIERS: &[(&str, f64)] = &[
    ("Nike", 1.3),
    ("Adidas", 1.2),
    ("Jordan", 1.8),
    ("Supreme", 2.0),
    ("The North Face", 1.5),
    ("Stone Island", 1.7),
    ("Puma", 1.1),
    ("New Balance", 1.2),
    ("Carhartt", 1.3),
    ("Ralph Lauren", 1.1),
    ("Trapstar", 1.6),
    ("Corteiz", 1.4),
];

/// Teams, seasons, editions and players that lift a football shirt's value.
const SHIRT_MODIFIERS: &[(&str, f64)] = &[
    // Premier League
    ("Manchester United", 1.2),
    ("Liverpool", 1.15),
    ("Arsenal", 1.1),
    ("Chelsea", 1.1),
    ("Manchester City", 1.05),
    // European clubs
    ("Barcelona", 1.25),
    ("Real Madrid", 1.2),
    ("Bayern Munich", 1.15),
    ("Juventus", 1.1),
    ("PSG", 1.05),
    // Seasons
    ("treble", 1.5),
    ("champions", 1.3),
    ("invincibles", 1.8),
    ("final", 1.4),
    // Editions
    ("limited edition", 1.6),
    ("special", 1.4),
    ("collectors", 1.5),
    // Players
    ("messi", 1.5),
    ("ronaldo", 1.5),
    ("beckham", 1.4),
    ("gerrard", 1.3),
    ("henry", 1.3),
    ("cantona", 1.4),
    ("zidane", 1.3),
];

/// Team names already priced through the team modifier; never counted again from the title.
const TEAM_DENYLIST: &[&str] = &["manchester united", "liverpool", "arsenal", "chelsea"];

/// Condition tiers, checked in order.
const CONDITION_TIERS: &[(&[&str], f64)] = &[
    (&["new", "brand new", "with tags"], 1.3),
    (&["excellent", "like new"], 1.2),
    (&["good"], 1.1),
    (&["poor", "damaged", "stained"], 0.7),
];

#[derive(Debug, Clone, PartialEq)]
pub struct AgeTiers {
    /// More than 20 years old.
    pub vintage: f64,
    /// 11 to 20 years.
    pub older: f64,
    /// 6 to 10 years.
    pub recent: f64,
    /// 0 to 5 years.
    pub current: f64,
    /// No year, or a year in the future.
    pub unknown: f64,
}

impl AgeTiers {
    pub fn modifier(&self, age: Option<i32>) -> f64 {
        match age {
            Some(age) if age > 20 => self.vintage,
            Some(age) if age > 10 => self.older,
            Some(age) if age > 5 => self.recent,
            Some(age) if age >= 0 => self.current,
            _ => self.unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneralTables {
    pub default_base_price: f64,
    pub brand_multipliers: HashMap<String, f64>,
    pub item_keywords: Vec<(String, f64)>,
    pub variance_min: f64,
    pub variance_max: f64,
}

#[derive(Debug, Clone)]
pub struct CollectibleTables {
    pub markup: f64,
    pub modifiers: Vec<(String, f64)>,
    pub team_denylist: Vec<String>,
    pub age_tiers: AgeTiers,
    pub condition_tiers: Vec<(Vec<String>, f64)>,
    pub ceiling_factor: f64,
    pub floor_factor: f64,
    pub floor_offset: f64,
}

#[derive(Debug, Clone)]
pub struct PricingTables {
    pub general: GeneralTables,
    pub collectible: CollectibleTables,
}

impl PricingTables {
    pub fn standard() -> Self {
        let general = GeneralTables {
            default_base_price: 50.0,
            brand_multipliers: BRAND_MULTIPLIERS
                .iter()
                .map(|(brand, m)| (brand.to_string(), *m))
                .collect(),
            item_keywords: ITEM_KEYWORDS
                .iter()
                .map(|(kw, price)| (kw.to_string(), *price))
                .collect(),
            variance_min: 0.8,
            variance_max: 1.2,
        };

        let collectible = CollectibleTables {
            markup: 1.6,
            modifiers: SHIRT_MODIFIERS
                .iter()
                .map(|(key, m)| (key.to_string(), *m))
                .collect(),
            team_denylist: TEAM_DENYLIST.iter().map(|t| t.to_string()).collect(),
            age_tiers: AgeTiers {
                vintage: 1.8,
                older: 1.5,
                recent: 1.3,
                current: 1.1,
                unknown: 1.2,
            },
            condition_tiers: CONDITION_TIERS
                .iter()
                .map(|(words, m)| (words.iter().map(|w| w.to_string()).collect(), *m))
                .collect(),
            ceiling_factor: 4.5,
            floor_factor: 1.4,
            floor_offset: 10.0,
        };

        Self {
            general,
            collectible,
        }
    }
}

impl Default for PricingTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl GeneralTables {
    pub fn brand_multiplier(&self, brand: &str) -> f64 {
        self.brand_multipliers.get(brand).copied().unwrap_or(1.0)
    }

    /// First keyword contained in the (lower-cased) title.
    pub fn keyword_price(&self, title: &str) -> Option<(&str, f64)> {
        let title = title.to_lowercase();
        self.item_keywords
            .iter()
            .find(|(kw, _)| title.contains(kw.as_str()))
            .map(|(kw, price)| (kw.as_str(), *price))
    }

    /// Base price before market variance.
    pub fn base_price(&self, brand: &str, title: &str) -> f64 {
        let multiplier = self.brand_multiplier(brand);
        match self.keyword_price(title) {
            Some((_, keyword_price)) => keyword_price * multiplier,
            None => self.default_base_price * multiplier,
        }
    }
}

impl CollectibleTables {
    pub fn team_modifier(&self, team: Option<&str>) -> f64 {
        let Some(team) = team else {
            return 1.0;
        };
        self.modifiers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(team.trim()))
            .map(|(_, m)| *m)
            .unwrap_or(1.0)
    }

    /// Product of every non-denylisted modifier key found in the title.
    pub fn special_modifier(&self, title: &str) -> f64 {
        let title = title.to_lowercase();
        self.modifiers
            .iter()
            .map(|(key, m)| (key.to_lowercase(), *m))
            .filter(|(key, _)| title.contains(key.as_str()))
            .filter(|(key, _)| !self.team_denylist.iter().any(|t| t == key))
            .map(|(_, m)| m)
            .product()
    }

    pub fn condition_modifier(&self, title: &str) -> f64 {
        let title = title.to_lowercase();
        self.condition_tiers
            .iter()
            .find(|(words, _)| words.iter().any(|w| title.contains(w.as_str())))
            .map(|(_, m)| *m)
            .unwrap_or(1.0)
    }

    pub fn floor(&self, price: f64) -> f64 {
        price * self.floor_factor + self.floor_offset
    }

    pub fn ceiling(&self, price: f64) -> f64 {
        price * self.ceiling_factor
    }
}
