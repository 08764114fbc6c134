use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    General,
    FootballShirt,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::FootballShirt => "football_shirt",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "general" | "other" => Ok(Category::General),
            "football_shirt" => Ok(Category::FootballShirt),
            other => Err(format!("Unknown listing category: {}", other)),
        }
    }
}

/// A marketplace listing as fetched. Never mutated after the source hands it over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub brand: String,
    pub size: Option<String>,
    #[serde(default)]
    pub category: Category,
    pub url: String,
    pub photo: Option<String>,
    pub team: Option<String>,
    pub year: Option<i32>,
}

impl Listing {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: f64,
        brand: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            brand: brand.into(),
            size: None,
            category: Category::General,
            url: url.into(),
            photo: None,
            team: None,
            year: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Tag as a football shirt with its team and (if known) season year.
    pub fn football_shirt(mut self, team: impl Into<String>, year: Option<i32>) -> Self {
        self.category = Category::FootballShirt;
        self.team = Some(team.into());
        self.year = year;
        self
    }

    /// Enough signal to be priced at all.
    pub fn is_priceable(&self) -> bool {
        !self.title.trim().is_empty() && self.price > 0.0
    }
}
