use serde::{Deserialize, Serialize};

/// Top-level media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Books,
    Movies,
    Tv,
    Podcast,
}

impl Category {
    pub const ALL: &[Category] = &[Self::Books, Self::Movies, Self::Tv, Self::Podcast];

    /// Query-string value used by the recommendation API and the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Movies => "movies",
            Self::Tv => "tv",
            Self::Podcast => "podcast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "books" => Some(Self::Books),
            "movies" => Some(Self::Movies),
            "tv" => Some(Self::Tv),
            "podcast" => Some(Self::Podcast),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recommendable media item.
///
/// Identity is `id`, scoped within the item's category. Items are immutable
/// once produced by a provider; batches are replaced wholesale, never
/// patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub genre: String,
    pub description: Option<String>,
    /// 0-10 scale.
    pub rating: Option<f32>,
    pub image_url: Option<String>,
}

/// The active category/genre pair driving dashboard queries.
///
/// `genre` is meaningful only while `category` is set; both are cleared
/// together when the category changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub category: Option<Category>,
    pub genre: Option<String>,
}
