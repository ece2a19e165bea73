use std::collections::HashMap;

use crate::models::{Category, Item};

/// Read-only supply of candidate items per category.
///
/// The mapping is fixed at construction time; test doubles substitute their
/// own pools trivially.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<Category, Vec<Item>>,
}

impl Catalog {
    pub fn new(items: HashMap<Category, Vec<Item>>) -> Self {
        Self { items }
    }

    /// The candidate pool for a category, in its defined order. Empty if the
    /// catalog carries nothing for the category.
    pub fn items(&self, category: Category) -> &[Item] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The built-in onboarding pool: six well-known items per category.
    pub fn sample() -> Self {
        fn entry(id: u32, title: &str, category: Category, genre: &str) -> Item {
            Item {
                id: id.to_string(),
                title: title.to_string(),
                category,
                genre: genre.to_string(),
                description: None,
                rating: None,
                image_url: None,
            }
        }

        let mut items = HashMap::new();
        items.insert(
            Category::Movies,
            vec![
                entry(1, "The Dark Knight", Category::Movies, "Action"),
                entry(2, "Inception", Category::Movies, "Sci-Fi"),
                entry(3, "The Godfather", Category::Movies, "Drama"),
                entry(4, "Pulp Fiction", Category::Movies, "Crime"),
                entry(5, "Interstellar", Category::Movies, "Sci-Fi"),
                entry(6, "The Shawshank Redemption", Category::Movies, "Drama"),
            ],
        );
        items.insert(
            Category::Books,
            vec![
                entry(7, "Dune", Category::Books, "Sci-Fi"),
                entry(8, "The Hobbit", Category::Books, "Fantasy"),
                entry(9, "1984", Category::Books, "Dystopian"),
                entry(10, "To Kill a Mockingbird", Category::Books, "Drama"),
                entry(11, "Harry Potter", Category::Books, "Fantasy"),
                entry(12, "The Great Gatsby", Category::Books, "Classic"),
            ],
        );
        items.insert(
            Category::Tv,
            vec![
                entry(13, "Breaking Bad", Category::Tv, "Drama"),
                entry(14, "Stranger Things", Category::Tv, "Sci-Fi"),
                entry(15, "The Office", Category::Tv, "Comedy"),
                entry(16, "Game of Thrones", Category::Tv, "Fantasy"),
                entry(17, "Friends", Category::Tv, "Comedy"),
                entry(18, "The Crown", Category::Tv, "Drama"),
            ],
        );
        items.insert(
            Category::Podcast,
            vec![
                entry(19, "Serial", Category::Podcast, "True Crime"),
                entry(20, "This American Life", Category::Podcast, "Storytelling"),
                entry(21, "Joe Rogan Experience", Category::Podcast, "Interview"),
                entry(22, "Radiolab", Category::Podcast, "Science"),
                entry(23, "My Favorite Murder", Category::Podcast, "True Crime"),
                entry(24, "Conan O'Brien Needs a Friend", Category::Podcast, "Comedy"),
            ],
        );
        Self { items }
    }
}
