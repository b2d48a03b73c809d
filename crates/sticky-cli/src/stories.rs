//! Story catalogue and the search filter applied to it

use serde::Serialize;

/// A story shown in the search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub id: u32,
    pub title: String,
    pub url: String,
    pub author: String,
    pub num_comments: u32,
    pub points: u32,
}

impl Story {
    fn new(id: u32, title: &str, url: &str, author: &str, num_comments: u32, points: u32) -> Self {
        Self {
            id,
            title: title.to_string(),
            url: url.to_string(),
            author: author.to_string(),
            num_comments,
            points,
        }
    }

    /// Case-insensitive substring match on the title
    ///
    /// An empty term matches every story.
    pub fn matches(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(&term.to_lowercase())
    }
}

/// The built-in stories
pub fn catalogue() -> Vec<Story> {
    vec![
        Story::new(0, "React", "https://react.dev/", "Jordan Walke", 3, 4),
        Story::new(
            1,
            "Redux",
            "https://redux.js.org/",
            "Dan Abramov, Andrew Clark",
            2,
            5,
        ),
        Story::new(2, "Angular", "https://angular.dev/", "Misko Hevery", 7, 3),
        Story::new(3, "Vue", "https://vuejs.org/", "Evan You", 5, 6),
        Story::new(
            4,
            "Hacker News Search API",
            "https://hn.algolia.com/api",
            "Algolia",
            1,
            2,
        ),
        Story::new(
            5,
            "The Rust Programming Language",
            "https://doc.rust-lang.org/book/",
            "Steve Klabnik, Carol Nichols",
            12,
            9,
        ),
    ]
}

/// Stories whose titles contain `term`, in catalogue order
pub fn filter<'a>(stories: &'a [Story], term: &str) -> Vec<&'a Story> {
    stories.iter().filter(|story| story.matches(term)).collect()
}
