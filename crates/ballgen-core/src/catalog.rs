//! Fixed topic and category pools used for random content requests.

use rand::Rng;
use rand::seq::SliceRandom;

use ballgen_types::content::{ContentKind, ContentRequest};

/// Ball varieties a piece can be about.
pub const BALL_TYPES: &[&str] = &[
    "basketball",
    "soccer ball",
    "tennis ball",
    "baseball",
    "volleyball",
    "bouncy ball",
    "ping pong ball",
    "golf ball",
    "rugby ball",
    "cricket ball",
    "beach ball",
    "pool ball",
    "bowling ball",
    "medicine ball",
    "football",
    "softball",
    "lacrosse ball",
    "hockey puck",
    "kickball",
    "dodgeball",
];

/// Newsroom sections a satirical article can be filed under.
pub const NEWS_CATEGORIES: &[&str] = &[
    "breaking news",
    "exclusive",
    "investigation",
    "sports",
    "technology",
    "entertainment",
    "science",
    "local news",
    "international",
    "business",
];

/// Category used for stories when nothing better is known.
pub const DEFAULT_STORY_CATEGORY: &str = "general";

pub fn random_topic<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    BALL_TYPES.choose(rng).copied().unwrap_or("ball")
}

pub fn random_news_category<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    NEWS_CATEGORIES.choose(rng).copied().unwrap_or("breaking news")
}

/// Build a request with a random topic; articles also get a random category.
pub fn random_request<R: Rng + ?Sized>(kind: ContentKind, rng: &mut R) -> ContentRequest {
    let request = ContentRequest::new(kind, random_topic(rng));
    match kind {
        ContentKind::Article => request.with_category(random_news_category(rng)),
        ContentKind::Story => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pools_have_expected_sizes() {
        assert_eq!(BALL_TYPES.len(), 20);
        assert_eq!(NEWS_CATEGORIES.len(), 10);
    }

    #[test]
    fn test_random_request_story_has_no_category() {
        let mut rng = StdRng::seed_from_u64(7);
        let request = random_request(ContentKind::Story, &mut rng);
        assert!(BALL_TYPES.contains(&request.topic.as_str()));
        assert!(request.category.is_none());
    }

    #[test]
    fn test_random_request_article_picks_category() {
        let mut rng = StdRng::seed_from_u64(7);
        let request = random_request(ContentKind::Article, &mut rng);
        let category = request.category.unwrap();
        assert!(NEWS_CATEGORIES.contains(&category.as_str()));
    }

    #[test]
    fn test_random_request_is_deterministic_for_seed() {
        let a = random_request(ContentKind::Article, &mut StdRng::seed_from_u64(42));
        let b = random_request(ContentKind::Article, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
