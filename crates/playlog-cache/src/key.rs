//! Cache key builders for playlog data types
//!
//! Keys follow the `<domain>:<type>:<identifier>` convention so that
//! different consumers never collide on key space. Every consumer goes
//! through one of the fixed builders below rather than formatting keys
//! by hand.

use std::fmt;

/// A namespaced cache key of the form `<domain>:<type>:<identifier>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a game record looked up by its URL slug
    pub fn game_by_slug(slug: &str) -> Self {
        Self(format!("game:slug:{slug}"))
    }

    /// Key for a game record looked up by its numeric identifier
    pub fn game_by_id(id: u64) -> Self {
        Self(format!("game:id:{id}"))
    }

    /// Key for a page of search results
    ///
    /// The query is trimmed and lowercased so that cosmetic variations of
    /// the same search share one entry.
    pub fn search_results(query: &str) -> Self {
        Self(format!("search:query:{}", query.trim().to_lowercase()))
    }

    /// Key for a page of the popular-games listing
    pub fn popular_games(page: u32) -> Self {
        Self(format!("games:popular:{page}"))
    }

    /// Key for a page of the recently-released listing
    pub fn recent_games(page: u32) -> Self {
        Self(format!("games:recent:{page}"))
    }

    /// Key for a user profile record
    pub fn user_profile(user_id: u64) -> Self {
        Self(format!("user:profile:{user_id}"))
    }

    /// Key for the list of games tracked by a user
    pub fn user_games(user_id: u64) -> Self {
        Self(format!("user:games:{user_id}"))
    }

    /// The key as stored in both tiers
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_keys_are_namespaced() {
        assert_eq!(CacheKey::game_by_slug("zelda-botw").as_str(), "game:slug:zelda-botw");
        assert_eq!(CacheKey::game_by_id(42).as_str(), "game:id:42");
    }

    #[test]
    fn test_search_key_normalizes_query() {
        let key = CacheKey::search_results("  Hollow Knight ");
        assert_eq!(key.as_str(), "search:query:hollow knight");
        assert_eq!(key, CacheKey::search_results("hollow knight"));
    }

    #[test]
    fn test_listing_and_user_keys() {
        assert_eq!(CacheKey::popular_games(2).as_str(), "games:popular:2");
        assert_eq!(CacheKey::recent_games(1).as_str(), "games:recent:1");
        assert_eq!(CacheKey::user_profile(7).as_str(), "user:profile:7");
        assert_eq!(CacheKey::user_games(7).as_str(), "user:games:7");
    }

    #[test]
    fn test_different_domains_never_collide() {
        let keys = [
            CacheKey::game_by_slug("7"),
            CacheKey::game_by_id(7),
            CacheKey::user_profile(7),
            CacheKey::user_games(7),
        ];
        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }
}
