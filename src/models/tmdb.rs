use serde::{Deserialize, Serialize};
use serde_json::json;

/// A movie record as returned by the TMDB API. Fields beyond the id and
/// title are optional because the search and details endpoints disagree on
/// which attributes they include.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<i64>>,
}

impl TmdbMovie {
    /// Collects the non-identity attributes into the metadata blob stored
    /// alongside the cached media row.
    pub fn metadata_blob(&self) -> serde_json::Value {
        json!({
            "original_title": self.original_title,
            "overview": self.overview,
            "poster_path": self.poster_path,
            "backdrop_path": self.backdrop_path,
            "release_date": self.release_date,
            "vote_average": self.vote_average,
            "vote_count": self.vote_count,
            "popularity": self.popularity,
            "adult": self.adult,
            "original_language": self.original_language,
            "genre_ids": self.genre_ids,
        })
    }
}

/// One page of TMDB search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbSearchPage {
    pub page: i64,
    pub results: Vec<TmdbMovie>,
    pub total_pages: i64,
    pub total_results: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_result() {
        let raw = r#"{
            "id": 27205,
            "title": "Inception",
            "overview": "A thief who steals corporate secrets.",
            "poster_path": "/inception.jpg",
            "release_date": "2010-07-16",
            "vote_average": 8.4,
            "genre_ids": [28, 878]
        }"#;

        let movie: TmdbMovie = serde_json::from_str(raw).unwrap();
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.genre_ids, Some(vec![28, 878]));
        assert_eq!(movie.original_title, None);
    }

    #[test]
    fn test_deserialize_minimal_details() {
        // The details endpoint omits genre_ids entirely.
        let raw = r#"{"id": 603, "title": "The Matrix"}"#;
        let movie: TmdbMovie = serde_json::from_str(raw).unwrap();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.vote_average, None);
    }

    #[test]
    fn test_metadata_blob_carries_attributes() {
        let movie = TmdbMovie {
            id: 603,
            title: "The Matrix".to_string(),
            original_title: Some("The Matrix".to_string()),
            overview: Some("Welcome to the real world.".to_string()),
            poster_path: None,
            backdrop_path: None,
            release_date: Some("1999-03-31".to_string()),
            vote_average: Some(8.2),
            vote_count: Some(24000),
            popularity: Some(80.1),
            adult: Some(false),
            original_language: Some("en".to_string()),
            genre_ids: Some(vec![28]),
        };

        let blob = movie.metadata_blob();
        assert_eq!(blob["overview"], "Welcome to the real world.");
        assert_eq!(blob["release_date"], "1999-03-31");
        // Identity fields live on the row, not in the blob.
        assert!(blob.get("id").is_none());
        assert!(blob.get("title").is_none());
    }
}
