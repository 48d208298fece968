use popcorn_models::{MovieDetails, MovieSummary};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;

// Message the API uses for a miss; also the fallback when the payload says
// "False" without an Error field.
const NOT_FOUND_MESSAGE: &str = "Movie not found!";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Search")]
    search: Option<Vec<SearchItem>>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Poster")]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Search titles: `GET {base_url}?apikey={key}&s={query}`
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<MovieSummary>, SourceError> {
    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("s", query)])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status { status, body });
    }

    let body = response.text().await?;
    let summaries = parse_search_body(&body)?;
    debug!("Search for {:?} returned {} results", query, summaries.len());
    Ok(summaries)
}

/// Fetch one title: `GET {base_url}?apikey={key}&i={imdb_id}`
pub async fn get_movie_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetails, SourceError> {
    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("i", imdb_id)])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status { status, body });
    }

    let body = response.text().await?;
    let details = parse_details_body(&body)?;
    debug!("Fetched details for {}", details.imdb_id);
    Ok(details)
}

fn api_miss(error: Option<String>) -> SourceError {
    SourceError::NotFound {
        message: error.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
    }
}

pub(crate) fn parse_search_body(body: &str) -> Result<Vec<MovieSummary>, SourceError> {
    let payload: SearchResponse = serde_json::from_str(body)?;
    if payload.response == "False" {
        return Err(api_miss(payload.error));
    }

    let summaries = payload
        .search
        .unwrap_or_default()
        .into_iter()
        .map(|item| MovieSummary {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: item.poster,
        })
        .collect();

    Ok(summaries)
}

pub(crate) fn parse_details_body(body: &str) -> Result<MovieDetails, SourceError> {
    let payload: DetailsResponse = serde_json::from_str(body)?;
    if payload.response == "False" {
        return Err(api_miss(payload.error));
    }

    Ok(MovieDetails {
        imdb_id: payload.imdb_id,
        title: payload.title,
        year: payload.year,
        poster_url: payload.poster,
        runtime_minutes: parse_runtime_minutes(&payload.runtime),
        imdb_rating: parse_imdb_rating(&payload.imdb_rating),
        plot: payload.plot,
        released: payload.released,
        actors: payload.actors,
        director: payload.director,
        genre: payload.genre,
    })
}

/// `"148 min"` -> 148. `"N/A"` and anything else non-numeric -> None.
pub fn parse_runtime_minutes(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

/// `"8.8"` -> 8.8. `"N/A"` -> None.
pub fn parse_imdb_rating(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_body() {
        let body = r#"{
            "Search": [
                {"Title": "Inception", "Year": "2010", "imdbID": "tt1375666", "Type": "movie", "Poster": "https://example.com/inception.jpg"},
                {"Title": "Inception: The Cobol Job", "Year": "2010", "imdbID": "tt5295894", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;

        let summaries = parse_search_body(body).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].imdb_id, "tt1375666");
        assert_eq!(summaries[0].title, "Inception");
        assert_eq!(summaries[0].year, "2010");
        assert_eq!(summaries[1].poster_url, "N/A");
    }

    #[test]
    fn test_parse_search_body_miss() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;

        let err = parse_search_body(body).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Movie not found!");
    }

    #[test]
    fn test_parse_search_body_miss_without_message() {
        let body = r#"{"Response": "False"}"#;

        let err = parse_search_body(body).unwrap_err();

        assert_eq!(err.to_string(), "Movie not found!");
    }

    #[test]
    fn test_parse_search_body_invalid_key_keeps_api_message() {
        let body = r#"{"Response": "False", "Error": "Invalid API key!"}"#;

        let err = parse_search_body(body).unwrap_err();

        assert_eq!(err.to_string(), "Invalid API key!");
    }

    #[test]
    fn test_parse_details_body() {
        let body = r#"{
            "Title": "Inception",
            "Year": "2010",
            "Released": "16 Jul 2010",
            "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
            "Plot": "A thief who steals corporate secrets through the use of dream-sharing technology.",
            "Poster": "https://example.com/inception.jpg",
            "imdbRating": "8.8",
            "imdbID": "tt1375666",
            "Response": "True"
        }"#;

        let details = parse_details_body(body).unwrap();

        assert_eq!(details.imdb_id, "tt1375666");
        assert_eq!(details.runtime_minutes, Some(148));
        assert_eq!(details.imdb_rating, Some(8.8));
        assert_eq!(details.director, "Christopher Nolan");
    }

    #[test]
    fn test_parse_details_body_with_missing_numerics() {
        let body = r#"{
            "Title": "Obscure Short",
            "Year": "1999",
            "Runtime": "N/A",
            "imdbRating": "N/A",
            "imdbID": "tt0000001",
            "Poster": "N/A",
            "Response": "True"
        }"#;

        let details = parse_details_body(body).unwrap();

        assert_eq!(details.runtime_minutes, None);
        assert_eq!(details.imdb_rating, None);
        assert_eq!(details.plot, "");
    }

    #[test]
    fn test_parse_details_body_miss() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;

        let err = parse_details_body(body).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Incorrect IMDb ID.");
    }

    #[test]
    fn test_parse_runtime_minutes() {
        assert_eq!(parse_runtime_minutes("148 min"), Some(148));
        assert_eq!(parse_runtime_minutes("90 min"), Some(90));
        assert_eq!(parse_runtime_minutes("N/A"), None);
        assert_eq!(parse_runtime_minutes(""), None);
    }

    #[test]
    fn test_parse_imdb_rating() {
        assert_eq!(parse_imdb_rating("8.8"), Some(8.8));
        assert_eq!(parse_imdb_rating("7"), Some(7.0));
        assert_eq!(parse_imdb_rating("N/A"), None);
    }

    #[test]
    fn test_parse_search_body_garbage_is_decode_error() {
        let err = parse_search_body("<html>not json</html>").unwrap_err();

        assert!(matches!(err, SourceError::Decode(_)));
    }
}
