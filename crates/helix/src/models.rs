//! Wire models for the Helix responses we consume.
//!
//! Only the fields the monitor reads are declared; serde ignores the rest.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Envelope shared by every `helix/*` listing endpoint.
#[derive(Debug, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub box_art_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub title: String,
    pub user_login: String,
    pub user_name: String,
    #[serde(default)]
    pub viewer_count: u64,
}

/// One page of `helix/streams`.
#[derive(Debug, Default)]
pub struct StreamsPage {
    pub streams: Vec<Stream>,
    /// Cursor for the following page. Never an empty string.
    pub cursor: Option<String>,
}

impl From<DataResponse<Stream>> for StreamsPage {
    fn from(response: DataResponse<Stream>) -> Self {
        let cursor = response
            .pagination
            .and_then(|p| p.cursor)
            .filter(|c| !c.is_empty());
        Self {
            streams: response.data,
            cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAMS_BODY: &str = r#"{
        "data": [
            {
                "id": "40952121085",
                "user_id": "101051819",
                "user_login": "afro",
                "user_name": "Afro",
                "game_id": "32982",
                "game_name": "Grand Theft Auto V",
                "type": "live",
                "title": "Jacob: Digital Den Laptops & Routers | NoPixel",
                "tags": ["English"],
                "viewer_count": 1490,
                "started_at": "2021-03-10T03:18:11Z",
                "language": "en",
                "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-{width}x{height}.jpg",
                "is_mature": false
            }
        ],
        "pagination": {
            "cursor": "eyJiIjp7IkN1cnNvciI6ImV5SnpJam8zT0RNMk5TNDBORFF4TlRjMU1UY3hOU3dpWkNJNlptRnNjMlVzSW5RaU9uUnlkV1Y5In0sImEiOnsiQ3Vyc29yIjoiZXlKeklqb3hOVGd4TGpVd05EQXdOVGd6T0RFNU1qYzJMQ0prSWpwbVlXeHpaU3dpZENJNmRISjFaWDA9In19"
        }
    }"#;

    #[test]
    fn test_parse_streams_page() {
        let response: DataResponse<Stream> = serde_json::from_str(STREAMS_BODY).unwrap();
        let page = StreamsPage::from(response);

        assert_eq!(page.streams.len(), 1);
        let stream = &page.streams[0];
        assert_eq!(stream.user_login, "afro");
        assert_eq!(stream.user_name, "Afro");
        assert_eq!(stream.game_name, "Grand Theft Auto V");
        assert_eq!(stream.viewer_count, 1490);
        assert_eq!(stream.language, "en");
        assert!(page.cursor.is_some());
    }

    #[test]
    fn test_empty_pagination_has_no_cursor() {
        let body = r#"{"data": [], "pagination": {}}"#;
        let page = StreamsPage::from(serde_json::from_str::<DataResponse<Stream>>(body).unwrap());
        assert!(page.streams.is_empty());
        assert!(page.cursor.is_none());
    }

    #[test]
    fn test_empty_string_cursor_is_dropped() {
        let body = r#"{"data": [], "pagination": {"cursor": ""}}"#;
        let page = StreamsPage::from(serde_json::from_str::<DataResponse<Stream>>(body).unwrap());
        assert!(page.cursor.is_none());
    }

    #[test]
    fn test_missing_pagination_and_data() {
        let page = StreamsPage::from(serde_json::from_str::<DataResponse<Stream>>("{}").unwrap());
        assert!(page.streams.is_empty());
        assert!(page.cursor.is_none());
    }

    #[test]
    fn test_parse_games() {
        let body = r#"{"data":[{"id":"509658","name":"Just Chatting","box_art_url":"x","igdb_id":""}]}"#;
        let response: DataResponse<Game> = serde_json::from_str(body).unwrap();
        assert_eq!(response.data[0].id, "509658");
        assert_eq!(response.data[0].name, "Just Chatting");
    }

    #[test]
    fn test_parse_token() {
        let body = r#"{"access_token":"jostpf5q0uzmxmkba9iyug38kjtgh","expires_in":5011271,"token_type":"bearer"}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token, "jostpf5q0uzmxmkba9iyug38kjtgh");
        assert_eq!(token.expires_in, Some(5011271));
    }
}
