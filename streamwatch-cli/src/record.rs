use helix_client::Stream;
use serde::Serialize;

/// A live stream normalized for matching and for the census log.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamRecord {
    pub game_name: String,
    pub language: String,
    pub thumbnail_url: String,
    /// Lowercased.
    pub title: String,
    pub user_login: String,
    pub user_name: String,
    pub viewer_count: u64,
}

/// Column holding the display name, the census dedup key.
pub const USER_NAME_COLUMN: usize = 5;

impl From<Stream> for StreamRecord {
    fn from(stream: Stream) -> Self {
        Self {
            game_name: stream.game_name,
            language: stream.language,
            thumbnail_url: stream.thumbnail_url,
            title: stream.title.to_lowercase(),
            user_login: stream.user_login,
            user_name: stream.user_name,
            viewer_count: stream.viewer_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_lowercased_and_names_kept() {
        let stream = Stream {
            game_name: "Chess".to_string(),
            language: "de".to_string(),
            thumbnail_url: "https://example.com/{width}x{height}.jpg".to_string(),
            title: "Blitz ARENA".to_string(),
            user_login: "magnus".to_string(),
            user_name: "Magnus".to_string(),
            viewer_count: 42,
        };
        let record = StreamRecord::from(stream);
        assert_eq!(record.title, "blitz arena");
        assert_eq!(record.user_name, "Magnus");
        assert_eq!(record.viewer_count, 42);
    }
}
