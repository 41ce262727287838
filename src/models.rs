use serde::Serialize;

/// 제목이 없을 때 사용하는 대체 문자열.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// 아티스트 목록이 비어 있을 때 사용하는 대체 문자열.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// 검색 결과 JSON으로 직렬화되는 트랙 레코드.
/// 외부 카탈로그의 원시 결과를 고정된 필드 집합으로 평탄화한 형태다.
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub id: String,
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// 초 단위 재생 시간. 파싱할 수 없는 형식은 0.
    pub duration: u64,
    pub url: String,
    #[serde(rename = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// 앨범 객체에서 그대로 전달되는 값 (숫자 또는 문자열).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<serde_json::Value>,
    #[serde(rename = "resultType")]
    pub result_type: String,
}

impl Track {
    /// 초를 "M:SS" 또는 "H:MM:SS"로 되돌린다 (표 출력용).
    pub fn duration_text(&self) -> String {
        if self.duration >= 3600 {
            format!(
                "{}:{:02}:{:02}",
                self.duration / 3600,
                self.duration % 3600 / 60,
                self.duration % 60
            )
        } else {
            format!("{}:{:02}", self.duration / 60, self.duration % 60)
        }
    }

    pub fn year_text(&self) -> String {
        match &self.year {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> Track {
        Track {
            id: "abc123".to_string(),
            video_id: "abc123".to_string(),
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            album: Some("Album".to_string()),
            duration: 225,
            url: "https://music.youtube.com/watch?v=abc123".to_string(),
            thumbnail_url: Some("high".to_string()),
            year: Some(serde_json::json!(2020)),
            result_type: "song".to_string(),
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(sample_track()).unwrap();
        assert_eq!(value["id"], "abc123");
        assert_eq!(value["videoId"], "abc123");
        assert_eq!(value["title"], "Song");
        assert_eq!(value["artist"], "Artist");
        assert_eq!(value["album"], "Album");
        assert_eq!(value["duration"], 225);
        assert_eq!(value["url"], "https://music.youtube.com/watch?v=abc123");
        assert_eq!(value["thumbnailUrl"], "high");
        assert_eq!(value["year"], 2020);
        assert_eq!(value["resultType"], "song");
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let mut track = sample_track();
        track.album = None;
        track.thumbnail_url = None;
        track.year = None;

        let value = serde_json::to_value(track).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("album"));
        assert!(!object.contains_key("thumbnailUrl"));
        assert!(!object.contains_key("year"));
    }

    #[test]
    fn test_duration_text() {
        let mut track = sample_track();
        assert_eq!(track.duration_text(), "3:45");
        track.duration = 3723;
        assert_eq!(track.duration_text(), "1:02:03");
    }

    #[test]
    fn test_year_text() {
        let mut track = sample_track();
        assert_eq!(track.year_text(), "2020");
        track.year = Some(serde_json::json!("2020"));
        assert_eq!(track.year_text(), "2020");
        track.year = None;
        assert_eq!(track.year_text(), "-");
    }
}
