use anyhow::{Context, Result};
use serde_json::Value;

use crate::models::{Track, UNKNOWN_ARTIST, UNKNOWN_TITLE};
use crate::sources::MusicSource;

const API_BASE_URL: &str = "https://music.youtube.com/youtubei/v1";

/// "songs" 카테고리만 반환하도록 하는 검색 필터 파라미터 (protobuf 인코딩 상수).
const SONGS_FILTER_PARAMS: &str = "EgWKAQIIAWoKEAkQBRAKEAMQBA%3D%3D";

const CLIENT_NAME: &str = "WEB_REMIX";
const CLIENT_VERSION: &str = "1.20250310.01.00";

/// YouTube Music 비공개 API(InnerTube) 클라이언트.
/// 익명 검색은 인증 없이 동작한다.
pub struct YtMusicClient {
    client: reqwest::blocking::Client,
}

/// 검색 응답의 렌더러에서 뽑아낸 원시 결과 항목.
/// 정규화 전의 중간 형태로, 필드 대부분이 없을 수 있다.
#[derive(Debug, Default)]
struct RawSearchItem {
    video_id: Option<String>,
    title: Option<String>,
    artists: Vec<String>,
    album: Option<RawAlbum>,
    duration_text: Option<String>,
    /// 해상도 오름차순으로 정렬된 썸네일 URL 목록.
    thumbnails: Vec<String>,
    result_type: Option<String>,
}

#[derive(Debug)]
struct RawAlbum {
    name: String,
    year: Option<Value>,
}

impl YtMusicClient {
    /// 새 YtMusicClient를 생성한다. User-Agent 헤더를 설정한다.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("YouTube Music HTTP 클라이언트 생성에 실패했습니다")?;

        Ok(Self { client })
    }

    /// InnerTube 엔드포인트로 JSON 본문을 POST하고 응답 JSON을 반환한다.
    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{API_BASE_URL}/{path}?prettyPrint=false");

        self.client
            .post(&url)
            .json(body)
            .send()
            .context("YouTube Music 요청에 실패했습니다")?
            .error_for_status()
            .context("YouTube Music 요청이 거부되었습니다")?
            .json()
            .context("YouTube Music 응답 파싱에 실패했습니다")
    }

    /// 모든 요청 본문에 포함되는 클라이언트 컨텍스트.
    fn context_body() -> Value {
        serde_json::json!({
            "client": {
                "hl": "en",
                "gl": "US",
                "clientName": CLIENT_NAME,
                "clientVersion": CLIENT_VERSION,
            }
        })
    }
}

impl MusicSource for YtMusicClient {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>> {
        let body = serde_json::json!({
            "input": query,
            "params": SONGS_FILTER_PARAMS,
            "context": Self::context_body(),
        });

        log::debug!("검색 요청: {query}");
        let response = self.post("search", &body)?;
        log::trace!("검색 응답: {response:?}");

        let items = collect_search_items(&response);
        log::debug!("원시 검색 결과 {}개", items.len());

        Ok(items.iter().filter_map(convert_item).take(limit).collect())
    }

    fn suggestions(&self, query: &str) -> Result<Vec<String>> {
        let body = serde_json::json!({
            "input": query,
            "context": Self::context_body(),
        });

        log::debug!("자동완성 요청: {query}");
        let response = self.post("music/get_search_suggestions", &body)?;
        log::trace!("자동완성 응답: {response:?}");

        Ok(parse_suggestions(&response))
    }
}

/// 검색 응답에서 곡 셸프의 모든 항목을 수집한다.
/// 경로: contents → tabbedSearchResultsRenderer → tabs → sectionListRenderer
/// → musicShelfRenderer → contents.
fn collect_search_items(response: &Value) -> Vec<RawSearchItem> {
    let mut items = Vec::new();

    let Some(tabs) = response
        .get("contents")
        .and_then(|c| c.get("tabbedSearchResultsRenderer"))
        .and_then(|t| t.get("tabs"))
        .and_then(|t| t.as_array())
    else {
        return items;
    };

    for tab in tabs {
        let Some(sections) = tab
            .get("tabRenderer")
            .and_then(|t| t.get("content"))
            .and_then(|c| c.get("sectionListRenderer"))
            .and_then(|s| s.get("contents"))
            .and_then(|c| c.as_array())
        else {
            continue;
        };

        for section in sections {
            let Some(shelf_items) = section
                .get("musicShelfRenderer")
                .and_then(|s| s.get("contents"))
                .and_then(|c| c.as_array())
            else {
                continue;
            };

            for item in shelf_items {
                if let Some(raw) = parse_shelf_item(item) {
                    items.push(raw);
                }
            }
        }
    }

    items
}

/// musicResponsiveListItemRenderer 하나를 원시 결과 항목으로 변환한다.
/// 렌더러 자체가 없으면 None, 개별 필드는 없으면 비워 둔다.
fn parse_shelf_item(item: &Value) -> Option<RawSearchItem> {
    let renderer = item.get("musicResponsiveListItemRenderer")?;

    let mut raw = RawSearchItem {
        result_type: Some("song".to_string()),
        ..Default::default()
    };

    // videoId: playlistItemData 우선, 없으면 재생 버튼 오버레이에서
    raw.video_id = renderer
        .get("playlistItemData")
        .and_then(|p| p.get("videoId"))
        .and_then(|v| v.as_str())
        .or_else(|| {
            renderer
                .get("overlay")
                .and_then(|o| o.get("musicItemThumbnailOverlayRenderer"))
                .and_then(|m| m.get("content"))
                .and_then(|c| c.get("musicPlayButtonRenderer"))
                .and_then(|m| m.get("playNavigationEndpoint"))
                .and_then(|p| p.get("watchEndpoint"))
                .and_then(|w| w.get("videoId"))
                .and_then(|v| v.as_str())
        })
        .map(str::to_string);

    let flex_columns = renderer
        .get("flexColumns")
        .and_then(|f| f.as_array())
        .cloned()
        .unwrap_or_default();

    raw.title = flex_columns
        .first()
        .and_then(column_runs)
        .and_then(|runs| runs.first().cloned())
        .and_then(|run| run.get("text").and_then(|t| t.as_str()).map(str::to_string));

    // 두 번째 열의 runs에서 아티스트/앨범/재생 시간을 분류한다
    if let Some(runs) = flex_columns.get(1).and_then(column_runs) {
        for run in &runs {
            let Some(text) = run.get("text").and_then(|t| t.as_str()) else {
                continue;
            };

            let browse_id = run
                .get("navigationEndpoint")
                .and_then(|n| n.get("browseEndpoint"))
                .and_then(|b| b.get("browseId"))
                .and_then(|b| b.as_str());

            match browse_id {
                Some(id) if id.starts_with("UC") => raw.artists.push(text.to_string()),
                Some(id) if id.starts_with("MPREb") => {
                    // 검색 렌더러의 앨범 run은 이름만 싣고 연도는 싣지 않는다
                    raw.album = Some(RawAlbum {
                        name: text.to_string(),
                        year: None,
                    });
                }
                _ => {
                    if looks_like_clock(text) {
                        raw.duration_text = Some(text.to_string());
                    }
                }
            }
        }

        // browseId 없이 텍스트만 오는 지역 설정 대비: 첫 run을 아티스트로
        if raw.artists.is_empty() {
            if let Some(text) = runs
                .first()
                .and_then(|run| run.get("text"))
                .and_then(|t| t.as_str())
            {
                if text.trim() != "•" && !looks_like_clock(text) {
                    raw.artists.push(text.to_string());
                }
            }
        }
    }

    // 곡 결과는 재생 시간이 fixedColumns에 온다
    if let Some(text) = renderer
        .get("fixedColumns")
        .and_then(|f| f.as_array())
        .and_then(|columns| columns.first())
        .and_then(fixed_column_text)
    {
        raw.duration_text = Some(text);
    }

    raw.thumbnails = renderer
        .get("thumbnail")
        .and_then(|t| t.get("musicThumbnailRenderer"))
        .and_then(|m| m.get("thumbnail"))
        .and_then(|t| t.get("thumbnails"))
        .and_then(|t| t.as_array())
        .map(|thumbs| {
            thumbs
                .iter()
                .filter_map(|t| t.get("url").and_then(|u| u.as_str()).map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Some(raw)
}

fn column_runs(column: &Value) -> Option<Vec<Value>> {
    column
        .get("musicResponsiveListItemFlexColumnRenderer")
        .and_then(|r| r.get("text"))
        .and_then(|t| t.get("runs"))
        .and_then(|r| r.as_array())
        .cloned()
}

fn fixed_column_text(column: &Value) -> Option<String> {
    column
        .get("musicResponsiveListItemFixedColumnRenderer")
        .and_then(|r| r.get("text"))
        .and_then(|t| t.get("runs"))
        .and_then(|r| r.as_array())
        .and_then(|runs| runs.first())
        .and_then(|run| run.get("text"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
}

/// "3:45"나 "1:02:03"처럼 시계 형식으로 보이는지 확인한다.
fn looks_like_clock(text: &str) -> bool {
    let parts: Vec<&str> = text.split(':').collect();
    matches!(parts.len(), 2 | 3)
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

/// 원시 결과 항목을 트랙 레코드로 정규화한다.
/// 식별자가 없는 항목은 건너뛴다 (None 반환).
fn convert_item(item: &RawSearchItem) -> Option<Track> {
    let video_id = item.video_id.as_ref()?;

    Some(Track {
        id: video_id.clone(),
        video_id: video_id.clone(),
        title: item
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        artist: item
            .artists
            .first()
            .cloned()
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        album: item.album.as_ref().map(|a| a.name.clone()),
        duration: item
            .duration_text
            .as_deref()
            .map(parse_duration)
            .unwrap_or(0),
        url: format!("https://music.youtube.com/watch?v={video_id}"),
        thumbnail_url: item.thumbnails.last().cloned(),
        year: item.album.as_ref().and_then(|a| a.year.clone()),
        result_type: item
            .result_type
            .clone()
            .unwrap_or_else(|| "song".to_string()),
    })
}

/// "M:SS" 또는 "H:MM:SS" 형식의 재생 시간 문자열을 초로 변환한다.
/// 그 외 형식은 조용히 0을 반환한다.
fn parse_duration(text: &str) -> u64 {
    let parts: Vec<&str> = text.split(':').collect();
    match parts.len() {
        2 => {
            let mins: u64 = parts[0].parse().unwrap_or(0);
            let secs: u64 = parts[1].parse().unwrap_or(0);
            mins * 60 + secs
        }
        3 => {
            let hours: u64 = parts[0].parse().unwrap_or(0);
            let mins: u64 = parts[1].parse().unwrap_or(0);
            let secs: u64 = parts[2].parse().unwrap_or(0);
            hours * 3600 + mins * 60 + secs
        }
        _ => 0,
    }
}

/// 자동완성 응답에서 제안 문자열 목록을 뽑아낸다.
/// 각 제안은 runs의 텍스트를 이어 붙인 것이다.
fn parse_suggestions(response: &Value) -> Vec<String> {
    let mut suggestions = Vec::new();

    let Some(sections) = response.get("contents").and_then(|c| c.as_array()) else {
        return suggestions;
    };

    for section in sections {
        let Some(contents) = section
            .get("searchSuggestionsSectionRenderer")
            .and_then(|s| s.get("contents"))
            .and_then(|c| c.as_array())
        else {
            continue;
        };

        for item in contents {
            let Some(runs) = item
                .get("searchSuggestionRenderer")
                .and_then(|s| s.get("suggestion"))
                .and_then(|s| s.get("runs"))
                .and_then(|r| r.as_array())
            else {
                continue;
            };

            let text: String = runs
                .iter()
                .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
                .collect();

            if !text.is_empty() {
                suggestions.push(text);
            }
        }
    }

    suggestions
}
