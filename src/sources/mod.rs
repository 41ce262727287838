pub mod ytmusic;

use anyhow::Result;

use crate::models::Track;

/// 음악 카탈로그 검색 소스 트레이트.
/// YouTube Music 등 검색 백엔드를 이 트레이트로 추상화한다.
pub trait MusicSource {
    /// 쿼리 문자열로 트랙을 검색한다. limit는 최대 결과 수.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>>;
    /// 쿼리에 대한 검색어 자동완성 제안을 가져온다.
    fn suggestions(&self, query: &str) -> Result<Vec<String>>;
}
