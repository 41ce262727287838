use anyhow::Result;
use clap::Parser;
use comfy_table::{Cell, Table};

use crate::models::Track;
use crate::sources::ytmusic::YtMusicClient;
use crate::sources::MusicSource;

#[derive(Parser)]
#[command(name = "ytmsearch", about = "YouTube Music 검색 CLI")]
pub struct Cli {
    /// 검색어 (여러 단어면 공백으로 연결된다)
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,

    /// 최대 결과 수
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// JSON 대신 표 형식으로 출력
    #[arg(long)]
    pub table: bool,

    /// 트랙 대신 검색어 자동완성 제안을 출력
    #[arg(long)]
    pub suggest: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.query.is_empty() {
        // 표준 출력 계약: 쿼리가 없으면 에러 객체를 찍고 0이 아닌 코드로 종료
        println!("{}", serde_json::json!({ "error": "No query provided" }));
        anyhow::bail!("검색어가 제공되지 않았습니다");
    }

    let query = cli.query.join(" ");

    if cli.suggest {
        cmd_suggest(&query)
    } else {
        cmd_search(&query, cli.limit, cli.table)
    }
}

fn cmd_search(query: &str, limit: usize, table: bool) -> Result<()> {
    match search_tracks(query, limit) {
        Ok(tracks) => {
            if table {
                print_table(&tracks);
            } else {
                println!("{}", serde_json::to_string_pretty(&tracks)?);
            }
        }
        // 검색 실패는 에러 객체로 보고하고 정상 코드로 종료한다
        Err(e) => println!("{}", error_object(&e)?),
    }

    Ok(())
}

fn cmd_suggest(query: &str) -> Result<()> {
    match fetch_suggestions(query) {
        Ok(suggestions) => println!("{}", serde_json::to_string_pretty(&suggestions)?),
        Err(e) => println!("{}", error_object(&e)?),
    }

    Ok(())
}

/// 함수 수준 검색 API. 결과 수 제한은 호출자가 재설정할 수 있다.
/// 클라이언트 생성 실패도 검색 실패와 동일하게 취급된다.
pub fn search_tracks(query: &str, limit: usize) -> Result<Vec<Track>> {
    let client = YtMusicClient::new()?;
    client.search(query, limit)
}

fn fetch_suggestions(query: &str) -> Result<Vec<String>> {
    let client = YtMusicClient::new()?;
    client.suggestions(query)
}

/// 에러 체인을 {"error": "<메시지>"} JSON 객체로 직렬화한다.
fn error_object(e: &anyhow::Error) -> Result<String> {
    let object = serde_json::json!({ "error": format!("{e:#}") });
    Ok(serde_json::to_string_pretty(&object)?)
}

fn print_table(tracks: &[Track]) {
    if tracks.is_empty() {
        println!("검색 결과가 없습니다.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["제목", "아티스트", "앨범", "시간", "연도", "URL"]);

    for track in tracks {
        table.add_row(vec![
            Cell::new(&track.title),
            Cell::new(&track.artist),
            Cell::new(track.album.as_deref().unwrap_or("-")),
            Cell::new(track.duration_text()),
            Cell::new(track.year_text()),
            Cell::new(&track.url),
        ]);
    }

    println!("{table}");
    println!("\n총 {}곡", tracks.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_words_are_joined() {
        let cli = Cli::parse_from(["ytmsearch", "IU", "Blueming"]);
        assert_eq!(cli.query.join(" "), "IU Blueming");
        assert_eq!(cli.limit, 10);
        assert!(!cli.table);
        assert!(!cli.suggest);
    }

    #[test]
    fn test_limit_flag() {
        let cli = Cli::parse_from(["ytmsearch", "--limit", "3", "IU"]);
        assert_eq!(cli.limit, 3);
    }

    #[test]
    fn test_run_without_query_fails() {
        let cli = Cli::parse_from(["ytmsearch"]);
        assert!(run(cli).is_err());
    }

    #[test]
    fn test_error_object_shape() {
        let rendered = error_object(&anyhow::anyhow!("boom")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["error"], "boom");
        assert_eq!(value.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_error_object_keeps_context_chain() {
        let e = anyhow::anyhow!("저수준 실패").context("검색에 실패했습니다");
        let rendered = error_object(&e).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let message = value["error"].as_str().unwrap();
        assert!(message.contains("검색에 실패했습니다"));
        assert!(message.contains("저수준 실패"));
    }
}
