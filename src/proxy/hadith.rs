use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::config::ServerConfig;
use crate::models::HadithSnapshot;
use crate::proxy::error::{ProxyError, ProxyResult};
use crate::proxy::upstream::Upstream;

pub const CANDIDATE_COUNT: u32 = 5;

/// Distance between successive candidates so a missing entry is not
/// followed by its neighbours.
const CANDIDATE_STRIDE: u64 = 1543;

#[derive(Debug, Default, Deserialize)]
pub struct HadithQuery {
    pub edition: Option<String>,
    pub seed: Option<String>,
}

fn seed_hash(edition: &str, seed: &str) -> u64 {
    let digest = Sha256::digest(format!("{edition}:{seed}").as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as u64
}

/// Hadith numbers to try for `(edition, seed)`, in order. Same inputs,
/// same sequence.
pub fn candidates(edition: &str, seed: &str, max: u32) -> Vec<u32> {
    let max = max.max(1) as u64;
    let h = seed_hash(edition, seed);
    let mut out = Vec::with_capacity(CANDIDATE_COUNT as usize);
    for i in 0..CANDIDATE_COUNT as u64 {
        let n = ((h + i * CANDIDATE_STRIDE) % max + 1) as u32;
        if !out.contains(&n) {
            out.push(n);
        }
    }
    out
}

/// Primary then secondary host, minified then plain file for each.
pub fn mirror_urls(config: &ServerConfig, edition: &str, number: u32) -> Vec<String> {
    let mut urls = Vec::with_capacity(4);
    for host in [&config.hadith_primary, &config.hadith_secondary] {
        let host = host.trim_end_matches('/');
        for ext in ["min.json", "json"] {
            urls.push(format!("{host}/editions/{edition}/{number}.{ext}"));
        }
    }
    urls
}

fn describe_reference(reference: &Value) -> Option<String> {
    let book = reference.get("book").and_then(Value::as_u64);
    let hadith = reference.get("hadith").and_then(Value::as_u64);
    match (book, hadith) {
        (Some(b), Some(h)) => Some(format!("Book {b}, Hadith {h}")),
        (Some(b), None) => Some(format!("Book {b}")),
        (None, Some(h)) => Some(format!("Hadith {h}")),
        (None, None) => None,
    }
}

/// `None` unless the payload carries non-empty text.
pub fn parse_payload(edition: &str, number: u32, payload: &Value) -> Option<HadithSnapshot> {
    let entry = payload.get("hadiths").and_then(Value::as_array)?.first()?;
    let text = entry.get("text").and_then(Value::as_str)?.trim();
    if text.is_empty() {
        return None;
    }

    let grade = entry
        .get("grades")
        .and_then(Value::as_array)
        .and_then(|g| g.first())
        .and_then(|g| g.get("grade"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(HadithSnapshot {
        collection: payload
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .unwrap_or(edition)
            .to_string(),
        edition: edition.to_string(),
        hadithnumber: entry
            .get("hadithnumber")
            .and_then(Value::as_u64)
            .map(|n| n as u32)
            .unwrap_or(number),
        text: text.to_string(),
        grade,
        reference: entry.get("reference").and_then(describe_reference),
    })
}

pub async fn lookup(
    upstream: &dyn Upstream,
    config: &ServerConfig,
    query: HadithQuery,
    default_seed: String,
) -> ProxyResult<HadithSnapshot> {
    let edition = query
        .edition
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| config.hadith_edition.clone());
    if !edition.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ProxyError::BadRequest(format!("Invalid edition '{}'", edition)));
    }
    let seed = query.seed.filter(|s| !s.is_empty()).unwrap_or(default_seed);

    let mut last_error = String::from("no candidates");
    for number in candidates(&edition, &seed, config.hadith_max_number) {
        for raw in mirror_urls(config, &edition, number) {
            let url = match Url::parse(&raw) {
                Ok(u) => u,
                Err(e) => {
                    last_error = format!("{raw}: {e}");
                    continue;
                }
            };
            match upstream.get_json(&url).await {
                Ok(payload) => match parse_payload(&edition, number, &payload) {
                    Some(hadith) => {
                        log::debug!("Hadith {} #{} from {}", edition, number, url);
                        return Ok(hadith);
                    }
                    None => last_error = format!("{url}: empty hadith text"),
                },
                Err(e) => last_error = e.to_string(),
            }
        }
    }

    Err(ProxyError::Upstream {
        error: "Hadith unavailable".to_string(),
        detail: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::testing::MockUpstream;
    use serde_json::json;

    fn payload(n: u32, text: &str) -> Value {
        json!({
            "metadata": {"name": "Sahih al Bukhari"},
            "hadiths": [{
                "hadithnumber": n,
                "text": text,
                "grades": [{"name": "Al-Albani", "grade": "Sahih"}],
                "reference": {"book": 1, "hadith": 1}
            }]
        })
    }

    #[test]
    fn candidate_sequence_is_deterministic() {
        let a = candidates("eng-bukhari", "2024-05-10", 7000);
        let b = candidates("eng-bukhari", "2024-05-10", 7000);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert!(a.iter().all(|&n| (1..=7000).contains(&n)));
        assert_ne!(a, candidates("eng-bukhari", "2024-05-11", 7000));
        assert_ne!(a, candidates("eng-muslim", "2024-05-10", 7000));
    }

    #[test]
    fn tiny_collections_dedupe() {
        let c = candidates("eng-nawawi", "x", 1);
        assert_eq!(c, vec![1]);
    }

    #[test]
    fn four_mirrors_in_order() {
        let urls = mirror_urls(&ServerConfig::default(), "eng-bukhari", 7);
        assert_eq!(urls.len(), 4);
        assert!(urls[0].starts_with("https://cdn.jsdelivr.net") && urls[0].ends_with("/7.min.json"));
        assert!(urls[1].starts_with("https://cdn.jsdelivr.net") && urls[1].ends_with("/7.json"));
        assert!(urls[2].starts_with("https://raw.githubusercontent.com") && urls[2].ends_with("/7.min.json"));
        assert!(urls[3].ends_with("/editions/eng-bukhari/7.json"));
    }

    #[test]
    fn payload_parsing() {
        let h = parse_payload("eng-bukhari", 9, &payload(12, "  Actions are by intentions. ")).unwrap();
        assert_eq!(h.collection, "Sahih al Bukhari");
        assert_eq!(h.hadithnumber, 12);
        assert_eq!(h.text, "Actions are by intentions.");
        assert_eq!(h.grade.as_deref(), Some("Sahih"));
        assert_eq!(h.reference.as_deref(), Some("Book 1, Hadith 1"));
        assert!(parse_payload("eng-bukhari", 9, &payload(12, "   ")).is_none());
        assert!(parse_payload("eng-bukhari", 9, &json!({"hadiths": []})).is_none());
    }

    #[tokio::test]
    async fn same_seed_same_answer() {
        let config = ServerConfig::default();
        let first = candidates("eng-bukhari", "2024-05-10", config.hadith_max_number)[0];
        let url = mirror_urls(&config, "eng-bukhari", first)[0].clone();

        let mut numbers = Vec::new();
        let mut sequences = Vec::new();
        for _ in 0..2 {
            let upstream = MockUpstream::new().with_url(&url, payload(first, "text"));
            let query = HadithQuery {
                edition: Some("eng-bukhari".into()),
                seed: Some("2024-05-10".into()),
            };
            let h = lookup(&upstream, &config, query, "unused".into()).await.unwrap();
            numbers.push(h.hadithnumber);
            sequences.push(upstream.requested());
        }
        assert_eq!(numbers[0], numbers[1]);
        assert_eq!(sequences[0], sequences[1]);
        assert_eq!(sequences[0], vec![url]);
    }

    #[tokio::test]
    async fn falls_through_mirrors_and_candidates() {
        let config = ServerConfig::default();
        let nums = candidates("eng-bukhari", "s", config.hadith_max_number);
        let second_candidate_secondary = mirror_urls(&config, "eng-bukhari", nums[1])[3].clone();
        let first_empty = mirror_urls(&config, "eng-bukhari", nums[0])[1].clone();
        let upstream = MockUpstream::new()
            .with_url(&first_empty, payload(nums[0], ""))
            .with_url(&second_candidate_secondary, payload(nums[1], "found"));
        let query = HadithQuery {
            edition: None,
            seed: Some("s".into()),
        };

        let h = lookup(&upstream, &config, query, "unused".into()).await.unwrap();
        assert_eq!(h.text, "found");
        assert_eq!(upstream.requested().len(), 8);
    }

    #[tokio::test]
    async fn exhaustion_reports_last_error() {
        let upstream = MockUpstream::new();
        let err = lookup(&upstream, &ServerConfig::default(), HadithQuery::default(), "2024-05-10".into())
            .await
            .unwrap_err();
        match err {
            ProxyError::Upstream { error, detail } => {
                assert_eq!(error, "Hadith unavailable");
                assert!(detail.contains("404"), "{detail}");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(upstream.requested().len(), 20);
    }

    #[tokio::test]
    async fn rejects_path_like_editions() {
        let query = HadithQuery {
            edition: Some("../secrets".into()),
            seed: None,
        };
        let err = lookup(&MockUpstream::new(), &ServerConfig::default(), query, "x".into()).await.unwrap_err();
        assert!(matches!(err, ProxyError::BadRequest(_)));
    }
}
