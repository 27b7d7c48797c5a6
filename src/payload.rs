// src/payload.rs
//
// Hand-off to the receiving app: pretty JSON for the clipboard, and the
// compact JSON as base64 in the URL fragment when it is small enough.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::consts::FRAGMENT_KEY;
use crate::data::MatchRecord;
use crate::error::HarvestError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    /// Indented JSON array; the durable copy.
    pub pretty: String,
    /// Length of the base64 form, whether or not it was attached.
    pub encoded_len: usize,
    /// `import_url`, plus `#ext=<b64>` when `fragment_included`.
    pub url: String,
    pub fragment_included: bool,
}

/// Build both transports. `limit` is the exclusive ceiling on the encoded length.
pub fn encode(matches: &[MatchRecord], import_url: &str, limit: usize) -> Result<Payload, HarvestError> {
    let pretty = serde_json::to_string_pretty(matches)?;
    let encoded = encode_fragment(matches)?;
    let encoded_len = encoded.len();

    let (url, fragment_included) = if encoded_len < limit {
        (format!("{import_url}#{FRAGMENT_KEY}={encoded}"), true)
    } else {
        logf!("Payload: {encoded_len} chars is over the fragment limit; clipboard only");
        (s!(import_url), false)
    };
    Ok(Payload { pretty, encoded_len, url, fragment_included })
}

/// Compact JSON, UTF-8 bytes, standard base64.
pub fn encode_fragment(matches: &[MatchRecord]) -> Result<String, HarvestError> {
    let compact = serde_json::to_vec(matches)?;
    Ok(STANDARD.encode(compact))
}

/// Inverse of [`encode_fragment`], for the receiving side and for tests.
pub fn decode_fragment(fragment: &str) -> Result<Vec<MatchRecord>, HarvestError> {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    let raw = raw.strip_prefix(&format!("{FRAGMENT_KEY}=")).unwrap_or(raw);
    let bytes = STANDARD
        .decode(raw.trim())
        .map_err(|e| HarvestError::Payload(e.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MatchResult;

    fn record(opponent: &str) -> MatchRecord {
        MatchRecord {
            event: s!("Café Armory"),
            date: s!("2024-03-03"),
            venue: s!(),
            event_type: s!("Armory"),
            format: s!("Blitz"),
            rated: true,
            hero: s!("Fai"),
            round: 1,
            round_label: s!(),
            opponent: s!(opponent),
            opponent_gem_id: s!("12"),
            result: MatchResult::Win,
        }
    }

    #[test]
    fn small_payload_rides_in_fragment() {
        let recs = vec![record("Doe, John"), record("Zoë Ålvarez")];
        let p = encode(&recs, "http://localhost:3000/import", 1_000_000).unwrap();
        assert!(p.fragment_included);
        let (_, frag) = p.url.split_once('#').unwrap();
        assert_eq!(decode_fragment(frag).unwrap(), recs);
        assert!(p.pretty.contains("\n  {"));
    }

    #[test]
    fn limit_is_exclusive() {
        let recs = vec![record("A B")];
        let len = encode_fragment(&recs).unwrap().len();
        assert!(!encode(&recs, "http://x/", len).unwrap().fragment_included);
        assert!(encode(&recs, "http://x/", len + 1).unwrap().fragment_included);
    }

    #[test]
    fn empty_list_still_encodes() {
        let p = encode(&[], "http://x/", 10).unwrap();
        assert_eq!(p.pretty, "[]");
        assert_eq!(p.url, "http://x/#ext=W10=");
    }
}
