use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Marker that precedes the episode token in an announcement.
pub const EPISODE_MARKER: &str = "episode ";

/// Stored in place of an episode number while a series has not aired yet.
const NOT_YET_AIRED_SENTINEL: i64 = -1;

static EPISODE_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d+)(\.\d+)?$").ok());

/// Episode number as announced upstream.
///
/// Specials are frequently numbered between regular episodes ("7.5"), so a
/// decimal form is kept alongside the plain integer one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EpisodeNumber {
    Integer(u32),
    Decimal(f64),
}

impl EpisodeNumber {
    /// Parse a bare token: digits only → integer, digits with a fractional
    /// part → decimal. Anything else is rejected.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let captures = EPISODE_TOKEN.as_ref()?.captures(token)?;
        if captures.get(2).is_none() {
            token.parse().ok().map(EpisodeNumber::Integer)
        } else {
            token.parse().ok().map(EpisodeNumber::Decimal)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            EpisodeNumber::Integer(n) => f64::from(*n),
            EpisodeNumber::Decimal(d) => *d,
        }
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeNumber::Integer(n) => write!(f, "{}", n),
            EpisodeNumber::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// Extract the episode number from a normalized announcement text.
///
/// The token is whatever follows the last `"episode "` marker.
pub fn parse_episode_token(normalized_text: &str) -> Option<EpisodeNumber> {
    let (_, token) = normalized_text.rsplit_once(EPISODE_MARKER)?;
    EpisodeNumber::parse(token)
}

/// Last episode recorded for a watchlist entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EpisodeMark {
    NotYetAired,
    Aired(EpisodeNumber),
}

/// How an announced episode relates to the recorded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeChange {
    /// Newer than anything recorded: notify and persist.
    New,
    /// Same episode as recorded.
    Unchanged,
    /// Older than the recorded episode (listing pages keep old releases).
    Stale,
}

impl EpisodeMark {
    /// Compare an announced episode against the recorded mark.
    ///
    /// Equality is decided on the canonical rendering so that `7` and `7.0`
    /// are the same episode while `7` and `7.5` are not.
    pub fn compare_announced(&self, announced: EpisodeNumber) -> EpisodeChange {
        match self {
            EpisodeMark::NotYetAired => EpisodeChange::New,
            EpisodeMark::Aired(recorded) => {
                if recorded.to_string() == announced.to_string() {
                    return EpisodeChange::Unchanged;
                }
                match announced.as_f64().partial_cmp(&recorded.as_f64()) {
                    Some(Ordering::Greater) => EpisodeChange::New,
                    _ => EpisodeChange::Stale,
                }
            }
        }
    }
}

impl Default for EpisodeMark {
    fn default() -> Self {
        EpisodeMark::NotYetAired
    }
}

impl fmt::Display for EpisodeMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeMark::NotYetAired => write!(f, "not yet aired"),
            EpisodeMark::Aired(number) => write!(f, "{}", number),
        }
    }
}

impl Serialize for EpisodeMark {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            EpisodeMark::NotYetAired => serializer.serialize_i64(NOT_YET_AIRED_SENTINEL),
            EpisodeMark::Aired(EpisodeNumber::Integer(n)) => serializer.serialize_u32(*n),
            EpisodeMark::Aired(EpisodeNumber::Decimal(d)) => serializer.serialize_f64(*d),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMark {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for EpisodeMark {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawMark::deserialize(deserializer)? {
            RawMark::Integer(n) if n < 0 => Ok(EpisodeMark::NotYetAired),
            RawMark::Integer(n) => u32::try_from(n)
                .map(|n| EpisodeMark::Aired(EpisodeNumber::Integer(n)))
                .map_err(|_| de::Error::custom(format!("episode number {} out of range", n))),
            RawMark::Decimal(d) if d < 0.0 => Ok(EpisodeMark::NotYetAired),
            RawMark::Decimal(d) => Ok(EpisodeMark::Aired(EpisodeNumber::Decimal(d))),
            RawMark::Text(text) => EpisodeNumber::parse(&text)
                .map(EpisodeMark::Aired)
                .ok_or_else(|| de::Error::custom(format!("invalid episode number '{}'", text))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_token() {
        assert_eq!(
            parse_episode_token("naruto episode 7"),
            Some(EpisodeNumber::Integer(7))
        );
    }

    #[test]
    fn test_decimal_token() {
        assert_eq!(
            parse_episode_token("naruto episode 7.5"),
            Some(EpisodeNumber::Decimal(7.5))
        );
    }

    #[test]
    fn test_token_after_last_marker() {
        assert_eq!(
            parse_episode_token("the episode zero arc episode 12"),
            Some(EpisodeNumber::Integer(12))
        );
    }

    #[test]
    fn test_missing_or_garbage_token() {
        assert_eq!(parse_episode_token("naruto movie"), None);
        assert_eq!(parse_episode_token("naruto episode final"), None);
        assert_eq!(parse_episode_token("naruto episode 1e3"), None);
    }

    #[test]
    fn test_string_comparison_semantics() {
        let seven = EpisodeMark::Aired(EpisodeNumber::Integer(7));
        let seven_half = EpisodeMark::Aired(EpisodeNumber::Decimal(7.5));

        assert_eq!(
            seven.compare_announced(EpisodeNumber::Decimal(7.5)),
            EpisodeChange::New
        );
        assert_eq!(
            seven_half.compare_announced(EpisodeNumber::Integer(7)),
            EpisodeChange::Stale
        );
        assert_eq!(
            seven.compare_announced(EpisodeNumber::Integer(7)),
            EpisodeChange::Unchanged
        );
        assert_eq!(
            seven.compare_announced(EpisodeNumber::Decimal(7.0)),
            EpisodeChange::Unchanged
        );
    }

    #[test]
    fn test_not_yet_aired_accepts_any_episode() {
        assert_eq!(
            EpisodeMark::NotYetAired.compare_announced(EpisodeNumber::Integer(0)),
            EpisodeChange::New
        );
    }

    #[test]
    fn test_mark_serde() {
        assert_eq!(serde_json::to_string(&EpisodeMark::NotYetAired).unwrap(), "-1");
        assert_eq!(
            serde_json::to_string(&EpisodeMark::Aired(EpisodeNumber::Decimal(7.5))).unwrap(),
            "7.5"
        );

        let mark: EpisodeMark = serde_json::from_str("-1").unwrap();
        assert_eq!(mark, EpisodeMark::NotYetAired);
        let mark: EpisodeMark = serde_json::from_str("12").unwrap();
        assert_eq!(mark, EpisodeMark::Aired(EpisodeNumber::Integer(12)));
        let mark: EpisodeMark = serde_json::from_str("\"3.5\"").unwrap();
        assert_eq!(mark, EpisodeMark::Aired(EpisodeNumber::Decimal(3.5)));
        assert!(serde_json::from_str::<EpisodeMark>("\"soon\"").is_err());
    }
}
