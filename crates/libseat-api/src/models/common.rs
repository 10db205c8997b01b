// ── Shared wire types ──
//
// Identifier newtype, the `{results, count}` pagination envelope, and
// serde helpers for the backend's `HH:MM[:SS]` time fields.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Default page size used by every list endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// ── EntityId ────────────────────────────────────────────────────────

/// Stable identifier of any backend entity.
///
/// The backend emits either integer primary keys or UUID strings depending
/// on the resource; both are carried as strings so callers never care.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = EntityId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(EntityId(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(EntityId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(EntityId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(EntityId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

// ── Pagination ───────────────────────────────────────────────────────

/// Pagination envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Number of pages needed to show `count` items at `page_size` per page.
    pub fn total_pages(&self, page_size: u32) -> u64 {
        total_pages(self.count, page_size)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// `ceil(count / page_size)`; a zero page size yields zero pages.
pub fn total_pages(count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(u64::from(page_size))
}

/// Generic acknowledgement body (`{"detail": "..."}`) for action endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Time-of-day serde ────────────────────────────────────────────────

const HM: &str = "%H:%M";
const HMS: &str = "%H:%M:%S";

fn parse_time<E: de::Error>(raw: &str) -> Result<chrono::NaiveTime, E> {
    chrono::NaiveTime::parse_from_str(raw, HMS)
        .or_else(|_| chrono::NaiveTime::parse_from_str(raw, HM))
        .or_else(|_| chrono::NaiveTime::parse_from_str(raw, "%H:%M:%S%.f"))
        .map_err(|e| E::custom(format!("invalid time {raw:?}: {e}")))
}

/// Serde adapter for `NaiveTime` accepting `HH:MM` or `HH:MM:SS`,
/// serializing as `HH:MM`.
pub mod hm_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format(super::HM).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw)
    }
}

/// Optional variant of [`hm_time`].
pub mod opt_hm_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&t.format(super::HM).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| super::parse_time(&raw))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveTime;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Slot {
        #[serde(with = "hm_time")]
        start: NaiveTime,
        #[serde(default, with = "opt_hm_time")]
        end: Option<NaiveTime>,
    }

    #[test]
    fn total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(95, 20), 5);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn entity_id_accepts_numbers_and_strings() {
        let ids: Vec<EntityId> = serde_json::from_value(json!([42, "b7a1"])).unwrap();
        assert_eq!(ids[0].as_str(), "42");
        assert_eq!(ids[1].as_str(), "b7a1");
        assert_eq!(serde_json::to_value(&ids[0]).unwrap(), json!("42"));
    }

    #[test]
    fn times_accept_both_precisions() {
        let slot: Slot = serde_json::from_value(json!({"start": "09:00:00", "end": "10:30"})).unwrap();
        assert_eq!(slot.start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(slot.end, NaiveTime::from_hms_opt(10, 30, 0));

        let out = serde_json::to_value(&slot).unwrap();
        assert_eq!(out, json!({"start": "09:00", "end": "10:30"}));
    }

    #[test]
    fn page_defaults_missing_links() {
        let page: Page<u32> = serde_json::from_value(json!({"count": 41, "results": [1, 2]})).unwrap();
        assert_eq!(page.next, None);
        assert_eq!(page.total_pages(DEFAULT_PAGE_SIZE), 3);
    }
}
