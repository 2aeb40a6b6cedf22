//! 时间戳解析
//!
//! 后端返回的时间有两种写法：RFC 3339，以及不带时区的 `yyyy-MM-dd HH:mm:ss`。
//! 后者按后端固定的东八区解释，统一换算成 UTC。

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserializer, Serializer};
use std::fmt;

/// 后端无时区时间所在的时区偏移（秒）
pub const BACKEND_UTC_OFFSET_SECS: i64 = 8 * 3600;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// 解析时间字符串
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let value = value.trim();
    let mut last_err = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };

    for format in NAIVE_FORMATS {
        match NaiveDateTime::parse_from_str(value, format) {
            Ok(naive) => {
                return Ok((naive - Duration::seconds(BACKEND_UTC_OFFSET_SECS)).and_utc());
            }
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}

struct TimestampVisitor;

impl<'de> serde::de::Visitor<'de> for TimestampVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an RFC 3339 timestamp or a `yyyy-MM-dd HH:mm:ss` string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        parse_timestamp(value).map_err(|_| {
            serde::de::Error::invalid_value(serde::de::Unexpected::Str(value), &self)
        })
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        // 毫秒时间戳
        DateTime::<Utc>::from_timestamp_millis(value).ok_or_else(|| {
            serde::de::Error::invalid_value(serde::de::Unexpected::Signed(value), &self)
        })
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let signed = i64::try_from(value).map_err(|_| {
            serde::de::Error::invalid_value(serde::de::Unexpected::Unsigned(value), &self)
        })?;
        self.visit_i64(signed)
    }
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TimestampVisitor)
}

/// 可空时间字段
pub mod option {
    use super::TimestampVisitor;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Millis(i64),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Text(s)) => serde::de::Visitor::visit_str(TimestampVisitor, &s).map(Some),
            Some(Raw::Millis(ms)) => serde::de::Visitor::visit_i64(TimestampVisitor, ms).map(Some),
        }
    }
}
