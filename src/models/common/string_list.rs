//! 字符串列表字段
//!
//! `fileUrls` 在数据库中以 JSON 字符串保存，接口有时原样返回字符串，
//! 有时返回数组，也可能为 null。这里统一读成 `Vec<String>`，写出时编码为 JSON 字符串。

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let encoded = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Encoded(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Raw::List(items)) => Ok(clean(items)),
        Some(Raw::Encoded(text)) => decode(&text).map_err(serde::de::Error::custom),
    }
}

/// 解码 JSON 字符串形式的列表；空串视为空列表，非 JSON 的单个地址视为一项
pub fn decode(text: &str) -> Result<Vec<String>, serde_json::Error> {
    let text = text.trim();
    if text.is_empty() || text == "null" {
        return Ok(Vec::new());
    }
    if !text.starts_with('[') {
        return Ok(vec![text.to_string()]);
    }
    serde_json::from_str::<Vec<String>>(text).map(clean)
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, serde::Serialize)]
    struct Holder {
        #[serde(with = "super", default)]
        urls: Vec<String>,
    }

    #[test]
    fn test_decode_encoded_string() {
        let holder: Holder =
            serde_json::from_str(r#"{"urls":"[\"/files/a.pdf\",\"/files/b.png\"]"}"#).unwrap();
        assert_eq!(holder.urls, vec!["/files/a.pdf", "/files/b.png"]);
    }

    #[test]
    fn test_decode_plain_array_and_null() {
        let holder: Holder = serde_json::from_str(r#"{"urls":["x"," ",""]}"#).unwrap();
        assert_eq!(holder.urls, vec!["x"]);

        let holder: Holder = serde_json::from_str(r#"{"urls":null}"#).unwrap();
        assert!(holder.urls.is_empty());

        let holder: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(holder.urls.is_empty());
    }

    #[test]
    fn test_single_bare_url() {
        assert_eq!(decode("/files/report.docx").unwrap(), vec!["/files/report.docx"]);
    }

    #[test]
    fn test_order_preserved_on_write() {
        let holder = Holder {
            urls: vec!["b".into(), "a".into()],
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"urls":"[\"b\",\"a\"]"}"#);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(decode("[\"unterminated").is_err());
    }
}
