use once_cell::sync::Lazy;
use regex::Regex;

static HTTP_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)https?://[^\s/$.?#][^\s]*$").expect("Invalid url regex")
});

// 文件名中不允许出现路径分隔符和控制字符
static FILE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/\\\x00-\x1F]+$").expect("Invalid file name regex"));

pub fn validate_http_url(url: &str) -> Result<(), &'static str> {
    if !HTTP_URL_RE.is_match(url.trim()) {
        return Err("URL must start with http:// or https://");
    }
    Ok(())
}

pub fn validate_non_blank(text: &str) -> Result<(), &'static str> {
    if text.trim().is_empty() {
        return Err("Text must not be blank");
    }
    Ok(())
}

/// 校验上传文件名，返回小写扩展名（含点号）
pub fn validate_file_name(name: &str) -> Result<String, &'static str> {
    let name = name.trim();
    if name.is_empty() || name.len() > 255 {
        return Err("File name length must be between 1 and 255 characters");
    }
    if !FILE_NAME_RE.is_match(name) || name == "." || name == ".." {
        return Err("File name contains illegal characters");
    }
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => Ok(name[dot..].to_lowercase()),
        _ => Err("File name has no extension"),
    }
}

/// 分数必须是有限数且在 `[0, max_score]` 内
pub fn validate_score(score: f64, max_score: f64) -> Result<(), String> {
    if !score.is_finite() {
        return Err("Score must be a finite number".to_string());
    }
    if score < 0.0 || score > max_score {
        return Err(format!("Score {score} out of range [0, {max_score}]"));
    }
    Ok(())
}
