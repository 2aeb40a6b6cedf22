use crate::config::UploadConfig;
use crate::errors::{PortalError, Result};
use crate::utils::validate::validate_file_name;

/// 文件内容是否与扩展名相符
///
/// `extension` 需包含点号（如 ".png"）。文本类文件不检查内容，未知类型一律拒绝。
pub fn matches_extension(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    const OLE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    const ZIP: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

    match extension.to_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        ".pdf" => data.starts_with(b"%PDF"),
        // 旧版 Office 为 OLE 复合文档，新版为 zip 容器
        ".doc" | ".xls" | ".ppt" => data.starts_with(&OLE),
        ".docx" | ".xlsx" | ".pptx" | ".zip" => data.starts_with(&ZIP),
        ".txt" | ".md" | ".csv" | ".json" => true,
        _ => false,
    }
}

/// 上传前的本地校验：文件名、大小、类型白名单、内容魔术字节
///
/// 返回小写扩展名。
pub fn check_upload(config: &UploadConfig, file_name: &str, data: &[u8]) -> Result<String> {
    let extension = validate_file_name(file_name).map_err(PortalError::validation)?;

    if data.is_empty() {
        return Err(PortalError::validation(format!("{file_name} is empty")));
    }
    if data.len() > config.max_size {
        return Err(PortalError::validation(format!(
            "{file_name} is {} bytes, exceeds the {} byte limit",
            data.len(),
            config.max_size
        )));
    }
    if !config
        .allowed_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    {
        return Err(PortalError::validation(format!(
            "unsupported file type: {extension}"
        )));
    }
    if !matches_extension(data, &extension) {
        return Err(PortalError::validation(format!(
            "content of {file_name} does not match its {extension} extension"
        )));
    }

    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_image_magic() {
        assert!(matches_extension(&PNG, ".png"));
        assert!(matches_extension(&PNG, ".PNG"));
        assert!(!matches_extension(&PNG, ".jpg"));
        assert!(matches_extension(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
    }

    #[test]
    fn test_office_magic() {
        assert!(matches_extension(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".docx"));
        assert!(!matches_extension(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".doc"));
        assert!(matches_extension(b"%PDF-1.7", ".pdf"));
    }

    #[test]
    fn test_unknown_and_empty_rejected() {
        assert!(!matches_extension(b"MZ\x90\x00", ".exe"));
        assert!(!matches_extension(&[], ".txt"));
        assert!(matches_extension(b"hello", ".md"));
    }

    #[test]
    fn test_check_upload() {
        let config = UploadConfig::default();
        assert_eq!(check_upload(&config, "shot.png", &PNG).unwrap(), ".png");

        let err = check_upload(&config, "shot.exe", b"MZ").unwrap_err();
        assert!(err.message().contains("unsupported"));

        let err = check_upload(&config, "fake.pdf", b"not a pdf").unwrap_err();
        assert!(err.message().contains("does not match"));

        let small = UploadConfig {
            max_size: 4,
            ..UploadConfig::default()
        };
        let err = check_upload(&small, "notes.txt", b"hello").unwrap_err();
        assert_eq!(err.code(), "E001");
    }
}
