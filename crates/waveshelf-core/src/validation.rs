//! Validation for upload candidates and rename targets.
//!
//! These checks run before any I/O: a candidate that fails validation must
//! cause zero storage or record-store calls.

use crate::constants::{ALLOWED_AUDIO_MIME_TYPES, MAX_AUDIO_FILE_SIZE};
use crate::error::AppError;
use crate::models::audio::extension_of;

/// Normalize a MIME type by stripping parameters
/// (e.g. "audio/mpeg; codecs=mp3" -> "audio/mpeg").
fn normalize_mime_type(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or(mime_type).trim()
}

/// Validate the MIME type of an upload candidate against the allow-list.
pub fn validate_mime_type(mime_type: &str) -> Result<(), AppError> {
    let normalized = normalize_mime_type(mime_type);
    if !ALLOWED_AUDIO_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(normalized))
    {
        return Err(AppError::Validation(format!(
            "Unsupported file format: {}. Supported formats: MP3, WAV, AAC, FLAC, OGG",
            mime_type
        )));
    }
    Ok(())
}

/// Validate the byte size of an upload candidate against the 50 MiB ceiling.
pub fn validate_file_size(file_size: usize) -> Result<(), AppError> {
    if file_size > MAX_AUDIO_FILE_SIZE {
        return Err(AppError::Validation(format!(
            "File too large: {:.2} MB. Maximum allowed is {} MB",
            file_size as f64 / 1024.0 / 1024.0,
            MAX_AUDIO_FILE_SIZE / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize a rename target.
///
/// Rejects empty or whitespace-only names. A new name without a `.` gets the
/// current name's extension appended so the record keeps its format hint.
pub fn normalize_rename(new_name: &str, current_name: &str) -> Result<String, AppError> {
    let trimmed = new_name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("File name must not be empty".to_string()));
    }
    if !trimmed.contains('.') {
        if let Some(ext) = extension_of(current_name) {
            return Ok(format!("{}.{}", trimmed, ext));
        }
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_mime_types() {
        for mime in ["audio/mpeg", "audio/mp3", "audio/wav", "audio/aac", "audio/flac", "audio/ogg"]
        {
            assert!(validate_mime_type(mime).is_ok(), "{} should be allowed", mime);
        }
    }

    #[test]
    fn test_disallowed_mime_type() {
        let err = validate_mime_type("video/mp4").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.user_message().contains("video/mp4"));
    }

    #[test]
    fn test_mime_type_parameters_stripped() {
        assert!(validate_mime_type("audio/ogg; codecs=opus").is_ok());
    }

    #[test]
    fn test_size_ceiling() {
        assert!(validate_file_size(50 * 1024 * 1024).is_ok());
        let err = validate_file_size(50 * 1024 * 1024 + 1).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rename_empty_rejected() {
        assert!(normalize_rename("", "song.mp3").is_err());
        assert!(normalize_rename("   ", "song.mp3").is_err());
    }

    #[test]
    fn test_rename_appends_extension() {
        assert_eq!(normalize_rename("renamed", "song.mp3").unwrap(), "renamed.mp3");
        assert_eq!(normalize_rename(" spaced ", "song.mp3").unwrap(), "spaced.mp3");
    }

    #[test]
    fn test_rename_keeps_explicit_extension() {
        assert_eq!(normalize_rename("renamed.wav", "song.mp3").unwrap(), "renamed.wav");
    }

    #[test]
    fn test_rename_no_source_extension() {
        assert_eq!(normalize_rename("renamed", "noext").unwrap(), "renamed");
    }
}
