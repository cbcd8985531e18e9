use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Maps a declared content type onto an accepted kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }

    /// Leading bytes every well-formed file of this kind starts with.
    pub fn signature(self) -> &'static [u8] {
        match self {
            ImageKind::Jpeg => &[0xFF, 0xD8, 0xFF],
            ImageKind::Png => &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        }
    }
}

/// Self-contained image reference: a `data:<mime>;base64,<payload>` URL.
///
/// Construction goes through [`ImageData::parse`], so any value held in a
/// draft is known to carry an accepted image type.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageData(String);

impl ImageData {
    pub fn parse(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime, payload) = rest.split_once(";base64,")?;
        ImageKind::from_mime(mime)?;
        if payload.is_empty() {
            return None;
        }
        Some(Self(url.to_string()))
    }

    pub fn from_parts(kind: ImageKind, base64_payload: &str) -> Self {
        Self(format!("data:{};base64,{}", kind.mime(), base64_payload))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> Option<ImageKind> {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .and_then(|(mime, _)| ImageKind::from_mime(mime))
    }
}

// Data URLs can run to megabytes; keep Debug output readable.
impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageData({:?}, {} bytes)", self.kind(), self.0.len())
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ImageData::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom("expected a JPEG or PNG data URL"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_png_data_url() {
        let img = ImageData::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(img.kind(), Some(ImageKind::Png));
    }

    #[test]
    fn test_parse_accepts_jpg_alias() {
        assert!(ImageData::parse("data:image/jpg;base64,/9j/4AAQ").is_some());
    }

    #[test]
    fn test_parse_rejects_gif() {
        assert!(ImageData::parse("data:image/gif;base64,R0lGODlh").is_none());
    }

    #[test]
    fn test_parse_rejects_plain_url() {
        assert!(ImageData::parse("https://example.com/me.png").is_none());
    }

    #[test]
    fn test_parse_rejects_empty_payload() {
        assert!(ImageData::parse("data:image/png;base64,").is_none());
    }

    #[test]
    fn test_from_parts_round_trips_through_parse() {
        let img = ImageData::from_parts(ImageKind::Jpeg, "/9j/4AAQ");
        assert_eq!(img.as_str(), "data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(ImageData::parse(img.as_str()), Some(img));
    }

    #[test]
    fn test_deserialize_rejects_foreign_mime() {
        let res: Result<ImageData, _> = serde_json::from_str(r#""data:text/plain;base64,aGk=""#);
        assert!(res.is_err());
    }
}
