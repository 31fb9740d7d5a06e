//! Image upload rules: content sniffing, accepted types and size limit.

use strum::{Display, EnumString, IntoStaticStr};

use crate::models::{UploadedImage, ValidImage};

/// Largest accepted upload, in kilobytes
pub const MAX_IMAGE_KILOBYTES: usize = 2048;

pub const NOT_AN_IMAGE: &str = "The image field must be an image.";
pub const WRONG_TYPE: &str = "The image field must be a file of type: jpeg, png, jpg, gif, webp.";
pub const TOO_LARGE: &str = "The image field must not be greater than 2048 kilobytes.";

/// Image formats recognised from their leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ImageKind {
    #[strum(to_string = "jpg", serialize = "jpeg")]
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    Svg,
}

impl ImageKind {
    /// Sniff the format from the file signature
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n', ..] => Some(Self::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ if looks_like_svg(bytes) => Some(Self::Svg),
            _ => None,
        }
    }

    /// Types an upload may have to be stored
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::Gif | Self::Webp)
    }

    /// Canonical file extension
    pub fn extension(self) -> &'static str {
        self.into()
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    (text.starts_with("<?xml") || text.starts_with("<svg")) && text.contains("<svg")
}

/// Client file names may omit the extension, but one that is present must be an accepted type
fn has_accepted_extension(file_name: Option<&str>) -> bool {
    let base = file_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .unwrap_or_default();
    match base.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => extension
            .to_ascii_lowercase()
            .parse::<ImageKind>()
            .is_ok_and(|kind| kind.is_accepted()),
        _ => true,
    }
}

/// Check an upload against every image rule, returning all failures
pub fn validate(upload: &UploadedImage) -> Result<ValidImage, Vec<&'static str>> {
    let mut failures = Vec::new();
    let kind = ImageKind::detect(&upload.bytes);

    match kind {
        None => {
            failures.push(NOT_AN_IMAGE);
            failures.push(WRONG_TYPE);
        }
        Some(kind) if !kind.is_accepted() => failures.push(WRONG_TYPE),
        Some(_) if !has_accepted_extension(upload.file_name.as_deref()) => {
            failures.push(WRONG_TYPE)
        }
        Some(_) => {}
    }

    if upload.bytes.len() > MAX_IMAGE_KILOBYTES * 1024 {
        failures.push(TOO_LARGE);
    }

    match kind {
        Some(kind) if failures.is_empty() => Ok(ValidImage {
            kind,
            file_name: upload.file_name.clone(),
            bytes: upload.bytes.clone(),
        }),
        _ => Err(failures),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn upload(bytes: &[u8]) -> UploadedImage {
        UploadedImage {
            file_name: None,
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    #[test]
    fn test_detect_signatures() {
        assert_eq!(ImageKind::detect(b"\xFF\xD8\xFF\xE0rest"), Some(ImageKind::Jpeg));
        assert_eq!(
            ImageKind::detect(b"\x89PNG\r\n\x1a\n\0\0"),
            Some(ImageKind::Png)
        );
        assert_eq!(ImageKind::detect(b"GIF89a...."), Some(ImageKind::Gif));
        assert_eq!(ImageKind::detect(b"RIFF\x10\0\0\0WEBPVP8 "), Some(ImageKind::Webp));
        assert_eq!(ImageKind::detect(b"BM\0\0"), Some(ImageKind::Bmp));
        assert_eq!(
            ImageKind::detect(b"<?xml version=\"1.0\"?><svg></svg>"),
            Some(ImageKind::Svg)
        );
        assert_eq!(ImageKind::detect(b"%PDF-1.7"), None);
        assert_eq!(ImageKind::detect(b""), None);
    }

    #[test]
    fn test_extension_names() {
        assert_eq!(ImageKind::Jpeg.extension(), "jpg");
        assert_eq!(ImageKind::Webp.extension(), "webp");
        assert_eq!("jpeg".parse::<ImageKind>().unwrap(), ImageKind::Jpeg);
    }

    #[test]
    fn test_non_image_fails_image_and_type_rules() {
        let failures = validate(&upload(b"just some text")).unwrap_err();
        assert_eq!(failures, vec![NOT_AN_IMAGE, WRONG_TYPE]);
    }

    #[test]
    fn test_bmp_is_an_image_of_the_wrong_type() {
        let failures = validate(&upload(b"BM\0\0\0\0")).unwrap_err();
        assert_eq!(failures, vec![WRONG_TYPE]);
    }

    #[test]
    fn test_client_extension_must_be_an_accepted_type() {
        let png = b"\x89PNG\r\n\x1a\n\0\0";
        let named = |name: &str| UploadedImage {
            file_name: Some(name.into()),
            bytes: Bytes::copy_from_slice(png),
        };

        assert_eq!(validate(&named("x.html")).unwrap_err(), vec![WRONG_TYPE]);
        assert_eq!(validate(&named("photo.svg")).unwrap_err(), vec![WRONG_TYPE]);
        assert!(validate(&named("photo.JPEG")).is_ok());
        assert!(validate(&named("photo.png")).is_ok());
        assert!(validate(&named("photo")).is_ok());
        assert!(validate(&named(".hidden")).is_ok());
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let mut bytes = b"GIF89a".to_vec();
        bytes.resize(MAX_IMAGE_KILOBYTES * 1024, 0);
        assert!(validate(&upload(&bytes)).is_ok());

        bytes.push(0);
        assert_eq!(validate(&upload(&bytes)).unwrap_err(), vec![TOO_LARGE]);
    }
}
