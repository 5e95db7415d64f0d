//! Embedded metadata carried between source and output containers.
//!
//! Pixel codecs drop EXIF and ICC data, so when a plan keeps metadata the
//! raw chunks are lifted from the source bytes and spliced back into the
//! freshly encoded container.

use img_parts::{Bytes, DynImage, ImageEXIF, ImageICC};
use tracing::debug;

/// Raw EXIF and ICC payloads, untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedMetadata {
    pub exif: Option<Bytes>,
    pub icc_profile: Option<Bytes>,
}

impl EmbeddedMetadata {
    /// Reads the metadata chunks from an encoded JPEG, PNG or WebP buffer.
    /// Containers that cannot be parsed yield empty metadata.
    pub fn read(encoded: &[u8]) -> Self {
        match DynImage::from_bytes(Bytes::copy_from_slice(encoded)) {
            Ok(Some(image)) => EmbeddedMetadata {
                exif: image.exif(),
                icc_profile: image.icc_profile(),
            },
            _ => EmbeddedMetadata::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exif.is_none() && self.icc_profile.is_none()
    }

    /// Splices the chunks into `encoded`. If the container cannot carry them
    /// the buffer is returned as-is.
    pub fn apply(&self, encoded: Vec<u8>) -> Vec<u8> {
        if self.is_empty() {
            return encoded;
        }

        let mut image = match DynImage::from_bytes(Bytes::from(encoded.clone())) {
            Ok(Some(image)) => image,
            _ => {
                debug!("Output container cannot carry metadata, dropping it");
                return encoded;
            }
        };

        image.set_exif(self.exif.clone());
        image.set_icc_profile(self.icc_profile.clone());

        let mut spliced = Vec::with_capacity(encoded.len());
        match image.encoder().write_to(&mut spliced) {
            Ok(_) => spliced,
            Err(e) => {
                debug!("Failed to splice metadata ({}), dropping it", e);
                encoded
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::DynamicImage;

    fn encode_jpeg() -> Vec<u8> {
        let img = DynamicImage::new_rgb8(8, 8);
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, 80)
            .encode_image(&img)
            .unwrap();
        buffer
    }

    #[test]
    fn test_read_plain_jpeg_has_no_metadata() {
        let metadata = EmbeddedMetadata::read(&encode_jpeg());
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_read_garbage_is_empty() {
        let metadata = EmbeddedMetadata::read(b"definitely not an image");
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_apply_then_read_preserves_exif() {
        let exif = Bytes::from_static(b"MM\x00\x2a\x00\x00\x00\x08\x00\x00\x00\x00\x00\x00");
        let metadata = EmbeddedMetadata {
            exif: Some(exif.clone()),
            icc_profile: None,
        };

        let spliced = metadata.apply(encode_jpeg());
        let read_back = EmbeddedMetadata::read(&spliced);
        assert_eq!(read_back.exif, Some(exif));
    }

    #[test]
    fn test_apply_to_unknown_container_is_noop() {
        let metadata = EmbeddedMetadata {
            exif: Some(Bytes::from_static(b"MM\x00\x2a")),
            icc_profile: None,
        };
        let data = b"raw bytes".to_vec();
        assert_eq!(metadata.apply(data.clone()), data);
    }
}
