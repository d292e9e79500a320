//! EXIF metadata extraction from images.

use exif::{Exif, In, Reader, Tag, Value};
use std::io::Cursor;

use crate::types::{Metadata, Ratio, SignedRatio};

/// Extracts the annotated EXIF fields from image files.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract EXIF data from the raw bytes of an image container.
    ///
    /// Returns `None` if the container has no EXIF block or it can't be parsed.
    /// Individual fields that are missing or of an unexpected type stay `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Metadata> {
        let exif = Reader::new()
            .read_from_container(&mut Cursor::new(bytes))
            .ok()?;

        Some(Metadata {
            date_time: Self::get_string(&exif, Tag::DateTime),
            exposure_time: Self::get_ratio(&exif, Tag::ExposureTime),
            f_number: Self::get_ratio(&exif, Tag::FNumber),
            iso: Self::get_u32(&exif, Tag::PhotographicSensitivity),
            image_description: Self::get_string(&exif, Tag::ImageDescription),
            make: Self::get_string(&exif, Tag::Make),
            model: Self::get_string(&exif, Tag::Model),
            exposure_program: Self::get_u16(&exif, Tag::ExposureProgram),
            exposure_bias: Self::get_signed_ratio(&exif, Tag::ExposureBiasValue),
            metering_mode: Self::get_u16(&exif, Tag::MeteringMode),
            flash: Self::get_u16(&exif, Tag::Flash),
            orientation: Self::get_u16(&exif, Tag::Orientation),
            color_space: None,
        })
    }

    /// Get an ASCII field up to its first NUL.
    ///
    /// The reader splits ASCII values at every NUL, so padding and anything
    /// after the terminator land in later components and are dropped here.
    fn get_string(exif: &Exif, tag: Tag) -> Option<String> {
        exif.get_field(tag, In::PRIMARY).and_then(|f| match &f.value {
            Value::Ascii(parts) => Some(
                parts
                    .first()
                    .map(|p| String::from_utf8_lossy(p).into_owned())
                    .unwrap_or_default(),
            ),
            _ => None,
        })
    }

    fn get_u32(exif: &Exif, tag: Tag) -> Option<u32> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Short(v) => v.first().map(|&x| x as u32),
                Value::Long(v) => v.first().copied(),
                _ => None,
            })
    }

    fn get_u16(exif: &Exif, tag: Tag) -> Option<u16> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Short(v) => v.first().copied(),
                Value::Byte(v) => v.first().map(|&x| x as u16),
                Value::Long(v) => v.first().and_then(|&x| u16::try_from(x).ok()),
                _ => None,
            })
    }

    fn get_ratio(exif: &Exif, tag: Tag) -> Option<Ratio> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Rational(v) => v.first().map(|r| Ratio::new(r.num, r.denom)),
                _ => None,
            })
    }

    fn get_signed_ratio(exif: &Exif, tag: Tag) -> Option<SignedRatio> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::SRational(v) => v.first().map(|r| SignedRatio::new(r.num, r.denom)),
                Value::Rational(v) => v.first().and_then(|r| {
                    Some(SignedRatio::new(
                        i32::try_from(r.num).ok()?,
                        i32::try_from(r.denom).ok()?,
                    ))
                }),
                _ => None,
            })
    }
}
