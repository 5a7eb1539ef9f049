use crate::{
    layout::{LayoutKind, RegionName},
    presentation::{
        builder::{BuildResult, PresentationBuilder, UnitBuffer},
        MediaEntry,
    },
    xml::Element,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, ImageReader};
use std::{fs, io::Cursor};

const DEFAULT_DPI: f64 = 96.0;
const INCHES_PER_METER: f64 = 39.3701;
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

impl PresentationBuilder {
    /// Push a slide holding a base64 encoded PNG image.
    ///
    /// The image is centered and keeps its physical size.
    pub(crate) fn push_image(&self, title: Option<&str>, data: &str, buffer: &mut UnitBuffer) -> BuildResult {
        let data: String = data.chars().filter(|c| !c.is_whitespace()).collect();
        let contents = STANDARD.decode(data)?;
        let (width, height) = ImageReader::with_format(Cursor::new(&contents), ImageFormat::Png).into_dimensions()?;
        let (dpi_x, dpi_y) = png_dpi(&contents).unwrap_or((DEFAULT_DPI, DEFAULT_DPI));

        let path = format!("media/image{}.png", self.media.len() + buffer.media.len() + 1);
        let staged = self.scratch.path().join(&path);
        if let Some(parent) = staged.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&staged, &contents)?;
        log::debug!("staged {width}x{height} image at {}", staged.display());

        let image = Element::with_attributes(
            &self.namespaces,
            "draw:image",
            [
                ("xlink:href", path.as_str()),
                ("xlink:type", "simple"),
                ("xlink:show", "embed"),
                ("xlink:actuate", "onLoad"),
            ],
        )?;
        let layout = match title {
            Some(_) => LayoutKind::TitleAndImage,
            None => LayoutKind::ImageOnly,
        };
        let mut slide = self.new_slide(layout);
        slide.place_image(RegionName::Object, image, width as f64 / dpi_x, height as f64 / dpi_y)?;
        if let Some(title) = title {
            slide.fill(RegionName::Title, vec![self.title_paragraph(title)?])?;
        }
        buffer.media.push(MediaEntry { path, media_type: "image/png" });
        self.finish_slide(slide, buffer)
    }
}

/// Read the resolution out of a PNG's `pHYs` chunk, if it has one.
fn png_dpi(contents: &[u8]) -> Option<(f64, f64)> {
    let mut chunks = contents.strip_prefix(PNG_SIGNATURE)?;
    while chunks.len() >= 12 {
        let length = u32::from_be_bytes(chunks[0..4].try_into().ok()?) as usize;
        let chunk_type = &chunks[4..8];
        let data = chunks.get(8..8 + length)?;
        match chunk_type {
            b"pHYs" if length == 9 => {
                // Only a unit of 1, meters, says anything about the physical size.
                if data[8] != 1 {
                    return None;
                }
                let x = u32::from_be_bytes(data[0..4].try_into().ok()?) as f64;
                let y = u32::from_be_bytes(data[4..8].try_into().ok()?) as f64;
                if x == 0.0 || y == 0.0 {
                    return None;
                }
                return Some((x / INCHES_PER_METER, y / INCHES_PER_METER));
            }
            b"IDAT" | b"IEND" => return None,
            _ => (),
        };
        chunks = chunks.get(12 + length..)?;
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::presentation::builder::test_utils::builder;
    use image::{ImageBuffer, Rgb};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image: ImageBuffer<Rgb<u8>, _> = ImageBuffer::new(width, height);
        let mut output = Cursor::new(Vec::new());
        image.write_to(&mut output, ImageFormat::Png).expect("encoding failed");
        output.into_inner()
    }

    // Insert a pHYs chunk right after the IHDR one.
    fn with_phys(contents: &[u8], pixels_per_meter: u32) -> Vec<u8> {
        let ihdr_end = PNG_SIGNATURE.len() + 12 + 13;
        let mut output = contents[..ihdr_end].to_vec();
        output.extend(9u32.to_be_bytes());
        output.extend(b"pHYs");
        output.extend(pixels_per_meter.to_be_bytes());
        output.extend(pixels_per_meter.to_be_bytes());
        output.push(1);
        // The checksum isn't validated when reading the resolution.
        output.extend([0; 4]);
        output.extend(&contents[ihdr_end..]);
        output
    }

    #[test]
    fn default_dpi() {
        assert_eq!(png_dpi(&png(4, 4)), None);
    }

    #[test]
    fn phys_dpi() {
        let contents = with_phys(&png(4, 4), 3937);
        let (x, y) = png_dpi(&contents).expect("no dpi");
        assert!((x - 100.0).abs() < 0.01, "{x}");
        assert!((y - 100.0).abs() < 0.01, "{y}");
    }

    #[test]
    fn not_a_png() {
        assert_eq!(png_dpi(b"GIF89a"), None);
    }

    #[test]
    fn image_slide() {
        let builder = builder();
        let mut buffer = UnitBuffer::default();
        let data = STANDARD.encode(png(192, 96));
        // Notebooks wrap base64 payloads.
        let data = format!("{}\n{}", &data[..10], &data[10..]);
        builder.push_image(None, &data, &mut buffer).expect("build failed");

        assert_eq!(buffer.media, vec![MediaEntry { path: "media/image1.png".into(), media_type: "image/png" }]);
        assert!(builder.scratch.path().join("media/image1.png").exists());
        let slide = &buffer.slides[0];
        assert_eq!(slide.attribute("draw:master-page-name"), Some("layout-image-only"));
        let frame = &slide.children()[0];
        assert_eq!(frame.attribute("svg:width"), Some("2.000in"));
        assert_eq!(frame.attribute("svg:height"), Some("1.000in"));
        let image = &frame.children()[0];
        assert_eq!(image.attribute("xlink:href"), Some("media/image1.png"));
    }

    #[test]
    fn titled_image_slide() {
        let builder = builder();
        let mut buffer = UnitBuffer::default();
        builder.push_image(Some("Plot"), &STANDARD.encode(png(10, 10)), &mut buffer).expect("build failed");
        let slide = &buffer.slides[0];
        assert_eq!(slide.attribute("draw:master-page-name"), Some("layout-title-and-image"));
        assert_eq!(slide.children().len(), 2);
    }

    #[test]
    fn invalid_base64() {
        let builder = builder();
        let mut buffer = UnitBuffer::default();
        let result = builder.push_image(None, "not base64!", &mut buffer);
        assert!(matches!(result, Err(crate::presentation::BuildError::DecodeImage(_))));
        assert!(buffer.slides.is_empty());
    }
}
