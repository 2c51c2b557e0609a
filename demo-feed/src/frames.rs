//! Synthetic camera frames.
//!
//! A horizontal gray gradient with a bright bar sweeping across it, encoded
//! as JPEG and wrapped in the `video_frame` envelope the dashboard expects.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

/// Width of the moving bar in pixels.
const BAR_WIDTH: u32 = 12;

/// Camera envelope on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct VideoFrameMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Base64 JPEG bytes, no data-URL prefix
    pub payload: String,
}

impl VideoFrameMessage {
    pub fn new(jpeg: &[u8]) -> Self {
        Self {
            kind: "video_frame",
            payload: STANDARD.encode(jpeg),
        }
    }
}

/// Encode a grayscale frame as JPEG.
pub fn encode_gray_jpeg(data: &[u8], width: u32, height: u32, quality: u8) -> Option<Vec<u8>> {
    use image::{GrayImage, ImageBuffer};

    let img: GrayImage = ImageBuffer::from_raw(width, height, data.to_vec())?;

    let mut jpeg_bytes = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality);

    encoder.encode_image(&img).ok()?;

    Some(jpeg_bytes)
}

/// Produces successive test-pattern frames.
#[derive(Debug, Clone)]
pub struct PatternGenerator {
    width: u32,
    height: u32,
    quality: u8,
    frame_index: u64,
}

impl PatternGenerator {
    pub fn new(width: u32, height: u32, quality: u8) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            quality: quality.clamp(1, 100),
            frame_index: 0,
        }
    }

    pub fn frames_generated(&self) -> u64 {
        self.frame_index
    }

    /// Raw pixels for the given frame index, row-major.
    pub fn pixels(&self, index: u64) -> Vec<u8> {
        let bar_x = (index * 4 % u64::from(self.width)) as u32;
        let mut data = Vec::with_capacity((self.width * self.height) as usize);
        for _y in 0..self.height {
            for x in 0..self.width {
                let in_bar = x >= bar_x && x < bar_x + BAR_WIDTH;
                let value = if in_bar {
                    255
                } else {
                    (x * 200 / self.width) as u8
                };
                data.push(value);
            }
        }
        data
    }

    /// Render and encode the next frame.
    pub fn next_jpeg(&mut self) -> Option<Vec<u8>> {
        let data = self.pixels(self.frame_index);
        self.frame_index += 1;
        encode_gray_jpeg(&data, self.width, self.height, self.quality)
    }

    /// Next frame in its wire envelope.
    pub fn next_message(&mut self) -> Option<VideoFrameMessage> {
        self.next_jpeg().map(|jpeg| VideoFrameMessage::new(&jpeg))
    }
}
