//! Turns uploaded image bytes into the input tensor of the classifier.
//!
//! The model takes a single 224x224 RGB image in NHWC layout with every
//! channel scaled into `[0, 1]`.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage, Rgba32FImage};

use crate::error::{Error, Result};
use crate::timer::Timer;

/// Side of the square image the model was trained on
pub const IMAGE_SIZE: u32 = 224;

/// Color channels per pixel
pub const CHANNELS: usize = 3;

/// A batch of one preprocessed image, ready to be fed to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    values: Vec<f32>,
}

impl ImageTensor {
    /// Shape as `(batch, height, width, channels)`
    pub const SHAPE: [u64; 4] = [1, IMAGE_SIZE as u64, IMAGE_SIZE as u64, CHANNELS as u64];

    /// Number of values in the tensor
    pub const LEN: usize = (IMAGE_SIZE * IMAGE_SIZE) as usize * CHANNELS;

    /// Wrap already normalized values. Fails unless exactly `LEN` values are given.
    pub fn from_values(values: Vec<f32>) -> Result<Self> {
        if values.len() != Self::LEN {
            return Err(Error::Tensor {
                actual: values.len(),
                expected: Self::LEN,
            });
        }

        Ok(ImageTensor { values })
    }

    fn from_rgb(rgb: &RgbImage) -> Result<Self> {
        let values = rgb.as_raw().iter().map(|&c| c as f32 / 255f32).collect();

        Self::from_values(values)
    }

    pub fn shape(&self) -> [u64; 4] {
        Self::SHAPE
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Decode, resize and normalize an uploaded image.
pub fn preprocess(data: &[u8]) -> Result<ImageTensor> {
    let t = Timer::start("Load image from memory");
    let image = image::load_from_memory(data)?;
    t.stop();

    let t = Timer::start("Resizing image");
    let tensor = preprocess_image(&image)?;
    t.stop();

    Ok(tensor)
}

/// Resize an already decoded image and build its tensor.
pub fn preprocess_image(image: &DynamicImage) -> Result<ImageTensor> {
    ImageTensor::from_rgb(&resize_to_rgb(image))
}

/// Resize any decoded color layout to a 224x224 8-bit RGB image.
///
/// Lanczos avoids the aliasing nearest-neighbour leaves on downscaled photos.
/// Layouts with alpha are resized premultiplied, so color hidden under
/// transparent pixels never reaches the model; the alpha channel is dropped
/// afterwards. Single luma channels are replicated into red, green and blue.
fn resize_to_rgb(image: &DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => {
            imageops::resize(rgb, IMAGE_SIZE, IMAGE_SIZE, FilterType::Lanczos3)
        }
        DynamicImage::ImageLuma8(gray) => replicate_luma(&imageops::resize(
            gray,
            IMAGE_SIZE,
            IMAGE_SIZE,
            FilterType::Lanczos3,
        )),
        other if other.color().has_alpha() => resize_premultiplied(other.to_rgba32f()),
        other => other
            .resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::Lanczos3)
            .to_rgb8(),
    }
}

fn replicate_luma(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let [l] = gray.get_pixel(x, y).0;
        Rgb([l, l, l])
    })
}

fn resize_premultiplied(mut rgba: Rgba32FImage) -> RgbImage {
    for pixel in rgba.pixels_mut() {
        let a = pixel[3];
        pixel[0] *= a;
        pixel[1] *= a;
        pixel[2] *= a;
    }

    let resized = imageops::resize(&rgba, IMAGE_SIZE, IMAGE_SIZE, FilterType::Lanczos3);

    // Fully transparent pixels come out black.
    RgbImage::from_fn(IMAGE_SIZE, IMAGE_SIZE, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        if a > 0f32 {
            Rgb([to_byte(r / a), to_byte(g / a), to_byte(b / a)])
        } else {
            Rgb([0, 0, 0])
        }
    })
}

fn to_byte(value: f32) -> u8 {
    (value.max(0f32).min(1f32) * 255f32).round() as u8
}
