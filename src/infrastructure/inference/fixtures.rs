//! Test helpers for building images and canned classifiers

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::domain::inference::{InputShape, MockClassifier};

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    encode(&DynamicImage::ImageRgb8(image), ImageFormat::Png)
}

/// PNG with enough variation that its compressed payload spans many bytes
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x * y) % 256) as u8])
    });
    encode(&DynamicImage::ImageRgb8(image), ImageFormat::Png)
}

/// `value` at `index`, the remainder spread evenly over the other entries
pub fn peaked_scores(width: usize, index: usize, value: f32) -> Vec<f32> {
    let rest = (1.0 - value) / (width as f32 - 1.0);
    let mut scores = vec![rest; width];
    scores[index] = value;
    scores
}

/// Classifier mock declaring `shape` and always answering `scores`
pub fn classifier_returning(shape: InputShape, scores: Vec<f32>) -> MockClassifier {
    let width = scores.len();
    let mut classifier = MockClassifier::new();

    classifier.expect_input_shape().return_const(shape);
    classifier.expect_output_width().return_const(width);
    classifier
        .expect_evaluate()
        .returning(move |_| Ok(scores.clone()));

    classifier
}
