//! Image normalization following the preprocessing contract

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::io::Reader as ImageReader;
use image::RgbImage;

use crate::domain::inference::{
    ImageNormalizer, InputShape, NormalizedImage, PredictionError, PreprocessingContract,
    ResizeFilter,
};
use crate::domain::DomainError;

/// Decodes, resizes and scales uploads exactly as the contract prescribes
#[derive(Debug, Clone)]
pub struct ContractNormalizer {
    contract: PreprocessingContract,
}

impl ContractNormalizer {
    pub fn new(contract: PreprocessingContract) -> Result<Self, DomainError> {
        contract.validate()?;
        Ok(Self { contract })
    }

    /// Decode any supported format to 8-bit RGB; the format is sniffed from content
    fn decode(&self, bytes: &[u8]) -> Result<RgbImage, PredictionError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PredictionError::decode(e.to_string()))?;

        if reader.format().is_none() {
            return Err(PredictionError::decode("Unrecognized image format"));
        }

        let image = reader
            .decode()
            .map_err(|e| PredictionError::decode(e.to_string()))?;

        Ok(image.to_rgb8())
    }

    /// Resize without cropping or preserving aspect ratio
    fn resize(&self, image: &RgbImage) -> RgbImage {
        imageops::resize(
            image,
            self.contract.width,
            self.contract.height,
            filter_type(self.contract.resize),
        )
    }

    fn to_tensor(&self, image: &RgbImage) -> Result<NormalizedImage, PredictionError> {
        let shape = self.contract.input_shape();
        let scaling = self.contract.scaling;
        let mut data = vec![0.0_f32; shape.element_count()];

        for (x, y, pixel) in image.enumerate_pixels() {
            for c in 0..InputShape::CHANNELS {
                data[shape.offset(y as usize, x as usize, c)] = scaling.apply(c, pixel[c]);
            }
        }

        NormalizedImage::new(shape, data)
    }
}

impl ImageNormalizer for ContractNormalizer {
    fn target_shape(&self) -> InputShape {
        self.contract.input_shape()
    }

    fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage, PredictionError> {
        let decoded = self.decode(bytes)?;
        let resized = self.resize(&decoded);
        self.to_tensor(&resized)
    }
}

fn filter_type(filter: ResizeFilter) -> FilterType {
    match filter {
        ResizeFilter::Nearest => FilterType::Nearest,
        ResizeFilter::Triangle => FilterType::Triangle,
        ResizeFilter::CatmullRom => FilterType::CatmullRom,
        ResizeFilter::Gaussian => FilterType::Gaussian,
        ResizeFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inference::{TensorLayout, ValueScaling};
    use crate::infrastructure::inference::fixtures::{encode, gradient_png, solid_png};
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};

    fn contract(height: u32, width: u32, layout: TensorLayout) -> PreprocessingContract {
        PreprocessingContract {
            version: "test".to_string(),
            height,
            width,
            layout,
            ..Default::default()
        }
    }

    #[test]
    fn test_any_resolution_yields_contract_shape() {
        let normalizer = ContractNormalizer::new(PreprocessingContract::default()).unwrap();

        for (width, height) in [(1, 1), (300, 200), (17, 999), (224, 224), (640, 480)] {
            let image = normalizer.normalize(&solid_png(width, height, [10, 20, 30])).unwrap();

            assert_eq!(image.shape().dims(), [1, 224, 224, 3]);
            assert_eq!(image.height(), 224);
            assert_eq!(image.width(), 224);
            assert_eq!(image.channels(), 3);
            assert_eq!(image.data().len(), 224 * 224 * 3);
        }
    }

    #[test]
    fn test_mobilenet_scaling_of_solid_red() {
        let normalizer = ContractNormalizer::new(contract(8, 8, TensorLayout::Nhwc)).unwrap();
        let image = normalizer.normalize(&solid_png(20, 10, [255, 0, 0])).unwrap();

        assert_eq!(image.value(0, 0, 0), Some(1.0));
        assert_eq!(image.value(0, 0, 1), Some(-1.0));
        assert_eq!(image.value(7, 7, 2), Some(-1.0));
        assert!(image.data().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_nchw_layout_groups_channels() {
        let normalizer = ContractNormalizer::new(PreprocessingContract {
            scaling: ValueScaling::Unit,
            ..contract(4, 4, TensorLayout::Nchw)
        })
        .unwrap();

        let image = normalizer.normalize(&solid_png(9, 9, [255, 0, 255])).unwrap();
        let plane = 4 * 4;

        assert_eq!(image.shape().dims(), [1, 3, 4, 4]);
        assert!(image.data()[..plane].iter().all(|v| *v == 1.0));
        assert!(image.data()[plane..2 * plane].iter().all(|v| *v == 0.0));
        assert!(image.data()[2 * plane..].iter().all(|v| *v == 1.0));
    }

    #[test]
    fn test_grayscale_and_alpha_images_become_rgb() {
        let normalizer = ContractNormalizer::new(PreprocessingContract {
            scaling: ValueScaling::Raw,
            ..contract(2, 2, TensorLayout::Nhwc)
        })
        .unwrap();

        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 5, Luma([100])));
        let image = normalizer.normalize(&encode(&gray, ImageFormat::Png)).unwrap();
        assert_eq!(image.value(1, 1, 0), Some(100.0));
        assert_eq!(image.value(1, 1, 2), Some(100.0));

        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 0])));
        let image = normalizer.normalize(&encode(&rgba, ImageFormat::Png)).unwrap();
        assert_eq!(image.value(0, 0, 0), Some(1.0));
        assert_eq!(image.value(0, 0, 2), Some(3.0));
    }

    #[test]
    fn test_jpeg_uploads_are_accepted() {
        let normalizer = ContractNormalizer::new(contract(16, 16, TensorLayout::Nhwc)).unwrap();
        let jpeg = encode(
            &DynamicImage::ImageRgb8(image::RgbImage::from_pixel(40, 30, image::Rgb([0, 128, 0]))),
            ImageFormat::Jpeg,
        );

        let image = normalizer.normalize(&jpeg).unwrap();
        assert_eq!(image.shape().dims(), [1, 16, 16, 3]);
    }

    #[test]
    fn test_truncated_upload_is_a_decode_error() {
        let normalizer = ContractNormalizer::new(contract(8, 8, TensorLayout::Nhwc)).unwrap();
        let png = gradient_png(64, 64);

        let err = normalizer.normalize(&png[..png.len() / 2]).unwrap_err();
        assert!(matches!(err, PredictionError::Decode(_)));
    }

    #[test]
    fn test_garbage_and_empty_uploads_are_decode_errors() {
        let normalizer = ContractNormalizer::new(contract(8, 8, TensorLayout::Nhwc)).unwrap();

        assert!(matches!(
            normalizer.normalize(b"definitely not an image"),
            Err(PredictionError::Decode(_))
        ));
        assert!(matches!(
            normalizer.normalize(&[]),
            Err(PredictionError::Decode(_))
        ));
    }

    #[test]
    fn test_invalid_contract_is_rejected() {
        let result = ContractNormalizer::new(contract(0, 8, TensorLayout::Nhwc));
        assert!(result.is_err());
    }
}
