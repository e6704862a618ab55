use super::Tensor;
use crate::errors::SynthError;
use image::{DynamicImage, GenericImageView, GrayImage, RgbImage};

impl Tensor {
    /// 由图片构造形状为`[C, H, W]`的张量，像素值保持在[0, 255]
    ///
    /// `channels`只可能是1（灰度）或3（RGB），图片会被缩放到`height`×`width`。
    pub fn from_image(
        image: &DynamicImage,
        channels: usize,
        height: usize,
        width: usize,
    ) -> Result<Tensor, SynthError> {
        let resized = if image.width() as usize == width && image.height() as usize == height {
            image.clone()
        } else {
            image.resize_exact(
                width as u32,
                height as u32,
                image::imageops::FilterType::Triangle,
            )
        };
        let raw: Vec<u8> = match channels {
            1 => resized.to_luma8().into_raw(),
            3 => resized.to_rgb8().into_raw(),
            _ => {
                return Err(SynthError::invalid_config(
                    "n_channels",
                    format!("图像张量的通道数只可能是1或3，实际为{channels}"),
                ));
            }
        };
        // image 库按 HWC 排列，这里转成 CHW
        let mut data = vec![0.0; channels * height * width];
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    data[c * height * width + y * width + x] =
                        raw[(y * width + x) * channels + c] as f32;
                }
            }
        }
        Ok(Tensor::new(&data, &[channels, height, width]))
    }

    /// 将形状为`[C, H, W]`、值域为[0, 1]的样本张量转换为图片。
    /// 超出[0, 1]的值会先被截断，NaN 视为0。
    pub fn to_image(&self) -> Result<DynamicImage, SynthError> {
        let shape = self.shape();
        if shape.len() != 3 {
            return Err(SynthError::ImageExport(format!(
                "图像张量应该有3个维度[C, H, W]，实际形状为{shape:?}"
            )));
        }
        let (channels, height, width) = (shape[0], shape[1], shape[2]);
        let view = self.data();
        let at = |c: usize, y: usize, x: usize| view[&[c, y, x][..]];
        let to_u8 = |v: f32| -> u8 {
            if v.is_nan() {
                0
            } else {
                (v.clamp(0.0, 1.0) * 255.0).round() as u8
            }
        };
        match channels {
            1 => {
                let mut buffer = GrayImage::new(width as u32, height as u32);
                for (x, y, pixel) in buffer.enumerate_pixels_mut() {
                    pixel.0 = [to_u8(at(0, y as usize, x as usize))];
                }
                Ok(DynamicImage::ImageLuma8(buffer))
            }
            3 => {
                let mut buffer = RgbImage::new(width as u32, height as u32);
                for (x, y, pixel) in buffer.enumerate_pixels_mut() {
                    let (y, x) = (y as usize, x as usize);
                    pixel.0 = [
                        to_u8(at(0, y, x)),
                        to_u8(at(1, y, x)),
                        to_u8(at(2, y, x)),
                    ];
                }
                Ok(DynamicImage::ImageRgb8(buffer))
            }
            _ => Err(SynthError::ImageExport(format!(
                "图像张量的通道数只可能是1或3，实际为{channels}"
            ))),
        }
    }
}
