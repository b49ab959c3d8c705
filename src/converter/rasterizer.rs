//! # 缩略图光栅化模块
//!
//! ## 设计思路
//!
//! 将“字节 → 原图 → 正方形缩略图 → JPEG Data URI”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸，按像素 / 内存上限快速拒绝
//! 2. 完整解码为 `SourceImage`
//! 3. 按长边对齐 `target_edge` 计算等比尺寸与居中偏移
//! 4. 缩放后叠加到底色画布（整块正方形画布参与编码）
//! 5. 按质量编码 JPEG 并包装为 Data URI
//!
//! 所有中间缓冲都是局部变量，任何返回路径上都会被释放。

use base64::{Engine as _, engine::general_purpose};
use fast_image_resize as fr;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba, RgbaImage};
use std::io::Cursor;

use super::source::{RawImageData, SourceImage, Thumbnail};
use super::{ConvertError, ConverterConfig, ResizeFilter, ThumbnailSpec};

/// 缩略图统一使用的有损格式。
pub const THUMBNAIL_MIME: &str = "image/jpeg";

/// 缩略图在正方形画布中的摆放位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitPlacement {
    pub width: u32,
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// 按长边对齐计算等比尺寸与居中偏移。
///
/// 长边恰好等于 `target_edge`，短边按比例缩放并四舍五入（至少 1 像素），
/// 偏移为 `(target_edge - 边长) / 2`，两侧留白最多相差 1 像素。
///
/// # 示例
/// ```rust
/// use map_logo_svg::converter::fit_within_square;
///
/// let fit = fit_within_square(400, 200, 100);
/// assert_eq!((fit.width, fit.height, fit.offset_x, fit.offset_y), (100, 50, 0, 25));
/// ```
pub fn fit_within_square(source_width: u32, source_height: u32, target_edge: u32) -> FitPlacement {
    let edge = target_edge as f64;
    let (width, height) = if source_width >= source_height {
        let scaled = (edge * source_height as f64 / source_width.max(1) as f64).round() as u32;
        (target_edge, scaled.clamp(1, target_edge.max(1)))
    } else {
        let scaled = (edge * source_width as f64 / source_height as f64).round() as u32;
        (scaled.clamp(1, target_edge.max(1)), target_edge)
    };

    FitPlacement {
        width,
        height,
        offset_x: target_edge.saturating_sub(width) / 2,
        offset_y: target_edge.saturating_sub(height) / 2,
    }
}

/// 将原始字节解码为原图。
///
/// 无法识别或损坏的输入返回 `ConvertError::Decode`，与后续渲染错误区分。
pub(crate) fn decode_source(
    raw: RawImageData,
    config: &ConverterConfig,
) -> Result<SourceImage, ConvertError> {
    let (header_width, header_height) = inspect_dimensions_from_memory(&raw.bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;
    validate_decoded_memory_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(&raw.bytes)
        .map_err(|e| ConvertError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(ConvertError::Decode(format!("图片尺寸无效：{}x{}", width, height)));
    }
    validate_pixel_limits(config, width, height)?;

    log::info!(
        "✅ 图片解码成功 - 来源: {} 尺寸: {}x{}",
        raw.source_hint,
        width,
        height
    );

    Ok(SourceImage::new(decoded))
}

/// 将原图渲染为居中的正方形缩略图并编码为 Data URI。
pub fn rasterize(
    source: &SourceImage,
    spec: ThumbnailSpec,
    config: &ConverterConfig,
) -> Result<Thumbnail, ConvertError> {
    let spec = spec.normalized();
    let edge = spec.target_edge;

    if edge == 0 {
        return Err(ConvertError::Render("缩略图边长为 0，无法创建画布".to_string()));
    }
    if edge > config.max_target_edge {
        return Err(ConvertError::Render(format!(
            "缩略图边长过大：{}（限制：{}）",
            edge, config.max_target_edge
        )));
    }

    let (source_width, source_height) = source.dimensions();
    if source_width == 0 || source_height == 0 {
        return Err(ConvertError::Render("原图尺寸为 0".to_string()));
    }

    let fit = fit_within_square(source_width, source_height, edge);
    let scaled = resize(&source.image, fit.width, fit.height, config.resize_filter)?;

    let [r, g, b] = config.matte;
    let mut canvas: RgbaImage = ImageBuffer::from_pixel(edge, edge, Rgba([r, g, b, 255]));
    image::imageops::overlay(&mut canvas, &scaled, fit.offset_x as i64, fit.offset_y as i64);

    let jpeg = encode_jpeg(canvas, spec.jpeg_quality())?;
    let encoded_len = jpeg.len();
    let encoded_data_uri = format!(
        "data:{};base64,{}",
        THUMBNAIL_MIME,
        general_purpose::STANDARD.encode(&jpeg)
    );

    log::debug!(
        "🖼️ 缩略图渲染完成 - {}x{} -> {}x{} 偏移({}, {}) 画布 {} 质量 {} JPEG {} 字节",
        source_width,
        source_height,
        fit.width,
        fit.height,
        fit.offset_x,
        fit.offset_y,
        edge,
        spec.jpeg_quality(),
        encoded_len
    );

    Ok(Thumbnail {
        encoded_data_uri,
        rendered_width: fit.width,
        rendered_height: fit.height,
        offset_x: fit.offset_x,
        offset_y: fit.offset_y,
        target_edge: edge,
        encoded_len,
    })
}

/// 仅通过内存中的图片头信息读取宽高。
///
/// 用于在完整解码前做像素限制检查。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ConvertError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ConvertError::Decode(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| ConvertError::Decode(format!("无法读取图片尺寸：{}", e)))
}

/// 校验像素数量是否超过配置上限。
fn validate_pixel_limits(
    config: &ConverterConfig,
    width: u32,
    height: u32,
) -> Result<(), ConvertError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| ConvertError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(ConvertError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}

fn validate_decoded_memory_limits(
    config: &ConverterConfig,
    width: u32,
    height: u32,
) -> Result<(), ConvertError> {
    let estimated = (width as u64)
        .checked_mul(height as u64)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| ConvertError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(ConvertError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}

/// 缩放到目标尺寸，`fast_image_resize` 失败时回退 `image::resize_exact`。
fn resize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: ResizeFilter,
) -> Result<RgbaImage, ConvertError> {
    if image.dimensions() == (target_width, target_height) {
        return Ok(image.to_rgba8());
    }

    match resize_with_fast_image_resize(image, target_width, target_height, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
            Ok(image
                .resize_exact(target_width, target_height, filter.to_image_filter())
                .to_rgba8())
        }
    }
}

fn resize_with_fast_image_resize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: ResizeFilter,
) -> Result<RgbaImage, ConvertError> {
    let src = image.to_rgba8();
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        src.into_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ConvertError::Render(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(filter.to_fast_filter()));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ConvertError::Render(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ConvertError::Render("fast_image_resize 输出缓冲长度异常".to_string()))
}

/// 整块画布编码为 JPEG。画布已不透明，直接丢弃 alpha 通道。
fn encode_jpeg(canvas: RgbaImage, quality: u8) -> Result<Vec<u8>, ConvertError> {
    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(&rgb)
        .map_err(|e| ConvertError::Render(format!("JPEG 编码失败：{}", e)))?;
    Ok(buffer)
}
