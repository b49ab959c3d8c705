//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageInput` / `ConversionRequest` 表示外部输入语义
//! - `RawImageData` 表示已加载但未解码的字节
//! - `SourceImage` 表示已解码的原图
//! - `Thumbnail` 表示已编码为 Data URI 的缩略图
//! - `SvgDocument` 表示打包后的 SVG 文本
//!
//! 所有模型的生命周期都不超过单次转换调用。

use image::{DynamicImage, GenericImageView};

use super::ThumbnailSpec;

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// 原始图片字节（拖放 / 文件选择读取的内容）。
    Bytes(Vec<u8>),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    DataUrl(String),
}

/// 单次转换请求。
///
/// 替代网页版中共享的“当前上传图片”全局槽位，每次转换显式携带自己的输入。
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// 标签名（如数据中心名），只用于拼接下载文件名。
    pub label: String,
    pub input: ImageInput,
    /// 覆盖配置中的默认缩略图参数。
    pub spec: Option<ThumbnailSpec>,
}

impl ConversionRequest {
    pub fn new(label: impl Into<String>, input: ImageInput) -> Self {
        Self {
            label: label.into(),
            input,
            spec: None,
        }
    }

    pub fn from_bytes(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(label, ImageInput::Bytes(bytes))
    }

    pub fn with_spec(mut self, spec: ThumbnailSpec) -> Self {
        self.spec = Some(spec);
        self
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 解码后的原图，宽高均大于 0。
pub struct SourceImage {
    pub(crate) image: DynamicImage,
}

impl SourceImage {
    pub(crate) fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

/// 光栅化输出：居中绘制在正方形画布上并编码为 Data URI 的缩略图。
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    /// `data:image/jpeg;base64,...`
    pub encoded_data_uri: String,
    /// 缩放后的实际宽度，`<= target_edge`。
    pub rendered_width: u32,
    /// 缩放后的实际高度，`<= target_edge`。
    pub rendered_height: u32,
    /// 水平居中偏移。
    pub offset_x: u32,
    /// 垂直居中偏移。
    pub offset_y: u32,
    /// 画布边长。
    pub target_edge: u32,
    /// 编码后的 JPEG 字节数（Base64 之前）。
    pub encoded_len: usize,
}

/// 打包输出：最终 SVG 文本及体积评估。
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub viewport_size: u32,
    /// UTF-8 文本；`byte_size` 即其字节长度。
    pub svg: String,
    pub byte_size: u64,
    pub within_budget: bool,
    /// 是否采用了优化器输出。
    pub optimized: bool,
}

impl SvgDocument {
    /// 以文本形式查看文档。
    pub fn as_str(&self) -> &str {
        &self.svg
    }

    /// 写盘 / 下载用的原始字节。
    pub fn as_bytes(&self) -> &[u8] {
        self.svg.as_bytes()
    }
}
