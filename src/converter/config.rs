//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ConverterConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中 Logo 预设（compact / detailed）作为高层语义，映射到底层参数组合。
//!
//! ## 实现思路
//!
//! - `Default` 提供与网页版一致的配置：100px 边长、0.8 质量、30KB 预算。
//! - `LogoPreset` 负责预设字符串解析与反向输出。
//! - `apply_preset` 将预设转换为具体参数。
//! - `infer_preset` 用于从当前配置反推预设（参数被单独改过时返回 `None`）。
//! - 支持 JSON 反序列化，缺省字段回退到默认值。

use serde::{Deserialize, Serialize};

use super::ConvertError;

/// 默认输出体积预算：30KB。
pub const DEFAULT_SIZE_BUDGET_BYTES: u64 = 30 * 1024;
/// 默认 SVG 视口边长。
pub const DEFAULT_VIEWPORT_SIZE: u32 = 100;
/// 默认缩略图边长。
pub const DEFAULT_TARGET_EDGE: u32 = 100;
/// 默认编码质量。
pub const DEFAULT_QUALITY: f32 = 0.8;

/// 缩略图参数：正方形边长与有损编码质量。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSpec {
    /// 目标正方形边长（像素）。
    pub target_edge: u32,
    /// 编码质量，取值 `0.0 ~ 1.0`。
    pub quality: f32,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            target_edge: DEFAULT_TARGET_EDGE,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ThumbnailSpec {
    pub fn new(target_edge: u32, quality: f32) -> Self {
        Self {
            target_edge,
            quality,
        }
    }

    /// 规范化质量：越界钳制到 `[0, 1]`，NaN 回退默认值。
    pub fn normalized(self) -> Self {
        let quality = if self.quality.is_nan() {
            DEFAULT_QUALITY
        } else {
            self.quality.clamp(0.0, 1.0)
        };
        Self { quality, ..self }
    }

    /// 映射到 JPEG 编码器的 `1..=100` 质量刻度。
    pub fn jpeg_quality(&self) -> u8 {
        let quality = self.normalized().quality;
        ((quality * 100.0).round() as i32).clamp(1, 100) as u8
    }
}

/// 缩放滤镜。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    pub(crate) fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Bilinear => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }

    pub(crate) fn to_fast_filter(self) -> fast_image_resize::FilterType {
        match self {
            Self::Nearest => fast_image_resize::FilterType::Box,
            Self::Bilinear => fast_image_resize::FilterType::Bilinear,
            Self::CatmullRom => fast_image_resize::FilterType::CatmullRom,
            Self::Lanczos3 => fast_image_resize::FilterType::Lanczos3,
        }
    }
}

/// 转换配置。
///
/// 字段覆盖了加载、解码、缩略图渲染与 SVG 打包四个阶段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// 默认缩略图参数（请求未覆盖时使用）。
    pub thumbnail: ThumbnailSpec,
    /// SVG 视口边长。
    pub viewport_size: u32,
    /// 输出体积预算（字节），仅用于告警。
    pub size_budget_bytes: u64,
    /// 留白区域的底色（RGB），JPEG 不含透明通道。
    pub matte: [u8; 3],
    /// 缩放滤镜。
    pub resize_filter: ResizeFilter,
    /// 输入原始字节上限。
    pub max_input_bytes: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 缩略图画布边长上限。
    pub max_target_edge: u32,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            thumbnail: ThumbnailSpec::default(),
            viewport_size: DEFAULT_VIEWPORT_SIZE,
            size_budget_bytes: DEFAULT_SIZE_BUDGET_BYTES,
            matte: [255, 255, 255],
            resize_filter: ResizeFilter::CatmullRom,
            max_input_bytes: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            max_target_edge: 2048,
        }
    }
}

/// Logo 预设。
///
/// - `Compact`：100px 边长、0.8 质量（默认）
/// - `Detailed`：200px 边长、0.6 质量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoPreset {
    Compact,
    Detailed,
}

impl LogoPreset {
    /// 从外部字符串解析预设。
    ///
    /// # 示例
    /// ```rust
    /// use map_logo_svg::converter::LogoPreset;
    ///
    /// let p = LogoPreset::from_str("Detailed")?;
    /// assert_eq!(p.as_str(), "detailed");
    /// # Ok::<(), map_logo_svg::converter::ConvertError>(())
    /// ```
    pub fn from_str(preset: &str) -> Result<Self, ConvertError> {
        match preset.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "detailed" => Ok(Self::Detailed),
            other => Err(ConvertError::InvalidFormat(format!(
                "未知预设：{}（可选：compact / detailed）",
                other
            ))),
        }
    }

    /// 将预设输出为稳定字符串，供前端展示与持久化。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Detailed => "detailed",
        }
    }

    fn thumbnail(self) -> ThumbnailSpec {
        match self {
            Self::Compact => ThumbnailSpec::new(100, 0.8),
            Self::Detailed => ThumbnailSpec::new(200, 0.6),
        }
    }
}

impl ConverterConfig {
    /// 从 JSON 文本加载配置，缺省字段使用默认值。
    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConvertError::InvalidRequest(format!("配置解析失败：{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验参数取值范围。
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.thumbnail.target_edge == 0 {
            return Err(ConvertError::InvalidRequest("target_edge 必须大于 0".to_string()));
        }
        if self.thumbnail.target_edge > self.max_target_edge {
            return Err(ConvertError::InvalidRequest(format!(
                "target_edge 不能大于 {}",
                self.max_target_edge
            )));
        }
        if !(0.0..=1.0).contains(&self.thumbnail.quality) {
            return Err(ConvertError::InvalidRequest(
                "quality 必须在 0.0~1.0 之间".to_string(),
            ));
        }
        if self.viewport_size == 0 {
            return Err(ConvertError::InvalidRequest("viewport_size 必须大于 0".to_string()));
        }
        if self.size_budget_bytes == 0 {
            return Err(ConvertError::InvalidRequest(
                "size_budget_bytes 必须大于 0".to_string(),
            ));
        }
        if self.max_input_bytes == 0
            || self.max_decoded_pixels == 0
            || self.max_decoded_bytes == 0
        {
            return Err(ConvertError::InvalidRequest("资源上限必须大于 0".to_string()));
        }
        Ok(())
    }

    /// 基于当前参数反推预设，参数不匹配任何预设时返回 `None`。
    pub fn infer_preset(&self) -> Option<LogoPreset> {
        [LogoPreset::Compact, LogoPreset::Detailed]
            .into_iter()
            .find(|preset| preset.thumbnail() == self.thumbnail)
    }

    /// 应用指定预设到实际参数。
    pub fn apply_preset(&mut self, preset: LogoPreset) {
        self.thumbnail = preset.thumbnail();
        self.viewport_size = DEFAULT_VIEWPORT_SIZE;
    }
}
