//! # 转换结果模块
//!
//! 对外输出：SVG 字节、下载文件名、体积评估，以及给前端展示用的可序列化报告。

use serde::Serialize;

use super::source::{SvgDocument, Thumbnail};
use super::ConvertError;

/// 输出文件的 MIME 类型。
pub const SVG_MIME: &str = "image/svg+xml";
const FILE_NAME_SUFFIX: &str = "_mapLogo_optimized.svg";

/// 由标签生成下载文件名：`{label}_mapLogo_optimized.svg`。
///
/// 标签原样拼接，不做裁剪；只拒绝空字符串。
pub fn output_file_name(label: &str) -> Result<String, ConvertError> {
    if label.is_empty() {
        return Err(ConvertError::InvalidRequest("标签名不能为空".to_string()));
    }
    Ok(format!("{}{}", label, FILE_NAME_SUFFIX))
}

/// 缩略图几何信息（不含编码数据）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThumbnailGeometry {
    pub target_edge: u32,
    pub rendered_width: u32,
    pub rendered_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl From<&Thumbnail> for ThumbnailGeometry {
    fn from(thumbnail: &Thumbnail) -> Self {
        Self {
            target_edge: thumbnail.target_edge,
            rendered_width: thumbnail.rendered_width,
            rendered_height: thumbnail.rendered_height,
            offset_x: thumbnail.offset_x,
            offset_y: thumbnail.offset_y,
        }
    }
}

/// 一次成功转换的完整结果。
///
/// 超出预算时结果依旧返回，由调用方通过 `warning()` 提示用户。
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub file_name: String,
    pub mime_type: &'static str,
    pub svg: String,
    pub byte_size: u64,
    pub within_budget: bool,
    pub size_budget_bytes: u64,
    pub optimized: bool,
    pub thumbnail: ThumbnailGeometry,
}

/// 给前端展示的结果摘要（不含 SVG 正文）。
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub byte_size: u64,
    pub size_kb: u64,
    pub within_budget: bool,
    pub size_budget_bytes: u64,
    pub optimized: bool,
    pub thumbnail: ThumbnailGeometry,
    pub warning: Option<String>,
}

impl ConversionOutcome {
    pub(crate) fn new(
        file_name: String,
        document: SvgDocument,
        thumbnail: &Thumbnail,
        size_budget_bytes: u64,
    ) -> Self {
        Self {
            file_name,
            mime_type: SVG_MIME,
            byte_size: document.byte_size,
            within_budget: document.within_budget,
            optimized: document.optimized,
            svg: document.svg,
            size_budget_bytes,
            thumbnail: ThumbnailGeometry::from(thumbnail),
        }
    }

    /// 以 KB 为单位（四舍五入）的体积，用于展示。
    pub fn size_kb(&self) -> u64 {
        (self.byte_size as f64 / 1024.0).round() as u64
    }

    /// 超出预算时的告警文案。
    pub fn warning(&self) -> Option<String> {
        if self.within_budget {
            return None;
        }
        Some(format!(
            "导出文件为 {} KB，超过 {} KB 上限",
            self.size_kb(),
            (self.size_budget_bytes as f64 / 1024.0).round() as u64
        ))
    }

    pub fn svg_text(&self) -> &str {
        &self.svg
    }

    pub fn svg_bytes(&self) -> &[u8] {
        self.svg.as_bytes()
    }

    pub fn report(&self) -> ConversionReport {
        ConversionReport {
            file_name: self.file_name.clone(),
            mime_type: self.mime_type,
            byte_size: self.byte_size,
            size_kb: self.size_kb(),
            within_budget: self.within_budget,
            size_budget_bytes: self.size_budget_bytes,
            optimized: self.optimized,
            thumbnail: self.thumbnail,
            warning: self.warning(),
        }
    }
}
