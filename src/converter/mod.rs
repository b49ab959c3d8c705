//! # Logo 转换模块（converter）
//!
//! ## 设计思路
//!
//! 该模块将“输入加载 → 解码 → 缩略图光栅化 → SVG 打包 → 体积评估”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：承载可注入状态（`ConversionService`），串行化转换请求
//! - `handler`：编排整条处理流水线
//! - `loader`：负责字节 / Data URL 加载与签名校验
//! - `rasterizer`：负责解码、等比缩放、居中绘制与 JPEG 编码
//! - `packager`：负责 SVG 模板、可选优化与预算判断
//! - `optimizer`：可注入的 SVG 优化策略
//! - `outcome`：对外输出与前端报告
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 界面层（拖放 / 选择文件 + 输入标签）
//!    ↓ ConversionRequest
//! service.rs（串行化、注入优化器）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积/签名校验）
//!    ├─ rasterizer.rs（解码 + 等比缩放 + 居中 + JPEG Data URI）
//!    └─ packager.rs（SVG 模板 + optimizer.rs + 预算判断）
//!    ↓
//! ConversionOutcome（SVG 字节 + 文件名 + 体积告警）
//! ```
//!
//! ## 分层职责建议
//!
//! - 默认参数与预设变更优先改 `config.rs`
//! - 业务流程顺序变更优先改 `handler.rs`
//! - 单阶段行为优化分别改 `loader/rasterizer/packager`

mod config;
mod error;
mod handler;
mod loader;
mod optimizer;
mod outcome;
mod packager;
mod rasterizer;
mod service;
mod source;

pub use config::{
    ConverterConfig, LogoPreset, ResizeFilter, ThumbnailSpec, DEFAULT_QUALITY,
    DEFAULT_SIZE_BUDGET_BYTES, DEFAULT_TARGET_EDGE, DEFAULT_VIEWPORT_SIZE,
};
pub use error::{ConvertError, ConvertErrorPayload};
pub use handler::LogoConverter;
pub use optimizer::{NoopOptimizer, OptimizedSvg, SvgOptimizer, XmlMinifier};
pub use outcome::{
    output_file_name, ConversionOutcome, ConversionReport, ThumbnailGeometry, SVG_MIME,
};
pub use packager::{build_svg, pack, within_budget};
pub use rasterizer::{fit_within_square, rasterize, FitPlacement, THUMBNAIL_MIME};
pub use service::{ConversionService, CUSTOM_PRESET};
pub use source::{ConversionRequest, ImageInput, SourceImage, SvgDocument, Thumbnail};
