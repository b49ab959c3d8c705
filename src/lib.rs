//! # 地图 Logo SVG 转换工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │             界面层（拖放 / 预览 / 下载，外部协作方）        │
//! │                                                          │
//! │   图片字节 / Data URL + 标签名        SVG 字节 + 文件名     │
//! └───────┼───────────────────────────────────────↑──────────┘
//!         ↓ ConversionRequest          ConversionOutcome
//! ┌───────┼───────────────────────────────────────┼──────────┐
//! │       ↓            核心 (Rust)                 │          │
//! │                                                          │
//! │  converter                                               │
//! │   ├─ rasterizer   解码·等比缩放·居中·JPEG Data URI         │
//! │   ├─ packager     SVG 模板·可选优化·30KB 预算              │
//! │   ├─ optimizer    NoopOptimizer / XmlMinifier             │
//! │   └─ service      串行化转换请求                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`converter`] | 图片 → 缩略图 → SVG 的完整转换链路、配置、错误类型 |

pub mod converter;
