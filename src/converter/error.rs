//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载转换链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! - 致命错误（解码 / 渲染 / 请求 / 资源限制）立即中止整条流水线，不产生任何部分输出。
//! - `Optimizer` 仅由优化器产生，打包阶段会吞掉并回退到未优化文档。
//! - 超出体积预算不是错误，而是成功结果上的告警标记。

use serde::Serialize;

/// 转换流水线统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("请求无效：{0}")]
    InvalidRequest(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("渲染错误：{0}")]
    Render(String),

    #[error("优化器错误：{0}")]
    Optimizer(String),
}

impl ConvertError {
    /// 稳定错误码，供前端按类型展示文案。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_failed",
            Self::InvalidFormat(_) => "invalid_format",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Render(_) => "render_failed",
            Self::Optimizer(_) => "optimizer_failed",
        }
    }

    /// 出错所在的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "request",
            Self::InvalidFormat(_) => "load",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::Render(_) => "rasterize",
            Self::Optimizer(_) => "optimize",
        }
    }

    /// 是否需要中止整条转换。
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Optimizer(_))
    }
}

/// 前端可直接消费的结构化错误。
#[derive(Debug, Clone, Serialize)]
pub struct ConvertErrorPayload {
    pub code: &'static str,
    pub stage: &'static str,
    pub message: String,
}

impl From<ConvertError> for ConvertErrorPayload {
    fn from(error: ConvertError) -> Self {
        Self {
            code: error.code(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for ConvertError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimizer_error_is_the_only_recoverable_variant() {
        assert!(!ConvertError::Optimizer("boom".into()).is_fatal());
        assert!(ConvertError::Decode("x".into()).is_fatal());
        assert!(ConvertError::Render("x".into()).is_fatal());
        assert!(ConvertError::InvalidRequest("x".into()).is_fatal());
    }

    #[test]
    fn payload_carries_code_stage_and_message() {
        let payload = ConvertErrorPayload::from(ConvertError::Decode("坏数据".into()));

        assert_eq!(payload.code, "decode_failed");
        assert_eq!(payload.stage, "decode");
        assert_eq!(payload.message, "解码错误：坏数据");
    }

    #[test]
    fn error_serializes_as_message_string() {
        let json = serde_json::to_string(&ConvertError::Render("画布为空".into()))
            .expect("serialize error");

        assert_eq!(json, "\"渲染错误：画布为空\"");
    }
}
