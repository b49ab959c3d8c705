//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（原始字节 / Data URL）的原始字节加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 字节：体积限制 + 文件签名嗅探。
//! - Base64：格式解析 + 解码前体积估算 + 签名嗅探。
//! - `infer` 不认识的签名交给 `image::guess_format` 兜底（PNM、QOI 等），
//!   二者都不认识时按解码错误处理。

use base64::{Engine as _, engine::general_purpose};

use super::source::{ImageInput, RawImageData};
use super::{ConvertError, ConverterConfig, LogoConverter};

impl LogoConverter {
    /// 按来源加载原始图片字节。
    pub(super) fn load_input(
        input: ImageInput,
        config: &ConverterConfig,
    ) -> Result<RawImageData, ConvertError> {
        match input {
            ImageInput::Bytes(bytes) => Self::load_from_bytes(bytes, config),
            ImageInput::DataUrl(data) => Self::load_from_base64(&data, config),
        }
    }

    fn load_from_bytes(
        bytes: Vec<u8>,
        config: &ConverterConfig,
    ) -> Result<RawImageData, ConvertError> {
        log::debug!("📁 开始处理图片字节 - {} 字节", bytes.len());

        Self::check_input_len(bytes.len() as u64, config.max_input_bytes, "输入图片")?;
        Self::sniff_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "bytes",
        })
    }

    fn load_from_base64(
        data: &str,
        config: &ConverterConfig,
    ) -> Result<RawImageData, ConvertError> {
        log::debug!("📝 开始处理 base64 图片");

        let bytes = Self::parse_base64_with_limit(data, config.max_input_bytes)?;
        Self::sniff_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "base64",
        })
    }

    /// 统一的体积上限检查：原始字节长度与 Base64 解码估算值共用。
    fn check_input_len(len: u64, max_input_bytes: u64, what: &str) -> Result<(), ConvertError> {
        if len > max_input_bytes {
            return Err(ConvertError::ResourceLimit(format!(
                "{}过大：{:.2} MB（限制：{:.2} MB）",
                what,
                len as f64 / 1024.0 / 1024.0,
                max_input_bytes as f64 / 1024.0 / 1024.0
            )));
        }
        Ok(())
    }

    /// Base64 解码后长度的上界：每 4 个字符最多 3 字节。
    fn decoded_len_upper_bound(base64_data: &str) -> u64 {
        (base64_data.len() as u64).div_ceil(4).saturating_mul(3)
    }

    /// 解析 Base64 输入（支持 Data URL / 纯 Base64），解码前先按估算体积拒绝超限输入。
    pub(crate) fn parse_base64_with_limit(
        data: &str,
        max_input_bytes: u64,
    ) -> Result<Vec<u8>, ConvertError> {
        let normalized = data.trim();

        let base64_data = match normalized.strip_prefix("data:") {
            Some(rest) => {
                let (_, payload) = rest
                    .split_once(";base64,")
                    .ok_or_else(|| ConvertError::InvalidFormat("缺少 base64 标记".to_string()))?;
                payload
            }
            None => normalized,
        };

        Self::check_input_len(
            Self::decoded_len_upper_bound(base64_data),
            max_input_bytes,
            "Base64 预计解码体积",
        )?;

        general_purpose::STANDARD
            .decode(base64_data)
            .map_err(|e| ConvertError::Decode(format!("Base64 解码失败：{}", e)))
    }

    /// 通过文件签名（magic bytes）嗅探输入是否为图片。
    ///
    /// 只有空输入算格式错误；签名属于非图片类型或无法识别时都归为解码错误。
    fn sniff_image_signature(bytes: &[u8]) -> Result<(), ConvertError> {
        if bytes.is_empty() {
            return Err(ConvertError::InvalidFormat("图片内容为空".to_string()));
        }

        if let Some(kind) = infer::get(bytes) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(ConvertError::Decode(format!(
                    "文件签名不是图片类型：{}",
                    kind.mime_type()
                )));
            }
            return Ok(());
        }

        let format = image::guess_format(bytes)
            .map_err(|e| ConvertError::Decode(format!("无法识别图片格式：{}", e)))?;
        log::debug!("🔎 签名由 image 识别：{:?}", format);
        Ok(())
    }
}
