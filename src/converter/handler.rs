//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `LogoConverter` 只负责流程编排与配置管理，不依赖任何界面状态。
//! 处理链路固定为：
//! 1. 读取配置快照并校验请求
//! 2. 按来源加载原始字节
//! 3. 解码（阻塞线程池，第一次挂起）
//! 4. 光栅化缩略图（阻塞线程池）
//! 5. 打包 SVG（可选优化器，第二次挂起）
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ConverterConfig>>` 支持运行时切换预设。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 所有阶段共用一个 `Result` 错误通道，致命错误立即返回且不产生部分输出。
//! - 记录 `load/decode/rasterize/pack/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::optimizer::SvgOptimizer;
use super::outcome::{output_file_name, ConversionOutcome};
use super::source::ConversionRequest;
use super::{packager, rasterizer, ConvertError, ConverterConfig, LogoPreset};

/// Logo 转换器。
pub struct LogoConverter {
    pub(super) config: Arc<RwLock<ConverterConfig>>,
}

impl LogoConverter {
    /// 根据初始配置创建转换器，配置非法时返回 `InvalidRequest`。
    ///
    /// # 示例
    /// ```rust
    /// use map_logo_svg::converter::{ConverterConfig, LogoConverter};
    ///
    /// let converter = LogoConverter::new(ConverterConfig::default())?;
    /// # Ok::<(), map_logo_svg::converter::ConvertError>(())
    /// ```
    pub fn new(config: ConverterConfig) -> Result<Self, ConvertError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<ConverterConfig, ConvertError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ConvertError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 整体替换配置（先校验）。
    pub fn replace_config(&self, config: ConverterConfig) -> Result<(), ConvertError> {
        config.validate()?;
        let mut guard = self
            .config
            .write()
            .map_err(|_| ConvertError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        *guard = config;
        Ok(())
    }

    /// 切换 Logo 预设。
    pub fn set_preset(&self, preset: LogoPreset) -> Result<(), ConvertError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| ConvertError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_preset(preset);

        log::info!(
            "⚙️ 已切换 Logo 预设：{:?}（target_edge={}, quality={}, viewport={}）",
            preset,
            config.thumbnail.target_edge,
            config.thumbnail.quality,
            config.viewport_size
        );

        Ok(())
    }

    /// 获取当前生效预设，参数被单独调整过时返回 `None`。
    pub fn preset(&self) -> Result<Option<LogoPreset>, ConvertError> {
        let config = self
            .config
            .read()
            .map_err(|_| ConvertError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_preset())
    }

    /// 调整体积预算。
    pub fn set_size_budget(&self, size_budget_bytes: u64) -> Result<(), ConvertError> {
        if size_budget_bytes == 0 {
            return Err(ConvertError::InvalidRequest("size_budget_bytes 必须大于 0".to_string()));
        }
        let mut config = self
            .config
            .write()
            .map_err(|_| ConvertError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.size_budget_bytes = size_budget_bytes;
        Ok(())
    }

    /// 处理主入口：图片 + 标签 → SVG。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use map_logo_svg::converter::{
    ///     ConversionRequest, ConverterConfig, LogoConverter, XmlMinifier,
    /// };
    ///
    /// # async fn demo(png: Vec<u8>) -> Result<(), map_logo_svg::converter::ConvertError> {
    /// let converter = LogoConverter::new(ConverterConfig::default())?;
    /// let outcome = converter
    ///     .convert(ConversionRequest::from_bytes("acme", png), &XmlMinifier)
    ///     .await?;
    /// if let Some(warning) = outcome.warning() {
    ///     eprintln!("{}", warning);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn convert<O: SvgOptimizer>(
        &self,
        request: ConversionRequest,
        optimizer: &O,
    ) -> Result<ConversionOutcome, ConvertError> {
        let config = self.config_snapshot()?;
        let file_name = output_file_name(&request.label)?;
        let spec = request.spec.unwrap_or(config.thumbnail).normalized();
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = Self::load_input(request.input, &config)?;
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let decode_config = config.clone();
        let source = run_blocking("decode", move || {
            rasterizer::decode_source(raw, &decode_config)
        })
        .await?;
        let decode_elapsed = decode_start.elapsed();

        let rasterize_start = Instant::now();
        let rasterize_config = config.clone();
        let thumbnail = run_blocking("rasterize", move || {
            rasterizer::rasterize(&source, spec, &rasterize_config)
        })
        .await?;
        let rasterize_elapsed = rasterize_start.elapsed();

        let pack_start = Instant::now();
        let document = packager::pack(
            &thumbnail,
            config.viewport_size,
            config.size_budget_bytes,
            optimizer,
        )
        .await?;
        let pack_elapsed = pack_start.elapsed();

        let outcome =
            ConversionOutcome::new(file_name, document, &thumbnail, config.size_budget_bytes);

        log::info!(
            "✅ Logo 转换完成 - {} {} 字节 load={}ms decode={}ms rasterize={}ms pack={}ms total={}ms",
            outcome.file_name,
            outcome.byte_size,
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            rasterize_elapsed.as_millis(),
            pack_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        if let Some(warning) = outcome.warning() {
            log::warn!("⚠️ {}", warning);
        }

        Ok(outcome)
    }
}

/// 在阻塞线程池执行 CPU 密集阶段并等待结果。
async fn run_blocking<T, F>(stage: &'static str, task: F) -> Result<T, ConvertError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ConvertError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ConvertError::Render(format!("{} 阶段任务异常终止：{}", stage, e)))?
}
