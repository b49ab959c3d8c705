//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `ConversionService` 作为界面层持有的状态，替代网页版共享的全局变量。
//! 好处：
//! 1. 生命周期清晰（由嵌入方统一管理）
//! 2. 测试可创建独立实例，减少共享状态副作用
//! 3. 优化器作为策略在构造时注入
//!
//! ## 实现思路
//!
//! 核心流水线本身不协调并发请求，这里用异步互斥锁把转换串行化：
//! 第二次点击“转换”会等待第一次完成，而不是与之竞争。
//!
//! 对外仅暴露少量稳定 API：
//! - `convert`：执行完整转换链路
//! - `set_preset` / `preset`：切换与读取 Logo 预设
//! - `set_size_budget`：调整体积预算

use tokio::sync::Mutex;

use super::optimizer::{NoopOptimizer, SvgOptimizer};
use super::outcome::ConversionOutcome;
use super::source::ConversionRequest;
use super::{ConvertError, ConverterConfig, LogoConverter, LogoPreset};

/// 未匹配任何预设时对外展示的名称。
pub const CUSTOM_PRESET: &str = "custom";

/// 转换服务状态。
pub struct ConversionService<O = NoopOptimizer> {
    converter: LogoConverter,
    optimizer: O,
    in_flight: Mutex<()>,
}

impl ConversionService<NoopOptimizer> {
    /// 使用默认配置、无优化器创建服务。
    ///
    /// # 示例
    /// ```rust
    /// use map_logo_svg::converter::ConversionService;
    ///
    /// let service = ConversionService::new()?;
    /// assert_eq!(service.preset()?, "compact");
    /// # Ok::<(), map_logo_svg::converter::ConvertError>(())
    /// ```
    pub fn new() -> Result<Self, ConvertError> {
        Self::with_config(ConverterConfig::default())
    }

    /// 使用自定义配置创建服务。
    pub fn with_config(config: ConverterConfig) -> Result<Self, ConvertError> {
        Self::with_optimizer(config, NoopOptimizer)
    }
}

impl<O: SvgOptimizer> ConversionService<O> {
    /// 使用自定义配置与优化器创建服务。
    ///
    /// # 示例
    /// ```rust
    /// use map_logo_svg::converter::{ConversionService, ConverterConfig, XmlMinifier};
    ///
    /// let service = ConversionService::with_optimizer(ConverterConfig::default(), XmlMinifier)?;
    /// assert_eq!(service.optimizer_name(), "xml-minifier");
    /// # Ok::<(), map_logo_svg::converter::ConvertError>(())
    /// ```
    pub fn with_optimizer(config: ConverterConfig, optimizer: O) -> Result<Self, ConvertError> {
        let converter = LogoConverter::new(config)?;
        log::info!("🧰 Logo 转换服务已就绪（optimizer={}）", optimizer.name());
        Ok(Self {
            converter,
            optimizer,
            in_flight: Mutex::new(()),
        })
    }

    /// 执行完整转换流程：加载→解码→光栅化→打包。
    ///
    /// 同一服务上的并发调用按到达顺序依次执行。
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionOutcome, ConvertError> {
        let _guard = self.in_flight.lock().await;
        self.converter.convert(request, &self.optimizer).await
    }

    /// 按名称切换预设（`compact` / `detailed`）。
    pub fn set_preset(&self, preset: &str) -> Result<(), ConvertError> {
        let preset = LogoPreset::from_str(preset)?;
        self.converter.set_preset(preset)
    }

    /// 查询当前生效预设名称。
    pub fn preset(&self) -> Result<&'static str, ConvertError> {
        Ok(self
            .converter
            .preset()?
            .map(LogoPreset::as_str)
            .unwrap_or(CUSTOM_PRESET))
    }

    pub fn set_size_budget(&self, size_budget_bytes: u64) -> Result<(), ConvertError> {
        self.converter.set_size_budget(size_budget_bytes)
    }

    /// 当前配置快照。
    pub fn config(&self) -> Result<ConverterConfig, ConvertError> {
        self.converter.config_snapshot()
    }

    pub fn replace_config(&self, config: ConverterConfig) -> Result<(), ConvertError> {
        self.converter.replace_config(config)
    }

    pub fn optimizer_name(&self) -> &'static str {
        self.optimizer.name()
    }
}
