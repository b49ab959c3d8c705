//! # SVG 优化器模块
//!
//! ## 设计思路
//!
//! 优化器是可注入的策略：打包阶段只依赖 `SvgOptimizer` trait，
//! 不再在运行时探测某个全局对象是否存在。
//!
//! - `NoopOptimizer`：默认策略，原样返回（等价于“没有优化器”）。
//! - `XmlMinifier`：基于 `quick-xml` 的结构压缩，去掉声明、注释与空白文本节点，
//!   不改变渲染结果。
//!
//! 优化器可以是异步的（例如调用外部进程或服务），因此 `optimize` 返回 `Future`。

use std::future::Future;

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

use super::ConvertError;

/// 优化器输出，对应外部压缩工具的 `{ data }` 结构。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedSvg {
    pub data: String,
}

/// SVG 结构优化策略。
pub trait SvgOptimizer: Send + Sync {
    /// 用于日志的策略名称。
    fn name(&self) -> &'static str;

    /// 是否真正执行优化；`false` 时打包阶段直接使用原始模板。
    fn is_active(&self) -> bool {
        true
    }

    fn optimize(
        &self,
        svg: &str,
    ) -> impl Future<Output = Result<OptimizedSvg, ConvertError>> + Send;
}

/// 空策略：不做任何优化。
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOptimizer;

impl SvgOptimizer for NoopOptimizer {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn is_active(&self) -> bool {
        false
    }

    async fn optimize(&self, svg: &str) -> Result<OptimizedSvg, ConvertError> {
        Ok(OptimizedSvg { data: svg.to_string() })
    }
}

/// 基于 `quick-xml` 的结构压缩器。
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlMinifier;

impl XmlMinifier {
    /// 同步执行压缩。
    pub fn minify(svg: &str) -> Result<String, ConvertError> {
        let mut reader = Reader::from_str(svg);
        reader.config_mut().trim_text(true);
        let mut writer = Writer::new(Vec::with_capacity(svg.len()));

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ConvertError::Optimizer(format!("SVG 解析失败：{}", e)))?;

            match event {
                Event::Eof => break,
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Text(ref text) if text.iter().all(|b| b.is_ascii_whitespace()) => {}
                other => writer
                    .write_event(other)
                    .map_err(|e| ConvertError::Optimizer(format!("SVG 写出失败：{}", e)))?,
            }
        }

        let minified = String::from_utf8(writer.into_inner())
            .map_err(|e| ConvertError::Optimizer(format!("SVG 输出不是合法 UTF-8：{}", e)))?;

        if !minified.contains("<svg") {
            return Err(ConvertError::Optimizer("压缩结果缺少 <svg> 根元素".to_string()));
        }

        Ok(minified)
    }
}

impl SvgOptimizer for XmlMinifier {
    fn name(&self) -> &'static str {
        "xml-minifier"
    }

    async fn optimize(&self, svg: &str) -> Result<OptimizedSvg, ConvertError> {
        Self::minify(svg).map(|data| OptimizedSvg { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported -->
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
    <image href="data:image/jpeg;base64,AAAA" x="0" y="0" width="100" height="100"/>
</svg>"#;

    #[test]
    fn minifier_strips_declaration_comments_and_whitespace() {
        let minified = XmlMinifier::minify(SAMPLE).expect("minify should succeed");

        assert!(!minified.contains("<?xml"));
        assert!(!minified.contains("<!--"));
        assert!(!minified.contains('\n'));
        assert!(minified.starts_with("<svg"));
        assert!(minified.ends_with("</svg>"));
        assert!(minified.len() < SAMPLE.len());
    }

    #[test]
    fn minifier_keeps_image_element_and_data_uri() {
        let minified = XmlMinifier::minify(SAMPLE).expect("minify should succeed");

        assert!(minified.contains(r#"<image href="data:image/jpeg;base64,AAAA""#));
        assert!(minified.contains(r#"viewBox="0 0 100 100""#));
    }

    #[test]
    fn minifier_rejects_malformed_xml() {
        let result = XmlMinifier::minify("<svg><image></svg>");

        assert!(matches!(result, Err(ConvertError::Optimizer(_))));
    }

    #[test]
    fn minifier_rejects_documents_without_svg_root() {
        let result = XmlMinifier::minify("<?xml version=\"1.0\"?><!-- nothing -->");

        assert!(matches!(result, Err(ConvertError::Optimizer(_))));
    }

    #[tokio::test]
    async fn noop_returns_input_unchanged() {
        let output = NoopOptimizer.optimize(SAMPLE).await.expect("noop never fails");

        assert_eq!(output.data, SAMPLE);
        assert!(!NoopOptimizer.is_active());
    }
}
