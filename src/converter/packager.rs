//! # SVG 打包模块
//!
//! ## 设计思路
//!
//! 缩略图的居中已经在光栅化阶段烘焙进正方形画布，
//! 因此 SVG 里的 `<image>` 始终铺满整个视口，并用 `preserveAspectRatio` 保持比例，
//! 不会再次叠加偏移。
//!
//! ## 实现思路
//!
//! 1. 按固定模板生成 SVG 文本
//! 2. 若优化器处于启用状态则调用之，失败或输出为空时回退到原始模板
//! 3. 以 UTF-8 字节数评估体积预算（超出只告警，不报错）

use super::optimizer::SvgOptimizer;
use super::source::{SvgDocument, Thumbnail};
use super::ConvertError;

/// 判断字节数是否在预算内（等于预算视为未超出）。
pub fn within_budget(byte_size: u64, size_budget_bytes: u64) -> bool {
    byte_size <= size_budget_bytes
}

/// 生成未经优化的 SVG 模板。
pub fn build_svg(thumbnail: &Thumbnail, viewport_size: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">
    <image href="{href}" x="0" y="0" width="{size}" height="{size}" preserveAspectRatio="xMidYMid meet"/>
</svg>
"#,
        size = viewport_size,
        href = thumbnail.encoded_data_uri,
    )
}

/// 将缩略图打包为 SVG 文档。
///
/// 优化器错误属于可恢复错误：记录告警后使用原始模板继续。
pub async fn pack<O: SvgOptimizer>(
    thumbnail: &Thumbnail,
    viewport_size: u32,
    size_budget_bytes: u64,
    optimizer: &O,
) -> Result<SvgDocument, ConvertError> {
    if viewport_size == 0 {
        return Err(ConvertError::Render("SVG 视口边长为 0".to_string()));
    }

    let template = build_svg(thumbnail, viewport_size);

    let (text, optimized) = if optimizer.is_active() {
        match optimizer.optimize(&template).await {
            Ok(output) if !output.data.trim().is_empty() => {
                log::debug!(
                    "🪄 SVG 优化完成（{}）：{} -> {} 字节",
                    optimizer.name(),
                    template.len(),
                    output.data.len()
                );
                (output.data, true)
            }
            Ok(_) => {
                log::warn!("⚠️ 优化器 {} 返回空文档，回退原始 SVG", optimizer.name());
                (template, false)
            }
            Err(err) => {
                log::warn!("⚠️ 优化器 {} 执行失败，回退原始 SVG：{}", optimizer.name(), err);
                (template, false)
            }
        }
    } else {
        (template, false)
    };

    let byte_size = text.len() as u64;

    Ok(SvgDocument {
        viewport_size,
        within_budget: within_budget(byte_size, size_budget_bytes),
        byte_size,
        svg: text,
        optimized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::optimizer::{NoopOptimizer, OptimizedSvg, XmlMinifier};

    struct FailingOptimizer;

    impl SvgOptimizer for FailingOptimizer {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn optimize(&self, _svg: &str) -> Result<OptimizedSvg, ConvertError> {
            Err(ConvertError::Optimizer("worker crashed".to_string()))
        }
    }

    struct EmptyOptimizer;

    impl SvgOptimizer for EmptyOptimizer {
        fn name(&self) -> &'static str {
            "empty"
        }

        async fn optimize(&self, _svg: &str) -> Result<OptimizedSvg, ConvertError> {
            Ok(OptimizedSvg { data: "  ".to_string() })
        }
    }

    fn thumbnail() -> Thumbnail {
        Thumbnail {
            encoded_data_uri: "data:image/jpeg;base64,/9j/AAAA".to_string(),
            rendered_width: 100,
            rendered_height: 50,
            offset_x: 0,
            offset_y: 25,
            target_edge: 100,
            encoded_len: 6,
        }
    }

    #[test]
    fn template_covers_full_viewport() {
        let svg = build_svg(&thumbnail(), 100);

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 100 100""#));
        assert!(svg.contains(r#"href="data:image/jpeg;base64,/9j/AAAA""#));
        assert!(svg.contains(r#"x="0" y="0" width="100" height="100""#));
        assert!(svg.contains(r#"preserveAspectRatio="xMidYMid meet""#));
    }

    #[tokio::test]
    async fn packing_twice_is_byte_identical() {
        let first = pack(&thumbnail(), 100, 30_720, &NoopOptimizer).await.expect("pack");
        let second = pack(&thumbnail(), 100, 30_720, &NoopOptimizer).await.expect("pack");

        assert_eq!(first.as_bytes(), second.as_bytes());
        assert!(!first.optimized);
        assert_eq!(first.byte_size, first.as_bytes().len() as u64);
    }

    #[tokio::test]
    async fn budget_boundary_is_inclusive() {
        let raw_len = build_svg(&thumbnail(), 100).len() as u64;

        let exact = pack(&thumbnail(), 100, raw_len, &NoopOptimizer).await.expect("pack");
        let over = pack(&thumbnail(), 100, raw_len - 1, &NoopOptimizer).await.expect("pack");

        assert!(exact.within_budget);
        assert!(!over.within_budget);
        assert!(within_budget(30_720, 30_720));
        assert!(!within_budget(30_721, 30_720));
    }

    #[tokio::test]
    async fn failing_optimizer_falls_back_to_template() {
        let document = pack(&thumbnail(), 100, 30_720, &FailingOptimizer).await.expect("pack");

        assert!(!document.optimized);
        assert_eq!(document.as_str(), build_svg(&thumbnail(), 100));
    }

    #[tokio::test]
    async fn empty_optimizer_output_falls_back_to_template() {
        let document = pack(&thumbnail(), 100, 30_720, &EmptyOptimizer).await.expect("pack");

        assert!(!document.optimized);
        assert_eq!(document.as_str(), build_svg(&thumbnail(), 100));
    }

    #[tokio::test]
    async fn minifier_output_is_used_and_smaller() {
        let raw = build_svg(&thumbnail(), 100);
        let document = pack(&thumbnail(), 100, 30_720, &XmlMinifier).await.expect("pack");

        assert!(document.optimized);
        assert!(document.byte_size < raw.len() as u64);
        assert!(document.as_str().contains("data:image/jpeg;base64,/9j/AAAA"));
    }

    #[tokio::test]
    async fn zero_viewport_is_render_error() {
        let result = pack(&thumbnail(), 0, 30_720, &NoopOptimizer).await;

        assert!(matches!(result, Err(ConvertError::Render(_))));
    }
}
