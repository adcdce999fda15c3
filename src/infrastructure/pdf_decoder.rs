//! PDF 解码器 - 基础设施层
//!
//! 持有第三方 PDF 解析能力，只暴露"打开 + 按页取文本"的能力

use async_trait::async_trait;
use lopdf::Document;
use tracing::debug;

use crate::error::ExtractError;

/// 已打开的 PDF 文档
///
/// 页码从 1 开始，与 PDF 阅读器显示一致
#[async_trait]
pub trait PdfDocument: Send + Sync {
    /// 总页数
    fn page_count(&self) -> usize;

    /// 提取指定页的文本，词元之间以单个空格连接
    async fn page_text(&self, page_number: u32) -> Result<String, ExtractError>;
}

/// PDF 解码能力
#[async_trait]
pub trait PdfDecoder: Send + Sync {
    /// 把字节缓冲区打开为 PDF 文档
    async fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, ExtractError>;
}

/// 基于 lopdf 的解码器实现
pub struct LopdfDecoder;

struct LopdfDocument {
    document: Document,
    page_numbers: Vec<u32>,
}

#[async_trait]
impl PdfDecoder for LopdfDecoder {
    async fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, ExtractError> {
        let document = Document::load_mem(bytes).map_err(|e| ExtractError::ParseFailure {
            reason: format!("PDF 已损坏或包含不支持的内容: {}", e),
        })?;

        if document.is_encrypted() {
            return Err(ExtractError::ParseFailure {
                reason: "PDF 受密码保护，无法提取文本".to_string(),
            });
        }

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        debug!("PDF 打开成功, 共 {} 页", page_numbers.len());

        Ok(Box::new(LopdfDocument {
            document,
            page_numbers,
        }))
    }
}

#[async_trait]
impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    async fn page_text(&self, page_number: u32) -> Result<String, ExtractError> {
        let raw = self
            .document
            .extract_text(&[page_number])
            .map_err(|e| ExtractError::ParseFailure {
                reason: format!(
                    "第 {} 页解码失败（损坏、加密或不支持的内部编码）: {}",
                    page_number, e
                ),
            })?;

        // 词元间统一为单个空格
        Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}
