//! Word 解码器 - 基础设施层
//!
//! 持有第三方 Word 解析能力，只暴露"整篇取纯文本"的能力

use async_trait::async_trait;
use docx_rs::{read_docx, DocumentChild};
use tracing::debug;

use crate::error::ExtractError;

/// Word 解码能力
///
/// 与 PDF 不同，Word 文档一次调用整篇提取
#[async_trait]
pub trait WordDecoder: Send + Sync {
    /// 从字节缓冲区提取整篇纯文本
    async fn extract_raw_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// 基于 docx-rs 的解码器实现
pub struct DocxDecoder;

#[async_trait]
impl WordDecoder for DocxDecoder {
    async fn extract_raw_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let docx = read_docx(bytes).map_err(|e| ExtractError::ParseFailure {
            reason: format!("Word 文档已损坏或受密码保护: {}", e),
        })?;

        let mut paragraphs = Vec::new();
        for child in docx.document.children.iter() {
            if let DocumentChild::Paragraph(paragraph) = child {
                paragraphs.push(paragraph.raw_text());
            }
        }

        debug!("Word 提取完成, 共 {} 个段落", paragraphs.len());

        Ok(paragraphs.join("\n"))
    }
}
