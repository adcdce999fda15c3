//! 内容校验服务 - 业务能力层
//!
//! 只负责"提取文本是否足以出题"的校验，不关心流程
//!
//! 近乎空白或只有图片的文档（没有文本层的扫描版 PDF）会让下游
//! 出题得到低质量甚至空的结果，这里快速失败并给出可操作的提示

use tracing::debug;

use crate::error::ValidateError;

/// 出题所需的最少字符数（去除首尾空白后）
pub const MIN_CONTENT_CHARS: usize = 100;

/// 内容校验服务
pub struct ContentValidator {
    min_chars: usize,
}

impl ContentValidator {
    pub fn new() -> Self {
        Self {
            min_chars: MIN_CONTENT_CHARS,
        }
    }

    /// 使用自定义阈值创建（测试用）
    pub fn with_min_chars(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// 校验提取文本
    ///
    /// 先去除首尾空白再按字符计数；不足阈值时返回 `TooShort`，
    /// 携带实际字符数与开头至多 `min_chars` 个字符的片段
    ///
    /// # 返回
    /// 校验通过时返回去除首尾空白后的文本
    pub fn validate<'a>(&self, text: &'a str) -> Result<&'a str, ValidateError> {
        let trimmed = text.trim();
        let length = trimmed.chars().count();

        if length < self.min_chars {
            let snippet: String = trimmed.chars().take(self.min_chars).collect();
            return Err(ValidateError::TooShort {
                length,
                min: self.min_chars,
                snippet,
            });
        }

        debug!("内容校验通过: {} 个字符", length);
        Ok(trimmed)
    }
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new()
    }
}
