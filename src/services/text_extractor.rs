//! 文本提取服务 - 业务能力层
//!
//! 只负责"文件 → 纯文本"能力，不关心流程
//!
//! 路由规则：严格按文件扩展名（大小写不敏感）选择解码路径，
//! 不支持的扩展名在任何读取发生前被拒绝

use std::path::Path;

use phf::phf_map;
use tracing::{debug, info};

use crate::error::ExtractError;
use crate::infrastructure::{DocxDecoder, LopdfDecoder, PdfDecoder, PdfDocument, WordDecoder};

/// 受支持的文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Pdf,
    Word,
}

/// 小写扩展名到格式的静态映射
static FORMAT_BY_EXTENSION: phf::Map<&'static str, DocFormat> = phf_map! {
    "pdf" => DocFormat::Pdf,
    "doc" => DocFormat::Word,
    "docx" => DocFormat::Word,
};

impl DocFormat {
    /// 按扩展名确定格式（大小写不敏感）
    pub fn from_extension(extension: &str) -> Option<Self> {
        FORMAT_BY_EXTENSION
            .get(extension.to_lowercase().as_str())
            .copied()
    }
}

/// 文本提取服务
///
/// 职责：
/// - 按扩展名路由到 PDF / Word 解码路径
/// - 单次异步读取文件字节（不重试）
/// - 只处理单个文件，每次调用重新读取
/// - 不出现 QuizSession
/// - 不关心流程顺序
pub struct TextExtractor {
    pdf: Box<dyn PdfDecoder>,
    word: Box<dyn WordDecoder>,
}

impl TextExtractor {
    /// 使用真实解码器创建
    pub fn new() -> Self {
        Self {
            pdf: Box::new(LopdfDecoder),
            word: Box::new(DocxDecoder),
        }
    }

    /// 使用自定义解码器创建（测试用）
    pub fn with_decoders(pdf: Box<dyn PdfDecoder>, word: Box<dyn WordDecoder>) -> Self {
        Self { pdf, word }
    }

    /// 提取文件的纯文本
    ///
    /// # 参数
    /// - `path`: 文件路径（按扩展名路由）
    ///
    /// # 返回
    /// 提取出的纯文本；任何一步失败则整体失败，不返回部分文本
    pub async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        // 先路由，不支持的格式在任何读取发生前拒绝
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = DocFormat::from_extension(extension).ok_or_else(|| {
            ExtractError::UnsupportedFormat {
                extension: extension.to_string(),
            }
        })?;

        debug!("按扩展名 \".{}\" 路由到 {:?} 解码路径", extension, format);

        // 单次读取，失败不进入解析
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ExtractError::ReadFailure {
                path: path.display().to_string(),
                source,
            })?;

        debug!("读取 {} 字节", bytes.len());

        match format {
            DocFormat::Pdf => self.extract_pdf(&bytes).await,
            DocFormat::Word => self.word.extract_raw_text(&bytes).await,
        }
    }

    /// 按页序提取 PDF 文本
    ///
    /// 页与页之间以一个空行分隔；前一页完成后才开始下一页
    async fn extract_pdf(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let document = self.pdf.open(bytes).await?;
        let page_count = document.page_count();
        info!("📄 PDF 共 {} 页，开始逐页提取", page_count);

        let mut pages = Vec::with_capacity(page_count);
        for page_number in 1..=page_count as u32 {
            let text = document.page_text(page_number).await?;
            pages.push(text);
        }

        Ok(pages.join("\n\n"))
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;

    /// 假 PDF 解码器：忽略字节内容，返回预置页面
    struct FakePdfDecoder {
        pages: Vec<String>,
        fail_at: Option<u32>,
    }

    struct FakePdfDocument {
        pages: Vec<String>,
        fail_at: Option<u32>,
    }

    #[async_trait]
    impl PdfDecoder for FakePdfDecoder {
        async fn open(&self, _bytes: &[u8]) -> Result<Box<dyn PdfDocument>, ExtractError> {
            Ok(Box::new(FakePdfDocument {
                pages: self.pages.clone(),
                fail_at: self.fail_at,
            }))
        }
    }

    #[async_trait]
    impl PdfDocument for FakePdfDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        async fn page_text(&self, page_number: u32) -> Result<String, ExtractError> {
            if self.fail_at == Some(page_number) {
                return Err(ExtractError::ParseFailure {
                    reason: format!("第 {} 页损坏", page_number),
                });
            }
            Ok(self.pages[(page_number - 1) as usize].clone())
        }
    }

    struct FakeWordDecoder {
        text: String,
    }

    #[async_trait]
    impl WordDecoder for FakeWordDecoder {
        async fn extract_raw_text(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
            Ok(self.text.clone())
        }
    }

    fn extractor_with_pages(pages: Vec<&str>, fail_at: Option<u32>) -> TextExtractor {
        TextExtractor::with_decoders(
            Box::new(FakePdfDecoder {
                pages: pages.into_iter().map(String::from).collect(),
                fail_at,
            }),
            Box::new(FakeWordDecoder {
                text: "word 内容".to_string(),
            }),
        )
    }

    fn temp_doc(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, b"stub-bytes").unwrap();
        path
    }

    #[test]
    fn test_format_routing_case_insensitive() {
        assert_eq!(DocFormat::from_extension("pdf"), Some(DocFormat::Pdf));
        assert_eq!(DocFormat::from_extension("PDF"), Some(DocFormat::Pdf));
        assert_eq!(DocFormat::from_extension("doc"), Some(DocFormat::Word));
        assert_eq!(DocFormat::from_extension("Docx"), Some(DocFormat::Word));
        assert_eq!(DocFormat::from_extension("txt"), None);
        assert_eq!(DocFormat::from_extension(""), None);
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected_before_read() {
        let extractor = extractor_with_pages(vec!["页面"], None);

        // 文件并不存在：若先读取会得到 ReadFailure，而这里必须是 UnsupportedFormat
        let result = extractor
            .extract(Path::new("/no/such/dir/notes.txt"))
            .await;

        assert!(matches!(
            result,
            Err(ExtractError::UnsupportedFormat { extension }) if extension == "txt"
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_failure() {
        let extractor = extractor_with_pages(vec!["页面"], None);

        let result = extractor.extract(Path::new("/no/such/dir/gone.pdf")).await;

        assert!(matches!(result, Err(ExtractError::ReadFailure { .. })));
    }

    #[tokio::test]
    async fn test_pdf_pages_joined_with_blank_line() {
        let extractor = extractor_with_pages(vec!["第 一 页", "page two", "第 三 页"], None);
        let path = temp_doc("extractor_join.pdf");

        let text = extractor.extract(&path).await.unwrap();

        assert_eq!(text, "第 一 页\n\npage two\n\n第 三 页");
    }

    #[tokio::test]
    async fn test_pdf_page_failure_yields_no_partial_text() {
        let extractor = extractor_with_pages(vec!["一", "二", "三"], Some(2));
        let path = temp_doc("extractor_fail.pdf");

        let result = extractor.extract(&path).await;

        assert!(matches!(result, Err(ExtractError::ParseFailure { .. })));
    }

    #[tokio::test]
    async fn test_uppercase_extension_routes_to_pdf_path() {
        let extractor = extractor_with_pages(vec!["大写 扩展 名"], None);
        let path = temp_doc("extractor_upper.PDF");

        let text = extractor.extract(&path).await.unwrap();

        assert_eq!(text, "大写 扩展 名");
    }

    #[tokio::test]
    async fn test_word_extension_routes_to_word_path() {
        let extractor = extractor_with_pages(vec![], None);
        let path = temp_doc("extractor_word.docx");

        let text = extractor.extract(&path).await.unwrap();

        assert_eq!(text, "word 内容");
    }
}
