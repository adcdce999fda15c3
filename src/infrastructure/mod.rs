//! 基础设施层（Infrastructure Layer）
//!
//! 持有第三方解码能力，只暴露能力：
//! - `PdfDecoder` / `PdfDocument` - 打开字节缓冲区、按页取文本
//! - `WordDecoder` - 整篇取纯文本
//!
//! 本层不认识 QuizSession / Submission，不处理业务流程。
//! 能力以 trait 暴露，核心流程可以用假实现测试而不触碰真实解析库。

pub mod pdf_decoder;
pub mod word_decoder;

pub use pdf_decoder::{LopdfDecoder, PdfDecoder, PdfDocument};
pub use word_decoder::{DocxDecoder, WordDecoder};
