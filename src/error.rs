//! 错误类型定义
//!
//! 生成流水线（提取 → 校验 → 出题）各阶段的类型化错误，
//! 在流程层统一汇聚为 `PipelineError` 并转为一条可展示的消息

use thiserror::Error;

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 文件扩展名不在受支持的集合内
    #[error("不支持的文件格式: \".{extension}\"（仅支持 pdf / doc / docx）")]
    UnsupportedFormat { extension: String },

    /// 字节级读取失败（IO、权限、字节层面的损坏）
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 结构上受支持的文件解码失败（损坏、加密、不支持的内部编码）
    #[error("解析文件失败: {reason}")]
    ParseFailure { reason: String },
}

/// 内容校验错误
#[derive(Debug, Error)]
pub enum ValidateError {
    /// 提取出的文本不足以作为出题素材
    ///
    /// 携带去除首尾空白后的字符数与开头片段，便于用户判断
    /// 提取本身是否成功（扫描版 PDF 往往在这里被拦下）
    #[error("提取的文本过短（{length} 个字符，至少需要 {min} 个）。开头内容: \"{snippet}\"")]
    TooShort {
        length: usize,
        min: usize,
        snippet: String,
    },
}

/// 出题服务错误
#[derive(Debug, Error)]
pub enum GenerateError {
    /// API 调用失败
    #[error("出题服务调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 返回内容为空
    #[error("出题服务返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },

    /// 返回内容无法解析为题目列表
    #[error("无法解析出题服务的响应（片段: {snippet}）: {source}")]
    ResponseParseFailed {
        snippet: String,
        #[source]
        source: serde_json::Error,
    },

    /// 解析成功但列表为空
    #[error("出题服务未返回任何题目")]
    NoQuestions,

    /// 某道题目不满足结构约束（如正确答案不在选项内）
    #[error("第 {index} 题不合法: {reason}")]
    InvalidQuestion { index: usize, reason: String },
}

/// 流水线错误
///
/// 单次生成尝试中任何一步的失败；在流程层被捕获、记录日志、
/// 转为消息后机器回到初始阶段，进程不会崩溃
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// 流水线结果类型别名
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
