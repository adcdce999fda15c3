//! # Doc To Quiz
//!
//! 把上传的文档（PDF / Word）变成可交互选择题测验的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有第三方解码能力，只暴露能力
//! - `PdfDecoder` / `PdfDocument` - 打开缓冲区、按页取文本
//! - `WordDecoder` - 整篇取纯文本
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次调用
//! - `TextExtractor` - 文件 → 纯文本（按扩展名路由）
//! - `ContentValidator` - 文本是否足以出题
//! - `QuizProducer` / `LlmQuizGenerator` - 文本 → 题目列表
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次测验"的完整状态推进
//! - `Submission` - 上下文封装（文件 + 题数 + 每题时长）
//! - `QuizFlow` - 状态机（Setup → Generating → Quiz → Review → Results）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用生命周期与终端交互驱动
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ExtractError, GenerateError, PipelineError, PipelineResult, ValidateError};
pub use models::{QuizQuestion, QuizSession, ScoreSummary};
pub use orchestrator::App;
pub use services::{ContentValidator, LlmQuizGenerator, QuizProducer, TextExtractor};
pub use workflow::{Phase, QuizFlow, Submission};
