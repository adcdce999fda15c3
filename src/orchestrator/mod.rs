//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责应用生命周期与交互驱动，是整个系统的"指挥中心"。
//!
//! ### `app` - 应用主结构
//! - 管理应用生命周期（初始化、运行）
//! - 初始化会话日志文件
//! - 把终端输入翻译为流程事件（submit / 作答 / 导航 / 交卷 / 重来）
//! - 逐题呈现题干与选项、检查清单与成绩
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (驱动一次次事件)
//!     ↓
//! workflow::QuizFlow (状态机：Setup → Generating → Quiz → Review → Results)
//!     ↓
//! services (能力层：extract / validate / generate)
//!     ↓
//! infrastructure (基础设施：PdfDecoder / WordDecoder)
//! ```

pub mod app;

pub use app::App;
