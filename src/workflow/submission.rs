//! 提交上下文
//!
//! 封装"用户这次提交了哪个文件、要出几道题、每题多少秒"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 单次提交的全部输入
///
/// 在提交时一次性给齐，流水线运行期间不再变化
#[derive(Debug, Clone)]
pub struct Submission {
    /// 文档路径（按扩展名路由解码）
    pub path: PathBuf,

    /// 期望题目数量（正整数）
    pub num_questions: usize,

    /// 每题作答时长（秒，正整数）
    pub timer_duration_secs: u64,
}

impl Submission {
    /// 创建新的提交上下文
    pub fn new(path: impl Into<PathBuf>, num_questions: usize, timer_duration_secs: u64) -> Self {
        Self {
            path: path.into(),
            num_questions,
            timer_duration_secs,
        }
    }

    /// 文件名（仅用于日志显示）
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl Display for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文件 {} 题数 {} 每题 {} 秒]",
            self.file_name(),
            self.num_questions,
            self.timer_duration_secs
        )
    }
}
