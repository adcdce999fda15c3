//! 日志工具模块
//!
//! 提供全局日志初始化和输出格式化的辅助函数

use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// # 参数
/// - `verbose`: 为 true 时默认级别为 debug，否则为 info
///
/// `RUST_LOG` 环境变量优先于该默认级别
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_short_input_unchanged() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
    }

    #[test]
    fn test_truncate_text_long_input_gets_ellipsis() {
        assert_eq!(truncate_text("一二三四五", 3), "一二三...");
    }
}
