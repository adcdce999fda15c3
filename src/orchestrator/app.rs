//! 应用主结构 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：初始化会话日志文件、创建 QuizFlow
//! 2. **事件驱动**：读取终端输入，翻译为流程事件
//! 3. **文本呈现**：打印题目、检查清单与成绩（只为驱动核心流程，
//!    不承载任何样式）

use std::fs;
use std::io::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::config::Config;
use crate::models::ScoreSummary;
use crate::workflow::{Phase, QuizFlow, Submission};

/// 应用主结构
pub struct App {
    config: Config,
    flow: QuizFlow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        let flow = QuizFlow::new(&config);

        Ok(Self { config, flow })
    }

    /// 运行交互主循环
    ///
    /// 每行输入翻译为一个流程事件；`q` 退出
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        self.print_setup_help();

        while let Some(line) = lines.next_line().await? {
            let input = line.trim().to_string();
            if input.is_empty() {
                continue;
            }
            if input == "q" {
                info!("👋 退出");
                break;
            }

            match self.flow.phase() {
                Phase::Setup => self.handle_setup(&input).await?,
                Phase::Quiz => self.handle_quiz(&input),
                Phase::Review => self.handle_review(&input),
                Phase::Results => self.handle_results(&input),
                // submit 在一次调用内跑完流水线，循环里不会停在该阶段
                Phase::Generating => {}
            }
        }

        Ok(())
    }

    // ========== Setup ==========

    async fn handle_setup(&mut self, input: &str) -> Result<()> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.len() != 3 {
            self.print_setup_help();
            return Ok(());
        }

        let (num_questions, timer_secs) = match (parts[1].parse(), parts[2].parse()) {
            (Ok(n), Ok(t)) if n > 0 && t > 0 => (n, t),
            _ => {
                println!("题数与每题秒数必须是正整数");
                return Ok(());
            }
        };

        let submission = Submission::new(parts[0], num_questions, timer_secs);
        self.flow.submit(&submission).await;

        match self.flow.phase() {
            Phase::Quiz => self.print_question(),
            _ => {
                if let Some(message) = self.flow.error_message() {
                    println!("\n生成失败: {}\n", message);
                }
                self.print_setup_help();
            }
        }
        Ok(())
    }

    // ========== Quiz ==========

    fn handle_quiz(&mut self, input: &str) {
        match input {
            "n" => self.flow.next_question(),
            "p" => self.flow.prev_question(),
            "f" => {
                self.flow.finish();
                self.print_review();
                return;
            }
            _ => {
                // 数字选择选项（从 1 开始）
                let chosen = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| {
                        self.flow
                            .session()
                            .current_question()
                            .and_then(|question| question.options.get(i).cloned())
                    });
                match chosen {
                    Some(option) => self.flow.select_answer(&option),
                    None => {
                        println!("输入选项编号，或 n(下一题) / p(上一题) / f(结束作答) / q(退出)");
                        return;
                    }
                }
            }
        }
        self.print_question();
    }

    // ========== Review ==========

    fn handle_review(&mut self, input: &str) {
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["j", index] => {
                // 展示用编号从 1 开始
                match index.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                    Some(index) => {
                        self.flow.jump_to_question(index);
                        if self.flow.phase() == Phase::Quiz {
                            self.print_question();
                        } else {
                            println!("题号超出范围");
                        }
                    }
                    None => println!("用法: j <题号>"),
                }
            }
            ["s"] => {
                self.flow.final_submit();
                let summary = self.flow.score();
                self.print_results(summary);
                if let Err(e) = append_result_line(&self.config.output_log_file, summary) {
                    info!("写入会话日志失败: {}", e);
                }
            }
            _ => {
                println!("输入 j <题号> 跳回某题，s 交卷，q 退出");
                self.print_review();
            }
        }
    }

    // ========== Results ==========

    fn handle_results(&mut self, input: &str) {
        match input {
            "r" => {
                self.flow.retry();
                self.print_setup_help();
            }
            _ => println!("输入 r 重新开始，q 退出"),
        }
    }

    // ========== 呈现辅助方法 ==========

    fn print_setup_help(&self) {
        println!("\n输入: <文件路径> <题数> <每题秒数>   （例如: notes.pdf 5 30），q 退出");
    }

    fn print_question(&self) {
        let session = self.flow.session();
        let Some(question) = session.current_question() else {
            return;
        };

        let index = session.current_index();
        println!(
            "\n题 {}/{}（每题 {} 秒，全卷共 {} 秒）",
            index + 1,
            session.len(),
            session.timer_duration_secs(),
            session.total_time_secs()
        );
        println!("{}", question.question);
        for (i, option) in question.options.iter().enumerate() {
            let chosen = &session.user_answers()[index];
            let marker = if chosen == option { "＊" } else { "  " };
            println!("{} {}. {}", marker, i + 1, option);
        }
        println!("（选项编号作答，n 下一题，p 上一题，f 结束作答）");
    }

    fn print_review(&self) {
        println!("\n========== 检查清单 ==========");
        for row in self.flow.review_rows() {
            let status = if row.answered {
                row.chosen.clone()
            } else {
                "（未作答）".to_string()
            };
            println!("{}. {} -> {}", row.index + 1, row.question, status);
        }
        println!("==============================");
        println!("输入 j <题号> 跳回某题，s 交卷");
    }

    fn print_results(&self, summary: ScoreSummary) {
        println!("\n========== 成绩 ==========");
        println!("答对: {}/{}", summary.correct, summary.total);
        println!("已答: {}/{}", summary.answered, summary.total);
        println!("==========================");
        println!("输入 r 重新开始，q 退出");
    }
}

// ========== 会话日志辅助函数 ==========

fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n文档出题会话日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

fn append_result_line(log_file_path: &str, summary: ScoreSummary) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    writeln!(
        file,
        "{} | 答对 {}/{} | 已答 {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        summary.correct,
        summary.total,
        summary.answered
    )?;

    Ok(())
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 文档出题模式");
    info!("📊 模型: {}", config.llm_model_name);
    info!("{}", "=".repeat(60));
}
