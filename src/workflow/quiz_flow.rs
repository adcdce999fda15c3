//! 测验流程 - 流程层
//!
//! 核心职责：定义"一次测验"的完整状态推进
//!
//! 状态顺序：
//! 1. Setup → submit → Generating（提取 → 校验 → 出题）
//! 2. 成功 → Quiz（作答与前后导航）→ Review（检查与跳转）→ Results
//! 3. 任何一步失败 → 回到 Setup 并携带错误消息；Results → retry → Setup

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::PipelineResult;
use crate::models::{QuizQuestion, QuizSession, ScoreSummary};
use crate::services::{ContentValidator, LlmQuizGenerator, QuizProducer, TextExtractor};
use crate::utils::logging::truncate_text;
use crate::workflow::submission::Submission;

/// 流程所处阶段
///
/// 同一时刻只有一个阶段处于活动状态。Results 不是陷阱态，
/// retry 会回到 Setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 初始阶段：等待提交，展示上一次的错误（如有）
    Setup,
    /// 流水线运行中：不接受新的提交
    Generating,
    /// 作答阶段：选择答案、前后导航
    Quiz,
    /// 检查阶段：逐题核对、可跳回任意题目
    Review,
    /// 成绩阶段：展示得分，可重新开始
    Results,
}

/// 检查列表中的一行
#[derive(Debug, Clone)]
pub struct ReviewRow {
    /// 题目位置（从 0 开始）
    pub index: usize,
    /// 题干
    pub question: String,
    /// 已选答案（未作答时为空字符串）
    pub chosen: String,
    /// 是否已作答
    pub answered: bool,
}

/// 测验流程控制器
///
/// 职责：
/// - 编排 提取 → 校验 → 出题 流水线，严格顺序执行
/// - 持有阶段、会话与错误消息（一个实例一份状态，不用全局变量）
/// - 会话只在流水线完整成功后原子安装
/// - 所有事件带阶段守卫，越界导航与错误阶段的事件一律 no-op
pub struct QuizFlow {
    phase: Phase,
    session: QuizSession,
    error_message: Option<String>,
    extractor: TextExtractor,
    validator: ContentValidator,
    producer: Box<dyn QuizProducer>,
}

impl QuizFlow {
    /// 使用真实解码器与 LLM 出题服务创建
    pub fn new(config: &Config) -> Self {
        Self::with_components(
            TextExtractor::new(),
            ContentValidator::new(),
            Box::new(LlmQuizGenerator::new(config)),
        )
    }

    /// 使用自定义组件创建（测试用）
    pub fn with_components(
        extractor: TextExtractor,
        validator: ContentValidator,
        producer: Box<dyn QuizProducer>,
    ) -> Self {
        Self {
            phase: Phase::Setup,
            session: QuizSession::default(),
            error_message: None,
            extractor,
            validator,
            producer,
        }
    }

    // ========== 只读视图 ==========

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// 成绩汇总（按严格字符串相等计分）
    pub fn score(&self) -> ScoreSummary {
        self.session.score()
    }

    /// 检查阶段的逐题清单
    pub fn review_rows(&self) -> Vec<ReviewRow> {
        self.session
            .questions()
            .iter()
            .zip(self.session.user_answers().iter())
            .enumerate()
            .map(|(index, (question, answer))| ReviewRow {
                index,
                question: question.question.clone(),
                chosen: answer.clone(),
                answered: !answer.is_empty(),
            })
            .collect()
    }

    // ========== Setup: 提交 ==========

    /// 提交文档并运行一次完整的生成流水线
    ///
    /// 成功后进入 Quiz 并原子安装新会话（答案全空、位置归零）；
    /// 任何一步失败都回到 Setup，错误转为一条可展示的消息。
    /// 流水线不会自动重试，由用户显式重新提交
    pub async fn submit(&mut self, submission: &Submission) {
        if self.phase != Phase::Setup {
            warn!("⚠️ 忽略 submit: 当前阶段 {:?} 不接受新的提交", self.phase);
            return;
        }

        self.error_message = None;
        self.phase = Phase::Generating;
        info!("📤 开始生成: {}", submission);

        match self.run_pipeline(submission).await {
            Ok(questions) => {
                info!("✓ 生成成功: 共 {} 题", questions.len());
                self.session = QuizSession::new(questions, submission.timer_duration_secs);
                self.phase = Phase::Quiz;
            }
            Err(e) => {
                error!("❌ 生成失败: {}", e);
                self.error_message = Some(e.to_string());
                self.phase = Phase::Setup;
            }
        }
    }

    /// 提取 → 校验 → 出题，严格顺序执行，任何一步失败立即终止
    async fn run_pipeline(&self, submission: &Submission) -> PipelineResult<Vec<QuizQuestion>> {
        // ========== 阶段 1: 文本提取 ==========
        let raw_text = self.extractor.extract(&submission.path).await?;

        // ========== 阶段 2: 内容校验 ==========
        let text = self.validator.validate(&raw_text)?;
        info!(
            "✓ 提取并校验通过: {} 字符, 预览: {}",
            text.chars().count(),
            truncate_text(text, 60)
        );

        // ========== 阶段 3: 出题 ==========
        let questions = self
            .producer
            .generate(text, submission.num_questions)
            .await?;

        Ok(questions)
    }

    // ========== Quiz: 作答与导航 ==========

    /// 记录当前题目的答案（最终交卷前可反复覆盖）
    pub fn select_answer(&mut self, answer: &str) {
        if self.phase != Phase::Quiz {
            warn!("⚠️ 忽略 select_answer: 当前阶段 {:?}", self.phase);
            return;
        }
        self.session.select_answer(answer);
    }

    /// 下一题；已在最后一题时保持不动
    pub fn next_question(&mut self) {
        if self.phase != Phase::Quiz {
            warn!("⚠️ 忽略 next: 当前阶段 {:?}", self.phase);
            return;
        }
        self.session.next();
    }

    /// 上一题；已在第一题时保持不动
    pub fn prev_question(&mut self) {
        if self.phase != Phase::Quiz {
            warn!("⚠️ 忽略 prev: 当前阶段 {:?}", self.phase);
            return;
        }
        self.session.prev();
    }

    /// 结束作答，进入检查阶段
    pub fn finish(&mut self) {
        if self.phase != Phase::Quiz {
            warn!("⚠️ 忽略 finish: 当前阶段 {:?}", self.phase);
            return;
        }
        info!(
            "📝 作答结束: 已答 {}/{} 题，进入检查",
            self.session.answered_count(),
            self.session.len()
        );
        self.phase = Phase::Review;
    }

    // ========== Review: 检查与跳转 ==========

    /// 从检查列表跳回指定题目继续作答；越界时保持不动
    pub fn jump_to_question(&mut self, index: usize) {
        if self.phase != Phase::Review {
            warn!("⚠️ 忽略 jump_to_question: 当前阶段 {:?}", self.phase);
            return;
        }
        if self.session.jump_to(index) {
            self.phase = Phase::Quiz;
        } else {
            warn!("⚠️ 忽略越界跳转: {} (共 {} 题)", index, self.session.len());
        }
    }

    /// 最终交卷，进入成绩阶段
    pub fn final_submit(&mut self) {
        if self.phase != Phase::Review {
            warn!("⚠️ 忽略 final_submit: 当前阶段 {:?}", self.phase);
            return;
        }
        self.phase = Phase::Results;
        let summary = self.score();
        info!("📊 交卷: 答对 {}/{} 题", summary.correct, summary.total);
    }

    // ========== Results: 重新开始 ==========

    /// 清空会话与错误消息，回到初始阶段
    pub fn retry(&mut self) {
        if self.phase != Phase::Results {
            warn!("⚠️ 忽略 retry: 当前阶段 {:?}", self.phase);
            return;
        }
        self.session = QuizSession::default();
        self.error_message = None;
        self.phase = Phase::Setup;
        info!("🔁 会话已重置，回到初始阶段");
    }
}
