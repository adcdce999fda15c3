//! 测验数据模型

use serde::{Deserialize, Serialize};

/// 单道选择题
///
/// 出题成功后不可变。不变式：`correct_answer` 必须等于 `options`
/// 中的某一项（在出题服务边界处强制校验）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// 题干
    pub question: String,
    /// 固定顺序的选项
    pub options: Vec<String>,
    /// 正确答案（等于 options 中的某一项）
    #[serde(alias = "correctAnswer")]
    pub correct_answer: String,
}

/// 成绩汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    /// 答对的题数
    pub correct: usize,
    /// 已作答的题数
    pub answered: usize,
    /// 题目总数
    pub total: usize,
}

/// 一次测验的内存会话
///
/// 不变式：
/// - `user_answers` 与 `questions` 等长，未作答的位置为空字符串
/// - 会话非空时 `0 <= current_index < questions.len()`
///
/// 字段私有，所有修改都经过带守卫的方法，越界移动一律为 no-op
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    user_answers: Vec<String>,
    current_index: usize,
    timer_duration_secs: u64,
}

impl QuizSession {
    /// 用一组题目创建新会话（答案全空，位置归零）
    pub fn new(questions: Vec<QuizQuestion>, timer_duration_secs: u64) -> Self {
        let count = questions.len();
        Self {
            questions,
            user_answers: vec![String::new(); count],
            current_index: 0,
            timer_duration_secs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn user_answers(&self) -> &[String] {
        &self.user_answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// 每题作答时长（秒）
    pub fn timer_duration_secs(&self) -> u64 {
        self.timer_duration_secs
    }

    /// 整场测验的总时长预算（秒）
    pub fn total_time_secs(&self) -> u64 {
        self.timer_duration_secs * self.questions.len() as u64
    }

    /// 当前题目（空会话时为 None）
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    /// 覆盖当前题目的答案
    ///
    /// 最终交卷前可以反复改答，只影响当前位置
    pub fn select_answer(&mut self, answer: &str) {
        if let Some(slot) = self.user_answers.get_mut(self.current_index) {
            *slot = answer.to_string();
        }
    }

    /// 前进一题；已在最后一题时保持不动，返回是否移动
    pub fn next(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// 后退一题；已在第一题时保持不动，返回是否移动
    pub fn prev(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    /// 跳转到指定题目；越界时保持不动，返回是否移动
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.questions.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    /// 已作答的题数
    pub fn answered_count(&self) -> usize {
        self.user_answers.iter().filter(|a| !a.is_empty()).count()
    }

    /// 按严格字符串相等计分
    pub fn score(&self) -> ScoreSummary {
        let correct = self
            .questions
            .iter()
            .zip(self.user_answers.iter())
            .filter(|(question, answer)| *answer == &question.correct_answer)
            .count();

        ScoreSummary {
            correct,
            answered: self.answered_count(),
            total: self.questions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions(count: usize) -> Vec<QuizQuestion> {
        (0..count)
            .map(|i| QuizQuestion {
                question: format!("问题 {}", i + 1),
                options: vec![
                    "甲".to_string(),
                    "乙".to_string(),
                    "丙".to_string(),
                    "丁".to_string(),
                ],
                correct_answer: "甲".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_new_session_starts_empty_answers_at_zero() {
        let session = QuizSession::new(sample_questions(5), 30);

        assert_eq!(session.len(), 5);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.timer_duration_secs(), 30);
        assert_eq!(session.total_time_secs(), 150);
        assert!(session.user_answers().iter().all(|a| a.is_empty()));
    }

    #[test]
    fn test_next_stops_at_last_question() {
        let mut session = QuizSession::new(sample_questions(3), 30);

        assert!(session.next());
        assert!(session.next());
        assert_eq!(session.current_index(), 2);

        // 最后一题上 next 不动
        assert!(!session.next());
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_prev_stops_at_first_question() {
        let mut session = QuizSession::new(sample_questions(3), 30);

        assert!(!session.prev());
        assert_eq!(session.current_index(), 0);

        session.next();
        assert!(session.prev());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_select_answer_overwrites_only_current_index() {
        let mut session = QuizSession::new(sample_questions(3), 30);

        session.select_answer("乙");
        session.select_answer("丙");
        assert_eq!(session.user_answers()[0], "丙");
        assert_eq!(session.user_answers()[1], "");
        assert_eq!(session.user_answers()[2], "");
    }

    #[test]
    fn test_jump_to_out_of_range_is_noop() {
        let mut session = QuizSession::new(sample_questions(3), 30);

        assert!(session.jump_to(2));
        assert_eq!(session.current_index(), 2);

        assert!(!session.jump_to(3));
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_score_counts_exact_matches() {
        let mut session = QuizSession::new(sample_questions(4), 30);

        session.select_answer("甲"); // 对
        session.next();
        session.select_answer("乙"); // 错
        session.next();
        session.select_answer("甲"); // 对

        let summary = session.score();
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.answered, 3);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn test_empty_session_guards() {
        let mut session = QuizSession::default();

        assert!(session.is_empty());
        assert!(session.current_question().is_none());
        assert!(!session.next());
        assert!(!session.prev());
        session.select_answer("甲"); // 不崩溃，无效果
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn test_question_accepts_camel_case_answer_key() {
        let json = r#"{"question":"1+1=?","options":["1","2"],"correctAnswer":"2"}"#;
        let question: QuizQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.correct_answer, "2");
    }
}
