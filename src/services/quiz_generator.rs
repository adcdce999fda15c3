//! 出题服务 - 业务能力层
//!
//! 只负责"文本 → 选择题列表"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerateError;
use crate::models::QuizQuestion;
use crate::utils::logging::truncate_text;

/// 出题能力
///
/// 核心流程只依赖该契约：完整文本 + 期望题数 → 完整题目列表 | 失败。
/// 不接受流式或部分结果
#[async_trait]
pub trait QuizProducer: Send + Sync {
    async fn generate(
        &self,
        text: &str,
        num_questions: usize,
    ) -> Result<Vec<QuizQuestion>, GenerateError>;
}

/// 基于 LLM 的出题服务
///
/// 职责：
/// - 调用 LLM API 根据文档文本出选择题
/// - 清洗并解析返回的 JSON
/// - 校验每道题的结构（正确答案必须在选项之内）
/// - 不出现 QuizSession
/// - 不关心流程顺序
pub struct LlmQuizGenerator {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmQuizGenerator {
    /// 创建新的出题服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    fn api_error(&self, source: impl std::error::Error + Send + Sync + 'static) -> GenerateError {
        GenerateError::ApiCallFailed {
            model: self.model_name.clone(),
            source: Box::new(source),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: &str,
    ) -> Result<String, GenerateError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()
            .map_err(|e| self.api_error(e))?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| self.api_error(e))?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(4096u32)
            .build()
            .map_err(|e| self.api_error(e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            self.api_error(e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GenerateError::EmptyResponse {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    /// 构建用于出题的消息
    ///
    /// 返回 (user_message, system_message)
    fn build_quiz_messages(&self, text: &str, num_questions: usize) -> (String, String) {
        let system_message = "你是一个专业的出题助手，擅长根据给定的文档内容出高质量的单项选择题。\
                             你只输出 JSON，不输出任何解释性文字。"
            .to_string();

        let user_message = format!(
            r#"根据下面的文档内容出 {num_questions} 道单项选择题。

【出题要求】
1. 题目必须基于文档内容，不引入文档之外的知识
2. 每道题恰好 4 个选项，只有一个正确答案
3. correctAnswer 必须与 options 中的某一项完全一致（逐字符相同）
4. 只返回 JSON 数组，不要包裹 Markdown 代码块，不要任何其他内容

【返回格式】
[
  {{"question": "题干", "options": ["选项A", "选项B", "选项C", "选项D"], "correctAnswer": "选项A"}}
]

【文档内容】
{text}"#
        );

        (user_message, system_message)
    }

    /// 解析出题响应
    ///
    /// 清洗代码围栏后按 JSON 数组解析，并逐题校验结构
    fn parse_quiz_response(&self, response: &str) -> Result<Vec<QuizQuestion>, GenerateError> {
        let cleaned = strip_code_fences(response);

        let questions: Vec<QuizQuestion> =
            serde_json::from_str(&cleaned).map_err(|source| GenerateError::ResponseParseFailed {
                snippet: truncate_text(response, 120),
                source,
            })?;

        if questions.is_empty() {
            return Err(GenerateError::NoQuestions);
        }

        for (index, question) in questions.iter().enumerate() {
            validate_question(index + 1, question)?;
        }

        Ok(questions)
    }
}

#[async_trait]
impl QuizProducer for LlmQuizGenerator {
    async fn generate(
        &self,
        text: &str,
        num_questions: usize,
    ) -> Result<Vec<QuizQuestion>, GenerateError> {
        debug!(
            "开始出题: 文本 {} 字符, 期望 {} 题, 模型: {}",
            text.chars().count(),
            num_questions,
            self.model_name
        );

        let (user_message, system_message) = self.build_quiz_messages(text, num_questions);

        let response = self.send_to_llm(&user_message, &system_message).await?;

        let questions = self.parse_quiz_response(&response)?;

        if questions.len() != num_questions {
            warn!(
                "出题数量与期望不符: 期望 {} 实际 {}，按实际返回继续",
                num_questions,
                questions.len()
            );
        }

        Ok(questions)
    }
}

/// 校验单道题的结构约束
fn validate_question(index: usize, question: &QuizQuestion) -> Result<(), GenerateError> {
    if question.question.trim().is_empty() {
        return Err(GenerateError::InvalidQuestion {
            index,
            reason: "题干为空".to_string(),
        });
    }

    if question.options.len() < 2 {
        return Err(GenerateError::InvalidQuestion {
            index,
            reason: format!("选项不足（{} 个）", question.options.len()),
        });
    }

    if !question.options.contains(&question.correct_answer) {
        return Err(GenerateError::InvalidQuestion {
            index,
            reason: format!("正确答案 \"{}\" 不在选项之内", question.correct_answer),
        });
    }

    Ok(())
}

/// 去除响应外层的 Markdown 代码围栏
fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    match Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$") {
        Ok(re) => re
            .captures(trimmed)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| trimmed.to_string()),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 创建测试用的出题服务
    fn create_test_service() -> LlmQuizGenerator {
        let config = OpenAIConfig::new()
            .with_api_key("test-key")
            .with_api_base("http://localhost:1/v1");

        let client = Client::with_config(config);

        LlmQuizGenerator {
            client,
            model_name: "gpt-4o-mini".to_string(),
        }
    }

    const VALID_JSON: &str = r#"[
        {"question": "中国的首都是哪里？", "options": ["北京", "上海", "广州", "深圳"], "correctAnswer": "北京"},
        {"question": "1+1=?", "options": ["1", "2", "3", "4"], "correctAnswer": "2"}
    ]"#;

    #[test]
    fn test_parse_plain_json_array() {
        let service = create_test_service();

        let questions = service.parse_quiz_response(VALID_JSON).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer, "北京");
        assert_eq!(questions[1].options.len(), 4);
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let service = create_test_service();
        let fenced = format!("```json\n{}\n```", VALID_JSON);

        let questions = service.parse_quiz_response(&fenced).unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn test_parse_strips_bare_code_fences() {
        let service = create_test_service();
        let fenced = format!("```\n{}\n```", VALID_JSON);

        let questions = service.parse_quiz_response(&fenced).unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let service = create_test_service();

        let err = service.parse_quiz_response("好的，下面是题目：……").unwrap_err();
        assert!(matches!(err, GenerateError::ResponseParseFailed { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_array() {
        let service = create_test_service();

        let err = service.parse_quiz_response("[]").unwrap_err();
        assert!(matches!(err, GenerateError::NoQuestions));
    }

    #[test]
    fn test_parse_rejects_answer_outside_options() {
        let service = create_test_service();
        let json = r#"[{"question": "1+1=?", "options": ["1", "3"], "correctAnswer": "2"}]"#;

        let err = service.parse_quiz_response(json).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidQuestion { index: 1, .. }
        ));
    }

    #[test]
    fn test_parse_rejects_empty_question_stem() {
        let service = create_test_service();
        let json = r#"[{"question": "  ", "options": ["1", "2"], "correctAnswer": "2"}]"#;

        let err = service.parse_quiz_response(json).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidQuestion { .. }));
    }

    /// 测试真实 LLM 出题
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_generate_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_generate_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = crate::config::Config::from_env();
        let service = LlmQuizGenerator::new(&config);

        let text = "太阳系有八大行星。离太阳最近的是水星，其次是金星、地球和火星。\
                    木星是太阳系中最大的行星，土星以其显著的光环著称。\
                    天王星和海王星距离太阳最远，被称为冰巨星。";

        let result = service.generate(text, 3).await;

        match result {
            Ok(questions) => {
                println!("\n========== 出题结果 ==========");
                for q in &questions {
                    println!("{} -> {}", q.question, q.correct_answer);
                }
                println!("==============================\n");
                println!("✅ LLM 出题成功！");
                assert!(!questions.is_empty());
            }
            Err(e) => {
                println!("❌ LLM 出题失败: {}", e);
                panic!("测试失败: {}", e);
            }
        }
    }
}
