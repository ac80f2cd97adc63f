use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};

use common::error::AppError;

const FEEDBACK_SYSTEM_PROMPT: &str =
    "You are a helpful interview bot that evaluates user responses and gives them a score out of 5.";

pub fn create_user_message(candidate: &str, expected: &str) -> String {
    format!(
        "User's answer: {candidate}\nExpected answer: {expected}\nEvaluate correctness and give a response."
    )
}

pub fn create_feedback_request(
    model: &str,
    candidate: &str,
    expected: &str,
) -> Result<CreateChatCompletionRequest, OpenAIError> {
    CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages([
            ChatCompletionRequestSystemMessage::from(FEEDBACK_SYSTEM_PROMPT.to_string()).into(),
            ChatCompletionRequestUserMessage::from(create_user_message(candidate, expected)).into(),
        ])
        .build()
}

/// Ask the text-generation model for a qualitative assessment of the
/// candidate answer. Upstream failures and contentless responses surface as
/// `FeedbackService`.
pub async fn generate_feedback(
    client: &Client<OpenAIConfig>,
    model: &str,
    candidate: &str,
    expected: &str,
) -> Result<String, AppError> {
    let request = create_feedback_request(model, candidate, expected)
        .map_err(|e| AppError::FeedbackService(e.to_string()))?;

    let response = client
        .chat()
        .create(request)
        .await
        .map_err(|e| AppError::FeedbackService(e.to_string()))?;

    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .ok_or_else(|| AppError::FeedbackService("no content found in model response".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_carries_both_answers() {
        let message = create_user_message("a heap", "a balanced tree");
        assert!(message.contains("User's answer: a heap"));
        assert!(message.contains("Expected answer: a balanced tree"));
    }

    #[test]
    fn test_feedback_request_shape() {
        let request = create_feedback_request("gpt-4o-mini", "candidate", "expected")
            .expect("request should build");
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages.len(), 2);
    }
}
