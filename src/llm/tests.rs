use super::*;

#[test]
fn test_base_url_trailing_slash_stripped() {
    let backend = OpenAiCompatBackend::new_with_model("http://127.0.0.1:8080/v1/", "m");
    assert_eq!(backend.base_url, "http://127.0.0.1:8080/v1");
}

#[test]
fn test_history_window_keeps_only_recent_turns() {
    let backend = OpenAiCompatBackend::new_with_model("http://localhost/v1", "m");

    let history: Vec<ChatMessage> = (0..10)
        .flat_map(|i| {
            [
                ChatMessage::user(format!("câu hỏi {i}")),
                ChatMessage::assistant(format!("trả lời {i}")),
            ]
        })
        .collect();

    let messages = backend.build_messages("câu hỏi hiện tại", &history);

    // system + HISTORY_WINDOW turns + current question
    assert_eq!(messages.len(), 1 + HISTORY_WINDOW + 1);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages.last().unwrap().content, "câu hỏi hiện tại");
    // The window holds the newest turns.
    assert_eq!(messages[1].content, "câu hỏi 7");
}

#[test]
fn test_short_history_passed_whole() {
    let backend = OpenAiCompatBackend::new_with_model("http://localhost/v1", "m");
    let history = vec![ChatMessage::user("chào")];

    let messages = backend.build_messages("hỏi", &history);

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].content, "chào");
}

#[tokio::test]
async fn test_mock_backend_echoes_question() {
    let backend = MockChatBackend::new();

    let answer = backend.generate("ctx", "A là gì?", &[]).await.unwrap();

    assert!(answer.contains("A là gì?"));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_mock_backend_canned_answer() {
    let backend = MockChatBackend::with_answer("câu trả lời cố định");

    let answer = backend.generate("ctx", "q", &[]).await.unwrap();

    assert_eq!(answer, "câu trả lời cố định");
}
