use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bistro_graph::{ChatAssistant, Graph, GraphConfig, GraphError, GraphInput, LLMConfig};
use bistro_llm::{ChatClient, ChatRequest, ChatResponse, LlmError, Message, Role};
use bistro_persist::{Checkpointer, InMemoryCheckpointer};

/// Replies "reply N" to the Nth request and records what it was sent.
#[derive(Default)]
struct EchoClient {
    requests: Mutex<Vec<ChatRequest>>,
}

#[async_trait]
impl ChatClient for EchoClient {
    async fn chat(&self, request: ChatRequest) -> bistro_llm::Result<ChatResponse> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        Ok(ChatResponse {
            content: format!("reply {}", requests.len()),
            stop_reason: Some("end_turn".into()),
            usage: None,
        })
    }
}

struct FixedClient(Result<&'static str, u16>);

#[async_trait]
impl ChatClient for FixedClient {
    async fn chat(&self, _request: ChatRequest) -> bistro_llm::Result<ChatResponse> {
        match self.0 {
            Ok(text) => Ok(ChatResponse {
                content: text.to_string(),
                stop_reason: None,
                usage: None,
            }),
            Err(status) => Err(LlmError::Api {
                status,
                body: "boom".into(),
            }),
        }
    }
}

fn graph_with(client: Arc<dyn ChatClient>, store: Arc<dyn Checkpointer>) -> Graph {
    Graph::builder()
        .llm_client(client)
        .llm_config(LLMConfig::new("claude-test").with_temperature(0.6))
        .checkpointer(store)
        .build()
        .unwrap()
}

fn assistant() -> (ChatAssistant, Arc<EchoClient>) {
    let client = Arc::new(EchoClient::default());
    let graph = graph_with(client.clone(), Arc::new(InMemoryCheckpointer::new()));
    (ChatAssistant::new(graph), client)
}

#[tokio::test]
async fn test_fresh_thread_has_empty_history() {
    let (assistant, _) = assistant();
    let thread_id = uuid::Uuid::new_v4().to_string();
    assert!(assistant.history(&thread_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_is_exact_after_each_turn() {
    for turns in 1..=5 {
        let (assistant, _) = assistant();
        let mut expected = Vec::new();

        for turn in 1..=turns {
            let question = format!("question {turn}");
            let reply = assistant.chat(&question, "thread", None).await.unwrap();
            assert_eq!(reply, format!("reply {turn}"));
            expected.push(Message::human(question));
            expected.push(Message::ai(reply));
        }

        assert_eq!(assistant.history("thread").await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_model_sees_prior_turns() {
    let (assistant, client) = assistant();
    assistant.chat("My name is Ana", "t", None).await.unwrap();
    assistant.chat("What is my name?", "t", None).await.unwrap();

    let requests = client.requests.lock().unwrap();
    let second = &requests[1];
    assert_eq!(second.model, "claude-test");
    assert_eq!(second.options.temperature, Some(0.6));
    let roles: Vec<Role> = second.messages.iter().map(Message::role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    assert_eq!(second.messages[0].text(), "My name is Ana");
}

#[tokio::test]
async fn test_threads_do_not_share_history() {
    let (assistant, _) = assistant();
    assistant.chat("hello from A", "A", None).await.unwrap();

    assert!(assistant.history("B").await.unwrap().is_empty());

    assistant.chat("hello from B", "B", None).await.unwrap();
    let a = assistant.history("A").await.unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].text(), "hello from A");
}

#[tokio::test]
async fn test_system_prompt_is_stored_once() {
    let (assistant, client) = assistant();
    assistant
        .chat("Hi", "t", Some("You are a sommelier."))
        .await
        .unwrap();
    assistant.chat("Red or white?", "t", None).await.unwrap();
    assistant
        .chat("And dessert?", "t", Some("You are a sommelier."))
        .await
        .unwrap();

    let history = assistant.history("t").await.unwrap();
    let system_count = history.iter().filter(|m| m.role() == Role::System).count();
    assert_eq!(system_count, 1);
    assert_eq!(history[0], Message::system("You are a sommelier."));
    assert_eq!(history.len(), 7);

    // Every request still leads with the stored instruction.
    for request in client.requests.lock().unwrap().iter() {
        assert_eq!(request.messages[0].role(), Role::System);
    }
}

#[tokio::test]
async fn test_invoke_returns_reply_and_history() {
    let client = Arc::new(EchoClient::default());
    let graph = graph_with(client, Arc::new(InMemoryCheckpointer::new()));

    let output = graph
        .invoke(GraphInput::new("t", "Hi").with_system_prompt("Be brief."))
        .await
        .unwrap();

    assert_eq!(output.thread_id, "t");
    assert_eq!(output.reply_text(), "reply 1");
    assert_eq!(output.messages.len(), 3);
    assert!(uuid::Uuid::parse_str(&output.run_id).is_ok());
}

#[tokio::test]
async fn test_empty_reply_is_malformed_and_not_saved() {
    let store = Arc::new(InMemoryCheckpointer::new());
    let graph = graph_with(Arc::new(FixedClient(Ok("   "))), store.clone());

    let err = graph.invoke(GraphInput::new("t", "Hi")).await.unwrap_err();
    assert!(matches!(err, GraphError::MalformedResponse(_)));
    assert!(store.load("t").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_model_failure_propagates_without_partial_state() {
    let store = Arc::new(InMemoryCheckpointer::new());
    let graph = graph_with(Arc::new(FixedClient(Err(429))), store.clone());

    let err = graph.invoke(GraphInput::new("t", "Hi")).await.unwrap_err();
    assert!(matches!(err, GraphError::Llm(LlmError::Api { status: 429, .. })));
    assert!(store.load("t").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let (assistant, client) = assistant();
    let err = assistant.chat("  ", "t", None).await.unwrap_err();
    assert!(matches!(err, GraphError::EmptyInput("message")));
    assert!(client.requests.lock().unwrap().is_empty());
}

#[test]
fn test_builder_requires_client() {
    let result = Graph::builder().llm_config(LLMConfig::new("m")).build();
    assert!(matches!(result, Err(GraphError::MissingComponent(_))));
}

#[test]
fn test_builder_rejects_zero_iterations() {
    let result = Graph::builder()
        .llm_client(Arc::new(EchoClient::default()))
        .llm_config(LLMConfig::new("m"))
        .config(GraphConfig::default().with_max_iterations(0))
        .build();
    assert!(matches!(result, Err(GraphError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_single_iteration_is_enough_for_one_turn() {
    let graph = Graph::builder()
        .llm_client(Arc::new(EchoClient::default()))
        .llm_config(LLMConfig::new("m"))
        .config(GraphConfig::default().with_max_iterations(1))
        .build()
        .unwrap();

    let output = graph.invoke(GraphInput::new("t1", "hi")).await.unwrap();
    assert_eq!(output.reply_text(), "reply 1");
}
