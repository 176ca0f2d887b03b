//! Chat orchestration behavior against a mock gateway.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notes_api::services::{ChatService, InMemorySessionStore};
use notes_core::{
    ChatRequest, ChatTurn, Error, GatewayError, ModelParams, Role, SessionStore, TokenUsage,
};
use notes_inference::mock::MockGateway;

fn service(gateway: &MockGateway) -> (ChatService, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let chat = ChatService::new(Arc::new(gateway.clone()), store.clone());
    (chat, store)
}

#[tokio::test]
async fn test_chat_without_session_mints_id() {
    let gateway = MockGateway::new().with_fixed_response("你好！");
    let (chat, store) = service(&gateway);

    let exchange = chat.chat(ChatRequest::new("你好")).await;

    assert!(exchange.success);
    assert_eq!(exchange.content.as_deref(), Some("你好！"));
    assert_eq!(exchange.model.as_deref(), Some("mock-model"));
    assert!(uuid::Uuid::parse_str(&exchange.session_id).is_ok());

    let history = store.history(&exchange.session_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], ChatTurn::user("你好"));
    assert_eq!(history[1], ChatTurn::assistant("你好！"));
}

#[tokio::test]
async fn test_two_chats_without_session_get_distinct_ids() {
    let gateway = MockGateway::new();
    let (chat, store) = service(&gateway);

    let a = chat.chat(ChatRequest::new("one")).await;
    let b = chat.chat(ChatRequest::new("two")).await;

    assert_ne!(a.session_id, b.session_id);
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_reusing_session_id_continues_history() {
    let gateway = MockGateway::new().with_echo();
    let (chat, _store) = service(&gateway);

    let first = chat.chat(ChatRequest::new("什么是二分查找？")).await;
    let second = chat
        .chat(ChatRequest::new("时间复杂度呢？").with_session(first.session_id.clone()))
        .await;

    assert_eq!(second.session_id, first.session_id);
    let call = gateway.last_call().unwrap();
    assert_eq!(call.user_message, "时间复杂度呢？");
    assert_eq!(
        call.history,
        vec![
            ChatTurn::user("什么是二分查找？"),
            ChatTurn::assistant("echo: 什么是二分查找？"),
        ]
    );
}

#[tokio::test]
async fn test_history_is_bounded_and_ordered() {
    let gateway = MockGateway::new().with_echo();
    let (chat, store) = service(&gateway);

    for n in 1..=13usize {
        let exchange = chat
            .chat(ChatRequest::new(format!("m{n}")).with_session("s"))
            .await;
        assert!(exchange.success);

        let history = store.history("s").await.unwrap();
        assert_eq!(history.len(), (2 * n).min(20));
        assert_eq!(history.len() % 2, 0);
    }

    let history = store.history("s").await.unwrap();
    // 13 exchanges, window of 10: oldest kept is m4.
    assert_eq!(history[0], ChatTurn::user("m4"));
    assert_eq!(history[19], ChatTurn::assistant("echo: m13"));
    for pair in history.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Assistant);
    }
}

#[tokio::test]
async fn test_client_context_is_ignored() {
    let gateway = MockGateway::new();
    let (chat, _store) = service(&gateway);

    let mut request = ChatRequest::new("hello").with_session("fresh");
    request.context = Some(vec![ChatTurn::user("injected"), ChatTurn::assistant("fake")]);
    chat.chat(request).await;

    assert!(gateway.last_call().unwrap().history.is_empty());
}

#[tokio::test]
async fn test_gateway_failure_leaves_history_untouched() {
    let gateway = MockGateway::new()
        .fail_with(GatewayError::Upstream {
            status: 500,
            body: "boom".to_string(),
        });
    let (chat, store) = service(&gateway);
    let before = vec![ChatTurn::user("q"), ChatTurn::assistant("a")];
    store.put_history("s", before.clone()).await.unwrap();

    let exchange = chat.chat(ChatRequest::new("next").with_session("s")).await;

    assert!(!exchange.success);
    assert_eq!(exchange.session_id, "s");
    assert!(exchange.content.is_none());
    let message = exchange.error_message.unwrap();
    assert!(message.starts_with("AI服务暂时不可用: "), "{}", message);
    assert!(message.contains("500"));
    assert_eq!(store.history("s").await.unwrap(), before);
}

#[tokio::test]
async fn test_failure_without_session_reports_minted_id() {
    let gateway = MockGateway::new().fail_with(GatewayError::Timeout("read".into()));
    let (chat, store) = service(&gateway);

    let exchange = chat.chat(ChatRequest::new("hi")).await;

    assert!(!exchange.success);
    assert!(uuid::Uuid::parse_str(&exchange.session_id).is_ok());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_blank_message_rejected_without_gateway_call() {
    let gateway = MockGateway::new();
    let (chat, _store) = service(&gateway);

    for message in ["", "   ", "\n"] {
        let exchange = chat.chat(ChatRequest::new(message).with_session("s")).await;
        assert!(!exchange.success);
        assert_eq!(exchange.session_id, "s");
    }
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_oversized_message_rejected_without_gateway_call() {
    let gateway = MockGateway::new();
    let (chat, _store) = service(&gateway);

    let exchange = chat.chat(ChatRequest::new("x".repeat(4001))).await;

    assert!(!exchange.success);
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_clear_then_chat_starts_fresh() {
    let gateway = MockGateway::new();
    let (chat, store) = service(&gateway);

    chat.chat(ChatRequest::new("one").with_session("s")).await;
    chat.clear_session("s").await.unwrap();
    chat.clear_session("s").await.unwrap();
    assert_eq!(chat.active_session_count().await.unwrap(), 0);

    chat.chat(ChatRequest::new("two").with_session("s")).await;
    assert!(gateway.last_call().unwrap().history.is_empty());
    assert_eq!(store.history("s").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_model_params_and_usage_pass_through() {
    let usage = TokenUsage {
        prompt_tokens: 3,
        completion_tokens: 4,
        total_tokens: 7,
    };
    let gateway = MockGateway::new().with_usage(usage);
    let (chat, _store) = service(&gateway);
    let params = ModelParams {
        temperature: Some(0.1),
        max_tokens: Some(50),
        top_p: Some(0.8),
    };

    let exchange = chat
        .chat(ChatRequest::new("hi").with_model_params(params.clone()))
        .await;

    assert_eq!(exchange.token_usage, Some(usage));
    assert_eq!(gateway.last_call().unwrap().params, params);
}

#[tokio::test]
async fn test_probe_does_not_store_a_session() {
    let gateway = MockGateway::new().with_fixed_response("我是AI助手");
    let (chat, store) = service(&gateway);

    let exchange = chat.test_connection().await;

    assert!(exchange.success);
    assert_eq!(exchange.content.as_deref(), Some("我是AI助手"));
    assert_eq!(store.count().await.unwrap(), 0);
    let call = gateway.last_call().unwrap();
    assert!(call.history.is_empty());
    assert_eq!(call.user_message, notes_core::defaults::PROBE_MESSAGE);
}

#[tokio::test]
async fn test_probe_failure_is_reported() {
    let gateway = MockGateway::new().fail_with(GatewayError::Transport("refused".into()));
    let (chat, _store) = service(&gateway);

    let exchange = chat.test_connection().await;

    assert!(!exchange.success);
    assert!(exchange.error_message.unwrap().contains("refused"));
}

#[tokio::test]
async fn test_concurrent_sessions_do_not_interfere() {
    let gateway = MockGateway::new().with_echo().with_latency_ms(20);
    let (chat, store) = service(&gateway);

    let mut handles = Vec::new();
    for s in 0..8 {
        let chat = chat.clone();
        handles.push(tokio::spawn(async move {
            for n in 0..3 {
                let request = ChatRequest::new(format!("s{s}-m{n}")).with_session(format!("s{s}"));
                assert!(chat.chat(request).await.success);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 8);
    for s in 0..8 {
        let history = store.history(&format!("s{s}")).await.unwrap();
        assert_eq!(history.len(), 6);
        for (n, pair) in history.chunks(2).enumerate() {
            assert_eq!(pair[0], ChatTurn::user(format!("s{s}-m{n}")));
            assert_eq!(pair[1], ChatTurn::assistant(format!("echo: s{s}-m{n}")));
        }
    }
}

#[tokio::test]
async fn test_concurrent_chats_same_session_keep_every_exchange() {
    let gateway = MockGateway::new().with_echo().with_latency_ms(20);
    let (chat, store) = service(&gateway);

    let calls = (0..5).map(|n| {
        let chat = chat.clone();
        async move { chat.chat(ChatRequest::new(format!("m{n}")).with_session("shared")).await }
    });
    let results = futures::future::join_all(calls).await;
    assert!(results.iter().all(|r| r.success));

    let history = store.history("shared").await.unwrap();
    assert_eq!(history.len(), 10);
    for pair in history.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].content, format!("echo: {}", pair[0].content));
    }
}

#[tokio::test(start_paused = true)]
async fn test_chats_on_distinct_sessions_run_in_parallel() {
    let gateway = MockGateway::new().with_echo().with_latency_ms(1_000);
    let (chat, store) = service(&gateway);

    let start = tokio::time::Instant::now();
    let calls = (0..8).map(|s| {
        let chat = chat.clone();
        async move {
            chat.chat(ChatRequest::new(format!("m{s}")).with_session(format!("s{s}")))
                .await
        }
    });
    let results = futures::future::join_all(calls).await;
    let elapsed = start.elapsed();

    assert!(results.iter().all(|r| r.success));
    assert_eq!(store.count().await.unwrap(), 8);
    assert!(elapsed >= Duration::from_millis(1_000));
    assert!(elapsed < Duration::from_millis(2_000), "chats ran serially: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_chat_cancelled_by_caller_deadline_leaves_history_untouched() {
    let gateway = MockGateway::new().with_latency_ms(1_000);
    let (chat, store) = service(&gateway);
    let before = vec![ChatTurn::user("旧问题"), ChatTurn::assistant("旧回答")];
    store.put_history("s", before.clone()).await.unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        chat.chat(ChatRequest::new("x").with_session("s")),
    )
    .await;
    assert!(outcome.is_err());
    assert_eq!(store.history("s").await.unwrap(), before);

    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        chat.chat(ChatRequest::new("x").with_session("fresh")),
    )
    .await;
    assert!(outcome.is_err());
    assert_eq!(store.count().await.unwrap(), 1);
    assert!(store.history("fresh").await.unwrap().is_empty());
}

/// Store whose every operation fails.
struct BrokenStore;

#[async_trait]
impl SessionStore for BrokenStore {
    async fn history(&self, _session_id: &str) -> notes_core::Result<Vec<ChatTurn>> {
        Err(Error::SessionStore("unavailable".into()))
    }

    async fn put_history(
        &self,
        _session_id: &str,
        _turns: Vec<ChatTurn>,
    ) -> notes_core::Result<()> {
        Err(Error::SessionStore("unavailable".into()))
    }

    async fn append_exchange(
        &self,
        _session_id: &str,
        _turns: Vec<ChatTurn>,
        _cap: usize,
    ) -> notes_core::Result<usize> {
        Err(Error::SessionStore("unavailable".into()))
    }

    async fn clear(&self, _session_id: &str) -> notes_core::Result<()> {
        Err(Error::SessionStore("unavailable".into()))
    }

    async fn count(&self) -> notes_core::Result<usize> {
        Err(Error::SessionStore("unavailable".into()))
    }
}

#[tokio::test]
async fn test_store_failure_becomes_failure_exchange() {
    let gateway = MockGateway::new();
    let chat = ChatService::new(Arc::new(gateway.clone()), Arc::new(BrokenStore));

    let exchange = chat.chat(ChatRequest::new("hi").with_session("s")).await;

    assert!(!exchange.success);
    assert!(exchange.error_message.unwrap().contains("unavailable"));
    assert_eq!(gateway.call_count(), 0);
}
