use mockito::Matcher;
use ragchat::config::EmbeddingsConfig;
use ragchat::embeddings::EmbeddingClient;
use ragchat::RagChatError;
use ragchat::Result;

/// Config pointed at a mock server, with zero backoff so retries don't sleep
fn test_config(endpoint: String) -> EmbeddingsConfig {
    EmbeddingsConfig {
        endpoint,
        api_key: "test-key".to_string(),
        model: "text-embedding-ada-002".to_string(),
        dimension: 3,
        max_input_chars: 8191,
        retry_max_attempts: 3,
        retry_backoff_floor_secs: 0,
        retry_backoff_ceiling_secs: 0,
    }
}

#[tokio::test]
async fn test_embed_parses_vectors() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"embedding":[0.1,0.2,0.3]},{"embedding":[0.4,0.5,0.6]}]}"#)
        .create_async()
        .await;

    let client = EmbeddingClient::new(&test_config(server.url()))?;
    let vectors = client
        .embed(&["first text".to_string(), "second text".to_string()])
        .await?;

    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[0], vec![0.1, 0.2, 0.3]);
    assert_eq!(vectors[1], vec![0.4, 0.5, 0.6]);

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_embed_truncates_long_input_before_sending() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::Json(serde_json::json!({
            "input": ["a".repeat(8191)],
            "model": "text-embedding-ada-002",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"embedding":[0.1,0.2,0.3]}]}"#)
        .create_async()
        .await;

    let client = EmbeddingClient::new(&test_config(server.url()))?;
    client.embed(&["a".repeat(9000)]).await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_rate_limited_request_is_retried_then_succeeds() -> Result<()> {
    let mut server = mockito::Server::new_async().await;

    // First call: 429
    let rate_limited = server
        .mock("POST", "/embeddings")
        .with_status(429)
        .with_body("slow down")
        .expect(1)
        .create_async()
        .await;

    // Second call: success
    let success = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"embedding":[0.1,0.2,0.3]}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = EmbeddingClient::new(&test_config(server.url()))?;
    let vectors = client.embed(&["text".to_string()]).await?;

    assert_eq!(vectors, vec![vec![0.1, 0.2, 0.3]]);

    rate_limited.assert_async().await;
    success.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_exhausts_retries() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .with_status(429)
        .with_body("slow down")
        .expect(3)
        .create_async()
        .await;

    let client = EmbeddingClient::new(&test_config(server.url()))?;
    let err = client.embed(&["text".to_string()]).await.unwrap_err();

    assert!(matches!(err, RagChatError::RateLimited(_)));
    assert!(err.to_string().contains("slow down"));

    // Three requests total: the original call plus two retries
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_not_retried() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create_async()
        .await;

    let client = EmbeddingClient::new(&test_config(server.url()))?;
    let err = client.embed(&["text".to_string()]).await.unwrap_err();

    assert!(matches!(err, RagChatError::Embedding(_)));
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("upstream exploded"));

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_embedding_count_mismatch_is_an_error() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"embedding":[0.1,0.2,0.3]}]}"#)
        .create_async()
        .await;

    let client = EmbeddingClient::new(&test_config(server.url()))?;
    let err = client
        .embed(&["one".to_string(), "two".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, RagChatError::Embedding(_)));
    assert!(err.to_string().contains("Requested 2 embeddings but got 1"));

    Ok(())
}

#[tokio::test]
async fn test_malformed_response_is_an_error() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json at all")
        .create_async()
        .await;

    let client = EmbeddingClient::new(&test_config(server.url()))?;
    let err = client.embed(&["text".to_string()]).await.unwrap_err();

    assert!(matches!(err, RagChatError::Embedding(_)));
    assert!(err.to_string().contains("Failed to parse response"));

    Ok(())
}
