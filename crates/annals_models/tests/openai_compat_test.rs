mod test_utils;

use annals_core::{AnnalsConfig, ApiSettings, ChapterPrompt, GenerateRequest, GenerationSettings};
use annals_error::{AnnalsError, ErrorClass, ModelsErrorKind};
use annals_interface::AnnalsDriver;
use annals_models::{ApiKey, DeepSeekDriver, OpenAICompatibleClient};
use std::time::Duration;
use test_utils::{Reply, closed_port_url, completion, json, respond_once};

fn request() -> GenerateRequest {
    let config = AnnalsConfig::default()
        .with_generation_settings(GenerationSettings::default().with_max_tokens(1500));
    ChapterPrompt::new("你是一位历史作家", "请写第一章：烽火戏诸侯").request(&config.generation())
}

fn client(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<OpenAICompatibleClient> {
    Ok(OpenAICompatibleClient::new(
        ApiKey::new("sk-test"),
        "deepseek-chat".to_string(),
        base_url,
        "deepseek",
        timeout,
    )?)
}

#[tokio::test]
async fn test_successful_completion() -> anyhow::Result<()> {
    let responder = respond_once(json(200, "OK", &completion("# 第一章 烽火戏诸侯\n\n正文"))).await?;
    let client = client(&format!("{}/", responder.base_url), None)?;

    let response = client.generate(&request()).await?;
    assert_eq!(response.text(), "# 第一章 烽火戏诸侯\n\n正文");
    assert_eq!(response.finish_reason().as_deref(), Some("stop"));
    assert_eq!(response.usage().as_ref().map(|u| *u.total_tokens()), Some(920));

    let raw = responder.request.await??;
    let lowered = raw.to_ascii_lowercase();
    assert!(raw.starts_with("POST /chat/completions HTTP/1.1"), "{raw}");
    assert!(lowered.contains("authorization: bearer sk-test"));
    assert!(raw.contains("\"stream\":false"));
    assert!(raw.contains("\"model\":\"deepseek-chat\""));
    assert!(raw.contains("\"max_tokens\":1500"));
    assert!(raw.contains("\"role\":\"system\""));
    Ok(())
}

#[tokio::test]
async fn test_status_codes_are_classified() -> anyhow::Result<()> {
    let cases = [
        (401, "Unauthorized", ErrorClass::Authentication),
        (403, "Forbidden", ErrorClass::Authentication),
        (402, "Payment Required", ErrorClass::QuotaExceeded),
        (429, "Too Many Requests", ErrorClass::QuotaExceeded),
        (500, "Internal Server Error", ErrorClass::Upstream),
        (503, "Service Unavailable", ErrorClass::Upstream),
    ];

    for (status, reason, expected) in cases {
        let responder =
            respond_once(json(status, reason, r#"{"error":{"message":"nope"}}"#)).await?;
        let client = client(&responder.base_url, None)?;

        let err = AnnalsError::from(client.generate(&request()).await.unwrap_err());
        assert_eq!(err.class(), expected, "status {status}");
        assert!(err.to_string().contains("nope"));
        responder.request.await??;
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_success_body_is_upstream() -> anyhow::Result<()> {
    let blank = completion("   ");
    for body in ["this is not json", r#"{"choices":[]}"#, blank.as_str()] {
        let responder = respond_once(json(200, "OK", body)).await?;
        let client = client(&responder.base_url, None)?;

        let err = client.generate(&request()).await.unwrap_err();
        assert!(
            matches!(err.kind, ModelsErrorKind::MalformedResponse(_)),
            "{body}: {err}"
        );
        assert_eq!(err.kind.class(), ErrorClass::Upstream);
        responder.request.await??;
    }
    Ok(())
}

#[tokio::test]
async fn test_connection_refused_is_network() -> anyhow::Result<()> {
    let client = client(&closed_port_url().await?, None)?;
    let err = client.generate(&request()).await.unwrap_err();
    assert!(matches!(err.kind, ModelsErrorKind::Network(_)), "{err}");
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_network() -> anyhow::Result<()> {
    let responder = respond_once(Reply::Stall(Duration::from_secs(5))).await?;
    let client = client(&responder.base_url, Some(Duration::from_millis(300)))?;

    let err = client.generate(&request()).await.unwrap_err();
    assert!(matches!(err.kind, ModelsErrorKind::Timeout(_)), "{err}");
    assert_eq!(err.kind.class(), ErrorClass::Network);
    responder.request.abort();
    Ok(())
}

#[tokio::test]
async fn test_empty_request_is_rejected_before_sending() -> anyhow::Result<()> {
    let client = client(&closed_port_url().await?, None)?;
    let err = client
        .generate(&GenerateRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ModelsErrorKind::InvalidRequest(_)));
    Ok(())
}

#[tokio::test]
async fn test_deepseek_driver_uses_settings() -> anyhow::Result<()> {
    let responder = respond_once(json(200, "OK", &completion("正文"))).await?;
    let settings = ApiSettings::default()
        .with_base_url(responder.base_url.clone())
        .with_model("deepseek-reasoner".to_string())
        .with_timeout_secs(Some(30));
    let driver = DeepSeekDriver::new(&settings, ApiKey::new("sk-test"))?;

    assert_eq!(driver.provider_name(), "deepseek");
    assert_eq!(driver.model_name(), "deepseek-reasoner");
    assert_eq!(
        driver.endpoint(),
        format!("{}/chat/completions", responder.base_url)
    );

    let response = driver.generate(&request()).await?;
    assert_eq!(response.text(), "正文");

    let raw = responder.request.await??;
    assert!(raw.contains("\"model\":\"deepseek-reasoner\""));
    Ok(())
}
