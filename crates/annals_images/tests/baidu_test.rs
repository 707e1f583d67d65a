use annals_error::ImageErrorKind;
use annals_images::BaiduImageSearcher;
use annals_interface::{ImageFetch, ImageSearch};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned response and returns the request head.
async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
) -> anyhow::Result<(String, JoinHandle<anyhow::Result<String>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        let mut buf = Vec::new();
        let mut chunk = [0u8; 2048];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await?;
        socket.write_all(&body).await?;
        socket.shutdown().await?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    });

    Ok((base_url, handle))
}

#[tokio::test]
async fn test_search_sends_baidu_parameters() -> anyhow::Result<()> {
    let body = br#"{"data":[{"middleURL":"https://img0.baidu.com/a.jpg","width":640,"height":480,"type":"jpg"},{}]}"#;
    let (base_url, request) = serve_once("200 OK", "application/json", body.to_vec()).await?;
    let searcher = BaiduImageSearcher::with_endpoint(format!("{base_url}/search/acjson"))?;

    let candidates = searcher.search("管仲", 5).await?;
    assert_eq!(candidates.len(), 1);
    assert_eq!(*candidates[0].width(), Some(640));

    let head = request.await??;
    let lowered = head.to_ascii_lowercase();
    assert!(head.starts_with("GET /search/acjson?"), "{head}");
    assert!(head.contains("tn=resultjson_com"));
    assert!(head.contains("word=%E7%AE%A1%E4%BB%B2"));
    assert!(head.contains("rn=5"));
    assert!(lowered.contains("referer: https://image.baidu.com/"));
    Ok(())
}

#[tokio::test]
async fn test_search_http_error_is_reported() -> anyhow::Result<()> {
    let (base_url, request) = serve_once("403 Forbidden", "text/html", b"denied".to_vec()).await?;
    let searcher = BaiduImageSearcher::with_endpoint(base_url)?;

    let err = searcher.search("管仲", 5).await.unwrap_err();
    assert!(matches!(err.kind, ImageErrorKind::Search { .. }));
    request.await??;
    Ok(())
}

#[tokio::test]
async fn test_fetch_returns_body_and_content_type() -> anyhow::Result<()> {
    let (base_url, request) =
        serve_once("200 OK", "image/png", vec![0x89, 0x50, 0x4e, 0x47]).await?;
    let searcher = BaiduImageSearcher::with_endpoint("http://unused.invalid")?;

    let image = searcher.fetch(&format!("{base_url}/img.png")).await?;
    assert_eq!(image.content_type(), "image/png");
    assert_eq!(image.len(), 4);
    request.await??;
    Ok(())
}

#[tokio::test]
async fn test_fetch_error_status_is_download_error() -> anyhow::Result<()> {
    let (base_url, request) = serve_once("404 Not Found", "text/html", b"gone".to_vec()).await?;
    let searcher = BaiduImageSearcher::with_endpoint("http://unused.invalid")?;

    let err = searcher.fetch(&format!("{base_url}/img.png")).await.unwrap_err();
    assert!(matches!(err.kind, ImageErrorKind::Download { .. }));
    request.await??;
    Ok(())
}
