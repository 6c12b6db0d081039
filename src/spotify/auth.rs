use anyhow::{Context, Result};
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::info;

#[allow(dead_code)]
pub struct AuthResult {
    pub code: String,
    pub state: String,
}

/// Starts a local HTTP server waiting for the Spotify redirect.
pub async fn wait_for_auth_code(redirect_uri: &str) -> Result<AuthResult> {
    let addr = redirect_uri
        .strip_prefix("http://")
        .and_then(|rest| rest.split('/').next())
        .context("redirect URI must be a local http:// address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr} for OAuth redirect"))?;

    info!("Waiting for Spotify auth redirect on {redirect_uri} ...");

    let (mut stream, _) = listener.accept().await?;
    let mut buf = vec![0u8; 4096];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);

    // Parse the GET line: GET /callback?code=...&state=... HTTP/1.1
    let query = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|path| path.split('?').nth(1))
        .unwrap_or("");

    let params: HashMap<&str, &str> = query
        .split('&')
        .filter_map(|kv| {
            let mut parts = kv.splitn(2, '=');
            Some((parts.next()?, parts.next()?))
        })
        .collect();

    let code = params.get("code").context("No code in redirect")?.to_string();
    let state = params.get("state").unwrap_or(&"").to_string();

    let body = r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { background: #121212; color: #1DB954; font-family: monospace;
           display: flex; align-items: center; justify-content: center; height: 100vh; margin: 0; }
    .card { text-align: center; border: 1px solid #1DB954; padding: 40px; border-radius: 12px; }
    p { color: #aaa; }
  </style>
</head>
<body>
  <div class="card">
    <h1>🎵 MoodySongs</h1>
    <p>Authentication successful! You can close this tab.</p>
    <p style="color:#1DB954">Return to your terminal ✨</p>
  </div>
</body>
</html>"#;

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok(AuthResult { code, state })
}
