//! Monoio-native HTTPS transport
//!
//! - Single-threaded async with monoio
//! - Direct TLS integration with rustls
//! - HTTP/1.1 with `Connection: close`, `Content-Length` and chunked bodies
//! - The request line carries `path_and_query` byte for byte, so the
//!   query that was signed is the query the server sees

use crate::errors::{BrokerError, Result};
use crate::traits::HttpTransport;
use async_trait::async_trait;
use monoio::io::{AsyncReadRent, AsyncWriteRentExt};
use monoio::net::TcpStream;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// One outbound HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Scheme, host and port of the broker API
    pub origin: Url,
    /// Path plus `?query`, already encoded
    pub path_and_query: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: &str, origin: &Url, path_and_query: impl Into<String>) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            origin: origin.clone(),
            path_and_query: path_and_query.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Full URL for logging
    pub fn url(&self) -> String {
        format!("{}{}", self.origin.as_str().trim_end_matches('/'), self.path_and_query)
    }
}

/// HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Monoio-native HTTPS client
pub struct MonoioHttpsClient {
    tls_config: Arc<ClientConfig>,
    timeout: Option<Duration>,
}

/// TLS stream wrapper for monoio
struct TlsStream {
    stream: TcpStream,
    tls_conn: ClientConnection,
    write_buf: Vec<u8>,
    tls_read_buf: Vec<u8>,
    handshake_complete: bool,
}

impl MonoioHttpsClient {
    /// Create a new HTTPS client with the webpki root store
    pub fn new() -> Self {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls_config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            tls_config: Arc::new(tls_config),
            timeout: None,
        }
    }

    /// Bound each request; requires a timer-enabled runtime
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let host = request.origin.host_str()
            .ok_or_else(|| BrokerError::InvalidUrl("No host in URL".to_string()))?;
        let port = request.origin.port_or_known_default().unwrap_or(443);
        let wire = build_request_bytes(host, request)?;

        let tcp_stream = TcpStream::connect(format!("{host}:{port}"))
            .await
            .map_err(|e| BrokerError::NetworkError(format!("TCP connect failed: {e}")))?;

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| BrokerError::NetworkError(format!("Invalid server name: {e:?}")))?;

        let tls_conn = ClientConnection::new(self.tls_config.clone(), server_name)
            .map_err(|e| BrokerError::NetworkError(format!("TLS setup failed: {e}")))?;

        let mut tls_stream = TlsStream::new(tcp_stream, tls_conn);

        tls_stream.write_all(&wire).await?;

        let response_data = tls_stream.read_to_end().await?;
        parse_http_response(&response_data)
    }
}

#[async_trait(?Send)]
impl HttpTransport for MonoioHttpsClient {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!("📡 {} {}", request.method, request.url());
        match self.timeout {
            Some(limit) => monoio::time::timeout(limit, self.execute(request))
                .await
                .map_err(|_| BrokerError::Timeout(format!("{} after {}ms", request.url(), limit.as_millis())))?,
            None => self.execute(request).await,
        }
    }
}

impl Default for MonoioHttpsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject anything that could end a line of the request head early
fn check_head_field(what: &str, value: &str) -> Result<()> {
    if value.chars().any(char::is_control) {
        return Err(BrokerError::InvalidRequest(format!("{what} contains control characters")));
    }
    Ok(())
}

/// Serialize the request head and body
fn build_request_bytes(host: &str, request: &HttpRequest) -> Result<Vec<u8>> {
    check_head_field("method", &request.method)?;
    check_head_field("request path", &request.path_and_query)?;

    let body = request.body.as_deref().unwrap_or_default();
    let mut head = format!(
        "{} {} HTTP/1.1\r\n\
         Host: {host}\r\n\
         User-Agent: ndbroker/0.1\r\n\
         Accept: application/json\r\n\
         Connection: close\r\n\
         Content-Length: {}\r\n",
        request.method,
        request.path_and_query,
        body.len()
    );

    for (key, value) in &request.headers {
        if key.is_empty() || key.contains(':') {
            return Err(BrokerError::InvalidRequest(format!("bad header name {key:?}")));
        }
        check_head_field(key, key)?;
        check_head_field(key, value)?;
        head.push_str(&format!("{key}: {value}\r\n"));
    }
    head.push_str("\r\n");

    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(body.as_bytes());
    Ok(bytes)
}

/// Parse a complete HTTP/1.1 response
fn parse_http_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = data.windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| BrokerError::NetworkError("Invalid HTTP response: no header terminator".to_string()))?;

    let header_part = String::from_utf8_lossy(&data[..header_end]);
    let body_bytes = &data[header_end + 4..];

    let mut lines = header_part.lines();
    let status_line = lines.next()
        .ok_or_else(|| BrokerError::NetworkError("Empty response".to_string()))?;

    let status = status_line.split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| BrokerError::NetworkError("Invalid status line".to_string()))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let chunked = headers.iter().any(|(k, v)| {
        k.eq_ignore_ascii_case("transfer-encoding") && v.to_ascii_lowercase().contains("chunked")
    });

    let body = if chunked {
        decode_chunked(body_bytes)?
    } else {
        let length = headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok());
        match length {
            Some(len) => body_bytes[..len.min(body_bytes.len())].to_vec(),
            None => body_bytes.to_vec(),
        }
    };

    Ok(HttpResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Decode a `Transfer-Encoding: chunked` body
fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    loop {
        let line_end = data.windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| BrokerError::NetworkError("Truncated chunk header".to_string()))?;
        let size_line = String::from_utf8_lossy(&data[..line_end]);
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| BrokerError::NetworkError(format!("Invalid chunk size: {size_hex}")))?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(out);
        }
        if data.len() < size {
            return Err(BrokerError::NetworkError("Truncated chunk body".to_string()));
        }
        out.extend_from_slice(&data[..size]);
        data = data.get(size + 2..).unwrap_or_default();
    }
}

impl TlsStream {
    fn new(stream: TcpStream, tls_conn: ClientConnection) -> Self {
        Self {
            stream,
            tls_conn,
            write_buf: Vec::with_capacity(8192),
            tls_read_buf: Vec::with_capacity(8192),
            handshake_complete: false,
        }
    }

    /// Push pending TLS records to the socket
    async fn flush_tls(&mut self) -> Result<()> {
        while self.tls_conn.wants_write() {
            self.write_buf.clear();
            self.tls_conn.write_tls(&mut self.write_buf)
                .map_err(|e| BrokerError::NetworkError(format!("TLS write failed: {e}")))?;

            if !self.write_buf.is_empty() {
                let (result, _) = self.stream.write_all(self.write_buf.clone()).await;
                result.map_err(|e| BrokerError::NetworkError(format!("TCP write failed: {e}")))?;
            }
        }
        Ok(())
    }

    /// Read one batch of TLS records from the socket; false on EOF
    async fn fill_tls(&mut self) -> Result<bool> {
        let buffer = vec![0u8; 4096];
        let (result, buf) = self.stream.read(buffer).await;
        let bytes_read = result.map_err(|e| BrokerError::NetworkError(format!("TCP read failed: {e}")))?;
        if bytes_read == 0 {
            return Ok(false);
        }

        self.tls_conn.read_tls(&mut std::io::Cursor::new(&buf[..bytes_read]))
            .map_err(|e| BrokerError::NetworkError(format!("TLS read failed: {e}")))?;
        self.tls_conn.process_new_packets()
            .map_err(|e| BrokerError::NetworkError(format!("TLS process failed: {e}")))?;
        Ok(true)
    }

    async fn complete_handshake(&mut self) -> Result<()> {
        if self.handshake_complete {
            return Ok(());
        }

        loop {
            self.flush_tls().await?;

            if !self.tls_conn.is_handshaking() {
                self.handshake_complete = true;
                return Ok(());
            }

            if self.tls_conn.wants_read() {
                if !self.fill_tls().await? {
                    return Err(BrokerError::NetworkError("Connection closed during handshake".to_string()));
                }
            } else if !self.tls_conn.wants_write() {
                return Err(BrokerError::NetworkError("TLS handshake stalled".to_string()));
            }
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.complete_handshake().await?;

        self.tls_conn.writer().write_all(data)
            .map_err(|e| BrokerError::NetworkError(format!("TLS application write failed: {e}")))?;

        self.flush_tls().await
    }

    async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        self.complete_handshake().await?;

        let mut response_data = Vec::new();
        loop {
            self.tls_read_buf.clear();
            self.tls_read_buf.resize(4096, 0);

            match self.tls_conn.reader().read(&mut self.tls_read_buf) {
                Ok(0) => {}
                Ok(n) => {
                    response_data.extend_from_slice(&self.tls_read_buf[..n]);
                    continue;
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(e) => {
                    return Err(BrokerError::NetworkError(format!("TLS read failed: {e}")));
                }
            }

            if !self.fill_tls().await? {
                break;
            }
        }

        Ok(response_data)
    }
}
