// Raw HTTP exchange over a bare TCP socket.
//
// One connection per call, no reuse. The response is read until the peer
// closes the stream; that is only correct because this firmware family
// terminates every response with a connection close (it never sends
// chunked bodies and its Content-Length is unreliable). Do not treat this
// as a general HTTP client property.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::error::NetError;

/// A parsed HTTP response: status line, headers, body.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Minimal HTTP/1.1 client: one blocking-style call, one TCP connection.
#[derive(Debug, Clone)]
pub struct RawClient {
    timeout: Duration,
}

impl RawClient {
    /// Create a client with an overall per-request deadline covering
    /// connect, write, and read.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Perform one HTTP exchange.
    ///
    /// Headers are written in the caller-supplied order — some CGI handlers
    /// in this firmware family care. The connection is always closed when
    /// this call returns: on success the peer closed it, and on error or
    /// timeout the stream (and its socket) is dropped here.
    pub async fn request(
        &self,
        host: &str,
        port: u16,
        method: &str,
        path: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<RawResponse, NetError> {
        debug!(%host, port, method, path, "raw http request");

        let wire = serialize_request(method, path, headers, body);
        trace!(bytes = wire.len(), "serialized request");

        let exchange = async {
            let mut stream = TcpStream::connect((host, port)).await?;
            stream.write_all(wire.as_bytes()).await?;
            stream.flush().await?;

            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await?;
            Ok::<Vec<u8>, std::io::Error>(buf)
        };

        let buf = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(NetError::Timeout {
                    timeout: self.timeout,
                });
            }
        };

        parse_response(&buf)
    }
}

/// Assemble the request bytes: request line, headers in order, blank line,
/// body. CRLF throughout, per HTTP/1.1 wire format.
///
/// `Connection: close` is always appended after the caller's headers: the
/// one-connection-per-call contract and the read-to-EOF strategy both
/// require the peer to close the stream after responding.
fn serialize_request(method: &str, path: &str, headers: &[(String, String)], body: &str) -> String {
    let mut wire = String::with_capacity(128 + body.len());
    wire.push_str(method);
    wire.push(' ');
    wire.push_str(path);
    wire.push_str(" HTTP/1.1\r\n");
    for (name, value) in headers {
        wire.push_str(name);
        wire.push_str(": ");
        wire.push_str(value);
        wire.push_str("\r\n");
    }
    wire.push_str("Connection: close\r\n\r\n");
    wire.push_str(body);
    wire
}

fn parse_response(buf: &[u8]) -> Result<RawResponse, NetError> {
    let text = String::from_utf8_lossy(buf);

    let split_at = text.find("\r\n\r\n").ok_or_else(|| NetError::Protocol {
        message: "no header/body separator before end of stream".into(),
    })?;
    let head = &text[..split_at];
    let body = text[split_at + 4..].to_string();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let (status, reason) = parse_status_line(status_line)?;

    let headers = lines
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect();

    Ok(RawResponse {
        status,
        reason,
        headers,
        body,
    })
}

/// Parse `HTTP/1.<digit> <code> <text>`. Anything else is a protocol error.
fn parse_status_line(line: &str) -> Result<(u16, String), NetError> {
    let malformed = || NetError::Protocol {
        message: format!("bad status line: {line:?}"),
    };

    let rest = line.strip_prefix("HTTP/1.").ok_or_else(malformed)?;
    let mut chars = rest.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }
    let rest = chars.as_str().strip_prefix(' ').ok_or_else(malformed)?;

    let (code, reason) = match rest.split_once(' ') {
        Some((code, reason)) => (code, reason),
        None => (rest, ""),
    };
    let status: u16 = code.parse().map_err(|_| malformed())?;

    Ok((status, reason.trim().to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_request_with_crlf_and_header_order() {
        let headers = vec![
            ("Host".to_string(), "192.0.2.1".to_string()),
            ("Cookie".to_string(), "admin=abc".to_string()),
        ];
        let wire = serialize_request("POST", "/vlan.cgi?page=static", &headers, "vid=10");
        assert_eq!(
            wire,
            "POST /vlan.cgi?page=static HTTP/1.1\r\n\
             Host: 192.0.2.1\r\n\
             Cookie: admin=abc\r\n\
             Connection: close\r\n\
             \r\n\
             vid=10"
        );
    }

    #[test]
    fn parses_status_line_variants() {
        assert_eq!(
            parse_status_line("HTTP/1.1 200 OK").unwrap(),
            (200, "OK".to_string())
        );
        assert_eq!(
            parse_status_line("HTTP/1.0 404 Not Found").unwrap(),
            (404, "Not Found".to_string())
        );
        // Reason phrase is optional on some firmware builds.
        assert_eq!(
            parse_status_line("HTTP/1.1 200").unwrap(),
            (200, String::new())
        );
    }

    #[test]
    fn rejects_garbage_status_lines() {
        for line in ["", "ICY 200 OK", "HTTP/2 200 OK", "HTTP/1.1 abc OK"] {
            assert!(
                matches!(parse_status_line(line), Err(NetError::Protocol { .. })),
                "accepted: {line:?}"
            );
        }
    }

    #[test]
    fn parses_full_response() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nServer: lwIP\r\n\r\n<html>ok</html>";
        let resp = parse_response(raw).unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.reason, "OK");
        assert_eq!(resp.header("content-type"), Some("text/html"));
        assert_eq!(resp.body, "<html>ok</html>");
        assert!(resp.is_success());
    }

    #[test]
    fn missing_separator_is_protocol_error() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n";
        assert!(matches!(
            parse_response(raw),
            Err(NetError::Protocol { .. })
        ));
    }
}
