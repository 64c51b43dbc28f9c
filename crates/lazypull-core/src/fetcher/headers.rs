//! Parse HTTP response header lines into a ResponseHead.

/// Status and the headers the fetcher cares about, for the final response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code from the last status line seen.
    pub status: Option<u32>,
    /// Reason phrase from the last status line (HTTP/2 responses have none).
    pub reason: Option<String>,
    pub content_length: Option<u64>,
    /// Raw `Content-MD5` value, if present.
    pub content_md5: Option<String>,
}

/// Parse collected header lines into a ResponseHead.
///
/// libcurl hands over the headers of every response in a redirect chain (and any
/// `100 Continue`); each status line starts a new head, so only the final
/// response's fields survive.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead::default();
            let mut parts = line.splitn(3, ' ');
            let _version = parts.next();
            head.status = parts.next().and_then(|c| c.trim().parse::<u32>().ok());
            head.reason = parts
                .next()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty());
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                head.content_length = value.parse::<u64>().ok();
            }
            if name.eq_ignore_ascii_case("content-md5") {
                head.content_md5 = Some(value.to_string());
            }
        }
    }

    head
}
