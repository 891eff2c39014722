// src/protocol/framing.rs

//! Message framing for shot sockets.
//!
//! Clients either terminate every record with a newline and keep the
//! connection open, or send a single record without a newline and shut down
//! their write side. Both arrive here as a byte stream.

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

const READ_CHUNK: usize = 4096;
/// Longest run of bytes held without a newline. Anything longer is handed
/// on as one message so a misbehaving client cannot grow the buffer forever.
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

/// Incremental splitter turning raw socket bytes into JSON text messages.
#[derive(Debug, Default)]
pub struct JsonFramer {
    buffer: Vec<u8>,
}

fn frame_text(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl JsonFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Takes the next complete message out of the buffer, if there is one.
    pub fn next_message(&mut self) -> Option<String> {
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(message) = frame_text(&line) {
                return Some(message);
            }
        }

        if self.buffer.len() > MAX_FRAME_BYTES {
            let overflow = std::mem::take(&mut self.buffer);
            return frame_text(&overflow);
        }

        // No newline yet: a record that already parses as a whole object is
        // complete even if the client never sends one.
        let candidate = frame_text(&self.buffer)?;
        if !candidate.ends_with('}') {
            return None;
        }
        match serde_json::from_str::<Value>(&candidate) {
            Ok(Value::Object(_)) => {
                self.buffer.clear();
                Some(candidate)
            }
            _ => None,
        }
    }

    /// Drains whatever is left once the peer has closed its write side.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        frame_text(&rest)
    }
}

/// Reads from `reader` until one message is framed.
///
/// # Returns
/// * `Ok(Some(message))` - The next message
/// * `Ok(None)` - The peer closed the connection with nothing pending
/// * `Err(e)` - The read failed
pub async fn read_message<R>(reader: &mut R, framer: &mut JsonFramer) -> std::io::Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        if let Some(message) = framer.next_message() {
            return Ok(Some(message));
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(framer.finish());
        }
        framer.push(&chunk[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_newline_delimited_records() {
        let mut framer = JsonFramer::new();
        framer.push(b"{\"a\":1}\n\n{\"b\":2}\n{\"c\"");
        assert_eq!(framer.next_message().as_deref(), Some("{\"a\":1}"));
        assert_eq!(framer.next_message().as_deref(), Some("{\"b\":2}"));
        assert_eq!(framer.next_message(), None);
        framer.push(b":3}");
        assert_eq!(framer.next_message().as_deref(), Some("{\"c\":3}"));
        assert_eq!(framer.finish(), None);
    }

    #[test]
    fn complete_object_without_newline_is_a_message() {
        let mut framer = JsonFramer::new();
        framer.push(b"  {\"speed\": 70.0");
        assert_eq!(framer.next_message(), None);
        framer.push(b"}");
        assert_eq!(framer.next_message().as_deref(), Some("{\"speed\": 70.0}"));
    }

    #[test]
    fn bare_scalars_wait_for_a_terminator() {
        let mut framer = JsonFramer::new();
        framer.push(b"12");
        assert_eq!(framer.next_message(), None);
        assert_eq!(framer.finish().as_deref(), Some("12"));
    }

    #[test]
    fn invalid_lines_are_still_framed() {
        let mut framer = JsonFramer::new();
        framer.push(b"not json\n");
        assert_eq!(framer.next_message().as_deref(), Some("not json"));
    }

    #[test]
    fn oversized_unterminated_input_is_flushed() {
        let mut framer = JsonFramer::new();
        let mut payload = b"{\"pad\":\"".to_vec();
        payload.resize(MAX_FRAME_BYTES, b'x');
        framer.push(&payload);
        assert_eq!(framer.next_message(), None);

        framer.push(b"xx");
        let flushed = framer.next_message().unwrap();
        assert_eq!(flushed.len(), MAX_FRAME_BYTES + 2);
        assert_eq!(framer.finish(), None);

        framer.push(b"{\"after\":1}\n");
        assert_eq!(framer.next_message().as_deref(), Some("{\"after\":1}"));
    }

    #[tokio::test]
    async fn reads_until_eof() {
        let data: &[u8] = b"{\"x\":1}\n{\"y\":2";
        let mut reader = data;
        let mut framer = JsonFramer::new();
        assert_eq!(
            read_message(&mut reader, &mut framer).await.unwrap().as_deref(),
            Some("{\"x\":1}")
        );
        assert_eq!(
            read_message(&mut reader, &mut framer).await.unwrap().as_deref(),
            Some("{\"y\":2")
        );
        assert_eq!(read_message(&mut reader, &mut framer).await.unwrap(), None);
    }
}
