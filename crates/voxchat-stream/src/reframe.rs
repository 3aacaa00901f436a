use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::pin::Pin;

use crate::buffer::TailBuffer;
use crate::envelope::Envelope;

/// Shape one upstream line into an SSE frame.
///
/// Empty lines are dropped. A line that already carries the `data:` prefix is
/// forwarded unchanged (the upstream may itself speak SSE); anything else
/// gets the prefix added. Every frame is terminated by a blank line.
pub fn frame_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("data:") {
        Some(format!("{}\n\n", trimmed))
    } else {
        Some(format!("data: {}\n\n", trimmed))
    }
}

/// Render a failure envelope as a single SSE frame, for errors that occur
/// after response headers have already been sent.
pub fn error_frame(message: &str) -> String {
    let payload = serde_json::to_string(&Envelope::error(message))
        .unwrap_or_else(|_| r#"{"code":-1,"message":"Stream processing error","data":null}"#.to_string());
    format!("data: {}\n\n", payload)
}

/// Re-frame an arbitrarily-chunked upstream body into well-formed SSE.
///
/// Chunks may split a logical line at any byte offset and may contain zero,
/// one, or many complete lines; only the unterminated tail is buffered
/// between reads, so each line is forwarded as soon as it is complete and
/// memory stays bounded. Frames come out strictly in upstream arrival order.
///
/// On end-of-stream a dangling tail with no final newline is still flushed
/// as one last frame. A mid-stream read error yields exactly one synthetic
/// `{"code":-1,...}` frame and then closes the output; retrying is the
/// caller's decision.
///
/// The output is a pull stream: a frame is only produced when the consumer
/// polls, so downstream backpressure reaches the upstream read untouched,
/// and dropping the output drops `upstream` with it, releasing the
/// connection without a further read.
pub fn reframe<S, E>(upstream: S) -> Pin<Box<dyn Stream<Item = String> + Send>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut chunks = Box::pin(upstream);
        let mut tail = TailBuffer::new();

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => {
                    tail.push(&bytes);
                    while let Some(line) = tail.next_line() {
                        if let Some(frame) = frame_line(&line) {
                            yield frame;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "upstream read failed mid-stream");
                    yield error_frame("Stream processing error");
                    return;
                }
            }
        }

        // The last line may never get its newline.
        if let Some(rest) = tail.take_remainder() {
            if let Some(frame) = frame_line(&rest) {
                yield frame;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_line_prefixes_bare_payload() {
        assert_eq!(frame_line("{\"a\":1}").unwrap(), "data: {\"a\":1}\n\n");
    }

    #[test]
    fn test_frame_line_keeps_existing_prefix() {
        assert_eq!(frame_line("data: {\"a\":1}").unwrap(), "data: {\"a\":1}\n\n");
        // No separating space is also a valid prefix.
        assert_eq!(frame_line("data:{\"a\":1}").unwrap(), "data:{\"a\":1}\n\n");
    }

    #[test]
    fn test_frame_line_drops_blank() {
        assert!(frame_line("").is_none());
        assert!(frame_line("   \r").is_none());
    }

    #[test]
    fn test_error_frame_shape() {
        let frame = error_frame("Stream processing error");
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("\n\n"));
        assert!(frame.contains("\"code\":-1"));
        assert!(frame.contains("\"data\":null"));
    }
}
