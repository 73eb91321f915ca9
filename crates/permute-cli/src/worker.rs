//! JSON-lines producer over a byte stream.
//!
//! Reads one [`Request`] per line and writes one [`Response`] per line, in
//! order, until the input ends or `shutdown` is cancelled. A line that does not
//! decode is answered with an `ERROR` response and the worker keeps serving.

use permute_bridge::{MessageKind, Producer, Request, Response, decode, encode};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Serves `producer` over `reader`/`writer`.
///
/// Returns the number of requests answered.
///
/// # Errors
///
/// Returns an error if reading from `reader` or writing to `writer` fails.
pub async fn serve<R, W>(
    reader: R,
    mut writer: W,
    mut producer: Producer,
    shutdown: CancellationToken,
) -> anyhow::Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut answered = 0;

    loop {
        let line = tokio::select! {
            biased;
            () = shutdown.cancelled() => {
                tracing::info!("Worker received shutdown signal");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            tracing::debug!("Worker input closed");
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match decode::<Request>(line) {
            Ok(request) => producer.handle(request),
            Err(e) => {
                tracing::warn!("Worker received malformed request: {e}");
                Response::rejected(MessageKind::Error, 0, e.to_string())
            }
        };

        let mut encoded = encode(&response)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        answered += 1;
    }

    tracing::info!(answered, "Worker stopped");
    Ok(answered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    async fn exchange(input: &str, batch_size: usize) -> Vec<Value> {
        let mut output = Vec::new();
        serve(
            input.as_bytes(),
            &mut output,
            Producer::new(batch_size),
            CancellationToken::new(),
        )
        .await
        .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn answers_each_request_in_order() {
        let input = concat!(
            r#"{"type":"NEXT"}"#,
            "\n",
            r#"{"type":"INIT","inputs":["a","b","c"]}"#,
            "\n\n",
            r#"{"type":"NEXT"}"#,
            "\n",
            r#"{"type":"NEXT"}"#,
            "\n",
            r#"{"type":"RESET"}"#,
            "\n",
        );
        let responses = exchange(input, 4).await;
        assert_eq!(responses.len(), 5);
        assert_eq!(responses[0]["type"], "NEXT");
        assert_eq!(responses[0]["ok"], false);
        assert_eq!(responses[1], json!({ "type": "INIT", "ok": true, "generation": 0 }));
        assert_eq!(
            responses[2]["results"],
            json!({ "done": false, "values": ["abc", "acb", "bac", "bca"] })
        );
        assert_eq!(
            responses[3]["results"],
            json!({ "done": true, "values": ["cab", "cba"] })
        );
        assert_eq!(responses[4], json!({ "type": "RESET", "ok": true, "generation": 0 }));
    }

    #[tokio::test]
    async fn malformed_lines_get_error_responses() {
        let input = "garbage\n{\"type\":\"INIT\",\"inputs\":[]}\n";
        let responses = exchange(input, 200).await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["type"], "ERROR");
        assert_eq!(responses[0]["ok"], false);
        assert_eq!(responses[1]["type"], "INIT");
        assert_eq!(responses[1]["ok"], false);
        assert!(responses[1]["error"].is_string());
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let mut output = Vec::new();
        let answered = serve(
            "{\"type\":\"NEXT\"}\n".as_bytes(),
            &mut output,
            Producer::new(1),
            token,
        )
        .await
        .unwrap();
        assert_eq!(answered, 0);
        assert!(output.is_empty());
    }
}
