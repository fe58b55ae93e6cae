//! STDIO Transport
//!
//! Line-delimited JSON-RPC over standard input and output. Each line read is
//! one message; each response is written as one line and flushed. Logging goes
//! to stderr so stdout carries protocol traffic only.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::errors::{Error, error_codes};
use crate::messages::{Message, Response, error_response};
use crate::server::Dispatcher;

/// Serve requests from process stdin until it closes
pub async fn run(dispatcher: &Dispatcher) -> Result<(), Error> {
    tracing::info!("STDIO transport started");
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(dispatcher, reader, writer).await?;
    tracing::info!("STDIO transport closed");
    Ok(())
}

/// Serve line-delimited messages from `reader`, answering on `writer`
pub async fn serve<R, W>(dispatcher: &Dispatcher, reader: R, mut writer: W) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Message>(line) {
            Ok(message) => dispatcher.handle_message(message).await,
            Err(e) => {
                tracing::warn!("Failed to parse message: {}", e);
                Some(error_response(None, error_codes::PARSE_ERROR, &format!("Parse error: {}", e), None))
            }
        };

        if let Some(response) = response {
            write_response(&mut writer, &response).await?;
        }
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<(), Error> {
    let mut payload = serde_json::to_vec(response)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockTravelService;
    use crate::tools::ToolRegistry;
    use serde_json::Value;
    use std::sync::Arc;

    fn dispatcher() -> Dispatcher {
        let registry = ToolRegistry::with_travel_tools(Arc::new(MockTravelService::new())).unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    async fn exchange(input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(&dispatcher(), input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );
        let responses = exchange(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 14);
    }

    #[tokio::test]
    async fn test_garbage_line_gets_parse_error() {
        let responses = exchange("not json\n").await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["error"]["code"], error_codes::PARSE_ERROR);
    }
}
