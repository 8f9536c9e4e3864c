use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{dispatch, Request, Response};
use crate::commands::CommandError;
use crate::core_state::CoreState;

/// Serve requests from `reader` until end of input.
///
/// Requests are handled one at a time, so responses come back in request
/// order. Store work runs on the blocking pool.
pub async fn serve<R, W>(state: Arc<CoreState>, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0u64;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&state, &line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        handled += 1;
    }
    tracing::info!(handled, "IPC input closed");
    Ok(())
}

async fn handle_line(state: &Arc<CoreState>, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed IPC request");
            return Response::failure(None, CommandError::bad_request(format!("Malformed request: {e}")));
        }
    };

    let Request { id, channel, payload } = request;
    tracing::debug!(id, channel = %channel, "IPC request");

    let state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || dispatch(&state, &channel, payload)).await;
    match result {
        Ok(Ok(data)) => Response::success(id, data),
        Ok(Err(err)) => Response::failure(Some(id), err),
        Err(join_err) => {
            tracing::error!(id, error = %join_err, "IPC handler task failed");
            Response::failure(Some(id), CommandError::internal("Request handler failed"))
        }
    }
}
