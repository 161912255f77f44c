//! Newline-delimited JSON transport for the bridge

use super::{BridgeError, HostBridge, HostEnvironment, HostMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

async fn write_message<W>(writer: &mut W, message: &HostMessage) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = message.to_json()?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one webview message per line until EOF, writing host replies as JSON lines.
///
/// Malformed lines are reported back and skipped; bytes that are not UTF-8 are
/// replaced before decoding. Only I/O failures end the loop.
pub async fn serve<R, W, H>(
    mut reader: R,
    mut writer: W,
    bridge: &mut HostBridge<H>,
    mut outbound: mpsc::UnboundedReceiver<HostMessage>,
) -> Result<(), BridgeError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    H: HostEnvironment,
{
    let mut buf = Vec::new();
    let mut handled = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        // Invalid UTF-8 is replaced rather than ending the session
        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }
        // Decode failures were already posted back to the webview
        let _ = bridge.handle_json(&line).await;
        handled += 1;

        while let Ok(message) = outbound.try_recv() {
            write_message(&mut writer, &message).await?;
        }
    }

    debug!(handled, "bridge input closed");
    Ok(())
}

/// Serve the bridge over this process's stdin/stdout
pub async fn serve_stdio<H: HostEnvironment>(
    mut bridge: HostBridge<H>,
    outbound: mpsc::UnboundedReceiver<HostMessage>,
) -> Result<(), BridgeError> {
    info!("bridge listening on stdio");
    serve(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &mut bridge,
        outbound,
    )
    .await
}
