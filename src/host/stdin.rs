//! Host events delivered as line-delimited JSON on stdin

use iced::futures::{SinkExt, Stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::protocol::HostEvent;

/// Stream of well-formed host events. Malformed lines are logged and skipped.
/// The stream stays pending once stdin closes.
pub fn events() -> impl Stream<Item = HostEvent> {
    iced::stream::channel(32, |mut output| async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match HostEvent::parse(&line) {
                    Ok(event) => {
                        if output.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("⚠️  {e}: {line}"),
                },
                Ok(None) => {
                    log::debug!("Host event stream closed");
                    break;
                }
                Err(e) => {
                    log::error!("Reading host events failed: {e}");
                    break;
                }
            }
        }

        std::future::pending::<()>().await;
    })
}
