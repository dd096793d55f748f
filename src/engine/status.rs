//! Engine status reports for a presentation layer.

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

/// Connection and enablement snapshot.
///
/// Serializes as `{"connected":true,"enabled":true,"activeIndex":0,"timestamp":...}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub connected: bool,
    pub enabled: bool,
    /// Slot the frame came from, `None` while idle
    pub active_index: Option<u8>,
    /// Unix milliseconds
    pub timestamp: i64,
}

/// Receives throttled status reports.
pub trait StatusSink {
    fn publish(&mut self, status: Status);
}

/// Writes each status to the debug log.
#[derive(Debug, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn publish(&mut self, status: Status) {
        match serde_json::to_string(&status) {
            Ok(json) => debug!("Status: {}", json),
            Err(e) => debug!("Status could not be encoded: {}", e),
        }
    }
}

/// Keeps the latest status for any number of subscribers.
impl StatusSink for watch::Sender<Status> {
    fn publish(&mut self, status: Status) {
        self.send_replace(status);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_json_shape() {
        let status = Status {
            connected: true,
            enabled: false,
            active_index: Some(2),
            timestamp: 1_700_000_000_000,
        };
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({
                "connected": true,
                "enabled": false,
                "activeIndex": 2,
                "timestamp": 1_700_000_000_000_i64,
            })
        );
    }

    #[test]
    fn test_idle_status_has_null_index() {
        let json = serde_json::to_value(Status::default()).unwrap();
        assert!(json["activeIndex"].is_null());
    }

    #[test]
    fn test_watch_sink_keeps_latest() {
        let (mut tx, rx) = watch::channel(Status::default());
        tx.publish(Status {
            connected: true,
            ..Status::default()
        });
        tx.publish(Status {
            connected: true,
            active_index: Some(1),
            ..Status::default()
        });

        assert_eq!(rx.borrow().active_index, Some(1));
    }

    #[test]
    fn test_watch_sink_without_receivers() {
        let (mut tx, rx) = watch::channel(Status::default());
        drop(rx);
        tx.publish(Status {
            enabled: true,
            ..Status::default()
        });
        assert!(tx.borrow().enabled);
    }
}
