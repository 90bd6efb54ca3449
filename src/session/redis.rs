//! # Redis pub/sub sessions.
//!
//! ## Open sequence
//! ```text
//! timeout(connect_timeout) {
//!   multiplexed connection ─► PING
//!   pub/sub connection     ─► SUBSCRIBE channel
//! }
//! ```
//! The first `poll` after a successful open yields the channel confirmation;
//! afterwards the session reads the message stream. The server closing the
//! stream is reported as a fatal [`SessionError::Closed`].

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use redis::{ConnectionAddr, ConnectionInfo, Msg, RedisConnectionInfo, RedisError};
use tokio::time;

use super::{Connector, InboundEvent, Session};
use crate::config::Config;
use crate::error::SessionError;

type MessageStream = Pin<Box<dyn Stream<Item = Msg> + Send>>;

/// Opens Redis pub/sub sessions for one channel.
#[derive(Clone, Debug)]
pub struct RedisConnector {
    host: String,
    port: u16,
    channel: String,
    password: Option<String>,
    connect_timeout: Duration,
}

impl RedisConnector {
    pub fn new(cfg: &Config) -> Self {
        Self {
            host: cfg.host.clone(),
            port: cfg.port,
            channel: cfg.channel.clone(),
            password: cfg.credential().map(str::to_string),
            connect_timeout: cfg.connect_timeout,
        }
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: 0,
                password: self.password.clone(),
                ..RedisConnectionInfo::default()
            },
        }
    }

    async fn open_inner(&self) -> Result<RedisSession, RedisError> {
        let client = redis::Client::open(self.connection_info())?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        drop(conn);

        let mut pubsub = client.get_async_pubsub().await?;
        pubsub.subscribe(&self.channel).await?;

        Ok(RedisSession {
            stream: Some(Box::pin(pubsub.into_on_message())),
            pending_confirmation: Some(self.channel.clone()),
        })
    }
}

#[async_trait]
impl Connector for RedisConnector {
    async fn open(&self) -> Result<Box<dyn Session>, SessionError> {
        match time::timeout(self.connect_timeout, self.open_inner()).await {
            Ok(Ok(session)) => Ok(Box::new(session)),
            Ok(Err(e)) => Err(classify(&e)),
            Err(_elapsed) => Err(SessionError::ConnectTimeout {
                timeout: self.connect_timeout,
            }),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A subscribed Redis pub/sub connection.
pub struct RedisSession {
    stream: Option<MessageStream>,
    pending_confirmation: Option<String>,
}

#[async_trait]
impl Session for RedisSession {
    async fn poll(&mut self, timeout: Duration) -> InboundEvent {
        let Some(stream) = self.stream.as_mut() else {
            return InboundEvent::Fatal(SessionError::Closed);
        };
        if let Some(channel) = self.pending_confirmation.take() {
            return InboundEvent::Confirmation { channel };
        }

        match time::timeout(timeout, stream.next()).await {
            Err(_elapsed) => InboundEvent::Timeout,
            Ok(Some(msg)) => InboundEvent::Message(Bytes::copy_from_slice(msg.get_payload_bytes())),
            Ok(None) => {
                self.stream = None;
                InboundEvent::Fatal(SessionError::Closed)
            }
        }
    }

    async fn close(&mut self) {
        self.pending_confirmation = None;
        self.stream = None;
    }
}

/// Maps a Redis error raised while opening onto the session taxonomy.
///
/// Broken, refused or timed-out connections are transport errors, everything
/// else (auth, protocol) is a connect failure.
pub(crate) fn classify(err: &RedisError) -> SessionError {
    if err.is_timeout()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_io_error()
    {
        SessionError::Transport {
            reason: err.to_string(),
        }
    } else {
        SessionError::Connect {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn first_poll_confirms_then_stream_end_is_fatal() {
        let mut session = RedisSession {
            stream: Some(Box::pin(stream::empty::<Msg>())),
            pending_confirmation: Some("log_channel".into()),
        };

        assert_eq!(
            session.poll(Duration::from_secs(1)).await,
            InboundEvent::Confirmation {
                channel: "log_channel".into()
            }
        );
        assert_eq!(
            session.poll(Duration::from_secs(1)).await,
            InboundEvent::Fatal(SessionError::Closed)
        );
        assert_eq!(
            session.poll(Duration::from_secs(1)).await,
            InboundEvent::Fatal(SessionError::Closed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn idle_stream_times_out() {
        let mut session = RedisSession {
            stream: Some(Box::pin(stream::pending::<Msg>())),
            pending_confirmation: None,
        };
        assert_eq!(session.poll(Duration::from_secs(1)).await, InboundEvent::Timeout);

        session.close().await;
        session.close().await;
        assert_eq!(
            session.poll(Duration::from_secs(1)).await,
            InboundEvent::Fatal(SessionError::Closed)
        );
    }

    #[tokio::test]
    async fn unreachable_server_fails_within_connect_timeout() {
        let cfg = Config {
            host: "127.0.0.1".into(),
            port: 1,
            connect_timeout: Duration::from_secs(10),
            ..Config::default()
        };
        let connector = RedisConnector::new(&cfg);
        assert_eq!(connector.endpoint(), "127.0.0.1:1");
        assert!(connector.open().await.is_err());
    }

    #[test]
    fn io_errors_are_transport_errors() {
        let err = RedisError::from(std::io::Error::from(std::io::ErrorKind::ConnectionReset));
        assert!(matches!(classify(&err), SessionError::Transport { .. }));

        let err = RedisError::from(std::io::Error::from(std::io::ErrorKind::TimedOut));
        assert!(matches!(classify(&err), SessionError::Transport { .. }));

        let err = RedisError::from((redis::ErrorKind::AuthenticationFailed, "WRONGPASS"));
        assert!(matches!(classify(&err), SessionError::Connect { .. }));
    }
}
