use std::sync::Arc;

use crate::{
    config::Config,
    error::ConfigError,
    events::Bus,
    processor::{LogProcessor, ProcessorRef},
    session::{Connector, RedisConnector},
    subscribers::{LogWriter, Subscribe, SubscriberSet},
    trace::{HttpReporter, SpanReporter, TraceEmitter},
};

use super::{consumer::Consumer, dispatch::Dispatcher};

/// Builder for a [`Consumer`].
///
/// Everything except the configuration has a default:
/// - connector: [`RedisConnector`] for the configured host and channel;
/// - processor: [`LogProcessor`];
/// - span reporter: [`HttpReporter`] posting to the configured collector;
/// - subscribers: a single [`LogWriter`].
pub struct ConsumerBuilder {
    cfg: Config,
    connector: Option<Arc<dyn Connector>>,
    processor: Option<ProcessorRef>,
    reporter: Option<Arc<dyn SpanReporter>>,
    subscribers: Option<Vec<Arc<dyn Subscribe>>>,
}

impl ConsumerBuilder {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            connector: None,
            processor: None,
            reporter: None,
            subscribers: None,
        }
    }

    /// Replaces the transport.
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn with_processor(mut self, processor: ProcessorRef) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Replaces how spans are delivered.
    ///
    /// Spans are only produced when a collector URL is configured; the
    /// reporter decides where they actually go.
    pub fn with_reporter(mut self, reporter: Arc<dyn SpanReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Sets event subscribers, replacing the default [`LogWriter`].
    ///
    /// An empty list silences lifecycle logging.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = Some(subscribers);
        self
    }

    /// Validates the configuration and assembles the consumer.
    ///
    /// # Errors
    /// Any [`ConfigError`] from [`Config::validate`], or
    /// [`ConfigError::HttpClient`] if the collector client cannot be built.
    pub fn build(self) -> Result<Consumer, ConfigError> {
        self.cfg.validate()?;

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(
            self.subscribers
                .unwrap_or_else(|| vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>]),
        );

        let emitter = match self.cfg.collector() {
            None => None,
            Some(url) => {
                let reporter: Arc<dyn SpanReporter> = match self.reporter {
                    Some(r) => r,
                    None => Arc::new(
                        HttpReporter::new(url, self.cfg.report_timeout).map_err(|e| {
                            ConfigError::HttpClient {
                                reason: e.to_string(),
                            }
                        })?,
                    ),
                };
                Some(TraceEmitter::new(reporter, self.cfg.report_timeout))
            }
        };

        let processor: ProcessorRef = match self.processor {
            Some(p) => p,
            None => Arc::new(LogProcessor::default()),
        };
        let connector: Arc<dyn Connector> = match self.connector {
            Some(c) => c,
            None => Arc::new(RedisConnector::new(&self.cfg)),
        };

        let dispatcher = Dispatcher::new(processor, emitter, bus.clone());
        Ok(Consumer::new_internal(self.cfg, connector, dispatcher, bus, subs))
    }
}
