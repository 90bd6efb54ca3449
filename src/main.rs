use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log_message_processor::{Config, Consumer, RetryPolicy, RetryReset, RuntimeError, logging};
use tracing::{error, info, warn};

const EXIT_CONFIG: u8 = 1;
const EXIT_EXHAUSTED: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "log-message-processor", version)]
#[command(about = "Consumes a Redis pub/sub channel and processes each message")]
struct Args {
    /// Redis host
    #[arg(long, env = "REDIS_HOST")]
    redis_host: String,

    /// Redis port
    #[arg(long, env = "REDIS_PORT")]
    redis_port: u16,

    /// Channel to subscribe to
    #[arg(long, env = "REDIS_CHANNEL")]
    redis_channel: String,

    /// Redis credential (required for managed Azure caches; empty means none)
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    redis_password: Option<String>,

    /// Zipkin collector URL; tracing is disabled when unset
    #[arg(long, env = "ZIPKIN_URL")]
    zipkin_url: Option<String>,

    /// Failures tolerated before giving up
    #[arg(long, env = "MAX_RETRIES", default_value_t = 5)]
    max_retries: u32,

    /// Delay after the first failure, in seconds
    #[arg(long, env = "RETRY_DELAY_SECS", default_value_t = 5)]
    retry_delay_secs: u64,

    /// Upper bound on the reconnect delay, in seconds
    #[arg(long, env = "RETRY_MAX_DELAY_SECS", default_value_t = 60)]
    retry_max_delay_secs: u64,

    /// `never` or `on-listening`
    #[arg(long, env = "RETRY_RESET", default_value = "never")]
    retry_reset: RetryReset,

    /// Exit with status 3 instead of 0 when retries run out
    #[arg(long, env = "EXIT_NONZERO_ON_EXHAUSTION")]
    exit_nonzero_on_exhaustion: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mut retry = RetryPolicy::new(
            self.max_retries,
            Duration::from_secs(self.retry_delay_secs),
            Duration::from_secs(self.retry_max_delay_secs),
        );
        retry.reset = self.retry_reset;

        Config {
            host: self.redis_host.clone(),
            port: self.redis_port,
            channel: self.redis_channel.clone(),
            password: self.redis_password.clone(),
            collector_url: self.zipkin_url.clone(),
            retry,
            ..Config::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let consumer = match prepare(&args) {
        Ok(c) => c,
        Err(code) => return ExitCode::from(code),
    };

    let res = consumer.run_until_signal().await;
    ExitCode::from(exit_status(&res, args.exit_nonzero_on_exhaustion))
}

/// Builds the consumer, or the exit status for a bad configuration.
fn prepare(args: &Args) -> Result<Consumer, u8> {
    let cfg = args.config();
    info!(
        endpoint = %cfg.endpoint(),
        channel = %cfg.channel,
        tracing = cfg.collector().is_some(),
        max_retries = cfg.retry.max_retries,
        reset = %cfg.retry.reset,
        "starting consumer"
    );

    Consumer::builder(cfg).build().map_err(|e| {
        error!(error = %e, label = e.as_label(), "invalid configuration");
        EXIT_CONFIG
    })
}

fn exit_status(res: &Result<(), RuntimeError>, nonzero_on_exhaustion: bool) -> u8 {
    match res {
        Ok(()) => {
            info!("shutdown complete");
            0
        }
        Err(e) if nonzero_on_exhaustion => {
            error!(error = %e, label = e.as_label(), "giving up");
            EXIT_EXHAUSTED
        }
        Err(e) => {
            warn!(error = %e, label = e.as_label(), "giving up");
            0
        }
    }
}
