use std::cmp::max;

use futures::StreamExt;
use tokio::{
    runtime::{self, Runtime},
    task::JoinSet,
};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::{
    adapters::{AdapterRegistry, StreamError},
    cli::{LogFormat, Opts},
    config::Config,
    fanout::Fanout,
    internal_events::{
        AdapterBuildFailed, AdapterCrashed, AdapterStarted, ConfigLoadFailed, ForwarderStarted,
        ForwarderStopped,
    },
    sinks, sources, trace,
    transports::TransportRegistry,
};

/// Running adapters, each yielding its route id and how its stream ended.
pub type AdapterTasks = JoinSet<(String, Result<(), StreamError>)>;

/// The adapters this binary ships with.
pub fn adapter_registry() -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    sinks::fluentd::register(&mut registry);
    registry
}

pub struct Application {
    pub config: Config,
    pub runtime: Runtime,
}

impl Application {
    pub fn prepare() -> Result<Self, exitcode::ExitCode> {
        let opts = Opts::get_matches();
        Self::prepare_from_opts(opts)
    }

    pub fn prepare_from_opts(opts: Opts) -> Result<Self, exitcode::ExitCode> {
        let level = std::env::var("LOG").unwrap_or_else(|_| match opts.log_level() {
            "off" => "off".to_owned(),
            level => format!("fluentd_forwarder={level}"),
        });

        let json = match opts.log_format {
            LogFormat::Text => false,
            LogFormat::Json => true,
        };
        trace::init(opts.color.use_color(), json, &level);

        if let Some(threads) = opts.threads
            && threads < 1
        {
            error!("The `threads` argument must be greater or equal to 1.");
            return Err(exitcode::CONFIG);
        }

        let config = Config::build(opts.config.as_deref(), &opts.routes).map_err(|error| {
            emit!(ConfigLoadFailed { error: &error });
            exitcode::CONFIG
        })?;

        let threads = opts.threads.unwrap_or_else(|| {
            max(
                1,
                std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
            )
        });
        let runtime = runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(threads)
            .thread_name("forwarder-worker")
            .build()
            .map_err(|error| {
                error!(message = "Unable to create async runtime.", %error);
                exitcode::OSERR
            })?;

        Ok(Self { config, runtime })
    }

    /// Runs until stdin is exhausted or an adapter fails, returning the process exit code.
    pub fn run(self) -> exitcode::ExitCode {
        let Self { config, runtime } = self;

        runtime.block_on(async move {
            let (fanout, tasks) = match start_adapters(
                &config,
                &adapter_registry(),
                &TransportRegistry::with_defaults(),
            )
            .await
            {
                Ok(started) => started,
                Err(code) => return code,
            };

            emit!(ForwarderStarted {
                routes: config.routes.len(),
            });

            if let Err(error) = sources::stdin::stdin_source(fanout) {
                error!(message = "Unable to start reading input.", %error);
                return exitcode::OSERR;
            }

            supervise(tasks).await
        })
    }
}

/// Builds one adapter per route and starts it on its own task, fed by a fresh fanout output.
///
/// Fails with `exitcode::UNAVAILABLE` as soon as one adapter cannot be built.
pub async fn start_adapters(
    config: &Config,
    adapters: &AdapterRegistry,
    transports: &TransportRegistry,
) -> Result<(Fanout, AdapterTasks), exitcode::ExitCode> {
    let mut fanout = Fanout::new();
    let mut tasks = JoinSet::new();

    for route in &config.routes {
        let adapter = adapters
            .build(route, transports)
            .await
            .map_err(|error| {
                emit!(AdapterBuildFailed {
                    route: &route.id,
                    error: &error,
                });
                exitcode::UNAVAILABLE
            })?;

        emit!(AdapterStarted {
            route: &route.id,
            adapter: &route.adapter,
            address: &route.address,
        });

        let input = UnboundedReceiverStream::new(fanout.add(route.id.clone()));
        let id = route.id.clone();
        tasks.spawn(async move { (id, adapter.stream(input.boxed()).await) });
    }

    Ok((fanout, tasks))
}

/// Waits for every adapter to finish. The first fatal adapter error ends the wait with
/// `exitcode::IOERR`, leaving the caller to terminate the process.
pub async fn supervise(mut tasks: AdapterTasks) -> exitcode::ExitCode {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => {}
            Ok((route, Err(error))) => {
                emit!(AdapterCrashed {
                    route: &route,
                    error: &error,
                });
                return exitcode::IOERR;
            }
            Err(error) => {
                error!(message = "Adapter task failed.", %error);
                return exitcode::SOFTWARE;
            }
        }
    }

    emit!(ForwarderStopped);
    exitcode::OK
}
