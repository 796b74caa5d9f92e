//! network-estop daemon
//!
//! Builds every configured component through the model registry and runs
//! until interrupted.
//!
//! Usage:
//!   network-estop [--config <path>] [--once] [--verbose]
//!
//! Stop targets are bound to dry-run actuators that only log the stop
//! request; embedding hosts bind real devices instead.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use network_estop::device::Extra;
use network_estop::logging::LoggingSystem;
use network_estop::{
    Actuator, AppConfig, Dependencies, Dependency, DnsProbe, ModelRegistry, Sensor, WatchdogConfig,
    DNS_MODEL,
};

/// Command line arguments
struct Args {
    /// Configuration file
    config: Option<PathBuf>,
    /// Probe each component once and print the result
    once: bool,
    /// Enable verbose logging
    verbose: bool,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = std::env::args().skip(1);
        let mut config = None;
        let mut once = false;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = Some(args.next().map(PathBuf::from).ok_or("--config needs a path")?);
                }
                "--once" => {
                    once = true;
                }
                "--verbose" | "-v" => {
                    verbose = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("Unknown argument: {}", arg));
                }
            }
        }

        Ok(Self {
            config,
            once,
            verbose,
        })
    }
}

fn print_help() {
    println!(
        r#"network-estop - DNS reachability watchdog

USAGE:
    network-estop [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Configuration file (default: {})
        --once             Probe each DNS component once, print JSON and exit
    -v, --verbose          Enable debug logging
    -h, --help             Print this help message

DESCRIPTION:
    Every DNS component resolves its lookup name against its server on a
    fixed interval. When a probe fails, each stop target is stopped and
    navigation services are switched to manual mode.
"#,
        AppConfig::default_path().display()
    );
}

/// Actuator stand-in that records stop requests in the log
struct DryRunActuator {
    name: String,
}

#[async_trait]
impl Actuator for DryRunActuator {
    async fn stop(&self, _extra: Option<&Extra>) -> anyhow::Result<()> {
        tracing::warn!(device = %self.name, "stop requested (dry run)");
        Ok(())
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let path = args.config.unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&path)
        .await
        .with_context(|| format!("loading {}", path.display()))?;

    let logging = if args.verbose {
        config.logging.clone().verbose()
    } else {
        config.logging.clone()
    };
    let logging = LoggingSystem::init(&logging)?;
    if let Some(dir) = logging.directory() {
        tracing::info!(directory = %dir.display(), "writing log files");
    }

    if args.once {
        return probe_once(&config).await;
    }

    let registry = ModelRegistry::with_builtin();
    let mut sensors: Vec<Arc<dyn Sensor>> = Vec::new();

    for component in &config.components {
        let mut dependencies = Dependencies::new();
        for name in registry.required_dependencies(component)? {
            dependencies.insert(name.clone(), Dependency::actuator(DryRunActuator { name }));
        }
        sensors.push(registry.construct(component, dependencies)?);
    }

    if sensors.is_empty() {
        anyhow::bail!("no components configured in {}", path.display());
    }

    tracing::info!(components = sensors.len(), "running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    for sensor in &sensors {
        let readings = sensor.readings(None).await?;
        tracing::info!(component = sensor.name(), readings = %serde_json::Value::Object(readings), "final readings");
        sensor.close().await?;
    }

    Ok(())
}

async fn probe_once(config: &AppConfig) -> anyhow::Result<()> {
    let mut failures = 0;

    for component in config.components.iter().filter(|c| c.model == DNS_MODEL) {
        let attributes = match &component.attributes {
            serde_json::Value::Null => json!({}),
            other => other.clone(),
        };
        let attributes: WatchdogConfig = serde_json::from_value(attributes)
            .with_context(|| format!("attributes of {}", component.name))?;
        attributes.validate(&component.name)?;

        let probe = DnsProbe::new(attributes.timeout());
        let started = Instant::now();
        let result = probe.probe(&attributes.server, &attributes.lookup).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let report = match result {
            Ok(reply) => json!({
                "component": component.name,
                "ok": true,
                "latency_ms": latency_ms,
                "rcode": reply.response_code.to_string(),
                "answers": reply.answers,
            }),
            Err(e) => {
                failures += 1;
                json!({
                    "component": component.name,
                    "ok": false,
                    "latency_ms": latency_ms,
                    "error": e.to_string(),
                })
            }
        };
        println!("{}", report);
    }

    if failures > 0 {
        anyhow::bail!("{} probe(s) failed", failures);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args).await {
        eprintln!("network-estop failed: {:#}", e);
        std::process::exit(1);
    }
}
