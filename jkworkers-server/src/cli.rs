use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use jkworkers_types::models::config::{
    DEFAULT_CONSUL_ADDRESS, DEFAULT_DOCKER_ADDRESS, DEFAULT_MEMBERSHIP_TAG,
    DEFAULT_RECONFIGURE_COMMAND, DEFAULT_START_GRACE_MS, DEFAULT_WORKERS_FILE,
};
use jkworkers_types::{ConfigError, DockerConfig, ReloadPolicy, SupervisorConfig};

#[derive(Parser, Debug)]
#[command(
    name = "jkworkers",
    about = "Keeps mod_jk workers.properties in sync with Consul, driven by Docker events",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, env = "DOCKER_HOST", default_value = DEFAULT_DOCKER_ADDRESS, global = true)]
    pub docker_host: String,

    #[arg(
        long,
        env = "DOCKER_TLS_VERIFY",
        action = ArgAction::Set,
        value_parser = FalseyValueParser::new(),
        default_value = "false",
        global = true,
        help = "Talk to the Docker engine over TLS with a client certificate"
    )]
    pub tls_verify: bool,

    #[arg(
        long,
        env = "DOCKER_CERT_PATH",
        global = true,
        help = "Directory holding cert.pem, key.pem and ca.pem"
    )]
    pub cert_path: Option<PathBuf>,

    #[arg(long, env = "CONSUL_HTTP_ADDR", default_value = DEFAULT_CONSUL_ADDRESS, global = true)]
    pub consul: String,

    #[arg(long, env = "JK_WORKERS_FILE", default_value = DEFAULT_WORKERS_FILE, global = true)]
    pub workers_file: PathBuf,

    #[arg(
        long,
        env = "JK_RECONFIGURE_COMMAND",
        default_value = DEFAULT_RECONFIGURE_COMMAND,
        global = true
    )]
    pub reconfigure_command: PathBuf,

    #[arg(
        long,
        env = "JK_MEMBERSHIP_TAG",
        default_value = DEFAULT_MEMBERSHIP_TAG,
        global = true,
        help = "Only services carrying this tag are rendered"
    )]
    pub tag: String,

    #[arg(
        long,
        env = "JK_START_GRACE_MS",
        default_value_t = DEFAULT_START_GRACE_MS,
        global = true,
        help = "Delay after a container start before reconciling"
    )]
    pub start_grace_ms: u64,

    #[arg(long, global = true, help = "Do not reload the proxy after the startup pass")]
    pub no_startup_reload: bool,

    #[arg(long, global = true, help = "Reload the proxy after a container dies")]
    pub reload_on_die: bool,

    #[arg(long, global = true, help = "Reload the proxy after a container is stopped or killed")]
    pub reload_on_stop: bool,

    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Watch Docker events and keep the workers file current (default)")]
    Watch,

    #[command(about = "Fetch the registry once and print the rendered workers file")]
    Render {
        #[arg(short, long, help = "Write atomically to this path instead of stdout")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Assemble the supervisor configuration from flags and environment.
    pub fn supervisor_config(&self) -> Result<SupervisorConfig, ConfigError> {
        let tls_cert_path = match (self.tls_verify, &self.cert_path) {
            (true, Some(path)) => Some(path.clone()),
            (true, None) => {
                return Err(ConfigError::invalid(
                    "docker.tls_cert_path",
                    "TLS verification requested without a certificate directory",
                ))
            }
            (false, _) => None,
        };

        let config = SupervisorConfig {
            docker: DockerConfig { address: self.docker_host.clone(), tls_cert_path },
            consul_address: self.consul.clone(),
            workers_file: self.workers_file.clone(),
            reconfigure_command: self.reconfigure_command.clone(),
            membership_tag: self.tag.clone(),
            start_grace_ms: self.start_grace_ms,
            reload_policy: ReloadPolicy {
                on_startup: !self.no_startup_reload,
                on_start: true,
                on_die: self.reload_on_die,
                on_stop: self.reload_on_stop,
            },
        };
        config.validate()?;
        Ok(config)
    }
}
