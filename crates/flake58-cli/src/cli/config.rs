use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use flake58::{DEFAULT_START, Encoder, Settings, machine::OutboundIp};
use std::fmt;
use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Command-line and environment configuration for the `flake58` binary.
///
/// IDs minted with different start epochs or alphabets are not comparable, so
/// every service sharing an ID namespace should pin the same values.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flake58",
    version,
    about = "Mint and decompose base-58 Sonyflake IDs"
)]
pub struct CliArgs {
    /// Start epoch (tick zero) in milliseconds since the Unix epoch.
    ///
    /// Environment variable: `FLAKE58_START_MS`
    #[arg(long, env = "FLAKE58_START_MS", global = true, default_value_t = DEFAULT_START.as_millis() as u64)]
    pub start_ms: u64,

    /// Fixed machine ID. When absent, the low 16 bits of the outbound IP
    /// address are used.
    ///
    /// Environment variable: `FLAKE58_MACHINE_ID`
    #[arg(long, env = "FLAKE58_MACHINE_ID", global = true)]
    pub machine_id: Option<u16>,

    /// Address used for the outbound IP route lookup. No traffic is sent.
    ///
    /// Environment variable: `FLAKE58_PROBE_ADDR`
    #[arg(long, env = "FLAKE58_PROBE_ADDR", global = true, default_value_t = OutboundIp::DEFAULT_PROBE)]
    pub probe_addr: SocketAddr,

    /// Custom 58-symbol alphabet. Position 0 is the zero digit.
    ///
    /// Environment variable: `FLAKE58_ALPHABET`
    #[arg(long, env = "FLAKE58_ALPHABET", global = true)]
    pub alphabet: Option<String>,

    /// Print JSON instead of plain text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Joins a `--prefix` tag to an ID. Never part of an alphabet.
pub const PREFIX_SEPARATOR: char = '_';

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mint new IDs, one per line.
    Mint {
        /// How many IDs to mint.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Resource-kind tag joined to each ID with an underscore, e.g. `dn`
        /// for `dn_2VKmG7xYq`.
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Break IDs into time, sequence and machine ID. Prefixed IDs are
    /// accepted.
    Decompose {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineIdConfig {
    Fixed(u16),
    Probe(SocketAddr),
}

impl fmt::Display for MachineIdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(id) => write!(f, "{id}"),
            Self::Probe(addr) => write!(f, "<outbound ip via {addr}>"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub start_time: Duration,
    pub machine_id: MachineIdConfig,
    pub encoder: Encoder,
    pub json: bool,
    pub command: Command,
}

impl AppConfig {
    /// Generator settings for this configuration.
    pub fn settings(&self) -> Settings {
        let settings = Settings::default()
            .with_start_time(self.start_time)
            .with_encoder(self.encoder);
        match self.machine_id {
            MachineIdConfig::Fixed(id) => settings.with_machine_id(id),
            MachineIdConfig::Probe(addr) => settings.with_machine_id(OutboundIp::new(addr)),
        }
    }
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the Unix epoch")?;
        let start_time = Duration::from_millis(args.start_ms);
        if start_time > now {
            bail!(
                "FLAKE58_START_MS ({}) lies in the future (now = {})",
                args.start_ms,
                now.as_millis()
            );
        }

        let encoder = match &args.alphabet {
            Some(alphabet) => {
                if alphabet.contains(PREFIX_SEPARATOR) {
                    bail!(
                        "FLAKE58_ALPHABET must not contain '{PREFIX_SEPARATOR}', it separates prefixes from IDs"
                    );
                }
                Encoder::new(alphabet).context("invalid FLAKE58_ALPHABET")?
            }
            None => Encoder::standard(),
        };

        if let Command::Mint { count, prefix } = &args.command {
            if *count == 0 {
                bail!("--count must be greater than 0");
            }
            if let Some(prefix) = prefix {
                validate_prefix(prefix)?;
            }
        }

        let machine_id = match args.machine_id {
            Some(id) => MachineIdConfig::Fixed(id),
            None => MachineIdConfig::Probe(args.probe_addr),
        };

        Ok(Self {
            start_time,
            machine_id,
            encoder,
            json: args.json,
            command: args.command,
        })
    }
}

fn validate_prefix(prefix: &str) -> anyhow::Result<()> {
    if prefix.is_empty() {
        bail!("--prefix must not be empty");
    }
    if !prefix.bytes().all(|b| b.is_ascii_alphanumeric()) {
        bail!("--prefix ({prefix}) may only contain ASCII letters and digits");
    }
    Ok(())
}
