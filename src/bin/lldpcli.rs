//! lldpcli - query and configure an LLDP daemon
//!
//! # Usage
//!
//! ```bash
//! # List local interfaces
//! lldpcli interfaces
//!
//! # Show the local port and neighbors of eth0
//! lldpcli show eth0
//!
//! # Advertise a voice VLAN on eth0
//! lldpcli set-policy eth0 --app voice --vid 100 --priority 5 --dscp 46 --tagged
//!
//! # Advertise a civic address on eth0
//! lldpcli set-location eth0 --civic --country FR --ca 3=Paris --ca 6="Rue du Bac"
//!
//! # Talk to a daemon on another socket
//! LLDPCTL_SOCKET=/tmp/lldpd.socket lldpcli interfaces
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lldpctl::log::{self, CallbackLayer, Severity};
use lldpctl::{dump, Atom, AtomKey, ClientConfig, SyncConnection};

/// LLDP control client
#[derive(Parser, Debug)]
#[command(name = "lldpcli", version, about)]
struct Args {
    /// Control socket path (defaults to $LLDPCTL_SOCKET, then /var/run/lldpd.socket)
    #[arg(short, long, global = true)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List local interfaces
    Interfaces,

    /// Show the local port and neighbors of an interface
    Show {
        interface: String,
    },

    /// Set an LLDP-MED network policy on an interface
    SetPolicy(PolicyArgs),

    /// Set an LLDP-MED location on an interface
    SetLocation(LocationArgs),
}

#[derive(ClapArgs, Debug)]
struct PolicyArgs {
    interface: String,

    /// Application type, by name (voice, "video conferencing", ...)
    #[arg(long, default_value = "voice")]
    app: String,

    #[arg(long, default_value_t = 0)]
    vid: i64,

    #[arg(long, default_value_t = 0)]
    priority: i64,

    #[arg(long, default_value_t = 0)]
    dscp: i64,

    /// Frames are 802.1Q tagged
    #[arg(long)]
    tagged: bool,

    /// Policy is required but not yet known
    #[arg(long)]
    unknown: bool,
}

#[derive(ClapArgs, Debug)]
struct LocationArgs {
    interface: String,

    /// Civic address, built from --country and --ca
    #[arg(long, requires = "country", conflicts_with = "elin")]
    civic: bool,

    /// Two-letter country code of a civic address
    #[arg(long)]
    country: Option<String>,

    /// Civic address element as TYPE=VALUE (repeatable)
    #[arg(long = "ca", value_parser = parse_ca_element)]
    elements: Vec<(i64, String)>,

    /// Emergency call service number (10 to 25 digits)
    #[arg(long)]
    elin: Option<String>,
}

fn parse_ca_element(input: &str) -> Result<(i64, String), String> {
    let (ca_type, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=VALUE, got {input:?}"))?;
    let ca_type = ca_type
        .trim()
        .parse()
        .map_err(|e| format!("bad civic element type {ca_type:?}: {e}"))?;
    Ok((ca_type, value.to_string()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config = match args.socket {
        Some(socket_path) => ClientConfig {
            socket_path,
            ..ClientConfig::default()
        },
        None => ClientConfig::from_env(),
    };
    let mut conn = SyncConnection::connect_with(&config)
        .with_context(|| format!("Failed to connect to {}", config.socket_path.display()))?;

    match args.command {
        Command::Interfaces => {
            let list = conn
                .get_interfaces()
                .context("Failed to list interfaces")?;
            for interface in list.children()? {
                println!("{}", interface.get_str(AtomKey::InterfaceName)?);
            }
        }
        Command::Show { interface } => {
            let port = fetch_port(&mut conn, &interface)?;
            print!("{}", dump(&port));
        }
        Command::SetPolicy(policy) => {
            let port = fetch_port(&mut conn, &policy.interface)?;
            let port = stage_policy(&port, &policy)
                .with_context(|| format!("Invalid policy for {}", policy.interface))?;
            conn.set_port(&port)
                .with_context(|| format!("Failed to update {}", policy.interface))?;
        }
        Command::SetLocation(location) => {
            let port = fetch_port(&mut conn, &location.interface)?;
            let port = stage_location(&port, &location)
                .with_context(|| format!("Invalid location for {}", location.interface))?;
            conn.set_port(&port)
                .with_context(|| format!("Failed to update {}", location.interface))?;
        }
    }

    Ok(())
}

/// Routes tracing events through the control library's log callback.
fn init_logging() -> Result<()> {
    log::register(|severity, message| {
        let tag = match severity {
            Severity::Warn | Severity::Warnx => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
        };
        eprintln!("lldpcli: {tag}: {message}");
    });

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(CallbackLayer::new())
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}

fn fetch_port<S: std::io::Read + std::io::Write>(
    conn: &mut SyncConnection<S>,
    interface: &str,
) -> Result<Atom> {
    conn.get_port_by_name(interface)
        .with_context(|| format!("Failed to fetch port of {interface}"))
}

fn stage_policy(port: &Atom, args: &PolicyArgs) -> Result<Atom> {
    let policy = port
        .get(AtomKey::PortMedPolicies)?
        .create()?
        .set_str(AtomKey::MedPolicyType, &args.app)?
        .set_int(AtomKey::MedPolicyVid, args.vid)?
        .set_int(AtomKey::MedPolicyPriority, args.priority)?
        .set_int(AtomKey::MedPolicyDscp, args.dscp)?
        .set_int(AtomKey::MedPolicyTagged, i64::from(args.tagged))?
        .set_int(AtomKey::MedPolicyUnknown, i64::from(args.unknown))?;
    debug!(interface = %args.interface, app = %args.app, "Staging policy");
    Ok(port.set(AtomKey::PortMedPolicies, &policy)?)
}

fn stage_location(port: &Atom, args: &LocationArgs) -> Result<Atom> {
    let blank = port.get(AtomKey::PortMedLocations)?.create()?;

    let location = match (&args.elin, &args.country) {
        (Some(elin), _) => blank
            .set_int(AtomKey::MedLocationFormat, 3)?
            .set_str(AtomKey::MedLocationElin, elin)?,
        (None, Some(country)) if args.civic => {
            let mut location = blank
                .set_int(AtomKey::MedLocationFormat, 2)?
                .set_str(AtomKey::MedLocationCountry, country)?;
            for (ca_type, value) in &args.elements {
                let element = location
                    .get(AtomKey::MedLocationCaElements)?
                    .create()?
                    .set_int(AtomKey::MedCivicType, *ca_type)?
                    .set_str(AtomKey::MedCivicValue, value)?;
                location = location.set(AtomKey::MedLocationCaElements, &element)?;
            }
            location
        }
        _ => bail!("give either --elin or --civic with --country"),
    };

    debug!(interface = %args.interface, "Staging location");
    Ok(port.set(AtomKey::PortMedLocations, &location)?)
}
