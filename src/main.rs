//! Offset-database inspection tool
//!
//! Loads the configured database, reports its shape, and optionally
//! resolves identifiers against a caller-supplied base and version:
//!
//! ```text
//! relokit [--config <path>] [--base <addr>] [--version <a.b.c.d>] [id...]
//! ```

use anyhow::{bail, Context, Result};
use relokit::config::{validate_config, ConfigLoader};
use relokit::core::fatal::FatalExt;
use relokit::{Address, HostModule, Id, LookupMode, OffsetDatabase, Resolver, VersionKey};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Args {
    config_path: String,
    base: Option<String>,
    version: Option<String>,
    ids: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config_path: "relokit.toml".to_string(),
        base: None,
        version: None,
        ids: Vec::new(),
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config_path = iter.next().context("--config requires a path")?;
            }
            "--base" => {
                args.base = Some(iter.next().context("--base requires an address")?);
            }
            "--version" => {
                args.version = Some(iter.next().context("--version requires a version key")?);
            }
            other if other.starts_with("--") => bail!("unknown option: {other}"),
            id => args.ids.push(id.to_string()),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let config = ConfigLoader::new(&args.config_path).load_or_default();
    validate_config(&config).context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("relokit v{}", env!("CARGO_PKG_VERSION"));

    // all-or-nothing: any defect in the resource aborts here, loudly
    let db = OffsetDatabase::load(&config.database.path, &config.database.identity)
        .or_fail("loading offset database");
    info!(
        path = %config.database.path,
        entries = db.len(),
        identity = db.identity(),
        "offset database ready"
    );

    if args.ids.is_empty() {
        return Ok(());
    }

    let version: VersionKey = args
        .version
        .context("--version is required to resolve ids")?
        .parse()?;
    let base: Address = match &args.base {
        Some(raw) => raw.parse()?,
        None => Address::null(),
    };
    let mode: LookupMode = config
        .resolver
        .lookup_mode
        .parse()
        .map_err(anyhow::Error::msg)?;

    let module = HostModule::from_parts("(cli)", base, 0, version);
    let resolver = Resolver::with_mode(&module, &db, mode);

    for raw in &args.ids {
        let id = Id::new(raw.parse().with_context(|| format!("bad id: {raw:?}"))?);
        match resolver.resolve::<u8>(id) {
            Ok(resolved) => info!(%id, address = %resolved, "resolved"),
            Err(err) => warn!(%id, %err, "unresolved"),
        }
    }

    Ok(())
}
