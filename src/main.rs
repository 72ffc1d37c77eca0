use clap::Parser;
use getservers::{parse_tags, select_servers, Config, Provider, Query};
use log::warn;

/// Resolve tagged cloud instances into deployment targets.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Region to search. 3-letter codes route to Rackspace, anything
    /// else to AWS EC2, unless --provider says otherwise.
    region: String,

    /// Tags to match, comma separated key:value pairs,
    /// e.g. "app:zumba,stack:web".
    tags: String,

    /// Role registered for each matching server (default: web).
    #[arg(long)]
    role: Option<String>,

    /// Register private addresses instead of public ones. Setting the
    /// USE_PRIVATE environment variable to any non-empty value has the
    /// same effect.
    #[arg(long)]
    private: bool,

    /// Query this provider instead of inferring it from the region.
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// Print the selection as JSON instead of `role address` lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let query = Query {
        region: cli.region,
        role: cli.role,
        tags: parse_tags(&cli.tags)?,
        use_private: cli.private || config.use_private,
        provider: cli.provider,
    };

    let selection = select_servers(&query, &config).await?;

    for skipped in &selection.skipped {
        warn!("{}: {}", skipped.server, skipped.reason);
    }
    if selection.targets.is_empty() {
        warn!(
            "no servers matched tags {:?} in {}",
            query.tags, query.region
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        for target in &selection.targets {
            println!("{} {}", target.role, target.address);
        }
    }

    Ok(())
}
