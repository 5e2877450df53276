use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use flolive::{
    common::{banner, logger},
    configs::Config,
    hls::HlsManifestResolver,
    session::CookieStore,
    sources::SourceManager,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "flolive")]
#[command(about = "Resolve a FloSports live event page into playable HLS formats")]
#[command(version)]
struct Cli {
    /// Live event page URL (https://www.flomarching.com/live/<id>)
    url: String,

    /// Browser-exported Netscape cookies file
    #[arg(short, long)]
    cookies: Option<PathBuf>,

    /// Stream to select: registry id, code, or (partial) name
    #[arg(short, long)]
    stream: Option<String>,

    /// Sleep this many minutes before starting the resolution
    #[arg(long)]
    delay_minutes: Option<u64>,

    /// Request a start point this many minutes in the past (DVR streams)
    #[arg(long)]
    lookback_minutes: Option<u64>,

    /// Skip the startup banner
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logger::init(&config);
    if !cli.quiet {
        banner::print_banner(&banner::BannerInfo::default());
    }

    // CLI flags win over config.toml.
    let flosports = config.flosports.get_or_insert_with(Default::default);
    if cli.stream.is_some() {
        flosports.stream = cli.stream.clone();
    }
    if cli.delay_minutes.is_some() {
        flosports.delay_minutes = cli.delay_minutes;
    }
    if cli.lookback_minutes.is_some() {
        flosports.lookback_minutes = cli.lookback_minutes;
    }

    let cookies_file = cli
        .cookies
        .clone()
        .or_else(|| config.session.cookies_file.as_ref().map(PathBuf::from));
    let session = match cookies_file {
        Some(path) => match CookieStore::load(&path) {
            Ok(store) => store,
            Err(e) => {
                error!("Could not read cookies file {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => CookieStore::empty(),
    };

    let manifests = match HlsManifestResolver::new() {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("Could not build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let manager = SourceManager::new(&config, Arc::new(session), Arc::new(manifests));

    match manager.extract(&cli.url).await {
        Ok(info) => {
            match serde_json::to_string_pretty(&info) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    error!("Could not serialize result: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
