use std::env;
use std::net::SocketAddr;
use std::process;

use getopts::{Matches, Options};
use tokio::time::Duration;

use crate::feed::Source;

const ADDRESS_VAR: &str = "WINGMAN_PROXY_ADDR";

#[derive(Debug)]
pub struct Args {
    pub address: SocketAddr,
    pub source: Source,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: $WINGMAN_PROXY_ADDR or 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "s",
        "source",
        "Event feed to serve, either a JSON file or an http(s) URL",
        "PATH_OR_URL",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of the loaded feed [Default: false]",
    );
    opts.optopt(
        "t",
        "cache-ttl",
        "Time-to-live for the cached feed [Default: 3600]",
        "SECONDS",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args.iter().skip(1)) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let default_address = match env::var(ADDRESS_VAR) {
        Ok(value) => match value.parse() {
            Ok(address) => address,
            Err(err) => {
                eprintln!("Failed to parse `{ADDRESS_VAR}` environment variable: {err}");
                process::exit(1);
            }
        },
        Err(_) => SocketAddr::from(([127, 0, 0, 1], 8080)),
    };

    match from_matches(&matches, default_address) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn from_matches(matches: &Matches, default_address: SocketAddr) -> Result<Args, String> {
    let address = matches
        .opt_get_default("address", default_address)
        .map_err(|err| format!("Provided value for option 'address' is invalid: {err}"))?;

    let source = matches
        .opt_str("source")
        .ok_or_else(|| "Missing required option 'source'".to_string())?
        .parse::<Source>()
        .map_err(|err| format!("Provided value for option 'source' is invalid: {err}"))?;

    let enable_cache = matches.opt_present("enable-cache");

    let cache_ttl = matches
        .opt_get_default("cache-ttl", 3600)
        .map(Duration::from_secs)
        .map_err(|err| format!("Provided value for option 'cache-ttl' is invalid: {err}"))?;

    Ok(Args {
        address,
        source,
        enable_cache,
        cache_ttl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(args: &[&str]) -> Result<Args, String> {
        let matches = opts().parse(args).map_err(|err| err.to_string())?;
        from_matches(&matches, SocketAddr::from(([127, 0, 0, 1], 8080)))
    }

    #[test]
    fn applies_defaults() {
        let args = parse_ok(&["--source", "feed.json"]).unwrap();

        assert_eq!(args.address, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(args.source, Source::File("feed.json".into()));
        assert!(!args.enable_cache);
        assert_eq!(args.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn reads_all_options() {
        let args = parse_ok(&[
            "-a",
            "0.0.0.0:9000",
            "-s",
            "https://mock.wingman.local/feed.json",
            "-c",
            "-t",
            "60",
        ])
        .unwrap();

        assert_eq!(args.address, SocketAddr::from(([0, 0, 0, 0], 9000)));
        assert_eq!(
            args.source,
            Source::Url("https://mock.wingman.local/feed.json".to_string())
        );
        assert!(args.enable_cache);
        assert_eq!(args.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn rejects_missing_source_and_bad_values() {
        assert!(parse_ok(&[]).unwrap_err().contains("source"));
        assert!(parse_ok(&["-s", "feed.json", "-t", "soon"])
            .unwrap_err()
            .contains("cache-ttl"));
        assert!(parse_ok(&["-s", "feed.json", "-a", "localhost"])
            .unwrap_err()
            .contains("address"));
    }
}
