use std::env;
use std::net::SocketAddr;
use std::process;

use getopts::Options;

pub const ADDRESS_VAR: &str = "SCHEDULE_PROXY_ADDR";

const DEFAULT_CACHE_CAPACITY: usize = 16;

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub address: SocketAddr,
    pub enable_cache: bool,
    pub cache_capacity: usize,
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
        "Socket address (IP and port) to listen on [Default: $SCHEDULE_PROXY_ADDR or 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Reuse exported calendars until the schedule changes [Default: false]",
    );
    opts.optopt(
        "n",
        "cache-capacity",
        "Number of exported calendars to keep [Default: 16]",
        "COUNT",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    match parse_from(args, env::var(ADDRESS_VAR).ok()) {
        Ok(Some(args)) => args,
        Ok(None) => {
            let opts = opts();
            println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

/// `Ok(None)` means help was requested.
fn parse_from(args: Vec<String>, env_address: Option<String>) -> Result<Option<Args>, String> {
    let matches = opts().parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(None);
    }

    let default_address = match env_address {
        Some(value) => value
            .parse()
            .map_err(|err| format!("Failed to parse `{ADDRESS_VAR}` environment variable: {err}"))?,
        None => SocketAddr::from(([127, 0, 0, 1], 8080)),
    };

    let address = matches
        .opt_get_default("address", default_address)
        .map_err(|err| format!("Provided value for option 'address' is invalid: {err}"))?;

    let enable_cache = matches.opt_present("enable-cache");

    let cache_capacity = matches
        .opt_get_default("cache-capacity", DEFAULT_CACHE_CAPACITY)
        .map_err(|err| format!("Provided value for option 'cache-capacity' is invalid: {err}"))?;

    Ok(Some(Args {
        address,
        enable_cache,
        cache_capacity,
    }))
}
