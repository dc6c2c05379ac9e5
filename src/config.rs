use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::codec::DEFAULT_MAX_FRAME_SIZE;
use crate::server::Limits;

pub const HOST: &str = "127.0.0.1";
pub const PORT: u16 = 28374;
pub const IDLE_TIMEOUT_SECS: u64 = 300;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Serves a collection of flats over TCP", long_about = None)]
pub struct Config {
    /// JSON file holding the collection. Prompted for on stdin when omitted
    pub path: Option<PathBuf>,

    /// The host to bind to
    #[arg(long, env = "FLATDB_HOST", default_value = HOST)]
    pub host: String,

    /// The port to listen on
    #[arg(short, long, env = "FLATDB_PORT", default_value_t = PORT)]
    pub port: u16,

    /// Largest request frame accepted, in bytes. Responses are not limited
    #[arg(
        long,
        env = "MAX_FRAME_SIZE",
        default_value_t = DEFAULT_MAX_FRAME_SIZE as u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_frame_size: u32,

    /// Seconds a connection may stay idle before it is closed
    #[arg(
        long,
        env = "IDLE_TIMEOUT",
        default_value_t = IDLE_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub idle_timeout: u64,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_frame_size: self.max_frame_size as usize,
            idle_timeout: Duration::from_secs(self.idle_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["flatdb"]).unwrap();

        assert_eq!(config.path, None);
        assert_eq!(config.bind_address(), "127.0.0.1:28374");
        assert_eq!(config.limits().max_frame_size, DEFAULT_MAX_FRAME_SIZE);
        assert_eq!(config.limits().idle_timeout, Duration::from_secs(300));
    }

    #[test]
    fn explicit_arguments() {
        let config = Config::try_parse_from([
            "flatdb",
            "flats.json",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "--max-frame-size",
            "1024",
            "--idle-timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(config.path, Some(PathBuf::from("flats.json")));
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.limits().max_frame_size, 1024);
        assert_eq!(config.limits().idle_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_out_of_range_limits() {
        for args in [
            ["flatdb", "--idle-timeout", "0"],
            ["flatdb", "--max-frame-size", "0"],
            ["flatdb", "--max-frame-size", "4294967296"],
        ] {
            assert!(Config::try_parse_from(args).is_err(), "{:?}", args);
        }
    }

    #[test]
    fn rejects_second_path() {
        assert!(Config::try_parse_from(["flatdb", "a.json", "b.json"]).is_err());
    }
}
