use clap::Parser;
use flatdb::config::Config;
use flatdb::{server, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    server::run(config).await
}
