#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
extern crate pretty_env_logger;

mod common;
mod config;
mod feed;
mod server;
mod sources;
mod story;

use common::*;
use config::*;
use server::Pipeline;
use sources::UpstreamSource;

#[tokio::main]
async fn main() -> RssResult<()> {
    pretty_env_logger::init();

    trace!("Loading configuration...");
    let config = Config::load(CONFIG_FILE)?;

    let source = UpstreamSource::new(&config.upstream)?;
    info!("upstream is {}", source.url());

    server::run(config.listen, Pipeline::new(source, config.feed)).await
}
