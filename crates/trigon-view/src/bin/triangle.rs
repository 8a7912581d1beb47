use anyhow::Result;
use trigon_engine::logging::{init_logging, LoggingConfig};
use trigon_view::ViewConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    trigon_view::run(ViewConfig::new(500, 500).with_title("Triangle"))
}
