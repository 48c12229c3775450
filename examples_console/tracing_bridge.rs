use std::sync::Arc;

use tracing::{error, info, warn};
use teavet::init::init_tracing;
use teavet::{Teavet, TeavetConfig};

fn main() {
    let logger = Arc::new(Teavet::new(TeavetConfig {
        create_if_missing: true,
        ..TeavetConfig::default()
    }));
    init_tracing(Arc::clone(&logger)).expect("set global subscriber");

    // Only WARN and above reach teavet.log with the default LayerConfig.
    info!("service started");
    warn!(queue_depth = 930, "queue almost full");
    error!(error = "connection reset by peer", "upstream request failed");

    match logger.log_file().and_then(|path| teavet::read_records(&path)) {
        Ok(records) => println!("teavet.log holds {} records", records.len()),
        Err(e) => eprintln!("unable to read back: {}", e),
    }
}
