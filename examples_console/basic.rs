use std::io;

use teavet::{Teavet, TeavetConfig};

fn main() -> Result<(), teavet::TeavetError> {
    // Explicit logger: nothing here terminates the process on its own.
    let logger = Teavet::new(TeavetConfig {
        create_if_missing: true,
        ..TeavetConfig::default()
    });
    let path = logger.start()?;
    println!("logging to {}", path.display());

    logger.simple()?;
    logger.status("success")?;
    logger.message("Teavet is up and running!")?;
    logger.error(io::Error::new(io::ErrorKind::NotFound, "config.toml missing"))?;

    let fatal = logger.fatal("cannot continue without config")?;
    println!("fatal outcome: {:?} (not enforced)", fatal.outcome);

    // Process-wide helpers: same pipeline, classic exit/panic behavior.
    teavet::start();
    teavet::complete("info", "shutting down", None);

    Ok(())
}
