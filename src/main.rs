use std::io;

use imagegen::{logger, session, ImageGenerator, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init()?;

    let mut input = io::stdin().lock();
    let mut output = io::stdout();

    let Some(config) = session::setup(&mut input, &mut output)? else {
        return Ok(());
    };
    logger::log_config_info(&config);

    let generator = match ImageGenerator::new(config) {
        Ok(generator) => generator,
        Err(e) => {
            log::error!("❌ Failed to initialize generator: {}", e);
            return Err(e.into());
        }
    };

    Session::new(generator, input, output).run().await?;
    Ok(())
}
