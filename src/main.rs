use std::process;

use server::Config;

#[async_std::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            process::exit(1);
        }
    };

    if let Err(err) = ctrlc::set_handler(|| {
        log::info!("Shutting down skill server");
        process::exit(0);
    }) {
        log::warn!("cannot install ctrl-c handler: {}", err);
    }

    if let Err(err) = server::run(config).await {
        log::error!("{}: {:?}", err, err);
        process::exit(1);
    }
}
