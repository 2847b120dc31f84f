use cidr_exclude::config::Config;
use cidr_exclude::logging::init_logging;
use cidr_exclude::output::print_summary;
use clap::Parser;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::parse();
    init_logging(&config.log_config)?;
    //
    log::info!("#Start main()");

    let lists = cidr_exclude::run(&config)?;
    print_summary(&lists);

    log::info!("#End main()");
    Ok(())
}
