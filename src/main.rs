use clap::Parser;

use ganymede_aggregations::app::{handle_fatal_error, init_logging, AppConfig};
use ganymede_aggregations::cli::{execute_command, Cli};
use ganymede_aggregations::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match ConfigLoader::new().load(cli.config.as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&AppConfig::new(cli.verbose));
            handle_fatal_error(e.into(), cli.verbose)
        }
    };

    let app_config = AppConfig::new(cli.verbose).with_log_level(settings.log_level.clone());
    init_logging(&app_config);

    if let Err(e) = execute_command(cli.command, &settings, cli.shapes.as_deref()).await {
        handle_fatal_error(e, cli.verbose);
    }
}
