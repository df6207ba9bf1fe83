use clap::Parser;
use statushawk::cli::{
    accounts, channels, config as config_cmd, monitors, overview, handle_completions, Cli,
    ChannelsCommands, Commands, ConfigCommands, Console, MonitorsCommands,
};
use statushawk::config::ConsoleConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config =
        ConsoleConfig::load(Some(&cli.config)).unwrap_or_else(|_| ConsoleConfig::default());
    config = config.with_env_overrides();
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    statushawk::logging::init(&config.logging);

    let result = run(cli.command, config).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: ConsoleConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Commands that never talk to the API skip the console setup.
    match &command {
        Commands::Config(ConfigCommands::Init(args)) => {
            println!("{}", config_cmd::handle_config_init(args)?);
            return Ok(());
        }
        Commands::Completions(args) => {
            handle_completions(args);
            return Ok(());
        }
        _ => {}
    }

    let console = Console::new(config)?;

    let output = match command {
        Commands::Login(args) => accounts::handle_login(&args, &console).await?,
        Commands::Register(args) => accounts::handle_register(&args, &console).await?,
        Commands::Logout => accounts::handle_logout(&console)?,
        Commands::Overview(args) => {
            statushawk::cli::require_session(&console.session)?;
            overview::handle_overview(&args, &console).await?
        }
        Commands::Monitors(cmd) => {
            statushawk::cli::require_session(&console.session)?;
            match cmd {
                MonitorsCommands::List(args) => {
                    monitors::handle_monitors_list(&args, &console).await?
                }
                MonitorsCommands::Add(args) => {
                    monitors::handle_monitors_add(&args, &console).await?
                }
                MonitorsCommands::Toggle(args) => {
                    monitors::handle_monitors_toggle(&args, &console).await?
                }
                MonitorsCommands::Delete(args) => {
                    monitors::handle_monitors_delete(&args, &console).await?
                }
            }
        }
        Commands::Monitor(args) => {
            statushawk::cli::require_session(&console.session)?;
            monitors::handle_monitor_detail(&args, &console).await?
        }
        Commands::Channels(cmd) => {
            statushawk::cli::require_session(&console.session)?;
            match cmd {
                ChannelsCommands::List(args) => {
                    channels::handle_channels_list(&args, &console).await?
                }
                ChannelsCommands::ConnectTelegram => {
                    channels::handle_connect_telegram(&console).await?
                }
                ChannelsCommands::Disconnect(args) => {
                    channels::handle_channels_disconnect(&args, &console).await?
                }
            }
        }
        Commands::Config(_) | Commands::Completions(_) => unreachable!(),
    };

    println!("{}", output);
    Ok(())
}
