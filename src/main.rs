use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{value_parser, Arg, ArgMatches, Command};
use command_tower::controller::{self, Action, Command as Input};
use command_tower::{config, CommandTower, Config, Currency};
use tracing::{debug, error};

fn main() {
    let args = cli().get_matches();

    let logpath = args
        .get_one::<PathBuf>("log-dir")
        .cloned()
        .unwrap_or_else(config::default_log_dir);
    let logfile = tracing_appender::rolling::daily(logpath, "log");
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_writer(logfile)
        .init();

    debug!("starting application");

    let config = match map_args_to_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };

    let mut tower = match CommandTower::builder().config(config).build() {
        Ok(tower) => tower,
        Err(err) => {
            error!("failed to initialize session: {:?}", err);
            eprintln!("failed to initialize: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&mut tower) {
        error!("closing application with error: {:?}", err);
        std::process::exit(1);
    }
    debug!("closing application");
}

fn cli() -> Command {
    Command::new("command-tower")
        .about("random commanders with average EDHREC decklists and Scryfall deck prices")
        .args([
            Arg::new("concurrency")
                .long("concurrency")
                .short('c')
                .value_parser(value_parser!(usize))
                .default_value("2")
                .help("number of parallel price requests per deck"),
            Arg::new("currency")
                .long("currency")
                .default_value("eur")
                .help("price currency: eur, usd or tix"),
            Arg::new("timeout")
                .long("timeout")
                .value_parser(value_parser!(u64))
                .default_value("30")
                .help("HTTP timeout in seconds"),
            Arg::new("log-dir")
                .long("log-dir")
                .value_parser(value_parser!(PathBuf))
                .help("directory for log files"),
        ])
}

fn map_args_to_config(args: &ArgMatches) -> command_tower::Result<Config> {
    let mut config = Config::default();
    if let Some(concurrency) = args.get_one::<usize>("concurrency") {
        config.concurrency = *concurrency;
    }
    if let Some(currency) = args.get_one::<String>("currency") {
        config.currency = currency.parse::<Currency>()?;
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config.timeout = Duration::from_secs(*timeout);
    }
    Ok(config)
}

fn run(tower: &mut CommandTower) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "{}", controller::HELP)?;
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match controller::parse_command(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Help) => writeln!(stdout, "{}", controller::HELP)?,
            Ok(Input::Act(action)) => {
                let back = action == Action::Back;
                let deck = action == Action::Decklist;
                let state = controller::handle(tower, action);
                if back && !state.moved {
                    writeln!(stdout, "already at the oldest commander")?;
                }
                if deck && state.position.is_some() && state.decklist.is_none() {
                    writeln!(stdout, "no decklist available")?;
                }
                writeln!(stdout, "{}", controller::render(&state, tower.currency()))?;
            }
            Err(err) => writeln!(stdout, "{}", err)?,
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}
