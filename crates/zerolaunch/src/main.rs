mod command;

use crate::command::Command;
use anyhow::{Context, Error};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use zerolaunch_core::app_routes::{build_controller, AppViews, AppWindow};
use zerolaunch_core::logging::{init_logging, shutdown_logging};
use zerolaunch_core::navigation::{
    Location, NavigationController, NavigationEvent, NavigationOutcome, Renderable,
};
use zerolaunch_core::settings::{Settings, SETTINGS_PATH};
use zerolaunch_core::NavigationError;

/// Drives the launcher's navigation controller from the terminal.
///
/// Each input line is a navigation command; the terminal stands in for the
/// webview's location and history.
#[derive(Parser, Debug)]
#[command(name = "zerolaunch-nav", version)]
struct Cli {
    /// Settings file; defaults apply when it does not exist
    #[arg(long, default_value = SETTINGS_PATH)]
    settings: PathBuf,

    /// Location reported by the host at startup
    #[arg(long, default_value = "/")]
    url: String,

    /// Origin the webview windows are served from
    #[arg(long, default_value = "http://localhost:1420")]
    origin: String,
}

/// Prints mount transitions instead of drawing anything.
struct TerminalView {
    name: &'static str,
}

impl Renderable for TerminalView {
    fn name(&self) -> &str {
        self.name
    }

    fn mount(&self, location: &Location) {
        println!("  mounted {} at {}", self.name, location);
    }

    fn unmount(&self) {
        println!("  unmounted {}", self.name);
    }
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings)?;
    init_logging(&settings.logging)?;

    let result = run(&cli, &settings);
    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "Navigation shell failed");
    }

    shutdown_logging();
    result
}

fn run(cli: &Cli, settings: &Settings) -> Result<(), Error> {
    let views = AppViews::new(
        Arc::new(TerminalView { name: "App" }),
        Arc::new(TerminalView {
            name: "SettingWindow",
        }),
    );
    let host = Location::from_url(&cli.url).context("invalid startup location")?;
    let (hub, events) = channel();
    let mut controller = build_controller(&views, &settings.navigation, &host)
        .context("invalid navigation configuration")?
        .with_hub(hub);

    for window in AppWindow::ALL {
        println!(
            "window {} ({}): {}",
            window.label(),
            window.title(),
            window.entry_url(&cli.origin, controller.history())
        );
    }

    report(controller.start());
    log_events(&events);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush().context("can't flush stdout")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("can't read command")?;
        if read == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("  {:#}", e);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        execute(&mut controller, command);
        log_events(&events);
    }

    tracing::info!("Navigation shell finished");
    Ok(())
}

fn execute(controller: &mut NavigationController, command: Command) {
    match command {
        Command::Push(target) => report(controller.push(&target)),
        Command::Replace(target) => report(controller.replace(&target)),
        Command::Back => report(controller.back()),
        Command::Forward => report(controller.forward()),
        Command::Go(delta) => report(controller.go(delta)),
        Command::Href(target) => match controller.href(&target) {
            Ok(href) => println!("  {}", href),
            Err(e) => println!("  {}", e),
        },
        Command::Where => {
            let history = controller.history();
            let view = controller
                .current_route()
                .map(|route| route.view().name())
                .unwrap_or("nothing");
            println!(
                "  {} showing {} (entry {} of {})",
                controller.current_location(),
                view,
                history.position() + 1,
                history.len()
            );
        }
        Command::Routes => {
            for route in controller.table().routes() {
                println!("  {} -> {}", route.path(), route.view().name());
            }
            println!("  unmatched paths: {:?}", controller.fallback());
        }
        Command::Quit | Command::Nothing => {}
    }
}

fn report(outcome: Result<NavigationOutcome, NavigationError>) {
    match outcome {
        Ok(NavigationOutcome::Navigated(_)) => {}
        Ok(NavigationOutcome::Redirected { from, to }) => {
            println!("  {} is not a route, redirected to {}", from, to)
        }
        Ok(NavigationOutcome::Duplicated) => println!("  already there"),
        Ok(NavigationOutcome::Stationary) => println!("  no history in that direction"),
        Err(e) => println!("  {}", e),
    }
}

fn log_events(events: &Receiver<NavigationEvent>) {
    for event in events.try_iter() {
        tracing::debug!(kind = %event.kind, to = %event.to, view = %event.view, "Host notified");
    }
}
