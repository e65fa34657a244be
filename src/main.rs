// KidCode: a friendly Python playground with tutorials and challenges

use std::fs;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use kidcode::challenges::{catalog, ChallengeRunner, Registry};
use kidcode::config::Cli;
use kidcode::logging;
use kidcode::ui::App;
use kidcode::{ExecutionResult, Executor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let runner = ChallengeRunner::new(Executor::new(cli.to_limits()), catalog());

    if cli.list {
        print_catalog(runner.registry());
        return Ok(());
    }

    let start = match &cli.challenge {
        Some(id) => match runner.registry().position(id) {
            Some(index) => Some(index),
            None => {
                eprintln!("Error: no tutorial or challenge called '{}'", id);
                eprintln!("Run `kidcode --list` to see them all.");
                process::exit(2);
            }
        },
        None => None,
    };

    if let Some(path) = &cli.file {
        if !path.exists() {
            eprintln!("Error: File '{}' not found", path.display());
            process::exit(2);
        }
    }

    if cli.plain {
        let ok = run_plain(&cli, &runner)?;
        process::exit(if ok { 0 } else { 1 });
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(runner, start.unwrap_or(0), cli.file.clone());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn print_catalog(registry: &Registry) {
    for item in registry.iter() {
        println!(
            "{:<16} {:<9} {:>2} pts  {} {}",
            item.id,
            item.kind,
            item.points(),
            item.emoji,
            item.title
        );
    }
}

/// Run once without the playground; true when the run succeeded (and solved the item, if any)
fn run_plain(cli: &Cli, runner: &ChallengeRunner) -> Result<bool, Box<dyn std::error::Error>> {
    let challenge = cli.challenge.as_deref();
    let source = match (&cli.file, challenge.and_then(|id| runner.registry().get(id))) {
        (Some(path), _) => fs::read_to_string(path)?,
        (None, Some(item)) => item.starter_source.clone(),
        (None, None) => {
            eprintln!("Error: nothing to run. Give a FILE, a --challenge, or both.");
            process::exit(2);
        }
    };

    let Some(id) = challenge else {
        let result = runner.executor().execute(&source);
        report(&result);
        return Ok(result.is_success());
    };

    let attempt = runner.attempt(id, &source)?;
    report(&attempt.result);
    match attempt.outcome {
        Some(true) => println!("🎉 Solved '{}'!", id),
        Some(false) => {
            println!("Not solved yet. Keep trying!");
            if let Some(item) = runner.registry().get(id) {
                println!("💡 {}", item.hint);
            }
        }
        None => {}
    }
    Ok(attempt.solved())
}

fn report(result: &ExecutionResult) {
    print!("{}", result.captured_output);
    let _ = io::stdout().flush();
    if let Some(failure) = &result.failure {
        match failure.line {
            Some(line) => eprintln!("{} (line {})", failure.translated_message, line),
            None => eprintln!("{}", failure.translated_message),
        }
    }
}
