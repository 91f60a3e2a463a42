// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{info, Level};

use seqsort::control::KeyboardController;
use seqsort::ui::App;
use seqsort::{Editor, EditorConfig, ProjectStore};

fn print_usage() {
    println!("seqsort - Sequence and song arranger for MPC projects");
    println!();
    println!("Usage: seqsort <PROJECT.xpj> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>   Configuration file (default: ./seqsort.yaml if present)");
    println!("  --verbose         Log at debug level");
    println!("  --dump            Print sequences and song, then exit");
    println!("  --help            Show this help message");
}

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct Options {
    project: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
    dump: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                options.config = Some(PathBuf::from(path));
            }
            "--verbose" | "-v" => options.verbose = true,
            "--dump" => options.dump = true,
            "--help" | "-h" => options.help = true,
            other if other.starts_with('-') => anyhow::bail!("Unknown option: {}", other),
            other => {
                if options.project.is_some() {
                    anyhow::bail!("Only one project can be opened: {}", other);
                }
                options.project = Some(PathBuf::from(other));
            }
        }
    }

    Ok(options)
}

fn init_logging(config: &EditorConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        config.log.level()?
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log.file)
        .with_context(|| format!("Failed to open log file: {:?}", config.log.file))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_max_level(level)
        .with_ansi(false)
        .init();

    Ok(())
}

fn dump(editor: &Editor) -> Result<()> {
    println!("Sequences:");
    for (position, item) in editor.sequences().items().iter().enumerate() {
        let state = if item.is_active() { "" } else { " (inactive)" };
        println!("  {:>3}  {}{}", position + 1, item.name(), state);
    }

    println!();
    println!("Song:");
    for (step, entry) in editor.song().entries().iter().enumerate() {
        println!(
            "  {:>3}  {} x{}  (sequence {})",
            step + 1,
            entry.name(),
            entry.repeat(),
            entry.sequence().number
        );
    }

    let update = editor.compute_save()?;
    println!();
    println!("Save mapping:");
    for (old, new) in update.mapping.iter() {
        println!("  {:>3} -> {}", old, new);
    }
    Ok(())
}

fn run(project: &Path, options: &Options) -> Result<()> {
    let cwd = env::current_dir().context("Failed to read current directory")?;
    let config = EditorConfig::discover(options.config.as_deref(), &cwd)?;
    init_logging(&config, options.verbose)?;

    let mut store = config.store();
    let mut editor = Editor::new();
    editor
        .open(&mut store, project)
        .with_context(|| format!("Failed to open project: {:?}", project))?;

    if options.dump {
        return dump(&editor);
    }

    let keyboard = KeyboardController::with_overrides(&config.keyboard);
    let mut app = App::new(keyboard).context("Failed to start terminal UI")?;
    app.set_frame_rate(config.ui.frame_rate);
    let store: &mut dyn ProjectStore = &mut store;
    app.run(&mut editor, store)?;

    info!("Exiting");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {}", err);
            print_usage();
            std::process::exit(1);
        }
    };

    if options.help {
        print_usage();
        return Ok(());
    }

    let Some(project) = options.project.clone() else {
        println!("seqsort - Sequence and song arranger for MPC projects");
        println!("Run with --help for usage information");
        return Ok(());
    };

    run(&project, &options)
}
