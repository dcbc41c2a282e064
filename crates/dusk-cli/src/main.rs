mod cli;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use dusk_core::{Compiler, Config};

fn main() -> ExitCode {
    env_logger::init();

    let cli = cli::Cli::parse();
    match cli.command {
        cli::Commands::Build {
            input,
            config,
            dry_run,
        } => build(&input, config.as_deref(), dry_run),
    }
}

fn build(input: &Path, config_path: Option<&Path>, dry_run: bool) -> ExitCode {
    let config = match config_path {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("failed to load {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let compiler = match Compiler::new(&config) {
        Ok(compiler) => compiler,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let files = match collect_css_files(input) {
        Ok(files) => files,
        Err(err) => {
            log::error!("failed to read {}: {}", input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    // A failing file must not abort the rest of the batch.
    let mut failures = 0;
    for file in &files {
        if let Err(err) = build_file(&compiler, file, dry_run) {
            log::error!("{}: {}", file.display(), err);
            failures += 1;
        }
    }

    if failures > 0 {
        log::error!("{failures} of {} files failed", files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn build_file(compiler: &Compiler, path: &Path, dry_run: bool) -> dusk_core::Result<()> {
    let source = fs::read_to_string(path)?;

    match compiler.compile(&source)? {
        Some(compiled) => {
            if dry_run {
                println!("{compiled}");
            } else {
                fs::write(path, &compiled)?;
            }
            log::info!("compiled {}", path.display());
        }
        None => log::debug!("skipped {}", path.display()),
    }

    Ok(())
}

fn collect_css_files(input: &Path) -> std::io::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    walk(input, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "css") {
            files.push(path);
        }
    }
    Ok(())
}
