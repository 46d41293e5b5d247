use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr};

mod settings;

use settings::Settings;

/// Compile Hordes Definition Language programs into Quake maps.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Program files to compile.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Directory receiving the generated maps.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Settings file, instead of ./hordes.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parse and evaluate only; write no maps.
    #[arg(long)]
    check: bool,

    /// Continue with the remaining sources after a failing one.
    #[arg(short, long)]
    keep_going: bool,

    /// More logging; repeat for more.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Default)]
struct Summary {
    written: usize,
    failed_maps: usize,
    failed_sources: usize,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).wrap_err("loading settings")?;
    if let Some(dir) = &cli.output_dir {
        settings.output_dir = dir.clone();
    }
    settings.keep_going |= cli.keep_going;

    env_logger::Builder::new()
        .filter_level(settings.level(cli.verbose))
        .parse_default_env()
        .init();
    log::debug!("{settings:?}");

    if !cli.check {
        fs::create_dir_all(&settings.output_dir).wrap_err_with(|| {
            format!("creating output directory {}", settings.output_dir.display())
        })?;
    }

    let mut summary = Summary::default();
    for source in &cli.sources {
        let ok = if cli.check {
            check(source)?
        } else {
            compile(source, &settings.output_dir, &mut summary)?
        };
        if !ok {
            summary.failed_sources += 1;
            if !settings.keep_going {
                break;
            }
        }
    }

    log::info!(
        "{} maps written, {} maps failed, {} sources failed",
        summary.written,
        summary.failed_maps,
        summary.failed_sources
    );
    let success = summary.failed_sources == 0 && (cli.check || summary.written > 0);
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn read(source: &Path) -> Result<String> {
    fs::read_to_string(source).wrap_err_with(|| format!("reading {}", source.display()))
}

fn echo(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Evaluate `source` without generating anything.
fn check(source: &Path) -> Result<bool> {
    let text = read(source)?;
    match hordes_lang::execute(&text) {
        Ok(execution) => {
            echo(&execution.output);
            println!("{}: ok, {} maps", source.display(), execution.maps().count());
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}:{err}", source.display());
            Ok(false)
        }
    }
}

fn compile(source: &Path, output_dir: &Path, summary: &mut Summary) -> Result<bool> {
    let text = read(source)?;
    let compilation = match hordes_gen::compile(&text) {
        Ok(compilation) => compilation,
        Err(err) => {
            eprintln!("{}:{err}", source.display());
            return Ok(false);
        }
    };
    echo(&compilation.output);

    for (name, map) in compilation.generated() {
        let path = output_dir.join(format!("{name}.map"));
        fs::write(&path, map).wrap_err_with(|| format!("writing {}", path.display()))?;
        println!(
            "{}: wrote {} ({} entities)",
            source.display(),
            path.display(),
            hordes_gen::count_entities(map)
        );
        summary.written += 1;
    }
    for err in compilation.failures() {
        eprintln!("{}: {err}", source.display());
        summary.failed_maps += 1;
    }
    Ok(true)
}
