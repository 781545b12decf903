//! Command dispatch

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{convert_to_writer, ApplicationError, FORMATS};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Convert {
            paths,
            output_dir,
            force,
            stdout,
            extension,
        }) => {
            let mut settings = Settings::load(cli.config.as_deref())?;
            if let Some(dir) = output_dir {
                settings.output_dir = Some(dir.clone());
            }
            if *force {
                settings.overwrite = true;
            }
            if let Some(ext) = extension {
                settings.output_extension = ext.trim_start_matches('.').to_string();
            }
            if settings.output_extension.is_empty() {
                return Err(CliError::InvalidArgs("output extension is empty".into()));
            }
            let container = ServiceContainer::new(settings);
            if *stdout {
                _convert_stdout(&container, paths)
            } else {
                _convert(&container, paths)
            }
        }
        Some(Commands::Show { file }) => _show(cli.config.as_deref(), file),
        Some(Commands::Formats) => _formats(),
        Some(Commands::Config { command }) => _config(cli.config.as_deref(), command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".into(),
        )),
    }
}

#[instrument(skip(container))]
fn _convert(container: &ServiceContainer, paths: &[PathBuf]) -> CliResult<()> {
    let outcomes = container.conversion.convert_all(paths);
    let total = outcomes.len();
    if total == 0 {
        return Err(CliError::Usage("no record files found".into()));
    }

    output::header(&format!("Converting {} record(s)", total));
    for outcome in &outcomes {
        match &outcome.result {
            Ok(written) => output::success_detail(&written.display()),
            Err(e) => output::failure(&format!("{}: {}", outcome.input.display(), e)),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    debug!("converted {} of {}", total - failed, total);
    if failed > 0 {
        return Err(CliError::Conversion { failed, total });
    }
    output::action("Converted", &format!("{} record(s)", total));
    Ok(())
}

#[instrument(skip(container))]
fn _convert_stdout(container: &ServiceContainer, paths: &[PathBuf]) -> CliResult<()> {
    let conversion = &container.conversion;
    let inputs = conversion.collect_inputs(paths);
    let total = inputs.len();
    if total == 0 {
        return Err(CliError::Usage("no record files found".into()));
    }

    let stdout = io::stdout();
    let mut failed = 0;
    for input in &inputs {
        let written = conversion.detect(input).and_then(|format| {
            let text = conversion.read_text(input, format)?;
            let mut sink = stdout.lock();
            convert_to_writer(&text, format, &mut sink)
        });
        if let Err(e) = written {
            failed += 1;
            output::error(&format!("{}: {}", input.display(), e));
        }
    }
    stdout
        .lock()
        .flush()
        .map_err(|e| InfraError::io("flush stdout", e))?;

    if failed > 0 {
        return Err(CliError::Conversion { failed, total });
    }
    Ok(())
}

#[instrument]
fn _show(config: Option<&Path>, file: &Path) -> CliResult<()> {
    let container = ServiceContainer::new(Settings::load(config)?);
    let tree = container.conversion.load_tree(file)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

fn _formats() -> CliResult<()> {
    output::header("Supported formats");
    for entry in FORMATS.iter() {
        output::detail(&format!(
            ".{:<4} {:<10} {}",
            entry.extension,
            entry.encoding.name(),
            entry.description
        ));
    }
    Ok(())
}

#[instrument]
fn _config(config: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let path = match config {
                Some(path) => Some(path.to_path_buf()),
                None => global_config_path(),
            };
            match path {
                Some(path) if path.exists() => output::info(&path.display()),
                Some(path) => output::info(&format!("{} (not found)", path.display())),
                None => {
                    return Err(ApplicationError::Config {
                        message: "cannot determine config directory".into(),
                    }
                    .into())
                }
            }
        }
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    eprintln!("Generating completion file for {shell:?}...");
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
