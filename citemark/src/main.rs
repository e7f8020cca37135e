use std::{fs, io::Write};

use citemark::{
  chunks::collect_chunks,
  cli::{Cli, Commands},
  run::{
    OutputTarget,
    collect_inputs,
    highlight_options,
    locate_file,
    resolve_jobs,
    run_highlight,
  },
};
use citemark_config::Config;
use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match cli.command {
    Commands::Init {
      ref output,
      ref format,
      force,
    } => {
      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      })?;

      info!("Configuration file created successfully.");
      Ok(())
    },

    Commands::Highlight {
      ref input,
      ref chunks,
      ref output,
      ref output_dir,
      jobs,
      ref container,
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;
      let options = highlight_options(&config, container.clone());
      let chunks = collect_chunks(chunks).wrap_err("Failed to load chunks")?;

      let inputs = collect_inputs(input)?;
      if inputs.is_empty() {
        bail!("No HTML documents found in the given inputs");
      }
      let target =
        OutputTarget::new(output.clone(), output_dir.clone(), inputs.len())?;

      let mut stdout = std::io::stdout().lock();
      run_highlight(
        &inputs,
        &chunks,
        &options,
        &target,
        resolve_jobs(jobs, &config),
        &mut stdout,
      )?;
      stdout.flush()?;
      Ok(())
    },

    Commands::Locate {
      ref input,
      ref chunks,
      ref container,
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;
      let options = highlight_options(&config, container.clone());
      let chunks = collect_chunks(chunks).wrap_err("Failed to load chunks")?;

      let report = locate_file(input, &chunks, &options)
        .wrap_err_with(|| format!("Failed to search {}", input.display()))?;

      let mut stdout = std::io::stdout().lock();
      serde_json::to_writer_pretty(&mut stdout, &report)?;
      writeln!(stdout)?;
      Ok(())
    },
  }
}
