use std::{fs, io, process::ExitCode};

use color_eyre::eyre::{Context, Result, bail};
use incdoc::{
  cli::{BuildArgs, Cli, Commands},
  config::Config,
  error::exit_code_for,
  filter::{IncludeResolver, run_filter},
  pandoc::Pandoc,
  site::build_site,
};
use log::{LevelFilter, error, info};

fn main() -> Result<ExitCode> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling. Logs go
  // to stderr; stdout carries the document when running as a filter.
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .target(env_logger::Target::Stderr)
    .init();

  match &cli.command {
    Some(Commands::Init {
      output,
      format,
      force,
    }) => {
      init_config(output, format, *force)?;
      Ok(ExitCode::SUCCESS)
    },

    Some(Commands::Filter {
      format,
      include_dirs,
    }) => {
      let include_dirs = if include_dirs.is_empty() {
        Config::load(&cli.config_files, &cli.config_overrides)?.include_dirs
      } else {
        include_dirs.clone()
      };

      let mut resolver = IncludeResolver::new(include_dirs);
      run_filter(
        io::stdin().lock(),
        io::stdout().lock(),
        &mut resolver,
        format,
      )
      .wrap_err("Failed to filter pandoc document")?;
      Ok(ExitCode::SUCCESS)
    },

    Some(Commands::Build(args)) => build(&cli, args),
    None => build(&cli, &BuildArgs::default()),
  }
}

/// Load configuration, then run the whole build.
///
/// Transformer failures are reported here and turned into their own exit
/// code; everything else propagates to `main`.
fn build(cli: &Cli, args: &BuildArgs) -> Result<ExitCode> {
  let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
  args.apply_to(&mut config);
  config.validate_paths()?;

  info!("Starting documentation build...");
  match build_site(&config, &Pandoc::from_config(&config)) {
    Ok(summary) => {
      info!(
        "Documentation generated successfully in {} ({} page(s))",
        config.output_dir.display(),
        summary.pages.len()
      );
      Ok(ExitCode::SUCCESS)
    },
    Err(report) => {
      let code = exit_code_for(&report);
      if code == incdoc::error::EXIT_TRANSFORMER {
        error!("{report:?}");
        return Ok(ExitCode::from(code));
      }
      Err(report)
    },
  }
}

fn init_config(output: &std::path::Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  // Create parent directories if needed
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

  info!(
    "Configuration file created successfully. Edit it to list your sources \
     and include directories."
  );
  Ok(())
}
