use bayer_bitmap::cli::{self, Args, Command};
use bayer_bitmap::pipeline::{self, ConvertJob};
use bayer_bitmap::ConvertError;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

/// Default log filter when `RUST_LOG` is unset. Verbose mode enables this
/// crate's per-column trace output.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,bayer_bitmap=trace"
    } else {
        "info"
    }
}

fn init_logging(verbose: bool) {
    let filter = default_log_filter(verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}

fn run_convert(args: &Args) -> Result<(), ConvertError> {
    let config = cli::load_config(args.config.as_deref())?;
    let settings = cli::resolve_settings(args, &config);

    let (Some(input), Some(output)) = (args.input.clone(), args.output.clone()) else {
        Args::command()
            .error(ErrorKind::MissingRequiredArgument, "--input and --output are required")
            .exit();
    };

    log::debug!("Input file is {}", input.display());
    log::debug!("Output file is {}", output.display());
    log::debug!("Settings: {:?}", settings);

    let job = ConvertJob {
        input,
        output,
        preview: args.output_img.clone(),
        settings,
    };
    let bitmap = pipeline::run(&job)?;
    log::info!(
        "Done: {} columns of {} rows written to {}",
        bitmap.width,
        bitmap.height,
        job.output.display()
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match &args.command {
        Some(Command::Config { action }) => {
            cli::handle_config_action(action.clone(), args.config.as_deref()).map_err(ConvertError::from)
        }
        None => run_convert(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_enables_crate_trace() {
        let filter = default_log_filter(true);
        assert!(filter.split(',').any(|d| d == "bayer_bitmap=trace"));
        assert_eq!(default_log_filter(false), "info");
    }
}
