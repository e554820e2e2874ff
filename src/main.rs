use clap::Parser;
use html_test_report::cli::commands::{cmd_run, cmd_template};
use html_test_report::cli::config::{Cli, Commands, ReportOverrides, load_config};
use html_test_report::cli::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run {
            input,
            title,
            test_id,
            output,
            template,
        } => {
            let overrides = ReportOverrides {
                title: title.as_deref(),
                test_id: test_id.as_deref(),
                output: output.as_deref(),
                template: template.as_deref(),
            };
            let all_passed = cmd_run(input.as_deref(), &overrides, &config)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Template { output } => {
            cmd_template(output.as_deref())?;
        }
    }

    Ok(())
}
