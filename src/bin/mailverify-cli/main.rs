mod args;
mod output;

use anyhow::{Context, Result};
use mailverify_lib::{
    SmtpStatus, Verdict, Verifier, check_mx, check_syntax, probe_with_options,
    suggest_correction_with,
};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};
use output::{MxReport, SuggestionReport, SyntaxReport};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.output_format()?;
    let options = cli.options().context("load options")?;

    // codes de sortie : 0 valide, 2 invalide, 3 inconnu, 1 fatal
    let code = match &cli.cmd {
        Commands::Verify { email } => {
            let result = Verifier::system(options).verify(email);
            output::emit(format, &result, output::human_verification)?;
            match result.result {
                Verdict::Valid => 0,
                Verdict::Invalid => 2,
                Verdict::Unknown => 3,
            }
        }
        Commands::Syntax { email } => {
            let report = match check_syntax(email) {
                Ok(()) => SyntaxReport {
                    email: email.clone(),
                    valid: true,
                    reason: None,
                },
                Err(reason) => SyntaxReport {
                    email: email.clone(),
                    valid: false,
                    reason: Some(reason.to_string()),
                },
            };
            output::emit(format, &report, output::human_syntax)?;
            if report.valid { 0 } else { 2 }
        }
        Commands::Suggest { email } => {
            let report = SuggestionReport {
                email: email.clone(),
                did_you_mean: suggest_correction_with(email, &options.reference_domains),
            };
            output::emit(format, &report, output::human_suggestion)?;
            0
        }
        Commands::Mx { domain } => {
            let status = check_mx(domain).with_context(|| format!("resolve MX for {domain}"))?;
            let report = MxReport {
                domain: domain.clone(),
                status,
            };
            output::emit(format, &report, output::human_mx)?;
            0
        }
        Commands::Probe { host, email } => {
            let outcome = probe_with_options(host, email, &options.probe);
            output::emit(format, &outcome, output::human_outcome)?;
            match outcome.status {
                SmtpStatus::Accepted => 0,
                SmtpStatus::Rejected => 2,
                SmtpStatus::Greylisted | SmtpStatus::Timeout | SmtpStatus::Error => 3,
            }
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
