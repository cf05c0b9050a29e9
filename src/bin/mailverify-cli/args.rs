use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use mailverify_lib::VerifyOptions;

#[derive(Parser)]
#[command(name = "mailverify-cli", version)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// format: human|json
    #[arg(long, default_value = "human", global = true)]
    pub format: String,

    /// fichier de configuration TOML (feature `with-config`)
    #[cfg(feature = "with-config")]
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// budget de la session SMTP (ms)
    #[arg(long = "timeout", global = true)]
    pub timeout_ms: Option<u64>,

    /// nom utilisé pour EHLO/HELO
    #[arg(long, global = true)]
    pub helo: Option<String>,

    /// enveloppe MAIL FROM
    #[arg(long = "from", global = true)]
    pub mail_from: Option<String>,

    /// port SMTP (25 par défaut)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// -v: info, -vv: debug (sinon RUST_LOG, par défaut warn)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// pipeline complet : syntaxe, faute de frappe, MX, sonde SMTP
    Verify { email: String },
    /// contrôle de syntaxe seul
    Syntax { email: String },
    /// suggestion de domaine fournisseur
    Suggest { email: String },
    /// enregistrements MX d'un domaine
    Mx { domain: String },
    /// une sonde SMTP contre un hôte donné
    Probe { host: String, email: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        format_from_str(&self.format)
    }

    /// Config file (if any) first, then command-line overrides.
    pub fn options(&self) -> Result<VerifyOptions> {
        #[cfg(feature = "with-config")]
        let mut options = match &self.config {
            Some(path) => VerifyOptions::load(path)?,
            None => VerifyOptions::default(),
        };
        #[cfg(not(feature = "with-config"))]
        let mut options = VerifyOptions::default();

        if let Some(timeout_ms) = self.timeout_ms {
            options.probe.timeout_ms = timeout_ms;
        }
        if let Some(helo) = &self.helo {
            options.probe.helo_domain = helo.clone();
        }
        if let Some(mail_from) = &self.mail_from {
            options.probe.mail_from = mail_from.clone();
        }
        if let Some(port) = self.port {
            options.probe.port = port;
        }
        Ok(options)
    }
}

pub fn format_from_str(s: &str) -> Result<OutputFormat> {
    match s {
        "human" => Ok(OutputFormat::Human),
        "json" => Ok(OutputFormat::Json),
        other => bail!("unknown --format '{other}', use: human|json"),
    }
}
