//! seedscan: recover a BIP-39 phrase from partial knowledge
//!
//! Run with:
//! ```bash
//! cargo run --bin seedscan -- combos --job demos/blockstream_job.json
//! cargo run --bin seedscan -- search --job demos/blockstream_job.json --retries 2
//! cargo run --bin seedscan -- check --phrase "abandon ... about"
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use btc_seedscan::{
    bip39::{Language, Mnemonic, Wordlist},
    config::SearchConfig,
    ledger::{esplora::BLOCKSTREAM_URL, EsploraClient, Retrying},
    search::{self, SearchReport, Searcher}
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seedscan")]
#[command(about = "Find the funded BIP-39 phrase among partially known candidates")]
struct Cli {
    /// Wordlist file, one word per line (defaults to the embedded English list)
    #[arg(long, global = true)]
    wordlist: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the checksum-valid candidates of a job
    Combos {
        #[arg(long)]
        job: PathBuf,
    },
    /// Derive addresses for every valid candidate and look them up
    Search {
        #[arg(long)]
        job: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },
    /// Check complete phrases directly
    Check {
        /// A full phrase, repeatable
        #[arg(long = "phrase", required = true)]
        phrases: Vec<String>,

        /// Ledger base URL
        #[arg(long, default_value = BLOCKSTREAM_URL)]
        ledger_url: String,

        #[arg(long, default_value = "3")]
        max_addresses: u32,

        #[arg(long, default_value = "")]
        passphrase: String,

        #[arg(long, default_value = "20")]
        timeout_secs: u64,

        #[arg(long, default_value = "0")]
        retries: u32,
    },
}

/// Overrides for the tuning fields of a job file
#[derive(Args, Debug)]
struct Tuning {
    #[arg(long)]
    ledger_url: Option<String>,
    #[arg(long)]
    max_addresses: Option<u32>,
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    max_in_flight: Option<usize>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    retries: Option<u32>,
    #[arg(long)]
    passphrase: Option<String>,
}

impl Tuning {
    fn apply(self, config: &mut SearchConfig) {
        if let Some(x) = self.ledger_url { config.ledger_url = x; }
        if let Some(x) = self.max_addresses { config.max_addresses = x; }
        if let Some(x) = self.workers { config.workers = x; }
        if let Some(x) = self.max_in_flight { config.max_in_flight = x; }
        if let Some(x) = self.timeout_secs { config.timeout_secs = x; }
        if let Some(x) = self.retries { config.retries = x; }
        if let Some(x) = self.passphrase { config.passphrase = x; }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let wordlist = Arc::new(match &cli.wordlist {
        Some(path) => Wordlist::from_file(path)
            .with_context(|| format!("loading wordlist {}", path.display()))?,
        None => Language::English.word_list().clone(),
    });

    match cli.command {
        Command::Combos { job } => {
            let config = SearchConfig::from_file(&job)
                .with_context(|| format!("loading job {}", job.display()))?;
            let set = config.candidate_set(&wordlist)?;

            let mut valid = 0u64;
            for mnemonic in search::valid_candidates(&set, &wordlist) {
                println!("{}", mnemonic);
                valid += 1;
            }
            match set.len() {
                Some(total) => println!("\n{} of {} candidates are valid", valid, total),
                None => println!("\n{} valid candidates", valid),
            }
            Ok(())
        }
        Command::Search { job, tuning } => {
            let mut config = SearchConfig::from_file(&job)
                .with_context(|| format!("loading job {}", job.display()))?;
            tuning.apply(&mut config);
            let set = config.candidate_set(&wordlist)?;
            tracing::info!(candidates = ?set.len(), ledger = %config.ledger_url, "Job loaded");

            let searcher = searcher(wordlist, &config)?;
            let report = run(&searcher, &set, config.max_addresses).await?;
            finish(&report)
        }
        Command::Check { phrases, ledger_url, max_addresses, passphrase, timeout_secs, retries } => {
            let mut candidates: Vec<Vec<String>> = vec![];
            for phrase in &phrases {
                match Mnemonic::from_phrase(phrase, &wordlist) {
                    Ok(_) => candidates.push(phrase.split_whitespace().map(String::from).collect()),
                    Err(e) => println!("[!] Invalid phrase '{}': {}", phrase, e),
                }
            }

            let config = SearchConfig {
                template: String::new(),
                choices: vec![],
                max_addresses,
                passphrase,
                ledger_url,
                workers: 1,
                max_in_flight: 1,
                timeout_secs,
                retries,
            };
            let searcher = searcher(wordlist, &config)?;
            let report = run(&searcher, candidates, max_addresses).await?;
            finish(&report)
        }
    }
}

fn searcher(
    wordlist: Arc<Wordlist>,
    config: &SearchConfig,
) -> anyhow::Result<Searcher<Retrying<EsploraClient>>> {
    let client = EsploraClient::new(config.ledger_url.as_str(), config.timeout())?;
    let lookup = Retrying::new(client, config.retry_policy());
    Ok(Searcher::new(wordlist, Arc::new(lookup), config.search_options()))
}

/// Runs a search with Ctrl-C wired to cancellation.
async fn run<I>(
    searcher: &Searcher<Retrying<EsploraClient>>,
    candidates: I,
    max_addresses: u32,
) -> anyhow::Result<SearchReport>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let cancel = searcher.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping search");
            cancel.cancel();
        }
    });

    let report = searcher.search(candidates, max_addresses).await;
    ctrl_c.abort();
    Ok(report?)
}

fn finish(report: &SearchReport) -> anyhow::Result<()> {
    print_report(report);
    if report.cancelled {
        anyhow::bail!("search was halted before every candidate was checked");
    }
    Ok(())
}

fn print_report(report: &SearchReport) {
    for summary in &report.per_mnemonic {
        if summary.hits().next().is_some() {
            continue;
        }
        println!(
            "[?] {}: no funded address in {} checked, {} lookups failed",
            summary.mnemonic,
            summary.addresses.len(),
            summary.unknown()
        );
    }
    if report.candidates_clean > 0 {
        println!("[-] {} phrases had no funded address", report.candidates_clean);
    }

    println!();
    for hit in &report.hits {
        println!("[+] Funded address found");
        println!("    Phrase:  {}", hit.mnemonic);
        println!("    Address: {} (m/44'/0'/0'/0/{})", hit.address, hit.index);
        println!("    Funded:  {} sat", hit.funded);
    }

    println!(
        "\n{} candidates, {} valid, {} addresses checked, {} funded, {} failed lookups",
        report.candidates_seen,
        report.candidates_valid,
        report.addresses_checked,
        report.hits.len(),
        report.lookup_failures
    );
    if report.cancelled {
        println!("Search halted before completion");
    }
}
