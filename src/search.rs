/*
    Search orchestration.

    Candidates are pulled lazily, filtered by the BIP-39 checksum and handed
    to a bounded pool of workers. Each worker stretches the seed on the
    blocking pool, derives the external chain once, then walks the address
    indices and asks the ledger about each address.

    Two semaphores bound the work: one caps concurrent candidate pipelines,
    the other caps outstanding ledger requests. A candidate is only pulled
    once a pipeline permit is free, so memory stays flat no matter how large
    the candidate product is. The report follows the same rule: candidates
    whose addresses all came back empty are logged and counted, only those
    with a hit or a failed lookup are kept.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{watch, Mutex, Semaphore};
use tokio::task::JoinSet;

use crate::{
    address::Address,
    bip39::{Mnemonic, Wordlist},
    hdwallet::AccountChain,
    ledger::{BalanceLookup, Funding},
    error::{LookupError, SearchError}
};

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Candidate pipelines running at once
    pub workers: usize,
    /// Ledger requests outstanding at once
    pub max_in_flight: usize,
    pub passphrase: String,
    /// BIP-44 account, 0 for the first account
    pub account: u32
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            workers: 8,
            max_in_flight: 4,
            passphrase: String::new(),
            account: 0
        }
    }
}

/**
    Cooperative stop signal shared between the caller and the workers.
    Once cancelled it stays cancelled.
*/
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`CancelHandle::cancel`] has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        //The sender lives in self, so wait_for can only end on a cancel
        let _ = rx.wait_for(|c| *c).await;
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A funded address and the phrase it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub mnemonic: Mnemonic,
    pub address: Address,
    pub index: u32,
    pub funded: u64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressOutcome {
    pub index: u32,
    pub address: Address,
    pub funding: Funding
}

/// Everything learnt about one checksum-valid candidate.
#[derive(Debug, Clone)]
pub struct MnemonicSummary {
    /// Position of the candidate in the enumeration, counting invalid ones
    pub sequence: u64,
    pub mnemonic: Mnemonic,
    pub addresses: Vec<AddressOutcome>
}

impl MnemonicSummary {
    pub fn hits(&self) -> impl Iterator<Item = &AddressOutcome> {
        self.addresses.iter().filter(|a| a.funding.is_hit())
    }

    /// Addresses whose funding could not be determined.
    pub fn unknown(&self) -> usize {
        self.addresses
            .iter()
            .filter(|a| matches!(a.funding, Funding::Unknown(_)))
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    /// Funded addresses in discovery order
    pub hits: Vec<SearchResult>,
    pub candidates_seen: u64,
    pub candidates_valid: u64,
    /// Valid candidates whose every checked address was empty
    pub candidates_clean: u64,
    pub addresses_checked: u64,
    /// Candidates with a hit or a failed lookup, in enumeration order
    pub per_mnemonic: Vec<MnemonicSummary>,
    pub lookup_failures: u64,
    pub cancelled: bool
}

impl SearchReport {
    fn assemble(mut summaries: Vec<MnemonicSummary>, counts: Counts, cancelled: bool) -> Self {
        summaries.sort_by_key(|s| s.sequence);

        let mut hits = vec![];
        let mut lookup_failures = 0u64;
        for summary in &summaries {
            for outcome in &summary.addresses {
                match outcome.funding {
                    Funding::Funded(funded) => hits.push(SearchResult {
                        mnemonic: summary.mnemonic.clone(),
                        address: outcome.address.clone(),
                        index: outcome.index,
                        funded
                    }),
                    Funding::Unknown(_) => lookup_failures += 1,
                    Funding::Empty => {}
                }
            }
        }

        Self {
            hits,
            candidates_seen: counts.seen,
            candidates_valid: counts.valid,
            candidates_clean: counts.clean,
            addresses_checked: counts.addresses,
            per_mnemonic: summaries,
            lookup_failures,
            cancelled
        }
    }
}

/**
    Checksum-only pass: the candidates that are valid mnemonics, in order.
*/
pub fn valid_candidates<'a, I>(candidates: I, wordlist: &'a Wordlist) -> impl Iterator<Item = Mnemonic> + 'a
where
    I: IntoIterator<Item = Vec<String>>,
    I::IntoIter: 'a
{
    candidates
        .into_iter()
        .filter_map(move |words| Mnemonic::from_words(&words, wordlist).ok())
}

struct Counts {
    seen: u64,
    valid: u64,
    clean: u64,
    addresses: u64
}

/// State shared by the workers of one search.
struct Run<L: ?Sized> {
    lookup: Arc<L>,
    in_flight: Semaphore,
    cancel: CancelHandle,
    passphrase: String,
    account: u32,
    max_addresses: u32,
    summaries: Mutex<Vec<MnemonicSummary>>,
    clean: AtomicU64,
    addresses: AtomicU64
}

pub struct Searcher<L: ?Sized> {
    wordlist: Arc<Wordlist>,
    lookup: Arc<L>,
    options: SearchOptions,
    cancel: CancelHandle
}

impl<L: BalanceLookup + ?Sized + 'static> Searcher<L> {
    pub fn new(wordlist: Arc<Wordlist>, lookup: Arc<L>, options: SearchOptions) -> Self {
        Self {
            wordlist,
            lookup,
            options,
            cancel: CancelHandle::new()
        }
    }

    /// Handle that stops this searcher from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn list_valid<I>(&self, candidates: I) -> Vec<Mnemonic>
    where
        I: IntoIterator<Item = Vec<String>>
    {
        valid_candidates(candidates, &self.wordlist).collect()
    }

    /**
        Runs the search over every candidate and the first `max_addresses`
        receiving addresses of each valid one.

        Invalid candidates and underivable indices are skipped, lookup failures
        are recorded as unknown. Only an encoding failure or a crashed worker
        ends the search early with an error.
    */
    pub async fn search<I>(&self, candidates: I, max_addresses: u32) -> Result<SearchReport, SearchError>
    where
        I: IntoIterator<Item = Vec<String>>
    {
        let run = Arc::new(Run {
            lookup: self.lookup.clone(),
            in_flight: Semaphore::new(self.options.max_in_flight.max(1)),
            cancel: self.cancel.clone(),
            passphrase: self.options.passphrase.clone(),
            account: self.options.account,
            max_addresses,
            summaries: Mutex::new(vec![]),
            clean: AtomicU64::new(0),
            addresses: AtomicU64::new(0)
        });
        let pipelines = Arc::new(Semaphore::new(self.options.workers.max(1)));

        tracing::info!(
            workers = self.options.workers,
            max_in_flight = self.options.max_in_flight,
            max_addresses,
            "Search started"
        );

        let mut candidates = candidates.into_iter();
        let mut tasks: JoinSet<Result<(), SearchError>> = JoinSet::new();
        let mut seen = 0u64;
        let mut valid = 0u64;

        'pull: loop {
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break 'pull,
                p = pipelines.clone().acquire_owned() => p.map_err(|e| SearchError::Worker(e.to_string()))?
            };

            let (sequence, mnemonic) = loop {
                if self.cancel.is_cancelled() {
                    break 'pull;
                }
                let words = match candidates.next() {
                    Some(w) => w,
                    None => break 'pull
                };
                seen += 1;

                match Mnemonic::from_words(&words, &self.wordlist) {
                    Ok(m) => break (seen - 1, m),
                    Err(e) => tracing::trace!(candidate = %words.join(" "), error = %e, "Candidate rejected")
                }
            };
            valid += 1;
            tracing::debug!(sequence, mnemonic = %mnemonic, "Valid candidate");

            //Surface fatal errors from finished workers before taking on more
            while let Some(done) = tasks.try_join_next() {
                flatten(done)?;
            }

            let run = run.clone();
            tasks.spawn(async move {
                let _permit = permit;
                scan(run, sequence, mnemonic).await
            });
        }

        while let Some(done) = tasks.join_next().await {
            flatten(done)?;
        }

        let cancelled = self.cancel.is_cancelled();
        let summaries = std::mem::take(&mut *run.summaries.lock().await);
        let counts = Counts {
            seen,
            valid,
            clean: run.clean.load(Ordering::SeqCst),
            addresses: run.addresses.load(Ordering::SeqCst)
        };
        let report = SearchReport::assemble(summaries, counts, cancelled);

        tracing::info!(
            candidates_seen = report.candidates_seen,
            candidates_valid = report.candidates_valid,
            candidates_clean = report.candidates_clean,
            hits = report.hits.len(),
            lookup_failures = report.lookup_failures,
            cancelled,
            "Search finished"
        );
        Ok(report)
    }
}

fn flatten(done: Result<Result<(), SearchError>, tokio::task::JoinError>) -> Result<(), SearchError> {
    match done {
        Ok(result) => result,
        Err(e) => Err(SearchError::Worker(e.to_string()))
    }
}

/**
    Pipeline for one valid candidate. The outcome is recorded even when the
    walk is cut short by cancellation.
*/
async fn scan<L: BalanceLookup + ?Sized>(run: Arc<Run<L>>, sequence: u64, mnemonic: Mnemonic) -> Result<(), SearchError> {
    let stretched = mnemonic.clone();
    let passphrase = run.passphrase.clone();
    let account = run.account;
    let chain = tokio::task::spawn_blocking(move || {
        let seed = stretched.to_seed(&passphrase);
        AccountChain::from_seed(&seed, account)
    })
    .await
    .map_err(|e| SearchError::Worker(e.to_string()))?;

    let mut addresses: Vec<AddressOutcome> = vec![];
    match chain {
        Ok(chain) => {
            for index in 0..run.max_addresses {
                if run.cancel.is_cancelled() {
                    break;
                }

                let key = match chain.address_key(index) {
                    Ok(k) => k,
                    Err(e) => {
                        tracing::warn!(mnemonic = %mnemonic, index, error = %e, "Skipping underivable index");
                        continue;
                    }
                };
                let address = Address::from_pubkey_bytes(&key.get_pub().as_bytes())
                    .map_err(|source| SearchError::Encoding {
                        phrase: mnemonic.phrase(),
                        index,
                        source
                    })?;

                let funding = match lookup(&run, &address).await {
                    Some(result) => Funding::from(result),
                    None => break
                };
                match &funding {
                    Funding::Funded(n) => {
                        tracing::info!(mnemonic = %mnemonic, address = %address, index, funded = n, "Funded address found")
                    },
                    Funding::Unknown(e) => {
                        tracing::warn!(address = %address, index, error = %e, "Lookup failed")
                    },
                    Funding::Empty => {
                        tracing::debug!(address = %address, index, "Never funded")
                    }
                }

                addresses.push(AddressOutcome { index, address, funding });
            }
        },
        Err(e) => {
            tracing::warn!(mnemonic = %mnemonic, error = %e, "Account chain not derivable, skipping candidate")
        }
    }

    run.addresses.fetch_add(addresses.len() as u64, Ordering::SeqCst);
    let notable = addresses
        .iter()
        .any(|a| !matches!(a.funding, Funding::Empty));
    if !notable {
        run.clean.fetch_add(1, Ordering::SeqCst);
        tracing::info!(mnemonic = %mnemonic, checked = addresses.len(), "No funded address");
        return Ok(());
    }

    run.summaries.lock().await.push(MnemonicSummary {
        sequence,
        mnemonic,
        addresses
    });
    Ok(())
}

/// One lookup under the in-flight cap. None when the search was cancelled first.
async fn lookup<L: BalanceLookup + ?Sized>(run: &Run<L>, address: &Address) -> Option<Result<u64, LookupError>> {
    tokio::select! {
        biased;
        _ = run.cancel.cancelled() => None,
        result = async {
            let _permit = run
                .in_flight
                .acquire()
                .await
                .map_err(|_| LookupError::Cancelled)?;
            run.lookup.lookup(address).await
        } => Some(result)
    }
}
