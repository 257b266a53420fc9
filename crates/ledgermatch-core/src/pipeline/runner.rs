//! Pipeline driver: one full reconcile cycle with per-document isolation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

use crate::decode::{DecodedArtifact, HtmlDecoder, OcrHandle, PdfDecoder};
use crate::error::{EngineError, LedgerError, Result};
use crate::ledger::{EntityResolver, LedgerProvider};
use crate::models::{EngineConfig, OriginKind, ParsedReceipt, Receipt, SyncStatus};
use crate::parse::parse_artifact;
use crate::pipeline::sync::SyncOrchestrator;
use crate::source::{DocumentRef, SourceDocument, SourceProvider};
use crate::vendor::detect;

/// Counters and results for one pipeline cycle.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// False when another cycle was already running and this trigger was a
    /// no-op.
    pub ran: bool,
    /// Unprocessed documents fetched at cycle start.
    pub fetched: usize,
    /// Receipts reconciled against an existing ledger transaction.
    pub matched: usize,
    /// Receipts synced as newly created expenses.
    pub synced: usize,
    /// Documents that decoded but produced no actionable parse.
    pub parse_miss: usize,
    /// Documents skipped on decode errors, left unmarked for retry.
    pub decode_skipped: usize,
    /// Documents that failed during resolve/sync.
    pub failed: usize,
    /// Set when an authentication failure aborted the remaining batch.
    pub aborted: Option<String>,
    /// Every receipt created this cycle.
    pub receipts: Vec<Receipt>,
}

/// Drives fetch -> detect -> decode -> parse -> build -> resolve -> sync for
/// each unprocessed document, isolating per-document failures so one bad
/// document never aborts the batch.
pub struct ReconcilePipeline<S, L> {
    source: S,
    ledger: L,
    ocr: OcrHandle,
    resolver: EntityResolver,
    config: EngineConfig,
    running: Arc<AtomicBool>,
}

impl<S: SourceProvider, L: LedgerProvider> ReconcilePipeline<S, L> {
    pub fn new(config: EngineConfig, source: S, ledger: L, ocr: OcrHandle) -> Self {
        Self {
            source,
            ledger,
            ocr,
            resolver: EntityResolver::new(),
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The run guard. Concurrent triggers (scheduled tick vs manual) collapse
    /// to at most one running cycle; the loser returns immediately.
    pub fn guard(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Release the OCR engine and hand the providers back.
    pub fn shutdown(mut self) -> (S, L) {
        self.ocr.shutdown();
        (self.source, self.ledger)
    }

    /// Run one cycle. A cycle already in progress makes this trigger a
    /// no-op, not a queued retry.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let mut outcome = CycleOutcome::default();

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!("cycle already in progress, trigger is a no-op");
            return Ok(outcome);
        }
        outcome.ran = true;

        let result = self.cycle_inner(&mut outcome);
        self.running.store(false, Ordering::SeqCst);
        result.map(|()| outcome)
    }

    fn cycle_inner(&mut self, outcome: &mut CycleOutcome) -> Result<()> {
        // Entity caches are scoped to one run; the ledger may have changed
        // since the last cycle.
        self.resolver.reset();

        let refs = self.source.list_unprocessed().map_err(EngineError::from)?;
        outcome.fetched = refs.len();
        info!("cycle start: {} unprocessed documents", refs.len());

        for doc_ref in refs {
            match self.process_document(&doc_ref, outcome) {
                Ok(()) => {}
                Err(e) if e.aborts_batch() => {
                    error!("authentication failure, aborting remaining batch: {e}");
                    outcome.failed += 1;
                    outcome.aborted = Some(e.to_string());
                    break;
                }
                Err(e) => {
                    warn!("document {} failed: {e}", doc_ref.id);
                    outcome.failed += 1;
                }
            }
        }

        info!(
            "cycle done: {} matched, {} synced, {} parse misses, {} skipped, {} failed",
            outcome.matched,
            outcome.synced,
            outcome.parse_miss,
            outcome.decode_skipped,
            outcome.failed
        );
        Ok(())
    }

    fn process_document(
        &mut self,
        doc_ref: &DocumentRef,
        outcome: &mut CycleOutcome,
    ) -> Result<()> {
        let doc = self.source.fetch(doc_ref).map_err(EngineError::from)?;

        let snippet: String = doc
            .text
            .as_deref()
            .or(doc.html.as_deref())
            .unwrap_or("")
            .chars()
            .take(400)
            .collect();
        let profile = detect(&doc.sender, &doc.subject, &snippet);

        let (artifact, origin) = match self.decode_document(&doc) {
            Ok(decoded) => decoded,
            Err(e @ (EngineError::Decode(_) | EngineError::Ocr(_))) => {
                // Unreadable artifact: skip and leave the document unmarked
                // so the next cycle retries it.
                warn!("document {} not decodable: {e}", doc_ref.id);
                outcome.decode_skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let parsed = parse_artifact(&artifact, doc.html.as_deref(), profile);

        let (vendor_id, vendor_name, category) = match profile {
            Some(p) => (
                Some(p.id.as_str().to_string()),
                p.ledger_vendor_name.to_string(),
                p.expense_category.to_string(),
            ),
            None => (
                None,
                fallback_vendor_name(&doc),
                self.config.sync.default_category.clone(),
            ),
        };

        let actionable = parsed.as_ref().is_some_and(ParsedReceipt::is_actionable);
        let mut receipt = Receipt::from_parsed(
            doc_ref.id.clone(),
            origin,
            vendor_id,
            vendor_name,
            category,
            self.config.sync.default_job.clone(),
            parsed.unwrap_or_default(),
        );
        receipt.attachments = doc
            .attachments
            .iter()
            .map(|a| a.file_name.clone())
            .collect();

        if !actionable {
            receipt.note("no parser produced a usable total or date; left for manual review");
            outcome.parse_miss += 1;
            self.mark_processed_nonfatal(doc_ref);
            outcome.receipts.push(receipt);
            return Ok(());
        }

        let orchestrator = SyncOrchestrator::new(&self.config.matching);
        let sync_result = orchestrator.sync(
            &mut receipt,
            &doc.attachments,
            &mut self.ledger,
            &mut self.resolver,
        );

        match sync_result {
            Ok(()) => {
                if receipt.sync_status == SyncStatus::Matched {
                    outcome.matched += 1;
                } else {
                    outcome.synced += 1;
                }
                self.mark_processed_nonfatal(doc_ref);
                outcome.receipts.push(receipt);
                Ok(())
            }
            Err(e @ LedgerError::Auth(_)) => {
                // Left unmarked: nothing was written, the next cycle retries.
                outcome.receipts.push(receipt);
                Err(EngineError::Ledger(e))
            }
            Err(e) => {
                // The receipt is in `error` for operator visibility; the
                // document is consumed and re-drives are manual.
                self.mark_processed_nonfatal(doc_ref);
                outcome.receipts.push(receipt);
                Err(EngineError::Ledger(e))
            }
        }
    }

    fn decode_document(&mut self, doc: &SourceDocument) -> Result<(DecodedArtifact, OriginKind)> {
        if let Some(attachment) = doc.attachments.iter().find(|a| a.is_pdf()) {
            let artifact = PdfDecoder::new(&self.config.pdf).decode(&attachment.content)?;
            return Ok((artifact, OriginKind::PdfAttachment));
        }

        if let Some(attachment) = doc.attachments.iter().find(|a| a.is_image()) {
            let artifact = self.ocr.decode(&attachment.content)?;
            return Ok((artifact, OriginKind::ImageAttachment));
        }

        if let Some(html) = &doc.html {
            return Ok((HtmlDecoder::new().decode(html), OriginKind::EmailHtml));
        }

        let text = doc.text.clone().unwrap_or_default();
        Ok((DecodedArtifact::from_text(text), OriginKind::EmailText))
    }

    fn mark_processed_nonfatal(&mut self, doc_ref: &DocumentRef) {
        if let Err(e) = self.source.mark_processed(doc_ref) {
            warn!("failed to mark {} processed: {e}", doc_ref.id);
        }
    }
}

/// Display name for a vendor the registry does not know: the sender domain
/// when one exists.
fn fallback_vendor_name(doc: &SourceDocument) -> String {
    doc.sender
        .rsplit('@')
        .next()
        .filter(|domain| !domain.is_empty() && *domain != doc.sender)
        .map(|domain| domain.to_string())
        .unwrap_or_else(|| "Unknown Vendor".to_string())
}
