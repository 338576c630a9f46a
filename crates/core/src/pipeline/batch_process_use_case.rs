use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::io::domain::image_source::ImageSource;
use crate::io::domain::storage_sink::StorageSink;
use crate::pipeline::composite_crop_use_case::CompositeCropUseCase;
use crate::pipeline::detect_crop_use_case::DetectCropUseCase;
use crate::shared::crop_result::CropResult;
use crate::shared::error::PipelineError;

const DEFAULT_WORKERS: usize = 4;

/// Outcome for one image id. A sentinel detection is still a processed
/// item (the coordinates are worth persisting); only I/O failures land
/// in `Failed`.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemOutcome {
    Processed {
        crop: CropResult,
        /// Where the composited output went; `None` when detection
        /// returned the sentinel and there was nothing to composite.
        output_url: Option<String>,
    },
    Failed {
        error: String,
    },
}

#[derive(Clone, Debug)]
pub struct BatchItem {
    pub id: String,
    pub outcome: ItemOutcome,
}

/// End-of-batch accounting in the shape the caller persists:
/// per-image outcomes plus `processed`/`failed` totals.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub items: Vec<BatchItem>,
    pub processed: usize,
    pub failed: usize,
    /// Ids never attempted because the batch was cancelled.
    pub skipped: usize,
}

/// Runs fetch → detect → composite → store over a page of image ids
/// with a fixed pool of worker threads.
///
/// Invocations are independent and side-effect-free, so items complete
/// in any order; one image's failure never aborts the batch. Retry and
/// "mark processed" bookkeeping stay with the caller.
pub struct BatchProcessUseCase {
    source: Box<dyn ImageSource>,
    sink: Box<dyn StorageSink>,
    detector: DetectCropUseCase,
    compositor: CompositeCropUseCase,
    workers: usize,
    cancelled: Arc<AtomicBool>,
}

impl BatchProcessUseCase {
    pub fn new(
        source: Box<dyn ImageSource>,
        sink: Box<dyn StorageSink>,
        detector: DetectCropUseCase,
        compositor: CompositeCropUseCase,
        workers: Option<usize>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            source,
            sink,
            detector,
            compositor,
            workers: workers.unwrap_or(DEFAULT_WORKERS).max(1),
            cancelled: cancelled.unwrap_or_default(),
        }
    }

    pub fn execute(&self, ids: &[String]) -> BatchSummary {
        let (work_tx, work_rx) = crossbeam_channel::bounded::<(usize, String)>(self.workers * 2);
        let (done_tx, done_rx) = crossbeam_channel::unbounded::<(usize, BatchItem)>();

        let mut indexed: Vec<(usize, BatchItem)> = Vec::with_capacity(ids.len());

        std::thread::scope(|scope| {
            for _ in 0..self.workers {
                let work_rx = work_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    for (index, id) in work_rx.iter() {
                        if self.cancelled.load(Ordering::Relaxed) {
                            // Dropping our senders lets the feeder and
                            // collector wind down on their own.
                            return;
                        }
                        let outcome = self.process_one(&id);
                        if done_tx.send((index, BatchItem { id, outcome })).is_err() {
                            return;
                        }
                    }
                });
            }
            drop(done_tx);
            drop(work_rx);

            // Feed ids; a cancelled batch stops enqueueing new work.
            for (index, id) in ids.iter().enumerate() {
                if self.cancelled.load(Ordering::Relaxed) {
                    break;
                }
                if work_tx.send((index, id.clone())).is_err() {
                    break;
                }
            }
            drop(work_tx);

            for item in done_rx.iter() {
                indexed.push(item);
            }
        });

        // Completion order is arbitrary; report in submission order.
        indexed.sort_by_key(|(index, _)| *index);
        let items: Vec<BatchItem> = indexed.into_iter().map(|(_, item)| item).collect();

        let processed = items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Processed { .. }))
            .count();
        let failed = items.len() - processed;
        let skipped = ids.len() - items.len();
        log::info!("batch complete: processed {processed}, failed {failed}, skipped {skipped}");

        BatchSummary {
            items,
            processed,
            failed,
            skipped,
        }
    }

    fn process_one(&self, id: &str) -> ItemOutcome {
        match self.run_pipeline(id) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("processing {id} failed: {e}");
                ItemOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn run_pipeline(&self, id: &str) -> Result<ItemOutcome, PipelineError> {
        let bytes = self.source.fetch(id)?;
        let crop = self.detector.detect(&bytes)?;
        if crop.is_degenerate() {
            log::warn!("no clear subject in {id}; storing sentinel coordinates");
            return Ok(ItemOutcome::Processed {
                crop,
                output_url: None,
            });
        }

        let output = self.compositor.composite(&bytes, &crop)?;
        let url = self.sink.store(id, &output)?;
        Ok(ItemOutcome::Processed {
            crop,
            output_url: Some(url),
        })
    }
}
