use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::{Aligner, AlignerError, AlignmentResult, BatchConfig, Sequence};

struct WorkItem {
    index: usize,
    s: Sequence,
    t: Sequence,
}

struct WorkResult {
    index: usize,
    result: Result<AlignmentResult, AlignerError>,
}

/// Fixed pool of threads aligning independent pairs with one shared,
/// read-only [`Aligner`]. Every alignment allocates its own matrix.
pub struct BatchAligner {
    work_tx: Option<Sender<WorkItem>>,
    result_rx: Receiver<WorkResult>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl BatchAligner {
    pub fn new(aligner: Aligner, config: BatchConfig) -> Result<Self, AlignerError> {
        if config.workers == 0 {
            return Err(AlignerError::InvalidBatchConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        let (work_tx, work_rx) = bounded(config.queue_depth.max(1));
        let (result_tx, result_rx) = unbounded();
        let aligner = Arc::new(aligner);

        let mut workers = Vec::with_capacity(config.workers);
        for worker_id in 0..config.workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let aligner = Arc::clone(&aligner);
            let worker = thread::Builder::new()
                .name(format!("align-worker-{}", worker_id))
                .spawn(move || Self::worker(worker_id, aligner, work_rx, result_tx))?;
            workers.push(worker);
        }
        log::info!("started {} alignment workers", workers.len());

        Ok(Self {
            work_tx: Some(work_tx),
            result_rx,
            workers,
        })
    }

    fn worker(
        worker_id: usize,
        aligner: Arc<Aligner>,
        work_rx: Receiver<WorkItem>,
        result_tx: Sender<WorkResult>,
    ) {
        while let Ok(work) = work_rx.recv() {
            // A panic fails its own pair only; the worker keeps serving.
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                aligner.align_sequences(&work.s, &work.t)
            }))
            .unwrap_or_else(|payload| {
                let reason = panic_reason(payload.as_ref());
                log::error!("worker {} panicked on pair {}: {}", worker_id, work.index, reason);
                Err(AlignerError::WorkerError(format!(
                    "pair {} panicked: {}",
                    work.index, reason
                )))
            });
            if result_tx
                .send(WorkResult {
                    index: work.index,
                    result,
                })
                .is_err()
            {
                break;
            }
        }
        log::debug!("alignment worker {} exiting", worker_id);
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Aligns every pair and returns the results in input order. If any
    /// pair fails, the error of the earliest failing pair is returned.
    pub fn align_all(
        &mut self,
        pairs: Vec<(Sequence, Sequence)>,
    ) -> Result<Vec<AlignmentResult>, AlignerError> {
        let total = pairs.len();
        let work_tx = self
            .work_tx
            .as_ref()
            .ok_or_else(|| AlignerError::WorkerError("pool is shut down".to_string()))?;

        for (index, (s, t)) in pairs.into_iter().enumerate() {
            work_tx
                .send(WorkItem { index, s, t })
                .map_err(|e| AlignerError::WorkerError(e.to_string()))?;
        }

        // Drain everything submitted so no stale result leaks into the
        // next call, even when an early pair failed.
        let mut slots: Vec<Option<Result<AlignmentResult, AlignerError>>> =
            (0..total).map(|_| None).collect();
        for _ in 0..total {
            let done = self
                .result_rx
                .recv()
                .map_err(|e| AlignerError::WorkerError(e.to_string()))?;
            slots[done.index] = Some(done.result);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    Err(AlignerError::WorkerError(format!(
                        "no result for pair {}",
                        index
                    )))
                })
            })
            .collect()
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Drop for BatchAligner {
    fn drop(&mut self) {
        // Closing the queue stops the workers
        self.work_tx.take();

        while let Some(worker) = self.workers.pop() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlignerParameters, AlignmentMode};

    fn pool(workers: usize, params: AlignerParameters) -> BatchAligner {
        let aligner = Aligner::new(params).unwrap();
        let config = BatchConfig::new().with_workers(workers).unwrap();
        BatchAligner::new(aligner, config).unwrap()
    }

    #[test]
    fn results_come_back_in_input_order() {
        let mut batch = pool(3, AlignerParameters::new());
        let pairs: Vec<(Sequence, Sequence)> = (1..=12)
            .map(|n| (Sequence::from("A".repeat(n).as_str()), Sequence::from("A")))
            .collect();
        let results = batch.align_all(pairs).unwrap();
        assert_eq!(results.len(), 12);
        for (n, result) in (1..=12).zip(&results) {
            assert_eq!(result.aligned_s.len(), n);
            assert_eq!(result.score, 1 - 2 * (n as i32 - 1));
        }
    }

    #[test]
    fn pool_is_reusable() {
        let mut batch = pool(2, AlignerParameters::new().with_mode(AlignmentMode::Local));
        let first = batch
            .align_all(vec![(Sequence::from("ACGT"), Sequence::from("CG"))])
            .unwrap();
        assert_eq!(first[0].aligned_s, b"CG");
        let second = batch.align_all(Vec::new()).unwrap();
        assert!(second.is_empty());
        assert_eq!(batch.workers(), 2);
    }

    #[test]
    fn panicking_score_fn_fails_the_pair_not_the_pool() {
        let params = AlignerParameters::new().with_score_fn(|a, _| {
            if a == b'X' {
                panic!("unscorable symbol");
            }
            1
        });
        let mut batch = pool(2, params);
        let err = batch
            .align_all(vec![
                (Sequence::from("X"), Sequence::from("A")),
                (Sequence::from("A"), Sequence::from("A")),
            ])
            .unwrap_err();
        match err {
            AlignerError::WorkerError(msg) => {
                assert!(msg.contains("pair 0"));
                assert!(msg.contains("unscorable symbol"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let results = batch
            .align_all(vec![(Sequence::from("AA"), Sequence::from("AA"))])
            .unwrap();
        assert_eq!(results[0].score, 2);
        assert_eq!(batch.workers(), 2);
    }

    #[test]
    fn zero_workers_rejected() {
        let aligner = Aligner::new(AlignerParameters::new()).unwrap();
        let config = BatchConfig {
            workers: 0,
            queue_depth: 1,
        };
        assert!(matches!(
            BatchAligner::new(aligner, config),
            Err(AlignerError::InvalidBatchConfig(_))
        ));
    }
}
