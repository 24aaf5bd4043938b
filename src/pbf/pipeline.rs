// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Component E: the pipeline orchestrator. Drives the frame reader on its
//! own thread, hands blob payloads to a bounded `crossbeam_channel` queue,
//! and runs B→C→D on a pool of worker threads, publishing the first error
//! through a single-slot [OnceLock].

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;

use protobuf::Message;

use crate::config::Options;
use crate::error::Error;
use crate::model::EntitySink;
use crate::pbf::frame::{Frame, FrameReader};
use crate::pbf::info::{NoMetadata, WithMetadata};
use crate::pbf::proto::osmformat;

const HEADER_BLOCK_TYPE: &str = "OSMHeader";

/// Publishes the pipeline's first error, first-writer-wins, and flips the
/// cooperative cancellation flag the reader and workers poll between units
/// of work.
struct ErrorPublisher {
    slot: OnceLock<Error>,
    cancelled: AtomicBool,
}

impl ErrorPublisher {
    fn new() -> Self {
        Self {
            slot: OnceLock::new(),
            cancelled: AtomicBool::new(false),
        }
    }

    fn publish(&self, err: Error) {
        let _ = self.slot.set(err);
        self.cancelled.store(true, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn into_result(self) -> Result<(), Error> {
        match self.slot.into_inner() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Decodes `source` and delivers every node/way/relation it contains to
/// `sink`, per `spec.md` §4.E. Blocks until the whole stream is consumed or
/// the first fatal error is observed.
pub fn parse<R, S>(mut source: R, sink: &S, options: &Options) -> Result<(), Error>
where
    R: Read + Send,
    S: EntitySink + Sync,
{
    let mut reader = FrameReader::new(&mut source);

    let first = reader
        .next_frame()?
        .ok_or_else(|| io_eof_error("empty input: no OSMHeader block"))?;
    if first.block_type != HEADER_BLOCK_TYPE {
        return Err(Error::UnexpectedBlobHeaderType {
            got: first.block_type,
            expected: HEADER_BLOCK_TYPE,
        });
    }
    // The contents of the header block (bounding box, required features) are
    // presently ignored, per `spec.md` §4.E.1: any required feature is
    // silently accepted rather than validated against an allowlist.
    log::debug!("header block accepted, starting {} worker(s)", options.workers);

    let errors = Arc::new(ErrorPublisher::new());
    let (tx, rx) = crossbeam_channel::bounded::<Frame>(options.queue_size);

    thread::scope(|scope| {
        let reader_errors = Arc::clone(&errors);
        scope.spawn(move || {
            let mut frames_read: u64 = 0;
            loop {
                if reader_errors.is_cancelled() {
                    break;
                }
                match reader.next_frame() {
                    Ok(Some(frame)) => {
                        frames_read += 1;
                        log::trace!(
                            "read frame {frames_read} (type {:?}, {} compressed bytes)",
                            frame.block_type,
                            frame.blob.compute_size()
                        );
                        if tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        log::debug!("reader reached end of stream after {frames_read} frame(s)");
                        break;
                    }
                    Err(e) => {
                        reader_errors.publish(e);
                        break;
                    }
                }
            }
            // dropping `tx` here (end of scope) closes the channel
        });

        for worker_id in 0..options.workers.max(1) {
            let rx = rx.clone();
            let worker_errors = Arc::clone(&errors);
            scope.spawn(move || {
                while let Ok(frame) = rx.recv() {
                    if worker_errors.is_cancelled() {
                        break;
                    }
                    if let Err(e) = decode_frame(&frame, sink, options.with_metadata) {
                        log::warn!("worker {worker_id} failed decoding a block: {e}");
                        worker_errors.publish(e);
                        break;
                    }
                }
            });
        }
    });

    Arc::try_unwrap(errors)
        .unwrap_or_else(|_| unreachable!("all worker threads have joined"))
        .into_result()
}

fn decode_frame<S: EntitySink>(frame: &Frame, sink: &S, with_metadata: bool) -> Result<(), Error> {
    let bytes = crate::pbf::blob::inflate(&frame.blob)?;
    if with_metadata {
        crate::pbf::block::decode_block::<WithMetadata, S>(&bytes, sink)
    } else {
        crate::pbf::block::decode_block::<NoMetadata, S>(&bytes, sink)
    }
}

fn io_eof_error(msg: &str) -> Error {
    std::io::Error::new(std::io::ErrorKind::UnexpectedEof, msg.to_string()).into()
}
