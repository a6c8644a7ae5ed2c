//! # Async Chunker
//!
//! A single worker thread fed through an MPSC channel. Requests go out with
//! [`AsyncChunker::request`]; results come back through a second channel and
//! are drained without blocking by [`AsyncChunker::poll_completed`].
//!
//! ## Task Lifecycle
//! 1. The world loads a chunk and publishes a request for its voxels
//! 2. The worker calls [`VoxelSource::populate`] off the main thread
//! 3. The result is sent back and waits in the result channel
//! 4. The world's async stage drains the channel and applies the data
//!
//! Dropping the chunker closes the request channel, which ends the worker loop.

use std::sync::{
    mpsc::{channel, Receiver, Sender, TryRecvError},
    Arc,
};
use std::thread::{self, JoinHandle};

use cgmath::Point3;

use crate::engine_state::voxels::{voxel::Voxel, world::grid::ChunkId};

/// Supplies voxel data for a chunk that has just been loaded.
///
/// Implementations run on the chunker's worker thread.
pub trait VoxelSource: Send + Sync {
    /// Returns the `chunk_edge³` voxels of the chunk at grid `position`, in storage order.
    fn populate(&self, position: Point3<i32>, chunk_edge: usize) -> Vec<Voxel>;
}

/// A request sent to the worker.
#[derive(Debug)]
struct ChunkRequest {
    chunk: ChunkId,
    position: Point3<i32>,
    chunk_edge: usize,
}

/// Voxel data produced by the worker for one chunk.
#[derive(Debug)]
pub struct ChunkPopulation {
    /// The chunk the data belongs to
    pub chunk: ChunkId,
    /// Voxels in storage order
    pub voxels: Vec<Voxel>,
}

/// Hands chunk population work to a background thread.
#[derive(Debug)]
pub struct AsyncChunker {
    request_sender: Sender<ChunkRequest>,
    result_receiver: Receiver<ChunkPopulation>,
    num_requests_in_flight: usize,
    _worker: JoinHandle<()>,
}

impl AsyncChunker {
    /// Spawns the worker thread around `source`.
    pub fn new(source: Arc<dyn VoxelSource>) -> Self {
        let (request_tx, request_rx) = channel::<ChunkRequest>();
        let (result_tx, result_rx) = channel::<ChunkPopulation>();

        let worker = thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let voxels = source.populate(request.position, request.chunk_edge);
                let result = ChunkPopulation {
                    chunk: request.chunk,
                    voxels,
                };
                if result_tx.send(result).is_err() {
                    break;
                }
            }
        });

        log::info!("Async chunker worker started");

        AsyncChunker {
            request_sender: request_tx,
            result_receiver: result_rx,
            num_requests_in_flight: 0,
            _worker: worker,
        }
    }

    /// Publishes a population request. Returns `false` if the worker has stopped.
    pub fn request(&mut self, chunk: ChunkId, position: Point3<i32>, chunk_edge: usize) -> bool {
        let request = ChunkRequest {
            chunk,
            position,
            chunk_edge,
        };
        match self.request_sender.send(request) {
            Ok(()) => {
                self.num_requests_in_flight += 1;
                true
            }
            Err(_) => {
                log::warn!("Async chunker worker is gone, dropping request for {chunk:?}");
                false
            }
        }
    }

    /// Collects every finished result without blocking.
    ///
    /// If the worker has died (a [`VoxelSource`] panicked), the requests it
    /// still owed are forgotten so the chunker does not report work forever.
    pub fn poll_completed(&mut self) -> Vec<ChunkPopulation> {
        let mut completed = Vec::new();
        loop {
            match self.result_receiver.try_recv() {
                Ok(result) => {
                    self.num_requests_in_flight = self.num_requests_in_flight.saturating_sub(1);
                    completed.push(result);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.num_requests_in_flight > 0 {
                        log::warn!(
                            "Async chunker worker stopped with {} requests in flight",
                            self.num_requests_in_flight
                        );
                        self.num_requests_in_flight = 0;
                    }
                    break;
                }
            }
        }
        completed
    }

    /// Number of requests published but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.num_requests_in_flight
    }
}
