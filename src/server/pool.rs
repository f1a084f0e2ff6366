//! # Pool de Workers
//! src/server/pool.rs
//!
//! Número fijo de threads que atienden conexiones. La cola tiene tantos
//! lugares como workers: con todo ocupado, `execute` bloquea al que
//! acepta y las conexiones nuevas esperan en el backlog del kernel. Nunca
//! se crea un thread extra.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error};

/// Trabajo que ejecuta un worker (normalmente, atender una conexión)
type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Error)]
pub enum PoolError {
    /// La cola ya no acepta trabajos (el pool se está cerrando)
    #[error("worker pool is shut down")]
    Closed,
}

/// Pool de tamaño fijo
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    busy: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Inicia `size` workers con nombre `worker-N`
    ///
    /// # Errores
    ///
    /// `size == 0` o si el sistema no puede crear un thread.
    pub fn new(size: usize) -> io::Result<Self> {
        if size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "worker pool needs at least one worker",
            ));
        }

        let (sender, receiver) = bounded::<Job>(size);
        let busy = Arc::new(AtomicUsize::new(0));
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let receiver = receiver.clone();
            let busy = Arc::clone(&busy);
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || Self::worker_loop(id, receiver, busy))?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
            busy,
        })
    }

    /// Encola un trabajo; lo toma el primer worker libre
    ///
    /// Bloquea mientras la cola esté llena.
    pub fn execute<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolError::Closed)?;
        sender.send(Box::new(job)).map_err(|_| PoolError::Closed)
    }

    /// Cantidad de workers del pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Workers ejecutando un trabajo en este momento
    pub fn busy(&self) -> usize {
        self.busy.load(Ordering::SeqCst)
    }

    /// Trabajos esperando un worker libre
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    /// Loop principal del worker
    ///
    /// Termina cuando se cierra la cola y ya no quedan trabajos.
    fn worker_loop(id: usize, receiver: Receiver<Job>, busy: Arc<AtomicUsize>) {
        debug!(worker = id, "worker started");

        for job in receiver.iter() {
            busy.fetch_add(1, Ordering::SeqCst);
            // Un handler que hace panic no se lleva al worker con él
            if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                error!(worker = id, "job panicked; worker keeps running");
            }
            busy.fetch_sub(1, Ordering::SeqCst);
        }

        debug!(worker = id, "worker stopped");
    }
}

impl Drop for WorkerPool {
    /// Cierra la cola y espera a que los workers vacíen lo pendiente
    fn drop(&mut self) {
        drop(self.sender.take());

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("worker thread panicked outside a job");
            }
        }
    }
}
