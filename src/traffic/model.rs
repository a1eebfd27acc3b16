//! Erasure-coded data-flow model
//!
//! Ingress: the client volume lands evenly on every stripe member. Each
//! member then writes its share to the whole stripe as `n` chunks of
//! `share / (n - parity)`, keeping its own chunk local.
//!
//! Egress: each member serves an even share to the client. To rebuild it, it
//! reads `n - parity` chunks from a shuffled choice of stripe positions,
//! pulling remote ones over the network.

use crate::cluster::ErasureScheme;
use crate::common::{Error, Result};
use crate::traffic::IoCounters;
use rand::seq::SliceRandom;
use rand::Rng;

/// Counter deltas for one traffic call, indexed by stripe position
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLedger {
    deltas: Vec<IoCounters>,
    /// Volume handed to or from the client
    client_volume: f64,
    chunk_size: f64,
}

impl TrafficLedger {
    fn new(stripe_width: usize) -> Self {
        Self {
            deltas: vec![IoCounters::default(); stripe_width],
            client_volume: 0.0,
            chunk_size: 0.0,
        }
    }

    pub fn deltas(&self) -> &[IoCounters] {
        &self.deltas
    }

    pub fn client_volume(&self) -> f64 {
        self.client_volume
    }

    pub fn chunk_size(&self) -> f64 {
        self.chunk_size
    }

    pub fn totals(&self) -> IoCounters {
        self.deltas.iter().sum()
    }
}

/// Counters only grow, so a volume must be a finite non-negative number
pub fn check_volume(volume: f64) -> Result<()> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(Error::InvalidVolume { volume });
    }
    Ok(())
}

/// Share of the volume each member handles, and the chunk size it encodes to
fn split(scheme: &ErasureScheme, volume: f64) -> Result<(f64, f64)> {
    check_volume(volume)?;
    let user_data_per_node = volume / scheme.stripe_width() as f64;
    let chunk_size = user_data_per_node / scheme.data_chunks() as f64;
    Ok((user_data_per_node, chunk_size))
}

/// Deltas for writing `volume` into a stripe of `stripe_width` with `parity`
pub fn ingress(stripe_width: usize, parity: usize, volume: f64) -> Result<TrafficLedger> {
    let scheme = ErasureScheme::new(stripe_width, parity)?;
    let (user_data_per_node, chunk_size) = split(&scheme, volume)?;
    let mut ledger = TrafficLedger::new(stripe_width);
    ledger.chunk_size = chunk_size;

    for server in 0..stripe_width {
        ledger.deltas[server].net_rx += user_data_per_node;
        ledger.client_volume += user_data_per_node;

        for remote in 0..stripe_width {
            if remote == server {
                ledger.deltas[server].disk_write += chunk_size;
            } else {
                ledger.deltas[server].net_tx += chunk_size;
                ledger.deltas[remote].net_rx += chunk_size;
                ledger.deltas[remote].disk_write += chunk_size;
            }
        }
    }

    Ok(ledger)
}

/// Deltas for reading `volume` back out of the stripe.
///
/// Which positions count as data chunks is drawn from `rng`, reshuffled for
/// every serving member.
pub fn egress<R: Rng + ?Sized>(
    stripe_width: usize,
    parity: usize,
    volume: f64,
    rng: &mut R,
) -> Result<TrafficLedger> {
    let scheme = ErasureScheme::new(stripe_width, parity)?;
    let (user_data_per_node, chunk_size) = split(&scheme, volume)?;
    let data_chunks = scheme.data_chunks();
    let mut ledger = TrafficLedger::new(stripe_width);
    ledger.chunk_size = chunk_size;

    let mut chunks: Vec<usize> = (0..stripe_width).collect();

    for server in 0..stripe_width {
        ledger.deltas[server].net_tx += user_data_per_node;
        ledger.client_volume += user_data_per_node;

        chunks.shuffle(rng);

        for &remote in &chunks[..data_chunks] {
            if remote == server {
                ledger.deltas[server].disk_read += chunk_size;
            } else {
                ledger.deltas[remote].disk_read += chunk_size;
                ledger.deltas[remote].net_tx += chunk_size;
                ledger.deltas[server].net_rx += chunk_size;
            }
        }
    }

    Ok(ledger)
}
