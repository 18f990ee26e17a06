use std::future::Future;
use std::time::Duration;

use crate::types::DocumentRef;

pub trait Pacer {
	fn pause(&self) -> impl Future<Output = ()>;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
	pub fn from_millis(ms: u64) -> Self {
		Self(Duration::from_millis(ms))
	}
}

impl Default for FixedDelay {
	fn default() -> Self {
		Self::from_millis(500)
	}
}

impl Pacer for FixedDelay {
	async fn pause(&self) {
		if self.0.is_zero() {
			return;
		}
		tracing::trace!(delay_ms = self.0.as_millis() as u64, "pacing");
		tokio::time::sleep(self.0).await;
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
	async fn pause(&self) {}
}

/// Runs an action over documents one at a time, in order, pausing between
/// consecutive documents.
#[derive(Debug, Clone)]
pub struct PacedSequencer<P> {
	pacer: P,
}

impl<P: Pacer> PacedSequencer<P> {
	pub fn new(pacer: P) -> Self {
		Self { pacer }
	}

	/// Returns one result per document in input order. The first `Err` stops
	/// the run: later documents are never passed to `action` and no results
	/// are returned.
	pub async fn run<T, E, F, Fut>(&self, docs: &[DocumentRef], mut action: F) -> Result<Vec<T>, E>
	where
		F: FnMut(DocumentRef) -> Fut,
		Fut: Future<Output = Result<T, E>>,
	{
		let mut results = Vec::with_capacity(docs.len());

		for (i, doc) in docs.iter().enumerate() {
			if i > 0 {
				self.pacer.pause().await;
			}
			results.push(action(doc.clone()).await?);
		}

		Ok(results)
	}
}
