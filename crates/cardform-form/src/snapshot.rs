//! Published form state.
//!
//! Every recompute produces one immutable [`CardOutputData`] snapshot.
//! The store keeps only the latest one and replays it to new
//! subscribers, so a consumer attaching late still renders the current
//! state immediately.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use cardform_core::{
	DualBrandState, ExpiryDate, FieldPolicy, FieldState, InstallmentOption, InstallmentPlan,
};

use crate::address::AddressOutput;

/// The complete validated state of the form after one recompute.
#[derive(Debug, Clone, Default)]
pub struct CardOutputData {
	pub card_number: FieldState<String>,
	pub expiry: FieldState<ExpiryDate>,
	pub cvc: FieldState<String>,
	pub holder_name: FieldState<String>,
	pub installment: FieldState<Option<InstallmentPlan>>,
	pub address: AddressOutput,
	pub brands: DualBrandState,
	pub installment_options: Vec<InstallmentOption>,
	/// Effective presentation of each field after policy resolution.
	pub field_policies: HashMap<String, FieldPolicy>,
	/// True when every field either passes validation or is hidden.
	pub is_valid: bool,
	/// Monotonic recompute counter, 0 before the first input.
	pub version: u64,
}

/// Replay-1 store of [`CardOutputData`] snapshots.
pub struct SnapshotStore {
	tx: watch::Sender<Arc<CardOutputData>>,
}

impl SnapshotStore {
	pub fn new(initial: CardOutputData) -> Self {
		let (tx, _) = watch::channel(Arc::new(initial));
		Self { tx }
	}

	/// Replaces the current snapshot and wakes subscribers.
	pub fn publish(&self, snapshot: CardOutputData) {
		// send_replace stores the value even while no subscriber is
		// attached; a plain send would drop it on a receiver-less channel.
		self.tx.send_replace(Arc::new(snapshot));
	}

	/// The snapshot most recently published.
	pub fn latest(&self) -> Arc<CardOutputData> {
		self.tx.borrow().clone()
	}

	/// A stream that yields the current snapshot immediately, then every
	/// subsequent one.
	pub fn snapshots(&self) -> WatchStream<Arc<CardOutputData>> {
		WatchStream::new(self.tx.subscribe())
	}
}
