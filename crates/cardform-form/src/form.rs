//! The form aggregator.
//!
//! [`CardForm`] exclusively owns the raw input and recomputes the full
//! output snapshot after every mutation: detect brands, resolve the
//! co-badge state, validate every field under its resolved policy, build
//! the installment options and publish. Consumers only ever see the
//! published snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_stream::wrappers::WatchStream;

use cardform_core::{
	CardBrand, CardNumberValidation, Clock, DetectedBrand, ExpiryDate, FieldKind, FieldPolicy,
	FieldState, FieldValidation, InstallmentOption, SystemClock, ValidationReason,
	build_installment_options, resolve_dual_brands, resolve_field_policy, strip_separators,
	validate_card_number, validate_expiry_date,
};

use crate::address::{AddressOutput, AddressValidator};
use crate::config::{AddressConfiguration, CardConfiguration};
use crate::error::CardFormError;
use crate::input::CardInputData;
use crate::lookup::{BinLookupService, BrandDetector, LookupOutcome};
use crate::snapshot::{CardOutputData, SnapshotStore};

/// Aggregates input, detection and validation into output snapshots.
pub struct CardForm {
	config: CardConfiguration,
	is_stored_card: bool,
	input: CardInputData,
	detector: BrandDetector,
	lookups: tokio::sync::mpsc::UnboundedReceiver<LookupOutcome>,
	last_applied_lookup: u64,
	store: SnapshotStore,
	address_validator: Arc<dyn AddressValidator>,
	clock: Box<dyn Clock>,
	version: u64,
}

impl CardForm {
	/// Validates the configuration and publishes the empty-input snapshot.
	pub fn new(
		config: CardConfiguration,
		lookup: Arc<dyn BinLookupService>,
		address_validator: Arc<dyn AddressValidator>,
	) -> Result<Self, CardFormError> {
		Self::with_clock(config, lookup, address_validator, Box::new(SystemClock))
	}

	/// Like [`CardForm::new`] with an injected clock.
	pub fn with_clock(
		config: CardConfiguration,
		lookup: Arc<dyn BinLookupService>,
		address_validator: Arc<dyn AddressValidator>,
		clock: Box<dyn Clock>,
	) -> Result<Self, CardFormError> {
		config.validate()?;
		let (detector, lookups) = BrandDetector::new(lookup);
		let mut form = Self {
			config,
			is_stored_card: false,
			input: CardInputData::default(),
			detector,
			lookups,
			last_applied_lookup: 0,
			store: SnapshotStore::new(CardOutputData::default()),
			address_validator,
			clock,
			version: 0,
		};
		form.store = SnapshotStore::new(form.compute_snapshot());
		Ok(form)
	}

	/// Switches the form into stored-card mode, where the stored-card CVC
	/// flag applies instead of the regular one.
	pub fn set_stored_card(&mut self, is_stored_card: bool) {
		self.is_stored_card = is_stored_card;
		self.recompute();
	}

	/// Mutates the raw input and recomputes the snapshot.
	pub fn update_input(&mut self, mutate: impl FnOnce(&mut CardInputData)) {
		mutate(&mut self.input);
		self.recompute();
	}

	/// Records the shopper's co-badge choice and recomputes.
	pub fn select_brand(&mut self, index: usize) {
		self.input.selected_brand_index = Some(index);
		self.recompute();
	}

	/// The snapshot most recently published.
	pub fn latest(&self) -> Arc<CardOutputData> {
		self.store.latest()
	}

	/// Subscribes to snapshots; the current one is replayed immediately.
	pub fn snapshots(&self) -> WatchStream<Arc<CardOutputData>> {
		self.store.snapshots()
	}

	pub fn config(&self) -> &CardConfiguration {
		&self.config
	}

	/// Applies every completed lookup that is already waiting, without
	/// blocking. Stale outcomes are dropped.
	pub fn apply_ready_lookups(&mut self) {
		while let Ok(outcome) = self.lookups.try_recv() {
			self.apply_lookup(outcome);
		}
	}

	/// Awaits the next completed lookup and applies it. Returns `false`
	/// once the lookup channel is closed.
	pub async fn apply_next_lookup(&mut self) -> bool {
		match self.lookups.recv().await {
			Some(outcome) => {
				self.apply_lookup(outcome);
				true
			}
			None => false,
		}
	}

	/// The last prefix wins: an outcome is applied only when it is newer
	/// than the last applied one and still matches what is typed now.
	fn apply_lookup(&mut self, outcome: LookupOutcome) {
		if outcome.version <= self.last_applied_lookup {
			tracing::debug!(version = outcome.version, "dropping superseded lookup");
			return;
		}
		let digits = strip_separators(&self.input.card_number);
		if BrandDetector::lookup_window(&digits) != outcome.prefix {
			tracing::debug!(prefix = %outcome.prefix, "dropping lookup for stale prefix");
			return;
		}
		self.last_applied_lookup = outcome.version;
		// A failed lookup leaves the already-published local result
		// standing; recomputing here would just issue the lookup again.
		if outcome.candidates.is_some() {
			self.recompute();
		}
	}

	fn recompute(&mut self) {
		self.version += 1;
		let snapshot = self.compute_snapshot();
		tracing::debug!(version = snapshot.version, is_valid = snapshot.is_valid, "publishing snapshot");
		self.store.publish(snapshot);
	}

	fn compute_snapshot(&self) -> CardOutputData {
		let digits = strip_separators(&self.input.card_number);
		let candidates = self.detector.detect(&digits, &self.config);
		let brands = resolve_dual_brands(candidates, self.input.selected_brand_index);
		let selected = brands.selected().cloned();

		let card_number = self.validate_number(selected.as_ref());

		let flags = self.config.policy_flags(self.is_stored_card);
		let cvc_policy = resolve_field_policy(
			FieldKind::Cvc,
			selected.as_ref().map(|c| c.cvc_policy),
			flags,
		);
		let expiry_policy = resolve_field_policy(
			FieldKind::Expiry,
			selected.as_ref().map(|c| c.expiry_policy),
			flags,
		);
		let holder_policy = resolve_field_policy(FieldKind::HolderName, None, flags);

		let expiry = self.validate_expiry(expiry_policy);
		let cvc = self.validate_cvc(cvc_policy, selected.as_ref());
		let holder_name = self.validate_holder_name(holder_policy);

		let installment_options = build_installment_options(
			self.config.installments.as_ref(),
			selected.as_ref().map(|c| &c.brand),
			selected.as_ref().is_some_and(|c| c.reliable),
			self.config.amount.as_ref(),
		);
		let installment = self.validate_installment(&installment_options);

		let address = self.validate_address();

		let is_valid = !card_number.validation.blocks_submission()
			&& !expiry.validation.blocks_submission()
			&& !cvc.validation.blocks_submission()
			&& !holder_name.validation.blocks_submission()
			&& !installment.validation.blocks_submission()
			&& !address.as_field_validation().blocks_submission();

		let field_policies = HashMap::from([
			("cvc".to_string(), cvc_policy),
			("expiry".to_string(), expiry_policy),
			("holder_name".to_string(), holder_policy),
		]);

		CardOutputData {
			card_number,
			expiry,
			cvc,
			holder_name,
			installment,
			address,
			brands,
			installment_options,
			field_policies,
			is_valid,
			version: self.version,
		}
	}

	fn validate_number(&self, selected: Option<&DetectedBrand>) -> FieldState<String> {
		let enable_luhn = selected.is_none_or(|c| c.luhn_check);
		let supported = selected.is_some_and(|c| c.supported);
		let mut validation = match validate_card_number(&self.input.card_number, enable_luhn, supported)
		{
			CardNumberValidation::Valid => FieldValidation::Valid,
			CardNumberValidation::InvalidIllegalCharacters => {
				FieldValidation::invalid_while_editing(ValidationReason::IllegalCharacters)
			}
			CardNumberValidation::InvalidTooShort => {
				FieldValidation::invalid(ValidationReason::TooShort)
			}
			CardNumberValidation::InvalidTooLong => {
				FieldValidation::invalid_while_editing(ValidationReason::TooLong)
			}
			CardNumberValidation::InvalidUnsupportedBrand => {
				FieldValidation::invalid_while_editing(ValidationReason::UnsupportedBrand)
			}
			CardNumberValidation::InvalidLuhnCheck => {
				FieldValidation::invalid(ValidationReason::LuhnCheckFailed)
			}
		};
		// A structurally valid number must also sit at a length the
		// governing brand admits, once those lengths are known.
		if validation.is_valid() {
			if let Some(candidate) = selected {
				let length = strip_separators(&self.input.card_number).len();
				if !candidate.pan_lengths.is_empty() && !candidate.pan_lengths.contains(&length) {
					let max = candidate.pan_lengths.iter().copied().max().unwrap_or(length);
					validation = if length < max {
						FieldValidation::invalid(ValidationReason::TooShort)
					} else {
						FieldValidation::invalid_while_editing(ValidationReason::TooLong)
					};
				}
			}
		}
		FieldState::new(self.input.card_number.clone(), validation)
	}

	fn validate_expiry(&self, policy: FieldPolicy) -> FieldState<ExpiryDate> {
		if policy == FieldPolicy::Hidden {
			return FieldState::new(self.input.expiry, FieldValidation::NotApplicable);
		}
		validate_expiry_date(self.input.expiry, policy, self.clock.as_ref())
	}

	fn validate_cvc(&self, policy: FieldPolicy, selected: Option<&DetectedBrand>) -> FieldState<String> {
		let cvc = self.input.cvc.clone();
		if policy == FieldPolicy::Hidden {
			return FieldState::new(cvc, FieldValidation::NotApplicable);
		}
		if cvc.is_empty() && policy.is_valid_when_empty() {
			return FieldState::new(cvc, FieldValidation::Valid);
		}
		let expected = expected_cvc_length(selected.map(|c| &c.brand));
		let validation = if cvc.len() == expected && cvc.bytes().all(|b| b.is_ascii_digit()) {
			FieldValidation::Valid
		} else {
			FieldValidation::invalid(ValidationReason::InvalidCvcLength)
		};
		FieldState::new(cvc, validation)
	}

	fn validate_holder_name(&self, policy: FieldPolicy) -> FieldState<String> {
		let name = self.input.holder_name.clone();
		if policy == FieldPolicy::Hidden {
			return FieldState::new(name, FieldValidation::NotApplicable);
		}
		let validation = if name.trim().is_empty() && !policy.is_valid_when_empty() {
			FieldValidation::invalid(ValidationReason::MissingRequiredField)
		} else {
			FieldValidation::Valid
		};
		FieldState::new(name, validation)
	}

	/// When options are offered a plan must be chosen, and it must be one
	/// of the offered ones. With nothing offered, no plan is a valid plan.
	fn validate_installment(
		&self,
		options: &[InstallmentOption],
	) -> FieldState<Option<cardform_core::InstallmentPlan>> {
		let chosen = self.input.installment.clone();
		let validation = match &chosen {
			None if options.is_empty() => FieldValidation::Valid,
			None => FieldValidation::invalid(ValidationReason::InvalidInstallmentSelection),
			Some(plan) => {
				let offered = options
					.iter()
					.any(|o| o.plan_type == plan.plan_type && o.count == plan.count);
				if offered {
					FieldValidation::Valid
				} else {
					FieldValidation::invalid(ValidationReason::InvalidInstallmentSelection)
				}
			}
		};
		FieldState::new(chosen, validation)
	}

	fn validate_address(&self) -> AddressOutput {
		match self.config.address {
			AddressConfiguration::None => AddressOutput::valid(),
			mode => self.address_validator.validate(&self.input.address, mode),
		}
	}
}

/// American Express carries a four-digit card security code, everyone else
/// three.
fn expected_cvc_length(brand: Option<&CardBrand>) -> usize {
	match brand {
		Some(CardBrand::AmericanExpress) => 4,
		_ => 3,
	}
}
