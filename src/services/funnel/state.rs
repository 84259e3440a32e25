use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::step::Step;
use crate::{
    error::FunnelError,
    models::{
        add_on::AddOnCatalog,
        booking::{BookingDraft, BookingReceipt, BookingRequest, GuestContact, StayDates},
        payment::{PaymentAttempt, PaymentMethod, PaymentOutcome, PaymentRequest},
        room::Room,
    },
    services::{
        pricing_service::{PriceQuote, PricingService},
        validation::{validate_contact, validate_dates, FieldErrors},
    },
};

/// Entry-point parameters. The room page modal preselects its room, the booking page does not.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelOptions {
    pub preselected_room_id: Option<String>,
    pub currency: String,
}

impl Default for FunnelOptions {
    fn default() -> Self {
        Self {
            preselected_room_id: None,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RoomAvailability {
    Idle,
    Loading,
    Loaded(Vec<Room>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PaymentPhase {
    AwaitingMethod,
    Processing { method: String },
    Succeeded { transaction_id: Option<String>, status: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetDates {
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    },
    SetGuestCount(u32),
    SelectRoom(String),
    SetContact(GuestContact),
    SetSpecialRequests(String),
    SetAddOns(Vec<String>),
    Next,
    Back,
    RoomsLoaded(Vec<Room>),
    RoomsFailed(String),
    SubmissionSucceeded(BookingReceipt),
    SubmissionFailed(String),
    Pay(PaymentMethod),
    PaymentFinished(PaymentOutcome),
    DismissNotice,
}

impl Action {
    /// Message to refuse the triggering request with when this action reports a failed
    /// collaborator call. A failed room fetch is not a refusal: the funnel has already moved
    /// to room selection and shows the failure as its notice.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Action::SubmissionFailed(message) => Some(message),
            Action::PaymentFinished(outcome) if !outcome.success => Some(&outcome.message),
            _ => None,
        }
    }
}

/// Work the reducer asks its driver to perform. The result comes back as an [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchRooms {
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    },
    SubmitBooking(BookingRequest),
    ProcessPayment(PaymentRequest),
}

#[derive(Debug, Clone)]
pub struct Funnel {
    step: Step,
    draft: BookingDraft,
    rooms: RoomAvailability,
    submitting: bool,
    receipt: Option<BookingReceipt>,
    payment: PaymentPhase,
    attempts: Vec<PaymentAttempt>,
    errors: FieldErrors,
    notice: Option<String>,
    options: FunnelOptions,
    catalog: Arc<AddOnCatalog>,
}

impl Funnel {
    pub fn new(options: FunnelOptions, catalog: Arc<AddOnCatalog>) -> Self {
        Self {
            step: Step::Dates,
            draft: BookingDraft::default(),
            rooms: RoomAvailability::Idle,
            submitting: false,
            receipt: None,
            payment: PaymentPhase::AwaitingMethod,
            attempts: Vec::new(),
            errors: FieldErrors::default(),
            notice: None,
            options,
            catalog,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn rooms(&self) -> &RoomAvailability {
        &self.rooms
    }

    pub fn receipt(&self) -> Option<&BookingReceipt> {
        self.receipt.as_ref()
    }

    pub fn payment(&self) -> &PaymentPhase {
        &self.payment
    }

    pub fn attempts(&self) -> &[PaymentAttempt] {
        &self.attempts
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn options(&self) -> &FunnelOptions {
        &self.options
    }

    pub fn catalog(&self) -> &AddOnCatalog {
        &self.catalog
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Payment went through; the funnel accepts no further input.
    pub fn is_complete(&self) -> bool {
        matches!(self.payment, PaymentPhase::Succeeded { .. })
    }

    pub fn quote(&self) -> PriceQuote {
        PricingService::quote_draft(&self.draft, &self.catalog, &self.options.currency)
    }

    pub fn reduce(&mut self, action: Action) -> Result<Option<Effect>, FunnelError> {
        if self.is_complete() && action != Action::DismissNotice {
            return Err(FunnelError::Closed);
        }

        match action {
            Action::SetDates {
                check_in,
                check_out,
            } => {
                self.ensure_editable("set_dates", &[Step::Dates])?;
                self.draft.dates = StayDates {
                    check_in,
                    check_out,
                };
                self.errors.remove("check_in");
                self.errors.remove("check_out");
                Ok(None)
            }
            Action::SetGuestCount(count) => {
                self.ensure_editable("set_guest_count", &[Step::Dates])?;
                self.draft.guest_count = count;
                self.errors.remove("guest_count");
                Ok(None)
            }
            Action::SelectRoom(room_id) => {
                self.ensure_editable("select_room", &[Step::RoomSelect])?;
                self.select_room(&room_id)?;
                Ok(None)
            }
            Action::SetContact(contact) => {
                self.ensure_editable("set_contact", &[Step::GuestInfo])?;
                self.draft.contact = contact;
                for field in ["name", "email", "phone"] {
                    self.errors.remove(field);
                }
                Ok(None)
            }
            Action::SetSpecialRequests(text) => {
                self.ensure_editable("set_special_requests", &[Step::GuestInfo])?;
                self.draft.special_requests = text;
                Ok(None)
            }
            Action::SetAddOns(ids) => {
                self.ensure_editable("set_add_ons", &[Step::RoomSelect, Step::Review])?;
                self.set_add_ons(ids)?;
                Ok(None)
            }
            Action::Next => self.advance(),
            Action::Back => self.retreat(),
            Action::RoomsLoaded(rooms) => {
                if self.rooms == RoomAvailability::Loading {
                    self.apply_preselection(&rooms);
                    self.rooms = RoomAvailability::Loaded(rooms);
                }
                Ok(None)
            }
            Action::RoomsFailed(message) => {
                if self.rooms == RoomAvailability::Loading {
                    self.rooms = RoomAvailability::Failed(message.clone());
                    self.notice = Some(message);
                }
                Ok(None)
            }
            Action::SubmissionSucceeded(receipt) => {
                if self.submitting {
                    self.submitting = false;
                    self.receipt = Some(receipt);
                    self.step = Step::Payment;
                    self.payment = PaymentPhase::AwaitingMethod;
                }
                Ok(None)
            }
            Action::SubmissionFailed(message) => {
                if self.submitting {
                    self.submitting = false;
                    self.notice = Some(message);
                }
                Ok(None)
            }
            Action::Pay(method) => self.start_payment(method),
            Action::PaymentFinished(outcome) => {
                let processing = match &self.payment {
                    PaymentPhase::Processing { method } => Some(method.clone()),
                    _ => None,
                };
                if let Some(method) = processing {
                    if outcome.success {
                        self.notice = None;
                        self.payment = PaymentPhase::Succeeded {
                            transaction_id: outcome.transaction_id.clone(),
                            status: outcome.status.clone(),
                        };
                    } else {
                        self.notice = Some(outcome.message.clone());
                        self.payment = PaymentPhase::AwaitingMethod;
                    }
                    self.attempts.push(PaymentAttempt { method, outcome });
                }
                Ok(None)
            }
            Action::DismissNotice => {
                self.notice = None;
                Ok(None)
            }
        }
    }

    fn ensure_editable(&self, action: &'static str, steps: &[Step]) -> Result<(), FunnelError> {
        if self.receipt.is_some() {
            return Err(FunnelError::Submitted);
        }
        if !steps.contains(&self.step) {
            return Err(FunnelError::WrongStep {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<Effect>, FunnelError> {
        match self.step {
            Step::Dates => {
                if let Err(errors) = validate_dates(&self.draft.dates, self.draft.guest_count) {
                    self.errors = errors.clone();
                    return Err(FunnelError::Validation(errors));
                }
                self.errors = FieldErrors::default();
                self.notice = None;
                self.forward();
                Ok(Some(self.begin_room_fetch()?))
            }
            Step::RoomSelect => {
                if self.rooms == RoomAvailability::Loading {
                    return Err(FunnelError::Busy("room availability"));
                }
                if !matches!(self.rooms, RoomAvailability::Loaded(_)) {
                    return Ok(Some(self.begin_room_fetch()?));
                }
                let selected = match self.draft.selected_room.as_ref() {
                    Some(room) => room.id.clone(),
                    None => return self.reject("Please select a room to continue"),
                };
                // The selection may predate a change of dates or party size.
                match self.find_room(&selected) {
                    Ok(room) => {
                        self.draft.selected_room = Some(room);
                        self.notice = None;
                        self.forward();
                        Ok(None)
                    }
                    Err(message) => self.reject(message),
                }
            }
            Step::GuestInfo => {
                if let Err(errors) = validate_contact(&self.draft.contact) {
                    self.errors = errors.clone();
                    return Err(FunnelError::Validation(errors));
                }
                self.errors = FieldErrors::default();
                self.forward();
                Ok(None)
            }
            Step::Review => {
                if self.submitting {
                    return Err(FunnelError::Busy("booking submission"));
                }
                if self.receipt.is_some() {
                    self.step = Step::Payment;
                    return Ok(None);
                }
                let request = self.booking_request()?;
                self.submitting = true;
                self.notice = None;
                Ok(Some(Effect::SubmitBooking(request)))
            }
            Step::Payment => Err(FunnelError::WrongStep {
                action: "next",
                step: Step::Payment,
            }),
        }
    }

    fn forward(&mut self) {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
    }

    fn retreat(&mut self) -> Result<Option<Effect>, FunnelError> {
        if self.submitting {
            return Err(FunnelError::Busy("booking submission"));
        }
        if matches!(self.payment, PaymentPhase::Processing { .. }) {
            return Err(FunnelError::Busy("payment"));
        }
        let previous = self.step.previous().ok_or(FunnelError::AtFirstStep)?;
        self.step = previous;
        self.notice = None;
        Ok(None)
    }

    fn begin_room_fetch(&mut self) -> Result<Effect, FunnelError> {
        let (check_in, check_out) = self
            .draft
            .dates
            .range()
            .ok_or_else(|| FunnelError::Notice("Choose your stay dates first".to_string()))?;
        self.rooms = RoomAvailability::Loading;
        Ok(Effect::FetchRooms {
            check_in,
            check_out,
            guests: self.draft.guest_count,
        })
    }

    fn select_room(&mut self, room_id: &str) -> Result<(), FunnelError> {
        if self.rooms == RoomAvailability::Loading {
            return Err(FunnelError::Busy("room availability"));
        }
        match self.find_room(room_id) {
            Ok(room) => {
                self.draft.selected_room = Some(room);
                self.notice = None;
                Ok(())
            }
            Err(message) => self.reject(message),
        }
    }

    fn find_room(&self, room_id: &str) -> Result<Room, String> {
        let rooms = match &self.rooms {
            RoomAvailability::Loaded(rooms) => rooms,
            _ => return Err("Room availability is not loaded yet".to_string()),
        };
        let room = rooms
            .iter()
            .find(|room| room.id == room_id)
            .ok_or_else(|| "That room is not available for the selected dates".to_string())?;
        if !room.fits(self.draft.guest_count) {
            return Err(format!(
                "{} sleeps at most {} guests",
                room.name, room.capacity
            ));
        }
        Ok(room.clone())
    }

    fn set_add_ons(&mut self, ids: Vec<String>) -> Result<(), FunnelError> {
        if let Some(unknown) = ids.iter().find(|id| !self.catalog.contains(id)) {
            let mut errors = FieldErrors::default();
            errors.insert("add_ons", format!("Unknown add-on: {}", unknown));
            return Err(FunnelError::Validation(errors));
        }
        let mut selected: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
        self.draft.add_ons = selected;
        Ok(())
    }

    fn apply_preselection(&mut self, rooms: &[Room]) {
        if self.draft.selected_room.is_some() {
            return;
        }
        if let Some(wanted) = &self.options.preselected_room_id {
            self.draft.selected_room = rooms
                .iter()
                .find(|room| &room.id == wanted && room.fits(self.draft.guest_count))
                .cloned();
        }
    }

    fn start_payment(&mut self, method: PaymentMethod) -> Result<Option<Effect>, FunnelError> {
        if self.step != Step::Payment {
            return Err(FunnelError::WrongStep {
                action: "pay",
                step: self.step,
            });
        }
        if matches!(self.payment, PaymentPhase::Processing { .. }) {
            return Err(FunnelError::Busy("payment"));
        }
        let booking_id = match self.receipt.as_ref().map(|receipt| receipt.id.clone()) {
            Some(id) => id,
            None => return self.reject("Booking has not been confirmed yet"),
        };

        let quote = self.quote();
        self.notice = None;
        self.payment = PaymentPhase::Processing {
            method: method.label().to_string(),
        };
        Ok(Some(Effect::ProcessPayment(PaymentRequest {
            booking_id,
            amount: quote.total,
            currency: quote.currency,
            method,
        })))
    }

    fn booking_request(&self) -> Result<BookingRequest, FunnelError> {
        let (check_in, check_out) = self
            .draft
            .dates
            .range()
            .ok_or_else(|| FunnelError::Notice("Choose your stay dates first".to_string()))?;
        let room = self
            .draft
            .selected_room
            .as_ref()
            .ok_or_else(|| FunnelError::Notice("Please select a room to continue".to_string()))?;
        let quote = self.quote();
        let special_requests = self.draft.special_requests.trim();

        Ok(BookingRequest {
            room_id: room.id.clone(),
            check_in,
            check_out,
            nights: quote.nights,
            guests: self.draft.guest_count,
            guest: GuestContact {
                name: self.draft.contact.name.trim().to_string(),
                email: self.draft.contact.email.trim().to_string(),
                phone: self.draft.contact.phone.trim().to_string(),
            },
            special_requests: (!special_requests.is_empty())
                .then(|| special_requests.to_string()),
            add_ons: self.draft.add_ons.clone(),
            total_price: quote.total,
            currency: quote.currency,
        })
    }

    /// Sets the toast and refuses the action.
    fn reject<T>(&mut self, message: impl Into<String>) -> Result<T, FunnelError> {
        let message = message.into();
        self.notice = Some(message.clone());
        Err(FunnelError::Notice(message))
    }
}
