//! Booking wizard
//!
//! Linear flow `DateSelection → SlotSelection → Confirmation → Success`.
//! Each forward step validates its input, `back()` returns to the previous
//! step without touching collected data. Persistence happens once, at
//! submit time, through `POST /api/booking/create`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{AvailableSlot, BookingCreate};
use thiserror::Error;
use validator::ValidateEmail;

use crate::utils::time::DATE_FORMAT;
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN};

/// Largest party accepted online
pub const MAX_GUESTS: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    DateSelection,
    SlotSelection,
    Confirmation,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Cette date est déjà passée")]
    DateInPast,

    #[error("Ce créneau n'est plus disponible")]
    SlotUnavailable,

    #[error("Plus que {available} place(s) sur ce créneau")]
    SlotFull { available: i64 },

    #[error("Le champ {0} est obligatoire")]
    MissingField(&'static str),

    #[error("Le champ {0} est trop long")]
    FieldTooLong(&'static str),

    #[error("Adresse e-mail invalide")]
    InvalidEmail,

    #[error("Nombre de convives invalide")]
    InvalidGuests,

    #[error("Action impossible à l'étape {0:?}")]
    WrongStep(WizardStep),
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        let code = match err {
            FlowError::DateInPast => ErrorCode::BookingDateInPast,
            FlowError::SlotUnavailable => ErrorCode::SlotClosed,
            FlowError::SlotFull { .. } => ErrorCode::SlotFull,
            FlowError::MissingField(_) => ErrorCode::RequiredField,
            FlowError::InvalidGuests => ErrorCode::ValueOutOfRange,
            FlowError::WrongStep(_) => ErrorCode::InvalidRequest,
            FlowError::FieldTooLong(_) | FlowError::InvalidEmail => ErrorCode::ValidationFailed,
        };
        let app = AppError::with_message(code, err.to_string());
        match err {
            FlowError::MissingField(field) | FlowError::FieldTooLong(field) => {
                app.with_detail("field", field)
            }
            FlowError::SlotFull { available } => app.with_detail("available_capacity", available),
            _ => app,
        }
    }
}

/// Contact form of the confirmation step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub guests: i64,
    pub notes: Option<String>,
}

fn check_len(value: &str, field: &'static str, max: usize) -> Result<(), FlowError> {
    if value.chars().count() > max {
        return Err(FlowError::FieldTooLong(field));
    }
    Ok(())
}

/// Presence, length and e-mail shape of a contact
pub fn validate_contact(
    name: &str,
    email: &str,
    phone: Option<&str>,
    notes: Option<&str>,
    guests: i64,
) -> Result<(), FlowError> {
    if name.trim().is_empty() {
        return Err(FlowError::MissingField("customer_name"));
    }
    check_len(name, "customer_name", MAX_NAME_LEN)?;

    let email = email.trim();
    if email.is_empty() {
        return Err(FlowError::MissingField("customer_email"));
    }
    check_len(email, "customer_email", MAX_EMAIL_LEN)?;
    if !email.validate_email() {
        return Err(FlowError::InvalidEmail);
    }

    if let Some(phone) = phone {
        check_len(phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(notes) = notes {
        check_len(notes, "notes", MAX_NOTE_LEN)?;
    }
    if !(1..=MAX_GUESTS).contains(&guests) {
        return Err(FlowError::InvalidGuests);
    }
    Ok(())
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FlowError> {
        validate_contact(
            &self.customer_name,
            &self.customer_email,
            self.customer_phone.as_deref(),
            self.notes.as_deref(),
            self.guests,
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Wizard state for one establishment
///
/// [`create_booking`](super::create_booking) replays the forward steps
/// server-side for every create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWizard {
    establishment_id: i64,
    step: WizardStep,
    date: Option<NaiveDate>,
    slot: Option<AvailableSlot>,
    booking_id: Option<i64>,
}

impl BookingWizard {
    pub fn new(establishment_id: i64) -> Self {
        Self {
            establishment_id,
            step: WizardStep::DateSelection,
            date: None,
            slot: None,
            booking_id: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn slot(&self) -> Option<&AvailableSlot> {
        self.slot.as_ref()
    }

    pub fn booking_id(&self) -> Option<i64> {
        self.booking_id
    }

    fn expect_step(&self, step: WizardStep) -> Result<(), FlowError> {
        if self.step != step {
            return Err(FlowError::WrongStep(self.step));
        }
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), FlowError> {
        self.expect_step(WizardStep::DateSelection)?;
        if date < today {
            return Err(FlowError::DateInPast);
        }
        self.date = Some(date);
        self.step = WizardStep::SlotSelection;
        Ok(())
    }

    pub fn select_slot(&mut self, slot: AvailableSlot) -> Result<(), FlowError> {
        self.expect_step(WizardStep::SlotSelection)?;
        if slot.available_capacity <= 0 {
            return Err(FlowError::SlotFull { available: 0 });
        }
        if !slot.is_available {
            return Err(FlowError::SlotUnavailable);
        }
        self.slot = Some(slot);
        self.step = WizardStep::Confirmation;
        Ok(())
    }

    /// Validate the contact form and build the create payload
    ///
    /// The wizard stays on `Confirmation` until [`complete`](Self::complete)
    /// is called with the created booking id.
    pub fn submit(&self, contact: &ContactForm) -> Result<BookingCreate, FlowError> {
        self.expect_step(WizardStep::Confirmation)?;
        contact.validate()?;
        let (Some(date), Some(slot)) = (self.date, self.slot.as_ref()) else {
            return Err(FlowError::WrongStep(self.step));
        };
        if contact.guests > slot.available_capacity {
            return Err(FlowError::SlotFull {
                available: slot.available_capacity,
            });
        }
        Ok(BookingCreate {
            establishment_id: self.establishment_id,
            booking_slot_id: Some(slot.booking_slot_id),
            date: date.format(DATE_FORMAT).to_string(),
            slot_time: slot.slot_time.clone(),
            guests: contact.guests,
            customer_name: contact.customer_name.trim().to_string(),
            customer_email: contact.customer_email.trim().to_string(),
            customer_phone: non_blank(&contact.customer_phone),
            notes: non_blank(&contact.notes),
        })
    }

    pub fn complete(&mut self, booking_id: i64) -> Result<(), FlowError> {
        self.expect_step(WizardStep::Confirmation)?;
        self.booking_id = Some(booking_id);
        self.step = WizardStep::Success;
        Ok(())
    }

    /// One step back; no-op on the first step and after success
    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::DateSelection => WizardStep::DateSelection,
            WizardStep::SlotSelection => WizardStep::DateSelection,
            WizardStep::Confirmation => WizardStep::SlotSelection,
            WizardStep::Success => WizardStep::Success,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn slot(available: bool, capacity: i64) -> AvailableSlot {
        AvailableSlot {
            slot_time: "19:30".into(),
            slot_number: 78,
            booking_slot_id: 2,
            service_name: "Dîner".into(),
            is_available: available,
            available_capacity: capacity,
            max_capacity: 20,
        }
    }

    fn contact(guests: i64) -> ContactForm {
        ContactForm {
            customer_name: " Jeanne Martin ".into(),
            customer_email: "jeanne@example.com".into(),
            customer_phone: None,
            guests,
            notes: Some("Terrasse".into()),
        }
    }

    #[test]
    fn test_happy_path() {
        let mut wizard = BookingWizard::new(1);
        wizard.select_date(d("2024-03-08"), d("2024-03-04")).unwrap();
        assert_eq!(wizard.step(), WizardStep::SlotSelection);
        wizard.select_slot(slot(true, 6)).unwrap();
        assert_eq!(wizard.step(), WizardStep::Confirmation);

        let payload = wizard.submit(&contact(4)).unwrap();
        assert_eq!(payload.date, "2024-03-08");
        assert_eq!(payload.slot_time, "19:30");
        assert_eq!(payload.booking_slot_id, Some(2));
        assert_eq!(payload.customer_name, "Jeanne Martin");

        wizard.complete(42).unwrap();
        assert_eq!(wizard.step(), WizardStep::Success);
        assert_eq!(wizard.booking_id(), Some(42));
    }

    #[test]
    fn test_past_date_rejected() {
        let mut wizard = BookingWizard::new(1);
        assert_eq!(
            wizard.select_date(d("2024-03-03"), d("2024-03-04")),
            Err(FlowError::DateInPast)
        );
        assert_eq!(wizard.step(), WizardStep::DateSelection);
        // today is bookable
        assert!(wizard.select_date(d("2024-03-04"), d("2024-03-04")).is_ok());
    }

    #[test]
    fn test_unavailable_slot_rejected() {
        let mut wizard = BookingWizard::new(1);
        wizard.select_date(d("2024-03-08"), d("2024-03-04")).unwrap();
        assert_eq!(wizard.select_slot(slot(false, 6)), Err(FlowError::SlotUnavailable));
        assert_eq!(
            wizard.select_slot(slot(false, 0)),
            Err(FlowError::SlotFull { available: 0 })
        );
        assert_eq!(wizard.step(), WizardStep::SlotSelection);
    }

    #[test]
    fn test_party_larger_than_capacity() {
        let mut wizard = BookingWizard::new(1);
        wizard.select_date(d("2024-03-08"), d("2024-03-04")).unwrap();
        wizard.select_slot(slot(true, 2)).unwrap();
        assert_eq!(
            wizard.submit(&contact(3)),
            Err(FlowError::SlotFull { available: 2 })
        );
        let err: AppError = FlowError::SlotFull { available: 2 }.into();
        assert_eq!(err.code, ErrorCode::SlotFull);
    }

    #[test]
    fn test_back_keeps_data() {
        let mut wizard = BookingWizard::new(1);
        wizard.select_date(d("2024-03-08"), d("2024-03-04")).unwrap();
        wizard.select_slot(slot(true, 6)).unwrap();
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::SlotSelection);
        assert_eq!(wizard.date(), Some(d("2024-03-08")));
        assert!(wizard.slot().is_some());
        wizard.back();
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::DateSelection);
    }

    #[test]
    fn test_steps_cannot_be_skipped() {
        let mut wizard = BookingWizard::new(1);
        assert_eq!(
            wizard.select_slot(slot(true, 4)),
            Err(FlowError::WrongStep(WizardStep::DateSelection))
        );
        assert!(wizard.submit(&contact(2)).is_err());
        assert!(wizard.complete(1).is_err());
    }

    #[test]
    fn test_contact_validation() {
        assert_eq!(
            validate_contact("", "a@b.fr", None, None, 2),
            Err(FlowError::MissingField("customer_name"))
        );
        assert_eq!(
            validate_contact("Jeanne", "pas-un-email", None, None, 2),
            Err(FlowError::InvalidEmail)
        );
        assert_eq!(
            validate_contact("Jeanne", "a@b.fr", None, None, 0),
            Err(FlowError::InvalidGuests)
        );
        let long_notes = "x".repeat(MAX_NOTE_LEN + 1);
        assert_eq!(
            validate_contact("Jeanne", "a@b.fr", None, Some(&long_notes), 2),
            Err(FlowError::FieldTooLong("notes"))
        );
        assert!(validate_contact("Jeanne", "jeanne@example.com", Some("0601020304"), None, 2).is_ok());
    }

    #[test]
    fn test_flow_error_maps_to_app_error() {
        let err: AppError = FlowError::DateInPast.into();
        assert_eq!(err.code, ErrorCode::BookingDateInPast);
        let err: AppError = FlowError::MissingField("customer_email").into();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "customer_email");
    }
}
