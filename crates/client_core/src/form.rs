//! Registration form state: field values, touched tracking, derived errors and
//! the submission state machine.

use std::collections::BTreeSet;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::{
    error::{FormError, RegistrationError},
    register,
    types::{FieldValue, FormField, FormValues},
    validation::{validate, FieldErrors},
    RegistrationPayload, RegistryApi,
};

pub const HEADLINE_EDITING: &str = "Working with POST request";
pub const HEADLINE_SUBMITTED: &str = "User successfully registered!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Editing,
    Submitted,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; every field is now touched and nothing was sent.
    Invalid,
    Registered,
    Failed(RegistrationError),
    AlreadySubmitted,
    InFlight,
}

pub struct FormController {
    values: FormValues,
    errors: FieldErrors,
    touched: BTreeSet<FormField>,
    state: SubmissionState,
    in_flight: bool,
    alert: Option<String>,
    on_user_registered: Option<oneshot::Sender<()>>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        let values = FormValues::default();
        let errors = validate(&values);
        Self {
            values,
            errors,
            touched: BTreeSet::new(),
            state: SubmissionState::Editing,
            in_flight: false,
            alert: None,
            on_user_registered: None,
        }
    }

    /// Fired once, after the server accepts the registration.
    pub fn with_registration_notifier(mut self, notifier: oneshot::Sender<()>) -> Self {
        self.on_user_registered = Some(notifier);
        self
    }

    pub fn set_field(
        &mut self,
        field: FormField,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        let value = value.into();
        if self.state == SubmissionState::Submitted {
            debug!(%field, "ignoring edit on submitted form");
            return Ok(());
        }

        match (field, value) {
            (FormField::Name, FieldValue::Text(text)) => self.values.name = text,
            (FormField::Email, FieldValue::Text(text)) => self.values.email = text,
            (FormField::Phone, FieldValue::Text(text)) => self.values.phone = text,
            (FormField::Position, FieldValue::Text(text)) => self.values.position = text,
            (FormField::Photo, FieldValue::Photo(photo)) => self.values.photo = photo,
            (field, other) => {
                return Err(FormError::ValueKindMismatch {
                    field: field.input_name(),
                    kind: other.kind(),
                })
            }
        }

        self.touched.insert(field);
        self.revalidate();
        Ok(())
    }

    /// Same as [`Self::set_field`] but addressed by the input's `name` attribute.
    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        let field = name.parse::<FormField>()?;
        self.set_field(field, value)
    }

    pub fn set_field_touched(&mut self, field: FormField) {
        self.touched.insert(field);
        self.revalidate();
    }

    pub fn is_valid(&self) -> bool {
        validate(&self.values).is_empty()
    }

    /// Gate for the submit button.
    pub fn can_submit(&self) -> bool {
        self.state == SubmissionState::Editing && !self.in_flight && self.is_valid()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.contains(&field)
    }

    /// The error to render next to `field`, hidden until the user has touched it.
    pub fn visible_error(&self, field: FormField) -> Option<&'static str> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn headline(&self) -> &'static str {
        match self.state {
            SubmissionState::Editing => HEADLINE_EDITING,
            SubmissionState::Submitted => HEADLINE_SUBMITTED,
        }
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub async fn submit(&mut self, api: &dyn RegistryApi) -> SubmitOutcome {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let result = register(api, payload).await;
        self.finish_submit(result.map(|_| ()))
    }

    /// First half of [`Self::submit`] for callers that run the network calls
    /// elsewhere. On `Ok` the form is marked in flight until
    /// [`Self::finish_submit`] is called.
    pub fn begin_submit(&mut self) -> Result<RegistrationPayload, SubmitOutcome> {
        if self.state == SubmissionState::Submitted {
            return Err(SubmitOutcome::AlreadySubmitted);
        }
        if self.in_flight {
            debug!("submission already in flight");
            return Err(SubmitOutcome::InFlight);
        }

        self.revalidate();
        let payload = if self.errors.is_empty() {
            RegistrationPayload::from_values(&self.values)
        } else {
            None
        };
        let Some(payload) = payload else {
            self.touched.extend(FormField::ALL);
            debug!(errors = self.errors.len(), "submit blocked by validation");
            return Err(SubmitOutcome::Invalid);
        };

        self.alert = None;
        self.in_flight = true;
        Ok(payload)
    }

    pub fn finish_submit(&mut self, result: Result<(), RegistrationError>) -> SubmitOutcome {
        self.in_flight = false;
        match result {
            Ok(()) => {
                self.state = SubmissionState::Submitted;
                if let Some(notifier) = self.on_user_registered.take() {
                    if notifier.send(()).is_err() {
                        warn!("registration listener dropped before notification");
                    }
                }
                info!("registration form submitted");
                SubmitOutcome::Registered
            }
            Err(err) => {
                match &err {
                    RegistrationError::Transport(source) => {
                        error!("Registration error: {source:#}");
                    }
                    other => warn!("registration failed: {other}"),
                }
                self.alert = Some(err.to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn revalidate(&mut self) {
        self.errors = validate(&self.values);
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
