use crate::core::{
    ConfigProvider, ContactDraft, ContactRecord, Direccion, FormErrors, RecordSink,
    SubmissionReceipt,
};
use crate::domain::rut::Strictness;
use crate::domain::summary;
use crate::utils::error::{IntakeError, Result};
use chrono::Utc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    /// A request is in flight; submitting again is refused.
    Submitting,
    Submitted,
    Failed,
}

/// Holds the form in `Submitting` while a request is out. If the submit
/// future is dropped before the sink answers, the form ends up `Failed`.
struct InFlight<'a> {
    state: &'a mut FormState,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn start(state: &'a mut FormState) -> Self {
        *state = FormState::Submitting;
        Self { state, armed: true }
    }

    fn finish(mut self, outcome: FormState) {
        *self.state = outcome;
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Submission abandoned before the webhook answered");
            *self.state = FormState::Failed;
        }
    }
}

/// One contact form and its submission lifecycle.
pub struct IntakeForm<S: RecordSink> {
    sink: S,
    strictness: Strictness,
    business_unit: String,
    draft: ContactDraft,
    state: FormState,
    last_validated: Option<Direccion>,
}

impl<S: RecordSink> IntakeForm<S> {
    pub fn new(sink: S, business_unit: impl Into<String>, strictness: Strictness) -> Self {
        let business_unit = business_unit.into();
        Self {
            sink,
            strictness,
            draft: ContactDraft {
                unidad_negocio: business_unit.clone(),
                ..Default::default()
            },
            business_unit,
            state: FormState::Editing,
            last_validated: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(sink: S, config: &C) -> Self {
        Self::new(sink, config.business_unit(), config.strictness())
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    /// Editing a form that already finished puts it back into `Editing`.
    pub fn draft_mut(&mut self) -> &mut ContactDraft {
        if matches!(self.state, FormState::Submitted | FormState::Failed) {
            self.state = FormState::Editing;
        }
        &mut self.draft
    }

    pub fn set_draft(&mut self, mut draft: ContactDraft) {
        if draft.unidad_negocio.trim().is_empty() {
            draft.unidad_negocio = self.business_unit.clone();
        }
        *self.draft_mut() = draft;
    }

    pub fn last_validated(&self) -> Option<&Direccion> {
        self.last_validated.as_ref()
    }

    pub fn summary(&self) -> String {
        summary::render_summary(&self.draft, self.strictness)
    }

    pub fn validate(&mut self) -> std::result::Result<ContactRecord, FormErrors> {
        let record = self.draft.validate(self.strictness)?;
        self.last_validated = Some(record.direccion.clone());
        Ok(record)
    }

    /// Validates, posts and resolves the form. Invalid input never reaches the sink.
    pub async fn submit(&mut self) -> Result<SubmissionReceipt> {
        if self.state == FormState::Submitting {
            return Err(IntakeError::SubmissionInProgress);
        }

        let record = self.validate().map_err(|errors| {
            tracing::info!("Form has {} invalid field(s): {}", errors.len(), errors);
            IntakeError::ValidationError(errors)
        })?;

        let in_flight = InFlight::start(&mut self.state);
        tracing::info!("📤 Submitting record for RUT {}", record.rut);
        let started = Instant::now();
        let result = self.sink.send(&record).await;

        match result {
            Ok(reply) => {
                in_flight.finish(FormState::Submitted);
                self.draft = ContactDraft {
                    unidad_negocio: self.business_unit.clone(),
                    ..Default::default()
                };
                tracing::info!("✅ Record accepted in {:?}", started.elapsed());
                Ok(SubmissionReceipt {
                    reply,
                    submitted_at: Utc::now(),
                    elapsed: started.elapsed(),
                })
            }
            Err(e) => {
                in_flight.finish(FormState::Failed);
                Err(e)
            }
        }
    }
}
