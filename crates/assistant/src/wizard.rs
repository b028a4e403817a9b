//! Intake wizard.
//!
//! A conversational flow that collects name, category, location, packaging
//! and state, asks the predictor for a shelf life, then commits the item on
//! either the predicted or a user-chosen expiry date.
//!
//! ```text
//! Name -> CategoryConfirm -(yes)-> Location -> Packaging -> State -> Predicting -> Done
//!               \-(no)-> CategoryManual -/                    ^           |
//!                                                              \-(error)--/
//! ```
//!
//! Each step carries exactly the data collected so far, so a prediction can
//! only be requested once every attribute is set.

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use smartfood_client::{ApiError, ApiResult, PantryApi, SavedItem};
use smartfood_core::DomainError;
use smartfood_inventory::{
    CUSTOM_EXPIRY_NOTE, Category, DraftItem, FoodState, ItemRecord, Packaging, Prediction,
    PredictionRequest, StorageLocation,
};

use crate::notice::Notice;

pub const SAVED_MESSAGE: &str = "Saved successfully to inventory.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Name,
    CategoryConfirm,
    CategoryManual,
    Location,
    Packaging,
    State,
    Predicting,
    Done,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Name => "name",
            StepKind::CategoryConfirm => "categoryConfirm",
            StepKind::CategoryManual => "categoryManual",
            StepKind::Location => "location",
            StepKind::Packaging => "packaging",
            StepKind::State => "state",
            StepKind::Predicting => "predicting",
            StepKind::Done => "done",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful prediction, plus the commit outcome once saved.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSummary {
    pub draft: DraftItem,
    pub prediction: Prediction,
    pub predicted_expiry: NaiveDate,
    /// Value of the custom date control; starts at the predicted date.
    pub custom_expiry: NaiveDate,
    pub saved: Option<SavedItem>,
}

impl PredictionSummary {
    /// Record sent to `add_item` for the chosen expiry.
    pub fn record_for(&self, choice: ExpiryChoice, today: NaiveDate) -> ItemRecord {
        let (expiry, note) = match choice {
            ExpiryChoice::Predicted => (self.predicted_expiry, self.prediction.note()),
            ExpiryChoice::Custom => (self.custom_expiry, CUSTOM_EXPIRY_NOTE.to_string()),
        };
        ItemRecord::from_intake(&self.draft, today, expiry, note)
    }

    pub fn is_saved(&self) -> bool {
        self.saved.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum IntakeStep {
    #[default]
    Name,
    CategoryConfirm {
        name: String,
        detected: Category,
    },
    CategoryManual {
        name: String,
        detected: Category,
    },
    Location {
        name: String,
        category: Category,
    },
    Packaging {
        draft: DraftItem,
    },
    State {
        draft: DraftItem,
    },
    Predicting {
        draft: DraftItem,
    },
    Done(Box<PredictionSummary>),
}

impl IntakeStep {
    pub fn kind(&self) -> StepKind {
        match self {
            IntakeStep::Name => StepKind::Name,
            IntakeStep::CategoryConfirm { .. } => StepKind::CategoryConfirm,
            IntakeStep::CategoryManual { .. } => StepKind::CategoryManual,
            IntakeStep::Location { .. } => StepKind::Location,
            IntakeStep::Packaging { .. } => StepKind::Packaging,
            IntakeStep::State { .. } => StepKind::State,
            IntakeStep::Predicting { .. } => StepKind::Predicting,
            IntakeStep::Done(_) => StepKind::Done,
        }
    }
}

/// Which expiry date to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryChoice {
    Predicted,
    Custom,
}

/// One user answer fed into the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardInput {
    Name(String),
    ConfirmCategory(bool),
    ManualCategory(String),
    Location(StorageLocation),
    Packaging(Packaging),
}

impl WizardInput {
    fn step_kind(&self) -> StepKind {
        match self {
            WizardInput::Name(_) => StepKind::Name,
            WizardInput::ConfirmCategory(_) => StepKind::CategoryConfirm,
            WizardInput::ManualCategory(_) => StepKind::CategoryManual,
            WizardInput::Location(_) => StepKind::Location,
            WizardInput::Packaging(_) => StepKind::Packaging,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{0}")]
    Validation(#[from] DomainError),
    #[error("expected {expected} input, but the wizard is at {current}")]
    UnexpectedInput { expected: StepKind, current: StepKind },
    #[error("a shelf-life prediction is in progress")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The intake session. One instance per conversation.
#[derive(Debug, Default)]
pub struct IntakeWizard {
    step: IntakeStep,
    notice: Option<Notice>,
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> &IntakeStep {
        &self.step
    }

    pub fn step_kind(&self) -> StepKind {
        self.step.kind()
    }

    /// True while a prediction request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self.step, IntakeStep::Predicting { .. })
    }

    pub fn summary(&self) -> Option<&PredictionSummary> {
        match &self.step {
            IntakeStep::Done(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Discard everything collected and start over at the name step.
    ///
    /// A prediction still in flight is abandoned; its result will be refused
    /// by [`IntakeWizard::finish_prediction`].
    pub fn restart(&mut self) {
        self.step = IntakeStep::Name;
        self.notice = None;
    }

    /// Apply one answer. On error the wizard stays where it was.
    pub fn apply(&mut self, input: WizardInput) -> Result<(), WizardError> {
        if self.is_busy() {
            return Err(WizardError::Busy);
        }
        let step = std::mem::take(&mut self.step);
        match advance(step, input) {
            Ok(next) => {
                tracing::debug!(step = %next.kind(), "intake advanced");
                self.step = next;
                Ok(())
            }
            Err((unchanged, err)) => {
                self.step = unchanged;
                Err(err)
            }
        }
    }

    pub fn submit_name(&mut self, name: &str) -> Result<(), WizardError> {
        self.apply(WizardInput::Name(name.to_string()))
    }

    pub fn confirm_category(&mut self, accept: bool) -> Result<(), WizardError> {
        self.apply(WizardInput::ConfirmCategory(accept))
    }

    pub fn submit_manual_category(&mut self, text: &str) -> Result<(), WizardError> {
        self.apply(WizardInput::ManualCategory(text.to_string()))
    }

    pub fn choose_location(&mut self, location: StorageLocation) -> Result<(), WizardError> {
        self.apply(WizardInput::Location(location))
    }

    pub fn choose_packaging(&mut self, packaging: Packaging) -> Result<(), WizardError> {
        self.apply(WizardInput::Packaging(packaging))
    }

    /// Record the state answer and enter `Predicting`.
    ///
    /// Returns the payload to send to the predictor. Exactly one request
    /// should be issued per call; the wizard refuses further input until
    /// [`IntakeWizard::finish_prediction`] is called.
    pub fn begin_prediction(&mut self, state: FoodState) -> Result<PredictionRequest, WizardError> {
        if self.is_busy() {
            return Err(WizardError::Busy);
        }
        match std::mem::take(&mut self.step) {
            IntakeStep::State { draft } => {
                let draft = draft.with_state(state);
                let request = PredictionRequest::from(&draft);
                self.step = IntakeStep::Predicting { draft };
                Ok(request)
            }
            other => {
                let current = other.kind();
                self.step = other;
                Err(WizardError::UnexpectedInput {
                    expected: StepKind::State,
                    current,
                })
            }
        }
    }

    /// Settle the outstanding prediction.
    ///
    /// Success moves to `Done` with the predicted expiry computed from `now`.
    /// Failure returns to the state step with the draft intact and leaves an
    /// error notice; nothing is retried.
    pub fn finish_prediction(
        &mut self,
        outcome: ApiResult<Prediction>,
        now: NaiveDateTime,
    ) -> Result<(), WizardError> {
        let draft = match std::mem::take(&mut self.step) {
            IntakeStep::Predicting { draft } => draft,
            // Restarted while the request was in flight.
            other => {
                let current = other.kind();
                self.step = other;
                return Err(WizardError::UnexpectedInput {
                    expected: StepKind::Predicting,
                    current,
                });
            }
        };

        match outcome {
            Ok(prediction) => {
                let predicted_expiry = prediction.expiry_from(now);
                tracing::info!(
                    item = %draft.name,
                    days = prediction.predicted_shelf_life_days,
                    %predicted_expiry,
                    "shelf life predicted"
                );
                self.notice = None;
                self.step = IntakeStep::Done(Box::new(PredictionSummary {
                    draft,
                    prediction,
                    predicted_expiry,
                    custom_expiry: predicted_expiry,
                    saved: None,
                }));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(item = %draft.name, error = %err, "shelf life prediction failed");
                self.notice = Some(Notice::from_api("predicting shelf life", &err));
                self.step = IntakeStep::State { draft };
                Err(WizardError::Api(err))
            }
        }
    }

    /// Answer the state step and run the prediction round-trip.
    pub async fn choose_state<A>(
        &mut self,
        state: FoodState,
        api: &A,
        now: NaiveDateTime,
    ) -> Result<(), WizardError>
    where
        A: PantryApi + ?Sized,
    {
        let request = self.begin_prediction(state)?;
        let outcome = api.predict(&request).await;
        self.finish_prediction(outcome, now)
    }

    /// Update the custom date control.
    pub fn set_custom_expiry(&mut self, date: NaiveDate) -> Result<(), WizardError> {
        match &mut self.step {
            IntakeStep::Done(summary) => {
                summary.custom_expiry = date;
                Ok(())
            }
            other => Err(WizardError::UnexpectedInput {
                expected: StepKind::Done,
                current: other.kind(),
            }),
        }
    }

    /// Save the item with the chosen expiry.
    ///
    /// `today` becomes `purchased_on`. The wizard stays on `Done` either way;
    /// a success is remembered on the summary and announced with a notice.
    pub async fn commit<A>(
        &mut self,
        choice: ExpiryChoice,
        api: &A,
        today: NaiveDate,
    ) -> Result<SavedItem, WizardError>
    where
        A: PantryApi + ?Sized,
    {
        let record = match &self.step {
            IntakeStep::Done(summary) => summary.record_for(choice, today),
            other => {
                return Err(WizardError::UnexpectedInput {
                    expected: StepKind::Done,
                    current: other.kind(),
                });
            }
        };

        match api.add_item(&record).await {
            Ok(saved) => {
                tracing::info!(item = %record.name, expiry = ?record.expiry_on, "item saved");
                if let IntakeStep::Done(summary) = &mut self.step {
                    summary.saved = Some(saved.clone());
                }
                self.notice = Some(Notice::success(SAVED_MESSAGE));
                Ok(saved)
            }
            Err(err) => {
                tracing::warn!(item = %record.name, error = %err, "saving item failed");
                self.notice = Some(Notice::from_api("saving the item", &err));
                Err(WizardError::Api(err))
            }
        }
    }
}

type Transition = Result<IntakeStep, (IntakeStep, WizardError)>;

fn advance(step: IntakeStep, input: WizardInput) -> Transition {
    match (step, input) {
        (IntakeStep::Name, WizardInput::Name(name)) => {
            if name.trim().is_empty() {
                return Err((
                    IntakeStep::Name,
                    DomainError::validation("item name must not be empty").into(),
                ));
            }
            let detected = Category::detect(&name);
            Ok(IntakeStep::CategoryConfirm { name, detected })
        }
        (IntakeStep::CategoryConfirm { name, detected }, WizardInput::ConfirmCategory(true)) => {
            Ok(IntakeStep::Location {
                name,
                category: detected,
            })
        }
        (IntakeStep::CategoryConfirm { name, detected }, WizardInput::ConfirmCategory(false)) => {
            Ok(IntakeStep::CategoryManual { name, detected })
        }
        (IntakeStep::CategoryManual { name, detected }, WizardInput::ManualCategory(text)) => {
            match Category::manual(&text) {
                Ok(category) => Ok(IntakeStep::Location { name, category }),
                Err(err) => Err((IntakeStep::CategoryManual { name, detected }, err.into())),
            }
        }
        (IntakeStep::Location { name, category }, WizardInput::Location(location)) => {
            match DraftItem::new(name.clone(), category.clone(), location) {
                Ok(draft) => Ok(IntakeStep::Packaging { draft }),
                Err(err) => Err((IntakeStep::Location { name, category }, err.into())),
            }
        }
        (IntakeStep::Packaging { draft }, WizardInput::Packaging(packaging)) => {
            Ok(IntakeStep::State {
                draft: draft.with_packaging(packaging),
            })
        }
        (step, input) => {
            let err = WizardError::UnexpectedInput {
                expected: input.step_kind(),
                current: step.kind(),
            };
            Err((step, err))
        }
    }
}
