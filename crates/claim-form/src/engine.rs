use std::collections::BTreeMap;

use claim_form_spec::{
    ConditionalLogic, FieldDefinition, FieldError, FieldSet, FieldValue, FormData, FormSubmission,
    Locale, RenderTarget, RenderedForm, SpecError, ValidationResult, Visibility, message,
    render_fields, validate_all,
};

use crate::error::SourceError;
use crate::source::FieldDefinitionSource;

/// What the engine knows about the currently applied claim type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    current_claim_type: Option<String>,
    field_registry: BTreeMap<String, FieldDefinition>,
    conditional_rules: BTreeMap<String, ConditionalLogic>,
}

impl EngineState {
    fn from_fields(claim_type: String, fields: &[FieldDefinition]) -> Self {
        let field_registry = fields
            .iter()
            .map(|field| (field.field_name.clone(), field.clone()))
            .collect();
        let conditional_rules = fields
            .iter()
            .filter_map(|field| {
                field
                    .conditional_logic
                    .clone()
                    .map(|rule| (field.field_name.clone(), rule))
            })
            .collect();
        Self {
            current_claim_type: Some(claim_type),
            field_registry,
            conditional_rules,
        }
    }

    pub fn current_claim_type(&self) -> Option<&str> {
        self.current_claim_type.as_deref()
    }

    pub fn field_registry(&self) -> &BTreeMap<String, FieldDefinition> {
        &self.field_registry
    }

    pub fn conditional_rules(&self) -> &BTreeMap<String, ConditionalLogic> {
        &self.conditional_rules
    }

    pub fn is_empty(&self) -> bool {
        self.current_claim_type.is_none() && self.field_registry.is_empty()
    }
}

/// Issued by [`DynamicFormEngine::begin_load`]; only the latest ticket may apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    claim_type: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn claim_type(&self) -> &str {
        &self.claim_type
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// Fields rendered and state replaced.
    Applied { claim_type: String, fields: usize },
    /// The render target shows the load-failure message; state is untouched.
    Failed(SourceError),
    /// A newer load or a reset was issued after this one; the result was dropped.
    Superseded,
    /// Empty claim type: state and render target were cleared.
    Cleared,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied { .. })
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Every visible field is valid; the native form payload may be sent.
    Proceed(FormSubmission),
    Blocked(Vec<FieldError>),
}

/// Owns the render target and state of one claim form.
#[derive(Debug, Default)]
pub struct DynamicFormEngine {
    locale: Locale,
    state: EngineState,
    target: RenderTarget,
    generation: u64,
}

impl DynamicFormEngine {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn form(&self) -> Option<&RenderedForm> {
        self.target.form()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fetches and applies the fields of `claim_type` in one step.
    pub async fn load_fields(
        &mut self,
        source: &dyn FieldDefinitionSource,
        claim_type: Option<&str>,
    ) -> LoadOutcome {
        let Some(ticket) = self.begin_load(claim_type) else {
            return LoadOutcome::Cleared;
        };
        let result = source.fetch_fields(ticket.claim_type()).await;
        self.finish_load(ticket, result)
    }

    /// Starts a load and supersedes every earlier one.
    ///
    /// An empty or absent claim type resets the engine and returns `None`.
    pub fn begin_load(&mut self, claim_type: Option<&str>) -> Option<LoadTicket> {
        let claim_type = claim_type.map(str::trim).filter(|id| !id.is_empty());
        let Some(claim_type) = claim_type else {
            self.reset();
            return None;
        };

        self.generation += 1;
        self.target = RenderTarget::Loading;
        tracing::debug!(claim_type, generation = self.generation, "loading fields");
        Some(LoadTicket {
            generation: self.generation,
            claim_type: claim_type.to_string(),
        })
    }

    /// Applies a fetch result if `ticket` is still the latest load.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<FieldSet, SourceError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::warn!(
                claim_type = %ticket.claim_type,
                generation = ticket.generation,
                latest = self.generation,
                "discarding superseded field response"
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(set) => {
                let fields = set.len();
                self.apply(ticket.claim_type.clone(), set);
                tracing::info!(claim_type = %ticket.claim_type, fields, "claim form fields applied");
                LoadOutcome::Applied {
                    claim_type: ticket.claim_type,
                    fields,
                }
            }
            Err(err) => {
                tracing::warn!(claim_type = %ticket.claim_type, error = %err, "failed to load fields");
                self.target = RenderTarget::Failed(message(self.locale, "load.failed"));
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Renders a definition set directly, replacing state and render target.
    pub fn render_fields(&mut self, claim_type: impl Into<String>, set: FieldSet) {
        self.generation += 1;
        self.apply(claim_type.into(), set);
    }

    fn apply(&mut self, claim_type: String, set: FieldSet) {
        let fields = set.into_fields();
        self.state = EngineState::from_fields(claim_type, &fields);
        self.target = RenderTarget::Fields(render_fields(fields));
    }

    /// Clears state and render target; pending loads become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = EngineState::default();
        self.target = RenderTarget::Empty;
        tracing::debug!(generation = self.generation, "engine reset");
    }

    pub fn evaluate_rule(&mut self, field_name: &str) -> Option<Visibility> {
        claim_form_spec::evaluate_rule(self.target.form_mut()?, field_name)
    }

    /// A user change on a dynamic control.
    pub fn set_value(
        &mut self,
        field_name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), SpecError> {
        match self.target.form_mut() {
            Some(form) => form.set_value(field_name, value),
            None => Err(SpecError::UnknownField(field_name.to_string())),
        }
    }

    pub fn validate(&mut self) -> ValidationResult {
        let locale = self.locale;
        match self.target.form_mut() {
            Some(form) => validate_all(form, locale),
            None => ValidationResult {
                valid: true,
                errors: Vec::new(),
            },
        }
    }

    pub fn validate_all(&mut self) -> bool {
        self.validate().valid
    }

    pub fn submit(&mut self) -> Submission {
        let result = self.validate();
        if !result.valid {
            tracing::debug!(errors = result.errors.len(), "submission blocked");
            return Submission::Blocked(result.errors);
        }
        Submission::Proceed(
            self.form()
                .map(RenderedForm::submission)
                .unwrap_or_default(),
        )
    }

    pub fn form_data(&self) -> FormData {
        self.form().map(RenderedForm::form_data).unwrap_or_default()
    }

    pub fn set_form_data(&mut self, data: &FormData) {
        if let Some(form) = self.target.form_mut() {
            form.populate(data);
        }
    }
}
