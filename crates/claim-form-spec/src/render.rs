use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::{
    control::{ControlValue, FieldValue, FormData, FormSubmission},
    error::SpecError,
    i18n::{Locale, message},
    spec::{FieldDefinition, FieldKind},
    validate::FieldError,
    visibility,
};

/// Visibility state of a field wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    /// CSS `display` value applied to the wrapper.
    pub fn display(&self) -> &'static str {
        match self {
            Visibility::Visible => "block",
            Visibility::Hidden => "none",
        }
    }
}

/// One labeled control block: wrapper, control state and error slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBlock {
    pub definition: FieldDefinition,
    pub value: ControlValue,
    pub visibility: Visibility,
    pub error: Option<FieldError>,
}

impl FieldBlock {
    fn new(definition: FieldDefinition) -> Self {
        Self {
            value: ControlValue::empty_for(&definition.kind),
            definition,
            visibility: Visibility::Visible,
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.field_name
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    pub fn label(&self, locale: Locale) -> &str {
        self.definition
            .label
            .resolve(locale)
            .unwrap_or(&self.definition.field_name)
    }

    pub fn css_classes(&self) -> Vec<String> {
        let mut classes = vec!["dynamic-field".to_string()];
        if let Some(extra) = &self.definition.css_class {
            classes.extend(extra.split_whitespace().map(str::to_string));
        }
        if !self.is_visible() {
            classes.push("hidden".to_string());
        }
        if self.is_invalid() {
            classes.push("is-invalid".to_string());
        }
        classes
    }
}

/// Rendered dynamic fields in display order, with their change listeners.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedForm {
    blocks: Vec<FieldBlock>,
    index: BTreeMap<String, usize>,
    listeners: BTreeMap<String, Vec<String>>,
}

impl RenderedForm {
    pub fn blocks(&self) -> &[FieldBlock] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [FieldBlock] {
        &mut self.blocks
    }

    pub fn block(&self, field_name: &str) -> Option<&FieldBlock> {
        self.index.get(field_name).map(|idx| &self.blocks[*idx])
    }

    pub fn block_mut(&mut self, field_name: &str) -> Option<&mut FieldBlock> {
        let idx = *self.index.get(field_name)?;
        Some(&mut self.blocks[idx])
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.blocks.iter().map(FieldBlock::name).collect()
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.index.contains_key(field_name)
    }

    /// Fields whose rule listens to changes of `field_name`.
    pub fn listeners_of(&self, field_name: &str) -> &[String] {
        self.listeners
            .get(field_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// User change on a control: writes the value and fires its change listeners.
    ///
    /// Hidden controls hold no data, so writes to them are refused.
    pub fn set_value(
        &mut self,
        field_name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), SpecError> {
        let value = value.into();
        let block = self
            .block_mut(field_name)
            .ok_or_else(|| SpecError::UnknownField(field_name.to_string()))?;
        if !block.is_visible() {
            return Err(SpecError::HiddenField(field_name.to_string()));
        }
        block.value.assign(&value);
        self.fire_change(field_name);
        Ok(())
    }

    pub(crate) fn fire_change(&mut self, field_name: &str) {
        for dependent in self.listeners_of(field_name).to_vec() {
            visibility::evaluate_rule(self, &dependent);
        }
    }

    /// Snapshot of every dynamic control: lists for checkboxes, the checked
    /// value for radios, raw values otherwise.
    pub fn form_data(&self) -> FormData {
        self.blocks
            .iter()
            .map(|block| (block.name().to_string(), block.value.to_field_value()))
            .collect()
    }

    /// Pre-fills controls from a mapping, then re-evaluates every rule once.
    ///
    /// Unknown names are ignored and file inputs cannot be pre-filled.
    pub fn populate(&mut self, data: &FormData) {
        for (name, value) in data.iter() {
            if let Some(block) = self.block_mut(name)
                && !matches!(block.definition.kind, FieldKind::File(_))
            {
                block.value.assign(value);
            }
        }
        visibility::evaluate_all(self);
    }

    /// Native form serialization of the dynamic controls.
    pub fn submission(&self) -> FormSubmission {
        let pairs = self
            .blocks
            .iter()
            .flat_map(|block| {
                block
                    .value
                    .submission_values()
                    .into_iter()
                    .map(|value| (block.name().to_string(), value))
            })
            .collect();
        FormSubmission { pairs }
    }
}

/// Contents of the region the dynamic fields are rendered into.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RenderTarget {
    #[default]
    Empty,
    Loading,
    Fields(RenderedForm),
    Failed(String),
}

impl RenderTarget {
    pub fn form(&self) -> Option<&RenderedForm> {
        match self {
            RenderTarget::Fields(form) => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut RenderedForm> {
        match self {
            RenderTarget::Fields(form) => Some(form),
            _ => None,
        }
    }

    pub fn control_count(&self) -> usize {
        self.form().map(|form| form.blocks().len()).unwrap_or(0)
    }

    pub fn state_label(&self) -> &'static str {
        match self {
            RenderTarget::Empty => "empty",
            RenderTarget::Loading => "loading",
            RenderTarget::Fields(_) => "fields",
            RenderTarget::Failed(_) => "failed",
        }
    }
}

/// Sorts definitions by `field_order` (stable), builds one block per field,
/// attaches change listeners and runs every rule once.
pub fn render_fields(mut definitions: Vec<FieldDefinition>) -> RenderedForm {
    definitions.sort_by_key(|definition| definition.field_order);

    let mut form = RenderedForm::default();
    for definition in definitions {
        if let Some(rule) = &definition.conditional_logic {
            form.listeners
                .entry(rule.depends_on.clone())
                .or_default()
                .push(definition.field_name.clone());
        }
        form.index
            .insert(definition.field_name.clone(), form.blocks.len());
        form.blocks.push(FieldBlock::new(definition));
    }

    for (depends_on, dependents) in &form.listeners {
        if !form.index.contains_key(depends_on) {
            tracing::warn!(
                depends_on = %depends_on,
                dependents = ?dependents,
                "conditional rule references a field that is not rendered; rule stays inert"
            );
        }
    }

    visibility::evaluate_all(&mut form);
    form
}

/// Structured description of the render target for host pages.
pub fn render_json(target: &RenderTarget, locale: Locale) -> Value {
    match target {
        RenderTarget::Empty => json!({ "state": target.state_label(), "fields": [] }),
        RenderTarget::Loading => json!({
            "state": target.state_label(),
            "message": message(locale, "load.loading"),
            "fields": [],
        }),
        RenderTarget::Failed(text) => json!({
            "state": target.state_label(),
            "message": text,
            "fields": [],
        }),
        RenderTarget::Fields(form) => {
            let fields = form
                .blocks()
                .iter()
                .map(|block| block_json(block, locale))
                .collect::<Vec<_>>();
            json!({ "state": target.state_label(), "locale": locale.as_str(), "fields": fields })
        }
    }
}

fn block_json(block: &FieldBlock, locale: Locale) -> Value {
    let definition = &block.definition;
    let mut map = Map::new();
    map.insert("name".into(), Value::String(definition.field_name.clone()));
    map.insert(
        "type".into(),
        Value::String(definition.kind.type_name().to_string()),
    );
    map.insert("label".into(), Value::String(block.label(locale).to_string()));
    let placeholder = match definition.placeholder.resolve(locale) {
        Some(text) => Some(text.to_string()),
        None if matches!(definition.kind, FieldKind::Select(_)) => {
            Some(message(locale, "form.choose"))
        }
        None => None,
    };
    if let Some(placeholder) = placeholder {
        map.insert("placeholder".into(), Value::String(placeholder));
    }
    if let Some(help) = definition.help_text.resolve(locale) {
        map.insert("help_text".into(), Value::String(help.to_string()));
    }
    map.insert("required".into(), Value::Bool(definition.required));
    map.insert("order".into(), Value::from(definition.field_order));
    map.insert("visible".into(), Value::Bool(block.is_visible()));
    map.insert(
        "display".into(),
        Value::String(block.visibility.display().to_string()),
    );
    map.insert(
        "classes".into(),
        Value::Array(block.css_classes().into_iter().map(Value::String).collect()),
    );
    let attributes = definition
        .native_attributes()
        .into_iter()
        .map(|(name, value)| (name.to_string(), Value::String(value)))
        .collect::<Map<_, _>>();
    map.insert("attributes".into(), Value::Object(attributes));

    let options = definition.kind.options();
    if !options.is_empty() {
        let options = options
            .iter()
            .map(|option| {
                json!({
                    "value": option.value,
                    "label": option.label.resolve(locale).unwrap_or(&option.value),
                })
            })
            .collect::<Vec<_>>();
        map.insert("options".into(), Value::Array(options));
    }
    if let Some(rule) = &definition.conditional_logic {
        map.insert(
            "depends_on".into(),
            Value::String(rule.depends_on.clone()),
        );
    }
    map.insert(
        "value".into(),
        serde_json::to_value(block.value.to_field_value()).unwrap_or(Value::Null),
    );
    map.insert(
        "error".into(),
        block
            .error
            .as_ref()
            .map(|error| Value::String(error.message.clone()))
            .unwrap_or(Value::Null),
    );
    Value::Object(map)
}

/// Human-friendly listing of the render target.
pub fn render_text(target: &RenderTarget, locale: Locale) -> String {
    let form = match target {
        RenderTarget::Empty => return message(locale, "render.empty"),
        RenderTarget::Loading => return message(locale, "load.loading"),
        RenderTarget::Failed(text) => return text.clone(),
        RenderTarget::Fields(form) => form,
    };

    let mut lines = Vec::new();
    for block in form.blocks() {
        let definition = &block.definition;
        let mut entry = format!(
            " - {} ({}) [{}]",
            block.label(locale),
            definition.field_name,
            definition.kind.type_name()
        );
        if definition.required {
            entry.push_str(&format!(" [{}]", message(locale, "render.required")));
        }
        if !block.is_visible() {
            entry.push_str(&format!(" [{}]", message(locale, "render.hidden")));
        }
        if !block.value.is_empty() {
            entry.push_str(&format!(" = {}", block.value.to_field_value().joined()));
        }
        lines.push(entry);

        let options = definition.kind.options();
        if !options.is_empty() {
            let rendered = options
                .iter()
                .map(|option| option.value.as_str())
                .collect::<Vec<_>>()
                .join(" | ");
            lines.push(format!("     {}", rendered));
        }
        if let Some(error) = &block.error {
            lines.push(format!("     ! {}", error.message));
        }
    }
    lines.join("\n")
}
