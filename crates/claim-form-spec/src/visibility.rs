use crate::render::{RenderedForm, Visibility};

/// Re-decides the visibility of `field_name` from its dependency's current value.
///
/// Returns `None` when the field has no rule or its `depends_on` target is not
/// rendered; such fields keep their current visibility. Hiding a field clears
/// its value, and a clear that discards data notifies the field's own
/// listeners.
pub fn evaluate_rule(form: &mut RenderedForm, field_name: &str) -> Option<Visibility> {
    let rule = form
        .block(field_name)?
        .definition
        .conditional_logic
        .clone()?;
    let Some(dependency) = form.block(&rule.depends_on) else {
        tracing::debug!(
            field = field_name,
            depends_on = %rule.depends_on,
            "dependency not rendered; rule skipped"
        );
        return None;
    };
    let holds = rule.holds(&dependency.value.dependency_value());

    let block = form.block_mut(field_name)?;
    let discarded = if holds {
        block.visibility = Visibility::Visible;
        false
    } else {
        block.visibility = Visibility::Hidden;
        block.value.clear()
    };
    let visibility = block.visibility;
    tracing::debug!(
        field = field_name,
        condition = rule.condition.operator(),
        visible = holds,
        "conditional rule evaluated"
    );

    if discarded {
        form.fire_change(field_name);
    }
    Some(visibility)
}

/// Runs every conditional rule once, in render order.
pub fn evaluate_all(form: &mut RenderedForm) {
    let names = form
        .field_names()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    for name in names {
        evaluate_rule(form, &name);
    }
}
