//! Form widgets.

use super::{escape, PageContext};
use crate::types::FieldErrors;
use crate::web::forms::{FieldKind, FieldSpec, FormTheme, HtmlForm};

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!("<ul class=\"errorlist\">{items}</ul>\n")
}

fn widget<F: HtmlForm>(form: &F, field: &FieldSpec, theme: FormTheme) -> String {
    let class = theme.css_class(field.kind);
    let placeholder = theme
        .placeholder(field)
        .map(|p| format!(" placeholder=\"{}\"", escape(&p)))
        .unwrap_or_default();

    match field.kind {
        FieldKind::Checkbox => format!(
            "<input type=\"checkbox\" name=\"{name}\" id=\"id_{name}\" class=\"{class}\"{checked}>",
            name = field.name,
            checked = if form.is_checked(field.name) { " checked" } else { "" },
        ),
        // Passwords are never echoed back
        FieldKind::Password => format!(
            "<input type=\"password\" name=\"{name}\" id=\"id_{name}\" class=\"{class}\"{placeholder}>",
            name = field.name,
        ),
        FieldKind::Text | FieldKind::Email => format!(
            "<input type=\"{kind}\" name=\"{name}\" id=\"id_{name}\" value=\"{value}\" class=\"{class}\"{placeholder}>",
            kind = if field.kind == FieldKind::Email { "email" } else { "text" },
            name = field.name,
            value = escape(form.text_value(field.name)),
        ),
    }
}

/// Full `<form>` element: CSRF input, non-field errors, then every field
/// with its own errors.
pub(crate) fn render_form<F: HtmlForm>(
    ctx: &PageContext,
    form: &F,
    errors: &FieldErrors,
    theme: FormTheme,
    action: &str,
    submit_label: &str,
) -> String {
    let mut html = format!(
        "<form method=\"post\" action=\"{}\" novalidate>\n{}\n{}",
        escape(action),
        ctx.csrf_input(),
        error_list(errors.non_field()),
    );

    for field in F::FIELDS {
        html.push_str(&format!(
            "<div class=\"field\">\n<label for=\"id_{name}\">{label}</label>\n{widget}\n{errors}</div>\n",
            name = field.name,
            label = escape(field.label),
            widget = widget(form, field, theme),
            errors = error_list(errors.get(field.name)),
        ));
    }

    html.push_str(&format!(
        "<button type=\"submit\" class=\"btn btn-primary\">{}</button>\n</form>\n",
        escape(submit_label)
    ));
    html
}
