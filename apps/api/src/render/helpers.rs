//! Handlebars helpers used by the résumé template.

use chrono::NaiveDate;
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, Renderable,
};
use serde_json::Value;

pub fn register(registry: &mut Handlebars<'_>) {
    registry.register_helper("formatDate", Box::new(format_date_helper));
    registry.register_helper("join", Box::new(join_helper));
    registry.register_helper("ifNotEmpty", Box::new(IfNotEmptyHelper));
    registry.register_helper("ifEquals", Box::new(IfEqualsHelper));
}

/// Formats any parseable date as "Month Year" (e.g. "January 2023").
/// Unparseable strings such as "Present" pass through verbatim.
pub fn format_month_year(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match parse_flexible(trimmed) {
        Some(date) => date.format("%B %Y").to_string(),
        None => trimmed.to_string(),
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD`, `YYYY-MM`, `MM/YYYY`, `Month YYYY`
/// (full or abbreviated month name), and bare `YYYY`.
fn parse_flexible(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let with_day = [
        (format!("{s}-01"), "%Y-%m-%d"),
        (format!("{s}/01"), "%m/%Y/%d"),
        (format!("{s} 01"), "%B %Y %d"),
        (format!("{s} 01"), "%b %Y %d"),
    ];
    for (candidate, fmt) in &with_day {
        if let Ok(date) = NaiveDate::parse_from_str(candidate, fmt) {
            return Some(date);
        }
    }

    if let Ok(year) = s.parse::<i32>() {
        if (1000..=9999).contains(&year) {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    None
}

fn format_date_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let raw = h.param(0).and_then(|p| p.value().as_str()).unwrap_or("");
    out.write(&format_month_year(raw))?;
    Ok(())
}

/// `{{join list ", "}}` — joins a string array; non-strings are rendered
/// through their JSON form.
fn join_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let separator = h
        .param(1)
        .and_then(|p| p.value().as_str())
        .unwrap_or(", ")
        .to_string();
    if let Some(Value::Array(items)) = h.param(0).map(|p| p.value()) {
        let joined = items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(&separator);
        out.write(&joined)?;
    }
    Ok(())
}

/// A section renders only for a non-empty string, non-empty array, or
/// non-empty object.
fn non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

struct IfNotEmptyHelper;

impl HelperDef for IfNotEmptyHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let render_body = h.param(0).map(|p| non_empty(p.value())).unwrap_or(false);
        let branch = if render_body { h.template() } else { h.inverse() };
        if let Some(template) = branch {
            template.render(r, ctx, rc, out)?;
        }
        Ok(())
    }
}

struct IfEqualsHelper;

impl HelperDef for IfEqualsHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let equal = match (h.param(0), h.param(1)) {
            (Some(a), Some(b)) => a.value() == b.value(),
            _ => false,
        };
        let branch = if equal { h.template() } else { h.inverse() };
        if let Some(template) = branch {
            template.render(r, ctx, rc, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_one(template: &str, data: &Value) -> String {
        let mut registry = Handlebars::new();
        register(&mut registry);
        registry.register_template_string("t", template).unwrap();
        registry.render("t", data).unwrap()
    }

    #[test]
    fn test_format_month_year_iso_date() {
        assert_eq!(format_month_year("2023-01-15"), "January 2023");
    }

    #[test]
    fn test_format_month_year_year_month() {
        assert_eq!(format_month_year("2021-06"), "June 2021");
    }

    #[test]
    fn test_format_month_year_slash_form() {
        assert_eq!(format_month_year("03/2021"), "March 2021");
    }

    #[test]
    fn test_format_month_year_rfc3339() {
        assert_eq!(format_month_year("2019-11-02T10:30:00Z"), "November 2019");
    }

    #[test]
    fn test_format_month_year_month_name_normalizes() {
        assert_eq!(format_month_year("Jun 2020"), "June 2020");
        assert_eq!(format_month_year("June 2020"), "June 2020");
    }

    #[test]
    fn test_format_month_year_bare_year() {
        assert_eq!(format_month_year("2023"), "January 2023");
    }

    #[test]
    fn test_format_month_year_passes_present_through() {
        assert_eq!(format_month_year("Present"), "Present");
    }

    #[test]
    fn test_format_month_year_empty() {
        assert_eq!(format_month_year(""), "");
        assert_eq!(format_month_year("   "), "");
    }

    #[test]
    fn test_format_date_helper_in_template() {
        let out = render_one("{{formatDate start}}", &json!({ "start": "2022-09-01" }));
        assert_eq!(out, "September 2022");
    }

    #[test]
    fn test_join_helper_with_separator() {
        let out = render_one(
            r#"{{join roles ", "}}"#,
            &json!({ "roles": ["Backend", "Infra"] }),
        );
        assert_eq!(out, "Backend, Infra");
    }

    #[test]
    fn test_join_helper_defaults_separator() {
        let out = render_one("{{join roles}}", &json!({ "roles": ["a", "b"] }));
        assert_eq!(out, "a, b");
    }

    #[test]
    fn test_join_helper_ignores_non_arrays() {
        let out = render_one("{{join roles}}", &json!({ "roles": "not-a-list" }));
        assert_eq!(out, "");
    }

    #[test]
    fn test_if_not_empty_string() {
        let template = "{{#ifNotEmpty v}}yes{{else}}no{{/ifNotEmpty}}";
        assert_eq!(render_one(template, &json!({ "v": "text" })), "yes");
        assert_eq!(render_one(template, &json!({ "v": "" })), "no");
        assert_eq!(render_one(template, &json!({ "v": "   " })), "no");
    }

    #[test]
    fn test_if_not_empty_array() {
        let template = "{{#ifNotEmpty v}}yes{{else}}no{{/ifNotEmpty}}";
        assert_eq!(render_one(template, &json!({ "v": [1] })), "yes");
        assert_eq!(render_one(template, &json!({ "v": [] })), "no");
    }

    #[test]
    fn test_if_not_empty_object() {
        let template = "{{#ifNotEmpty v}}yes{{else}}no{{/ifNotEmpty}}";
        assert_eq!(render_one(template, &json!({ "v": { "k": 1 } })), "yes");
        assert_eq!(render_one(template, &json!({ "v": {} })), "no");
    }

    #[test]
    fn test_if_not_empty_null_and_missing() {
        let template = "{{#ifNotEmpty v}}yes{{else}}no{{/ifNotEmpty}}";
        assert_eq!(render_one(template, &json!({ "v": null })), "no");
        assert_eq!(render_one(template, &json!({})), "no");
    }

    #[test]
    fn test_if_equals() {
        let template = "{{#ifEquals a b}}same{{else}}different{{/ifEquals}}";
        assert_eq!(render_one(template, &json!({ "a": 1, "b": 1 })), "same");
        assert_eq!(
            render_one(template, &json!({ "a": 1, "b": 2 })),
            "different"
        );
    }
}
