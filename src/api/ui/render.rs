//! HTML rendering for the prediction form and about page

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::api::types::PREDICTION_UNIT;
use crate::domain::{ColumnRule, ColumnSpec, FeatureSchema, ModelBundle};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #fdf6f0; margin: 0; color: #333; }
nav { background: #ff7b54; padding: 0.8em 2em; }
nav a { color: white; font-weight: bold; margin-right: 1.5em; text-decoration: none; }
main { max-width: 760px; margin: 2em auto; padding: 0 1em; }
.title { text-align: center; color: #ff7b54; font-size: 28px; font-weight: bold; }
.subtitle { text-align: center; color: #666; font-size: 16px; margin-bottom: 1.5em; }
.grid { display: grid; grid-template-columns: 1fr 1fr; gap: 0.8em 2em; }
label { display: block; font-weight: 600; margin-bottom: 0.2em; }
input, select { width: 100%; padding: 0.4em; box-sizing: border-box; }
button { margin-top: 1.5em; width: 100%; height: 3em; background: #ff7b54; color: white;
         font-weight: bold; border: none; border-radius: 8px; cursor: pointer; }
button:hover { background: #e36443; }
.prediction-box { background: #fffaf0; padding: 25px; border-radius: 12px; margin-top: 1.5em;
                  border: 2px solid #ffb677; text-align: center; }
.prediction-box h1 { color: #ff7b54; }
.error-box { background: #fdecea; border: 2px solid #e57373; border-radius: 12px;
             padding: 1em; margin-top: 1.5em; }
table { border-collapse: collapse; width: 100%; }
td, th { border-bottom: 1px solid #eee; padding: 0.3em; text-align: left; }
"#;

/// Result shown under the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Prediction(f64),
    Error(String),
}

pub fn format_prediction(value: f64) -> String {
    format!("{:.2} {}", value, PREDICTION_UNIT)
}

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Prediction</a><a href=\"/about\">About Project</a></nav>\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn field(spec: &ColumnSpec, value: Option<&str>) -> String {
    let name = escape(&spec.name);
    let value = value.unwrap_or_default();

    let control = match &spec.rule {
        ColumnRule::Numeric { fill_value } => format!(
            "<input type=\"number\" step=\"any\" id=\"{name}\" name=\"{name}\" value=\"{}\" placeholder=\"{:.2}\">",
            escape(value),
            fill_value,
        ),
        ColumnRule::Label {
            classes: domain,
            fill_class: fill,
        }
        | ColumnRule::OneHot {
            categories: domain,
            fill_category: fill,
        } => {
            let mut options = format!(
                "<option value=\"\">(default: {})</option>",
                escape(fill)
            );
            for category in domain.categories() {
                let selected = if category == value { " selected" } else { "" };
                let category = escape(category);
                let _ = write!(
                    options,
                    "<option value=\"{category}\"{selected}>{category}</option>"
                );
            }
            format!("<select id=\"{name}\" name=\"{name}\">{options}</select>")
        }
    };

    format!("<div><label for=\"{name}\">{name}</label>{control}</div>")
}

/// Prediction form with the schema's fields laid out in two columns
pub fn prediction_page(
    schema: &FeatureSchema,
    values: &BTreeMap<String, String>,
    outcome: Option<&FormOutcome>,
) -> String {
    let mut left = String::new();
    let mut right = String::new();

    for (i, spec) in schema.columns().iter().enumerate() {
        let column = if i % 2 == 0 { &mut left } else { &mut right };
        column.push_str(&field(spec, values.get(&spec.name).map(String::as_str)));
    }

    let result = match outcome {
        Some(FormOutcome::Prediction(value)) => format!(
            "<div class=\"prediction-box\"><h3>Predicted Output</h3><h1>{}</h1>\
             <p>This is the expected hourly machine performance.</p></div>",
            format_prediction(*value)
        ),
        Some(FormOutcome::Error(message)) => {
            format!("<div class=\"error-box\">{}</div>", escape(message))
        }
        None => String::new(),
    };

    let body = format!(
        "<div class=\"title\">Manufacturing Output Predictor</div>\
         <div class=\"subtitle\">Predict hourly machine output ({target}) with linear regression</div>\
         <h3>Enter Machine Parameters Below</h3>\
         <form method=\"post\" action=\"/predict\">\
         <div class=\"grid\"><div>{left}</div><div>{right}</div></div>\
         <button type=\"submit\">Predict Output</button></form>{result}",
        target = escape(schema.target()),
    );

    layout("Manufacturing Output Predictor", &body)
}

/// Project overview plus a summary of the loaded model
pub fn about_page(bundle: &ModelBundle) -> String {
    let schema = bundle.schema();

    let mut body = String::from(
        "<h2>Project Overview</h2>\
         <p>This project uses <b>Linear Regression</b> to predict the number of parts produced \
         per hour based on manufacturing parameters such as temperature, pressure, cycle time \
         and material properties.</p>\
         <p>The goal is to help optimize:</p>\
         <ul><li>Machine settings</li><li>Production scheduling</li>\
         <li>Detection of under-performing machines</li></ul>\
         <h2>Loaded Model</h2><table>",
    );

    let _ = write!(
        body,
        "<tr><th>Target</th><td>{}</td></tr>\
         <tr><th>Source columns</th><td>{}</td></tr>\
         <tr><th>Features</th><td>{}</td></tr>\
         <tr><th>Categorical encoding</th><td>{}</td></tr>\
         <tr><th>Schema fingerprint</th><td><code>{}</code></td></tr>",
        escape(schema.target()),
        schema.columns().len(),
        schema.n_features(),
        schema.encoding(),
        schema.fingerprint(),
    );

    if let Some(metadata) = bundle.metadata() {
        let _ = write!(
            body,
            "<tr><th>Trained at</th><td>{}</td></tr>\
             <tr><th>Training rows</th><td>{}</td></tr>\
             <tr><th>Test R&sup2;</th><td>{:.4}</td></tr>\
             <tr><th>Test RMSE</th><td>{:.3}</td></tr>",
            metadata.trained_at.format("%Y-%m-%d %H:%M UTC"),
            metadata.n_rows,
            metadata.test_metrics.r2,
            metadata.test_metrics.rmse,
        );
    }

    body.push_str("</table>");

    layout("About Project", &body)
}
