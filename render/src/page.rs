//! HTML page generation.

use std::fmt::Write;

/// Everything the page template needs, already formatted. Building this is
/// the caller's job; rendering never computes times or touches the table
/// model.
#[derive(Debug, Clone, Default)]
pub struct PageModel {
    /// Wall-clock generation time in the market timezone, e.g.
    /// `"2026-08-04 14:03:22"`.
    pub generated_at: String,
    /// IANA name of the market timezone, shown next to the timestamp.
    pub timezone: String,
    /// Label of the resolved block, when any row was resolved.
    pub interval_label: Option<String>,
    /// Field name / display value pairs for the resolved row, in column
    /// order.
    pub fields: Vec<(String, String)>,
    /// Resolver diagnostic; empty means an exact, current match.
    pub diagnostic: String,
    /// Advisory next refresh time, e.g. `"14:15"`.
    pub next_update: String,
}

/// Render the page as a complete HTML document.
#[must_use]
pub fn render_page(model: &PageModel) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        "    <h1>Intraday Market Data</h1>\n    <p class=\"meta\"><strong>Last updated ({}):</strong> {}</p>\n",
        escape(&model.timezone),
        escape(&model.generated_at)
    );

    if !model.diagnostic.is_empty() {
        let _ = write!(
            body,
            "    <p class=\"notice\">{}</p>\n",
            escape(&model.diagnostic)
        );
    }

    match &model.interval_label {
        Some(label) => {
            let _ = write!(
                body,
                "    <h2>Block {}</h2>\n    <dl>\n",
                escape(label)
            );
            for (name, value) in &model.fields {
                let _ = write!(
                    body,
                    "      <dt>{}</dt><dd>{}</dd>\n",
                    escape(name),
                    escape(value)
                );
            }
            body.push_str("    </dl>\n");
        }
        None => body.push_str("    <p class=\"notice\">No market data is available.</p>\n"),
    }

    let _ = write!(
        body,
        "    <p class=\"meta\">Next scheduled update: {}</p>\n",
        escape(&model.next_update)
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Intraday Market Data</title>
    <style>
        body {{
            font-family: Arial, sans-serif;
            margin: 20px;
            background-color: #f9f9f9;
            color: #333;
        }}
        h1 {{ color: #333; }}
        dl {{ font-size: 16px; color: #555; }}
        dt {{ font-weight: bold; margin-top: 8px; }}
        .meta {{ color: #777; font-size: 14px; }}
        .notice {{
            background-color: #fff3cd;
            border: 1px solid #ffe69c;
            padding: 8px;
            font-size: 14px;
        }}
    </style>
</head>
<body>
{body}</body>
</html>
"#
    )
}

/// Minimal HTML escaping for text content and attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
