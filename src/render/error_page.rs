//! Pages served when a render cycle fails.

use chrono::{SecondsFormat, Utc};

use super::page::escape_html;

/// The page to serve for a failed render: diagnostic in debug mode, opaque
/// otherwise.
pub fn error_page(app_name: &str, debug: bool, error: &anyhow::Error) -> String {
    if debug {
        diagnostic_page(app_name, error)
    } else {
        opaque_page(app_name)
    }
}

/// A page listing the error, its cause chain, the backtrace, and the
/// application context.
pub fn diagnostic_page(app_name: &str, error: &anyhow::Error) -> String {
    let causes: String = error
        .chain()
        .skip(1)
        .map(|cause| format!("      <li>{}</li>\n", escape_html(&cause.to_string())))
        .collect();
    let causes = if causes.is_empty() {
        "      <li>(none)</li>\n".to_owned()
    } else {
        causes
    };
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Render error - {app}</title>
  <style>
    body {{ font-family: monospace; margin: 2em; background: #fff5f5; color: #222; }}
    h1 {{ color: #c0392b; }}
    pre {{ background: #f4f4f4; padding: 1em; overflow-x: auto; }}
    dt {{ font-weight: bold; }}
  </style>
</head>
<body>
  <h1>Render error</h1>
  <p class="error">{message}</p>
  <h2>Caused by</h2>
  <ol>
{causes}  </ol>
  <h2>Backtrace</h2>
  <pre>{backtrace}</pre>
  <h2>Context</h2>
  <dl>
    <dt>Application</dt><dd>{app}</dd>
    <dt>Debug</dt><dd>true</dd>
    <dt>Time</dt><dd>{timestamp}</dd>
  </dl>
</body>
</html>
"#,
        app = escape_html(app_name),
        message = escape_html(&error.to_string()),
        backtrace = escape_html(&error.backtrace().to_string()),
    )
}

/// A page that reveals nothing about the failure.
pub fn opaque_page(app_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{app}</title>
</head>
<body>
  <h1>Something went wrong</h1>
  <p>The page could not be rendered. Please try again later.</p>
</body>
</html>
"#,
        app = escape_html(app_name),
    )
}
