//! HTML rendering for the feedback page

use sqa_common::db::feedback::{MAX_COMMENT_CHARS, MAX_REVIEWER_CHARS};
use sqa_common::db::models::{FeedbackSummary, Judgment};

use super::page::{PageView, ResultView};
use crate::api::buildinfo::BuildInfo;

/// Messages shown on top of the regular page content
#[derive(Debug, Clone, Default)]
pub struct Messages {
    /// Success banner
    pub notice: Option<String>,
    /// Page-level error banner (storage failures)
    pub page_error: Option<String>,
    /// Inline validation error for one result's form
    pub form_error: Option<FormError>,
}

/// Rejected submission, echoed back into its form
#[derive(Debug, Clone)]
pub struct FormError {
    pub result_id: i64,
    pub message: String,
    pub judgment: Option<String>,
    pub comment: Option<String>,
    pub reviewer: Option<String>,
}

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }
        header {
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        h1 { font-size: 26px; color: #4a9eff; }
        h2 { color: #4a9eff; margin: 20px 0 10px; font-size: 20px; }
        h3 { color: #9cc7ff; margin: 10px 0 6px; font-size: 16px; }
        .build-info { font-family: 'Courier New', monospace; color: #888; font-size: 13px; text-align: right; }
        .layout { display: grid; grid-template-columns: 240px 1fr 380px; gap: 20px; padding: 20px; }
        .panel { background: #242424; border: 1px solid #3a3a3a; border-radius: 6px; padding: 15px; }
        .song-list a { display: block; padding: 6px 8px; color: #e0e0e0; text-decoration: none; border-radius: 4px; }
        .song-list a.selected, .song-list a:hover { background: #4a9eff; color: #fff; }
        .lyrics { white-space: pre-wrap; background: #1a1a1a; padding: 10px; border-radius: 4px; font-size: 14px; max-height: 260px; overflow-y: auto; }
        .meta { color: #888; font-size: 14px; }
        .result { border-top: 1px solid #3a3a3a; margin-top: 15px; padding-top: 10px; }
        textarea, input[type=text], select {
            width: 100%; background: #1a1a1a; color: #e0e0e0;
            border: 1px solid #3a3a3a; border-radius: 4px; padding: 6px; margin: 4px 0;
        }
        button { padding: 8px 18px; background: #4a9eff; color: #fff; border: none; border-radius: 4px; font-weight: 600; cursor: pointer; }
        button:hover { background: #3a8eef; }
        table { width: 100%; border-collapse: collapse; font-size: 14px; }
        th, td { text-align: left; padding: 4px 6px; border-bottom: 1px solid #3a3a3a; }
        .banner { margin: 20px 20px 0; padding: 10px 15px; border-radius: 4px; font-weight: 600; }
        .banner-ok { background: #10b981; color: #fff; }
        .banner-error { background: #ef4444; color: #fff; }
        .form-error { color: #ef4444; font-weight: 600; margin: 4px 0; }
        .empty { color: #888; font-style: italic; }
"#;

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a value for use inside a query string
pub fn encode_query_value(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn opt_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().unwrap_or(fallback)
}

fn percentage(summary: &FeedbackSummary) -> String {
    summary
        .agree_percentage()
        .map(|p| format!("{:.1}%", p))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Page chrome shared by the full page and the bare error page
fn document(body: &str) -> String {
    let build = BuildInfo::current();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Lyrics Sentiment Feedback</title>
    <style>{style}</style>
</head>
<body>
<header>
    <div>
        <h1>Lyrics Sentiment Analysis Feedback</h1>
        <div class="meta">Review precomputed sentiment results and tell us whether they are accurate.</div>
    </div>
    <div class="build-info">
        <div>v{version} [{git_hash}]</div>
        <div>{build_timestamp} ({build_profile})</div>
    </div>
</header>
{body}
</body>
</html>
"#,
        style = STYLE,
        version = build.version,
        git_hash = build.git_hash,
        build_timestamp = build.build_timestamp,
        build_profile = build.build_profile,
        body = body,
    )
}

/// Page shown when nothing can be read from the database
pub fn render_error_page(message: &str) -> String {
    document(&format!(
        r#"<div class="banner banner-error">{}</div>"#,
        escape_html(message)
    ))
}

/// Full single-page view
pub fn render_page(view: &PageView, messages: &Messages) -> String {
    let mut body = String::new();

    if let Some(notice) = &messages.notice {
        body.push_str(&format!(
            r#"<div class="banner banner-ok">{}</div>"#,
            escape_html(notice)
        ));
    }
    if let Some(error) = &messages.page_error {
        body.push_str(&format!(
            r#"<div class="banner banner-error">{}</div>"#,
            escape_html(error)
        ));
    }

    body.push_str(r#"<div class="layout">"#);
    body.push_str(&render_song_list(view));
    body.push_str(&render_song_panel(view, messages.form_error.as_ref()));
    body.push_str(&render_summary_panel(view));
    body.push_str("</div>");

    document(&body)
}

/// Link to a song, keeping the current model filter
fn song_href(song_id: i64, model: Option<&str>) -> String {
    match model {
        Some(model) => format!(
            "/?song={}&amp;model={}",
            song_id,
            escape_html(&encode_query_value(model))
        ),
        None => format!("/?song={}", song_id),
    }
}

fn render_song_list(view: &PageView) -> String {
    let mut html = String::from(r#"<nav class="panel song-list"><h2>Songs</h2>"#);

    if view.songs.is_empty() {
        html.push_str(r#"<p class="empty">No songs in the catalog yet.</p>"#);
    }

    let selected_id = view.selected.as_ref().map(|s| s.id);
    for song in &view.songs {
        let class = if Some(song.id) == selected_id { " class=\"selected\"" } else { "" };
        html.push_str(&format!(
            r#"<a href="{}"{}>{}<br><span class="meta">{}</span></a>"#,
            song_href(song.id, view.model_filter.as_deref()),
            class,
            escape_html(&song.title),
            escape_html(&song.artist),
        ));
    }

    html.push_str("</nav>");
    html
}

fn render_song_panel(view: &PageView, form_error: Option<&FormError>) -> String {
    let Some(song) = &view.selected else {
        return r#"<main class="panel"><p class="empty">No sentiment analyses available for feedback.</p></main>"#
            .to_string();
    };

    let mut html = String::from(r#"<main class="panel">"#);
    html.push_str(&format!(
        r#"<h2>{}</h2><div class="meta">{} &middot; {} &middot; {}</div>"#,
        escape_html(&song.title),
        escape_html(&song.artist),
        escape_html(opt_or(&song.album, "Unknown album")),
        escape_html(opt_or(&song.release_date, "Unknown release date")),
    ));
    html.push_str(&format!(
        r#"<h3>Lyrics</h3><div class="lyrics">{}</div>"#,
        escape_html(&song.lyrics)
    ));
    if let Some(url) = &song.lyrics_url {
        html.push_str(&format!(
            r#"<p class="meta"><a href="{0}" rel="noopener">{0}</a></p>"#,
            escape_html(url)
        ));
    }

    html.push_str("<h2>Sentiment results</h2>");
    if view.results.is_empty() {
        html.push_str(r#"<p class="empty">No sentiment results for this song.</p>"#);
    }
    for result in &view.results {
        let error = form_error.filter(|e| e.result_id == result.result.id);
        html.push_str(&render_result(song.id, view.model_filter.as_deref(), result, error));
    }

    html.push_str("</main>");
    html
}

fn render_result(
    song_id: i64,
    model: Option<&str>,
    view: &ResultView,
    error: Option<&FormError>,
) -> String {
    let result = &view.result;
    let checked = |judgment: Judgment| {
        let selected = error
            .and_then(|e| e.judgment.as_deref())
            .map(|j| j.trim().eq_ignore_ascii_case(judgment.as_str()))
            .unwrap_or(false);
        if selected { " checked" } else { "" }
    };

    let radios: String = Judgment::ALL
        .iter()
        .map(|j| {
            format!(
                r#"<label><input type="radio" name="judgment" value="{}"{}> {}</label> "#,
                j.as_str(),
                checked(*j),
                j.label()
            )
        })
        .collect();

    let error_html = error
        .map(|e| format!(r#"<div class="form-error">{}</div>"#, escape_html(&e.message)))
        .unwrap_or_default();
    let comment = error.and_then(|e| e.comment.as_deref()).unwrap_or("");
    let reviewer = error.and_then(|e| e.reviewer.as_deref()).unwrap_or("");
    let model_field = model
        .map(|m| format!(r#"<input type="hidden" name="model" value="{}">"#, escape_html(m)))
        .unwrap_or_default();

    format!(
        r#"<section class="result" id="result-{id}">
    <h3>{model_name}</h3>
    <div>Category: <strong>{label}</strong> &middot; Score: <strong>{score:.3}</strong></div>
    <div class="meta">Feedback so far: {agree} accurate, {disagree} not accurate</div>
    <form method="post" action="/feedback">
        <input type="hidden" name="result_id" value="{id}">
        <input type="hidden" name="song_id" value="{song_id}">
        {model_field}
        <div>Is this sentiment analysis accurate? {radios}</div>
        <textarea name="comment" rows="3" maxlength="{max_comment}" placeholder="Why do you think this? (optional)">{comment}</textarea>
        <input type="text" name="reviewer" maxlength="{max_reviewer}" placeholder="Your name (optional)" value="{reviewer}">
        {error_html}
        <button type="submit">Submit Feedback</button>
    </form>
</section>
"#,
        id = result.id,
        model_name = escape_html(&result.model),
        label = escape_html(opt_or(&result.label, "Not categorized")),
        score = result.score,
        agree = view.feedback.agree_count,
        disagree = view.feedback.disagree_count,
        song_id = song_id,
        model_field = model_field,
        radios = radios,
        max_comment = MAX_COMMENT_CHARS,
        max_reviewer = MAX_REVIEWER_CHARS,
        comment = escape_html(comment),
        reviewer = escape_html(reviewer),
        error_html = error_html,
    )
}

fn render_summary_panel(view: &PageView) -> String {
    let mut html = String::from(r#"<aside class="panel"><h2>Summary</h2>"#);

    // Model filter
    let selected_song = view
        .selected
        .as_ref()
        .map(|s| format!(r#"<input type="hidden" name="song" value="{}">"#, s.id))
        .unwrap_or_default();
    let mut options = String::from(r#"<option value="">All models</option>"#);
    for model in &view.models {
        let selected = if view.model_filter.as_deref() == Some(model.as_str()) {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape_html(model),
            selected
        ));
    }
    html.push_str(&format!(
        r#"<form method="get" action="/">{}<select name="model">{}</select> <button type="submit">Filter</button></form>"#,
        selected_song, options
    ));

    let scope = view
        .model_filter
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "all models".to_string());
    html.push_str(&format!(
        r#"<h3>Feedback for {}</h3>
<table>
    <tr><th>Accurate</th><td>{}</td></tr>
    <tr><th>Not accurate</th><td>{}</td></tr>
    <tr><th>Total</th><td>{}</td></tr>
    <tr><th>Agreement</th><td>{}</td></tr>
</table>"#,
        scope,
        view.summary.agree_count,
        view.summary.disagree_count,
        view.summary.total_count,
        percentage(&view.summary),
    ));

    html.push_str(
        "<h3>Model comparison</h3><table><tr><th>Model</th><th>Results</th><th>Avg score</th><th>Feedback</th><th>Agreement</th></tr>",
    );
    for model in &view.by_model {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&model.model),
            model.result_count,
            model
                .average_score
                .map(|s| format!("{:.3}", s))
                .unwrap_or_else(|| "n/a".to_string()),
            model.feedback.total_count,
            percentage(&model.feedback),
        ));
    }
    html.push_str("</table>");

    html.push_str(
        "<h3>Sentiment analyses</h3><table><tr><th>Song</th><th>Model</th><th>Category</th><th>Score</th></tr>",
    );
    for row in &view.analyses {
        html.push_str(&format!(
            r#"<tr><td><a href="{}">{}</a></td><td>{}</td><td>{}</td><td>{:.3}</td></tr>"#,
            song_href(row.song_id, view.model_filter.as_deref()),
            escape_html(&row.title),
            escape_html(&row.model),
            escape_html(opt_or(&row.label, "Not categorized")),
            row.score,
        ));
    }
    html.push_str("</table>");

    html.push_str("<h3>Recent feedback</h3>");
    if view.recent.is_empty() {
        html.push_str(r#"<p class="empty">No feedback yet.</p>"#);
    } else {
        html.push_str("<table><tr><th>When</th><th>Result</th><th>Verdict</th><th>Comment</th></tr>");
        for record in &view.recent {
            html.push_str(&format!(
                "<tr><td>{}</td><td>#{}</td><td>{}</td><td>{}</td></tr>",
                record.created_at.format("%Y-%m-%d %H:%M"),
                record.result_id,
                record.judgment.label(),
                escape_html(opt_or(&record.comment, "")),
            ));
        }
        html.push_str("</table>");
    }

    html.push_str("</aside>");
    html
}
