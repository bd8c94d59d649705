//! Preview rendering: sample-data interpolation and HTML-to-text conversion.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;

use super::interpolation::interpolate;
use super::sample::sample_variables;
use super::types::TemplateContent;

/// Sandbox flags for the expanded HTML preview frame.
pub const PREVIEW_SANDBOX: &str = "allow-same-origin";

/// Visual scale of the expanded preview frame.
pub const PREVIEW_SCALE: f32 = 0.5;

lazy_static! {
    static ref NON_TEXT_RE: Regex = Regex::new(
        r"(?is)<!--.*?-->|<head\b[^>]*>.*?</head\s*>|<style\b[^>]*>.*?</style\s*>|<script\b[^>]*>.*?</script\s*>"
    )
    .expect("valid non-text pattern");
    static ref BLOCK_BREAK_RE: Regex =
        Regex::new(r"(?i)</(?:p|div|h[1-6]|li|tr)\s*>|<br\s*/?>").expect("valid block pattern");
    static ref TAG_RE: Regex = Regex::new(r"<[A-Za-z/!][^>]*>").expect("valid tag pattern");
    static ref ENTITY_RE: Regex =
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").expect("valid entity pattern");
}

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("nbsp", " "),
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("aacute", "á"),
    ("eacute", "é"),
    ("iacute", "í"),
    ("oacute", "ó"),
    ("uacute", "ú"),
    ("Aacute", "Á"),
    ("Eacute", "É"),
    ("Iacute", "Í"),
    ("Oacute", "Ó"),
    ("Uacute", "Ú"),
    ("ntilde", "ñ"),
    ("Ntilde", "Ñ"),
    ("uuml", "ü"),
    ("Uuml", "Ü"),
    ("iexcl", "¡"),
    ("iquest", "¿"),
    ("copy", "©"),
    ("reg", "®"),
    ("hellip", "…"),
    ("mdash", "—"),
    ("ndash", "–"),
    ("laquo", "«"),
    ("raquo", "»"),
];

fn decode_entity(caps: &Captures) -> String {
    let entity = &caps[1];
    let decoded = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(String::from)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from)
    } else {
        NAMED_ENTITIES
            .iter()
            .find(|(name, _)| *name == entity)
            .map(|(_, text)| text.to_string())
    };

    decoded.unwrap_or_else(|| caps[0].to_string())
}

/// Plain-text approximation of an HTML fragment or document.
///
/// Block-level closing tags and `<br>` become line breaks, remaining markup is
/// removed, entities are decoded, and the trimmed non-empty lines are joined
/// with a blank line between them.
pub fn strip_html(html: &str) -> String {
    let without_non_text = NON_TEXT_RE.replace_all(html, "");
    let with_breaks = BLOCK_BREAK_RE.replace_all(&without_non_text, "\n");
    let text = TAG_RE.replace_all(&with_breaks, "");
    let decoded = ENTITY_RE.replace_all(&text, decode_entity);

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill placeholders with the fixed sample data.
pub fn render_preview(text: &str) -> String {
    interpolate(text, sample_variables())
}

/// Shorten to `max_chars` characters, ending with an ellipsis when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Compact plain-text excerpt for template cards.
pub fn card_preview<T: TemplateContent>(template: &T, max_chars: usize) -> String {
    let text = match template.html_body() {
        Some(html) if !html.trim().is_empty() => strip_html(&render_preview(html)),
        _ => strip_html(&render_preview(template.body())),
    };
    truncate_chars(&text, max_chars)
}

/// Expanded preview of every part of a template.
#[derive(Debug, Clone, Serialize)]
pub struct FullPreview {
    pub subject: Option<String>,
    pub body: String,
    /// Rendered HTML document, shown inside a sandboxed frame
    pub html: Option<String>,
    /// Plain-text version of the rendered HTML
    pub html_text: Option<String>,
    pub sandbox: &'static str,
    pub scale: f32,
}

impl FullPreview {
    /// `<iframe>` markup embedding the rendered HTML via `srcdoc`.
    pub fn frame_markup(&self) -> Option<String> {
        self.html.as_ref().map(|html| {
            format!(
                r#"<iframe sandbox="{}" srcdoc="{}" style="width:{}%;height:{}%;border:0;transform:scale({});transform-origin:0 0"></iframe>"#,
                self.sandbox,
                escape_attribute(html),
                100.0 / self.scale,
                100.0 / self.scale,
                self.scale
            )
        })
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render subject, body and HTML with sample data.
pub fn full_preview<T: TemplateContent>(template: &T) -> FullPreview {
    let html = template
        .html_body()
        .filter(|html| !html.trim().is_empty())
        .map(render_preview);
    let html_text = html.as_deref().map(strip_html);

    FullPreview {
        subject: template.subject().map(render_preview),
        body: render_preview(template.body()),
        html,
        html_text,
        sandbox: PREVIEW_SANDBOX,
        scale: PREVIEW_SCALE,
    }
}
