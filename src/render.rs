//! # Email rendering
//! Table-based, inline-CSS HTML so Gmail renders it the same as everything
//! else, plus a plain-text rendition for the multipart alternative. Layout:
//! dark navy header, white article cards on a light body, one badge-headed
//! section per non-empty category, navy footer with source credits.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::digest::{Digest, Section};

const NAVY: &str = "#0A1628";
const BODY_BG: &str = "#F8FAFC";
const BADGE_BG: &str = "#1E3A5F";
const ACCENT: &str = "#2563EB";

const FOOTER_CREDITS: &str = "Automated daily digest for the RIA community.\nNews sourced from NewsData.io, AdvisorHub, RIABiz, WealthManagement.com, and Financial Planning.\n";

/// `RIA News Digest — Monday, March 10`, with a no-news variant.
pub fn subject_line(has_news: bool, now: DateTime<Utc>) -> String {
    let date = now.format("%A, %B %-d");
    if has_news {
        format!("RIA News Digest — {date}")
    } else {
        format!("RIA News Digest — No news today ({date})")
    }
}

fn render_card(item: &crate::classify::ClassifiedItem) -> String {
    let title = encode_text(&item.item.title);
    let url = encode_double_quoted_attribute(&item.item.url);
    let summary = encode_text(&item.summary);

    let mut meta_parts: Vec<String> = Vec::new();
    if !item.item.source.is_empty() {
        meta_parts.push(encode_text(&item.item.source).to_string());
    }
    if let Some(ts) = item.item.published_at {
        meta_parts.push(ts.format("%b %-d, %Y").to_string());
    }
    let meta = meta_parts.join(" · ");

    format!(
        r#"
    <table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin-bottom:16px;">
      <tr>
        <td style="background:#FFFFFF;border-radius:8px;padding:20px;border:1px solid #E2E8F0;">
          <table width="100%" cellpadding="0" cellspacing="0" border="0">
            <tr>
              <td>
                <a href="{url}" style="font-size:17px;font-weight:700;color:{NAVY};text-decoration:none;line-height:1.4;display:block;margin-bottom:6px;">{title}</a>
              </td>
            </tr>
            <tr>
              <td style="font-size:12px;color:#64748B;margin-bottom:10px;padding-bottom:12px;">{meta}</td>
            </tr>
            <tr>
              <td style="font-size:14px;color:#374151;line-height:1.6;padding-bottom:14px;">{summary}</td>
            </tr>
            <tr>
              <td>
                <a href="{url}" style="font-size:13px;color:{ACCENT};text-decoration:none;font-weight:600;">Read more →</a>
              </td>
            </tr>
          </table>
        </td>
      </tr>
    </table>"#
    )
}

fn render_section(section: &Section) -> String {
    if section.items.is_empty() {
        return String::new();
    }

    let cards: String = section.items.iter().map(render_card).collect();
    let label = encode_text(&section.label);
    let icon = &section.icon;

    format!(
        r#"
    <table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin-bottom:32px;">
      <tr>
        <td>
          <table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin-bottom:16px;">
            <tr>
              <td>
                <span style="display:inline-block;background:{BADGE_BG};color:#FFFFFF;font-size:13px;font-weight:700;padding:6px 14px;border-radius:20px;text-transform:uppercase;letter-spacing:0.5px;">
                  {icon} &nbsp;{label}
                </span>
              </td>
            </tr>
          </table>
          {cards}
        </td>
      </tr>
    </table>"#
    )
}

/// Render the full HTML email. An all-empty digest renders the "no news"
/// panel instead of sections.
pub fn render_digest_html(digest: &Digest, now: DateTime<Utc>, window_hours: i64) -> String {
    let date_header = now.format("%A, %B %-d, %Y");

    let body_content = if digest.is_empty() {
        format!(
            r#"
        <table width="100%" cellpadding="0" cellspacing="0" border="0">
          <tr>
            <td style="padding:40px;text-align:center;color:#64748B;font-size:15px;">
              No relevant RIA industry news was found in the last {window_hours} hours.<br>
              Check back tomorrow.
            </td>
          </tr>
        </table>"#
        )
    } else {
        let sections: String = digest.sections.iter().map(render_section).collect();
        format!(
            r#"
        <table width="100%" cellpadding="0" cellspacing="0" border="0">
          <tr>
            <td style="padding:32px 40px;">
              {sections}
            </td>
          </tr>
        </table>"#
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Daily RIA News Digest</title>
</head>
<body style="margin:0;padding:0;background-color:{BODY_BG};font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Helvetica,Arial,sans-serif;">

  <table width="100%" cellpadding="0" cellspacing="0" border="0" bgcolor="{BODY_BG}">
    <tr>
      <td align="center" style="padding:24px 16px;">

        <table width="640" cellpadding="0" cellspacing="0" border="0" style="max-width:640px;width:100%;">

          <tr>
            <td style="background:{NAVY};border-radius:12px 12px 0 0;padding:32px 40px;">
              <table width="100%" cellpadding="0" cellspacing="0" border="0">
                <tr>
                  <td>
                    <div style="font-size:24px;font-weight:800;color:#FFFFFF;margin-bottom:6px;line-height:1.2;">Daily RIA News Digest</div>
                    <div style="font-size:14px;color:#94A3B8;">{date_header}</div>
                  </td>
                  <td align="right" valign="middle">
                    <div style="font-size:32px;">📊</div>
                  </td>
                </tr>
              </table>
            </td>
          </tr>

          <tr>
            <td style="background:{BODY_BG};padding:0;">
              {body_content}
            </td>
          </tr>

          <tr>
            <td style="background:{NAVY};border-radius:0 0 12px 12px;padding:24px 40px;">
              <table width="100%" cellpadding="0" cellspacing="0" border="0">
                <tr>
                  <td style="color:#94A3B8;font-size:12px;line-height:1.6;">
                    Automated daily digest for the RIA community.
                    <br>
                    News sourced from NewsData.io, AdvisorHub, RIABiz, WealthManagement.com, and Financial Planning.
                  </td>
                </tr>
              </table>
            </td>
          </tr>

        </table>

      </td>
    </tr>
  </table>

</body>
</html>"#
    )
}

/// Plain-text rendition of the same digest for the multipart alternative.
pub fn render_digest_text(digest: &Digest, now: DateTime<Utc>, window_hours: i64) -> String {
    let mut out = String::new();
    out.push_str("Daily RIA News Digest\n");
    out.push_str(&now.format("%A, %B %-d, %Y").to_string());
    out.push_str("\n\n");

    if digest.is_empty() {
        out.push_str(&format!(
            "No relevant RIA industry news was found in the last {window_hours} hours.\nCheck back tomorrow.\n\n"
        ));
        out.push_str(FOOTER_CREDITS);
        return out;
    }

    for section in &digest.sections {
        if section.items.is_empty() {
            continue;
        }
        let heading = section.label.to_uppercase();
        out.push_str(&heading);
        out.push('\n');
        out.push_str(&"-".repeat(heading.chars().count()));
        out.push_str("\n\n");

        for item in &section.items {
            out.push_str(&format!("* {}\n", item.item.title));
            let mut meta_parts: Vec<String> = Vec::new();
            if !item.item.source.is_empty() {
                meta_parts.push(item.item.source.clone());
            }
            if let Some(ts) = item.item.published_at {
                meta_parts.push(ts.format("%b %-d, %Y").to_string());
            }
            if !meta_parts.is_empty() {
                out.push_str(&format!("  {}\n", meta_parts.join(" · ")));
            }
            if !item.summary.is_empty() {
                out.push_str(&format!("  {}\n", item.summary));
            }
            out.push_str(&format!("  {}\n\n", item.item.url));
        }
    }

    out.push_str(FOOTER_CREDITS);
    out
}
