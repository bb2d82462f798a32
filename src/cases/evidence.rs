//! Evidence normalization
//!
//! The intake surfaces historically sent evidence as free text, a JSON-encoded
//! file descriptor list, or newline-delimited mixed text and URLs. It is
//! normalized to one typed structure at the boundary so consumers never
//! re-parse it.

use serde::{Deserialize, Serialize};

/// Normalized evidence payload stored on a case
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Evidence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// External file reference attached as evidence
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl Evidence {
    /// Whether the payload carries neither notes nor attachments
    pub fn is_empty(&self) -> bool {
        self.notes.is_none() && self.attachments.is_empty()
    }

    /// Normalize a raw evidence string into the typed structure.
    ///
    /// Accepted shapes, tried in order:
    /// 1. JSON object `{notes, attachments}` (already normalized)
    /// 2. JSON array of attachment descriptors
    /// 3. Newline-delimited mix of URLs and free text
    pub fn from_raw(raw: &str) -> Evidence {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Evidence::default();
        }

        if let Ok(evidence) = serde_json::from_str::<Evidence>(trimmed) {
            return evidence;
        }

        if let Ok(attachments) = serde_json::from_str::<Vec<Attachment>>(trimmed) {
            return Evidence {
                notes: None,
                attachments,
            };
        }

        let mut notes_lines = Vec::new();
        let mut attachments = Vec::new();
        for line in trimmed.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("http://") || line.starts_with("https://") {
                attachments.push(Attachment {
                    name: file_name_from_url(line),
                    url: line.to_string(),
                    content_type: None,
                    size: None,
                });
            } else {
                notes_lines.push(line);
            }
        }

        Evidence {
            notes: if notes_lines.is_empty() {
                None
            } else {
                Some(notes_lines.join("\n"))
            },
            attachments,
        }
    }
}

/// Best-effort display name from the last URL path segment
fn file_name_from_url(url: &str) -> String {
    let without_scheme = url.splitn(2, "://").nth(1).unwrap_or(url);
    let mut segments = without_scheme.split('/');
    let _host = segments.next();
    segments
        .filter(|s| !s.is_empty())
        .last()
        .and_then(|s| s.split('?').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("attachment")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(Evidence::from_raw("").is_empty());
        assert!(Evidence::from_raw("   \n  ").is_empty());
    }

    #[test]
    fn test_plain_text() {
        let evidence = Evidence::from_raw("They contacted me on a dating app.");
        assert_eq!(
            evidence.notes.as_deref(),
            Some("They contacted me on a dating app.")
        );
        assert!(evidence.attachments.is_empty());
    }

    #[test]
    fn test_already_normalized_json() {
        let raw = r#"{"notes":"screenshots below","attachments":[{"name":"chat.png","url":"https://cdn.example.com/chat.png","content_type":"image/png","size":1024}]}"#;
        let evidence = Evidence::from_raw(raw);
        assert_eq!(evidence.notes.as_deref(), Some("screenshots below"));
        assert_eq!(evidence.attachments.len(), 1);
        assert_eq!(evidence.attachments[0].name, "chat.png");
        assert_eq!(evidence.attachments[0].size, Some(1024));
    }

    #[test]
    fn test_json_attachment_list() {
        let raw = r#"[{"name":"receipt.pdf","url":"https://cdn.example.com/receipt.pdf"}]"#;
        let evidence = Evidence::from_raw(raw);
        assert!(evidence.notes.is_none());
        assert_eq!(evidence.attachments.len(), 1);
        assert_eq!(evidence.attachments[0].url, "https://cdn.example.com/receipt.pdf");
    }

    #[test]
    fn test_mixed_lines() {
        let raw = "Bank transfer reference 4411\nhttps://imgur.com/a/proof.png\nSpoke to them on 2024-03-01";
        let evidence = Evidence::from_raw(raw);
        assert_eq!(
            evidence.notes.as_deref(),
            Some("Bank transfer reference 4411\nSpoke to them on 2024-03-01")
        );
        assert_eq!(evidence.attachments.len(), 1);
        assert_eq!(evidence.attachments[0].name, "proof.png");
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://cdn.example.com/files/chat.png"),
            "chat.png"
        );
        assert_eq!(
            file_name_from_url("https://cdn.example.com/files/chat.png?token=abc"),
            "chat.png"
        );
        assert_eq!(file_name_from_url("https://cdn.example.com/"), "attachment");
    }
}
