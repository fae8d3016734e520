//! Text presentation of results, independent of any UI toolkit.
//!
//! Both the TUI and the one-shot commands render from [`ViewLine`]s so the
//! layout and the fallback rules live in one place. Front ends only map a
//! [`LineKind`] to their own styling.

use std::fmt;

use crate::models::{ChatResult, IdentifyResult};

/// Shown wherever an optional value is missing.
pub const PLACEHOLDER: &str = "—";

/// Role of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    /// Secondary information such as taxonomy or provenance.
    Detail,
    /// `label: value`
    Field,
    Heading,
    Use,
    Caution,
    Body,
    Notice,
    Disclaimer,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewLine {
    pub kind: LineKind,
    /// Set for [`LineKind::Field`] only.
    pub label: Option<&'static str>,
    pub text: String,
}

impl ViewLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            label: None,
            text: text.into(),
        }
    }

    fn field(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Field,
            label: Some(label),
            text: value.into(),
        }
    }

    fn bullet(kind: LineKind, item: &str) -> Self {
        Self::new(kind, format!("  • {}", item))
    }

    fn blank() -> Self {
        Self::new(LineKind::Blank, String::new())
    }
}

impl fmt::Display for ViewLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "{}: {}", label, self.text),
            None => f.write_str(&self.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyView {
    pub scientific_name: String,
    pub confidence: String,
    pub common_names: String,
    /// "Family · Genus" when the backend sent either.
    pub taxonomy: Option<String>,
    pub provider: Option<String>,
    pub enrichment: Option<EnrichmentView>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentView {
    pub common_name: Option<String>,
    pub medicinal_uses: Vec<String>,
    pub contraindications: Vec<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

impl From<&IdentifyResult> for IdentifyView {
    fn from(result: &IdentifyResult) -> Self {
        let common_names = if result.common_names.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            result.common_names.join(", ")
        };

        let taxonomy = match (&result.family, &result.genus) {
            (Some(family), Some(genus)) => Some(format!("{} · {}", family, genus)),
            (Some(one), None) | (None, Some(one)) => Some(one.clone()),
            (None, None) => None,
        };

        Self {
            scientific_name: result
                .scientific_name
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            confidence: result
                .confidence
                .map(|c| c.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            common_names,
            taxonomy,
            provider: result.raw_provider.clone(),
            enrichment: result.enrichment.as_ref().map(|e| EnrichmentView {
                common_name: e.common_name.clone(),
                medicinal_uses: e.medicinal_uses.clone(),
                contraindications: e.contraindications.clone(),
                notes: e.notes.clone(),
                source: e.source.clone(),
            }),
            message: result.message.clone(),
        }
    }
}

impl IdentifyView {
    pub fn lines(&self) -> Vec<ViewLine> {
        let mut lines = vec![ViewLine::new(LineKind::Title, self.scientific_name.as_str())];
        if let Some(taxonomy) = &self.taxonomy {
            lines.push(ViewLine::new(LineKind::Detail, taxonomy.as_str()));
        }
        lines.push(ViewLine::field("Confidence", self.confidence.as_str()));
        lines.push(ViewLine::field("Common names", self.common_names.as_str()));
        if let Some(provider) = &self.provider {
            lines.push(ViewLine::field("Provider", provider.as_str()));
        }

        if let Some(enrichment) = &self.enrichment {
            lines.push(ViewLine::blank());
            if let Some(name) = &enrichment.common_name {
                lines.push(ViewLine::field("Known as", name.as_str()));
            }
            lines.push(ViewLine::new(LineKind::Heading, "Medicinal uses"));
            lines.extend(
                enrichment
                    .medicinal_uses
                    .iter()
                    .map(|u| ViewLine::bullet(LineKind::Use, u)),
            );
            lines.push(ViewLine::new(LineKind::Heading, "Contraindications"));
            lines.extend(
                enrichment
                    .contraindications
                    .iter()
                    .map(|c| ViewLine::bullet(LineKind::Caution, c)),
            );
            if let Some(notes) = &enrichment.notes {
                lines.push(ViewLine::blank());
                lines.push(ViewLine::new(LineKind::Body, notes.as_str()));
            }
            if let Some(source) = &enrichment.source {
                lines.push(ViewLine::new(LineKind::Detail, format!("Source: {}", source)));
            }
        }

        if let Some(message) = &self.message {
            lines.push(ViewLine::blank());
            lines.push(ViewLine::new(LineKind::Notice, message.as_str()));
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatView {
    /// Answer split on `\n`; blank lines are kept.
    pub answer_lines: Vec<String>,
    pub disclaimer: String,
    pub lang: Option<String>,
}

impl From<&ChatResult> for ChatView {
    fn from(result: &ChatResult) -> Self {
        let answer_lines = result
            .answer
            .split('\n')
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect();

        Self {
            answer_lines,
            disclaimer: result.disclaimer.clone(),
            lang: result.lang.clone(),
        }
    }
}

impl ChatView {
    pub fn lines(&self) -> Vec<ViewLine> {
        let mut lines: Vec<ViewLine> = self
            .answer_lines
            .iter()
            .map(|l| ViewLine::new(LineKind::Body, l.as_str()))
            .collect();

        if !self.disclaimer.is_empty() || self.lang.is_some() {
            lines.push(ViewLine::blank());
        }
        if !self.disclaimer.is_empty() {
            lines.push(ViewLine::new(LineKind::Disclaimer, self.disclaimer.as_str()));
        }
        if let Some(lang) = &self.lang {
            lines.push(ViewLine::new(LineKind::Detail, format!("Language: {}", lang)));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Enrichment;

    fn plain(lines: &[ViewLine]) -> String {
        lines.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn aloe_result_renders_every_value() {
        let result = IdentifyResult {
            scientific_name: Some("Aloe vera".into()),
            confidence: Some(0.92),
            common_names: vec!["Aloe".into()],
            enrichment: Some(Enrichment {
                medicinal_uses: vec!["burns".into()],
                contraindications: vec!["pregnancy".into()],
                ..Enrichment::default()
            }),
            ..IdentifyResult::default()
        };

        let text = plain(&IdentifyView::from(&result).lines());
        let expected = [
            "Aloe vera",
            "Confidence: 0.92",
            "Common names: Aloe",
            "• burns",
            "• pregnancy",
        ];
        for needle in expected {
            assert!(text.contains(needle), "missing {needle:?} in\n{text}");
        }
    }

    #[test]
    fn empty_result_uses_placeholders_and_no_lists() {
        let view = IdentifyView::from(&IdentifyResult::default());
        assert_eq!(view.scientific_name, PLACEHOLDER);
        assert_eq!(view.confidence, PLACEHOLDER);
        assert_eq!(view.common_names, PLACEHOLDER);

        let lines = view.lines();
        assert!(!lines.iter().any(|l| l.kind == LineKind::Heading));
        assert!(!plain(&lines).contains("Provider"));
    }

    #[test]
    fn empty_enrichment_lists_render_headings_only() {
        let result = IdentifyResult {
            enrichment: Some(Enrichment::default()),
            ..IdentifyResult::default()
        };
        let lines = IdentifyView::from(&result).lines();
        assert!(lines.iter().any(|l| l.text == "Medicinal uses"));
        assert!(!lines
            .iter()
            .any(|l| matches!(l.kind, LineKind::Use | LineKind::Caution)));
    }

    #[test]
    fn provenance_fields_are_shown() {
        let result = IdentifyResult {
            scientific_name: Some("Ocimum tenuiflorum".into()),
            raw_provider: Some("plantnet".into()),
            enrichment: Some(Enrichment {
                common_name: Some("Tulsi".into()),
                contraindications: vec!["blood thinners".into()],
                ..Enrichment::default()
            }),
            ..IdentifyResult::default()
        };
        let lines = IdentifyView::from(&result).lines();
        let text = plain(&lines);
        assert!(text.contains("Provider: plantnet"));
        assert!(text.contains("Known as: Tulsi"));
        assert!(lines
            .iter()
            .any(|l| l.kind == LineKind::Caution && l.text == "  • blood thinners"));
    }

    #[test]
    fn chat_keeps_line_breaks() {
        let view = ChatView::from(&ChatResult {
            answer: "Drink warm water.\r\n\nWalk daily.".into(),
            disclaimer: "Not medical advice.".into(),
            lang: None,
        });
        assert_eq!(view.answer_lines, vec!["Drink warm water.", "", "Walk daily."]);

        let lines = view.lines();
        let last = lines.last().unwrap();
        assert_eq!(last.kind, LineKind::Disclaimer);
        assert_eq!(last.text, "Not medical advice.");
    }

    #[test]
    fn chat_language_follows_disclaimer() {
        let view = ChatView::from(&ChatResult {
            answer: "Use ginger tea.".into(),
            disclaimer: String::new(),
            lang: Some("hi".into()),
        });
        assert_eq!(plain(&view.lines()), "Use ginger tea.\n\nLanguage: hi");
    }
}
