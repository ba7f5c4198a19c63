//! Projection of a summary payload into display sections
//!
//! Pure and stateless: the same payload always yields the same view.

use super::{
    BreakdownSection, StackComponent, SummaryDoc, SummaryPayload, SHORT_TITLE_WORDS,
};

/// One display section, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Title { headline: String, full: String },
    ExecutiveSummary(String),
    TechnicalStack(Vec<StackComponent>),
    DetailedBreakdown(Vec<BreakdownSection>),
    UseCases(Vec<String>),
    Tldr(String),
}

impl Section {
    pub fn heading(&self) -> &'static str {
        match self {
            Section::Title { .. } => "Title",
            Section::ExecutiveSummary(_) => "Executive Summary",
            Section::TechnicalStack(_) => "Technical Stack",
            Section::DetailedBreakdown(_) => "Detailed Breakdown",
            Section::UseCases(_) => "Use Cases",
            Section::Tldr(_) => "TL;DR",
        }
    }
}

/// What the summary panel should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryView {
    /// Payload was unreadable; nothing else is rendered
    Invalid { reason: String },
    Sections(Vec<Section>),
}

impl SummaryView {
    pub fn is_invalid(&self) -> bool {
        matches!(self, SummaryView::Invalid { .. })
    }
}

/// Project a payload into its display sections.
///
/// Never fails: malformed input becomes [`SummaryView::Invalid`].
pub fn render(payload: &SummaryPayload) -> SummaryView {
    match payload.parse() {
        Ok(doc) => SummaryView::Sections(sections(doc)),
        Err(e) => {
            tracing::debug!(error = %e, "Summary payload rejected");
            SummaryView::Invalid { reason: e.reason }
        }
    }
}

fn sections(doc: SummaryDoc) -> Vec<Section> {
    vec![
        Section::Title {
            headline: short_title(&doc.title),
            full: doc.title,
        },
        Section::ExecutiveSummary(doc.executive_summary),
        Section::TechnicalStack(doc.technical_stack),
        Section::DetailedBreakdown(doc.detailed_breakdown),
        Section::UseCases(doc.use_cases),
        Section::Tldr(doc.tldr),
    ]
}

/// First few words of a title, for headers.
pub fn short_title(title: &str) -> String {
    title
        .split_whitespace()
        .take(SHORT_TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text block for clipboard export: title, executive summary and TL;DR.
pub fn copy_synthesis(doc: &SummaryDoc) -> String {
    format!(
        "{}\n\n{}\n\nTL;DR: {}",
        doc.title, doc.executive_summary, doc.tldr
    )
}
