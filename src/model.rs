use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub seq_index: usize,
    pub page_number_int: u32,
    pub volume: u32,
    pub matn_text: String,
    pub page_hint: String,
    #[serde(default)]
    pub footnote_section_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    HtmlTagged,
    KeywordHeuristic,
}

/// Ordered from weakest to strongest so `max` picks the most trusted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub title: String,
    pub seq_index: Option<usize>,
    pub page_number_int: u32,
    pub volume: u32,
    pub page_hint: String,
    pub detection_method: DetectionMethod,
    pub confidence: Confidence,
    pub keyword_type: Option<String>,
    pub ordinal: Option<u32>,
    pub document_position: u64,
    pub page_mapped: bool,
    pub inline_heading: bool,
    pub heading_text_boundary: Option<usize>,
    pub notes: Vec<String>,
    pub review_flags: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub title: String,
    pub page_number: u32,
    pub toc_seq_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Digestibility {
    #[serde(rename = "true")]
    Yes,
    #[serde(rename = "false")]
    No,
    #[serde(rename = "uncertain")]
    Uncertain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Teaching,
    Exercise,
    NonContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionNode {
    pub id: String,
    #[serde(rename = "type")]
    pub division_type: String,
    pub title: String,
    pub level: u8,
    pub detection_method: DetectionMethod,
    pub confidence: Confidence,
    pub digestible: Digestibility,
    pub content_type: Option<ContentType>,
    pub start_seq_index: usize,
    pub end_seq_index: usize,
    pub page_hint_start: String,
    pub page_hint_end: String,
    pub parent_id: Option<String>,
    pub page_count: usize,
    pub review_flags: BTreeSet<String>,
    #[serde(skip)]
    pub parent: Option<usize>,
    #[serde(skip)]
    pub cluster_primary: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingAction {
    None,
    FlaggedLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageRecord {
    pub passage_id: String,
    pub title: String,
    pub heading_path: Vec<String>,
    pub start_seq_index: usize,
    pub end_seq_index: usize,
    pub page_count: usize,
    pub science_id: String,
    pub volume: u32,
    pub predecessor_passage_id: Option<String>,
    pub successor_passage_id: Option<String>,
    pub division_ids: Vec<String>,
    pub review_flags: BTreeSet<String>,
    pub sizing_action: SizingAction,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TocCoverage {
    pub toc_entry_count: usize,
    pub matched_entry_count: usize,
    pub unmatched_titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceDigest {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverPaths {
    pub output_root: String,
    pub passages_path: String,
    pub divisions_path: String,
    pub manifest_path: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoverCounts {
    pub page_count: usize,
    pub markup_content_page_count: usize,
    pub toc_page_count: usize,
    pub toc_entry_count: usize,
    pub tagged_candidate_count: usize,
    pub unmapped_candidate_count: usize,
    pub keyword_candidate_count: usize,
    pub division_count: usize,
    pub same_page_cluster_count: usize,
    pub non_content_division_count: usize,
    pub uncertain_division_count: usize,
    pub passage_count: usize,
    pub long_passage_count: usize,
    pub uncovered_page_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub science_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: DiscoverPaths,
    pub counts: DiscoverCounts,
    pub toc_coverage: TocCoverage,
    pub sources: Vec<SourceDigest>,
    pub warnings: Vec<String>,
}
