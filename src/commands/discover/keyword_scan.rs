use super::*;

use super::pattern_catalog::KeywordMatch;

const ABOUT_WORD: &str = "في";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RejectReason {
    TocShape,
    TooLong,
    CitationPrefix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct HeadingDraft {
    pub(super) title: String,
    pub(super) keyword: KeywordMatch,
    pub(super) ordinal: Option<u32>,
    pub(super) confidence: Confidence,
    /// Character offset where body text starts after an inline heading.
    pub(super) inline_boundary: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum LineVerdict {
    NotHeading,
    Rejected(RejectReason),
    Heading(HeadingDraft),
}

#[derive(Debug, Default)]
pub(super) struct KeywordScan {
    pub(super) candidates: Vec<HeadingCandidate>,
    pub(super) rejected_toc_lines: usize,
    pub(super) rejected_long_lines: usize,
    pub(super) rejected_citation_lines: usize,
    pub(super) duplicates_of_tagged: usize,
}

#[derive(Debug)]
pub(super) struct KeywordScanner<'a> {
    catalog: &'a PatternCatalog,
    toc_shape: Regex,
    inline_split: Regex,
    max_heading_line_chars: usize,
}

impl<'a> KeywordScanner<'a> {
    pub(super) fn new(catalog: &'a PatternCatalog, max_heading_line_chars: usize) -> Result<Self> {
        Ok(Self {
            catalog,
            toc_shape: Regex::new(TOC_LEADER_PATTERN)
                .context("failed to compile table-of-contents shape regex")?,
            inline_split: Regex::new(r"^([^\s\-–—]+(?:\s+[^\s\-–—]+)?)\s*[-–—]\s*(\S.*)$")
                .context("failed to compile inline heading regex")?,
            max_heading_line_chars,
        })
    }

    pub(super) fn scan(
        &self,
        pages: &[PageRecord],
        covered_pages: &BTreeSet<usize>,
        tagged: &[HeadingCandidate],
        position_base: u64,
    ) -> KeywordScan {
        let tagged_keys = tagged
            .iter()
            .filter_map(|candidate| {
                candidate
                    .seq_index
                    .map(|seq_index| (normalize_title_key(&candidate.title), seq_index))
            })
            .collect::<HashSet<(String, usize)>>();

        let mut scan = KeywordScan::default();
        let mut position = position_base;

        for page in pages {
            if covered_pages.contains(&page.seq_index) {
                continue;
            }

            let mut previous_line: Option<&str> = None;
            for raw_line in page.matn_text.lines() {
                let line = raw_line.trim();
                if line.is_empty() {
                    continue;
                }

                let verdict = self.classify_line(line, previous_line);
                previous_line = Some(line);

                let mut draft = match verdict {
                    LineVerdict::NotHeading => continue,
                    LineVerdict::Rejected(reason) => {
                        match reason {
                            RejectReason::TocShape => scan.rejected_toc_lines += 1,
                            RejectReason::TooLong => scan.rejected_long_lines += 1,
                            RejectReason::CitationPrefix => scan.rejected_citation_lines += 1,
                        }
                        continue;
                    }
                    LineVerdict::Heading(draft) => draft,
                };

                // Boundaries are reported against the page line as stored.
                if let Some(boundary) = draft.inline_boundary.as_mut() {
                    *boundary += leading_char_count(raw_line);
                }

                let key = (normalize_title_key(&draft.title), page.seq_index);
                if tagged_keys.contains(&key) {
                    scan.duplicates_of_tagged += 1;
                    continue;
                }

                scan.candidates.push(build_candidate(page, draft, position));
                position += 1;
            }
        }

        scan
    }

    pub(super) fn classify_line(&self, line: &str, previous_line: Option<&str>) -> LineVerdict {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();
        let Some(first) = tokens.first() else {
            return LineVerdict::NotHeading;
        };
        // A keyword standing alone may be plural or dual ("تنبيهات", "مسائل");
        // the ordinal, about and inline shapes only take the singular.
        let keyword = if tokens.len() == 1 {
            self.catalog.any_keyword(first)
        } else {
            self.catalog.heading_keyword(first)
        };
        let Some(keyword) = keyword else {
            return LineVerdict::NotHeading;
        };

        if self.toc_shape.is_match(line) {
            return LineVerdict::Rejected(RejectReason::TocShape);
        }
        if previous_line.is_some_and(|previous| self.ends_with_citation_phrase(previous)) {
            return LineVerdict::Rejected(RejectReason::CitationPrefix);
        }

        let title = tokens.join(" ");
        let fits = normalize_for_match(line).chars().count() <= self.max_heading_line_chars;
        let ordinal = tokens
            .get(1)
            .and_then(|token| self.catalog.ordinal_rank(token));

        if ordinal.is_some() && fits {
            return LineVerdict::Heading(HeadingDraft {
                title,
                keyword: keyword.clone(),
                ordinal,
                confidence: Confidence::High,
                inline_boundary: None,
            });
        }

        if tokens.len() == 1 {
            return LineVerdict::Heading(HeadingDraft {
                title,
                keyword: keyword.clone(),
                ordinal: None,
                confidence: Confidence::Medium,
                inline_boundary: None,
            });
        }

        let about_shape = tokens.len() >= 3 && normalize_for_match(tokens[1]) == ABOUT_WORD;
        if about_shape && fits {
            return LineVerdict::Heading(HeadingDraft {
                title,
                keyword: keyword.clone(),
                ordinal: None,
                confidence: Confidence::Medium,
                inline_boundary: None,
            });
        }

        if let Some(draft) = self.inline_heading(line, keyword) {
            return LineVerdict::Heading(draft);
        }

        if ordinal.is_some() || about_shape {
            return LineVerdict::Rejected(RejectReason::TooLong);
        }

        LineVerdict::NotHeading
    }

    fn inline_heading(&self, line: &str, keyword: &KeywordMatch) -> Option<HeadingDraft> {
        let captures = self.inline_split.captures(line)?;
        let head = captures.get(1)?.as_str();
        let content = captures.get(2)?;

        let head_tokens = head.split_whitespace().collect::<Vec<&str>>();
        let ordinal = match head_tokens.get(1) {
            Some(token) => Some(self.catalog.ordinal_rank(token)?),
            None => None,
        };

        Some(HeadingDraft {
            title: head_tokens.join(" "),
            keyword: keyword.clone(),
            ordinal,
            confidence: Confidence::Low,
            inline_boundary: Some(line[..content.start()].chars().count()),
        })
    }

    fn ends_with_citation_phrase(&self, line: &str) -> bool {
        let key = normalize_title_key(line);
        self.catalog.citation_phrases().iter().any(|phrase| {
            key.strip_suffix(phrase.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.ends_with(' '))
        })
    }
}

fn leading_char_count(raw_line: &str) -> usize {
    raw_line.chars().take_while(|ch| ch.is_whitespace()).count()
}

fn build_candidate(page: &PageRecord, draft: HeadingDraft, position: u64) -> HeadingCandidate {
    let mut review_flags = BTreeSet::new();
    let mut notes = Vec::new();
    let inline_heading = draft.inline_boundary.is_some();
    if let Some(boundary) = draft.inline_boundary {
        review_flags.insert("inline_heading".to_string());
        notes.push(format!("body content starts at character {}", boundary));
    }

    HeadingCandidate {
        title: draft.title,
        seq_index: Some(page.seq_index),
        page_number_int: page.page_number_int,
        volume: page.volume,
        page_hint: page.page_hint.clone(),
        detection_method: DetectionMethod::KeywordHeuristic,
        confidence: draft.confidence,
        keyword_type: Some(draft.keyword.canonical),
        ordinal: draft.ordinal,
        document_position: position,
        page_mapped: true,
        inline_heading,
        heading_text_boundary: draft.inline_boundary,
        notes,
        review_flags,
    }
}
