use super::*;

/// Lead headings that mark a table-of-contents page. Compared exactly after
/// normalization; a title that merely starts with one of these is not a TOC.
pub(super) const TOC_TITLES: &[&str] = &[
    "فهرس",
    "الفهرس",
    "فهرست",
    "فهرس الموضوعات",
    "فهرس المحتويات",
    "فهرس الكتاب",
    "فهرس موضوعات الكتاب",
    "المحتويات",
    "محتويات الكتاب",
];

pub(super) fn is_toc_title(title: &str) -> bool {
    let key = normalize_title_key(title);
    TOC_TITLES
        .iter()
        .any(|candidate| normalize_title_key(candidate) == key)
}

#[derive(Debug, Default)]
pub(super) struct TaggedHeadingScan {
    pub(super) candidates: Vec<HeadingCandidate>,
    pub(super) toc_pages: Vec<usize>,
    pub(super) content_page_count: usize,
}

#[derive(Debug)]
pub(super) struct TaggedHeadingExtractor {
    page_block: Regex,
    page_number_span: Regex,
    page_label: Regex,
    title_open: Regex,
    span_tag: Regex,
    footnote_start: Regex,
    any_tag: Regex,
}

impl TaggedHeadingExtractor {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            page_block: Regex::new(r#"<div\s+class\s*=\s*['"]PageText['"]\s*>"#)
                .context("failed to compile page block regex")?,
            page_number_span: Regex::new(
                r#"(?s)<span\s+class\s*=\s*['"]PageNumber['"]\s*>(.*?)</span\s*>"#,
            )
            .context("failed to compile page number span regex")?,
            page_label: Regex::new(r"(?:ج\s*([0-9٠-٩]+)\s*[/،,]?\s*)?ص\s*:\s*([0-9٠-٩]+)")
                .context("failed to compile printed page label regex")?,
            title_open: Regex::new(r#"<span\b[^>]*\bclass\s*=\s*['"]title['"][^>]*>"#)
                .context("failed to compile title span regex")?,
            span_tag: Regex::new(r"(?i)<span\b[^>]*>|</span\s*>")
                .context("failed to compile span tag regex")?,
            footnote_start: Regex::new(r#"(?i)<hr\b|<div\s+class\s*=\s*['"]footnote['"]"#)
                .context("failed to compile footnote separator regex")?,
            any_tag: Regex::new(r"<[^>]*>").context("failed to compile markup tag regex")?,
        })
    }

    pub(super) fn extract(&self, markup: &str, index: &PageIndex<'_>) -> TaggedHeadingScan {
        let block_starts = self
            .page_block
            .find_iter(markup)
            .map(|found| found.start())
            .collect::<Vec<usize>>();

        let mut scan = TaggedHeadingScan::default();
        let mut toc_pages = BTreeSet::<usize>::new();
        let mut current_page: Option<(u32, u32)> = None;
        let mut position = 0_u64;
        let mut metadata_blocks = 0usize;

        for (block_index, start) in block_starts.iter().enumerate() {
            let end = block_starts
                .get(block_index + 1)
                .copied()
                .unwrap_or(markup.len());
            let block = &markup[*start..end];

            let starts_new_page = match self.parse_page_label(block) {
                Some(label) => {
                    current_page = Some(label);
                    scan.content_page_count += 1;
                    true
                }
                None if current_page.is_none() => {
                    metadata_blocks += 1;
                    continue;
                }
                None => false,
            };
            let Some((volume, page_number_int)) = current_page else {
                continue;
            };

            let body = match self.footnote_start.find(block) {
                Some(found) => &block[..found.start()],
                None => block,
            };
            let titles = self.title_spans(body);
            let seq_index = index.resolve(volume, page_number_int);

            if starts_new_page {
                if let (Some(lead), Some(seq_index)) = (titles.first(), seq_index) {
                    if is_toc_title(lead) {
                        toc_pages.insert(seq_index);
                    }
                }
            }

            let page_hint = match seq_index.and_then(|seq| index.pages().get(seq)) {
                Some(page) => page.page_hint.clone(),
                None => format!(
                    "ج {} ص {}",
                    int_to_indic(u64::from(volume)),
                    int_to_indic(u64::from(page_number_int))
                ),
            };

            for title in titles {
                let mut candidate = HeadingCandidate {
                    title,
                    seq_index,
                    page_number_int,
                    volume,
                    page_hint: page_hint.clone(),
                    detection_method: DetectionMethod::HtmlTagged,
                    confidence: Confidence::Confirmed,
                    keyword_type: None,
                    ordinal: None,
                    document_position: position,
                    page_mapped: seq_index.is_some(),
                    inline_heading: false,
                    heading_text_boundary: None,
                    notes: Vec::new(),
                    review_flags: BTreeSet::new(),
                };
                if seq_index.is_none() {
                    candidate.review_flags.insert("unmapped_page".to_string());
                    candidate.notes.push(format!(
                        "printed page {} of volume {} is not in the page index",
                        page_number_int, volume
                    ));
                }

                scan.candidates.push(candidate);
                position += 1;
            }
        }

        scan.toc_pages = toc_pages.into_iter().collect();

        debug!(
            blocks = block_starts.len(),
            metadata_blocks,
            content_pages = scan.content_page_count,
            "scanned tagged markup"
        );

        scan
    }

    fn parse_page_label(&self, block: &str) -> Option<(u32, u32)> {
        let span = self.page_number_span.captures(block)?;
        let inner = span.get(1)?.as_str();
        let captures = self.page_label.captures(inner)?;

        let volume = match captures.get(1) {
            Some(value) => u32::try_from(indic_to_int(value.as_str())?).ok()?,
            None => 1,
        };
        let page_number = u32::try_from(indic_to_int(captures.get(2)?.as_str())?).ok()?;

        Some((volume, page_number))
    }

    /// Cleaned text of every title span in `body`, in document order.
    fn title_spans(&self, body: &str) -> Vec<String> {
        let mut titles = Vec::new();
        let mut cursor = 0usize;

        for open in self.title_open.find_iter(body) {
            if open.start() < cursor {
                continue;
            }

            let inner_start = open.end();
            let mut inner_end = body.len();
            let mut depth = 1usize;
            for tag in self.span_tag.find_iter(&body[inner_start..]) {
                if tag.as_str().starts_with("</") {
                    depth -= 1;
                    if depth == 0 {
                        inner_end = inner_start + tag.start();
                        cursor = inner_start + tag.end();
                        break;
                    }
                } else {
                    depth += 1;
                }
            }
            if depth > 0 {
                cursor = body.len();
            }

            let title = self.clean_title(&body[inner_start..inner_end]);
            if !title.is_empty() {
                titles.push(title);
            }
        }

        titles
    }

    pub(super) fn clean_title(&self, raw: &str) -> String {
        let without_tags = self.any_tag.replace_all(raw, " ");
        without_tags
            .replace("&nbsp;", " ")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&#39;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
            .replace('\u{00a0}', " ")
            .chars()
            .filter(|ch| !is_zero_width(*ch))
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<&str>>()
            .join(" ")
    }
}
