use super::*;

/// A dot leader or ellipsis followed by a page number that ends the line.
pub(super) const TOC_LEADER_PATTERN: &str = r"(?:\.{2,}|…+)\s*\(?\s*[0-9٠-٩]+\s*\)?\s*$";

const CONTINUATION_MIN_TOC_LINES: usize = 2;

#[derive(Debug, Default)]
pub(super) struct TocScan {
    pub(super) entries: Vec<TocEntry>,
    /// Flagged TOC pages plus their continuation pages, sorted.
    pub(super) toc_pages: Vec<usize>,
}

#[derive(Debug)]
pub(super) struct TocReferenceParser {
    entry_line: Regex,
    leader_then_page: Regex,
}

impl TocReferenceParser {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            entry_line: Regex::new(r"^\s*(.+?)\s*(?:\.{2,}|…+)\s*\(?\s*([0-9٠-٩]+)\s*\)?\s*$")
                .context("failed to compile table-of-contents entry regex")?,
            leader_then_page: Regex::new(TOC_LEADER_PATTERN)
                .context("failed to compile table-of-contents leader regex")?,
        })
    }

    pub(super) fn parse(
        &self,
        pages: &[PageRecord],
        flagged_toc_pages: &[usize],
        tagged_pages: &BTreeSet<usize>,
    ) -> TocScan {
        let toc_pages = self.extend_with_continuations(pages, flagged_toc_pages, tagged_pages);

        let mut entries = Vec::new();
        for seq_index in &toc_pages {
            let Some(page) = pages.get(*seq_index) else {
                continue;
            };
            entries.extend(self.parse_page(page));
        }

        TocScan { entries, toc_pages }
    }

    fn parse_page(&self, page: &PageRecord) -> Vec<TocEntry> {
        page.matn_text
            .lines()
            .filter_map(|line| {
                let captures = self.entry_line.captures(line)?;
                let title = captures
                    .get(1)
                    .map(|value| value.as_str().trim().trim_end_matches(['.', '…']).trim())?;
                if title.is_empty() {
                    return None;
                }
                let page_number = u32::try_from(indic_to_int(captures.get(2)?.as_str())?).ok()?;

                Some(TocEntry {
                    title: title.to_string(),
                    page_number,
                    toc_seq_index: page.seq_index,
                })
            })
            .collect()
    }

    pub(super) fn is_toc_shaped(&self, line: &str) -> bool {
        self.leader_then_page.is_match(line)
    }

    /// TOC listings often run over several untitled pages; follow them while
    /// the page still reads like a listing.
    fn extend_with_continuations(
        &self,
        pages: &[PageRecord],
        flagged_toc_pages: &[usize],
        tagged_pages: &BTreeSet<usize>,
    ) -> Vec<usize> {
        let mut toc_pages = flagged_toc_pages.iter().copied().collect::<BTreeSet<usize>>();

        for start in flagged_toc_pages {
            let mut next = start + 1;
            while let Some(page) = pages.get(next) {
                if toc_pages.contains(&next) || tagged_pages.contains(&next) {
                    break;
                }
                if !self.reads_as_listing(page) {
                    break;
                }
                toc_pages.insert(next);
                next += 1;
            }
        }

        toc_pages.into_iter().collect()
    }

    fn reads_as_listing(&self, page: &PageRecord) -> bool {
        let lines = page
            .matn_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<&str>>();
        let toc_lines = lines
            .iter()
            .filter(|line| self.is_toc_shaped(line))
            .count();

        toc_lines >= CONTINUATION_MIN_TOC_LINES && toc_lines * 2 >= lines.len()
    }
}

/// Compares TOC titles against the detected headings.
pub(super) fn toc_coverage(entries: &[TocEntry], candidates: &[HeadingCandidate]) -> TocCoverage {
    let detected = candidates
        .iter()
        .map(|candidate| normalize_title_key(&candidate.title))
        .collect::<HashSet<String>>();

    let mut coverage = TocCoverage {
        toc_entry_count: entries.len(),
        ..TocCoverage::default()
    };
    for entry in entries {
        if detected.contains(&normalize_title_key(&entry.title)) {
            coverage.matched_entry_count += 1;
        } else {
            coverage.unmatched_titles.push(entry.title.clone());
        }
    }

    coverage
}
