use super::*;

use crate::model::DiscoverCounts;

#[derive(Debug, Clone)]
pub(super) struct DiscoveryOptions {
    /// Longest normalized line still accepted for the ordinal and `في` shapes.
    pub(super) max_heading_line_chars: usize,
    pub(super) long_passage_pages: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_heading_line_chars: 80,
            long_passage_pages: 20,
        }
    }
}

#[derive(Debug)]
pub(super) struct StructureReport {
    pub(super) passages: Vec<PassageRecord>,
    pub(super) divisions: Vec<DivisionNode>,
    pub(super) toc_entries: Vec<TocEntry>,
    pub(super) toc_coverage: TocCoverage,
    pub(super) counts: DiscoverCounts,
}

/// Runs every pass over one book. Pure apart from logging: the same inputs
/// always produce the same report.
pub(super) fn discover_structure(
    markup: &str,
    pages: &[PageRecord],
    catalog: &PatternCatalog,
    science_id: &str,
    options: &DiscoveryOptions,
) -> Result<StructureReport> {
    let index = PageIndex::build(pages)?;

    let tagged = TaggedHeadingExtractor::new()?.extract(markup, &index);
    let unmapped_candidate_count = tagged
        .candidates
        .iter()
        .filter(|candidate| !candidate.page_mapped)
        .count();
    info!(
        candidates = tagged.candidates.len(),
        unmapped = unmapped_candidate_count,
        toc_pages = tagged.toc_pages.len(),
        content_pages = tagged.content_page_count,
        "tagged heading pass complete"
    );

    let tagged_pages = tagged
        .candidates
        .iter()
        .filter_map(|candidate| candidate.seq_index)
        .collect::<BTreeSet<usize>>();
    let toc = TocReferenceParser::new()?.parse(pages, &tagged.toc_pages, &tagged_pages);
    info!(
        toc_pages = toc.toc_pages.len(),
        entries = toc.entries.len(),
        "table-of-contents pass complete"
    );

    let covered_pages = toc.toc_pages.iter().copied().collect::<BTreeSet<usize>>();
    let position_base = tagged
        .candidates
        .iter()
        .map(|candidate| candidate.document_position + 1)
        .max()
        .unwrap_or(0);
    let keyword = KeywordScanner::new(catalog, options.max_heading_line_chars)?.scan(
        pages,
        &covered_pages,
        &tagged.candidates,
        position_base,
    );
    info!(
        candidates = keyword.candidates.len(),
        rejected_toc = keyword.rejected_toc_lines,
        rejected_long = keyword.rejected_long_lines,
        rejected_citation = keyword.rejected_citation_lines,
        duplicates = keyword.duplicates_of_tagged,
        "keyword heuristic pass complete"
    );

    let tagged_candidate_count = tagged.candidates.len();
    let keyword_candidate_count = keyword.candidates.len();
    let mut candidates = tagged.candidates;
    candidates.extend(keyword.candidates);
    let toc_coverage = toc_coverage(&toc.entries, &candidates);

    let tree = build_division_tree(candidates, &index, catalog)?;
    let same_page_cluster_count = tree.cluster_count();
    info!(
        divisions = tree.nodes.len(),
        dropped_unmapped = tree.dropped_unmapped,
        merged_duplicates = tree.merged_duplicates,
        same_page_clusters = same_page_cluster_count,
        "division tree built"
    );

    let passages = build_passages(&tree, &index, science_id, options.long_passage_pages)?;
    verify_passage_invariants(&passages)?;

    let counts = DiscoverCounts {
        page_count: pages.len(),
        markup_content_page_count: tagged.content_page_count,
        toc_page_count: toc.toc_pages.len(),
        toc_entry_count: toc.entries.len(),
        tagged_candidate_count,
        unmapped_candidate_count,
        keyword_candidate_count,
        division_count: tree.nodes.len(),
        same_page_cluster_count,
        non_content_division_count: tree
            .nodes
            .iter()
            .filter(|node| node.content_type == Some(ContentType::NonContent))
            .count(),
        uncertain_division_count: tree
            .nodes
            .iter()
            .filter(|node| node.digestible == Digestibility::Uncertain)
            .count(),
        passage_count: passages.len(),
        long_passage_count: passages
            .iter()
            .filter(|passage| passage.sizing_action == SizingAction::FlaggedLong)
            .count(),
        uncovered_page_count: uncovered_page_count(pages.len(), &passages),
    };
    info!(
        passages = counts.passage_count,
        long = counts.long_passage_count,
        uncovered_pages = counts.uncovered_page_count,
        "passages constructed"
    );

    Ok(StructureReport {
        passages,
        divisions: tree.nodes,
        toc_entries: toc.entries,
        toc_coverage,
        counts,
    })
}
