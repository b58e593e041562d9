use super::*;

pub(super) const UNCERTAIN_CONTENT_FLAG: &str = "uncertain_content_type";
pub(super) const LONG_PASSAGE_FLAG: &str = "long_passage";
pub(super) const ABSORBED_CLUSTER_FLAG: &str = "absorbed_same_page_headings";
pub(super) const PROMOTED_PAST_NON_CONTENT_FLAG: &str = "follows_non_content_heading";

#[derive(Debug)]
struct PassageDraft {
    primary: usize,
    start_seq_index: usize,
    end_seq_index: usize,
    division_ids: Vec<String>,
    review_flags: BTreeSet<String>,
}

/// Projects the division tree onto passages, one per digestible primary
/// division. Single-page divisions stay separate passages; merging neighbours
/// belongs to a later stage.
pub(super) fn build_passages(
    tree: &DivisionTree,
    index: &PageIndex<'_>,
    science_id: &str,
    long_passage_pages: usize,
) -> Result<Vec<PassageRecord>> {
    let mut drafts = Vec::<PassageDraft>::new();
    let mut draft_for_primary = HashMap::<usize, usize>::new();

    for (node_index, node) in tree.nodes.iter().enumerate() {
        if let Some(primary) = node.cluster_primary {
            if let Some(draft_index) = draft_for_primary.get(&primary) {
                let draft = &mut drafts[*draft_index];
                draft.division_ids.push(node.id.clone());
                draft.end_seq_index = draft.end_seq_index.max(node.end_seq_index);
                draft.review_flags.insert(ABSORBED_CLUSTER_FLAG.to_string());
                continue;
            }
            if node.digestible == Digestibility::No {
                debug!(division = %node.id, "same-page heading follows a skipped division");
                continue;
            }

            // The cluster opened on a skipped division; the first content
            // heading after it leads the passage instead.
            info!(
                division = %node.id,
                skipped = %tree.nodes[primary].id,
                "same-page heading takes over from a non-content division"
            );
            draft_for_primary.insert(primary, drafts.len());
            let mut draft = open_draft(node_index, node);
            draft.review_flags.insert(PROMOTED_PAST_NON_CONTENT_FLAG.to_string());
            drafts.push(draft);
            continue;
        }

        if node.digestible == Digestibility::No {
            continue;
        }

        draft_for_primary.insert(node_index, drafts.len());
        drafts.push(open_draft(node_index, node));
    }

    let mut passages = Vec::<PassageRecord>::with_capacity(drafts.len());
    for (position, draft) in drafts.into_iter().enumerate() {
        let primary = &tree.nodes[draft.primary];
        let page_count = draft.end_seq_index - draft.start_seq_index + 1;
        let volume = index.page(draft.start_seq_index)?.volume;
        index.page(draft.end_seq_index)?;

        let mut review_flags = draft.review_flags;
        let sizing_action = if page_count > long_passage_pages {
            review_flags.insert(LONG_PASSAGE_FLAG.to_string());
            SizingAction::FlaggedLong
        } else {
            SizingAction::None
        };

        passages.push(PassageRecord {
            passage_id: format!("P{:03}", position + 1),
            title: primary.title.clone(),
            heading_path: tree.ancestor_titles(draft.primary),
            start_seq_index: draft.start_seq_index,
            end_seq_index: draft.end_seq_index,
            page_count,
            science_id: science_id.to_string(),
            volume,
            predecessor_passage_id: None,
            successor_passage_id: None,
            division_ids: draft.division_ids,
            review_flags,
            sizing_action,
        });
    }

    let ids = passages
        .iter()
        .map(|passage| passage.passage_id.clone())
        .collect::<Vec<String>>();
    for (position, passage) in passages.iter_mut().enumerate() {
        passage.predecessor_passage_id = position
            .checked_sub(1)
            .and_then(|previous| ids.get(previous).cloned());
        passage.successor_passage_id = ids.get(position + 1).cloned();
    }

    Ok(passages)
}

fn open_draft(node_index: usize, node: &DivisionNode) -> PassageDraft {
    let mut review_flags = node.review_flags.clone();
    if node.digestible == Digestibility::Uncertain {
        review_flags.insert(UNCERTAIN_CONTENT_FLAG.to_string());
    }

    PassageDraft {
        primary: node_index,
        start_seq_index: node.start_seq_index,
        end_seq_index: node.end_seq_index,
        division_ids: vec![node.id.clone()],
        review_flags,
    }
}

/// Fails on any ordering, overlap or linkage defect in a finished passage set.
pub(super) fn verify_passage_invariants(passages: &[PassageRecord]) -> Result<()> {
    let mut seen_ids = HashSet::<&str>::new();

    for (position, passage) in passages.iter().enumerate() {
        if !seen_ids.insert(passage.passage_id.as_str()) {
            bail!("passage id {} is assigned twice", passage.passage_id);
        }
        if passage.start_seq_index > passage.end_seq_index {
            bail!(
                "passage {} has an inverted range {}..={}",
                passage.passage_id,
                passage.start_seq_index,
                passage.end_seq_index
            );
        }

        let expected_predecessor = position
            .checked_sub(1)
            .map(|previous| passages[previous].passage_id.as_str());
        let expected_successor = passages
            .get(position + 1)
            .map(|next| next.passage_id.as_str());
        if passage.predecessor_passage_id.as_deref() != expected_predecessor
            || passage.successor_passage_id.as_deref() != expected_successor
        {
            bail!("passage {} is linked out of order", passage.passage_id);
        }

        if let Some(previous) = position.checked_sub(1).map(|previous| &passages[previous]) {
            if passage.start_seq_index <= previous.end_seq_index {
                bail!(
                    "passage {} starts at {} inside passage {} ending at {}",
                    passage.passage_id,
                    passage.start_seq_index,
                    previous.passage_id,
                    previous.end_seq_index
                );
            }
        }
    }

    Ok(())
}

pub(super) fn uncovered_page_count(page_count: usize, passages: &[PassageRecord]) -> usize {
    let covered = passages
        .iter()
        .map(|passage| passage.page_count)
        .sum::<usize>();
    page_count.saturating_sub(covered)
}
