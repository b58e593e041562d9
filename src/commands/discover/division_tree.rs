use super::*;

pub(super) const IMPLICIT_TYPE: &str = "implicit";
pub(super) const SAME_PAGE_CLUSTER_FLAG: &str = "same_page_cluster";

const IMPLICIT_LEVEL: u8 = 1;

/// Editorial and exordium openings. Matched as the whole title or as its
/// leading words.
const NON_CONTENT_TITLES: &[&str] = &[
    "مقدمة المحقق",
    "مقدمة التحقيق",
    "مقدمة الطبعة",
    "مقدمة الناشر",
    "كلمة الناشر",
    "كلمة المحقق",
    "تقديم",
    "تصدير",
    "منهج التحقيق",
    "عملي في التحقيق",
    "وصف النسخ",
    "وصف المخطوط",
    "وصف النسخ الخطية",
    "ترجمة المؤلف",
    "ترجمة المصنف",
    "خطبة الكتاب",
    "خطبة المؤلف",
    "خطبة المصنف",
    "بسم الله الرحمن الرحيم",
    "شكر وتقدير",
    "الإهداء",
    "إهداء",
];

const EXERCISE_KEYWORDS: &[&str] = &[
    "تطبيق",
    "تطبيقات",
    "تمرين",
    "تمارين",
    "تدريب",
    "تدريبات",
    "أسئلة",
    "مناقشة",
];

/// Preface-type titles that are ambiguous when they stand alone.
const BARE_PREFACE_TITLES: &[&str] = &["مقدمة", "تمهيد", "مدخل", "توطئة", "فاتحة", "تقدمة"];

fn matches_with_article(word: &str, base: &str) -> bool {
    let base = normalize_title_key(base);
    word == base || word.strip_prefix("ال") == Some(base.as_str())
}

pub(super) fn classify_title(title: &str) -> (Digestibility, Option<ContentType>) {
    let key = normalize_title_key(title);

    let non_content = is_toc_title(title)
        || NON_CONTENT_TITLES.iter().any(|entry| {
            let entry = normalize_title_key(entry);
            key == entry || key.starts_with(&format!("{} ", entry))
        });
    if non_content {
        return (Digestibility::No, Some(ContentType::NonContent));
    }

    let leading = key.split(' ').next().unwrap_or_default();
    if EXERCISE_KEYWORDS
        .iter()
        .any(|keyword| matches_with_article(leading, keyword))
    {
        return (Digestibility::Yes, Some(ContentType::Exercise));
    }

    if BARE_PREFACE_TITLES
        .iter()
        .any(|preface| matches_with_article(&key, preface))
    {
        return (Digestibility::Uncertain, None);
    }

    (Digestibility::Yes, Some(ContentType::Teaching))
}

#[derive(Debug, Default)]
pub(super) struct DivisionTree {
    pub(super) nodes: Vec<DivisionNode>,
    pub(super) dropped_unmapped: usize,
    pub(super) merged_duplicates: usize,
}

impl DivisionTree {
    pub(super) fn cluster_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.cluster_primary.is_some())
            .count()
    }

    /// Titles of the node's ancestors, outermost first.
    pub(super) fn ancestor_titles(&self, node_index: usize) -> Vec<String> {
        let mut titles = Vec::new();
        let mut cursor = self.nodes.get(node_index).and_then(|node| node.parent);
        while let Some(parent_index) = cursor {
            let Some(parent) = self.nodes.get(parent_index) else {
                break;
            };
            titles.push(parent.title.clone());
            cursor = parent.parent;
        }

        titles.reverse();
        titles
    }
}

fn resolve_keyword(candidate: &HeadingCandidate, catalog: &PatternCatalog) -> (String, u8) {
    if let Some(keyword_type) = candidate.keyword_type.as_deref() {
        let level = catalog
            .any_keyword(keyword_type)
            .map(|found| found.tier.level())
            .unwrap_or(IMPLICIT_LEVEL);
        return (keyword_type.to_string(), level);
    }

    candidate
        .title
        .split_whitespace()
        .next()
        .and_then(|token| catalog.any_keyword(token))
        .map(|found| (found.canonical.clone(), found.tier.level()))
        .unwrap_or_else(|| (IMPLICIT_TYPE.to_string(), IMPLICIT_LEVEL))
}

pub(super) fn build_division_tree(
    candidates: Vec<HeadingCandidate>,
    index: &PageIndex<'_>,
    catalog: &PatternCatalog,
) -> Result<DivisionTree> {
    let mut tree = DivisionTree::default();

    let mut mapped = Vec::<(usize, HeadingCandidate)>::with_capacity(candidates.len());
    for candidate in candidates {
        match candidate.seq_index {
            Some(seq_index) if candidate.page_mapped => {
                index.page(seq_index)?;
                mapped.push((seq_index, candidate));
            }
            _ => tree.dropped_unmapped += 1,
        }
    }

    mapped.sort_by_key(|(seq_index, candidate)| (*seq_index, candidate.document_position));

    let mut kept = Vec::<(usize, HeadingCandidate)>::with_capacity(mapped.len());
    let mut seen = HashMap::<(String, usize), usize>::new();
    for (seq_index, candidate) in mapped {
        let key = (normalize_title_key(&candidate.title), seq_index);
        match seen.get(&key) {
            Some(slot) => {
                tree.merged_duplicates += 1;
                if candidate.confidence > kept[*slot].1.confidence {
                    kept[*slot] = (seq_index, candidate);
                }
            }
            None => {
                seen.insert(key, kept.len());
                kept.push((seq_index, candidate));
            }
        }
    }
    kept.sort_by_key(|(seq_index, candidate)| (*seq_index, candidate.document_position));

    let last_seq_index = index.len().saturating_sub(1);
    let mut primary_for_page: Option<(usize, usize)> = None;
    let mut open_levels = Vec::<(u8, usize)>::new();

    for (position, (seq_index, candidate)) in kept.iter().enumerate() {
        let end_seq_index = kept[position + 1..]
            .iter()
            .map(|(next_seq, _)| *next_seq)
            .find(|next_seq| *next_seq != *seq_index)
            .map(|next_seq| next_seq - 1)
            .unwrap_or(last_seq_index);

        let (division_type, level) = resolve_keyword(candidate, catalog);
        let (digestible, content_type) = classify_title(&candidate.title);

        let mut review_flags = candidate.review_flags.clone();
        let cluster_primary = match primary_for_page {
            Some((page, primary)) if page == *seq_index => {
                review_flags.insert(SAME_PAGE_CLUSTER_FLAG.to_string());
                Some(primary)
            }
            _ => {
                primary_for_page = Some((*seq_index, position));
                None
            }
        };

        while open_levels
            .last()
            .is_some_and(|(open_level, _)| *open_level >= level)
        {
            open_levels.pop();
        }
        let parent = open_levels.last().map(|(_, parent_index)| *parent_index);
        open_levels.push((level, position));

        tree.nodes.push(DivisionNode {
            id: format!("D{:04}", position + 1),
            division_type,
            title: candidate.title.clone(),
            level,
            detection_method: candidate.detection_method,
            confidence: candidate.confidence,
            digestible,
            content_type,
            start_seq_index: *seq_index,
            end_seq_index,
            page_hint_start: index.page(*seq_index)?.page_hint.clone(),
            page_hint_end: index.page(end_seq_index)?.page_hint.clone(),
            parent_id: parent.map(|parent_index| format!("D{:04}", parent_index + 1)),
            page_count: end_seq_index - seq_index + 1,
            review_flags,
            parent,
            cluster_primary,
        });
    }

    Ok(tree)
}
