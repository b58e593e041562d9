use super::*;

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    ordinal_patterns: Option<OrdinalPatterns>,
    keyword_patterns: Option<KeywordPatterns>,
    #[serde(default)]
    citation_phrases: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct OrdinalPatterns {
    #[serde(default)]
    arabic_ordinals: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordPatterns {
    top_level: Option<Vec<KeywordEntryDocument>>,
    mid_level: Option<Vec<KeywordEntryDocument>>,
    low_level: Option<Vec<KeywordEntryDocument>>,
    supplementary: Option<Vec<KeywordEntryDocument>>,
}

#[derive(Debug, Deserialize)]
struct KeywordEntryDocument {
    keyword: String,
    #[serde(default)]
    definite_form: Option<String>,
    #[serde(default)]
    plural: Option<String>,
    #[serde(default)]
    dual: Option<String>,
    #[serde(default)]
    variants: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeywordTier {
    TopLevel,
    MidLevel,
    LowLevel,
    Supplementary,
}

impl KeywordTier {
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordTier::TopLevel => "top_level",
            KeywordTier::MidLevel => "mid_level",
            KeywordTier::LowLevel => "low_level",
            KeywordTier::Supplementary => "supplementary",
        }
    }

    pub fn level(self) -> u8 {
        match self {
            KeywordTier::TopLevel => 1,
            KeywordTier::MidLevel => 2,
            KeywordTier::LowLevel => 3,
            KeywordTier::Supplementary => 4,
        }
    }
}

/// A resolved keyword: the form used as `keyword_type` plus its tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub canonical: String,
    pub tier: KeywordTier,
    pub singular: bool,
}

const DEFAULT_CITATION_PHRASES: &[&str] = &[
    "ذكر في",
    "ذكره في",
    "ذكرناه في",
    "كما في",
    "كما تقدم في",
    "تقدم في",
    "سبق في",
    "سيأتي في",
    "انظر",
    "راجع",
];

/// Ordinal and keyword tables, loaded once and shared read-only by every pass.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    ordinals: HashMap<String, u32>,
    keywords: HashMap<String, KeywordMatch>,
    citation_phrases: Vec<String>,
    tier_sizes: BTreeMap<KeywordTier, usize>,
}

impl PatternCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read pattern catalog {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid pattern catalog {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: CatalogDocument =
            serde_json::from_str(raw).context("failed to parse pattern catalog json")?;

        let Some(ordinal_patterns) = document.ordinal_patterns else {
            bail!("pattern catalog is missing ordinal_patterns");
        };
        let Some(keyword_patterns) = document.keyword_patterns else {
            bail!("pattern catalog is missing keyword_patterns");
        };

        if ordinal_patterns.arabic_ordinals.is_empty() {
            bail!("pattern catalog has an empty ordinal_patterns.arabic_ordinals list");
        }

        let mut ordinals = HashMap::<String, u32>::new();
        for (index, row) in ordinal_patterns.arabic_ordinals.iter().enumerate() {
            let rank = (index + 1) as u32;
            for form in row.split('|') {
                let key = normalize_for_match(form);
                if key.is_empty() {
                    continue;
                }
                if let Some(existing) = ordinals.insert(key.clone(), rank) {
                    if existing != rank {
                        bail!(
                            "ordinal form '{}' is listed for ranks {} and {}",
                            form.trim(),
                            existing,
                            rank
                        );
                    }
                }
            }
        }

        let tiers = [
            (KeywordTier::TopLevel, keyword_patterns.top_level, true),
            (KeywordTier::MidLevel, keyword_patterns.mid_level, true),
            (KeywordTier::LowLevel, keyword_patterns.low_level, true),
            (KeywordTier::Supplementary, keyword_patterns.supplementary, false),
        ];

        let mut keywords = HashMap::<String, KeywordMatch>::new();
        let mut tier_sizes = BTreeMap::<KeywordTier, usize>::new();
        for (tier, entries, required_non_empty) in tiers {
            let Some(entries) = entries else {
                bail!("pattern catalog is missing keyword tier {}", tier.as_str());
            };
            if required_non_empty && entries.is_empty() {
                bail!("pattern catalog keyword tier {} is empty", tier.as_str());
            }

            tier_sizes.insert(tier, entries.len());
            for entry in entries {
                register_keyword_entry(&mut keywords, tier, entry)?;
            }
        }

        let citation_phrases = document
            .citation_phrases
            .unwrap_or_else(|| {
                DEFAULT_CITATION_PHRASES
                    .iter()
                    .map(|phrase| phrase.to_string())
                    .collect()
            })
            .iter()
            .map(|phrase| normalize_for_match(phrase))
            .filter(|phrase| !phrase.is_empty())
            .collect();

        Ok(Self {
            ordinals,
            keywords,
            citation_phrases,
            tier_sizes,
        })
    }

    /// Rank of an ordinal token, accepting it with or without the article.
    pub fn ordinal_rank(&self, token: &str) -> Option<u32> {
        let key = normalize_title_key(token);
        if let Some(rank) = self.ordinals.get(&key) {
            return Some(*rank);
        }

        if let Some(bare) = key.strip_prefix("ال") {
            return self.ordinals.get(bare).copied();
        }

        self.ordinals.get(&format!("ال{}", key)).copied()
    }

    /// Keyword forms that can open a heading (singular, definite, variants).
    pub fn heading_keyword(&self, token: &str) -> Option<&KeywordMatch> {
        self.any_keyword(token).filter(|found| found.singular)
    }

    /// Any registered surface form, plural and dual included.
    pub fn any_keyword(&self, token: &str) -> Option<&KeywordMatch> {
        self.keywords.get(&normalize_title_key(token))
    }

    pub fn citation_phrases(&self) -> &[String] {
        &self.citation_phrases
    }

    pub fn tier_sizes(&self) -> &BTreeMap<KeywordTier, usize> {
        &self.tier_sizes
    }

    pub fn ordinal_count(&self) -> usize {
        self.ordinals.values().collect::<HashSet<&u32>>().len()
    }
}

fn register_keyword_entry(
    keywords: &mut HashMap<String, KeywordMatch>,
    tier: KeywordTier,
    entry: KeywordEntryDocument,
) -> Result<()> {
    let keyword = entry.keyword.trim();
    if keyword.is_empty() {
        bail!("keyword tier {} has an entry with a blank keyword", tier.as_str());
    }

    let canonical = entry
        .definite_form
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(keyword)
        .to_string();

    let mut forms = vec![(keyword.to_string(), true)];
    if let Some(definite) = entry.definite_form.as_deref() {
        forms.push((definite.to_string(), true));
    }
    forms.extend(entry.variants.iter().map(|variant| (variant.clone(), true)));
    if let Some(plural) = entry.plural.as_deref() {
        forms.push((plural.to_string(), false));
    }
    if let Some(dual) = entry.dual.as_deref() {
        forms.push((dual.to_string(), false));
    }

    for (form, singular) in forms {
        let key = normalize_title_key(&form);
        if key.is_empty() {
            continue;
        }

        let candidate = KeywordMatch {
            canonical: canonical.clone(),
            tier,
            singular,
        };
        match keywords.get(&key) {
            Some(existing) if existing.canonical != candidate.canonical => {
                bail!(
                    "keyword form '{}' is claimed by both '{}' and '{}'",
                    form.trim(),
                    existing.canonical,
                    candidate.canonical
                );
            }
            Some(_) => {}
            None => {
                keywords.insert(key, candidate);
            }
        }
    }

    Ok(())
}
