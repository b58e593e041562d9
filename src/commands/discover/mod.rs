use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::model::{
    Confidence, ContentType, DetectionMethod, Digestibility, DivisionNode, HeadingCandidate,
    PageRecord, PassageRecord, SizingAction, TocCoverage, TocEntry,
};

mod division_tree;
mod keyword_scan;
mod normalize_and_digits;
mod page_index;
mod passage_build;
mod pattern_catalog;
mod pipeline;
mod run;
mod tagged_headings;
mod toc_references;

pub use pattern_catalog::{KeywordTier, PatternCatalog};
pub use run::run;

use division_tree::*;
use keyword_scan::*;
use normalize_and_digits::*;
use page_index::*;
use passage_build::*;
use pipeline::*;
use tagged_headings::*;
use toc_references::*;
