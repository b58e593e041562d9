use anyhow::Result;
use tracing::info;

use crate::cli::CheckCatalogArgs;
use crate::commands::discover::PatternCatalog;

pub fn run(args: CheckCatalogArgs) -> Result<()> {
    let catalog = PatternCatalog::load(&args.catalog_path)?;

    for (tier, size) in catalog.tier_sizes() {
        info!(tier = tier.as_str(), level = tier.level(), keywords = size, "keyword tier");
    }
    info!(
        path = %args.catalog_path.display(),
        ordinals = catalog.ordinal_count(),
        citation_phrases = catalog.citation_phrases().len(),
        "pattern catalog is valid"
    );

    Ok(())
}
