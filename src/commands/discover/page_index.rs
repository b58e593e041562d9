use super::*;

/// Lookup over the cleaned page records, keyed both by position and by the
/// printed `(volume, page_number_int)` pair.
#[derive(Debug)]
pub(super) struct PageIndex<'a> {
    pages: &'a [PageRecord],
    by_printed_page: HashMap<(u32, u32), usize>,
}

impl<'a> PageIndex<'a> {
    pub(super) fn build(pages: &'a [PageRecord]) -> Result<Self> {
        let mut by_printed_page = HashMap::with_capacity(pages.len());

        for (position, page) in pages.iter().enumerate() {
            if page.seq_index != position {
                bail!(
                    "page record integrity violation: record at position {} carries seq_index {} ({})",
                    position,
                    page.seq_index,
                    page.page_hint
                );
            }

            let key = (page.volume, page.page_number_int);
            if let Some(existing) = by_printed_page.insert(key, page.seq_index) {
                bail!(
                    "page record integrity violation: volume {} page {} appears at seq_index {} and {}",
                    page.volume,
                    page.page_number_int,
                    existing,
                    page.seq_index
                );
            }
        }

        Ok(Self {
            pages,
            by_printed_page,
        })
    }

    pub(super) fn resolve(&self, volume: u32, page_number_int: u32) -> Option<usize> {
        self.by_printed_page.get(&(volume, page_number_int)).copied()
    }

    pub(super) fn page(&self, seq_index: usize) -> Result<&'a PageRecord> {
        match self.pages.get(seq_index) {
            Some(page) => Ok(page),
            None => bail!(
                "page record integrity violation: seq_index {} is outside the {} known pages",
                seq_index,
                self.pages.len()
            ),
        }
    }

    pub(super) fn pages(&self) -> &'a [PageRecord] {
        self.pages
    }

    pub(super) fn len(&self) -> usize {
        self.pages.len()
    }
}
