pub mod dom;
pub mod records;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::catalog::BrandCatalog;
use dom::{attr_matches, find_all_within, find_within, is_tag, text_content, Page};

static BRAND_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^accordion-header$").unwrap());
static BRAND_PANEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^accordion-content-").unwrap());

const MARKER_ATTR: &str = "data-testid";

/// Result of one extraction pass over a page.
#[derive(Debug, Default)]
pub struct Extraction {
    pub catalog: BrandCatalog,
    /// List items that did not look like `<model> - <year> (<categories>)`.
    pub skipped_lines: usize,
    /// Brand headers with no following panel, or a panel without a list.
    pub skipped_brands: usize,
}

/// page HTML → brand headers → panel list items → catalog.
pub fn extract_catalog(document: &str) -> Extraction {
    let page = Page::parse(document);
    let mut out = Extraction::default();

    for header in page.find_all(attr_matches("div", MARKER_ATTR, &BRAND_HEADER_RE)) {
        let brand = records::clean_brand_name(&text_content(header));

        let Some(panel) = page.find_next(header, attr_matches("div", MARKER_ATTR, &BRAND_PANEL_RE))
        else {
            debug!(brand = %brand, "no content panel after brand header");
            out.skipped_brands += 1;
            continue;
        };
        let Some(list) = find_within(panel, is_tag("ul")) else {
            debug!(brand = %brand, "content panel has no list");
            out.skipped_brands += 1;
            continue;
        };

        for item in find_all_within(list, is_tag("li")) {
            let text = text_content(item);
            match records::parse_vehicle_line(&text) {
                Some(record) => out.catalog.push(&brand, record),
                None => {
                    debug!(brand = %brand, line = %text, "skipping unrecognised line");
                    out.skipped_lines += 1;
                }
            }
        }
    }

    info!(
        "Extracted {} vehicles across {} brands ({} lines skipped, {} brands without a list)",
        out.catalog.total_records(),
        out.catalog.brand_count(),
        out.skipped_lines,
        out.skipped_brands,
    );
    out
}

// ── Tests ──
