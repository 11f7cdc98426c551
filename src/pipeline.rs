use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::catalog::BrandCatalog;
use crate::fetch::{Fetch, FetchError};
use crate::filter::{self, FilterCriteria};
use crate::naming;
use crate::parser;
use crate::settings::Settings;

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("Failed to fetch the page: {0}")]
    Fetch(#[from] FetchError),
    #[error("could not serialise vehicles: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("could not print summary: {0}")]
    Console(#[source] io::Error),
}

/// Everything one run needs besides transport settings.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub city: String,
    pub required_categories: Option<Vec<String>>,
    pub excluded_categories: Option<Vec<String>>,
    /// Brands named by the user; `None` when the flag was left empty.
    pub brands: Option<Vec<String>>,
    pub use_default_brand_allowlist: bool,
    pub output_dir: PathBuf,
}

impl RunOptions {
    /// Build from raw comma-separated flag values.
    pub fn from_raw(
        city: &str,
        required_categories: &str,
        excluded_categories: &str,
        brands: &str,
        use_default_brand_allowlist: bool,
        output_dir: PathBuf,
    ) -> Self {
        RunOptions {
            city: city.trim().to_lowercase(),
            required_categories: filter::parse_list(required_categories),
            excluded_categories: filter::parse_list(excluded_categories),
            brands: filter::parse_list(brands),
            use_default_brand_allowlist,
            output_dir,
        }
    }

    fn criteria(&self) -> FilterCriteria {
        let allowed = filter::resolve_allowed_brands(
            self.brands.as_deref(),
            self.use_default_brand_allowlist,
        );
        FilterCriteria::new(
            self.required_categories.as_deref(),
            self.excluded_categories.as_deref(),
            allowed.as_deref(),
        )
    }

    fn output_filename(&self) -> String {
        naming::output_filename(
            &self.city,
            self.brands.as_deref(),
            self.required_categories.as_deref(),
            self.excluded_categories.as_deref(),
        )
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub total_records: usize,
    pub brand_count: usize,
    pub skipped_lines: usize,
}

/// fetch → extract → filter → summary → name → write JSON.
///
/// Nothing touches the filesystem unless the fetch succeeded.
pub async fn run<F, W>(
    fetcher: &F,
    settings: &Settings,
    opts: &RunOptions,
    out: &mut W,
) -> Result<RunReport, RunError>
where
    F: Fetch,
    W: Write,
{
    let url = settings.eligible_vehicles_url(&opts.city);
    let document = fetcher.fetch(&url).await?;
    process_document(&document, opts, out)
}

pub fn process_document<W: Write>(
    document: &str,
    opts: &RunOptions,
    out: &mut W,
) -> Result<RunReport, RunError> {
    let extraction = parser::extract_catalog(document);
    let filtered = filter::apply(&extraction.catalog, &opts.criteria());
    info!(
        "{} of {} vehicles kept after filtering",
        filtered.total_records(),
        extraction.catalog.total_records()
    );
    if filtered.is_empty() {
        warn!("No vehicles matched the filters for city '{}'", opts.city);
    } else {
        info!("Brands kept: {}", filtered.brands().collect::<Vec<_>>().join(", "));
    }

    write_summary(out, &filtered).map_err(RunError::Console)?;

    let filename = opts.output_filename();
    let output_path = opts.output_dir.join(&filename);
    save_json(&filtered, &output_path)?;

    writeln!(
        out,
        "\nFiltered car data saved to '{}' for city '{}'",
        display_path(&output_path).display(),
        opts.city
    )
    .map_err(RunError::Console)?;

    Ok(RunReport {
        output_path,
        total_records: filtered.total_records(),
        brand_count: filtered.brand_count(),
        skipped_lines: extraction.skipped_lines,
    })
}

/// Total line first, then each brand with its models.
pub fn write_summary<W: Write>(out: &mut W, catalog: &BrandCatalog) -> io::Result<()> {
    writeln!(out, "\nTotal cars found: {}\n", catalog.total_records())?;
    for (brand, records) in catalog.iter() {
        writeln!(out, "{}: {} cars", brand, records.len())?;
        for r in records {
            writeln!(out, " - {} - {}", r.model, r.year)?;
        }
    }
    Ok(())
}

/// Pretty JSON (2-space indent, UTF-8 kept as is), written in one go.
pub fn save_json(catalog: &BrandCatalog, path: &Path) -> Result<(), RunError> {
    let json = serde_json::to_string_pretty(catalog)?;
    std::fs::write(path, json).map_err(|source| RunError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {}", path.display());
    Ok(())
}

// "./file.json" reads better as "file.json"
fn display_path(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

// ── Tests ──
