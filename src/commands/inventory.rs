use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{ExportKind, InputEntry, InputInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.input_dir)?;

    if args.dry_run {
        info!(
            file_count = manifest.file_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.input_dir.join("input_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(file_count = manifest.file_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(input_dir: &Path) -> Result<InputInventoryManifest> {
    let mut paths = discover_exports(input_dir)?;
    paths.sort();

    if paths.is_empty() {
        bail!("no exports found in {}", input_dir.display());
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        let kind = classify_export(&filename);
        let sha256 = sha256_file(&path)?;

        files.push(InputEntry {
            filename,
            kind,
            sha256,
        });
    }

    Ok(InputInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: input_dir.display().to_string(),
        file_count: files.len(),
        files,
    })
}

/// Guess the export family from the filename. Exports are named by the
/// tool that produced them, so substring checks are enough here.
pub fn classify_export(filename: &str) -> ExportKind {
    let name = filename.to_lowercase();
    let is_filter = name.contains("filter") || name.contains("filtro");

    if is_filter && name.contains("seo") {
        ExportKind::FilterUsageSeo
    } else if is_filter {
        ExportKind::FilterUsageAll
    } else if name.contains("query") || name.contains("consulta") || name.contains("gsc") {
        ExportKind::TopQuery
    } else if name.contains("keyword") || name.contains("palabra") {
        ExportKind::KeywordResearch
    } else {
        ExportKind::Unknown
    }
}

fn discover_exports(input_dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut exports = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_export = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                ext.eq_ignore_ascii_case("csv")
                    || ext.eq_ignore_ascii_case("tsv")
                    || ext.eq_ignore_ascii_case("txt")
            })
            .unwrap_or(false);

        if is_export {
            exports.push(path);
        }
    }

    Ok(exports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_kind_from_filename() {
        assert_eq!(
            classify_export("filter_usage_all.csv"),
            ExportKind::FilterUsageAll
        );
        assert_eq!(
            classify_export("Filtros_SEO_marzo.csv"),
            ExportKind::FilterUsageSeo
        );
        assert_eq!(classify_export("gsc_top_query.csv"), ExportKind::TopQuery);
        assert_eq!(
            classify_export("Keyword Stats 2026.tsv"),
            ExportKind::KeywordResearch
        );
        assert_eq!(classify_export("notas.txt"), ExportKind::Unknown);
    }
}
