//! Import and export command handlers.

use std::path::PathBuf;

use anyhow::Context;
use promptmenu::PromptMenuConfig;
use promptmenu::io::{ExportService, FileTextSource, ImportOptions, ImportService, UuidIdGenerator};
use promptmenu::storage::{MenuStore, load_or_seed};

use super::print_issues;

/// Arguments of the import command.
#[derive(Debug)]
pub struct ImportArgs {
    /// File to import.
    pub file: PathBuf,
    /// Target folder override.
    pub folder: Option<String>,
    /// Fail instead of creating a missing target folder.
    pub no_create: bool,
    /// Import menus whose title already exists.
    pub overwrite: bool,
    /// Report without saving.
    pub dry_run: bool,
}

/// Executes the import command.
pub async fn cmd_import(
    config: &PromptMenuConfig,
    store: &dyn MenuStore,
    args: ImportArgs,
) -> anyhow::Result<()> {
    let mut merge = config.import.merge_options();
    if let Some(folder) = args.folder {
        merge.target_folder_name = folder;
    }
    if args.no_create {
        merge.create_new_folder = false;
    }
    if args.overwrite {
        merge.overwrite_existing = true;
    }
    let options = ImportOptions::new(merge).with_dry_run(args.dry_run);

    let mut tree = load_or_seed(store).context("failed to load menus")?;
    let source = FileTextSource::new(&args.file);
    let result = ImportService::new()
        .import_from_source(&source, &mut tree, &options, &mut UuidIdGenerator::new())
        .await
        .with_context(|| format!("failed to import {}", args.file.display()))?;

    if !result.dry_run && result.has_imports() {
        store.save(&tree).context("failed to save menus")?;
    }

    if result.dry_run {
        println!("Dry run completed (no changes made):");
    } else {
        println!("Import completed:");
    }
    println!("  Target folder:     {}", result.target_folder_name);
    if result.folder_created {
        println!("  (folder created)");
    }
    println!("  Imported:          {}", result.imported);
    println!("  Skipped (dupe):    {}", result.skipped_duplicates);
    println!("  Skipped (invalid): {}", result.skipped_invalid);
    println!("  Total processed:   {}", result.total_processed);

    print_issues("Warnings", &result.warnings);
    if result.has_errors() {
        print_issues("Rows skipped", &result.errors);
    }
    if !result.has_imports() {
        println!();
        println!("No new menus were added.");
    }
    Ok(())
}

/// Executes the export command.
///
/// Writes into the configured export directory unless `output` names a
/// `.csv` file or another directory. With `to_stdout` the text is printed
/// instead.
pub async fn cmd_export(
    config: &PromptMenuConfig,
    store: &dyn MenuStore,
    output: Option<PathBuf>,
    to_stdout: bool,
) -> anyhow::Result<()> {
    let tree = load_or_seed(store).context("failed to load menus")?;
    let service = ExportService::new();

    if to_stdout {
        let result = service.export_to_string(&tree)?;
        println!("{}", result.text);
        return Ok(());
    }

    let result = match output {
        Some(path) if path.extension().is_some() && !path.is_dir() => {
            service.export_to_file(&tree, &path).await
        },
        Some(dir) => service.export_to_dir(&tree, &dir).await,
        None => service.export_to_dir(&tree, &config.export_dir).await,
    }
    .context("failed to export menus")?;

    println!("Export completed:");
    println!("  Exported: {}", result.exported);
    if !result.has_exports() {
        println!("  (no menus; the file holds the header row only)");
    }
    if let Some(path) = result.path {
        println!("  File:     {}", path.display());
    }
    Ok(())
}
