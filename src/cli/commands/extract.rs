//! CLI command for archive extraction

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{CUBE, LOOKING_GLASS, PACKAGE, print_done, print_step, simple_bar};
use crate::descriptor::DescriptorScript;
use crate::extract::{ExtractOptions, extract_archive};
use crate::index::ArchiveIndex;

pub fn execute(
    descriptor: &Path,
    output: Option<&Path>,
    report_path: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    if !quiet {
        print_step(1, 3, LOOKING_GLASS, "Evaluating descriptor...");
    }
    let script = DescriptorScript::from_file(descriptor)?;

    if !quiet {
        print_step(2, 3, CUBE, "Building archive index...");
    }
    let index = ArchiveIndex::from_descriptor(&script)?;
    if !quiet {
        println!(
            "  {} sections, {} file entries",
            index.sections.len(),
            index.total_entries()
        );
    }

    if !quiet {
        print_step(3, 3, PACKAGE, "Extracting sections...");
    }
    let options = ExtractOptions {
        output_root: output.map(Path::to_path_buf),
    };

    let report = if quiet {
        extract_archive(&index, descriptor, &options, |_| {})
    } else {
        let bar = simple_bar(index.total_entries() as u64, "extracting");
        let report = extract_archive(&index, descriptor, &options, |p| {
            bar.set_position(p.current as u64);
        });
        bar.finish_and_clear();
        report
    };

    if !quiet {
        for line in &report.results {
            println!("  {line}");
        }
    }
    if report.is_complete() {
        println!("{} entries extracted", report.attempted);
    } else {
        println!(
            "{} of {} entries extracted, {} failed",
            report.attempted - report.failed,
            report.attempted,
            report.failed
        );
    }

    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("Report written to {}", path.display());
    }

    if !quiet {
        print_done(started.elapsed());
    }

    Ok(())
}
