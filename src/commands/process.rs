use crate::align::{extract_window, reference_window};
use crate::classify::{
    AmpliconRead, ClassificationStats, ClassifyParams, ReadClassifier, Verdict,
};
use crate::cli::ProcessArgs;
use crate::dedup::DeduplicationAggregator;
use crate::utils::{create_writer, read_amplicon, write_windowed_table, ReferenceSequence, Result};
use rust_htslib::bam::{self, Read};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Runs the classification pass: one streaming sweep over each repeat
/// library's BAM, window extraction for accepted reads, then the
/// deduplicated windowed table.
pub fn process(args: ProcessArgs) -> Result<()> {
    let amplicon = read_amplicon(&args.reference_path)?;
    let reference = ReferenceSequence::new(&amplicon, args.dsb_pos)?;
    check_window_fit(&reference, args.window_size, args.anchor_size)?;

    // Shared by every node downstream; computed up front so a bad window
    // configuration fails before any BAM is read.
    let ref_window = reference_window(&reference, args.window_size);
    log::debug!(
        "Reference window around DSB position {}: {}",
        reference.dsb_pos(),
        ref_window.ref_align()
    );

    let library_names: Vec<String> = args.bam_paths.iter().map(|p| library_name(p)).collect();
    let mut aggregator = DeduplicationAggregator::new(library_names.clone());
    let mut totals = ClassificationStats::default();

    let params = ClassifyParams {
        expected_reverse: args.expect_reverse,
        min_length: args.min_length,
        realign: !args.no_realign,
        max_substitutions: args.max_substitutions,
    };

    for (library, path) in args.bam_paths.iter().enumerate() {
        let stats = process_library(
            library,
            path,
            &reference,
            &params,
            &args,
            &mut aggregator,
        )?;
        stats.check_totals();
        stats.log_summary(&library_names[library]);
        totals.merge(&stats);
    }

    if totals.accepted() == 0 {
        return Err(
            "No reads were accepted in any library; check the reference and DSB position"
                .to_string(),
        );
    }
    totals.check_totals();
    totals.log_summary("all libraries");

    let table = aggregator.finish();
    log::info!("{} distinct windowed sequences", table.variants.len());
    let mut writer = create_writer(&args.output_prefix, "windows.tsv", |path| {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|e| format!("Failed to create {}: {}", path, e))
    })?;
    write_windowed_table(&mut writer, &table)?;
    Ok(())
}

fn process_library(
    library: usize,
    path: &Path,
    reference: &ReferenceSequence,
    params: &ClassifyParams,
    args: &ProcessArgs,
    aggregator: &mut DeduplicationAggregator,
) -> Result<ClassificationStats> {
    log::debug!("Processing {}", path.display());
    let mut reader = bam::Reader::from_path(path)
        .map_err(|e| format!("Failed to open BAM {}: {}", path.display(), e))?;
    let mut classifier = ReadClassifier::new(reference, params.clone());
    let mut record = bam::Record::new();

    while let Some(result) = reader.read(&mut record) {
        result.map_err(|e| format!("Failed to read record from {}: {}", path.display(), e))?;
        let read = AmpliconRead::from_hts_rec(&record);
        if let Verdict::Accepted(accepted) = classifier.classify(&read) {
            match extract_window(
                &accepted.pair,
                reference.dsb_pos(),
                args.window_size,
                args.anchor_size,
                args.anchor_substitutions,
                args.anchor_indels,
            ) {
                Some(window) => aggregator.add(library, &window),
                None => classifier.record_window_reject(),
            }
        }
    }
    Ok(classifier.into_stats())
}

fn check_window_fit(
    reference: &ReferenceSequence,
    window_size: usize,
    anchor_size: usize,
) -> Result<()> {
    if window_size == 0 {
        return Err("Window size must be at least 1".to_string());
    }
    let reach = window_size + anchor_size;
    if reference.dsb_pos() < reach || reference.dsb_pos() + reach > reference.len() {
        return Err(format!(
            "Window ({}) plus anchor ({}) does not fit around DSB position {} \
             within the {} nt reference",
            window_size,
            anchor_size,
            reference.dsb_pos(),
            reference.len()
        ));
    }
    Ok(())
}

fn library_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_fit() {
        let reference = ReferenceSequence::new(&"ACGT".repeat(10), 20).unwrap();
        assert!(check_window_fit(&reference, 10, 10).is_ok());
        assert!(check_window_fit(&reference, 10, 11).is_err());
        assert!(check_window_fit(&reference, 0, 5).is_err());
        assert!(check_window_fit(&reference, 21, 0).is_err());
    }

    #[test]
    fn test_library_name() {
        assert_eq!(library_name(Path::new("/data/run1.bam")), "run1");
        assert_eq!(library_name(Path::new("run2.sorted.bam")), "run2.sorted");
    }
}
