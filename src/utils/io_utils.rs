use crate::align::{degap, GAP};
use crate::dedup::{WindowedTable, WindowedVariant};
use crate::utils::Result;
use rust_htslib::faidx;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

pub fn create_writer<T, F>(output_prefix: &str, output_suffix: &str, f: F) -> Result<T>
where
    F: FnOnce(&str) -> Result<T>,
{
    let output_path = format!("{}.{}", output_prefix, output_suffix);
    f(&output_path)
}

/// Reads the amplicon sequence from a FASTA file. The file is expected to hold
/// a single reference amplicon; extra sequences are ignored with a warning.
pub fn read_amplicon(path: &Path) -> Result<String> {
    let reader = faidx::Reader::from_path(path)
        .map_err(|e| format!("Failed to open reference FASTA {}: {}", path.display(), e))?;
    if reader.n_seqs() == 0 {
        return Err(format!("Reference FASTA {} has no sequences", path.display()));
    }
    let name = reader.seq_name(0).map_err(|e| e.to_string())?;
    if reader.n_seqs() > 1 {
        log::warn!(
            "Reference FASTA {} has {} sequences; using '{}'",
            path.display(),
            reader.n_seqs(),
            name
        );
    }
    let seq = reader
        .fetch_seq_string(&name, 0, i32::MAX as usize)
        .map_err(|e| e.to_string())?;
    Ok(seq.to_uppercase())
}

pub fn write_windowed_table<W: Write>(writer: &mut W, table: &WindowedTable) -> Result<()> {
    let mut header = vec!["ref_align".to_string(), "read_align".to_string()];
    for name in &table.library_names {
        header.push(format!("count_{}", name));
    }
    for name in &table.library_names {
        header.push(format!("freq_{}", name));
    }
    writeln!(writer, "{}", header.join("\t")).map_err(|e| e.to_string())?;
    for variant in &table.variants {
        let mut fields = vec![variant.ref_align.clone(), variant.read_align.clone()];
        fields.extend(variant.counts.iter().map(|c| c.to_string()));
        fields.extend(variant.freqs.iter().map(|f| f.to_string()));
        writeln!(writer, "{}", fields.join("\t")).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn read_windowed_table(path: &Path) -> Result<WindowedTable> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open windowed table {}: {}", path.display(), e))?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .ok_or_else(|| format!("Windowed table {} is empty", path.display()))?
        .map_err(|e| e.to_string())?;
    let columns: Vec<&str> = header.split('\t').collect();
    let library_names: Vec<String> = columns
        .iter()
        .filter_map(|c| c.strip_prefix("count_"))
        .map(|c| c.to_string())
        .collect();
    let num_libs = library_names.len();
    let expected_columns = 2 + 2 * num_libs;
    if num_libs == 0 || columns.len() != expected_columns {
        return Err(format!(
            "Windowed table {} has an unexpected header: {}",
            path.display(),
            header
        ));
    }

    let mut variants = Vec::new();
    let mut ref_window: Option<String> = None;
    for (index, line) in lines.enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        if line.is_empty() {
            continue;
        }
        let row = index + 2;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != expected_columns {
            return Err(format!(
                "Windowed table {} row {} has {} fields, expected {}",
                path.display(),
                row,
                fields.len(),
                expected_columns
            ));
        }
        check_alignment_row(path, row, fields[0], fields[1])?;
        let window = degap(fields[0]);
        match &ref_window {
            None => ref_window = Some(window),
            Some(expected) if *expected != window => {
                return Err(format!(
                    "Windowed table {} row {} has reference window {} but earlier rows have {}",
                    path.display(),
                    row,
                    window,
                    expected
                ));
            }
            _ => {}
        }
        let counts = fields[2..2 + num_libs]
            .iter()
            .map(|f| f.parse::<u64>().map_err(|e| e.to_string()))
            .collect::<Result<Vec<u64>>>()?;
        let freqs = fields[2 + num_libs..]
            .iter()
            .map(|f| f.parse::<f64>().map_err(|e| e.to_string()))
            .collect::<Result<Vec<f64>>>()?;
        variants.push(WindowedVariant {
            ref_align: fields[0].to_string(),
            read_align: fields[1].to_string(),
            counts,
            freqs,
        });
    }

    Ok(WindowedTable {
        library_names,
        variants,
    })
}

fn check_alignment_row(path: &Path, row: usize, ref_align: &str, read_align: &str) -> Result<()> {
    if ref_align.len() != read_align.len() {
        return Err(format!(
            "Windowed table {} row {}: alignment strings differ in length ({} vs {})",
            path.display(),
            row,
            ref_align.len(),
            read_align.len()
        ));
    }
    for (r, q) in ref_align.chars().zip(read_align.chars()) {
        if !is_alignment_char(r) || !is_alignment_char(q) {
            return Err(format!(
                "Windowed table {} row {}: unexpected alignment character",
                path.display(),
                row
            ));
        }
        if r == GAP && q == GAP {
            return Err(format!(
                "Windowed table {} row {}: alignment column with a gap on both sides",
                path.display(),
                row
            ));
        }
    }
    Ok(())
}

fn is_alignment_char(c: char) -> bool {
    c == GAP || matches!(c, 'A' | 'C' | 'G' | 'T')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_table() -> WindowedTable {
        WindowedTable {
            library_names: vec!["r1".to_string(), "r2".to_string()],
            variants: vec![
                WindowedVariant {
                    ref_align: "ACGT".to_string(),
                    read_align: "AC-T".to_string(),
                    counts: vec![10, 8],
                    freqs: vec![0.5, 0.4],
                },
                WindowedVariant {
                    ref_align: "ACGT".to_string(),
                    read_align: "ACGT".to_string(),
                    counts: vec![10, 12],
                    freqs: vec![0.5, 0.6],
                },
            ],
        }
    }

    #[test]
    fn test_windowed_table_round_trip() {
        let table = toy_table();
        let mut buf = Vec::new();
        write_windowed_table(&mut buf, &table).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("windows.tsv");
        std::fs::write(&path, &buf).unwrap();

        let parsed = read_windowed_table(&path).unwrap();
        assert_eq!(parsed.library_names, table.library_names);
        assert_eq!(parsed.variants.len(), 2);
        assert_eq!(parsed.variants[0].read_align, "AC-T");
        assert_eq!(parsed.variants[0].counts, vec![10, 8]);
        assert_eq!(parsed.variants[1].freqs, vec![0.5, 0.6]);
    }

    #[test]
    fn test_read_rejects_bad_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.tsv");
        std::fs::write(&path, "ref_align\tread_align\n").unwrap();
        assert!(read_windowed_table(&path).is_err());
    }

    #[test]
    fn test_read_rejects_malformed_alignment_rows() {
        let dir = tempfile::tempdir().unwrap();
        let header = "ref_align\tread_align\tcount_r1\tfreq_r1\n";

        // Unequal alignment string lengths.
        let path = dir.path().join("lengths.tsv");
        std::fs::write(&path, format!("{}ACGT\tACG\t1\t1\n", header)).unwrap();
        let err = read_windowed_table(&path).unwrap_err();
        assert!(err.contains("row 2"), "unexpected error: {}", err);

        // Gap on both sides of a column.
        let path = dir.path().join("gaps.tsv");
        std::fs::write(&path, format!("{}AC-T\tAC-T\t1\t1\n", header)).unwrap();
        assert!(read_windowed_table(&path).is_err());

        // Characters outside the alignment alphabet.
        let path = dir.path().join("alphabet.tsv");
        std::fs::write(&path, format!("{}ACNT\tACGT\t1\t1\n", header)).unwrap();
        assert!(read_windowed_table(&path).is_err());
    }

    #[test]
    fn test_read_rejects_mixed_reference_windows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.tsv");
        std::fs::write(
            &path,
            "ref_align\tread_align\tcount_r1\tfreq_r1\n\
             ACGT\tACGT\t3\t0.75\n\
             AGGT\tAGGT\t1\t0.25\n",
        )
        .unwrap();
        let err = read_windowed_table(&path).unwrap_err();
        assert!(err.contains("row 3"), "unexpected error: {}", err);
    }
}
