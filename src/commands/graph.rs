use crate::cli::GraphArgs;
use crate::graph::{build_graph, compute_stats, GraphInput, GraphStats, VariationGraph};
use crate::utils::{create_writer, fmt_opt, read_windowed_table, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Builds the variation-distance graph from one windowed table (individual
/// layout) or two (comparison layout) and writes the node, edge and summary
/// tables.
pub fn graph(args: GraphArgs) -> Result<()> {
    let table = read_windowed_table(&args.input_path)?;
    let group = args
        .group
        .clone()
        .unwrap_or_else(|| table_name(&args.input_path));

    let input = match &args.comparison_path {
        Some(comparison_path) => {
            let other = read_windowed_table(comparison_path)?;
            let group_b = args
                .comparison_group
                .clone()
                .unwrap_or_else(|| table_name(comparison_path));
            GraphInput::comparison(&table, &other, group, group_b)?
        }
        None => GraphInput::individual(&table, group),
    };

    let before = input.variants.len();
    let input = input.filter_by_freq(args.min_freq);
    log::info!(
        "{} of {} windowed sequences pass the frequency filter ({})",
        input.variants.len(),
        before,
        args.min_freq
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.num_threads)
        .thread_name(|i| format!("dsbgraph-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))?;
    let graph = pool.install(|| build_graph(&input));
    log::info!(
        "Graph has {} nodes and {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    let stats = compute_stats(&graph);

    write_output(&args.output_prefix, "nodes.tsv", |w| {
        write_nodes(w, &graph)
    })?;
    write_output(&args.output_prefix, "edges.tsv", |w| {
        write_edges(w, &graph)
    })?;
    write_output(&args.output_prefix, "summary.tsv", |w| {
        write_summary(w, &stats)
    })?;
    Ok(())
}

fn write_output<F>(prefix: &str, suffix: &str, f: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut writer = create_writer(prefix, suffix, |path| {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|e| format!("Failed to create {}: {}", path, e))
    })?;
    f(&mut writer)
}

fn write_nodes<W: Write>(writer: &mut W, graph: &VariationGraph) -> Result<()> {
    let mut header = vec!["id", "ref_align", "read_align"];
    let freq_columns: Vec<String> = graph
        .layout
        .groups()
        .iter()
        .map(|group| format!("freq_{}", group))
        .collect();
    header.extend(freq_columns.iter().map(|c| c.as_str()));
    header.extend([
        "dist_ref",
        "variation_type",
        "insertion",
        "deletion",
        "substitution",
        "is_ref",
    ]);
    writeln!(writer, "{}", header.join("\t")).map_err(|e| e.to_string())?;

    for node in &graph.nodes {
        let mut fields = vec![node.id.to_string(), node.ref_align.clone(), node.read_align.clone()];
        fields.extend(node.freqs.iter().map(|f| f.to_string()));
        fields.extend([
            node.dist_ref.to_string(),
            node.variation_type.label().to_string(),
            node.num_ins.to_string(),
            node.num_del.to_string(),
            node.num_subst.to_string(),
            node.is_ref.to_string(),
        ]);
        writeln!(writer, "{}", fields.join("\t")).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn write_edges<W: Write>(writer: &mut W, graph: &VariationGraph) -> Result<()> {
    writeln!(writer, "id_a\tid_b\tedge_type").map_err(|e| e.to_string())?;
    for edge in &graph.edges {
        writeln!(
            writer,
            "{}\t{}\t{}",
            edge.id_a,
            edge.id_b,
            edge.edge_type.label()
        )
        .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn write_summary<W: Write>(writer: &mut W, stats: &GraphStats) -> Result<()> {
    let mut header = vec![
        "num_nodes".to_string(),
        "num_edges".to_string(),
        "avg_degree".to_string(),
        "avg_dist_ref".to_string(),
        "max_dist_ref".to_string(),
        "avg_pair_dist".to_string(),
        "max_pair_dist".to_string(),
        "num_insertion".to_string(),
        "num_deletion".to_string(),
        "num_substitution".to_string(),
        "num_mixed".to_string(),
    ];
    let mut fields = vec![
        fmt_opt(&stats.num_nodes),
        fmt_opt(&stats.num_edges),
        fmt_opt(&stats.avg_degree),
        fmt_opt(&stats.avg_dist_ref),
        fmt_opt(&stats.max_dist_ref),
        fmt_opt(&stats.avg_pair_dist),
        fmt_opt(&stats.max_pair_dist),
        stats.num_insertion.to_string(),
        stats.num_deletion.to_string(),
        stats.num_substitution.to_string(),
        stats.num_mixed.to_string(),
    ];
    for totals in &stats.freq_totals {
        for (what, value) in [
            ("ref", totals.reference),
            ("nonref", totals.non_reference),
            ("ins", totals.insertion),
            ("del", totals.deletion),
        ] {
            header.push(format!("freq_{}_{}", what, totals.group));
            fields.push(value.to_string());
        }
    }
    writeln!(writer, "{}", header.join("\t")).map_err(|e| e.to_string())?;
    writeln!(writer, "{}", fields.join("\t")).map_err(|e| e.to_string())?;
    Ok(())
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
