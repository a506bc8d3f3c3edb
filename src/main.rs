use std::time::Instant;

use clap::Parser;
use dp_aligner::{
    read_fasta, render_matrix, Aligner, AlignerParameters, AlignmentMode, AlignmentResult,
    BatchAligner, BatchConfig, FreeEnds, GapScheme, Sequence, DEFAULT_GAP, DEFAULT_MATCH,
    DEFAULT_MISMATCH,
};

#[derive(Parser, Debug)]
#[command(
    name = "dp-aligner",
    version,
    about = "Optimal global, local and semi-global pairwise alignment"
)]
struct Cli {
    /// FASTA file holding the S sequences (a literal sequence with --raw)
    s: String,

    /// FASTA file holding the T sequences (a literal sequence with --raw)
    t: String,

    /// Treat S and T as sequences rather than file paths
    #[arg(long)]
    raw: bool,

    /// global, local or semi-global
    #[arg(short, long, default_value = "global")]
    mode: AlignmentMode,

    /// Linear gap penalty per gapped symbol
    #[arg(long, default_value_t = DEFAULT_GAP, allow_hyphen_values = true)]
    gap: i32,

    #[arg(long = "match", default_value_t = DEFAULT_MATCH, allow_hyphen_values = true)]
    match_score: i32,

    #[arg(long, default_value_t = DEFAULT_MISMATCH, allow_hyphen_values = true)]
    mismatch: i32,

    /// Semi-global: skip a prefix of S for free
    #[arg(long)]
    free_begin_s: bool,

    /// Semi-global: skip a prefix of T for free
    #[arg(long)]
    free_begin_t: bool,

    /// Semi-global: T may run past the end of S for free
    #[arg(long)]
    free_end_s: bool,

    /// Semi-global: S may run past the end of T for free
    #[arg(long)]
    free_end_t: bool,

    /// Print the filled DP matrix
    #[arg(long)]
    matrix: bool,

    /// Draw the matrix with ASCII instead of box-drawing characters
    #[arg(long)]
    ascii: bool,

    /// Worker threads for multi-record input
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn free_ends(&self) -> Option<FreeEnds> {
        let free = FreeEnds {
            begin_s: self.free_begin_s,
            begin_t: self.free_begin_t,
            end_s: self.free_end_s,
            end_t: self.free_end_t,
        };
        (!free.is_empty()).then_some(free)
    }

    fn parameters(&self) -> AlignerParameters {
        let mut params = AlignerParameters::new()
            .with_mode(self.mode)
            .with_gap(GapScheme::linear(self.gap))
            .with_match_score(self.match_score)
            .with_mismatch_score(self.mismatch)
            .with_matrix(self.matrix);
        if let Some(free) = self.free_ends() {
            params = params.with_free_ends(free);
        }
        params
    }
}

type Labelled = (String, String, Sequence, Sequence);

fn load_pairs(cli: &Cli) -> Result<Vec<Labelled>, Box<dyn std::error::Error>> {
    if cli.raw {
        return Ok(vec![(
            "S".to_string(),
            "T".to_string(),
            Sequence::from(cli.s.as_str()),
            Sequence::from(cli.t.as_str()),
        )]);
    }
    let s_records = read_fasta(&cli.s)?;
    let t_records = read_fasta(&cli.t)?;
    if s_records.len() != t_records.len() {
        log::warn!(
            "{} has {} records, {} has {}; extra records are ignored",
            cli.s,
            s_records.len(),
            cli.t,
            t_records.len()
        );
    }
    Ok(s_records
        .into_iter()
        .zip(t_records)
        .map(|(s, t)| (s.id, t.id, s.seq, t.seq))
        .collect())
}

fn print_alignment(cli: &Cli, s_id: &str, t_id: &str, s: &Sequence, t: &Sequence, result: &AlignmentResult) {
    let stats = result.statistics();
    println!("# {} vs {}", s_id, t_id);
    println!("score: {}", result.score);
    println!(
        "identity: {:.3} ({} matches, {} mismatches, {} gaps)",
        stats.identity(),
        stats.matches,
        stats.mismatches,
        stats.gaps
    );
    println!("S: {}", result.aligned_s_str());
    println!("T: {}", result.aligned_t_str());
    if let Some(matrix) = &result.matrix {
        print!("{}", render_matrix(matrix, s.as_bytes(), t.as_bytes(), !cli.ascii));
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let aligner = Aligner::new(cli.parameters())?;
    let pairs = load_pairs(&cli)?;
    let start_time = Instant::now();

    let results = if pairs.len() > 1 {
        let mut config = BatchConfig::new();
        if let Some(threads) = cli.threads {
            config = config.with_workers(threads)?;
        }
        let mut batch = BatchAligner::new(aligner, config)?;
        batch.align_all(
            pairs
                .iter()
                .map(|(_, _, s, t)| (s.clone(), t.clone()))
                .collect(),
        )?
    } else {
        pairs
            .iter()
            .map(|(_, _, s, t)| aligner.align_sequences(s, t))
            .collect::<Result<Vec<_>, _>>()?
    };

    for ((s_id, t_id, s, t), result) in pairs.iter().zip(&results) {
        print_alignment(&cli, s_id, t_id, s, t, result);
    }
    log::info!(
        "aligned {} pair(s) in {:.2} ms",
        results.len(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_scores_and_free_ends() {
        let cli = Cli::try_parse_from([
            "dp-aligner",
            "--raw",
            "--mode",
            "semi-global",
            "--gap",
            "-3",
            "--free-end-t",
            "TCACG",
            "TC",
        ])
        .unwrap();
        assert_eq!(cli.mode, AlignmentMode::SemiGlobal);
        assert_eq!(cli.gap, -3);
        assert_eq!(
            cli.free_ends(),
            Some(FreeEnds {
                end_t: true,
                ..Default::default()
            })
        );

        let pairs = load_pairs(&cli).unwrap();
        let (_, _, s, t) = &pairs[0];
        let result = Aligner::new(cli.parameters()).unwrap().align_sequences(s, t).unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.aligned_t, b"TC---");
    }

    #[test]
    fn unknown_mode_is_a_usage_error() {
        assert!(Cli::try_parse_from(["dp-aligner", "--mode", "overlap", "A", "C"]).is_err());
    }
}
