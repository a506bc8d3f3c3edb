use dp_aligner::{Aligner, AlignerParameters, AlignmentMode, BatchAligner, BatchConfig, Sequence};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let aligner = Aligner::new(AlignerParameters::new().with_mode(AlignmentMode::Local))?;
    let mut batch = BatchAligner::new(aligner, BatchConfig::new().with_workers(4)?)?;

    let pairs = vec![
        (Sequence::new(b"ACGTACGT"), Sequence::new(b"ACGTAGCT")),
        (Sequence::new(b"GGTTAACC"), Sequence::new(b"GGTTAACT")),
        (Sequence::new(b"AGCTGC"), Sequence::new(b"CTGATGAT")),
    ];

    let results = batch.align_all(pairs)?;

    for (i, result) in results.iter().enumerate() {
        println!("Alignment {}: Score = {}", i, result.score);
        println!("S: {}", result.aligned_s_str());
        println!("T: {}", result.aligned_t_str());
        println!();
    }

    Ok(())
}
