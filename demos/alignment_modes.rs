use dp_aligner::{align, AlignerParameters, AlignmentMode, FreeEnds, GapScheme};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let s = b"TCACG";
    let t = b"TC";

    let runs = [
        ("global", AlignerParameters::new().with_mode(AlignmentMode::Global)),
        ("local", AlignerParameters::new().with_mode(AlignmentMode::Local)),
        (
            "semi-global, free end of T",
            AlignerParameters::new()
                .with_mode(AlignmentMode::SemiGlobal)
                .with_free_ends(FreeEnds {
                    end_t: true,
                    ..Default::default()
                }),
        ),
    ];

    for (name, params) in runs {
        let result = align(s, t, &params.with_gap(GapScheme::linear(-3)))?;
        println!("{}", name);
        println!("Score: {}", result.score);
        println!("Aligned S: {}", result.aligned_s_str());
        println!("Aligned T: {}", result.aligned_t_str());
        println!("Operations: {:?}", result.operations);
        println!();
    }

    Ok(())
}
