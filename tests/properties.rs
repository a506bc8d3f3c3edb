use dp_aligner::{
    align, AlignerParameters, AlignmentMode, AlignmentResult, FreeEnds, GapScheme, GAP,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_seq(rng: &mut StdRng, max_len: usize) -> Vec<u8> {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
}

fn every_free_ends() -> Vec<FreeEnds> {
    (0..16u8)
        .map(|bits| FreeEnds {
            begin_s: bits & 1 != 0,
            begin_t: bits & 2 != 0,
            end_s: bits & 4 != 0,
            end_t: bits & 8 != 0,
        })
        .collect()
}

/// Every mode, and every free-end combination for semi-global.
fn all_configurations() -> Vec<AlignerParameters> {
    let mut configs = vec![
        AlignerParameters::new().with_mode(AlignmentMode::Global),
        AlignerParameters::new().with_mode(AlignmentMode::Local),
    ];
    for free in every_free_ends() {
        configs.push(
            AlignerParameters::new()
                .with_mode(AlignmentMode::SemiGlobal)
                .with_free_ends(free),
        );
    }
    configs
}

fn swapped(params: &AlignerParameters) -> AlignerParameters {
    let inner = params.params();
    let mut out = AlignerParameters::new().with_mode(inner.mode).with_gap(inner.gap);
    if let Some(free) = inner.free {
        out = out.with_free_ends(free.swapped());
    }
    out
}

fn ungapped(aligned: &[u8]) -> Vec<u8> {
    aligned.iter().copied().filter(|&b| b != GAP).collect()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn aligned_rows_have_equal_length_and_come_from_inputs() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..300 {
        let s = random_seq(&mut rng, 9);
        let t = random_seq(&mut rng, 9);
        for params in all_configurations() {
            let result = align(&s, &t, &params).unwrap();
            assert_eq!(result.aligned_s.len(), result.aligned_t.len());
            assert_eq!(result.aligned_s.len(), result.operations.len());
            assert!(contains(&s, &ungapped(&result.aligned_s)));
            assert!(contains(&t, &ungapped(&result.aligned_t)));
        }
    }
}

#[test]
fn identical_calls_give_identical_results() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let s = random_seq(&mut rng, 12);
        let t = random_seq(&mut rng, 12);
        for params in all_configurations() {
            let params = params.with_matrix(true);
            let first = align(&s, &t, &params).unwrap();
            let second = align(&s, &t, &params).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn semiglobal_without_free_ends_equals_global() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..100 {
        let s = random_seq(&mut rng, 10);
        let t = random_seq(&mut rng, 10);
        let gap = GapScheme::linear(-rng.gen_range(1..4));
        let global = AlignerParameters::new().with_gap(gap).with_matrix(true);
        let semi = global
            .clone()
            .with_mode(AlignmentMode::SemiGlobal)
            .with_free_ends(FreeEnds::none());
        assert_eq!(align(&s, &t, &global).unwrap(), align(&s, &t, &semi).unwrap());
    }
}

#[test]
fn local_score_never_negative() {
    let mut rng = StdRng::seed_from_u64(17);
    let params = AlignerParameters::new().with_mode(AlignmentMode::Local);
    for _ in 0..200 {
        let s = random_seq(&mut rng, 10);
        let t = random_seq(&mut rng, 10);
        let result = align(&s, &t, &params).unwrap();
        assert!(result.score >= 0);
        assert_eq!(result.score == 0, result.aligned_s.is_empty());
        assert_eq!(result.score == 0, result.aligned_t.is_empty());
    }
}

#[test]
fn swapping_axes_preserves_score() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..150 {
        let s = random_seq(&mut rng, 8);
        let t = random_seq(&mut rng, 8);
        for params in all_configurations() {
            let forward = align(&s, &t, &params).unwrap();
            let backward = align(&t, &s, &swapped(&params)).unwrap();
            assert_eq!(forward.score, backward.score, "{:?} {:?} {:?}", s, t, params);
        }
    }
}

fn assert_mirrored(forward: &AlignmentResult, backward: &AlignmentResult) {
    assert_eq!(forward.score, backward.score);
    assert_eq!(forward.aligned_s, backward.aligned_t);
    assert_eq!(forward.aligned_t, backward.aligned_s);
}

#[test]
fn swapping_axes_mirrors_tie_free_alignments() {
    let end_t = FreeEnds {
        end_t: true,
        ..Default::default()
    };
    let cases: Vec<(&str, &str, AlignerParameters)> = vec![
        ("AG", "CTG", AlignerParameters::new()),
        ("AC", "A", AlignerParameters::new()),
        (
            "AGCTGC",
            "CTGATGAT",
            AlignerParameters::new().with_mode(AlignmentMode::Local),
        ),
        (
            "ACGG",
            "AC",
            AlignerParameters::new()
                .with_mode(AlignmentMode::SemiGlobal)
                .with_free_ends(end_t),
        ),
        (
            "TAGC",
            "GGAC",
            AlignerParameters::new()
                .with_mode(AlignmentMode::SemiGlobal)
                .with_free_ends(FreeEnds::all()),
        ),
    ];
    for (s, t, params) in cases {
        let forward = align(s.as_bytes(), t.as_bytes(), &params).unwrap();
        let backward = align(t.as_bytes(), s.as_bytes(), &swapped(&params)).unwrap();
        assert_mirrored(&forward, &backward);
    }
}
