use dp_aligner::{
    align, Aligner, AlignerError, AlignerParameters, AlignmentMode, ErrorCategory, FreeEnds,
    GapScheme,
};

#[test]
fn unknown_mode_string() {
    let err = "overlap".parse::<AlignmentMode>().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(err.to_string(), "Invalid alignment mode: \"overlap\"");
}

#[test]
fn free_ends_outside_semiglobal() {
    for mode in [AlignmentMode::Global, AlignmentMode::Local] {
        let params = AlignerParameters::new()
            .with_mode(mode)
            .with_free_ends(FreeEnds::all());
        let err = Aligner::new(params).unwrap_err();
        assert!(matches!(err, AlignerError::FreeEndsRequireSemiGlobal(m) if m == mode));
    }
}

#[test]
fn cigar_is_unimplemented() {
    let err = align(b"A", b"A", &AlignerParameters::new().with_cigar(true)).unwrap_err();
    assert!(matches!(err, AlignerError::CigarUnsupported));
}

#[test]
fn affine_gap_is_rejected() {
    let params = AlignerParameters::new().with_gap(GapScheme { open: -4, extend: -1 });
    let err = Aligner::new(params).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn extreme_gap_overflow_is_an_error() {
    let params = AlignerParameters::new().with_gap(GapScheme::linear(i32::MIN / 2));
    let err = align(b"AAA", b"AAA", &params).unwrap_err();
    assert!(matches!(err, AlignerError::ScoreOverflow { .. }));
    assert_eq!(err.category(), ErrorCategory::Configuration);

    let params = AlignerParameters::new()
        .with_mode(AlignmentMode::Local)
        .with_score_fn(|a, b| if a == b { i32::MAX } else { -1 });
    let err = align(b"AA", b"AA", &params).unwrap_err();
    assert!(matches!(err, AlignerError::ScoreOverflow { i: 2, j: 2 }));
}

#[test]
fn aligner_is_reusable_across_pairs() {
    let aligner = Aligner::new(AlignerParameters::new()).unwrap();
    assert_eq!(aligner.align(b"A", b"A").unwrap().score, 1);
    assert_eq!(aligner.align(b"AC", b"A").unwrap().score, -1);
}
