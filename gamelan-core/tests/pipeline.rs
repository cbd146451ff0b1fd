use gamelan_core::pitch::track_from_peak_magnitudes;
use gamelan_core::{AnalysisConfig, Error, ScaleSearch, analyze};

/// Frequencies of a six-tone scale starting at `ding` with the given steps.
fn scale_tones(ding: f64, steps: &[f64]) -> Vec<f64> {
    let mut tones = vec![ding];
    for step in steps {
        let last = tones[tones.len() - 1];
        tones.push(last * 2f64.powf(step / 1200.0));
    }
    tones
}

/// A synthetic f0 track: each tone held for `frames` frames with a little
/// vibrato, separated by short unvoiced gaps, the whole scale played `passes`
/// times.
fn played_scale(tones: &[f64], frames: usize, passes: usize) -> Vec<f64> {
    let mut f0 = Vec::new();
    for _ in 0..passes {
        for &tone in tones {
            for i in 0..frames {
                let wobble = 0.0005 * ((i % 4) as f64 - 1.5);
                f0.push(tone * (1.0 + wobble));
            }
            f0.extend([0.0; 4]);
        }
    }
    f0
}

#[test]
fn begbeg_recording_is_recognised() {
    let tones = scale_tones(220.0, &[120.0, 114.0, 432.0, 81.0, 453.0]);
    let f0 = played_scale(&tones, 30, 2);

    let analysis = analyze(&f0, &AnalysisConfig::default()).unwrap();

    assert_eq!(analysis.segments.len(), 12);
    assert_eq!(analysis.pitch_classes.len(), 6);
    for (class, tone) in analysis.pitch_classes.iter().zip(&tones) {
        assert!((class - tone).abs() < 0.5, "{class} vs {tone}");
    }

    let scale = analysis.scale.scale().expect("complete scale");
    assert!((scale.ding() - tones[0]).abs() < 0.5);

    let similarity = analysis.similarity.expect("similarity scores");
    assert_eq!(similarity.best().unwrap().name, "begbeg");
    assert!(similarity.get("begbeg").unwrap() > 0.999);
}

#[test]
fn sedang_recording_is_recognised() {
    let tones = scale_tones(180.0, &[136.0, 155.0, 379.0, 134.0, 396.0]);
    let f0 = played_scale(&tones, 25, 1);

    let analysis = analyze(&f0, &AnalysisConfig::default()).unwrap();
    let similarity = analysis.similarity.expect("similarity scores");
    assert_eq!(similarity.best().unwrap().name, "sedang");
}

#[test]
fn partial_scale_is_reported_not_fatal() {
    let tones = scale_tones(220.0, &[120.0, 114.0, 432.0]);
    let f0 = played_scale(&tones, 30, 1);

    let analysis = analyze(&f0, &AnalysisConfig::default()).unwrap();
    match &analysis.scale {
        ScaleSearch::Incomplete { start, tones } => {
            assert_eq!(*start, 0);
            assert_eq!(tones.len(), 4);
        }
        other => panic!("expected an incomplete scale, got {other:?}"),
    }
    assert!(analysis.similarity.is_none());
    assert_eq!(
        analysis.scale.into_scale(),
        Err(Error::IncompleteScale { found: 4 })
    );
}

#[test]
fn unterminated_final_note_needs_partial_runs() {
    let tones = scale_tones(220.0, &[120.0, 114.0, 432.0, 81.0, 453.0]);
    let mut f0 = played_scale(&tones, 30, 1);
    // Cut the trailing gap so the last tone runs to the end of the track.
    f0.truncate(f0.len() - 4);

    let analysis = analyze(&f0, &AnalysisConfig::default()).unwrap();
    assert_eq!(analysis.pitch_classes.len(), 5);

    let config = AnalysisConfig::from_json_str(r#"{ "segmenter": { "include_partial_runs": true } }"#)
        .unwrap();
    let analysis = analyze(&f0, &config).unwrap();
    assert_eq!(analysis.pitch_classes.len(), 6);
    assert!(analysis.scale.scale().is_some());
}

#[test]
fn peak_magnitude_track_feeds_the_pipeline() {
    let tones = scale_tones(220.0, &[120.0, 114.0, 432.0, 81.0, 453.0]);
    let f0 = played_scale(&tones, 30, 1);

    // Bin 0 carries the f0 with the larger magnitude, bin 1 an octave above.
    let pitches = vec![f0.clone(), f0.iter().map(|f| f * 2.0).collect()];
    let magnitudes = vec![vec![1.0; f0.len()], vec![0.5; f0.len()]];
    let track = track_from_peak_magnitudes(&pitches, &magnitudes).unwrap();
    assert_eq!(track, f0);

    let analysis = analyze(&track, &AnalysisConfig::default()).unwrap();
    assert_eq!(analysis.similarity.unwrap().best().unwrap().name, "begbeg");
}
