use std::collections::BTreeMap;

use approx::assert_abs_diff_eq;

use crate::synth::{StepResult, UpdateOutcome};
use crate::training::{EpochSummary, PhaseSummary, TrainingHistory};

fn step(
    disc_loss: f32,
    gen_loss: f32,
    disc: UpdateOutcome,
    generator: UpdateOutcome,
) -> StepResult {
    StepResult {
        disc_loss,
        gen_loss,
        metrics: BTreeMap::from([("mse".to_string(), disc_loss)]),
        disc_update: Some(disc),
        gen_update: Some(generator),
    }
}

#[test]
fn test_phase_summary_means_ignore_nan() {
    let results = vec![
        step(1.0, 2.0, UpdateOutcome::Stepped, UpdateOutcome::Stepped),
        step(f32::NAN, 4.0, UpdateOutcome::Skipped, UpdateOutcome::Stepped),
        step(3.0, f32::NAN, UpdateOutcome::Stepped, UpdateOutcome::Skipped),
    ];
    let summary = PhaseSummary::from_results(&results);
    assert_eq!(summary.batches, 3);
    assert_abs_diff_eq!(summary.disc_loss, 2.0);
    assert_abs_diff_eq!(summary.gen_loss, 3.0);
    assert_abs_diff_eq!(summary.metrics["mse"], 2.0);
    assert_eq!(summary.skipped_disc_updates, 1);
    assert_eq!(summary.skipped_gen_updates, 1);
}

#[test]
fn test_empty_phase_summary() {
    let summary = PhaseSummary::from_results(&[]);
    assert_eq!(summary.batches, 0);
    assert!(summary.disc_loss.is_nan());
    assert!(summary.metrics.is_empty());
}

#[test]
fn test_history_saved_as_json() -> Result<(), crate::errors::SynthError> {
    let dir = tempfile::tempdir()?;
    let mut history = TrainingHistory::default();
    history.push(EpochSummary {
        epoch: 0,
        train: PhaseSummary::from_results(&[step(
            0.5,
            0.7,
            UpdateOutcome::Stepped,
            UpdateOutcome::Stepped,
        )]),
        val: None,
        test: None,
        exported_images: Some(4),
    });
    let path = dir.path().join("history.json");
    history.save(&path)?;

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(value["epochs"][0]["epoch"], 0);
    assert_eq!(value["epochs"][0]["exported_images"], 4);
    assert!(value["epochs"][0]["val"].is_null());
    Ok(())
}
