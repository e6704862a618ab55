use std::collections::{BTreeMap, HashSet};

use crate::errors::SynthError;
use crate::synth::{
    SynthesisModule, UnlabeledDcganModule, export_batch_sizes, should_export,
};

use super::small_config;

#[test]
fn test_export_cadence() {
    assert!(should_export(1, 0));
    assert!(should_export(3, 6));
    assert!(!should_export(3, 4));
    assert!(!should_export(0, 0));
    assert!(!should_export(-2, 4));
}

#[test]
fn test_export_batch_sizes_cover_total() {
    assert_eq!(export_batch_sizes(10, 4), vec![4, 4, 2]);
    assert_eq!(export_batch_sizes(8, 4), vec![4, 4]);
    assert_eq!(export_batch_sizes(3, 8), vec![3]);
    assert!(export_batch_sizes(0, 4).is_empty());
    for total in 1..30 {
        for batch in 1..9 {
            assert_eq!(export_batch_sizes(total, batch).iter().sum::<usize>(), total);
        }
    }
}

#[test]
fn test_export_ten_images_in_uneven_batches() -> Result<(), SynthError> {
    let dir = tempfile::tempdir()?;
    let mut module = UnlabeledDcganModule::new(small_config(), dir.path(), BTreeMap::new(), None)?;

    let report = module
        .on_train_epoch_end(0)?
        .expect("间隔为1时 epoch 0 应导出");
    assert_eq!(report.batch_sizes, vec![4, 4, 2]);
    assert_eq!(report.files.len(), 10);
    assert_eq!(report.directory, dir.path().join("eval_images").join("epoch_0"));

    let unique: HashSet<_> = report.files.iter().collect();
    assert_eq!(unique.len(), 10);
    for idx in 0..10 {
        assert!(report.directory.join(format!("fake_image_{idx}.png")).is_file());
    }
    Ok(())
}

#[test]
fn test_export_skipped_off_cadence() -> Result<(), SynthError> {
    let dir = tempfile::tempdir()?;
    let mut config = small_config();
    config.save_eval_images_every_n_epochs = 2;
    let mut module = UnlabeledDcganModule::new(config, dir.path(), BTreeMap::new(), None)?;
    assert!(module.on_train_epoch_end(1)?.is_none());
    assert!(!dir.path().join("eval_images").exists());
    assert!(module.on_train_epoch_end(2)?.is_some());

    let mut config = small_config();
    config.save_eval_images_every_n_epochs = 0;
    let mut module = UnlabeledDcganModule::new(config, dir.path(), BTreeMap::new(), None)?;
    assert!(module.on_train_epoch_end(0)?.is_none());
    Ok(())
}
