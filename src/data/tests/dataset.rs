use crate::data::transforms::Normalize;
use crate::data::{
    Compose, DataError, DataManifest, Dataset, DatasetFactory, ImageDataset, TensorDataset,
    TransformEnum,
};
use crate::config::LabelingParadigm;
use crate::errors::SynthError;
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use image::{GrayImage, Luma, Rgb, RgbImage};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn write_gray(dir: &std::path::Path, name: &str, value: u8) {
    GrayImage::from_pixel(6, 6, Luma([value]))
        .save(dir.join(name))
        .expect("写入测试图像失败");
}

#[test]
fn test_tensor_dataset_get() -> Result<(), SynthError> {
    let samples = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 1, 2]);
    let transform = Compose::new(vec![TransformEnum::from(Normalize { mean: 1.0, std: 1.0 })]);
    let dataset = TensorDataset::new(samples, Some(transform));
    let mut rng = StdRng::seed_from_u64(0);

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.sample_shape(), &[1, 2]);
    assert_eq!(dataset.get(1, &mut rng)?, Tensor::new(&[2.0, 3.0], &[1, 2]));
    assert!(matches!(
        dataset.get(3, &mut rng),
        Err(SynthError::Data(DataError::IndexOutOfBounds { index: 3, len: 3 }))
    ));
    Ok(())
}

#[test]
fn test_image_dataset_grayscale_channels() -> Result<(), SynthError> {
    let dir = tempfile::tempdir()?;
    write_gray(dir.path(), "t1.png", 255);
    write_gray(dir.path(), "t2.png", 0);
    let manifest = DataManifest::new(
        vec!["Channel_0".into(), "Channel_1".into()],
        vec![vec!["t1.png".into(), "t2.png".into()]],
    );
    let dataset = ImageDataset::new(manifest, &[2, 4, 4], Some(dir.path().to_path_buf()), None)?;
    let sample = dataset.get(0, &mut StdRng::seed_from_u64(0))?;

    assert_eq!(sample.shape(), &[2, 4, 4]);
    // 第一个通道全白（1.0），第二个通道全黑（0.0）
    assert_abs_diff_eq!(sample.data()[[0, 1, 1]], 1.0, epsilon = 1e-2);
    assert_abs_diff_eq!(sample.data()[[1, 2, 3]], 0.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_image_dataset_packed_rgb() -> Result<(), SynthError> {
    let dir = tempfile::tempdir()?;
    RgbImage::from_pixel(3, 3, Rgb([255, 0, 51]))
        .save(dir.path().join("rgb.png"))
        .expect("写入测试图像失败");
    let path = dir.path().join("rgb.png").to_string_lossy().to_string();
    let manifest = DataManifest::new(vec!["Channel".into()], vec![vec![path]]);
    let dataset = ImageDataset::new(manifest, &[3, 3, 3], None, None)?;
    let sample = dataset.get(0, &mut StdRng::seed_from_u64(0))?;
    assert_abs_diff_eq!(sample.data()[[0, 0, 0]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(sample.data()[[1, 0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(sample.data()[[2, 0, 0]], 0.2, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_image_dataset_rejects_bad_manifests() {
    let no_channels = DataManifest::new(vec!["SubjectID".into()], vec![vec!["1".into()]]);
    assert!(matches!(
        ImageDataset::new(no_channels, &[1, 4, 4], None, None),
        Err(DataError::FormatError(_))
    ));

    let two_channels = DataManifest::new(
        vec!["Channel_0".into(), "Channel_1".into()],
        vec![vec!["a.png".into(), "b.png".into()]],
    );
    assert!(matches!(
        ImageDataset::new(two_channels, &[3, 4, 4], None, None),
        Err(DataError::ShapeMismatch { .. })
    ));

    let missing = DataManifest::new(vec!["Channel_0".into()], vec![vec!["nope.png".into()]]);
    let dataset = ImageDataset::new(missing, &[1, 4, 4], None, None);
    assert!(matches!(
        dataset.map(|d| d.get(0, &mut StdRng::seed_from_u64(0))),
        Ok(Err(SynthError::Data(DataError::FileNotFound(_))))
    ));
}

#[test]
fn test_dataset_factory_labeling() {
    let factory = DatasetFactory::default();
    let manifest = DataManifest::new(vec!["Channel_0".into()], vec![vec!["a.png".into()]]);
    assert!(
        factory
            .get_dataset(manifest.clone(), None, LabelingParadigm::Unlabeled, &[1, 4, 4])
            .is_ok()
    );
    assert!(matches!(
        factory.get_dataset(manifest, None, LabelingParadigm::Patient, &[1, 4, 4]),
        Err(SynthError::UnsupportedLabeling { .. })
    ));
}

#[test]
fn test_image_dataset_resolves_against_own_csv_dir() -> Result<(), SynthError> {
    let root = tempfile::tempdir()?;
    let train_dir = root.path().join("train");
    let val_dir = root.path().join("val");
    std::fs::create_dir_all(&train_dir)?;
    std::fs::create_dir_all(&val_dir)?;
    write_gray(&val_dir, "v.png", 255);
    std::fs::write(val_dir.join("val.csv"), "SubjectID,Channel_0\n0,v.png\n")?;

    let manifest = DataManifest::from_csv_path(val_dir.join("val.csv"))?;
    assert_eq!(manifest.base_dir(), Some(val_dir.as_path()));

    // 工厂的目录（训练清单所在目录）不覆盖清单自己的目录
    let factory = DatasetFactory::new(Some(train_dir));
    let dataset = factory.get_dataset(manifest, None, LabelingParadigm::Unlabeled, &[1, 4, 4])?;
    let sample = dataset.get(0, &mut StdRng::seed_from_u64(0))?;
    assert_abs_diff_eq!(sample.data()[[0, 2, 2]], 1.0, epsilon = 1e-2);
    Ok(())
}
