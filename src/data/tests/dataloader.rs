use crate::data::{DataLoader, DataloaderFactory, TensorDataset};
use crate::errors::SynthError;
use crate::tensor::Tensor;

/// 10个形状为[1, 2]的样本，第 i 个样本的值全为 i
fn dataset() -> Box<TensorDataset> {
    let data: Vec<f32> = (0..10).flat_map(|i| [i as f32, i as f32]).collect();
    Box::new(TensorDataset::new(Tensor::new(&data, &[10, 1, 2]), None))
}

fn first_values(loader: &mut DataLoader) -> Result<Vec<Vec<f32>>, SynthError> {
    loader
        .iter()
        .map(|batch| {
            let batch = batch?;
            Ok((0..batch.batch_size()).map(|i| batch.sample(i).data()[[0, 0]]).collect())
        })
        .collect()
}

#[test]
fn test_batches_in_order() -> Result<(), SynthError> {
    let mut loader = DataLoader::new(dataset(), 4);
    assert_eq!(loader.num_batches(), 3);
    let batches: Vec<Tensor> = loader.iter().collect::<Result<_, _>>()?;
    let sizes: Vec<usize> = batches.iter().map(|b| b.batch_size()).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    assert_eq!(batches[0].shape(), &[4, 1, 2]);
    assert_eq!(first_values(&mut loader)?[2], vec![8.0, 9.0]);
    Ok(())
}

#[test]
fn test_drop_last() -> Result<(), SynthError> {
    let mut loader = DataLoader::new(dataset(), 4).drop_last(true);
    assert_eq!(loader.num_batches(), 2);
    assert_eq!(loader.iter().count(), 2);
    Ok(())
}

#[test]
fn test_shuffle_is_seeded_and_reshuffles_each_epoch() -> Result<(), SynthError> {
    let mut a = DataLoader::new(dataset(), 10).shuffle(true).seed(5);
    let mut b = DataLoader::new(dataset(), 10).shuffle(true).seed(5);
    let a1 = first_values(&mut a)?;
    let a2 = first_values(&mut a)?;
    assert_eq!(a1, first_values(&mut b)?);
    assert_ne!(a1, a2);

    let mut sorted = a1[0].clone();
    sorted.sort_by(|x, y| x.total_cmp(y));
    assert_eq!(sorted, (0..10).map(|i| i as f32).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_factory_roles() -> Result<(), SynthError> {
    let factory = DataloaderFactory::new(3, true, true, 1);
    let mut train = factory.get_training_dataloader(dataset());
    let mut val = factory.get_validation_dataloader(dataset());
    assert_eq!(train.iter().count(), 3);
    // 验证集不打乱也不丢弃不完整批次
    let val_values = first_values(&mut val)?;
    assert_eq!(val_values.len(), 4);
    assert_eq!(val_values[0], vec![0.0, 1.0, 2.0]);
    Ok(())
}
